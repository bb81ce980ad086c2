//! Wrapping key derivation via PBKDF2-HMAC-SHA256
//!
//! Key wrapping uses AES-KW under a key derived from the user passphrase.
//! The derived key never leaves this module as raw bytes; callers get a
//! ready-to-use AES-KW cipher instead.

use aes_kw::KekAes256;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroize;

/// Size of the random salt stored with a wrapped key, in bytes
pub const SALT_SIZE: usize = 16;

/// PBKDF2 iteration count for passphrase-based key derivation
///
/// Deliberately expensive to slow down offline guessing. Derivation takes
/// on the order of 100ms on current hardware; call sites on async runtimes
/// should push unlock work onto a blocking thread.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

const WRAPPING_KEY_SIZE: usize = 32;

/// Derive the AES-KW wrapping cipher for a passphrase and salt
///
/// Deterministic: the same passphrase and salt always produce the same
/// wrapping key. The intermediate key bytes are zeroized before returning.
pub(crate) fn derive_wrapping_key(passphrase: &[u8], salt: &[u8]) -> KekAes256 {
    let mut key = [0u8; WRAPPING_KEY_SIZE];
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ITERATIONS, &mut key);

    let kek = KekAes256::from(key);
    key.zeroize();
    kek
}

#[cfg(test)]
mod test {
    use super::*;

    // KekAes256 exposes no byte accessor, so equality is observed through
    // wrapping a fixed payload.
    fn wrap_probe(kek: &KekAes256) -> Vec<u8> {
        kek.wrap_vec(&[0u8; 32]).unwrap()
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let salt = [7u8; SALT_SIZE];

        let a = derive_wrapping_key(b"correct horse battery staple", &salt);
        let b = derive_wrapping_key(b"correct horse battery staple", &salt);

        assert_eq!(wrap_probe(&a), wrap_probe(&b));
    }

    #[test]
    fn test_different_passphrases_differ() {
        let salt = [7u8; SALT_SIZE];

        let a = derive_wrapping_key(b"passphrase one", &salt);
        let b = derive_wrapping_key(b"passphrase two", &salt);

        assert_ne!(wrap_probe(&a), wrap_probe(&b));
    }

    #[test]
    fn test_different_salts_differ() {
        let a = derive_wrapping_key(b"same passphrase", &[1u8; SALT_SIZE]);
        let b = derive_wrapping_key(b"same passphrase", &[2u8; SALT_SIZE]);

        assert_ne!(wrap_probe(&a), wrap_probe(&b));
    }
}
