//! Payload encryption under the master key using AES-256-GCM
//!
//! The master key is the root secret of a vault session. It is generated
//! once, immediately wrapped (see `wrapped_key`), and only ever handled in
//! unwrapped form inside this crate. Every payload encrypted under it gets
//! a fresh random nonce, so identical plaintexts produce unrelated
//! envelopes.

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of an AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of an AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;
/// Size of the master key in bytes (256 bits)
pub const MASTER_KEY_SIZE: usize = 32;

/// Errors that can occur during payload encryption/decryption
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("invalid master key size, expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("envelope too short, need at least {min} bytes, got {got}")]
    TruncatedEnvelope { min: usize, got: usize },
    #[error("envelope failed authentication")]
    AuthenticationFailure,
    #[error("AEAD encryption failure")]
    EncryptFailure,
    #[error("failed to generate nonce: {0}")]
    Randomness(getrandom::Error),
}

/// A 256-bit AEAD key protecting all payload encryption in a session
///
/// The ciphertext envelope format is:
/// `nonce (12 bytes) || ciphertext || auth_tag (16 bytes)`.
/// A fresh random nonce is generated for every call to [`encrypt`], and the
/// envelope is rejected on [`decrypt`] unless the tag verifies.
///
/// Raw key bytes never leave this crate: the byte accessor is
/// crate-private, there is no serde support, and the buffer is zeroized on
/// drop.
///
/// # Examples
///
/// ```ignore
/// let key = MasterKey::generate();
///
/// let envelope = key.encrypt(b"sensitive data")?;
/// let recovered = key.decrypt(&envelope)?;
/// assert_eq!(recovered, b"sensitive data");
/// ```
///
/// [`encrypt`]: MasterKey::encrypt
/// [`decrypt`]: MasterKey::decrypt
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; MASTER_KEY_SIZE]);

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

impl From<[u8; MASTER_KEY_SIZE]> for MasterKey {
    fn from(bytes: [u8; MASTER_KEY_SIZE]) -> Self {
        MasterKey(bytes)
    }
}

impl MasterKey {
    /// Generate a new random master key using a cryptographically secure RNG
    pub fn generate() -> Self {
        let mut buff = [0; MASTER_KEY_SIZE];
        getrandom::getrandom(&mut buff).expect("failed to generate random bytes");
        Self(buff)
    }

    /// Create a master key from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly
    /// `MASTER_KEY_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, CipherError> {
        if data.len() != MASTER_KEY_SIZE {
            return Err(CipherError::InvalidKeyLength {
                expected: MASTER_KEY_SIZE,
                got: data.len(),
            });
        }
        let mut buff = [0; MASTER_KEY_SIZE];
        buff.copy_from_slice(data);
        Ok(buff.into())
    }

    /// Raw key bytes, for wrapping within this crate only
    pub(crate) fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Encrypt a payload, producing `nonce (12) || ciphertext || tag (16)`
    ///
    /// A fresh random nonce is generated for each call, so encrypting the
    /// same plaintext twice yields different envelopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the system RNG fails or the AEAD rejects the
    /// input (only possible at absurd plaintext lengths).
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        let key = Key::<Aes256Gcm>::from_slice(&self.0);
        let cipher = Aes256Gcm::new(key);

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).map_err(CipherError::Randomness)?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, data)
            .map_err(|_| CipherError::EncryptFailure)?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);

        Ok(out)
    }

    /// Decrypt an envelope produced by [`encrypt`](MasterKey::encrypt)
    ///
    /// The envelope length is validated before the nonce split, so
    /// malformed input fails fast instead of slicing out of range.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The envelope is shorter than a nonce plus a tag
    /// - The authentication tag does not verify (tampered data or wrong
    ///   key); no partial plaintext is ever returned
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        if data.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::TruncatedEnvelope {
                min: NONCE_SIZE + TAG_SIZE,
                got: data.len(),
            });
        }

        let key = Key::<Aes256Gcm>::from_slice(&self.0);
        let cipher = Aes256Gcm::new(key);
        let nonce = Nonce::from_slice(&data[..NONCE_SIZE]);

        cipher
            .decrypt(nonce, &data[NONCE_SIZE..])
            .map_err(|_| CipherError::AuthenticationFailure)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = MasterKey::generate();
        let data = b"hello world, this is a test message for encryption";

        let envelope = key.encrypt(data).unwrap();
        assert_eq!(envelope.len(), NONCE_SIZE + data.len() + TAG_SIZE);

        let decrypted = key.decrypt(&envelope).unwrap();
        assert_eq!(data.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_empty_payload() {
        let key = MasterKey::generate();

        let envelope = key.encrypt(b"").unwrap();
        let decrypted = key.decrypt(&envelope).unwrap();

        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_nonce_uniqueness() {
        let key = MasterKey::generate();
        let data = b"same plaintext";

        let a = key.encrypt(data).unwrap();
        let b = key.encrypt(data).unwrap();

        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tamper_detection() {
        let key = MasterKey::generate();
        let envelope = key.encrypt(b"integrity matters").unwrap();

        // flip one bit at every position: nonce, ciphertext, and tag
        for i in 0..envelope.len() {
            let mut tampered = envelope.clone();
            tampered[i] ^= 0x01;
            let result = key.decrypt(&tampered);
            assert!(
                matches!(result, Err(CipherError::AuthenticationFailure)),
                "bit flip at byte {} was not rejected",
                i
            );
        }
    }

    #[test]
    fn test_wrong_key_rejected() {
        let key = MasterKey::generate();
        let other = MasterKey::generate();

        let envelope = key.encrypt(b"for the right key only").unwrap();
        let result = other.decrypt(&envelope);

        assert!(matches!(result, Err(CipherError::AuthenticationFailure)));
    }

    #[test]
    fn test_truncated_envelope() {
        let key = MasterKey::generate();

        let result = key.decrypt(&[0u8; NONCE_SIZE + TAG_SIZE - 1]);
        assert!(matches!(
            result,
            Err(CipherError::TruncatedEnvelope { .. })
        ));

        let result = key.decrypt(&[]);
        assert!(matches!(
            result,
            Err(CipherError::TruncatedEnvelope { .. })
        ));
    }

    #[test]
    fn test_key_size_validation() {
        assert!(MasterKey::from_slice(&[1u8; 16]).is_err());
        assert!(MasterKey::from_slice(&[1u8; 64]).is_err());
        assert!(MasterKey::from_slice(&[1u8; MASTER_KEY_SIZE]).is_ok());
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = MasterKey::from([0xAB; MASTER_KEY_SIZE]);
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("171"));
        assert!(!rendered.to_lowercase().contains("ab"));
    }
}
