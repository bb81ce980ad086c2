//! Passphrase-wrapped master keys
//!
//! At-rest form of the master key: a random salt followed by the AES-KW
//! wrapping of the key under a passphrase-derived cipher. The blob is safe
//! to persist and to print; recovering the master key requires the
//! passphrase.

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::kdf::{derive_wrapping_key, SALT_SIZE};
use crate::crypto::master_key::{MasterKey, MASTER_KEY_SIZE};

/// AES-KW adds a 64-bit integrity block to the wrapped payload
const KW_OVERHEAD: usize = 8;

/// Size of a wrapped key blob: salt followed by the AES-KW ciphertext
pub const WRAPPED_KEY_SIZE: usize = SALT_SIZE + MASTER_KEY_SIZE + KW_OVERHEAD;

/// Errors that can occur wrapping and unwrapping master keys
#[derive(Debug, thiserror::Error)]
pub enum WrappedKeyError {
    #[error("invalid wrapped key size, expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("invalid hex string: {0}")]
    HexDecode(#[from] hex::FromHexError),
    #[error("failed to wrap master key")]
    WrapFailure,
    #[error("failed to unwrap master key, wrong passphrase or corrupted blob")]
    UnwrapFailure,
}

/// A master key wrapped under a passphrase
///
/// Layout: `salt (16 bytes) || AES-KW wrapped master key (40 bytes)`.
/// The salt is generated fresh for every wrap, so wrapping the same key
/// twice under the same passphrase yields different blobs.
///
/// Unwrapping with the wrong passphrase fails the AES-KW integrity check
/// and is indistinguishable from a corrupted blob.
#[derive(Clone, PartialEq, Eq)]
pub struct WrappedKey([u8; WRAPPED_KEY_SIZE]);

impl fmt::Debug for WrappedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WrappedKey").field(&self.to_hex()).finish()
    }
}

impl WrappedKey {
    /// Generate a fresh random master key and wrap it under `passphrase`
    ///
    /// Only the wrapped form is returned. Callers that need the key for
    /// immediate use unlock the blob they just created.
    pub fn generate(passphrase: &[u8]) -> Result<Self, WrappedKeyError> {
        let master_key = MasterKey::generate();
        Self::wrap(&master_key, passphrase)
    }

    /// Wrap an existing master key under `passphrase` with a fresh salt
    pub fn wrap(master_key: &MasterKey, passphrase: &[u8]) -> Result<Self, WrappedKeyError> {
        let mut salt = [0u8; SALT_SIZE];
        getrandom::getrandom(&mut salt).expect("failed to generate random bytes");

        let kek = derive_wrapping_key(passphrase, &salt);
        let wrapped = kek
            .wrap_vec(master_key.bytes())
            .map_err(|_| WrappedKeyError::WrapFailure)?;

        let mut buff = [0u8; WRAPPED_KEY_SIZE];
        buff[..SALT_SIZE].copy_from_slice(&salt);
        buff[SALT_SIZE..].copy_from_slice(&wrapped);

        Ok(Self(buff))
    }

    /// Recover the master key by deriving the wrapping cipher from
    /// `passphrase` and the stored salt
    ///
    /// # Errors
    ///
    /// Returns [`WrappedKeyError::UnwrapFailure`] if the passphrase is
    /// wrong or the blob has been modified; the two cases are not
    /// distinguished.
    pub fn unlock(&self, passphrase: &[u8]) -> Result<MasterKey, WrappedKeyError> {
        let (salt, wrapped) = self.0.split_at(SALT_SIZE);

        let kek = derive_wrapping_key(passphrase, salt);
        let unwrapped = Zeroizing::new(
            kek.unwrap_vec(wrapped)
                .map_err(|_| WrappedKeyError::UnwrapFailure)?,
        );

        MasterKey::from_slice(&unwrapped).map_err(|_| WrappedKeyError::UnwrapFailure)
    }

    /// Create a wrapped key from a byte slice
    ///
    /// # Errors
    ///
    /// Returns an error if the slice length is not exactly
    /// `WRAPPED_KEY_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, WrappedKeyError> {
        if data.len() != WRAPPED_KEY_SIZE {
            return Err(WrappedKeyError::InvalidLength {
                expected: WRAPPED_KEY_SIZE,
                got: data.len(),
            });
        }
        let mut buff = [0u8; WRAPPED_KEY_SIZE];
        buff.copy_from_slice(data);
        Ok(Self(buff))
    }

    /// Create a wrapped key from a hex string, with or without a `0x` prefix
    pub fn from_hex(hex_str: &str) -> Result<Self, WrappedKeyError> {
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(hex_str)?;
        Self::from_slice(&bytes)
    }

    /// Hex encoding of the blob, without a prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw blob bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_and_unlock() {
        let wrapped = WrappedKey::generate(b"correct horse battery staple").unwrap();
        assert_eq!(wrapped.as_bytes().len(), WRAPPED_KEY_SIZE);

        let key = wrapped.unlock(b"correct horse battery staple").unwrap();
        let envelope = key.encrypt(b"proof of possession").unwrap();
        assert_eq!(key.decrypt(&envelope).unwrap(), b"proof of possession");
    }

    #[test]
    fn test_wrap_preserves_key() {
        let master_key = MasterKey::generate();
        let wrapped = WrappedKey::wrap(&master_key, b"hunter2").unwrap();

        let recovered = wrapped.unlock(b"hunter2").unwrap();
        assert_eq!(master_key, recovered);
    }

    #[test]
    fn test_wrong_passphrase_rejected() {
        let wrapped = WrappedKey::generate(b"right passphrase").unwrap();

        let result = wrapped.unlock(b"wrong passphrase");
        assert!(matches!(result, Err(WrappedKeyError::UnwrapFailure)));
    }

    #[test]
    fn test_fresh_salt_per_wrap() {
        let master_key = MasterKey::generate();

        let a = WrappedKey::wrap(&master_key, b"same passphrase").unwrap();
        let b = WrappedKey::wrap(&master_key, b"same passphrase").unwrap();

        assert_ne!(a, b);
        assert_eq!(a.unlock(b"same passphrase").unwrap(), b.unlock(b"same passphrase").unwrap());
    }

    #[test]
    fn test_tampered_blob_rejected() {
        let wrapped = WrappedKey::generate(b"secret").unwrap();

        // corrupt the salt, then the wrapped payload
        for i in [0, SALT_SIZE, WRAPPED_KEY_SIZE - 1] {
            let mut bytes = [0u8; WRAPPED_KEY_SIZE];
            bytes.copy_from_slice(wrapped.as_bytes());
            bytes[i] ^= 0x01;

            let tampered = WrappedKey::from_slice(&bytes).unwrap();
            let result = tampered.unlock(b"secret");
            assert!(
                matches!(result, Err(WrappedKeyError::UnwrapFailure)),
                "bit flip at byte {} was not rejected",
                i
            );
        }
    }

    #[test]
    fn test_length_validation() {
        assert!(matches!(
            WrappedKey::from_slice(&[0u8; WRAPPED_KEY_SIZE - 1]),
            Err(WrappedKeyError::InvalidLength { .. })
        ));
        assert!(matches!(
            WrappedKey::from_slice(&[0u8; WRAPPED_KEY_SIZE + 1]),
            Err(WrappedKeyError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_hex_roundtrip() {
        let wrapped = WrappedKey::generate(b"hex me").unwrap();

        let hex_str = wrapped.to_hex();
        assert_eq!(hex_str.len(), WRAPPED_KEY_SIZE * 2);

        let restored = WrappedKey::from_hex(&hex_str).unwrap();
        assert_eq!(wrapped, restored);

        let prefixed = WrappedKey::from_hex(&format!("0x{hex_str}")).unwrap();
        assert_eq!(wrapped, prefixed);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(matches!(
            WrappedKey::from_hex("not hex at all"),
            Err(WrappedKeyError::HexDecode(_))
        ));
    }

    #[test]
    fn test_empty_passphrase_accepted_here() {
        // refusing blank credentials is session policy, not a property of
        // the wrapping itself
        let wrapped = WrappedKey::generate(b"").unwrap();
        assert!(wrapped.unlock(b"").is_ok());
    }
}
