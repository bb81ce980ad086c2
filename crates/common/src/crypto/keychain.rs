//! Session keychain holding the unlocked master key
//!
//! A `Keychain` starts without key material and refuses to encrypt or
//! decrypt until a master key has been installed, either by `init` (create
//! a new vault) or `unlock` (open an existing one). Handles are cheap to
//! clone and share one underlying session.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::crypto::master_key::{CipherError, MasterKey};
use crate::crypto::wrapped_key::{WrappedKey, WrappedKeyError};

/// Errors surfaced by keychain session operations
#[derive(Debug, thiserror::Error)]
pub enum KeychainError {
    #[error("keychain is not unlocked")]
    NotUnlocked,
    #[error("wrapped key error: {0}")]
    WrappedKey(#[from] WrappedKeyError),
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),
}

#[derive(Debug, Default)]
struct KeychainState {
    master_key: Option<MasterKey>,
    wrapped_key: Option<WrappedKey>,
}

/// Shared handle to a vault session
///
/// Holds at most one unlocked [`MasterKey`] together with the wrapped blob
/// it came from. All state lives behind a mutex inside an `Arc`, so clones
/// observe the same session and concurrent calls serialize.
///
/// The fail-closed rule: a keychain that was never initialized or unlocked
/// rejects `encrypt` and `decrypt` with [`KeychainError::NotUnlocked`]
/// rather than producing output under a missing key.
///
/// # Examples
///
/// ```ignore
/// let keychain = Keychain::new();
/// let wrapped = keychain.init(b"correct horse battery staple")?;
///
/// // persist `wrapped.to_hex()`, then in a later session:
/// let keychain = Keychain::new();
/// keychain.unlock(wrapped.as_bytes(), b"correct horse battery staple")?;
/// let envelope = keychain.encrypt(b"secret payload")?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct Keychain(Arc<Mutex<KeychainState>>);

impl Keychain {
    /// Create an empty keychain with no key material
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new vault: generate a master key, wrap it under
    /// `passphrase`, and leave the session unlocked
    ///
    /// Returns the wrapped blob for the caller to persist or display.
    /// Runs the passphrase KDF twice (wrap, then unlock), so this is
    /// noticeably slow; see [`PBKDF2_ITERATIONS`](crate::crypto::PBKDF2_ITERATIONS).
    ///
    /// # Errors
    ///
    /// Returns an error if wrapping fails.
    pub fn init(&self, passphrase: &[u8]) -> Result<WrappedKey, KeychainError> {
        let wrapped_key = WrappedKey::generate(passphrase)?;
        let master_key = wrapped_key.unlock(passphrase)?;

        let mut state = self.0.lock();
        state.master_key = Some(master_key);
        state.wrapped_key = Some(wrapped_key.clone());

        Ok(wrapped_key)
    }

    /// Open an existing vault from its wrapped blob and passphrase
    ///
    /// Blank credentials are a guarded no-op: if either argument is empty
    /// the session state is left exactly as it was and `Ok(())` is
    /// returned. Otherwise a successful unlock installs the master key,
    /// replacing any previously held one.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob has the wrong length or the
    /// passphrase fails to unwrap it. State is unchanged on error.
    pub fn unlock(&self, wrapped_key: &[u8], passphrase: &[u8]) -> Result<(), KeychainError> {
        if wrapped_key.is_empty() || passphrase.is_empty() {
            debug!("blank credentials, leaving keychain state unchanged");
            return Ok(());
        }

        let wrapped_key = WrappedKey::from_slice(wrapped_key)?;
        let master_key = wrapped_key.unlock(passphrase)?;

        let mut state = self.0.lock();
        state.master_key = Some(master_key);
        state.wrapped_key = Some(wrapped_key);

        Ok(())
    }

    /// Encrypt a payload under the session master key
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::NotUnlocked`] if no master key is held.
    pub fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, KeychainError> {
        let state = self.0.lock();
        let master_key = state.master_key.as_ref().ok_or(KeychainError::NotUnlocked)?;

        Ok(master_key.encrypt(data)?)
    }

    /// Decrypt an envelope under the session master key
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::NotUnlocked`] if no master key is held,
    /// or a cipher error if the envelope fails authentication.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, KeychainError> {
        let state = self.0.lock();
        let master_key = state.master_key.as_ref().ok_or(KeychainError::NotUnlocked)?;

        Ok(master_key.decrypt(data)?)
    }

    /// The wrapped blob of the current session, if one was installed
    pub fn wrapped_key(&self) -> Option<WrappedKey> {
        self.0.lock().wrapped_key.clone()
    }

    /// Whether a master key is currently held
    pub fn is_unlocked(&self) -> bool {
        self.0.lock().master_key.is_some()
    }

    /// Drop the master key, returning to the locked state
    ///
    /// The wrapped blob is retained so the session can be unlocked again
    /// with the passphrase alone.
    pub fn lock(&self) {
        let mut state = self.0.lock();
        state.master_key = None;
    }
}
