//! Cryptographic primitives for wgvault
//!
//! This module provides the cryptographic foundation for wgvault's security model:
//!
//! - **Vault Protection**: a passphrase-wrapped AES-256-GCM master key
//! - **Payload Sealing**: authenticated encryption of secrets at rest
//! - **Peer Identity**: X25519 keypairs for WireGuard tunnels
//!
//! # Security Model
//!
//! ## Master Key
//! Each vault has one random 256-bit master key. It exists on disk only in
//! wrapped form: PBKDF2-HMAC-SHA256 stretches the user passphrase into an
//! AES-KW wrapping key, and the blob stores `salt || wrapped_key`. Neither
//! the passphrase nor the unwrapped key is ever persisted.
//!
//! ## Sealing
//! Secrets (WireGuard private keys) are sealed under the master key with
//! AES-256-GCM, a fresh nonce per envelope. Tampering with an envelope or
//! unwrapping with a wrong passphrase fails loudly; nothing in this module
//! degrades to returning unauthenticated plaintext.
//!
//! ## Sessions
//! The [`Keychain`] holds the unlocked master key for the lifetime of one
//! session and refuses to operate while locked. CLI invocations build a
//! fresh session from the stored blob plus a prompted passphrase.

mod kdf;
mod keychain;
mod keys;
mod master_key;
mod wrapped_key;

pub use kdf::{PBKDF2_ITERATIONS, SALT_SIZE};
pub use keychain::{Keychain, KeychainError};
pub use keys::{
    KeyError, PresharedKey, PublicKey, SecretKey, PRESHARED_KEY_SIZE, PRIVATE_KEY_SIZE,
    PUBLIC_KEY_SIZE,
};
pub use master_key::{CipherError, MasterKey, MASTER_KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use wrapped_key::{WrappedKey, WrappedKeyError, WRAPPED_KEY_SIZE};
