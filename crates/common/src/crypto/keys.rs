//! WireGuard identity keys
//!
//! X25519 keypairs and preshared keys, generated locally so private key
//! material never has to leave the machine. The text form used on the
//! wire and in storage is hex; base64 appears only when rendering
//! WireGuard configuration files.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use x25519_dalek::{PublicKey as XPublicKey, StaticSecret};

/// Size of an X25519 private key in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of an X25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Size of a WireGuard preshared key in bytes
pub const PRESHARED_KEY_SIZE: usize = 32;

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid key size, expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("key hex decode error")]
    HexDecode,
}

/// Public half of a WireGuard peer identity
///
/// A thin wrapper around an X25519 public key. The server identifies
/// peers by this key, so it doubles as the peer's primary identifier:
/// - **Peer Identity**: addresses the peer in every API path
/// - **Tunnel Crypto**: handed to WireGuard as the remote peer key
///
/// Hex is the wire and display form; `to_base64` exists for rendering
/// WireGuard config files.
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate();
/// let public_key = secret_key.public();
///
/// let hex = public_key.to_hex();
/// let recovered = PublicKey::from_hex(&hex)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
pub struct PublicKey(XPublicKey);

impl Deref for PublicKey {
    type Target = XPublicKey;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<XPublicKey> for PublicKey {
    fn from(key: XPublicKey) -> Self {
        PublicKey(key)
    }
}

impl From<[u8; PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        PublicKey(XPublicKey::from(bytes))
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = KeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(KeyError::InvalidLength {
                expected: PUBLIC_KEY_SIZE,
                got: bytes.len(),
            });
        }
        let mut buff = [0; PUBLIC_KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(buff.into())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

impl PublicKey {
    /// Parse a public key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut buff = [0; PUBLIC_KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff).map_err(|_| KeyError::HexDecode)?;
        Ok(buff.into())
    }

    /// Convert public key to raw bytes
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        *self.0.as_bytes()
    }

    /// Convert public key to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Convert public key to the base64 form WireGuard config files use
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }
}

/// Secret half of a WireGuard peer identity
///
/// A thin wrapper around an X25519 static secret. This key never goes to
/// the server; registration sends only the derived public key, and local
/// persistence stores the secret sealed under the vault master key.
///
/// There is deliberately no serde support. The only ways out of the
/// process are `to_hex`/`to_bytes` (for sealing) and `to_base64` (for
/// writing WireGuard config files).
///
/// # Examples
///
/// ```ignore
/// let secret_key = SecretKey::generate();
/// let public_key = secret_key.public();
///
/// // seal for storage
/// let envelope = keychain.encrypt(&secret_key.to_bytes())?;
/// ```
#[derive(Clone)]
pub struct SecretKey(StaticSecret);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl From<[u8; PRIVATE_KEY_SIZE]> for SecretKey {
    fn from(secret: [u8; PRIVATE_KEY_SIZE]) -> Self {
        Self(StaticSecret::from(secret))
    }
}

impl Deref for SecretKey {
    type Target = StaticSecret;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl SecretKey {
    /// Parse a secret key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut buff = [0; PRIVATE_KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff).map_err(|_| KeyError::HexDecode)?;
        Ok(Self::from(buff))
    }

    /// Parse a secret key from a byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(KeyError::InvalidLength {
                expected: PRIVATE_KEY_SIZE,
                got: bytes.len(),
            });
        }
        let mut buff = [0; PRIVATE_KEY_SIZE];
        buff.copy_from_slice(bytes);
        Ok(Self::from(buff))
    }

    /// Generate a new random secret key using a cryptographically secure RNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        getrandom::getrandom(&mut bytes).expect("failed to generate random bytes");
        Self::from(bytes)
    }

    /// Derive the public key from this secret key
    pub fn public(&self) -> PublicKey {
        PublicKey(XPublicKey::from(&self.0))
    }

    /// Convert secret key to raw bytes
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        self.0.to_bytes()
    }

    /// Convert secret key to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Convert secret key to the base64 form WireGuard config files use
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }
}

/// Optional symmetric preshared key layered onto a WireGuard tunnel
///
/// Travels to the server as hex (the server includes it when rendering
/// peer configs) and into config files as base64.
#[derive(Clone, PartialEq, Eq)]
pub struct PresharedKey([u8; PRESHARED_KEY_SIZE]);

impl fmt::Debug for PresharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PresharedKey(..)")
    }
}

impl From<[u8; PRESHARED_KEY_SIZE]> for PresharedKey {
    fn from(bytes: [u8; PRESHARED_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl Serialize for PresharedKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PresharedKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

impl PresharedKey {
    /// Generate a new random preshared key using a cryptographically secure RNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; PRESHARED_KEY_SIZE];
        getrandom::getrandom(&mut bytes).expect("failed to generate random bytes");
        Self(bytes)
    }

    /// Parse a preshared key from a hexadecimal string
    ///
    /// Accepts both plain hex and "0x"-prefixed hex strings.
    pub fn from_hex(hex: &str) -> Result<Self, KeyError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut buff = [0; PRESHARED_KEY_SIZE];
        hex::decode_to_slice(hex, &mut buff).map_err(|_| KeyError::HexDecode)?;
        Ok(Self(buff))
    }

    /// Convert preshared key to raw bytes
    pub fn to_bytes(&self) -> [u8; PRESHARED_KEY_SIZE] {
        self.0
    }

    /// Convert preshared key to hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert preshared key to the base64 form WireGuard config files use
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }
}
