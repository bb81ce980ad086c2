/**
 * Cryptographic types and operations.
 *  - Passphrase-wrapped master keys and the
 *    session keychain that holds them
 *  - X25519 identity keys for WireGuard peers
 */
pub mod crypto;
/**
 * IPv4 CIDR networks, netmask conversion, and
 *  allowed-IPs text parsing.
 */
pub mod net;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{Keychain, MasterKey, PresharedKey, PublicKey, SecretKey, WrappedKey};
    pub use crate::net::IpNet;
    pub use crate::version::BuildInfo;
}
