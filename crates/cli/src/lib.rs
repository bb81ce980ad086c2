/**
 * Typed client for the wireguard-ui REST API.
 */
pub mod api;
/**
 * Terminal QR rendering of WireGuard configs.
 */
pub mod qr;
/**
 * The ~/.wgvault directory: config.toml and the
 *  keystore holding the wrapped master key and
 *  sealed peer private keys.
 */
pub mod state;
/**
 * Rendering of WireGuard INI configuration files.
 */
pub mod wg_config;
