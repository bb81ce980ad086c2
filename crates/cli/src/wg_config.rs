//! WireGuard INI configuration rendering
//!
//! Produces the `[Interface]`/`[Peer]` text that wg-quick(8) and mobile
//! WireGuard apps import. Keys render in base64, addresses in CIDR.

use std::fmt;
use std::net::Ipv4Addr;

use common::crypto::{PresharedKey, PublicKey, SecretKey};
use common::net::IpNet;

use crate::api::v1::peer::Peer;

/// Everything needed to render a complete client-side tunnel config
///
/// Built from the server's peer record plus the locally held private key;
/// the server never sees the private half.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    pub address: Option<Ipv4Addr>,
    pub private_key: SecretKey,
    pub dns: Option<Ipv4Addr>,
    pub mtu: u32,
    pub server_public_key: PublicKey,
    pub allowed_ips: Vec<IpNet>,
    pub endpoint: String,
    pub keepalive: u32,
    pub preshared_key: Option<PresharedKey>,
}

impl PeerConfig {
    /// Combine a fetched peer with its local private key
    ///
    /// The tunnel routes the server's allowed IPs; the peer's own
    /// `allowed_ips` are the server-side view and do not belong in the
    /// client config.
    pub fn from_peer(peer: &Peer, private_key: SecretKey) -> Self {
        Self {
            address: peer.ip,
            private_key,
            dns: peer.dns,
            mtu: peer.mtu,
            server_public_key: peer.server.public_key,
            allowed_ips: peer.server.allowed_ips.clone(),
            endpoint: peer.server.endpoint.clone(),
            keepalive: peer.keepalive,
            preshared_key: peer.psk.clone(),
        }
    }
}

impl fmt::Display for PeerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Interface]")?;
        if let Some(address) = self.address {
            writeln!(f, "Address={}", address)?;
        }
        writeln!(f, "PrivateKey={}", self.private_key.to_base64())?;
        if let Some(dns) = self.dns {
            writeln!(f, "DNS={}", dns)?;
        }
        writeln!(f, "MTU={}", self.mtu)?;
        writeln!(f)?;
        writeln!(f, "[Peer]")?;
        writeln!(f, "PublicKey={}", self.server_public_key.to_base64())?;
        let allowed = self
            .allowed_ips
            .iter()
            .map(IpNet::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(f, "AllowedIPs={}", allowed)?;
        writeln!(f, "Endpoint={}", self.endpoint)?;
        write!(f, "PersistentKeepalive={}", self.keepalive)?;
        if let Some(psk) = &self.preshared_key {
            write!(f, "\nPresharedKey={}", psk.to_base64())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_config(psk: bool) -> PeerConfig {
        PeerConfig {
            address: Some("10.44.0.7".parse().unwrap()),
            private_key: SecretKey::generate(),
            dns: Some("1.1.1.1".parse().unwrap()),
            mtu: 1420,
            server_public_key: SecretKey::generate().public(),
            allowed_ips: vec![
                "0.0.0.0/0".parse().unwrap(),
                "10.44.0.0/16".parse().unwrap(),
            ],
            endpoint: "vpn.example.com:51820".to_string(),
            keepalive: 25,
            preshared_key: psk.then(PresharedKey::generate),
        }
    }

    #[test]
    fn test_render_full_config() {
        let config = sample_config(true);
        let rendered = config.to_string();

        assert!(rendered.starts_with("[Interface]\n"));
        assert!(rendered.contains("Address=10.44.0.7\n"));
        assert!(rendered.contains(&format!(
            "PrivateKey={}\n",
            config.private_key.to_base64()
        )));
        assert!(rendered.contains("DNS=1.1.1.1\n"));
        assert!(rendered.contains("MTU=1420\n"));
        assert!(rendered.contains("\n\n[Peer]\n"));
        assert!(rendered.contains("AllowedIPs=0.0.0.0/0,10.44.0.0/16\n"));
        assert!(rendered.contains("Endpoint=vpn.example.com:51820\n"));
        assert!(rendered.contains("PersistentKeepalive=25"));
        assert!(rendered.contains(&format!(
            "PresharedKey={}",
            config.preshared_key.as_ref().unwrap().to_base64()
        )));
    }

    #[test]
    fn test_optional_lines_omitted() {
        let mut config = sample_config(false);
        config.dns = None;
        config.address = None;

        let rendered = config.to_string();
        assert!(!rendered.contains("DNS="));
        assert!(!rendered.contains("Address="));
        assert!(!rendered.contains("PresharedKey="));
        assert!(rendered.ends_with("PersistentKeepalive=25"));
    }
}
