//! Wire types for the peer ("client" in server parlance) endpoints
//!
//! The JSON shapes follow the server's hand-written marshaling exactly,
//! including its quirks: the request body key is `allowedIps` while the
//! response key is `allowedIPs`, the server block misspells its key as
//! `alowedIPs`, and absent IP fields arrive as the literal string
//! `"<nil>"`.

mod create;
mod delete_peer;
mod get;
mod list;
mod update;

pub use create::CreatePeer;
pub use delete_peer::DeletePeer;
pub use get::GetPeer;
pub use list::ListPeers;
pub use update::UpdatePeer;

use std::net::Ipv4Addr;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use common::crypto::{PresharedKey, PublicKey};
use common::net::IpNet;

/// Accepts missing fields, empty strings, and the `"<nil>"` the server
/// emits for unset IPs
fn lenient_ip<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Ipv4Addr>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| s.parse().ok()))
}

/// A peer as the server reports it
#[derive(Debug, Clone, Deserialize)]
pub struct Peer {
    #[serde(default, deserialize_with = "lenient_ip")]
    pub ip: Option<Ipv4Addr>,
    #[serde(rename = "publicKey")]
    pub public_key: PublicKey,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_ip")]
    pub dns: Option<Ipv4Addr>,
    #[serde(default)]
    pub mtu: u32,
    #[serde(rename = "allowedIPs", default)]
    pub allowed_ips: Vec<IpNet>,
    pub server: ServerInfo,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub keepalive: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated: OffsetDateTime,
    #[serde(default)]
    pub psk: Option<PresharedKey>,
}

/// The server's own tunnel parameters, embedded in every peer response
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub endpoint: String,
    // misspelled on the wire by the server's marshaler
    #[serde(rename = "alowedIPs", default)]
    pub allowed_ips: Vec<IpNet>,
    #[serde(rename = "publicKey")]
    pub public_key: PublicKey,
}

/// Request body for creating or updating a peer
///
/// Only the public key is required; everything else is optional and the
/// server fills in defaults. Updates replace fields wholesale, so callers
/// merging changes should start from the fetched peer via
/// [`PeerForm::from_peer`].
#[derive(Debug, Clone, Serialize)]
pub struct PeerForm {
    #[serde(rename = "publicKey")]
    pub public_key: PublicKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psk: Option<PresharedKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<Ipv4Addr>,
    #[serde(rename = "allowedIps", skip_serializing_if = "Option::is_none")]
    pub allowed_ips: Option<Vec<IpNet>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PeerForm {
    /// A minimal form registering just a public key
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            public_key,
            psk: None,
            dns: None,
            allowed_ips: None,
            mtu: None,
            name: None,
            notes: None,
        }
    }

    /// A form carrying a fetched peer's current fields, for merge-updates
    pub fn from_peer(peer: &Peer) -> Self {
        Self {
            public_key: peer.public_key,
            psk: peer.psk.clone(),
            dns: peer.dns,
            allowed_ips: Some(peer.allowed_ips.clone()),
            mtu: Some(peer.mtu),
            name: Some(peer.name.clone()),
            notes: Some(peer.notes.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use common::crypto::SecretKey;

    fn sample_response(psk: bool) -> String {
        let server_key = SecretKey::generate().public().to_hex();
        let peer_key = SecretKey::generate().public().to_hex();
        let psk_field = if psk {
            format!(r#""psk": "{}","#, PresharedKey::generate().to_hex())
        } else {
            String::new()
        };
        format!(
            r#"{{
                "ip": "10.44.0.7",
                "publicKey": "{peer_key}",
                "name": "laptop",
                "dns": "<nil>",
                "mtu": 1420,
                "allowedIPs": ["0.0.0.0/0"],
                "server": {{
                    "endpoint": "vpn.example.com:51820",
                    "alowedIPs": ["10.44.0.0/16"],
                    "publicKey": "{server_key}"
                }},
                "notes": "",
                "keepalive": 25,
                {psk_field}
                "created": "2024-03-01T12:00:00Z",
                "updated": "2024-03-02T08:30:00.123456789Z"
            }}"#
        )
    }

    #[test]
    fn test_peer_decoding() {
        let peer: Peer = serde_json::from_str(&sample_response(false)).unwrap();

        assert_eq!(peer.ip, Some("10.44.0.7".parse().unwrap()));
        assert_eq!(peer.name, "laptop");
        // "<nil>" decodes to absent, not an error
        assert_eq!(peer.dns, None);
        assert_eq!(peer.mtu, 1420);
        assert_eq!(peer.allowed_ips, vec!["0.0.0.0/0".parse().unwrap()]);
        assert_eq!(peer.server.endpoint, "vpn.example.com:51820");
        assert_eq!(
            peer.server.allowed_ips,
            vec!["10.44.0.0/16".parse().unwrap()]
        );
        assert!(peer.psk.is_none());
    }

    #[test]
    fn test_peer_decoding_with_psk() {
        let peer: Peer = serde_json::from_str(&sample_response(true)).unwrap();
        assert!(peer.psk.is_some());
    }

    #[test]
    fn test_form_omits_unset_fields() {
        let form = PeerForm::new(SecretKey::generate().public());
        let json = serde_json::to_value(&form).unwrap();

        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("publicKey"));
    }

    #[test]
    fn test_form_request_key_casing() {
        let mut form = PeerForm::new(SecretKey::generate().public());
        form.allowed_ips = Some(vec!["10.0.0.0/24".parse().unwrap()]);

        let json = serde_json::to_value(&form).unwrap();
        // request bodies use `allowedIps`, unlike the `allowedIPs` in
        // responses
        assert_eq!(json["allowedIps"][0], "10.0.0.0/24");
    }

    #[test]
    fn test_from_peer_carries_everything() {
        let peer: Peer = serde_json::from_str(&sample_response(true)).unwrap();
        let form = PeerForm::from_peer(&peer);

        assert_eq!(form.public_key, peer.public_key);
        assert_eq!(form.allowed_ips.as_deref(), Some(&peer.allowed_ips[..]));
        assert_eq!(form.mtu, Some(peer.mtu));
        assert_eq!(form.name.as_deref(), Some("laptop"));
        assert!(form.psk.is_some());
    }
}
