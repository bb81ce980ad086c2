//! IPv4 CIDR networks and WireGuard allowed-IPs text handling
//!
//! Allowed IPs travel three ways: as CIDR strings on the wire, as
//! newline-separated text in user input, and as base64-encoded 4-byte
//! masks in the legacy storage format. This module converts between all
//! three.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static CIDR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}(/\d{1,2})?$").unwrap());

/// Errors that can occur parsing networks and masks
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),
    #[error("invalid prefix length {0}, must be 0-32")]
    InvalidPrefix(u8),
    #[error("invalid base64 mask: {0}")]
    MaskDecode(#[from] base64::DecodeError),
    #[error("invalid mask length, expected 4 bytes, got {0}")]
    MaskLength(usize),
}

/// An IPv4 network in CIDR notation
///
/// The text form is `a.b.c.d/prefix`; a bare address parses as a `/32`
/// host route. Serde uses the text form, matching the CIDR strings the
/// server sends in `allowedIPs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    pub ip: Ipv4Addr,
    pub prefix: u8,
}

impl IpNet {
    /// Build a network, validating the prefix length
    pub fn new(ip: Ipv4Addr, prefix: u8) -> Result<Self, NetError> {
        if prefix > 32 {
            return Err(NetError::InvalidPrefix(prefix));
        }
        Ok(Self { ip, prefix })
    }

    /// A `/32` host route for a single address
    pub fn host(ip: Ipv4Addr) -> Self {
        Self { ip, prefix: 32 }
    }

    /// The 4-byte netmask for this network's prefix
    pub fn mask(&self) -> [u8; 4] {
        prefix_to_mask(self.prefix)
    }

    /// The netmask in the legacy base64 wire form
    pub fn mask_base64(&self) -> String {
        BASE64.encode(self.mask())
    }

    /// Build a network from an address and a base64-encoded 4-byte mask
    pub fn from_mask_base64(ip: Ipv4Addr, mask: &str) -> Result<Self, NetError> {
        let bytes = BASE64.decode(mask)?;
        let bytes: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| NetError::MaskLength(bytes.len()))?;
        Ok(Self {
            ip,
            prefix: mask_to_prefix(bytes),
        })
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.prefix)
    }
}

impl FromStr for IpNet {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((ip, prefix)) => {
                let ip = ip
                    .parse()
                    .map_err(|_| NetError::InvalidAddress(s.to_string()))?;
                let prefix: u8 = prefix
                    .parse()
                    .map_err(|_| NetError::InvalidAddress(s.to_string()))?;
                Self::new(ip, prefix)
            }
            None => {
                let ip = s
                    .parse()
                    .map_err(|_| NetError::InvalidAddress(s.to_string()))?;
                Ok(Self::host(ip))
            }
        }
    }
}

impl Serialize for IpNet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpNet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Expand a prefix length into a 4-byte netmask
pub fn prefix_to_mask(prefix: u8) -> [u8; 4] {
    let prefix = prefix.min(32);
    let bits = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - prefix as u32)
    };
    bits.to_be_bytes()
}

/// Recover a prefix length from a 4-byte netmask
///
/// The prefix is the position of the last set bit plus one, with 0 for
/// an all-zero mask; non-contiguous masks resolve to the span that
/// covers their highest set bit, matching the legacy decoder.
pub fn mask_to_prefix(mask: [u8; 4]) -> u8 {
    let bits = u32::from_be_bytes(mask);
    match bits {
        0 => 0,
        _ => (32 - bits.trailing_zeros()) as u8,
    }
}

/// Parse newline-separated CIDR text into networks
///
/// Empty input yields `None`. Lines are trimmed and silently skipped
/// unless they look like an IPv4 address with an optional `/prefix`;
/// a bare address becomes a `/32` host route.
pub fn parse_cidr_lines(text: &str) -> Option<Vec<IpNet>> {
    if text.is_empty() {
        return None;
    }
    Some(
        text.lines()
            .map(str::trim)
            .filter(|line| CIDR_REGEX.is_match(line))
            .filter_map(|line| line.parse().ok())
            .collect(),
    )
}

/// Render networks as newline-separated CIDR text
pub fn render_cidr_lines(nets: &[IpNet]) -> String {
    nets.iter()
        .map(IpNet::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let net: IpNet = "10.0.0.0/24".parse().unwrap();
        assert_eq!(net.ip, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(net.prefix, 24);
        assert_eq!(net.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_bare_address_is_host_route() {
        let net: IpNet = "192.168.1.7".parse().unwrap();
        assert_eq!(net.prefix, 32);
        assert_eq!(net.to_string(), "192.168.1.7/32");
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!("10.0.0.0/33".parse::<IpNet>().is_err());
        assert!("300.0.0.1".parse::<IpNet>().is_err());
        assert!("not an address".parse::<IpNet>().is_err());
        assert!(IpNet::new(Ipv4Addr::LOCALHOST, 40).is_err());
    }

    #[test]
    fn test_prefix_mask_conversion() {
        assert_eq!(prefix_to_mask(0), [0, 0, 0, 0]);
        assert_eq!(prefix_to_mask(8), [255, 0, 0, 0]);
        assert_eq!(prefix_to_mask(24), [255, 255, 255, 0]);
        assert_eq!(prefix_to_mask(32), [255, 255, 255, 255]);

        for prefix in 0..=32u8 {
            assert_eq!(mask_to_prefix(prefix_to_mask(prefix)), prefix);
        }
    }

    #[test]
    fn test_mask_base64_roundtrip() {
        let net: IpNet = "172.16.0.0/12".parse().unwrap();
        let encoded = net.mask_base64();

        let decoded = IpNet::from_mask_base64(net.ip, &encoded).unwrap();
        assert_eq!(decoded, net);
    }

    #[test]
    fn test_bad_mask_rejected() {
        let ip = Ipv4Addr::LOCALHOST;
        assert!(matches!(
            IpNet::from_mask_base64(ip, "!!!!"),
            Err(NetError::MaskDecode(_))
        ));
        // base64 of 2 bytes, not 4
        assert!(matches!(
            IpNet::from_mask_base64(ip, "//8="),
            Err(NetError::MaskLength(2))
        ));
    }

    #[test]
    fn test_parse_cidr_lines() {
        let parsed = parse_cidr_lines("10.0.0.0/24\n  192.168.1.1  \nnonsense\n1.2.3.4/8").unwrap();
        assert_eq!(
            parsed,
            vec![
                "10.0.0.0/24".parse().unwrap(),
                "192.168.1.1/32".parse().unwrap(),
                "1.2.3.4/8".parse().unwrap(),
            ]
        );
    }

    #[test]
    fn test_parse_empty_text_is_none() {
        assert!(parse_cidr_lines("").is_none());
    }

    #[test]
    fn test_render_cidr_lines() {
        let nets: Vec<IpNet> = vec!["10.0.0.0/24".parse().unwrap(), "0.0.0.0/0".parse().unwrap()];
        assert_eq!(render_cidr_lines(&nets), "10.0.0.0/24\n0.0.0.0/0");
    }

    #[test]
    fn test_serde_string_form() {
        let net: IpNet = "10.1.2.0/24".parse().unwrap();
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, "\"10.1.2.0/24\"");

        let parsed: IpNet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, net);
    }
}
