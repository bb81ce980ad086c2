use clap::Args;

use common::crypto::{KeyError, PublicKey, SecretKey};
use common::net::render_cidr_lines;
use wgvault_cli::api::v1::peer::GetPeer;
use wgvault_cli::api::ApiError;
use wgvault_cli::state::AppState;
use wgvault_cli::wg_config::PeerConfig;
use wgvault_cli::{qr, state::StateError};

use crate::cli::op::SessionError;

#[derive(Args, Debug, Clone)]
pub struct Show {
    /// Peer public key in hex (or use --name)
    #[arg(long, group = "peer_identifier")]
    pub public_key: Option<PublicKey>,

    /// Peer name (or use --public-key)
    #[arg(long, group = "peer_identifier")]
    pub name: Option<String>,

    /// Render the WireGuard config using the locally sealed private key
    #[arg(long)]
    pub config: bool,

    /// Also render the config as a terminal QR code (implies --config)
    #[arg(long)]
    pub qr: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PeerShowError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Either --public-key or --name must be provided")]
    NoPeerIdentifier,
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("no sealed private key for peer {0}; was it added with --no-seal?")]
    NoSealedKey(String),
    #[error("invalid sealed key in keystore: {0}")]
    SealedKeyHex(#[from] hex::FromHexError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("keychain error: {0}")]
    Keychain(#[from] common::crypto::KeychainError),
    #[error("unsealed data is not a valid private key: {0}")]
    Key(#[from] KeyError),
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Show {
    type Error = PeerShowError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let public_key = if let Some(key) = self.public_key {
            key
        } else if let Some(ref name) = self.name {
            ctx.client.resolve_peer_name(&ctx.user, name).await?
        } else {
            return Err(PeerShowError::NoPeerIdentifier);
        };

        let peer = ctx
            .client
            .call(GetPeer {
                user: ctx.user.clone(),
                public_key,
            })
            .await?;

        if !self.config && !self.qr {
            let details = vec![
                format!("name:        {}", peer.name),
                format!("public key:  {}", peer.public_key.to_hex()),
                format!(
                    "ip:          {}",
                    peer.ip.map(|ip| ip.to_string()).unwrap_or_default()
                ),
                format!(
                    "dns:         {}",
                    peer.dns.map(|ip| ip.to_string()).unwrap_or_default()
                ),
                format!("mtu:         {}", peer.mtu),
                format!("keepalive:   {}", peer.keepalive),
                format!("endpoint:    {}", peer.server.endpoint),
                format!(
                    "allowed ips: {}",
                    render_cidr_lines(&peer.allowed_ips).replace('\n', ", ")
                ),
                format!("psk:         {}", if peer.psk.is_some() { "yes" } else { "no" }),
                format!("notes:       {}", peer.notes),
                format!("created:     {}", peer.created),
                format!("updated:     {}", peer.updated),
                format!(
                    "config url:  {}",
                    ctx.client.format_url(&ctx.user, &peer.public_key, "config")?
                ),
                format!(
                    "qr url:      {}",
                    ctx.client.format_url(&ctx.user, &peer.public_key, "qrcode")?
                ),
            ];
            return Ok(details.join("\n"));
        }

        // config rendering needs the sealed private key
        let state = AppState::load(ctx.config_path.clone())?;
        let sealed_hex = state
            .keystore
            .keys
            .get(&public_key.to_hex())
            .ok_or_else(|| PeerShowError::NoSealedKey(public_key.to_hex()))?;
        let envelope = hex::decode(sealed_hex)?;

        ctx.unlock_keychain()?;
        let key_bytes = ctx.keychain.decrypt(&envelope)?;
        let private_key = SecretKey::from_slice(&key_bytes)?;

        let config = PeerConfig::from_peer(&peer, private_key);
        let rendered = config.to_string();

        if self.qr {
            Ok(format!("{}\n\n{}", rendered, qr::render_qr(&rendered)?))
        } else {
            Ok(rendered)
        }
    }
}
