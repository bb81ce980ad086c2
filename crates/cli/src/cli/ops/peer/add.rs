use std::net::Ipv4Addr;

use clap::Args;

use common::crypto::{PresharedKey, SecretKey};
use wgvault_cli::api::v1::peer::{CreatePeer, PeerForm};
use wgvault_cli::api::ApiError;
use wgvault_cli::state::{AppState, StateError};
use wgvault_cli::wg_config::PeerConfig;

use crate::cli::op::SessionError;

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// Display name for the new peer
    #[arg(long)]
    pub name: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Generate and register a preshared key for the tunnel
    #[arg(long)]
    pub psk: bool,

    /// Allowed IPs in CIDR form, separated by commas
    #[arg(long)]
    pub allowed_ips: Option<String>,

    /// Tunnel MTU
    #[arg(long)]
    pub mtu: Option<u32>,

    /// DNS server pushed to the peer
    #[arg(long)]
    pub dns: Option<Ipv4Addr>,

    /// Register the peer without sealing the private key into the keystore
    ///
    /// The printed config is then the only copy of the private key.
    #[arg(long)]
    pub no_seal: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PeerAddError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("keychain error: {0}")]
    Keychain(#[from] common::crypto::KeychainError),
    #[error("state error: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Add {
    type Error = PeerAddError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // generated locally; the server only ever sees the public half
        let private_key = SecretKey::generate();
        let public_key = private_key.public();

        // seal before registering, so a passphrase typo cannot leave an
        // unsealable key already live on the server
        let mut state = None;
        if !self.no_seal {
            ctx.unlock_keychain()?;
            state = Some(AppState::load(ctx.config_path.clone())?);
        }

        let mut form = PeerForm::new(public_key);
        form.psk = self.psk.then(PresharedKey::generate);
        form.dns = self.dns;
        form.allowed_ips = self
            .allowed_ips
            .as_deref()
            .and_then(super::parse_allowed_ips);
        form.mtu = self.mtu;
        form.name = self.name.clone();
        form.notes = self.notes.clone();

        let peer = ctx
            .client
            .call(CreatePeer {
                user: ctx.user.clone(),
                form,
            })
            .await?;

        let mut footer = String::new();
        if let Some(mut state) = state {
            let envelope = ctx.keychain.encrypt(&private_key.to_bytes())?;
            state
                .keystore
                .keys
                .insert(public_key.to_hex(), hex::encode(envelope));
            state.save_keystore()?;
            footer = format!(
                "\n\nSealed private key for {} into the keystore.",
                public_key.to_hex()
            );
        }

        let config = PeerConfig::from_peer(&peer, private_key);
        Ok(format!("{}{}", config, footer))
    }
}
