use std::net::Ipv4Addr;

use clap::Args;

use common::crypto::PublicKey;
use wgvault_cli::api::v1::peer::{GetPeer, PeerForm, UpdatePeer};
use wgvault_cli::api::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Set {
    /// Peer public key in hex (or use --name)
    #[arg(long, group = "peer_identifier")]
    pub public_key: Option<PublicKey>,

    /// Peer name (or use --public-key)
    #[arg(long, group = "peer_identifier")]
    pub name: Option<String>,

    /// New display name
    #[arg(long)]
    pub rename: Option<String>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,

    /// New allowed IPs in CIDR form, separated by commas
    #[arg(long)]
    pub allowed_ips: Option<String>,

    /// New tunnel MTU
    #[arg(long)]
    pub mtu: Option<u32>,

    /// New DNS server
    #[arg(long)]
    pub dns: Option<Ipv4Addr>,
}

#[derive(Debug, thiserror::Error)]
pub enum PeerSetError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Either --public-key or --name must be provided")]
    NoPeerIdentifier,
    #[error("Nothing to change; pass at least one field flag")]
    NoChanges,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Set {
    type Error = PeerSetError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.rename.is_none()
            && self.notes.is_none()
            && self.allowed_ips.is_none()
            && self.mtu.is_none()
            && self.dns.is_none()
        {
            return Err(PeerSetError::NoChanges);
        }

        let public_key = if let Some(key) = self.public_key {
            key
        } else if let Some(ref name) = self.name {
            ctx.client.resolve_peer_name(&ctx.user, name).await?
        } else {
            return Err(PeerSetError::NoPeerIdentifier);
        };

        // the server replaces fields wholesale, so overlay the flags onto
        // the peer's current state
        let current = ctx
            .client
            .call(GetPeer {
                user: ctx.user.clone(),
                public_key,
            })
            .await?;

        let mut form = PeerForm::from_peer(&current);
        if let Some(ref rename) = self.rename {
            form.name = Some(rename.clone());
        }
        if let Some(ref notes) = self.notes {
            form.notes = Some(notes.clone());
        }
        if let Some(ref allowed_ips) = self.allowed_ips {
            form.allowed_ips = super::parse_allowed_ips(allowed_ips);
        }
        if let Some(mtu) = self.mtu {
            form.mtu = Some(mtu);
        }
        if let Some(dns) = self.dns {
            form.dns = Some(dns);
        }

        let updated = ctx
            .client
            .call(UpdatePeer {
                user: ctx.user.clone(),
                form,
            })
            .await?;

        Ok(format!(
            "Updated peer {} ({})",
            updated.name,
            updated.public_key.to_hex()
        ))
    }
}
