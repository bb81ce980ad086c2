use clap::Args;

use common::crypto::PublicKey;
use wgvault_cli::api::v1::peer::DeletePeer;
use wgvault_cli::api::ApiError;
use wgvault_cli::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Peer public key in hex (or use --name)
    #[arg(long, group = "peer_identifier")]
    pub public_key: Option<PublicKey>,

    /// Peer name (or use --public-key)
    #[arg(long, group = "peer_identifier")]
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PeerRmError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Either --public-key or --name must be provided")]
    NoPeerIdentifier,
    #[error("state error: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Rm {
    type Error = PeerRmError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let public_key = if let Some(key) = self.public_key {
            key
        } else if let Some(ref name) = self.name {
            ctx.client.resolve_peer_name(&ctx.user, name).await?
        } else {
            return Err(PeerRmError::NoPeerIdentifier);
        };

        ctx.client
            .call_unit(DeletePeer {
                user: ctx.user.clone(),
                public_key,
            })
            .await?;

        // drop the sealed private key too; without the server record it
        // has nothing left to configure
        let mut dropped = false;
        if let Ok(mut state) = AppState::load(ctx.config_path.clone()) {
            if state.keystore.keys.remove(&public_key.to_hex()).is_some() {
                state.save_keystore()?;
                dropped = true;
            }
        }

        let mut message = format!("Deleted peer {}", public_key.to_hex());
        if dropped {
            message.push_str("\nRemoved its sealed private key from the keystore.");
        }
        Ok(message)
    }
}
