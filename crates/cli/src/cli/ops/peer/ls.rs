use clap::Args;

use wgvault_cli::api::v1::peer::ListPeers;
use wgvault_cli::api::ApiError;

#[derive(Args, Debug, Clone)]
pub struct Ls;

#[derive(Debug, thiserror::Error)]
pub enum PeerLsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Ls {
    type Error = PeerLsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let peers = ctx
            .client
            .call(ListPeers {
                user: ctx.user.clone(),
            })
            .await?;

        if peers.is_empty() {
            return Ok("No peers found".to_string());
        }

        let output = peers
            .iter()
            .map(|peer| {
                let name = if peer.name.is_empty() {
                    "-"
                } else {
                    peer.name.as_str()
                };
                let ip = peer
                    .ip
                    .map(|ip| ip.to_string())
                    .unwrap_or_else(|| "-".to_string());
                format!("{:<24} {:<15} {}", name, ip, peer.public_key.to_hex())
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(output)
    }
}
