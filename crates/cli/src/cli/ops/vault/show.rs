use clap::Args;

use wgvault_cli::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Show;

#[derive(Debug, thiserror::Error)]
pub enum VaultShowError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("no master key in keystore. Run 'wgvault vault init' first")]
    NoVault,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Show {
    type Error = VaultShowError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        state
            .keystore
            .wrapped_key
            .ok_or(VaultShowError::NoVault)
    }
}
