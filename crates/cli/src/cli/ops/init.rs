use clap::Args;

use wgvault_cli::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init;

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] wgvault_cli::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // persist whatever the global flags resolved to, so later runs
        // default to the same server and user
        let config = AppConfig {
            remote: ctx.client.base_url().to_string(),
            user: ctx.user.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized wgvault directory at: {}\n\
             - Config: {}\n\
             - Keystore: {}\n\
             - Remote: {}\n\
             - User: {}\n\
             \n\
             Run 'wgvault vault init' to create a master key.",
            state.wgvault_dir.display(),
            state.config_path.display(),
            state.keystore_path.display(),
            state.config.remote,
            state.config.user,
        ))
    }
}
