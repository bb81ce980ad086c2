use clap::Args;

use wgvault_cli::api::v1::whoami::WhoamiRequest;
use wgvault_cli::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        // 1. Check config directory
        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:     {}", state.wgvault_dir.display()));
                lines.push("  config.toml:   OK".to_string());
                lines.push("  keystore.toml: OK".to_string());
                let vault = if state.keystore.wrapped_key.is_some() {
                    "initialized"
                } else {
                    "not initialized"
                };
                lines.push(format!("  vault:         {}", vault));
                lines.push(format!("  sealed keys:   {}", state.keystore.keys.len()));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check server reachability
        lines.push(String::new());
        lines.push(format!("Server ({}):", ctx.client.base_url()));

        match ctx.client.call(WhoamiRequest).await {
            Ok(response) => {
                lines.push("  reachable: OK".to_string());
                lines.push(format!("  identity:  {}", response.user));
            }
            Err(e) => {
                lines.push(format!("  reachable: NOT REACHABLE ({})", e));
            }
        }

        Ok(lines.join("\n"))
    }
}
