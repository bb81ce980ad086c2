pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "wgvault")]
#[command(about = "Manage WireGuard peers with locally sealed private keys")]
pub struct Args {
    /// Base URL of the wireguard-ui server (defaults from config)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Username for API paths (defaults from config)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Path to the wgvault config directory (defaults to ~/.wgvault)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
