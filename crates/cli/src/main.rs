// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::{args::Args, op::Op, Health, Init, Peer, Vault, Version, Whoami};

command_enum! {
    (Init, Init),
    (Health, Health),
    (Whoami, Whoami),
    (Peer, Peer),
    (Vault, Vault),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();

    // Resolve remote URL and user: explicit flag > config file > defaults
    let remote = cli::op::resolve_remote(args.remote, args.config_path.clone());
    let user = cli::op::resolve_user(args.user, args.config_path.clone());

    // Build context - always has API client initialized
    let ctx = match cli::op::OpContext::new(remote, user, args.config_path) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
