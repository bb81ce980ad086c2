use clap::{Args, Subcommand};

pub mod add;
pub mod ls;
pub mod rm;
pub mod set;
pub mod show;

use crate::cli::op::Op;

crate::command_enum! {
    (Ls, ls::Ls),
    (Show, show::Show),
    (Add, add::Add),
    (Set, set::Set),
    (Rm, rm::Rm),
}

// Rename the generated Command to PeerCommand for clarity
pub type PeerCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Peer {
    #[command(subcommand)]
    pub command: PeerCommand,
}

#[async_trait::async_trait]
impl Op for Peer {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// Parse a `--allowed-ips` flag value, accepting commas or newlines as
/// separators
pub(crate) fn parse_allowed_ips(text: &str) -> Option<Vec<common::net::IpNet>> {
    common::net::parse_cidr_lines(&text.replace(',', "\n"))
}
