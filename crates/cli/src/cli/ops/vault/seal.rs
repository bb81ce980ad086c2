use clap::Args;

use crate::cli::op::SessionError;

#[derive(Args, Debug, Clone)]
pub struct Seal {
    /// Data to seal, treated as UTF-8 text unless --hex
    pub data: String,

    /// Interpret the data argument as hex bytes
    #[arg(long)]
    pub hex: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VaultSealError {
    #[error("invalid hex data: {0}")]
    HexDecode(#[from] hex::FromHexError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("keychain error: {0}")]
    Keychain(#[from] common::crypto::KeychainError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Seal {
    type Error = VaultSealError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let plaintext = if self.hex {
            hex::decode(&self.data)?
        } else {
            self.data.clone().into_bytes()
        };

        ctx.unlock_keychain()?;
        let envelope = ctx.keychain.encrypt(&plaintext)?;

        Ok(hex::encode(envelope))
    }
}
