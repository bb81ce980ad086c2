use clap::Args;

use crate::cli::op::SessionError;

#[derive(Args, Debug, Clone)]
pub struct Open {
    /// Hex ciphertext envelope produced by 'vault seal'
    pub envelope: String,

    /// Print the plaintext as hex instead of UTF-8 text
    #[arg(long)]
    pub hex: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VaultOpenError {
    #[error("invalid hex envelope: {0}")]
    HexDecode(#[from] hex::FromHexError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("keychain error: {0}")]
    Keychain(#[from] common::crypto::KeychainError),
    #[error("plaintext is not valid UTF-8; pass --hex to print it anyway")]
    NotText,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Open {
    type Error = VaultOpenError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let envelope = hex::decode(&self.envelope)?;

        ctx.unlock_keychain()?;
        let plaintext = ctx.keychain.decrypt(&envelope)?;

        if self.hex {
            Ok(hex::encode(plaintext))
        } else {
            String::from_utf8(plaintext).map_err(|_| VaultOpenError::NotText)
        }
    }
}
