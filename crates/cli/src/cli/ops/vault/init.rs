use clap::Args;

use wgvault_cli::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Replace an existing master key
    ///
    /// Everything sealed under the old key becomes unrecoverable; the
    /// stored sealed peer keys are dropped.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VaultInitError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("a master key already exists; pass --force to replace it")]
    AlreadyExists,
    #[error("failed to read passphrase: {0}")]
    Prompt(#[from] std::io::Error),
    #[error("passphrase must not be empty")]
    EmptyPassphrase,
    #[error("passphrases do not match")]
    Mismatch,
    #[error("keychain error: {0}")]
    Keychain(#[from] common::crypto::KeychainError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = VaultInitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut state = AppState::load(ctx.config_path.clone())?;

        if state.keystore.wrapped_key.is_some() && !self.force {
            return Err(VaultInitError::AlreadyExists);
        }

        let passphrase = rpassword::prompt_password("New passphrase: ")?;
        if passphrase.is_empty() {
            return Err(VaultInitError::EmptyPassphrase);
        }
        let confirm = rpassword::prompt_password("Confirm passphrase: ")?;
        if passphrase != confirm {
            return Err(VaultInitError::Mismatch);
        }

        let wrapped = ctx.keychain.init(passphrase.as_bytes())?;

        state.keystore.wrapped_key = Some(wrapped.to_hex());
        // keys sealed under a replaced master key can never be opened again
        state.keystore.keys.clear();
        state.save_keystore()?;

        Ok(format!(
            "Master key created and sealed into the keystore.\n\
             Wrapped key (useless without the passphrase):\n\
             {}",
            wrapped.to_hex()
        ))
    }
}
