use std::error::Error;
use std::path::PathBuf;

use url::Url;

use common::crypto::{Keychain, KeychainError, WrappedKeyError};
use wgvault_cli::api::{ApiClient, ApiError};
use wgvault_cli::state::{AppState, StateError, DEFAULT_REMOTE, DEFAULT_USER};

/// Resolve the remote URL for the API client.
///
/// Priority: explicit `--remote` flag > config file `remote` > hardcoded default.
pub fn resolve_remote(explicit: Option<Url>, config_path: Option<PathBuf>) -> Url {
    if let Some(url) = explicit {
        return url;
    }
    if let Ok(state) = AppState::load(config_path) {
        if let Ok(url) = Url::parse(&state.config.remote) {
            return url;
        }
    }
    Url::parse(DEFAULT_REMOTE).expect("hardcoded URL must parse")
}

/// Resolve the username for API paths.
///
/// Priority: explicit `--user` flag > config file `user` > "anonymous".
pub fn resolve_user(explicit: Option<String>, config_path: Option<PathBuf>) -> String {
    if let Some(user) = explicit {
        return user;
    }
    if let Ok(state) = AppState::load(config_path) {
        return state.config.user;
    }
    DEFAULT_USER.to_string()
}

/// Errors opening the vault session for an op
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("no master key in keystore. Run 'wgvault vault init' first")]
    NoVault,
    #[error("invalid wrapped key in keystore: {0}")]
    WrappedKey(#[from] WrappedKeyError),
    #[error("keychain error: {0}")]
    Keychain(#[from] KeychainError),
    #[error("failed to read passphrase: {0}")]
    Prompt(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct OpContext {
    /// API client (always initialized with default or custom URL)
    pub client: ApiClient,
    /// Username for API paths
    pub user: String,
    /// Optional custom config path (defaults to ~/.wgvault)
    pub config_path: Option<PathBuf>,
    /// Vault session for this invocation, locked until an op needs it
    pub keychain: Keychain,
}

impl OpContext {
    /// Create context with custom remote URL, user, and optional config path
    pub fn new(remote: Url, user: String, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(&remote)?,
            user,
            config_path,
            keychain: Keychain::new(),
        })
    }

    /// Unlock the session keychain from the stored wrapped key, prompting
    /// for the passphrase
    ///
    /// A no-op when the session is already unlocked, so several sealing
    /// steps in one invocation prompt at most once.
    pub fn unlock_keychain(&self) -> Result<(), SessionError> {
        if self.keychain.is_unlocked() {
            return Ok(());
        }

        let state = AppState::load(self.config_path.clone())?;
        let wrapped_hex = state.keystore.wrapped_key.ok_or(SessionError::NoVault)?;
        let wrapped = common::crypto::WrappedKey::from_hex(&wrapped_hex)?;
        tracing::debug!("unlocking session keychain from stored wrapped key");

        let passphrase = rpassword::prompt_password("Passphrase: ")?;
        self.keychain.unlock(wrapped.as_bytes(), passphrase.as_bytes())?;

        Ok(())
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_remote_explicit_wins() {
        let explicit = Url::parse("http://example.com:9999").unwrap();
        let result = resolve_remote(Some(explicit.clone()), None);
        assert_eq!(result, explicit);
    }

    #[test]
    fn test_resolve_remote_falls_back_to_default() {
        // No explicit URL, no valid config path -> hardcoded default
        let result = resolve_remote(None, Some(PathBuf::from("/nonexistent")));
        assert_eq!(result.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_resolve_user_explicit_wins() {
        let result = resolve_user(
            Some("alice".to_string()),
            Some(PathBuf::from("/nonexistent")),
        );
        assert_eq!(result, "alice");
    }

    #[test]
    fn test_resolve_user_falls_back_to_anonymous() {
        let result = resolve_user(None, Some(PathBuf::from("/nonexistent")));
        assert_eq!(result, "anonymous");
    }
}
