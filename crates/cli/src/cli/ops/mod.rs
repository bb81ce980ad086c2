pub mod health;
pub mod init;
pub mod peer;
pub mod vault;
pub mod version;
pub mod whoami;

pub use health::Health;
pub use init::Init;
pub use peer::Peer;
pub use vault::Vault;
pub use version::Version;
pub use whoami::Whoami;
