pub mod peer;
pub mod whoami;
