#[allow(clippy::module_inception)]
mod client;
mod error;
pub mod v1;

pub use client::ApiClient;
pub use error::ApiError;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// One REST operation against the wireguard-ui server.
///
/// Implementors own their request payload and know how to place it on the
/// wire; the client only supplies the base URL and the HTTP client.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder;
}
