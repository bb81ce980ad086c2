use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;

use crate::api::ApiRequest;

#[derive(Debug, Clone)]
pub struct WhoamiRequest;

/// The server reports the identity it resolved from the auth headers
#[derive(Debug, Clone, Deserialize)]
pub struct WhoamiResponse {
    #[serde(rename = "User")]
    pub user: String,
}

impl ApiRequest for WhoamiRequest {
    type Response = WhoamiResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v1/whoami").unwrap();
        client.get(full_url)
    }
}
