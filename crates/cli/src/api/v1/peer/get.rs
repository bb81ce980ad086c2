use reqwest::{Client, RequestBuilder, Url};

use common::crypto::PublicKey;

use crate::api::ApiRequest;

use super::Peer;

/// `GET /api/v1/users/{user}/clients/{publicKey}`
#[derive(Debug, Clone)]
pub struct GetPeer {
    pub user: String,
    pub public_key: PublicKey,
}

impl ApiRequest for GetPeer {
    type Response = Peer;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!(
                "/api/v1/users/{}/clients/{}",
                self.user,
                self.public_key.to_hex()
            ))
            .unwrap();
        client.get(full_url)
    }
}
