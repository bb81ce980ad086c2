use reqwest::{Client, RequestBuilder, Url};

use common::crypto::PublicKey;

use crate::api::ApiRequest;

/// `DELETE /api/v1/users/{user}/clients/{publicKey}`
///
/// A successful delete returns an empty 200; call via
/// [`ApiClient::call_unit`](crate::api::ApiClient::call_unit).
#[derive(Debug, Clone)]
pub struct DeletePeer {
    pub user: String,
    pub public_key: PublicKey,
}

impl ApiRequest for DeletePeer {
    type Response = ();

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!(
                "/api/v1/users/{}/clients/{}",
                self.user,
                self.public_key.to_hex()
            ))
            .unwrap();
        client.delete(full_url)
    }
}
