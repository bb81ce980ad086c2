use reqwest::{Client, RequestBuilder, Url};

use crate::api::ApiRequest;

use super::{Peer, PeerForm};

/// `PUT /api/v1/users/{user}/clients/{publicKey}`
///
/// The server reads the peer identity from the body, so the form's public
/// key must match the one in the path. Updates replace fields wholesale.
#[derive(Debug, Clone)]
pub struct UpdatePeer {
    pub user: String,
    pub form: PeerForm,
}

impl ApiRequest for UpdatePeer {
    type Response = Peer;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!(
                "/api/v1/users/{}/clients/{}",
                self.user,
                self.form.public_key.to_hex()
            ))
            .unwrap();
        client.put(full_url).json(&self.form)
    }
}
