use reqwest::{Client, RequestBuilder, Url};

use crate::api::ApiRequest;

use super::{Peer, PeerForm};

/// `POST /api/v1/users/{user}/clients`
#[derive(Debug, Clone)]
pub struct CreatePeer {
    pub user: String,
    pub form: PeerForm,
}

impl ApiRequest for CreatePeer {
    type Response = Peer;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v1/users/{}/clients", self.user))
            .unwrap();
        client.post(full_url).json(&self.form)
    }
}
