use reqwest::{Client, RequestBuilder, Url};

use crate::api::ApiRequest;

use super::Peer;

/// `GET /api/v1/users/{user}/clients`
#[derive(Debug, Clone)]
pub struct ListPeers {
    pub user: String,
}

impl ApiRequest for ListPeers {
    type Response = Vec<Peer>;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v1/users/{}/clients", self.user))
            .unwrap();
        client.get(full_url)
    }
}
