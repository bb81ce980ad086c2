use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use url::Url;

use common::crypto::PublicKey;

use super::error::ApiError;
use super::v1::peer::ListPeers;
use super::ApiRequest;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client);
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(response.json::<T::Response>().await?)
        } else {
            Err(ApiError::HttpStatus(
                response.status(),
                response.text().await?,
            ))
        }
    }

    /// Perform a request whose success response carries no body
    pub async fn call_unit<T: ApiRequest>(&self, request: T) -> Result<(), ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client);
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::HttpStatus(
                response.status(),
                response.text().await?,
            ))
        }
    }

    /// Resolve a peer name to its public key
    /// Returns the first peer with an exact name match
    pub async fn resolve_peer_name(&self, user: &str, name: &str) -> Result<PublicKey, ApiError> {
        let peers = self
            .call(ListPeers {
                user: user.to_string(),
            })
            .await?;

        peers
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.public_key)
            .ok_or_else(|| {
                ApiError::HttpStatus(
                    reqwest::StatusCode::NOT_FOUND,
                    format!("Peer not found: {}", name),
                )
            })
    }

    /// URL of the server-rendered config (`format=config`) or QR code
    /// (`format=qrcode`) for a peer
    pub fn format_url(
        &self,
        user: &str,
        public_key: &PublicKey,
        format: &str,
    ) -> Result<Url, ApiError> {
        let mut url = self.remote.join(&format!(
            "/api/v1/users/{}/clients/{}",
            user,
            public_key.to_hex()
        ))?;
        url.query_pairs_mut().append_pair("format", format);
        Ok(url)
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_url() {
        let client = ApiClient::new(&Url::parse("http://localhost:8080").unwrap()).unwrap();
        let key = common::crypto::SecretKey::generate().public();

        let url = client.format_url("alice", &key, "qrcode").unwrap();
        assert_eq!(
            url.path(),
            format!("/api/v1/users/alice/clients/{}", key.to_hex())
        );
        assert_eq!(url.query(), Some("format=qrcode"));

        let url = client.format_url("alice", &key, "config").unwrap();
        assert_eq!(url.query(), Some("format=config"));
    }
}
