use crate::modules::city::application::ports::ReferenceLookup;
use crate::modules::city::domain::{CoordinatesDetails, GovernorDetails};
use crate::shared::errors::AppResult;
use crate::shared::infrastructure::{CommonHttpHandler, USER_AGENT};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// `GET /api/coordinates/{id}` and `GET /api/humans/{id}` against the import service
pub struct HttpReferenceLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReferenceLookup {
    pub fn new(base_url: &str, timeout_secs: u64) -> AppResult<Self> {
        let client = CommonHttpHandler::create_http_client(timeout_secs, USER_AGENT)?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let url = CommonHttpHandler::join_url(&self.base_url, path);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Lookup {} failed: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Lookup {} returned {}", url, response.status());
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Lookup {} returned an unreadable body: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl ReferenceLookup for HttpReferenceLookup {
    async fn find_coordinates(&self, id: i64) -> Option<CoordinatesDetails> {
        self.fetch(&format!("/api/coordinates/{}", id)).await
    }

    async fn find_governor(&self, id: i64) -> Option<GovernorDetails> {
        self.fetch(&format!("/api/humans/{}", id)).await
    }
}
