use super::payload::batch_to_json;
use crate::modules::data_import::application::ports::{GatewayResponse, ImportGateway};
use crate::modules::data_import::domain::ValidatedBatch;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::{CommonHttpHandler, USER_AGENT};
use crate::shared::utils::logger::LogContext;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Instant;

pub const IMPORT_PATH: &str = "/api/cities/import";
const UPLOAD_FILE_NAME: &str = "cities.json";

/// Multipart upload of a batch to `POST /api/cities/import`
pub struct HttpImportGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImportGateway {
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
}

#[async_trait]
impl ImportGateway for HttpImportGateway {
    async fn post_batch(&self, batch: &ValidatedBatch) -> AppResult<GatewayResponse> {
        let body = batch_to_json(batch)?;
        let part = Part::bytes(body)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("application/json")
            .map_err(|e| AppError::InternalError(format!("Invalid upload part: {}", e)))?;
        let form = Form::new().part("file", part);

        let url = CommonHttpHandler::join_url(&self.base_url, IMPORT_PATH);
        LogContext::api_call("POST", IMPORT_PATH, "", None);
        let start = Instant::now();

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        LogContext::api_call(
            "POST",
            IMPORT_PATH,
            status.as_str(),
            Some(start.elapsed().as_millis() as u64),
        );
        tracing::debug!(records = batch.len(), status = status.as_u16(), "import upload finished");

        Ok(GatewayResponse::new(status.as_u16(), text))
    }
}
