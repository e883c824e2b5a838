use crate::modules::jobs::domain::entities::ImportOperation;
use crate::modules::jobs::domain::repository::ImportHistorySource;
use crate::shared::application::pagination::{Page, PageRequest};
use crate::shared::errors::AppResult;
use crate::shared::infrastructure::{CommonHttpHandler, USER_AGENT};
use crate::shared::utils::logger::LogContext;
use async_trait::async_trait;
use std::time::Instant;

pub const IMPORTS_PATH: &str = "/api/imports";

/// Paginated `GET /api/imports?page=&size=`
pub struct HttpImportHistory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpImportHistory {
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
impl ImportHistorySource for HttpImportHistory {
    async fn fetch_page(&self, request: PageRequest) -> AppResult<Page<ImportOperation>> {
        let url = CommonHttpHandler::join_url(&self.base_url, IMPORTS_PATH);
        let start = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        LogContext::api_call(
            "GET",
            IMPORTS_PATH,
            status.as_str(),
            Some(start.elapsed().as_millis() as u64),
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommonHttpHandler::status_to_app_error(status, &body));
        }

        let text = response.text().await?;
        let page: Page<ImportOperation> = serde_json::from_str(&text)?;
        tracing::debug!(
            page = request.page,
            rows = page.content.len(),
            total_pages = page.total_pages,
            "import history fetched"
        );
        Ok(page)
    }
}
