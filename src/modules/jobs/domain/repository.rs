/// Read side of the import history
use crate::modules::jobs::domain::entities::ImportOperation;
use crate::shared::application::pagination::{Page, PageRequest};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[async_trait]
pub trait ImportHistorySource: Send + Sync {
    /// One page of operations, most recent first
    async fn fetch_page(&self, request: PageRequest) -> AppResult<Page<ImportOperation>>;
}
