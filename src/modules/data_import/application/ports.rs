use crate::modules::data_import::domain::ValidatedBatch;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Raw answer of the import endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport to the import endpoint.
///
/// `Err` means the request never produced an HTTP answer; every answer,
/// including 4xx/5xx, is returned as `Ok`.
#[async_trait]
pub trait ImportGateway: Send + Sync {
    async fn post_batch(&self, batch: &ValidatedBatch) -> AppResult<GatewayResponse>;
}

/// Anything that shows the import history and must reload after a submission
#[async_trait]
pub trait HistoryRefresh: Send + Sync {
    async fn refresh_history(&self);
}
