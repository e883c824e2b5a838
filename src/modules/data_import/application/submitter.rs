use super::ports::{HistoryRefresh, ImportGateway};
use crate::modules::data_import::domain::{ImportOutcome, ValidatedBatch};
use crate::shared::application::{ImportEvent, ImportEventSink};
use crate::shared::utils::logger::TimedOperation;
use std::sync::Arc;

/// Sends validated batches to the import service and normalizes the answer.
///
/// Never retries. Every call ends with a history refresh, whatever the outcome.
pub struct ImportSubmitter {
    gateway: Arc<dyn ImportGateway>,
    history: Option<Arc<dyn HistoryRefresh>>,
    events: Arc<dyn ImportEventSink>,
}

impl ImportSubmitter {
    pub fn new(gateway: Arc<dyn ImportGateway>, events: Arc<dyn ImportEventSink>) -> Self {
        Self {
            gateway,
            history: None,
            events,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryRefresh>) -> Self {
        self.history = Some(history);
        self
    }

    pub async fn submit(&self, batch: &ValidatedBatch) -> ImportOutcome {
        let timer = TimedOperation::new("import submission");

        let outcome = match self.gateway.post_batch(batch).await {
            Ok(response) => ImportOutcome::from_response(response.status, &response.body),
            Err(e) => ImportOutcome::Failed {
                message: e.detail().to_string(),
            },
        };

        timer.finish_with_info(&format!("{} records", batch.len()));
        self.report(&outcome);

        if let Some(history) = &self.history {
            history.refresh_history().await;
        }

        outcome
    }

    fn report(&self, outcome: &ImportOutcome) {
        let event = match outcome {
            ImportOutcome::Accepted { created_count, .. } => ImportEvent::SubmissionAccepted {
                created_count: *created_count,
            },
            ImportOutcome::RejectedByValidation { items, .. } => {
                ImportEvent::SubmissionRejected { items: items.len() }
            }
            ImportOutcome::Failed { message } => ImportEvent::SubmissionFailed {
                message: message.clone(),
            },
        };
        self.events.emit(event);
    }
}
