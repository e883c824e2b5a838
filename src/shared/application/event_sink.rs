/// Injectable sink for import lifecycle events
///
/// Components report what happened through this port instead of logging
/// directly, so tests can assert on the emitted events.
use crate::modules::jobs::domain::entities::ImportStatus;
use crate::{log_debug, log_info, log_warn};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    BatchValidated { records: usize, diagnostics: usize },
    SubmissionBlocked { diagnostics: usize },
    SubmissionAccepted { created_count: Option<u32> },
    SubmissionRejected { items: usize },
    SubmissionFailed { message: String },
    HistoryLoaded { page: u32, total_pages: u32, rows: usize },
    HistoryFetchFailed { message: String },
    StaleHistoryDiscarded { page: u32, seq: u64 },
    PageCorrected { requested: u32, corrected: u32 },
    JobFinished { id: i64, status: ImportStatus },
}

pub trait ImportEventSink: Send + Sync {
    fn emit(&self, event: ImportEvent);
}

/// Forwards events to the process log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl ImportEventSink for LogEventSink {
    fn emit(&self, event: ImportEvent) {
        match event {
            ImportEvent::BatchValidated {
                records,
                diagnostics,
            } => log_info!(
                "Validated batch of {} records: {} diagnostics",
                records,
                diagnostics
            ),
            ImportEvent::SubmissionBlocked { diagnostics } => {
                log_warn!("Submission blocked by {} local diagnostics", diagnostics)
            }
            ImportEvent::SubmissionAccepted { created_count } => match created_count {
                Some(count) => log_info!("Import accepted, {} cities created", count),
                None => log_info!("Import accepted for processing"),
            },
            ImportEvent::SubmissionRejected { items } => {
                log_warn!("Import rejected by server validation ({} items)", items)
            }
            ImportEvent::SubmissionFailed { message } => log_warn!("Import failed: {}", message),
            ImportEvent::HistoryLoaded {
                page,
                total_pages,
                rows,
            } => log_debug!(
                "History page {}/{} loaded ({} rows)",
                page + 1,
                total_pages,
                rows
            ),
            ImportEvent::HistoryFetchFailed { message } => {
                log_warn!("History fetch failed: {}", message)
            }
            ImportEvent::StaleHistoryDiscarded { page, seq } => {
                log_debug!("Discarded stale history response for page {} (#{})", page, seq)
            }
            ImportEvent::PageCorrected {
                requested,
                corrected,
            } => log_debug!(
                "History page {} out of range, moved to {}",
                requested,
                corrected
            ),
            ImportEvent::JobFinished { id, status } => {
                log_info!("Import operation {} finished with {}", id, status)
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ImportEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ImportEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count_where(&self, predicate: impl Fn(&ImportEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl ImportEventSink for RecordingEventSink {
    fn emit(&self, event: ImportEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
