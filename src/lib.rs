pub mod modules;
pub mod shared;

use modules::{
    city::{HttpReferenceLookup, ReferenceLookup},
    data_import::{
        HistoryRefresh, HttpImportGateway, ImportGateway, ImportSession, ImportSubmitter,
        ReferenceCheckService,
    },
    jobs::{
        BackgroundTask, ChangeNotifier, HttpImportHistory, ImportHistorySource, ImportJobTracker,
        IMPORTS_TOPIC,
    },
};
use shared::{
    application::{ImportEventSink, LogEventSink},
    AppConfig, AppResult,
};
use std::sync::Arc;
use std::time::Duration;

/// Every component of the import console, wired against one import service
pub struct ImportConsole {
    pub config: AppConfig,
    pub tracker: Arc<ImportJobTracker>,
    pub submitter: Arc<ImportSubmitter>,
    pub reference_checks: ReferenceCheckService,
    pub events: Arc<dyn ImportEventSink>,
}

impl ImportConsole {
    /// HTTP adapters for the configured base URL, events forwarded to the log
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let base_url = config.api_base_url.clone();
        let timeout = config.http_timeout_secs;

        let gateway: Arc<dyn ImportGateway> = Arc::new(HttpImportGateway::new(&base_url, timeout)?);
        let history: Arc<dyn ImportHistorySource> =
            Arc::new(HttpImportHistory::new(&base_url, timeout)?);
        let lookup: Arc<dyn ReferenceLookup> =
            Arc::new(HttpReferenceLookup::new(&base_url, timeout)?);

        Ok(Self::with_adapters(
            config,
            gateway,
            history,
            lookup,
            Arc::new(LogEventSink),
        ))
    }

    pub fn with_adapters(
        config: AppConfig,
        gateway: Arc<dyn ImportGateway>,
        history: Arc<dyn ImportHistorySource>,
        lookup: Arc<dyn ReferenceLookup>,
        events: Arc<dyn ImportEventSink>,
    ) -> Self {
        let tracker = Arc::new(ImportJobTracker::new(
            history,
            events.clone(),
            config.history_page_size,
        ));
        let refresh: Arc<dyn HistoryRefresh> = tracker.clone();
        let submitter =
            Arc::new(ImportSubmitter::new(gateway, events.clone()).with_history(refresh));

        Self {
            config,
            tracker,
            submitter,
            reference_checks: ReferenceCheckService::new(lookup),
            events,
        }
    }

    pub fn new_session(&self) -> ImportSession {
        ImportSession::new(self.submitter.clone(), self.events.clone())
    }

    /// Starts the notification listener when a notifier is given and, when
    /// configured, polling
    pub fn start_background(&self, notifier: Option<&dyn ChangeNotifier>) -> Vec<BackgroundTask> {
        let mut tasks = Vec::new();
        if let Some(notifier) = notifier {
            tasks.push(
                self.tracker
                    .watch(notifier, IMPORTS_TOPIC, self.config.notify_debounce),
            );
        }
        if let Some(interval) = self.config.poll_interval {
            tasks.push(self.tracker.spawn_polling(interval));
        }
        tasks
    }

    /// Resolves once the displayed history page has no unfinished jobs
    pub async fn wait_until_settled(&self, check_every: Duration) {
        while self.tracker.has_active_jobs().await {
            tokio::time::sleep(check_every).await;
        }
    }
}
