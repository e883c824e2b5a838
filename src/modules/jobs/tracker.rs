/// Paginated view of the import history
///
/// The tracker owns the displayed page and reloads it on demand, after
/// submissions, on change notifications (debounced) and optionally on a
/// polling interval. Only the response to the most recent request is ever
/// applied; older responses are dropped when they arrive.
use crate::modules::data_import::application::ports::HistoryRefresh;
use crate::modules::jobs::domain::entities::{detect_transitions, ImportOperation};
use crate::modules::jobs::domain::notifications::ChangeNotifier;
use crate::modules::jobs::domain::repository::ImportHistorySource;
use crate::shared::application::pagination::{shown_range, PageRequest};
use crate::shared::application::{ImportEvent, ImportEventSink};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_warn};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Upper bound on consecutive out-of-range corrections for one request
const MAX_PAGE_CORRECTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug)]
struct TrackerState {
    page: u32,
    size: u32,
    total_pages: u32,
    total_elements: u64,
    rows: Vec<ImportOperation>,
    /// Page and size the displayed rows were fetched with
    shown: PageRequest,
    fetch: FetchState,
    latest_seq: u64,
}

impl TrackerState {
    fn point_at_shown_rows(&mut self) {
        self.page = self.shown.page;
        self.size = self.shown.size;
    }
}

/// Snapshot of what the history currently displays
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub rows: Vec<ImportOperation>,
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub fetch: FetchState,
    pub is_first: bool,
    pub is_last: bool,
    /// 1-based first shown row, 0 when empty
    pub from: u64,
    /// 1-based last shown row, 0 when empty
    pub to: u64,
}

pub struct ImportJobTracker {
    source: Arc<dyn ImportHistorySource>,
    events: Arc<dyn ImportEventSink>,
    state: Mutex<TrackerState>,
}

impl ImportJobTracker {
    pub fn new(
        source: Arc<dyn ImportHistorySource>,
        events: Arc<dyn ImportEventSink>,
        page_size: u32,
    ) -> Self {
        let size = page_size.max(1);
        Self {
            source,
            events,
            state: Mutex::new(TrackerState {
                page: 0,
                size,
                total_pages: 0,
                total_elements: 0,
                rows: Vec::new(),
                shown: PageRequest::new(0, size),
                fetch: FetchState::Idle,
                latest_seq: 0,
            }),
        }
    }

    /// Reloads the current page
    pub async fn refresh(&self) -> AppResult<()> {
        let request = {
            let state = self.state.lock().await;
            PageRequest::new(state.page, state.size)
        };
        self.load(request).await
    }

    pub async fn go_to_page(&self, page: u32) -> AppResult<()> {
        let size = self.state.lock().await.size;
        self.load(PageRequest::new(page, size)).await
    }

    /// No-op on the last page
    pub async fn next_page(&self) -> AppResult<()> {
        let request = {
            let state = self.state.lock().await;
            if is_last(state.page, state.total_pages) {
                return Ok(());
            }
            PageRequest::new(state.page + 1, state.size)
        };
        self.load(request).await
    }

    /// No-op on the first page
    pub async fn previous_page(&self) -> AppResult<()> {
        let request = {
            let state = self.state.lock().await;
            if state.page == 0 {
                return Ok(());
            }
            PageRequest::new(state.page - 1, state.size)
        };
        self.load(request).await
    }

    /// Changes the page size and goes back to the first page
    pub async fn set_page_size(&self, size: u32) -> AppResult<()> {
        self.open_page(0, size).await
    }

    /// Shows `page` at `size` rows per page with a single fetch
    pub async fn open_page(&self, page: u32, size: u32) -> AppResult<()> {
        if size == 0 {
            return Err(AppError::InvalidInput(
                "Page size must be greater than 0".to_string(),
            ));
        }
        self.load(PageRequest::new(page, size)).await
    }

    pub async fn view(&self) -> HistoryView {
        let state = self.state.lock().await;
        let (from, to) = shown_range(state.page, state.size, state.total_elements);
        HistoryView {
            rows: state.rows.clone(),
            page: state.page,
            size: state.size,
            total_pages: state.total_pages,
            total_elements: state.total_elements,
            fetch: state.fetch.clone(),
            is_first: state.page == 0,
            is_last: is_last(state.page, state.total_pages),
            from,
            to,
        }
    }

    /// True while the displayed page holds an operation that has not finished
    pub async fn has_active_jobs(&self) -> bool {
        self.state
            .lock()
            .await
            .rows
            .iter()
            .any(|op| !op.is_finished())
    }

    async fn load(&self, mut request: PageRequest) -> AppResult<()> {
        let mut seq = 0;
        for _ in 0..=MAX_PAGE_CORRECTIONS {
            seq = {
                let mut state = self.state.lock().await;
                state.latest_seq += 1;
                state.page = request.page;
                state.size = request.size;
                state.fetch = FetchState::Loading;
                state.latest_seq
            };

            let timer = TimedOperation::new("import history fetch");
            let result = self.source.fetch_page(request).await;
            timer.finish();

            let mut state = self.state.lock().await;
            if seq != state.latest_seq {
                self.events.emit(ImportEvent::StaleHistoryDiscarded {
                    page: request.page,
                    seq,
                });
                return Ok(());
            }

            let page = match result {
                Ok(page) => page,
                Err(e) => {
                    LogContext::error_with_context(&e, "Import history fetch failed");
                    // rows of the previous page stay visible
                    state.point_at_shown_rows();
                    state.fetch = FetchState::Error(e.detail().to_string());
                    self.events.emit(ImportEvent::HistoryFetchFailed {
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            };

            if page.is_out_of_range(request.page) {
                let last = page.last_page_index().unwrap_or(0);
                self.events.emit(ImportEvent::PageCorrected {
                    requested: request.page,
                    corrected: last,
                });
                state.page = last;
                state.total_pages = page.total_pages;
                state.total_elements = page.total_elements;
                request = PageRequest::new(last, request.size);
                continue;
            }

            if page.total_pages == 0 {
                request = PageRequest::new(0, request.size);
            }

            let transitions = detect_transitions(&state.rows, &page.content);
            state.page = request.page;
            state.shown = request;
            state.rows = page.content;
            state.total_pages = page.total_pages;
            state.total_elements = page.total_elements;
            state.fetch = FetchState::Loaded;

            self.events.emit(ImportEvent::HistoryLoaded {
                page: request.page,
                total_pages: state.total_pages,
                rows: state.rows.len(),
            });
            for transition in transitions {
                if !transition.is_allowed() {
                    log_warn!(
                        "Import operation {} changed from {} to {}",
                        transition.id,
                        transition.from,
                        transition.to
                    );
                }
                if transition.is_completion() {
                    self.events.emit(ImportEvent::JobFinished {
                        id: transition.id,
                        status: transition.to,
                    });
                }
            }
            return Ok(());
        }

        let mut state = self.state.lock().await;
        if seq != state.latest_seq {
            return Ok(());
        }
        log_warn!(
            "History page kept moving out of range, giving up at page {}",
            request.page
        );
        let message = "History changed while paging".to_string();
        state.point_at_shown_rows();
        state.fetch = FetchState::Error(message.clone());
        self.events
            .emit(ImportEvent::HistoryFetchFailed { message: message.clone() });
        Err(AppError::ApiError(message))
    }

    /// Refreshes after change signals on `topic`, once the signals have been
    /// quiet for `debounce`. Stops when the returned task is shut down.
    pub fn watch(
        self: &Arc<Self>,
        notifier: &dyn ChangeNotifier,
        topic: &str,
        debounce: Duration,
    ) -> BackgroundTask {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let subscription = notifier.subscribe(
            topic,
            Box::new(move || {
                let _ = tx.send(());
            }),
        );

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tracker = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let _subscription = subscription;
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    signal = rx.recv() => {
                        if signal.is_none() {
                            break;
                        }
                        // each new signal restarts the quiet period
                        loop {
                            tokio::select! {
                                _ = cancelled.cancelled() => return,
                                _ = tokio::time::sleep(debounce) => break,
                                more = rx.recv() => {
                                    if more.is_none() {
                                        break;
                                    }
                                }
                            }
                        }
                        log_debug!("Change signal settled, refreshing import history");
                        // failures are recorded in the view state
                        let _ = tracker.refresh().await;
                    }
                }
            }
        });

        BackgroundTask { token, handle }
    }

    /// Refreshes every `interval` while the displayed page has unfinished jobs
    pub fn spawn_polling(self: &Arc<Self>, interval: Duration) -> BackgroundTask {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tracker = Arc::clone(self);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        if tracker.has_active_jobs().await {
                            let _ = tracker.refresh().await;
                        }
                    }
                }
            }
        });

        BackgroundTask { token, handle }
    }
}

#[async_trait]
impl HistoryRefresh for ImportJobTracker {
    async fn refresh_history(&self) {
        if let Err(e) = self.refresh().await {
            log_debug!("History refresh after submission failed: {}", e);
        }
    }
}

fn is_last(page: u32, total_pages: u32) -> bool {
    page >= total_pages.saturating_sub(1)
}

/// Handle of a spawned tracker loop; dropping it stops the loop
pub struct BackgroundTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl BackgroundTask {
    /// Stops the loop and waits for it to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();
        let _ = (&mut self.handle).await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for BackgroundTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
