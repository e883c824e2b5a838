/// Import history tracking
///
/// Tests cover:
/// - Out-of-range page correction
/// - Discarding stale responses
/// - Failure handling and navigation bounds
/// - Debounced refresh on change signals and polling
mod utils;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use urbis_lib::modules::data_import::{
    BatchValidator, GatewayResponse, HistoryRefresh, ImportGateway, ImportSubmitter,
    ValidatedBatch,
};
use urbis_lib::modules::jobs::{
    BroadcastChangeNotifier, FetchState, ImportJobTracker, ImportStatus, IMPORTS_TOPIC,
};
use urbis_lib::shared::application::{ImportEvent, RecordingEventSink};
use urbis_lib::shared::{AppConfig, AppError, AppResult};
use urbis_lib::ImportConsole;
use utils::factories::{finished_operations, operation};
use utils::fakes::{FakeHistory, FakeLookup, ShrinkingHistory};

struct AcceptingGateway;

#[async_trait]
impl ImportGateway for AcceptingGateway {
    async fn post_batch(&self, _batch: &ValidatedBatch) -> AppResult<GatewayResponse> {
        Ok(GatewayResponse::new(202, ""))
    }
}

fn tracker_with(
    history: Arc<FakeHistory>,
    page_size: u32,
) -> (Arc<ImportJobTracker>, Arc<RecordingEventSink>) {
    let events = Arc::new(RecordingEventSink::new());
    let tracker = Arc::new(ImportJobTracker::new(history, events.clone(), page_size));
    (tracker, events)
}

// ================================================================================================
// PAGINATION
// ================================================================================================

#[tokio::test]
async fn out_of_range_page_is_corrected_to_last_page() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(25)));
    let (tracker, events) = tracker_with(history.clone(), 10);

    tracker.go_to_page(5).await.unwrap();

    assert_eq!(history.requested_pages(), vec![5, 2]);
    let view = tracker.view().await;
    assert_eq!(view.page, 2);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.rows.len(), 5);
    assert_eq!((view.from, view.to), (21, 25));
    assert!(view.is_last);
    assert!(events.events().contains(&ImportEvent::PageCorrected {
        requested: 5,
        corrected: 2
    }));
}

#[tokio::test]
async fn empty_history_stays_on_first_page() {
    let history = Arc::new(FakeHistory::default());
    let (tracker, _) = tracker_with(history.clone(), 10);

    tracker.go_to_page(3).await.unwrap();

    let view = tracker.view().await;
    assert_eq!(history.requested_pages(), vec![3]);
    assert_eq!(view.page, 0);
    assert_eq!(view.total_pages, 0);
    assert_eq!((view.from, view.to), (0, 0));
    assert!(view.is_last);
    assert_eq!(view.fetch, FetchState::Loaded);
}

#[tokio::test]
async fn navigation_stops_at_bounds() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(12)));
    let (tracker, _) = tracker_with(history.clone(), 5);

    tracker.refresh().await.unwrap();
    tracker.previous_page().await.unwrap();
    assert_eq!(history.requested_pages(), vec![0], "no fetch before the first page");

    tracker.next_page().await.unwrap();
    tracker.next_page().await.unwrap();
    tracker.next_page().await.unwrap();
    assert_eq!(history.requested_pages(), vec![0, 1, 2]);

    let view = tracker.view().await;
    assert_eq!(view.page, 2);
    assert!(view.is_last);
    assert!(!view.is_first);
}

#[tokio::test]
async fn far_page_requests_keep_page_arithmetic_in_bounds() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(25)));
    let (tracker, _) = tracker_with(history.clone(), 10);
    tracker.refresh().await.unwrap();

    history.set_failing(true);
    assert_err!(tracker.go_to_page(u32::MAX).await);
    let view = tracker.view().await;
    assert_eq!(view.page, 0);
    assert!(!view.is_last);

    history.set_failing(false);
    tracker.next_page().await.unwrap();
    assert_eq!(tracker.view().await.page, 1);

    let empty = Arc::new(FakeHistory::default());
    let (tracker, _) = tracker_with(empty, 10);
    tracker.go_to_page(u32::MAX).await.unwrap();
    let view = tracker.view().await;
    assert_eq!(view.page, 0);
    assert!(view.is_last);
    tracker.next_page().await.unwrap();
}

#[tokio::test]
async fn opening_a_page_with_a_new_size_fetches_once() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(30)));
    let (tracker, _) = tracker_with(history.clone(), 10);

    tracker.open_page(2, 5).await.unwrap();

    let calls = history.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!((calls[0].page, calls[0].size), (2, 5));
    let view = tracker.view().await;
    assert_eq!((view.page, view.size), (2, 5));
    assert_eq!((view.from, view.to), (11, 15));
    assert_err!(tracker.open_page(0, 0).await);
}

#[tokio::test]
async fn changing_page_size_returns_to_first_page() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(30)));
    let (tracker, _) = tracker_with(history.clone(), 10);

    tracker.go_to_page(2).await.unwrap();
    tracker.set_page_size(25).await.unwrap();

    let view = tracker.view().await;
    assert_eq!(view.page, 0);
    assert_eq!(view.size, 25);
    assert_eq!(view.rows.len(), 25);
    assert!(matches!(
        tracker.set_page_size(0).await,
        Err(AppError::InvalidInput(_))
    ));
}

// ================================================================================================
// ORDERING AND FAILURES
// ================================================================================================

#[tokio::test]
async fn stale_response_does_not_overwrite_newer_page() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(25)));
    let (tracker, events) = tracker_with(history.clone(), 10);
    let release_page_one = history.hold_page(1);

    let slow = {
        let tracker = Arc::clone(&tracker);
        tokio::spawn(async move { tracker.go_to_page(1).await })
    };
    while !history.requested_pages().contains(&1) {
        tokio::task::yield_now().await;
    }

    tracker.go_to_page(2).await.unwrap();
    let page_two = tracker.view().await;

    release_page_one.send(()).unwrap();
    assert_ok!(slow.await.unwrap());

    let view = tracker.view().await;
    assert_eq!(view.page, 2);
    assert_eq!(view.rows, page_two.rows);
    assert_eq!(view.fetch, FetchState::Loaded);
    assert_eq!(
        events.count_where(|e| matches!(e, ImportEvent::StaleHistoryDiscarded { page: 1, .. })),
        1
    );
}

#[tokio::test]
async fn failed_fetch_keeps_previous_rows() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(8)));
    let (tracker, events) = tracker_with(history.clone(), 10);
    tracker.refresh().await.unwrap();
    let before = tracker.view().await;

    history.set_failing(true);
    assert_err!(tracker.refresh().await);

    let view = tracker.view().await;
    assert_eq!(view.rows, before.rows);
    assert!(matches!(view.fetch, FetchState::Error(_)));
    assert_eq!(
        events.count_where(|e| matches!(e, ImportEvent::HistoryFetchFailed { .. })),
        1
    );

    history.set_failing(false);
    assert_ok!(tracker.refresh().await);
    assert_eq!(tracker.view().await.fetch, FetchState::Loaded);
}

#[tokio::test]
async fn failed_navigation_keeps_range_in_line_with_rows() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(25)));
    let (tracker, _) = tracker_with(history.clone(), 10);
    tracker.refresh().await.unwrap();
    let before = tracker.view().await;

    history.set_failing(true);
    assert_err!(tracker.go_to_page(2).await);

    let view = tracker.view().await;
    assert_eq!(view.rows, before.rows);
    assert_eq!(view.page, 0);
    assert_eq!((view.from, view.to), (1, 10));
    assert!(matches!(view.fetch, FetchState::Error(_)));
}

#[tokio::test]
async fn paging_gives_up_when_history_keeps_shrinking() {
    let history = Arc::new(ShrinkingHistory::default());
    let events = Arc::new(RecordingEventSink::new());
    let tracker = ImportJobTracker::new(history.clone(), events.clone(), 10);

    assert_err!(tracker.go_to_page(10).await);

    assert_eq!(history.requested_pages(), vec![10, 9, 8, 7]);
    assert_eq!(
        events.count_where(|e| matches!(e, ImportEvent::PageCorrected { .. })),
        4
    );
    let view = tracker.view().await;
    assert_eq!(view.page, 0);
    assert!(matches!(view.fetch, FetchState::Error(_)));
    assert_eq!(
        events.count_where(|e| matches!(e, ImportEvent::HistoryFetchFailed { .. })),
        1
    );
}

#[tokio::test]
async fn finished_jobs_are_reported_once() {
    let history = Arc::new(FakeHistory::with_operations(vec![
        operation(2, ImportStatus::Running),
        operation(1, ImportStatus::Success),
    ]));
    let (tracker, events) = tracker_with(history.clone(), 10);
    tracker.refresh().await.unwrap();
    assert!(tracker.has_active_jobs().await);

    history.set_operations(vec![
        operation(2, ImportStatus::Failed),
        operation(1, ImportStatus::Success),
    ]);
    tracker.refresh().await.unwrap();
    tracker.refresh().await.unwrap();

    let finished: Vec<_> = events
        .events()
        .into_iter()
        .filter(|e| matches!(e, ImportEvent::JobFinished { .. }))
        .collect();
    assert_eq!(
        finished,
        vec![ImportEvent::JobFinished {
            id: 2,
            status: ImportStatus::Failed
        }]
    );
    assert!(!tracker.has_active_jobs().await);
}

#[tokio::test]
async fn submission_triggers_history_refresh() {
    let history = Arc::new(FakeHistory::with_operations(vec![operation(
        1,
        ImportStatus::Running,
    )]));
    let (tracker, events) = tracker_with(history.clone(), 10);
    let refresh: Arc<dyn HistoryRefresh> = tracker.clone();
    let submitter = ImportSubmitter::new(Arc::new(AcceptingGateway), events).with_history(refresh);

    let batch = BatchValidator::validate_records(&[]).into_validated().unwrap();
    submitter.submit(&batch).await;

    assert_eq!(history.calls().len(), 1);
    assert_eq!(tracker.view().await.rows.len(), 1);
}

// ================================================================================================
// BACKGROUND REFRESH
// ================================================================================================

#[tokio::test(start_paused = true)]
async fn rapid_signals_are_coalesced_into_one_refresh() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(3)));
    let (tracker, _) = tracker_with(history.clone(), 10);
    let notifier = BroadcastChangeNotifier::default();
    let task = tracker.watch(&notifier, IMPORTS_TOPIC, Duration::from_millis(250));

    for _ in 0..5 {
        notifier.publish(IMPORTS_TOPIC, "{\"entity\":\"import\"}");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    notifier.publish("/topic/cities", "{}");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(history.calls().len(), 1);

    notifier.publish(IMPORTS_TOPIC, "{}");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(history.calls().len(), 2);

    task.shutdown().await;
    notifier.publish(IMPORTS_TOPIC, "{}");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(history.calls().len(), 2, "no refresh after shutdown");
}

#[tokio::test(start_paused = true)]
async fn polling_only_runs_while_jobs_are_active() {
    let history = Arc::new(FakeHistory::with_operations(finished_operations(2)));
    let (tracker, _) = tracker_with(history.clone(), 10);
    tracker.refresh().await.unwrap();

    let task = tracker.spawn_polling(Duration::from_secs(5));
    tokio::time::sleep(Duration::from_secs(16)).await;
    assert_eq!(history.calls().len(), 1, "nothing to watch");

    history.set_operations(vec![operation(3, ImportStatus::Pending)]);
    tracker.refresh().await.unwrap();
    let before = history.calls().len();
    tokio::time::sleep(Duration::from_secs(11)).await;
    assert!(history.calls().len() >= before + 2);

    task.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn console_background_follows_signals_and_polls_until_settled() {
    let history = Arc::new(FakeHistory::with_operations(vec![operation(
        1,
        ImportStatus::Running,
    )]));
    let config = AppConfig {
        notify_debounce: Duration::from_millis(100),
        poll_interval: Some(Duration::from_secs(5)),
        ..AppConfig::default()
    };
    let console = ImportConsole::with_adapters(
        config,
        Arc::new(AcceptingGateway),
        history.clone(),
        Arc::new(FakeLookup::default()),
        Arc::new(RecordingEventSink::new()),
    );
    let notifier = BroadcastChangeNotifier::default();
    let tasks = console.start_background(Some(&notifier));
    assert_eq!(tasks.len(), 2);

    notifier.publish(IMPORTS_TOPIC, "{}");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(history.calls().len(), 1);
    assert!(console.tracker.has_active_jobs().await);

    history.set_operations(vec![operation(1, ImportStatus::Success)]);
    console.wait_until_settled(Duration::from_secs(1)).await;
    assert!(!console.tracker.has_active_jobs().await);
    assert!(history.calls().len() >= 2);

    for task in tasks {
        task.shutdown().await;
    }
}
