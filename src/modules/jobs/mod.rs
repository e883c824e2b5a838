/// Import job tracking
///
/// Architecture:
/// - Domain: import operations, the history source port and the change
///   notification capability
/// - Infrastructure: HTTP history client and the in-process broadcast notifier
/// - Tracker: paginated history view kept fresh by refreshes and signals
pub mod domain;
pub mod infrastructure;
pub mod tracker;

// Re-exports for easy access
pub use domain::{
    entities::{ImportOperation, ImportStatus, JobTransition},
    notifications::{ChangeNotifier, SignalHandler, Subscription, IMPORTS_TOPIC},
    repository::ImportHistorySource,
};
pub use infrastructure::{BroadcastChangeNotifier, ChangeSignal, HttpImportHistory};
pub use tracker::{BackgroundTask, FetchState, HistoryView, ImportJobTracker};
