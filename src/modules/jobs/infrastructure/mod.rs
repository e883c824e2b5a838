pub mod broadcast_notifier;
pub mod history_client;

pub use broadcast_notifier::{BroadcastChangeNotifier, ChangeSignal};
pub use history_client::HttpImportHistory;
