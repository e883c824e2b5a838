use crate::log_debug;
use crate::modules::jobs::domain::notifications::{ChangeNotifier, SignalHandler, Subscription};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

const DEFAULT_CAPACITY: usize = 64;

/// Message published on a topic; the payload is never inspected by listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSignal {
    pub topic: String,
    pub payload: String,
}

/// In-process change channel over a tokio broadcast channel.
///
/// `subscribe` spawns a listener task and must be called inside a tokio runtime.
#[derive(Clone)]
pub struct BroadcastChangeNotifier {
    sender: broadcast::Sender<ChangeSignal>,
}

impl Default for BroadcastChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a signal, returning how many listeners received it
    pub fn publish(&self, topic: &str, payload: &str) -> usize {
        self.sender
            .send(ChangeSignal {
                topic: topic.to_string(),
                payload: payload.to_string(),
            })
            .unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangeNotifier for BroadcastChangeNotifier {
    fn subscribe(&self, topic: &str, on_signal: SignalHandler) -> Subscription {
        // receiver is created before returning so no later publish is missed
        let mut receiver = self.sender.subscribe();
        let token = CancellationToken::new();
        let listener_token = token.clone();
        let topic = topic.to_string();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = listener_token.cancelled() => break,
                    received = receiver.recv() => match received {
                        Ok(signal) if signal.topic == topic => on_signal(),
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            log_debug!("Change listener on {} skipped {} signals", topic, skipped);
                            on_signal();
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });

        Subscription::new(move || token.cancel())
    }
}
