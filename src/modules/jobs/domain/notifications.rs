/// Subscribe-only change notifications
///
/// A signal only means "something changed, fetch again". Signals may be
/// duplicated, reordered or lost; consumers must refresh idempotently.
pub const IMPORTS_TOPIC: &str = "/topic/imports";

pub type SignalHandler = Box<dyn Fn() + Send + Sync>;

pub trait ChangeNotifier: Send + Sync {
    fn subscribe(&self, topic: &str, on_signal: SignalHandler) -> Subscription;
}

/// Active subscription; dropping it unsubscribes
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
