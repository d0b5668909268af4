// Trailing-edge debounce
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Runs `action` once, `window` after the last `call()` of a burst.
pub struct Debouncer {
    window: Duration,
    action: Arc<dyn Fn() + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            window,
            action: Arc::new(action),
            pending: None,
        }
    }

    pub fn call(&mut self) {
        self.cancel();
        let deadline = Instant::now() + self.window;
        let action = self.action.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            action();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
