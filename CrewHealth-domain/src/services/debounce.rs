use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Cancellable timer that runs only the most recently scheduled callback.
///
/// Each `schedule` call cancels the pending callback, if any, and arms a new
/// one that fires after `delay` of quiet. Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm `callback`, replacing any callback that has not fired yet
    pub fn schedule<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });

        match self.pending.lock() {
            Ok(mut pending) => {
                if let Some(previous) = pending.replace(handle) {
                    debug!("Debounced callback superseded");
                    previous.abort();
                }
            }
            Err(e) => {
                warn!("Debouncer state poisoned ({}), dropping callback", e);
                handle.abort();
            }
        }
    }

    /// Drop the pending callback; returns whether one was still waiting
    pub fn cancel(&self) -> bool {
        let handle = match self.pending.lock() {
            Ok(mut pending) => pending.take(),
            Err(_) => None,
        };

        match handle {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Whether a scheduled callback has not fired yet
    pub fn is_pending(&self) -> bool {
        match self.pending.lock() {
            Ok(pending) => pending.as_ref().map_or(false, |h| !h.is_finished()),
            Err(_) => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Ok(pending) = self.pending.get_mut() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_only_last_callback_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let fired = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));

        for i in 1..=3 {
            let fired = fired.clone();
            let last = last.clone();
            debouncer.schedule(move || {
                fired.fetch_add(1, Ordering::SeqCst);
                last.store(i, Ordering::SeqCst);
            });
        }
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_callback() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        debouncer.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_cancels_pending_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(30));
            let counter = fired.clone();
            debouncer.schedule(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
