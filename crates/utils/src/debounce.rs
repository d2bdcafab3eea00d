//! Debounced value cache.
//!
//! Mirrors an input value onto an output, but only once the input has
//! stopped changing for a quiescence window. Every `set` cancels the
//! pending flush before arming a new one, so at most one timer is
//! outstanding at any time and a cancelled update is never observed,
//! not even partially.

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle};

/// Quiescence window used when none is given.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A value that settles only after its input has been quiet for `delay`.
///
/// Must be used inside a Tokio runtime: `set` schedules the flush on the
/// current runtime. Dropping the cache aborts the outstanding timer, so
/// a flush can never land after its owner is gone.
pub struct Debounced<T> {
    delay: Duration,
    output: watch::Sender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> Debounced<T> {
    /// Create a cache with the default 500ms window.
    pub fn new(initial: T) -> Self {
        Self::with_delay(initial, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(initial: T, delay: Duration) -> Self {
        let (output, _) = watch::channel(initial);
        Self {
            delay,
            output,
            pending: None,
        }
    }

    /// Feed a new input value. Any scheduled flush is aborted first; the
    /// quiescence window starts over from now.
    pub fn set(&mut self, value: T) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let output = self.output.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            output.send_replace(value);
        }));
    }

    /// The last value that survived the quiescence window.
    pub fn get(&self) -> T {
        self.output.borrow().clone()
    }

    /// Watch the settled value for changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{advance, sleep};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_value_settles_after_quiet_window() {
        let mut cache = Debounced::new("a".to_string());
        cache.set("b".to_string());
        sleep(Duration::from_millis(499)).await;
        assert_eq!(cache.get(), "a");
        sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(cache.get(), "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_change_restarts_window_and_wins() {
        let mut cache = Debounced::new("a".to_string());
        cache.set("b".to_string());
        sleep(Duration::from_millis(200)).await;
        cache.set("c".to_string());

        // t = 699: the rescheduled flush has not fired, and the first
        // one was cancelled before its deadline
        sleep(Duration::from_millis(499)).await;
        assert_eq!(cache.get(), "a");

        // t = 701: the second value lands, never the first
        sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(cache.get(), "c");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_collapse_to_last() {
        let mut cache = Debounced::with_delay(0u32, Duration::from_millis(100));
        cache.set(1);
        cache.set(2);
        cache.set(3);
        sleep(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        assert_eq!(cache.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_flush() {
        let mut cache = Debounced::with_delay(0u32, Duration::from_millis(100));
        let rx = cache.subscribe();
        cache.set(7);
        drop(cache);

        advance(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(*rx.borrow(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_settled_value() {
        let mut cache = Debounced::with_delay("".to_string(), Duration::from_millis(50));
        let mut rx = cache.subscribe();
        cache.set("done".to_string());
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow(), "done");
    }
}
