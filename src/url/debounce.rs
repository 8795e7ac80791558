use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Runs a function on the latest input once calls stop arriving
///
/// Each call cancels the pending one. After the quiet period the function is
/// applied to the most recent input and the result is published to
/// subscribers. Calls must be made from within a tokio runtime.
pub struct Debouncer<I, O> {
    delay: Duration,
    func: Arc<dyn Fn(I) -> O + Send + Sync>,
    pending: Option<JoinHandle<()>>,
    output: Arc<watch::Sender<Option<O>>>,
}

impl<I, O> Debouncer<I, O>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
{
    pub fn new<F>(delay: Duration, func: F) -> Self
    where
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        let (tx, _rx) = watch::channel(None);
        Self {
            delay,
            func: Arc::new(func),
            pending: None,
            output: Arc::new(tx),
        }
    }

    /// Schedules `input`, replacing any call still waiting
    pub fn call(&mut self, input: I) {
        self.cancel();

        let delay = self.delay;
        let func = Arc::clone(&self.func);
        let output = Arc::clone(&self.output);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            output.send_replace(Some(func(input)));
        }));
    }

    /// Drops the waiting call, if any, without running it
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Receives every published result
    pub fn subscribe(&self) -> watch::Receiver<Option<O>> {
        self.output.subscribe()
    }
}

impl<I, O: Clone> Debouncer<I, O> {
    /// The most recently published result
    pub fn latest(&self) -> Option<O> {
        self.output.borrow().clone()
    }
}

impl<I, O> Drop for Debouncer<I, O> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_publishes_after_quiet_period() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300), |s: String| s.len());
        debouncer.call("abc".to_string());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(debouncer.latest(), None);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(debouncer.latest(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_call_wins() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut debouncer = Debouncer::new(Duration::from_millis(300), move |s: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            s
        });

        debouncer.call("h".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("ht".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("https://example.com".to_string());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(debouncer.latest(), None);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(debouncer.latest().as_deref(), Some("https://example.com"));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50), |n: u32| n * 2);
        debouncer.call(21);
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(debouncer.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_results() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10), |n: u32| n + 1);
        let mut rx = debouncer.subscribe();

        debouncer.call(1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(2));
    }
}
