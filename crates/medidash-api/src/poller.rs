//! # Background Polling
//!
//! Re-fetches a server resource on a fixed interval and publishes the newest
//! result through a `watch` channel, so readers only ever see the latest
//! value.
//!
//! ```text
//!   interval tick ──► fetch() ──┬─ Ok(v)  ──► watch::send_replace(Some(v))
//!        ▲                      └─ Err(e) ──► warn!, keep previous value
//!        └───────────────────────────────────────────────┘
//! ```
//!
//! The interval is fixed. A failed fetch is not retried early, it waits for
//! the next tick. Dropping the handle stops the task.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use medidash_core::register::RegisterSession;

use crate::client::ApiClient;
use crate::error::ApiResult;

pub struct PollerHandle<T> {
    rx: watch::Receiver<Option<T>>,
    task: JoinHandle<()>,
}

impl<T: Clone> PollerHandle<T> {
    /// Latest successful result, `None` before the first one lands.
    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.rx.clone()
    }
}

impl<T> PollerHandle<T> {
    pub fn stop(self) {
        self.task.abort();
    }
}

impl<T> Drop for PollerHandle<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a task calling `fetch` immediately and then every `every`.
pub fn spawn_poller<T, F, Fut>(name: &'static str, every: Duration, mut fetch: F) -> PollerHandle<T>
where
    T: Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ApiResult<T>> + Send,
{
    let (tx, rx) = watch::channel(None);

    let task = tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match fetch().await {
                Ok(value) => {
                    tx.send_replace(Some(value));
                    debug!(poller = name, "Poll succeeded");
                }
                Err(e) => warn!(poller = name, error = %e, "Poll failed, keeping previous value"),
            }
        }
    });

    PollerHandle { rx, task }
}

/// Keeps the branch's active register session fresh.
pub fn spawn_session_poller(
    client: ApiClient,
    store_id: String,
    every: Duration,
) -> PollerHandle<Option<RegisterSession>> {
    spawn_poller("active-register", every, move || {
        let client = client.clone();
        let store_id = store_id.clone();
        async move { client.active_register(&store_id).await }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_newest_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = spawn_poller("test", Duration::from_secs(60), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, ClientError>(n) }
        });

        tokio::time::sleep(Duration::from_secs(125)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(handle.latest(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_value() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = spawn_poller("test", Duration::from_secs(60), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    Ok(n)
                } else {
                    Err(ClientError::Timeout)
                }
            }
        });

        tokio::time::sleep(Duration::from_secs(65)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(handle.latest(), Some(1));
    }
}
