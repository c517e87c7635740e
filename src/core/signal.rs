use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Broadcast "data changed, reload" signal.
///
/// Controllers attached to the same signal all refetch when
/// [`invalidate`](RefreshSignal::invalidate) is called. The value is a
/// counter of invalidations; subscribers only care that it changed.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for RefreshSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Bumps the counter and returns its new value.
    pub fn invalidate(&self) -> u64 {
        self.invalidate_with(|_| {})
    }

    /// Like [`invalidate`](RefreshSignal::invalidate), but runs `observe`
    /// with the new value before any subscriber is woken.
    pub(crate) fn invalidate_with(&self, observe: impl FnOnce(u64)) -> u64 {
        let mut next = 0;
        self.tx.send_modify(|count| {
            *count += 1;
            next = *count;
            observe(next);
        });
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn invalidations(&self) -> u64 {
        *self.tx.borrow()
    }
}

/// Runs `refresh` once now and again after every invalidation, until the
/// task is aborted or every handle to the signal is dropped. Each call gets
/// the counter value it was woken for; bursts of invalidations coalesce into
/// one call with the latest value.
pub(crate) fn spawn_refresher<F, Fut>(signal: &RefreshSignal, refresh: F) -> AbortHandle
where
    F: Fn(u64) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut rx = signal.subscribe();
    tokio::spawn(async move {
        let initial = *rx.borrow_and_update();
        refresh(initial).await;
        while rx.changed().await.is_ok() {
            let seen = *rx.borrow_and_update();
            refresh(seen).await;
        }
    })
    .abort_handle()
}
