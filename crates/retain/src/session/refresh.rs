//! Single-flight coordination of credential refreshes.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

/// How a refresh attempt ended, as observed by every request waiting on it.
pub(crate) type RefreshResult = Result<(), RefreshFailure>;

#[derive(Debug, Clone)]
pub(crate) enum RefreshFailure {
    /// No refresh credential was stored; no network call was made.
    NoCredential,
    /// The refresh exchange failed.
    Rejected(String),
}

pub(crate) type PendingRefresh = Shared<BoxFuture<'static, RefreshResult>>;

/// Holds at most one outstanding refresh.
///
/// The refresh itself runs as a spawned task so it settles even if every
/// waiting request is cancelled. The task empties the slot through a
/// [`SettleGuard`] before its result becomes visible to waiters.
#[derive(Default)]
pub(crate) struct RefreshSlot {
    pending: Mutex<Option<PendingRefresh>>,
}

impl RefreshSlot {
    /// Returns the outstanding refresh, starting one with `start` if there is none.
    ///
    /// The flag is true if this call started the refresh.
    pub fn join_or_start<F, Fut>(&self, start: F) -> (PendingRefresh, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshResult> + Send + 'static,
    {
        let mut pending = self.lock();
        if let Some(refresh) = pending.as_ref() {
            return (refresh.clone(), false);
        }

        // The task's guard blocks on this lock, so it cannot settle before
        // the handle below is installed.
        let task = tokio::spawn(start());
        let refresh = async move {
            task.await
                .unwrap_or_else(|e| Err(RefreshFailure::Rejected(format!("refresh task failed: {e}"))))
        }
        .boxed()
        .shared();

        *pending = Some(refresh.clone());
        (refresh, true)
    }

    /// Returns a guard that empties the slot when dropped.
    pub fn settle_on_drop(&self) -> SettleGuard<'_> {
        SettleGuard { slot: self }
    }

    pub fn is_idle(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingRefresh>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub(crate) struct SettleGuard<'a> {
    slot: &'a RefreshSlot,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn start_counted(
        slot: &Arc<RefreshSlot>,
        starts: &Arc<AtomicUsize>,
        result: RefreshResult,
    ) -> (PendingRefresh, bool) {
        let task_slot = Arc::clone(slot);
        let starts = Arc::clone(starts);
        slot.join_or_start(move || async move {
            let _settle = task_slot.settle_on_drop();
            starts.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            result
        })
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let slot = Arc::new(RefreshSlot::default());
        let starts = Arc::new(AtomicUsize::new(0));

        let (first, started_first) = start_counted(&slot, &starts, Ok(()));
        let (second, started_second) = start_counted(&slot, &starts, Ok(()));

        assert!(started_first);
        assert!(!started_second);
        assert!(!slot.is_idle());

        let (a, b) = tokio::join!(first, second);
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert!(slot.is_idle());
    }

    #[tokio::test]
    async fn failure_settles_slot_and_reaches_every_waiter() {
        let slot = Arc::new(RefreshSlot::default());
        let starts = Arc::new(AtomicUsize::new(0));

        let (first, _) = start_counted(&slot, &starts, Err(RefreshFailure::NoCredential));
        let (second, _) = start_counted(&slot, &starts, Ok(()));

        let (a, b) = tokio::join!(first, second);
        assert!(matches!(a, Err(RefreshFailure::NoCredential)));
        assert!(matches!(b, Err(RefreshFailure::NoCredential)));
        assert!(slot.is_idle());

        // A later refresh starts fresh.
        let (third, started) = start_counted(&slot, &starts, Ok(()));
        assert!(started);
        assert!(third.await.is_ok());
        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refresh_settles_when_waiters_are_dropped() {
        let slot = Arc::new(RefreshSlot::default());
        let starts = Arc::new(AtomicUsize::new(0));

        let (pending, _) = start_counted(&slot, &starts, Ok(()));
        drop(pending);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(slot.is_idle());
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_refresh_does_not_wedge_slot() {
        let slot = Arc::new(RefreshSlot::default());
        let task_slot = Arc::clone(&slot);

        let (pending, _) = slot.join_or_start(move || async move {
            let _settle = task_slot.settle_on_drop();
            let explode = true;
            if explode {
                panic!("refresh blew up");
            }
            Ok(())
        });

        assert!(matches!(pending.await, Err(RefreshFailure::Rejected(_))));
        assert!(slot.is_idle());
    }
}
