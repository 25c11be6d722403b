use std::sync::{Arc, Mutex, MutexGuard};

use super::navigation::NavError;
use super::remote::{FetchOutcome, PendingFetch, RemoteFetcher};
use super::session::AppSession;

/// Shared, lock-guarded access to a session.
///
/// Back navigation reads the current position and then rewrites it, so two
/// near-simultaneous back requests must run one after the other.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<AppSession>>,
}

impl SessionHandle {
    pub fn new(session: AppSession) -> Self {
        SessionHandle {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppSession> {
        // a panic mid-operation leaves the session usable; keep going
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(&self, f: impl FnOnce(&mut AppSession) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn go_back(&self) -> Result<(), NavError> {
        self.lock().go_back()
    }

    pub fn go_back_until_root(&self) -> Result<(), NavError> {
        self.lock().go_back_until_root()
    }

    /// Run a pending fetch without holding the lock, then apply its result.
    /// The result is dropped if the user moved on in the meantime.
    pub async fn fetch_remote(
        &self,
        fetcher: &dyn RemoteFetcher,
        pending: PendingFetch,
    ) -> FetchOutcome {
        tracing::debug!(path = ?pending.request.path, "fetching remote items");
        let result = fetcher.fetch_children(&pending.request).await;
        self.lock().complete_fetch(pending.ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::Settings;
    use crate::model::item::ItemKind;
    use crate::model::tree::Tree;
    use crate::ops::remote::{FetchError, FetchRequest, RemoteRecord};
    use crate::ops::session::ClickOutcome;
    use futures::executor::block_on;
    use futures::future::BoxFuture;
    use std::thread;

    struct StaticFetcher(Result<Vec<RemoteRecord>, FetchError>);

    impl RemoteFetcher for StaticFetcher {
        fn fetch_children(
            &self,
            _request: &FetchRequest,
        ) -> BoxFuture<'static, Result<Vec<RemoteRecord>, FetchError>> {
            let result = self.0.clone();
            Box::pin(async move { result })
        }
    }

    fn handle() -> SessionHandle {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_new(root, ItemKind::text("a")).unwrap();
        let b = tree.add_new(a, ItemKind::text("b")).unwrap();
        let c = tree.add_new(b, ItemKind::text("c")).unwrap();
        tree.add_new(c, ItemKind::text("d")).unwrap();
        tree.add_new(root, ItemKind::remote("inbox")).unwrap();
        SessionHandle::new(AppSession::new(tree, Settings::default()))
    }

    fn start_fetch(handle: &SessionHandle) -> PendingFetch {
        match handle.with(|s| s.click(1)) {
            ClickOutcome::FetchStarted(pending) => pending,
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn concurrent_back_requests_each_take_one_step() {
        let handle = handle();
        handle.with(|s| {
            s.go_into(0);
            s.go_into(0);
            s.go_into(0);
        });
        let workers: Vec<_> = (0..2)
            .map(|_| {
                let h = handle.clone();
                thread::spawn(move || h.go_back())
            })
            .collect();
        for w in workers {
            assert_eq!(w.join().unwrap(), Ok(()));
        }
        let title = handle.with(|s| s.title());
        assert_eq!(title, "a [1]");
    }

    #[test]
    fn back_until_root_stops_at_root() {
        let handle = handle();
        handle.with(|s| s.go_into(0));
        assert_eq!(handle.go_back_until_root(), Ok(()));
        assert_eq!(handle.go_back_until_root(), Ok(()));
        assert_eq!(handle.go_back(), Err(NavError::NoParent));
    }

    #[test]
    fn fetch_applies_records() {
        let handle = handle();
        let pending = start_fetch(&handle);
        let fetcher = StaticFetcher(Ok(vec![RemoteRecord::new("x", Some(0))]));
        let outcome = block_on(handle.fetch_remote(&fetcher, pending));
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                fetched: 1,
                added: 1
            }
        );
        assert_eq!(handle.with(|s| s.current_items().len()), 1);
    }

    #[test]
    fn fetch_failure_is_reported() {
        let handle = handle();
        let pending = start_fetch(&handle);
        let fetcher = StaticFetcher(Err(FetchError::FetchFailed("offline".into())));
        let outcome = block_on(handle.fetch_remote(&fetcher, pending));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        let notices = handle.with(|s| s.take_notices());
        assert_eq!(
            notices.last().map(|n| n.message.as_str()),
            Some("Communication breakdown!: fetch failed: offline")
        );
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let handle = handle();
        let first = start_fetch(&handle);
        handle.go_back().unwrap();
        let second = start_fetch(&handle);

        let fetcher = StaticFetcher(Ok(vec![RemoteRecord::new("late", None)]));
        assert_eq!(
            block_on(handle.fetch_remote(&fetcher, first)),
            FetchOutcome::Discarded
        );
        assert!(matches!(
            block_on(handle.fetch_remote(&fetcher, second)),
            FetchOutcome::Applied { added: 1, .. }
        ));
    }
}
