use std::sync::Arc;

use futures_util::Future;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct PoolInner {
    semaphore: Arc<Semaphore>,
    cancel_token: CancellationToken,
}

impl Drop for PoolInner {
    fn drop(&mut self) {
        self.semaphore.close();
        self.cancel_token.cancel();
    }
}

/// Bounded pool of tokio tasks.
///
/// At most `n_tasks` futures run at once. Clones share the same pool; when
/// the last clone is dropped, or [`TaskPool::shutdown`] is called, queued
/// and running futures are abandoned.
#[derive(Clone)]
pub struct TaskPool {
    inner: Arc<PoolInner>,
}

impl TaskPool {
    pub fn new(n_tasks: usize) -> TaskPool {
        let semaphore = Arc::new(Semaphore::new(n_tasks.max(1)));
        let cancel_token = CancellationToken::new();

        TaskPool {
            inner: Arc::new(PoolInner {
                semaphore,
                cancel_token,
            }),
        }
    }

    /// Spawn `func`. The handle resolves to `None` when the pool shut down
    /// before the future completed.
    pub fn execute<F, T>(&self, func: F) -> JoinHandle<Option<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = self.inner.semaphore.clone();
        let token = self.inner.cancel_token.clone();
        tokio::spawn(async move {
            let main = async {
                let Ok(_permit) = semaphore.acquire().await else {
                    return None;
                };
                Some(func.await)
            };

            tokio::select! {
                result = main => result,
                () = token.cancelled() => None,
            }
        })
    }

    /// Token cancelled together with the pool, for work that outlives a task.
    pub fn child_token(&self) -> CancellationToken {
        self.inner.cancel_token.child_token()
    }

    pub fn shutdown(&self) {
        self.inner.semaphore.close();
        self.inner.cancel_token.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel_token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_execute_returns_output() {
        let pool = TaskPool::new(2);
        let handle = pool.execute(async { 21 * 2 });
        assert_eq!(assert_ok!(handle.await), Some(42));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let pool = TaskPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let running = running.clone();
                let peak = peak.clone();
                pool.execute(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            assert_some!(assert_ok!(handle.await));
        }
        assert_le!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_shutdown_abandons_running_work() {
        let pool = TaskPool::new(1);
        let handle = pool.execute(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "finished"
        });
        let token = pool.child_token();

        pool.shutdown();

        assert_none!(assert_ok!(handle.await));
        assert!(pool.is_shut_down());
        assert!(token.is_cancelled());
    }
}
