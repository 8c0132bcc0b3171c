//! Bounded wait shared by every outbound call (backend and third-party).

use std::future::Future;
use std::time::Duration;

/// Marker produced when an outbound call outlives its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineElapsed(pub Duration);

/// Runs `call` for at most `limit`.
///
/// On expiry the future is dropped, which cancels the in-flight request and
/// closes its connection, and the caller's error type receives the deadline.
pub async fn with_deadline<T, E, F>(limit: Duration, call: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<DeadlineElapsed>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| E::from(DeadlineElapsed(limit)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Elapsed(Duration),
        Failed,
    }

    impl From<DeadlineElapsed> for TestError {
        fn from(e: DeadlineElapsed) -> Self {
            TestError::Elapsed(e.0)
        }
    }

    #[tokio::test]
    async fn test_fast_call_returns_its_result() {
        let result: Result<u32, TestError> =
            with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_inner_error_is_preserved() {
        let result: Result<u32, TestError> =
            with_deadline(Duration::from_secs(1), async { Err(TestError::Failed) }).await;
        assert_eq!(result, Err(TestError::Failed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_is_cut_off_at_limit() {
        let limit = Duration::from_secs(30);
        let result: Result<u32, TestError> = with_deadline(limit, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1)
        })
        .await;
        assert_eq!(result, Err(TestError::Elapsed(limit)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_is_dropped_after_deadline() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        struct SetOnDrop(Arc<AtomicBool>);
        impl Drop for SetOnDrop {
            fn drop(&mut self) {
                self.0.store(true, Ordering::SeqCst);
            }
        }

        let dropped = Arc::new(AtomicBool::new(false));
        let guard = SetOnDrop(dropped.clone());
        let result: Result<(), TestError> = with_deadline(Duration::from_secs(1), async move {
            let _guard = guard;
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        assert!(result.is_err());
        assert!(dropped.load(Ordering::SeqCst), "pending call must be dropped");
    }
}
