//! Bounded fixed-interval condition polling
//!
//! The harness never receives push notifications from the service; every
//! remote state transition is observed by re-polling. The interval is fixed
//! and the attempt budget is hard, no backoff. A transport-aware caller
//! could swap the poll function for a subscription without changing the
//! phase-sequence contract.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{HarnessError, Result};

/// Poll `poll_fn` every `interval` until it yields a value, at most
/// `max_attempts` times
///
/// Each attempt sleeps first, then polls, matching a remote transition that
/// needs at least one interval to happen. Exhaustion yields
/// [`HarnessError::PollTimeout`].
pub async fn await_condition<T, F, Fut>(
    mut poll_fn: F,
    interval: Duration,
    max_attempts: u32,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..max_attempts {
        sleep(interval).await;
        if let Some(value) = poll_fn().await {
            return Ok(value);
        }
    }

    Err(HarnessError::PollTimeout {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_returns_on_first_success() {
        let polls = AtomicU32::new(0);
        let counter = &polls;

        let value = await_condition(
            move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                (n == 3).then_some(n)
            },
            Duration::from_millis(500),
            10,
        )
        .await
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_max_attempts() {
        let polls = AtomicU32::new(0);
        let counter = &polls;

        let result: Result<()> = await_condition(
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            },
            Duration::from_secs(1),
            10,
        )
        .await;

        assert!(matches!(
            result,
            Err(HarnessError::PollTimeout { attempts: 10 })
        ));
        assert_eq!(polls.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_times_out_without_polling() {
        let result: Result<()> =
            await_condition(|| async { Some(()) }, Duration::from_secs(1), 0).await;
        assert!(matches!(
            result,
            Err(HarnessError::PollTimeout { attempts: 0 })
        ));
    }
}
