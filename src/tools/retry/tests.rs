#![cfg(test)]
mod tests {
    use crate::error::{ScrapeError, UiFailure};
    use crate::tools::retry::*;
    use std::cell::Cell;
    use std::time::Duration;
    use tokio::time::Instant;

    fn no_wait(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::fixed(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let result = no_wait(3)
            .run("click", ScrapeError::is_transient, |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 3 {
                        Err(ScrapeError::interaction(UiFailure::Intercepted, "overlay"))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = Cell::new(0);
        let result: crate::Result<()> = no_wait(3)
            .run("click", ScrapeError::is_transient, |_| {
                calls.set(calls.get() + 1);
                async { Err(ScrapeError::interaction(UiFailure::Stale, "gone")) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = Cell::new(0);
        let result: crate::Result<()> = no_wait(5)
            .run("click", ScrapeError::is_transient, |_| {
                calls.set(calls.get() + 1);
                async { Err(ScrapeError::PanelNotRendered("timeout".into())) }
            })
            .await;
        assert!(matches!(result, Err(ScrapeError::PanelNotRendered(_))));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = Cell::new(0);
        let result = no_wait(0)
            .run("once", |_| true, |_| {
                calls.set(calls.get() + 1);
                async { Ok::<_, ScrapeError>(()) }
            })
            .await;
        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_wait_the_fixed_delay() {
        let start = Instant::now();
        let result: crate::Result<()> = RetryPolicy::fixed(3, Duration::from_secs(5))
            .run("gallery", |_| true, |_| async {
                Err(ScrapeError::Browser("not yet".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_pause_does_not_sleep() {
        let start = Instant::now();
        pause(Duration::ZERO, Duration::ZERO).await;
        human_pause(Duration::ZERO, Duration::ZERO).await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_pause_stays_within_bounds() {
        let min = Duration::from_millis(300);
        let max = Duration::from_millis(600);
        for _ in 0..50 {
            let start = Instant::now();
            human_pause(min, max).await;
            let waited = start.elapsed();
            assert!(waited >= min && waited < max, "waited {waited:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_pause_with_equal_bounds_is_exact() {
        let settle = Duration::from_millis(500);
        let start = Instant::now();
        human_pause(settle, settle).await;
        assert_eq!(start.elapsed(), settle);

        let start = Instant::now();
        human_pause(settle, Duration::ZERO).await;
        assert_eq!(start.elapsed(), settle);
    }
}
