use crate::config::Config;
use crate::error::DirectoryError;
use backon::{ConstantBuilder, Retryable};
use sqlx::{AnyConnection, Connection};
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

/// Bounded, fixed-delay retry settings for the startup connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    // Constant delay, no jitter; `max_attempts - 1` retries after the first dial.
    fn backoff(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.retry_delay)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Open the shared store connection described by `cfg`, retrying per `policy`.
pub async fn establish_connection(
    cfg: &Config,
    policy: &RetryPolicy,
) -> Result<AnyConnection, DirectoryError> {
    sqlx::any::install_default_drivers();
    let url = cfg.database_url()?;
    info!(
        host = %cfg.db_host,
        port = cfg.db_port,
        database = %cfg.db_name,
        max_attempts = policy.max_attempts,
        "connecting to employee store"
    );
    establish_with(policy, || AnyConnection::connect(url.as_str())).await
}

/// Drive `connect` until it succeeds or `policy.max_attempts` dials have failed.
///
/// Attempts run strictly one after another with `policy.retry_delay` between
/// them. Exhaustion is reported as [`DirectoryError::ConnectionExhausted`];
/// terminating the process is left to the caller.
pub async fn establish_with<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut connect: F,
) -> Result<T, DirectoryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    if policy.max_attempts == 0 {
        error!("connection retry policy allows zero attempts");
        return Err(DirectoryError::NoConnectionAttempts);
    }

    let attempt = AtomicU32::new(0);

    let result = (|| {
        let n = attempt.fetch_add(1, Ordering::SeqCst) + 1;
        info!(attempt = n, max_attempts = policy.max_attempts, "dialing store");
        connect()
    })
    .retry(policy.backoff())
    .notify(|err: &E, dur: Duration| {
        warn!(
            attempt = attempt.load(Ordering::SeqCst),
            error = %err,
            retry_in_ms = dur.as_millis() as u64,
            "store connection attempt failed"
        );
    })
    .await;

    let attempts = attempt.load(Ordering::SeqCst);
    match result {
        Ok(conn) => {
            info!(attempts, "connected to employee store");
            Ok(conn)
        }
        Err(e) => {
            warn!(attempt = attempts, error = %e, "store connection attempt failed");
            error!(attempts, "store connection failed after all retries");
            Err(DirectoryError::ConnectionExhausted {
                attempts,
                last_error: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CapturedLogs;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn policy(max_attempts: u32, delay_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            retry_delay: Duration::from_millis(delay_ms),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_store_uses_every_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let counter = calls.clone();
        let result = establish_with(&policy(4, 500), || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>("connection refused") }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // three sleeps between four dials
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1500), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(2000), "{elapsed:?}");
        match result {
            Err(DirectoryError::ConnectionExhausted {
                attempts,
                last_error,
            }) => {
                assert_eq!(attempts, 4);
                assert_eq!(last_error, "connection refused");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_kth_attempt_stops_dialing() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = Instant::now();

        let counter = calls.clone();
        let conn = establish_with(&policy(5, 1000), || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(format!("attempt {n} refused"))
                } else {
                    Ok("live connection")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(conn, "live connection");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(3000), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_never_sleeps() {
        let started = Instant::now();
        let value = establish_with(&policy(5, 1000), || async { Ok::<_, String>(7u8) })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert!(started.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn zero_attempts_fails_without_dialing() {
        let calls = AtomicU32::new(0);
        let result = establish_with(&policy(0, 10), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(()) }
        })
        .await;
        assert!(matches!(result, Err(DirectoryError::NoConnectionAttempts)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn single_attempt_policy_does_not_retry() {
        let calls = AtomicU32::new(0);
        let result = establish_with(&policy(1, 10), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>("down") }
        })
        .await;
        assert!(matches!(
            result,
            Err(DirectoryError::ConnectionExhausted { attempts: 1, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn every_failed_attempt_is_logged_with_index_and_cause() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let result = establish_with(&policy(3, 100), || async {
            Err::<(), _>("connection refused")
        })
        .await;
        assert!(result.is_err());

        let failures = logs.lines_containing("store connection attempt failed");
        assert_eq!(failures.len(), 3, "{}", logs.contents());
        for (i, line) in failures.iter().enumerate() {
            assert!(line.contains(&format!("attempt={} ", i + 1)), "{line}");
            assert!(line.contains("connection refused"), "{line}");
        }
        assert_eq!(
            logs.lines_containing("store connection failed after all retries").len(),
            1
        );
        assert!(logs.lines_containing("connected to employee store").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn success_is_logged_once_after_earlier_failures() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let calls = AtomicU32::new(0);
        establish_with(&policy(5, 100), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 2 {
                    Err("handshake timed out")
                } else {
                    Ok(())
                }
            }
        })
        .await
        .unwrap();

        let failures = logs.lines_containing("store connection attempt failed");
        assert_eq!(failures.len(), 1, "{}", logs.contents());
        assert!(failures[0].contains("attempt=1 "));
        assert!(failures[0].contains("handshake timed out"));

        let connected = logs.lines_containing("connected to employee store");
        assert_eq!(connected.len(), 1, "{}", logs.contents());
        assert!(connected[0].contains("INFO"));
        assert!(connected[0].contains("attempts=2"));
    }

    #[test]
    fn default_policy_matches_startup_defaults() {
        assert_eq!(RetryPolicy::default(), Config::default().retry_policy());
    }
}
