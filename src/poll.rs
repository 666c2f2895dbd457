// ABOUTME: Fixed-interval bounded polling shared by every remote wait.
// ABOUTME: One-second ticks, progress logged every third attempt, optional cancellation.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const LOG_EVERY: u32 = 3;

/// Result of one observation of remote state.
#[derive(Debug)]
pub enum Probe<T, P> {
    /// The awaited condition holds.
    Ready(T),
    /// Still transitioning; carries what was observed.
    Pending(P),
}

/// Why a poll loop stopped without reaching `Ready`.
#[derive(Debug)]
pub enum PollError<P, E> {
    /// The deadline passed; `last` is the final observation.
    TimedOut { last: P, waited: Duration },
    /// The cancellation token fired while sleeping.
    Cancelled,
    /// The probe itself reported a terminal error.
    Probe(E),
}

/// Drives a probe at a fixed interval until it is ready or the deadline passes.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    timeout: Duration,
    log_every: u32,
    cancel: Option<CancellationToken>,
}

impl Ticker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            interval: POLL_INTERVAL,
            timeout,
            log_every: LOG_EVERY,
            cancel: None,
        }
    }

    /// Abort the wait between ticks when `token` is cancelled.
    pub fn with_cancellation(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll `probe` until it returns `Ready`, an error, or time runs out.
    ///
    /// The first probe runs immediately. A `Ready` or error result is returned
    /// as soon as it is observed, regardless of remaining time.
    pub async fn poll<T, P, E, F, Fut>(&self, what: &str, mut probe: F) -> Result<T, PollError<P, E>>
    where
        P: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Probe<T, P>, E>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut attempt: u32 = 1;

        loop {
            let observed = match probe().await.map_err(PollError::Probe)? {
                Probe::Ready(value) => return Ok(value),
                Probe::Pending(observed) => observed,
            };

            if Instant::now() > deadline {
                return Err(PollError::TimedOut {
                    last: observed,
                    waited: self.timeout,
                });
            }

            if attempt % self.log_every == 0 {
                tracing::info!("Wait {what}, status={observed}");
            }

            self.sleep().await?;
            attempt += 1;
        }
    }

    async fn sleep<P, E>(&self) -> Result<(), PollError<P, E>> {
        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(PollError::Cancelled),
                _ = tokio::time::sleep(self.interval) => Ok(()),
            },
            None => {
                tokio::time::sleep(self.interval).await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn ready_on_first_probe_does_not_sleep() {
        let calls = Cell::new(0);
        let start = Instant::now();

        let result: Result<u32, PollError<&str, ()>> = Ticker::new(Duration::from_secs(30))
            .poll("test", || {
                calls.set(calls.get() + 1);
                async { Ok(Probe::Ready(7)) }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_until_deadline_times_out() {
        let calls = Cell::new(0);

        let result: Result<(), PollError<&str, ()>> = Ticker::new(Duration::from_secs(5))
            .poll("test", || {
                calls.set(calls.get() + 1);
                async { Ok(Probe::Pending("Updating")) }
            })
            .await;

        match result {
            Err(PollError::TimedOut { last, waited }) => {
                assert_eq!(last, "Updating");
                assert_eq!(waited, Duration::from_secs(5));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        // One immediate probe plus one per second until strictly past the deadline
        assert_eq!(calls.get(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_error_stops_immediately() {
        let calls = Cell::new(0);

        let result: Result<(), PollError<&str, &str>> = Ticker::new(Duration::from_secs(30))
            .poll("test", || {
                calls.set(calls.get() + 1);
                async { Err("boom") }
            })
            .await;

        assert!(matches!(result, Err(PollError::Probe("boom"))));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_sleep() {
        let token = CancellationToken::new();
        token.cancel();

        let result: Result<(), PollError<&str, ()>> = Ticker::new(Duration::from_secs(30))
            .with_cancellation(Some(token))
            .poll("test", || async { Ok(Probe::Pending("Updating")) })
            .await;

        assert!(matches!(result, Err(PollError::Cancelled)));
    }
}
