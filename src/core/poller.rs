//! Status polling for long-running generation jobs
//!
//! A [`ProgressPoller`] fetches a status snapshot, hands it to an update
//! callback, waits, and repeats until the job finishes, the time or attempt
//! budget runs out, too many polls fail in a row, or a [`StopHandle`] fires.
//!
//! Polls never overlap: the next one is scheduled only after the previous
//! request and its callback have completed.
//!
//! # Failure policy
//!
//! A failed poll is retried. Consecutive failures back off exponentially
//! from `retry.initial_delay` up to `retry.max_delay`; once
//! `retry.max_retries` polls have failed back to back, the last error is
//! returned. 4xx responses other than 408/429 are returned immediately since
//! an unknown job will not appear by asking again. Any successful poll resets
//! the failure count and the backoff.

use crate::api::client::StoryboardClient;
use crate::api::models::{JobState, ProgressStatus};
use crate::error::ApiError;
use crate::utils::retry::RetryConfig;
use async_trait::async_trait;
use backoff::backoff::Backoff;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Anything that can produce a status snapshot for an endpoint
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, endpoint: &str) -> Result<ProgressStatus, ApiError>;
}

#[async_trait]
impl StatusSource for StoryboardClient {
    async fn fetch_status(&self, endpoint: &str) -> Result<ProgressStatus, ApiError> {
        self.get_json(endpoint).await
    }
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between successful polls
    pub interval: Duration,
    /// Give up once this much time has passed since the first poll
    pub timeout: Option<Duration>,
    /// Give up after this many polls, successful or not
    pub max_attempts: Option<u32>,
    /// Consecutive-failure budget and backoff schedule
    pub retry: RetryConfig,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Some(Duration::from_secs(30 * 60)),
            max_attempts: None,
            retry: RetryConfig {
                max_retries: 5,
                initial_delay: Duration::from_secs(2),
                max_delay: Duration::from_secs(30),
                multiplier: 2.0,
            },
        }
    }
}

impl PollConfig {
    /// Poll every `interval`; failure backoff starts at the same interval
    pub fn with_interval(interval: Duration) -> Self {
        let defaults = Self::default();
        Self {
            interval,
            retry: RetryConfig {
                initial_delay: interval,
                ..defaults.retry
            },
            ..defaults
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_consecutive_failures(mut self, failures: u32) -> Self {
        self.retry.max_retries = failures.max(1);
        self
    }
}

/// How a polling run ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job reached 100% or reported `completed`
    Completed(ProgressStatus),
    /// The job reported `error`/`failed`
    Failed(ProgressStatus),
    /// The time or attempt budget ran out first
    TimedOut { attempts: u32 },
    /// [`StopHandle::stop`] was called
    Stopped,
}

/// Cancels a running poller from anywhere
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Prevent any further polls. A poll already in flight is abandoned and
    /// its status never reaches the callback.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

pub struct ProgressPoller<S> {
    source: S,
    endpoint: String,
    config: PollConfig,
    stop: StopHandle,
    stop_rx: watch::Receiver<bool>,
}

impl<S: StatusSource> ProgressPoller<S> {
    pub fn new(source: S, endpoint: impl Into<String>, config: PollConfig) -> Self {
        let (tx, stop_rx) = watch::channel(false);
        Self {
            source,
            endpoint: endpoint.into(),
            config,
            stop: StopHandle { tx: Arc::new(tx) },
            stop_rx,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Poll until a terminal state and return how it ended.
    ///
    /// `on_update` runs once per received status, in arrival order, before
    /// the next poll is scheduled. Consuming `self` means a poller finishes
    /// at most once.
    pub async fn run<F>(self, mut on_update: F) -> Result<PollOutcome, ApiError>
    where
        F: FnMut(&ProgressStatus),
    {
        let ProgressPoller {
            source,
            endpoint,
            config,
            stop: _stop_guard,
            mut stop_rx,
        } = self;

        let started = Instant::now();
        let deadline = config.timeout.map(|t| started + t);
        let mut backoff = config.retry.backoff();
        let mut attempts: u32 = 0;
        let mut failures: u32 = 0;

        loop {
            if *stop_rx.borrow() {
                log::debug!("Polling {} stopped", endpoint);
                return Ok(PollOutcome::Stopped);
            }
            if config.max_attempts.is_some_and(|max| attempts >= max)
                || deadline.is_some_and(|d| Instant::now() >= d)
            {
                log::warn!("Polling {} timed out after {} attempts", endpoint, attempts);
                return Ok(PollOutcome::TimedOut { attempts });
            }

            attempts += 1;
            let result = tokio::select! {
                biased;
                _ = stop_rx.wait_for(|stopped| *stopped) => return Ok(PollOutcome::Stopped),
                result = source.fetch_status(&endpoint) => result,
            };

            // a stop that raced the response still discards it
            if *stop_rx.borrow() {
                return Ok(PollOutcome::Stopped);
            }

            let delay = match result {
                Ok(status) => {
                    failures = 0;
                    backoff.reset();
                    on_update(&status);

                    match status.state() {
                        JobState::Completed => return Ok(PollOutcome::Completed(status)),
                        JobState::Failed => return Ok(PollOutcome::Failed(status)),
                        JobState::Running => config.interval,
                    }
                }
                Err(error) => {
                    failures += 1;
                    if !config.retry.should_retry(&error, failures) {
                        log::error!(
                            "Polling {} abandoned after {} consecutive failures: {}",
                            endpoint,
                            failures,
                            error
                        );
                        return Err(error);
                    }
                    let delay = backoff.next_backoff().unwrap_or(config.interval);
                    log::warn!(
                        "Status poll failed ({}/{}), retrying in {:?}: {}",
                        failures,
                        config.retry.max_retries,
                        delay,
                        error
                    );
                    delay
                }
            };

            let delay = match deadline {
                Some(d) => delay.min(d.saturating_duration_since(Instant::now())),
                None => delay,
            };

            tokio::select! {
                biased;
                _ = stop_rx.wait_for(|stopped| *stopped) => return Ok(PollOutcome::Stopped),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
