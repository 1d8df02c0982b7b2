//! Reliable request execution: quota backoff and credential recovery.
//!
//! [`ReliableExecutor::run`] wraps one remote call. Failures are sorted by
//! [`classify_error`]:
//!
//! - **Quota** (429 / `quota` / `resource_exhausted`): wait
//!   `base_delay * 2^(ceiling_exponent - retries_left)` and try again, at most
//!   `max_retries` times. With the defaults that is 2s, 4s, 8s, 16s, 32s.
//! - **Invalid credential** (`requested entity was not found` /
//!   `api_key_invalid`): if a [`CredentialReselector`] was injected, await it
//!   and make exactly one more attempt. Otherwise fail.
//! - **Other**: fail immediately.
//!
//! The original error is always the one surfaced; nothing is swallowed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::error::KernelError;

/// Backoff settings for [`ReliableExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Quota retries after the first attempt (0 = never retry).
    pub max_retries: u32,
    /// Unit delay multiplied by the power-of-two factor.
    pub base_delay: Duration,
    /// Exponent offset: the delay with `r` retries left is
    /// `base_delay * 2^(ceiling_exponent - r)`.
    pub ceiling_exponent: u32,
}

/// Largest quota retry budget accepted from configuration.
pub const MAX_RETRY_BUDGET: u32 = 10;

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(1000),
            ceiling_exponent: 6,
        }
    }
}

impl RetryConfig {
    /// Create a config with the given number of retries and default timing.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    /// No retries at all: quota errors surface on the first failure.
    pub fn disabled() -> Self {
        Self::with_retries(0)
    }

    /// Delay to wait when `retries_left` retries remain.
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    pub fn delay_for_remaining(&self, retries_left: u32) -> Duration {
        let exponent = (i64::from(self.ceiling_exponent) - i64::from(retries_left)).clamp(-64, 64);
        let factor = 2f64.powi(exponent as i32);
        Duration::try_from_secs_f64(self.base_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }
}

/// Outcome of [`classify_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rate limit or quota exhaustion. Retried with backoff.
    Quota,
    /// Missing, revoked or mistyped API key. Recoverable by reselection.
    InvalidCredential,
    /// Anything else. Never retried.
    Other,
}

/// Classify raw error text plus an optional HTTP status.
///
/// Quota markers win when both kinds are present.
pub fn classify_text(text: &str, status: Option<u16>) -> ErrorClass {
    let lower = text.to_lowercase();
    if status == Some(429)
        || ["429", "quota", "resource_exhausted"]
            .iter()
            .any(|m| lower.contains(m))
    {
        return ErrorClass::Quota;
    }
    if ["requested entity was not found", "api_key_invalid"]
        .iter()
        .any(|m| lower.contains(m))
    {
        return ErrorClass::InvalidCredential;
    }
    ErrorClass::Other
}

/// Classify a [`KernelError`] using its display text and status code.
pub fn classify_error(error: &KernelError) -> ErrorClass {
    match error {
        // Local failures are never retried.
        KernelError::EmptyBuffer(_) | KernelError::Config(_) | KernelError::Io(_) => {
            ErrorClass::Other
        }
        _ => classify_text(&error.to_string(), error.status_code()),
    }
}

/// Interactive credential recovery, injected into the executor.
///
/// `reselect` suspends until the user has picked a new key; the
/// implementation is responsible for making the new key visible to the
/// backend (see [`ApiKey`](crate::ApiKey)).
pub trait CredentialReselector: Send + Sync {
    fn reselect(&self) -> BoxFuture<'_, Result<(), KernelError>>;
}

/// Runs remote calls with quota backoff and credential recovery.
#[derive(Clone, Default)]
pub struct ReliableExecutor {
    config: RetryConfig,
    reselector: Option<Arc<dyn CredentialReselector>>,
}

impl std::fmt::Debug for ReliableExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReliableExecutor")
            .field("config", &self.config)
            .field("reselector", &self.reselector.is_some())
            .finish()
    }
}

impl ReliableExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            reselector: None,
        }
    }

    /// Attach a credential reselection hook.
    pub fn with_reselector(mut self, reselector: Arc<dyn CredentialReselector>) -> Self {
        self.reselector = Some(reselector);
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn has_reselector(&self) -> bool {
        self.reselector.is_some()
    }

    /// Execute `op` until it succeeds or fails terminally.
    ///
    /// `op` is called once per attempt. The retry counter is local to this
    /// call, so concurrent `run`s on the same executor never interfere.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, KernelError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, KernelError>>,
    {
        let mut retries_left = self.config.max_retries;
        let mut attempt: u32 = 1;

        loop {
            let error = match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("request succeeded on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            match classify_error(&error) {
                ErrorClass::Quota if retries_left > 0 => {
                    let delay = self.config.delay_for_remaining(retries_left);
                    warn!(
                        "[KERNEL_QUOTA]: Rate limit reached. Retrying in {}ms... ({} retries left)",
                        delay.as_millis(),
                        retries_left
                    );
                    tokio::time::sleep(delay).await;
                    retries_left -= 1;
                    attempt += 1;
                }
                ErrorClass::Quota => {
                    warn!("[KERNEL_QUOTA]: retry budget exhausted after {attempt} attempt(s)");
                    return Err(error);
                }
                ErrorClass::InvalidCredential => {
                    let Some(reselector) = &self.reselector else {
                        debug!("credential error with no reselector: {error}");
                        return Err(error);
                    };
                    info!("credential rejected, requesting key reselection");
                    reselector.reselect().await?;
                    return op().await;
                }
                ErrorClass::Other => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use tokio::time::Instant;

    fn quota_error() -> KernelError {
        KernelError::Http {
            status: 429,
            body: "RESOURCE_EXHAUSTED".into(),
        }
    }

    fn credential_error() -> KernelError {
        KernelError::Api {
            code: 400,
            status: "INVALID_ARGUMENT".into(),
            message: "API key not valid. Reason: API_KEY_INVALID".into(),
        }
    }

    /// Paused-clock sleeps land on millisecond ticks, so allow a little
    /// slack above the nominal total.
    fn assert_elapsed(start: Instant, expected: Duration) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "elapsed {elapsed:?}, expected {expected:?}"
        );
    }

    struct FlagReselector(AtomicBool);

    impl CredentialReselector for FlagReselector {
        fn reselect(&self) -> BoxFuture<'_, Result<(), KernelError>> {
            Box::pin(async move {
                self.0.store(true, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    struct FailingReselector;

    impl CredentialReselector for FailingReselector {
        fn reselect(&self) -> BoxFuture<'_, Result<(), KernelError>> {
            Box::pin(async { Err(KernelError::Credential("dialog dismissed".into())) })
        }
    }

    #[test]
    fn default_schedule_is_two_to_thirty_two_seconds() {
        let config = RetryConfig::default();
        let delays: Vec<u128> = (1..=5)
            .rev()
            .map(|r| config.delay_for_remaining(r).as_millis())
            .collect();
        assert_eq!(delays, vec![2000, 4000, 8000, 16000, 32000]);
    }

    #[test]
    fn extreme_budgets_do_not_overflow() {
        let config = RetryConfig::with_retries(3_000_000_000);
        assert_eq!(config.delay_for_remaining(3_000_000_000), Duration::ZERO);
        assert_eq!(config.delay_for_remaining(u32::MAX), Duration::ZERO);

        let steep = RetryConfig {
            max_retries: 5,
            base_delay: Duration::from_secs(1000),
            ceiling_exponent: u32::MAX,
        };
        assert_eq!(steep.delay_for_remaining(0), Duration::MAX);
    }

    #[test]
    fn with_retries_sets_count() {
        assert_eq!(RetryConfig::with_retries(3).max_retries, 3);
        assert_eq!(RetryConfig::disabled().max_retries, 0);
    }

    #[test]
    fn classifies_quota_markers() {
        assert_eq!(classify_text("HTTP 429 Too Many Requests", None), ErrorClass::Quota);
        assert_eq!(classify_text("Quota exceeded for metric", None), ErrorClass::Quota);
        assert_eq!(classify_text("status RESOURCE_EXHAUSTED", None), ErrorClass::Quota);
        assert_eq!(classify_text("slow down", Some(429)), ErrorClass::Quota);
        assert_eq!(classify_error(&quota_error()), ErrorClass::Quota);
    }

    #[test]
    fn classifies_credential_markers() {
        assert_eq!(
            classify_text("Requested entity was not found.", Some(404)),
            ErrorClass::InvalidCredential
        );
        assert_eq!(classify_error(&credential_error()), ErrorClass::InvalidCredential);
    }

    #[test]
    fn quota_wins_over_credential() {
        assert_eq!(
            classify_text("api_key_invalid and quota exceeded", None),
            ErrorClass::Quota
        );
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(classify_text("HTTP 500: internal", Some(500)), ErrorClass::Other);
        assert_eq!(
            classify_error(&KernelError::NoImage("synthesis failed".into())),
            ErrorClass::Other
        );
        assert_eq!(
            classify_error(&KernelError::Config("quota field missing".into())),
            ErrorClass::Other
        );
    }

    #[tokio::test(start_paused = true)]
    async fn quota_then_success_follows_backoff_schedule() {
        let executor = ReliableExecutor::default();
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result = executor
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { if n < 3 { Err(quota_error()) } else { Ok("image") } }
            })
            .await;

        assert_eq!(result.unwrap(), "image");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // 2s + 4s + 8s for retries_left = 5, 4, 3.
        assert_elapsed(start, Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_quota_exhausts_budget() {
        let executor = ReliableExecutor::default();
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let err = executor
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(quota_error()) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, KernelError::Http { status: 429, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_elapsed(start, Duration::from_secs(2 + 4 + 8 + 16 + 32));
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_fail_after_one_attempt() {
        let executor = ReliableExecutor::default();
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let err = executor
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<(), _>(KernelError::Http {
                        status: 500,
                        body: "internal".into(),
                    })
                }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, KernelError::Http { status: 500, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_elapsed(start, Duration::ZERO);
    }

    #[tokio::test]
    async fn credential_error_without_reselector_fails_fast() {
        let executor = ReliableExecutor::default();
        let calls = AtomicU32::new(0);

        let err = executor
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(credential_error()) }
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("API_KEY_INVALID"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn credential_error_reselects_then_retries_once() {
        let reselector = Arc::new(FlagReselector(AtomicBool::new(false)));
        let executor = ReliableExecutor::default().with_reselector(reselector.clone());
        let calls = AtomicU32::new(0);

        let result = executor
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { if n == 0 { Err(credential_error()) } else { Ok(7) } }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert!(reselector.0.load(Ordering::SeqCst));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_after_reselection_is_final() {
        let executor = ReliableExecutor::default()
            .with_reselector(Arc::new(FlagReselector(AtomicBool::new(false))));
        let calls = AtomicU32::new(0);

        // Even a quota error after reselection is not retried.
        let err = executor
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err::<(), _>(credential_error())
                    } else {
                        Err(quota_error())
                    }
                }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, KernelError::Http { status: 429, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn reselector_failure_propagates() {
        let executor = ReliableExecutor::default().with_reselector(Arc::new(FailingReselector));
        let calls = AtomicU32::new(0);

        let err = executor
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(credential_error()) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, KernelError::Credential(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_runs_keep_separate_counters() {
        let executor = ReliableExecutor::new(RetryConfig::with_retries(1));
        let a_calls = AtomicU32::new(0);
        let b_calls = AtomicU32::new(0);

        let a = executor.run(|| {
            let n = a_calls.fetch_add(1, Ordering::SeqCst);
            async move { if n == 0 { Err(quota_error()) } else { Ok('a') } }
        });
        let b = executor.run(|| {
            let n = b_calls.fetch_add(1, Ordering::SeqCst);
            async move { if n == 0 { Err(quota_error()) } else { Ok('b') } }
        });
        let (a, b) = futures::join!(a, b);

        assert_eq!(a.unwrap(), 'a');
        assert_eq!(b.unwrap(), 'b');
        assert_eq!(a_calls.load(Ordering::SeqCst), 2);
        assert_eq!(b_calls.load(Ordering::SeqCst), 2);
    }
}
