//! Bounded-concurrency batch execution.
//!
//! [`ConcurrencyLimiter`] runs a batch of candidates through a
//! [`FragmentSource`] with at most `max_concurrent` fetches outstanding. Each
//! fetch runs on its own lightweight task; a new task is admitted only once a
//! semaphore permit frees up, so the pipeline stays saturated without ever
//! exceeding the bound. Every admitted candidate receives an outcome: timeouts
//! and panics are classified as [`FetchOutcome::Error`] rather than dropped.

mod in_flight;

use std::{
    any::Any,
    collections::{HashMap, HashSet},
    panic::AssertUnwindSafe,
    sync::Arc,
    time::Duration,
};

use futures::FutureExt;
use leaky_bucket::RateLimiter;
use log::{debug, error};
use tokio::{
    sync::Semaphore,
    task::{Id as TaskId, JoinError, JoinSet},
};

use self::in_flight::{InFlightCounter, InFlightGuard};
use crate::{
    config::DecoderConfig,
    fetch::{FetchError, FetchOutcome, FragmentSource},
    fragment::CandidateId,
    metrics,
};

/// Outcomes of one batch keyed by candidate. Iteration order is unspecified.
pub type BatchResults = HashMap<CandidateId, FetchOutcome>;

/// Caps the number of fetches in flight and runs batches to completion.
///
/// # Examples
///
/// ```
/// use std::{collections::HashSet, time::Duration};
///
/// use async_trait::async_trait;
/// use fragment_decoder::{
///     fetch::{FetchOutcome, FragmentSource},
///     fragment::CandidateId,
///     limiter::ConcurrencyLimiter,
/// };
///
/// struct Empty;
///
/// #[async_trait]
/// impl FragmentSource for Empty {
///     async fn fetch(&self, _id: CandidateId) -> FetchOutcome { FetchOutcome::Absent }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = ConcurrencyLimiter::new(Empty, 4, Duration::from_secs(1));
/// let ids = (1..=10).map(CandidateId::new);
/// let tried = HashSet::from([CandidateId::new(3)]);
/// let results = limiter.run_batch(ids, &tried).await;
/// assert_eq!(results.len(), 9);
/// assert!(limiter.peak_in_flight() <= 4);
/// # }
/// ```
pub struct ConcurrencyLimiter<S> {
    source: Arc<S>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    timeout: Duration,
    rate: Option<Arc<RateLimiter>>,
    in_flight: Arc<InFlightCounter>,
}

impl<S: FragmentSource> ConcurrencyLimiter<S> {
    /// Create a limiter admitting at most `max_concurrent` fetches, each
    /// bounded by `timeout`.
    #[must_use]
    pub fn new(source: S, max_concurrent: usize, timeout: Duration) -> Self {
        Self::from_arc(Arc::new(source), max_concurrent, timeout)
    }

    /// Create a limiter around a shared source.
    #[must_use]
    pub fn from_arc(source: Arc<S>, max_concurrent: usize, timeout: Duration) -> Self {
        debug_assert!(max_concurrent > 0, "max_concurrent must be greater than zero");
        let max_concurrent = max_concurrent.max(1);
        Self {
            source,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            timeout,
            rate: None,
            in_flight: Arc::new(InFlightCounter::default()),
        }
    }

    /// Create a limiter using the concurrency, timeout, and rate settings of
    /// `config`.
    #[must_use]
    pub fn from_config(source: S, config: &DecoderConfig) -> Self {
        Self::new(source, config.max_concurrent, config.timeout).with_rate_limit(config.rate_limit)
    }

    /// Limit the global request rate to `rate` requests per second.
    ///
    /// Passing `None` disables rate limiting.
    #[must_use]
    pub fn with_rate_limit(mut self, rate: Option<usize>) -> Self {
        self.rate = rate.map(|r| {
            Arc::new(
                RateLimiter::builder()
                    .initial(r)
                    .refill(r)
                    .interval(Duration::from_secs(1))
                    .max(r)
                    .build(),
            )
        });
        self
    }

    /// Upper bound on simultaneous fetches.
    #[must_use]
    pub const fn max_concurrent(&self) -> usize { self.max_concurrent }

    /// Number of fetches currently running.
    #[must_use]
    pub fn in_flight(&self) -> usize { self.in_flight.current() }

    /// Highest number of simultaneous fetches observed so far.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize { self.in_flight.peak() }

    /// Borrow the underlying source.
    #[must_use]
    pub fn source(&self) -> &S { &self.source }

    /// Fetch every candidate in `ids` not present in `already_tried`.
    ///
    /// Duplicates within `ids` are fetched once. The call returns when every
    /// admitted candidate has an outcome; results arrive in no particular
    /// order and none are discarded.
    pub async fn run_batch<I>(&self, ids: I, already_tried: &HashSet<CandidateId>) -> BatchResults
    where
        I: IntoIterator<Item = CandidateId>,
    {
        let mut admitted = HashSet::new();
        let pending: Vec<CandidateId> = ids
            .into_iter()
            .filter(|id| !already_tried.contains(id) && admitted.insert(*id))
            .collect();

        let mut results = BatchResults::with_capacity(pending.len());
        let mut tasks = JoinSet::new();
        let mut task_ids: HashMap<TaskId, CandidateId> = HashMap::with_capacity(pending.len());

        let mut queue = pending.into_iter();
        while let Some(id) = queue.next() {
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                error!("concurrency limiter closed; abandoning remaining candidates");
                for abandoned in std::iter::once(id).chain(queue.by_ref()) {
                    results.insert(abandoned, FetchOutcome::Error(FetchError::LimiterClosed));
                }
                break;
            };

            let source = Arc::clone(&self.source);
            let rate = self.rate.clone();
            let counter = Arc::clone(&self.in_flight);
            let timeout = self.timeout;
            let handle = tasks.spawn(async move {
                let _permit = permit;
                if let Some(limiter) = rate {
                    limiter.acquire(1).await;
                }
                let _guard = InFlightGuard::new(&counter);
                let outcome = fetch_bounded(source.as_ref(), id, timeout).await;
                metrics::inc_fetches(&outcome);
                (id, outcome)
            });
            task_ids.insert(handle.id(), id);
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, outcome)) => {
                    results.insert(id, outcome);
                }
                Err(err) => {
                    error!("fetch task failed to join: error={err}");
                    if let Some(id) = task_ids.get(&err.id()) {
                        results.insert(*id, FetchOutcome::Error(join_failure(&err)));
                    }
                }
            }
        }

        debug!(
            "batch finished: candidates={}, peak_in_flight={}",
            results.len(),
            self.peak_in_flight()
        );
        results
    }
}

/// Fetch `id`, converting a timeout or a panic into [`FetchOutcome::Error`].
async fn fetch_bounded<S: FragmentSource>(
    source: &S,
    id: CandidateId,
    timeout: Duration,
) -> FetchOutcome {
    let fetch = AssertUnwindSafe(tokio::time::timeout(timeout, source.fetch(id))).catch_unwind();
    match fetch.await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(_elapsed)) => FetchOutcome::Error(FetchError::Timeout),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!("fetch panicked: candidate={id}, panic={message}");
            FetchOutcome::Error(FetchError::Panicked(message))
        }
    }
}

/// Classify a fetch task that ended without returning its outcome.
fn join_failure(err: &JoinError) -> FetchError {
    if err.is_panic() {
        FetchError::Panicked(err.to_string())
    } else {
        FetchError::Cancelled
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string panic>".to_owned())
}

#[cfg(test)]
mod tests;
