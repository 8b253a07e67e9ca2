//! In-memory [`FragmentSource`] for driving the decoder without a network.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use fragment_decoder::{CandidateId, FetchError, FetchOutcome, Fragment, FragmentIndex, FragmentSource};

/// The four-fragment message used throughout the test suite:
/// `(candidate id, index, text)`.
pub const TEST_MESSAGE: [(u64, u32, &str); 4] =
    [(17, 0, "This"), (42, 1, "is"), (5, 2, "a"), (99, 3, "test")];

/// Text [`TEST_MESSAGE`] assembles to.
pub const TEST_MESSAGE_TEXT: &str = "This is a test";

#[derive(Default)]
struct Inner {
    fragments: HashMap<CandidateId, Fragment>,
    failures: HashMap<CandidateId, FetchError>,
    panics: HashSet<CandidateId>,
    latency: Duration,
    calls: Mutex<Vec<CandidateId>>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// Fragment map with call recording, latency, and injected failures.
///
/// Clones share state, so a test can hand one clone to the decoder and
/// inspect the calls through another afterwards.
///
/// ```
/// use decoder_testing::{StubSource, TEST_MESSAGE};
///
/// let source = StubSource::new(TEST_MESSAGE).failing(7, fragment_decoder::FetchError::Status(500));
/// assert_eq!(source.call_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct StubSource {
    inner: Arc<Inner>,
}

impl StubSource {
    /// Serve `entries` given as `(candidate id, index, text)`.
    #[must_use]
    pub fn new<'a>(entries: impl IntoIterator<Item = (u64, u32, &'a str)>) -> Self {
        let fragments = entries
            .into_iter()
            .map(|(id, index, text)| {
                (
                    CandidateId::new(id),
                    Fragment::new(FragmentIndex::new(index), text),
                )
            })
            .collect();
        Self {
            inner: Arc::new(Inner {
                fragments,
                ..Inner::default()
            }),
        }
    }

    /// Serve [`TEST_MESSAGE`].
    #[must_use]
    pub fn test_message() -> Self { Self::new(TEST_MESSAGE) }

    /// Delay every fetch by `latency`.
    ///
    /// # Panics
    ///
    /// Panics if called after the source has been cloned.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.inner_mut().latency = latency;
        self
    }

    /// Answer `id` with `error` instead of its fragment.
    ///
    /// # Panics
    ///
    /// Panics if called after the source has been cloned.
    #[must_use]
    pub fn failing(mut self, id: u64, error: FetchError) -> Self {
        self.inner_mut().failures.insert(CandidateId::new(id), error);
        self
    }

    /// Panic while fetching `id`.
    ///
    /// # Panics
    ///
    /// Panics if called after the source has been cloned.
    #[must_use]
    pub fn panicking(mut self, id: u64) -> Self {
        self.inner_mut().panics.insert(CandidateId::new(id));
        self
    }

    fn inner_mut(&mut self) -> &mut Inner {
        Arc::get_mut(&mut self.inner).expect("configure StubSource before cloning it")
    }

    /// Every candidate fetched so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the call log lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<CandidateId> {
        self.inner.calls.lock().expect("call log poisoned").clone()
    }

    /// Number of fetches issued so far.
    #[must_use]
    pub fn call_count(&self) -> usize { self.calls().len() }

    /// Candidates fetched more than once.
    #[must_use]
    pub fn repeated_calls(&self) -> Vec<CandidateId> {
        let mut seen = HashSet::new();
        self.calls()
            .into_iter()
            .filter(|id| !seen.insert(*id))
            .collect()
    }

    /// Highest number of fetches observed running at once.
    #[must_use]
    pub fn peak_concurrency(&self) -> usize { self.inner.peak.load(Ordering::SeqCst) }
}

/// Decrements the active count even when the fetch panics.
struct Active<'a>(&'a AtomicUsize);

impl Drop for Active<'_> {
    fn drop(&mut self) { self.0.fetch_sub(1, Ordering::SeqCst); }
}

#[async_trait]
impl FragmentSource for StubSource {
    async fn fetch(&self, id: CandidateId) -> FetchOutcome {
        let inner = &self.inner;
        inner.calls.lock().expect("call log poisoned").push(id);
        let now = inner.active.fetch_add(1, Ordering::SeqCst) + 1;
        inner.peak.fetch_max(now, Ordering::SeqCst);
        let _active = Active(&inner.active);

        if !inner.latency.is_zero() {
            tokio::time::sleep(inner.latency).await;
        }
        assert!(!inner.panics.contains(&id), "stub panic for candidate {id}");
        if let Some(error) = inner.failures.get(&id) {
            return FetchOutcome::Error(error.clone());
        }
        inner
            .fragments
            .get(&id)
            .cloned()
            .map_or(FetchOutcome::Absent, FetchOutcome::Found)
    }
}
