//! Three-phase fragment discovery.
//!
//! [`Decoder`] owns the [`FragmentStore`], the [`SearchState`] counters, and a
//! [`ConcurrencyLimiter`]. It runs initial discovery, then gap filling, then
//! the extended sweep, checking completion after every batch and stopping the
//! moment the discovered indices form an unbroken run. Only the orchestrating
//! task mutates the store; fetch tasks hand their outcomes back through the
//! limiter and results are merged one at a time.

mod sampler;
pub mod state;
pub mod window;

use std::{ops::RangeInclusive, time::Duration};

use log::{debug, info, warn};

pub use self::{
    sampler::CandidateSampler,
    state::{Phase, SearchState},
};
use crate::{
    config::{ConfigError, DecoderConfig},
    error::{ExhaustedSearch, ExhaustionReason, Result},
    fetch::{FetchOutcome, FragmentSource, HttpSource},
    fragment::{AssembledMessage, CandidateId, FragmentStore, MergeStatus, assemble},
    limiter::{BatchResults, ConcurrencyLimiter},
    metrics,
};

/// Result of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeReport {
    /// The reassembled message.
    pub message: AssembledMessage,
    /// Wall-clock time from run start to completion.
    pub elapsed: Duration,
    /// Number of fragments in the message.
    pub fragment_count: usize,
    /// Number of fetches issued.
    pub requests_made: usize,
    /// Phase during which the message became complete.
    pub completed_in: Phase,
}

/// Drives the search for one message.
pub struct Decoder<S> {
    config: DecoderConfig,
    limiter: ConcurrencyLimiter<S>,
    store: FragmentStore,
    state: SearchState,
    sampler: CandidateSampler,
}

impl<S: FragmentSource> Decoder<S> {
    /// Create a decoder fetching from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation; nothing is
    /// fetched in that case.
    pub fn new(config: DecoderConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            limiter: ConcurrencyLimiter::from_config(source, &config),
            sampler: CandidateSampler::new(config.seed),
            store: FragmentStore::new(),
            state: SearchState::start(),
            config,
        })
    }

    /// Fragments discovered so far.
    #[must_use]
    pub fn store(&self) -> &FragmentStore { &self.store }

    /// Counters for the current or last run.
    #[must_use]
    pub fn state(&self) -> &SearchState { &self.state }

    /// Limiter used for fetching, exposing in-flight statistics.
    #[must_use]
    pub fn limiter(&self) -> &ConcurrencyLimiter<S> { &self.limiter }

    /// Run all phases until the message is complete or a cap is reached.
    ///
    /// Each call starts a fresh run: discovered fragments and attempted
    /// candidates from an earlier call are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ExhaustedSearch`](crate::DecodeError) when the
    /// sweep hits a cap before completion.
    pub async fn run(&mut self) -> Result<DecodeReport> {
        self.state = SearchState::start();
        self.store = FragmentStore::new();
        info!(
            "decode started: endpoint={}, max_concurrent={}",
            self.config.endpoint.base_url, self.config.max_concurrent
        );

        self.initial_discovery().await;
        if !self.store.is_complete() {
            self.fill_gaps().await;
        }
        if !self.store.is_complete()
            && let Err(reason) = self.extended_search().await
        {
            return Err(self.exhausted(reason).into());
        }

        let message = assemble(&self.store)?;
        let report = DecodeReport {
            message,
            elapsed: self.state.elapsed(),
            fragment_count: self.store.len(),
            requests_made: self.state.requests_made(),
            completed_in: self.state.phase(),
        };
        tracing::info!(
            fragments = report.fragment_count,
            requests = report.requests_made,
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            phase = %report.completed_in,
            "message decoded"
        );
        Ok(report)
    }

    async fn initial_discovery(&mut self) {
        self.state.enter(Phase::InitialDiscovery);
        let count = self
            .config
            .initial_sample_size
            .min(self.remaining_requests());
        let candidates = self.sampler.sample(
            self.config.initial_sample_range.clone(),
            count,
            self.store.attempted(),
        );
        info!("phase started: phase={}, candidates={}", Phase::InitialDiscovery, candidates.len());
        self.run_and_merge(candidates).await;
    }

    async fn fill_gaps(&mut self) {
        self.state.enter(Phase::GapFilling);
        info!(
            "phase started: phase={}, gaps={:?}, max_index={:?}",
            Phase::GapFilling,
            self.store.gaps(),
            self.state.max_index()
        );

        let mut expansions = 0_u32;
        for batch_no in 1..=self.config.phase2_batch_budget {
            if self.store.is_complete() {
                return;
            }
            if self.state.elapsed() >= self.config.phase3_time_cap {
                debug!("gap filling stopped: time cap reached");
                return;
            }
            let remaining = self.remaining_requests();
            if remaining == 0 {
                debug!("gap filling stopped: request cap reached");
                return;
            }

            let probing = batch_no % self.config.phase2_probe_interval == 0;
            let batch_size = self.config.phase2_batch_size().min(remaining);
            let Some(candidates) = self.next_gap_batch(probing, batch_size, &mut expansions) else {
                debug!("gap filling stopped: namespace fully attempted");
                return;
            };
            debug!(
                "gap batch: batch={batch_no}, probing={probing}, candidates={}, gaps={}",
                candidates.len(),
                self.store.gaps().len()
            );
            self.run_and_merge(candidates).await;
        }
    }

    /// Pick the next gap-filling batch, widening the focus window whenever it
    /// has run dry. Returns `None` once the whole namespace has been tried.
    fn next_gap_batch(
        &mut self,
        probing: bool,
        batch_size: usize,
        expansions: &mut u32,
    ) -> Option<Vec<CandidateId>> {
        loop {
            let focus = self.focus_window(*expansions);
            if probing
                && let Some(beyond) = window::probe_window(&focus, self.config.namespace_max)
            {
                let candidates = self.sampler.sample(beyond, batch_size, self.store.attempted());
                if !candidates.is_empty() {
                    return Some(candidates);
                }
            }

            let candidates = self
                .sampler
                .sample(focus.clone(), batch_size, self.store.attempted());
            if !candidates.is_empty() {
                return Some(candidates);
            }
            if *focus.end() >= self.config.namespace_max {
                return None;
            }
            *expansions += 1;
        }
    }

    fn focus_window(&self, expansions: u32) -> RangeInclusive<u64> {
        window::focus_window(
            &self.store,
            &self.config.initial_sample_range,
            self.config.namespace_max,
            expansions,
        )
    }

    async fn extended_search(&mut self) -> Result<(), ExhaustionReason> {
        self.state.enter(Phase::ExtendedSearch);
        info!(
            "phase started: phase={}, attempted={}, fill_ratio={:.2}",
            Phase::ExtendedSearch,
            self.store.attempted_len(),
            self.store.fill_ratio()
        );

        let mut cursor = self.config.namespace_min;
        let mut idle_batches = 0_usize;
        loop {
            if self.store.is_complete() {
                return Ok(());
            }
            let remaining = self.remaining_requests();
            if remaining == 0 {
                return Err(ExhaustionReason::RequestCap);
            }
            if self.state.elapsed() >= self.config.phase3_time_cap {
                return Err(ExhaustionReason::TimeCap);
            }
            if self
                .config
                .phase3_idle_batch_limit
                .is_some_and(|limit| idle_batches >= limit)
            {
                return Err(ExhaustionReason::IdleBatchLimit);
            }

            let batch_size = self.config.phase3_batch_size().min(remaining);
            let candidates = self.next_sweep_batch(&mut cursor, batch_size);
            if candidates.is_empty() {
                return Err(ExhaustionReason::NamespaceExhausted);
            }

            if self.run_and_merge(candidates).await == 0 {
                idle_batches += 1;
            } else {
                idle_batches = 0;
            }
        }
    }

    fn remaining_requests(&self) -> usize {
        self.config
            .phase3_request_cap
            .saturating_sub(self.state.requests_made())
    }

    /// Collect up to `batch_size` untried identifiers in ascending order from
    /// `cursor`, advancing it past everything examined.
    fn next_sweep_batch(&self, cursor: &mut u64, batch_size: usize) -> Vec<CandidateId> {
        let mut batch = Vec::with_capacity(batch_size);
        while batch.len() < batch_size && *cursor <= self.config.namespace_max {
            let id = CandidateId::new(*cursor);
            if !self.store.was_attempted(id) {
                batch.push(id);
            }
            match cursor.checked_add(1) {
                Some(next) => *cursor = next,
                None => break,
            }
        }
        batch
    }

    /// Fetch `candidates` and merge the outcomes; returns the number of new
    /// fragments.
    async fn run_and_merge(&mut self, candidates: Vec<CandidateId>) -> usize {
        let results = self
            .limiter
            .run_batch(candidates, self.store.attempted())
            .await;
        let requests = results.len();
        let inserted = self.merge(results);
        self.state.record_batch(requests, &self.store);
        debug!(
            "batch merged: phase={}, requests={requests}, new_fragments={inserted}, \
             fragments={}, complete={}",
            self.state.phase(),
            self.store.len(),
            self.store.is_complete()
        );
        inserted
    }

    fn merge(&mut self, results: BatchResults) -> usize {
        let mut inserted = 0;
        for (id, outcome) in results {
            let found = match &outcome {
                FetchOutcome::Found(fragment) => Some(fragment.clone()),
                _ => None,
            };
            match self.store.merge(id, outcome) {
                MergeStatus::Inserted => {
                    inserted += 1;
                    metrics::inc_discovered();
                    if let Some(fragment) = found {
                        info!(
                            "fragment found: index={}, candidate={id}, text={:?}",
                            fragment.index(),
                            fragment.text()
                        );
                    }
                }
                MergeStatus::Duplicate => {
                    debug!("duplicate fragment ignored: candidate={id}");
                }
                MergeStatus::Rejected => {
                    warn!("fragment with empty text ignored: candidate={id}");
                }
                MergeStatus::Absent | MergeStatus::Failed => {}
            }
        }
        inserted
    }

    fn exhausted(&self, reason: ExhaustionReason) -> ExhaustedSearch {
        let exhausted = ExhaustedSearch {
            reason,
            fill_ratio: self.store.fill_ratio(),
            fragments_found: self.store.len(),
            requests_made: self.state.requests_made(),
            elapsed: self.state.elapsed(),
        };
        tracing::warn!(
            reason = %exhausted.reason,
            fragments = exhausted.fragments_found,
            requests = exhausted.requests_made,
            fill_ratio = exhausted.fill_ratio,
            gaps = ?self.store.gaps(),
            "search exhausted"
        );
        exhausted
    }
}

/// Decode the message served by the HTTP endpoint in `config`.
///
/// # Errors
///
/// Returns [`DecodeError::Config`](crate::DecodeError::Config) before any
/// fetch when `config` is invalid, [`DecodeError::Client`](crate::DecodeError::Client)
/// if the HTTP client cannot be built, and
/// [`DecodeError::ExhaustedSearch`](crate::DecodeError::ExhaustedSearch) when
/// the caps are reached without completing the message.
pub async fn run_decoder(config: DecoderConfig) -> Result<DecodeReport> {
    config.validate()?;
    let source = HttpSource::from_config(&config)?;
    run_decoder_with_source(config, source).await
}

/// Decode the message served by an arbitrary [`FragmentSource`].
///
/// # Errors
///
/// As for [`run_decoder`], minus the client construction failure.
pub async fn run_decoder_with_source<S: FragmentSource>(
    config: DecoderConfig,
    source: S,
) -> Result<DecodeReport> {
    Decoder::new(config, source)?.run().await
}
