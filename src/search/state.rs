//! Running counters threaded through a search.

use std::{fmt, time::Duration};

use tokio::time::Instant;

use crate::fragment::{FragmentIndex, FragmentStore};

/// Stage of the three-phase search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Uniform sampling of the initial range.
    InitialDiscovery,
    /// Density-guided sampling until the gaps close.
    GapFilling,
    /// Systematic ascending sweep of the remaining namespace.
    ExtendedSearch,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InitialDiscovery => "initial discovery",
            Self::GapFilling => "gap filling",
            Self::ExtendedSearch => "extended search",
        })
    }
}

/// Counters for one run, owned by the orchestrating task.
#[derive(Clone, Debug)]
pub struct SearchState {
    started_at: Instant,
    phase: Phase,
    requests_made: usize,
    batches_run: usize,
    max_index: Option<FragmentIndex>,
}

impl SearchState {
    /// Start the clock for a new run.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            phase: Phase::InitialDiscovery,
            requests_made: 0,
            batches_run: 0,
            max_index: None,
        }
    }

    /// Time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration { self.started_at.elapsed() }

    /// Phase currently running.
    #[must_use]
    pub const fn phase(&self) -> Phase { self.phase }

    /// Fetches issued so far.
    #[must_use]
    pub const fn requests_made(&self) -> usize { self.requests_made }

    /// Batches completed so far.
    #[must_use]
    pub const fn batches_run(&self) -> usize { self.batches_run }

    /// Highest fragment index observed so far.
    #[must_use]
    pub const fn max_index(&self) -> Option<FragmentIndex> { self.max_index }

    pub(crate) fn enter(&mut self, phase: Phase) { self.phase = phase; }

    pub(crate) fn record_batch(&mut self, requests: usize, store: &FragmentStore) {
        self.requests_made += requests;
        self.batches_run += 1;
        self.max_index = store.max_index();
    }
}
