//! Random candidate selection without replacement.

use std::{collections::HashSet, ops::RangeInclusive};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::fragment::CandidateId;

/// Windows up to this width are enumerated; wider ones use rejection sampling.
const DENSE_WINDOW: u64 = 1 << 16;

/// Rejection sampling gives up after this many draws per requested candidate.
const DRAWS_PER_CANDIDATE: usize = 16;

/// Draws untried candidates uniformly from identifier windows.
#[derive(Debug)]
pub struct CandidateSampler {
    rng: StdRng,
}

impl CandidateSampler {
    /// Seeded sampler for reproducible runs; `None` seeds from entropy.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { rng }
    }

    /// Draw up to `count` distinct identifiers from `window` that are not in
    /// `exclude`.
    ///
    /// Fewer than `count` are returned when the window does not hold enough
    /// untried identifiers. An empty result means the window is exhausted
    /// (for dense windows) or saturated (for sparse ones).
    pub fn sample(
        &mut self,
        window: RangeInclusive<u64>,
        count: usize,
        exclude: &HashSet<CandidateId>,
    ) -> Vec<CandidateId> {
        if count == 0 || window.is_empty() {
            return Vec::new();
        }
        let width = (window.end() - window.start()).saturating_add(1);
        if width <= DENSE_WINDOW {
            let available: Vec<CandidateId> = window
                .map(CandidateId::new)
                .filter(|id| !exclude.contains(id))
                .collect();
            available
                .choose_multiple(&mut self.rng, count)
                .copied()
                .collect()
        } else {
            self.sample_sparse(window, count, exclude)
        }
    }

    fn sample_sparse(
        &mut self,
        window: RangeInclusive<u64>,
        count: usize,
        exclude: &HashSet<CandidateId>,
    ) -> Vec<CandidateId> {
        let mut chosen = HashSet::with_capacity(count);
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count.saturating_mul(DRAWS_PER_CANDIDATE) {
            if picked.len() == count {
                break;
            }
            let id = CandidateId::new(self.rng.gen_range(window.clone()));
            if !exclude.contains(&id) && chosen.insert(id) {
                picked.push(id);
            }
        }
        picked
    }
}
