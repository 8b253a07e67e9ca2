//! Sampling windows for gap filling.
//!
//! The focus window estimates how far into the namespace the fragments reach
//! from the density observed so far; the probe window lies just beyond it so
//! an unobserved maximum index still gets a chance to appear.

use std::ops::RangeInclusive;

use crate::fragment::FragmentStore;

/// Identifier window gap filling should concentrate on.
///
/// With fragments in hand, the window reaches from the start of `initial`
/// far enough to hold the expected `max_index + 1` fragments at the observed
/// density, plus a quarter of the observed span as headroom, and never ends
/// before `initial` does. Each of `expansions` doubles the width. The result
/// is clamped to `namespace_max`.
#[must_use]
pub fn focus_window(
    store: &FragmentStore,
    initial: &RangeInclusive<u64>,
    namespace_max: u64,
    expansions: u32,
) -> RangeInclusive<u64> {
    let start = *initial.start();
    let estimate = match (store.max_source_id(), store.max_index()) {
        (Some(max_id), Some(max_index)) if max_id.get() >= start => {
            let span = max_id.get() - start + 1;
            let expected = max_index.message_len();
            let found = u64::try_from(store.len()).unwrap_or(u64::MAX).max(1);
            start
                .saturating_add(span.saturating_mul(expected) / found)
                .saturating_add(span / 4)
        }
        _ => *initial.end(),
    };
    let base_end = estimate.max(*initial.end());
    let width = (base_end - start).saturating_add(1);
    let scaled = width.saturating_mul(1_u64.checked_shl(expansions).unwrap_or(u64::MAX));
    let end = start.saturating_add(scaled - 1).min(namespace_max);
    start..=end.max(start)
}

/// Window just beyond `focus`, as wide as `focus`, or `None` when `focus`
/// already reaches `namespace_max`.
#[must_use]
pub fn probe_window(focus: &RangeInclusive<u64>, namespace_max: u64) -> Option<RangeInclusive<u64>> {
    let (start, end) = (*focus.start(), *focus.end());
    if end >= namespace_max {
        return None;
    }
    let width = (end - start).saturating_add(1);
    Some(end + 1..=end.saturating_add(width).min(namespace_max))
}
