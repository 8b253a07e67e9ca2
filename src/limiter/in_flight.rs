//! In-flight fetch counting and RAII guard.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Current and peak number of fetches running under one limiter.
#[derive(Debug, Default)]
pub(super) struct InFlightCounter {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightCounter {
    pub(super) fn current(&self) -> usize { self.current.load(Ordering::Acquire) }

    pub(super) fn peak(&self) -> usize { self.peak.load(Ordering::Acquire) }
}

/// RAII guard incrementing the counter on creation and decrementing it on
/// drop, so a panicking fetch still releases its slot.
pub(super) struct InFlightGuard<'a> {
    counter: &'a InFlightCounter,
}

impl<'a> InFlightGuard<'a> {
    pub(super) fn new(counter: &'a InFlightCounter) -> Self {
        let now = counter.current.fetch_add(1, Ordering::AcqRel) + 1;
        counter.peak.fetch_max(now, Ordering::AcqRel);
        crate::metrics::inc_in_flight();
        Self { counter }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.current.fetch_sub(1, Ordering::AcqRel);
        crate::metrics::dec_in_flight();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_tracks_current_and_peak() {
        let counter = InFlightCounter::default();
        {
            let _first = InFlightGuard::new(&counter);
            let _second = InFlightGuard::new(&counter);
            assert_eq!(counter.current(), 2);
        }
        let _third = InFlightGuard::new(&counter);

        assert_eq!(counter.current(), 1);
        assert_eq!(counter.peak(), 2);
    }
}
