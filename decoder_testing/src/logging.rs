//! Serialised access to the global `logtest` logger.

use std::sync::{Mutex, MutexGuard, OnceLock};

use logtest::Logger;
use rstest::fixture;

/// Exclusive handle to the process-wide [`Logger`].
///
/// `logtest` installs a single global logger, so concurrent tests would see
/// each other's records. Holding this handle keeps other log-asserting tests
/// waiting until it is dropped.
pub struct LoggerHandle {
    guard: MutexGuard<'static, Logger>,
}

impl LoggerHandle {
    /// Acquire the logger and discard anything recorded before now.
    ///
    /// # Panics
    ///
    /// Panics if a previous holder panicked while holding the lock.
    #[must_use]
    pub fn new() -> Self {
        static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| Mutex::new(Logger::start()));
        let guard = logger.lock().expect("logger poisoned");
        let mut handle = Self { guard };
        handle.drain();
        handle
    }

    /// Take every record captured so far as `target: message` strings.
    pub fn drain(&mut self) -> Vec<String> {
        std::iter::from_fn(|| self.guard.pop())
            .map(|record| format!("{}: {}", record.target(), record.args()))
            .collect()
    }

    /// Whether any captured record contains `needle`, consuming the records.
    pub fn saw(&mut self, needle: &str) -> bool {
        self.drain().iter().any(|line| line.contains(needle))
    }
}

impl Default for LoggerHandle {
    fn default() -> Self { Self::new() }
}

impl std::ops::Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.guard }
}

impl std::ops::DerefMut for LoggerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.guard }
}

/// `rstest` fixture yielding a fresh [`LoggerHandle`].
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn logger() -> LoggerHandle { LoggerHandle::new() }
