//! Environment abstraction for deterministic testing.
//!
//! Decouples relay logic from system resources (time, randomness) so the
//! driver runs unchanged against a fake clock and scripted ids in tests.

use std::{ops::Sub, time::Duration};

use chrono::NaiveTime;

/// Abstract environment providing time and randomness.
///
/// Implementations MUST guarantee that `now()` never goes backwards.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Monotonic instant type. Production uses `std::time::Instant`.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Current monotonic time, used for heartbeat deadlines.
    fn now(&self) -> Self::Instant;

    /// Current time of day, stamped onto chat lines.
    fn wall_clock(&self) -> NaiveTime;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
