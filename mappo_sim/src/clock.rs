//! Virtual clock implementing SimClock for deterministic playback.

use async_trait::async_trait;
use mappo_env::SimClock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Clock backed by a virtual counter.
///
/// This implements `SimClock` using:
/// - A virtual clock that can be advanced manually
/// - Simulated sleep that advances virtual time instead of waiting
///
/// A full 0→100 playback at 1x "takes" 100 virtual seconds and returns
/// immediately.
pub struct VirtualClock {
    /// Master seed for this run
    seed: u64,

    /// Current virtual time (nanoseconds since clock start)
    virtual_time_ns: Arc<Mutex<u64>>,
}

impl VirtualClock {
    /// Creates a new VirtualClock with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            virtual_time_ns: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an Arc-wrapped clock for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self.lock();
        *time = time.saturating_add(duration.as_nanos() as u64);
    }

    /// Sets the virtual time to a specific value.
    pub fn set_time(&self, time_ns: u64) {
        *self.lock() = time_ns;
    }

    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, u64> {
        // A poisoned counter still holds a valid u64
        self.virtual_time_ns
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for VirtualClock {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
        }
    }
}

#[async_trait]
impl SimClock for VirtualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    async fn sleep(&self, duration: Duration) {
        // In simulation, sleep advances virtual time
        self.advance_time(duration);
    }

    fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_time() {
        let clock = VirtualClock::new(42);
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance_time(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));

        clock.advance_time(Duration::from_millis(500));
        assert_eq!(clock.now(), Duration::from_millis(1500));

        clock.set_time(0);
        assert_eq!(clock.time_ns(), 0);
    }

    #[tokio::test]
    async fn test_sleep_advances_virtual_time() {
        let clock = VirtualClock::new(1);
        clock.sleep(Duration::from_millis(200)).await;
        assert_eq!(clock.now(), Duration::from_millis(200));
    }

    #[test]
    fn test_virtual_clock_seed() {
        let clock = VirtualClock::new(12345);
        assert_eq!(clock.seed(), 12345);
    }

    #[test]
    fn test_virtual_clock_clone_shares_time() {
        let clock1 = VirtualClock::new(42);
        let clock2 = clock1.clone();

        clock1.advance_time(Duration::from_secs(5));

        // Both should see the same time
        assert_eq!(clock1.now(), clock2.now());
    }
}
