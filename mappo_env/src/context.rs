//! Core clock trait for the playback loop.

use async_trait::async_trait;
use std::time::Duration;

/// The central interface for time.
///
/// This trait abstracts the "real world" so that the playback runner can
/// drive the timeline in both production (tokio) and deterministic
/// (virtual clock) environments.
///
/// # Implementations
///
/// - **Production**: `TokioClock` - wraps `tokio::time`
/// - **Simulation**: `VirtualClock` (in `mappo_sim`) - sleeping advances a counter
#[async_trait]
pub trait SimClock: Send + Sync + 'static {
    /// Returns the monotonic time since clock creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);

    /// Returns the clock's seed (for logging and cosmetic jitter).
    ///
    /// In production, returns 0 (not seeded).
    fn seed(&self) -> u64;
}
