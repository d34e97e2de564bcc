//! Common types for the MAPPO environment abstraction.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tick interval at 1x speed.
pub const BASE_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Playback speed multiplier.
///
/// Speed only changes how long the playback loop waits between cycles.
/// It never changes which cycle a rule fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaybackSpeed(u32);

impl PlaybackSpeed {
    /// Slowest speed.
    pub const MIN: u32 = 1;

    /// Fastest speed (the dashboard's fast-forward button stops at 5x).
    pub const MAX: u32 = 5;

    /// Creates a speed, rejecting values outside `MIN..=MAX`.
    pub fn new(value: u32) -> Result<Self, EnvError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(EnvError::InvalidSpeed { value, max: Self::MAX })
        }
    }

    /// Creates a speed, clamping into `MIN..=MAX`.
    pub fn clamped(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the multiplier.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns the next faster speed, saturating at `MAX`.
    pub fn faster(&self) -> Self {
        Self::clamped(self.0 + 1)
    }

    /// Scales a 1x tick interval to this speed (`base / speed`).
    pub fn scale(&self, base: Duration) -> Duration {
        base / self.0
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl std::fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_bounds() {
        assert!(PlaybackSpeed::new(0).is_err());
        assert!(PlaybackSpeed::new(6).is_err());
        assert_eq!(PlaybackSpeed::new(3).unwrap().get(), 3);
        assert_eq!(PlaybackSpeed::clamped(99).get(), PlaybackSpeed::MAX);
        assert_eq!(PlaybackSpeed::clamped(0).get(), PlaybackSpeed::MIN);
    }

    #[test]
    fn test_faster_saturates() {
        let mut speed = PlaybackSpeed::default();
        for _ in 0..10 {
            speed = speed.faster();
        }
        assert_eq!(speed.get(), 5);
    }

    #[test]
    fn test_scale() {
        assert_eq!(PlaybackSpeed::default().scale(BASE_TICK_INTERVAL), Duration::from_millis(1000));
        assert_eq!(PlaybackSpeed::clamped(2).scale(BASE_TICK_INTERVAL), Duration::from_millis(500));
        assert_eq!(PlaybackSpeed::clamped(5).scale(BASE_TICK_INTERVAL), Duration::from_millis(200));
    }

    #[test]
    fn test_display() {
        assert_eq!(PlaybackSpeed::clamped(4).to_string(), "4x");
    }
}
