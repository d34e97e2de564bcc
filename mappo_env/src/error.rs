//! Error types for the MAPPO environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// Speed multiplier outside the supported range
    #[error("Invalid playback speed {value}x (supported: 1x-{max}x)")]
    InvalidSpeed { value: u32, max: u32 },
}
