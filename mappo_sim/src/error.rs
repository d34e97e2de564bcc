//! Error types for the coordinator, exporter and CLI.

use mappo_core::ValidationError;
use mappo_env::EnvError;
use thiserror::Error;

/// Errors surfaced by the simulation driver.
#[derive(Debug, Error)]
pub enum SimError {
    /// Selection or lookup named a region that is not in the registry
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Navigation named an event that is not in the script
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Scenario name or query matched nothing
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
