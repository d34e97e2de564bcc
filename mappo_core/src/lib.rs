//! MAPPO Core - Deterministic Interstate Resource Timeline
//!
//! This library maps a single integer, the simulation cycle, to a complete
//! snapshot of the interstate resource picture:
//! 1. **Regions**: status per region (stable/stressed/critical/collapsed)
//! 2. **Supply links**: which water/food/power links are still honoured
//! 3. **Event feed**: the scripted events visible so far
//! 4. **Conflict matrix**: pairwise conflict probabilities
//!
//! The mapping is a pure fold of a declarative rule table over static
//! registries; there is no hidden state and no randomness.
//!
//! ```ignore
//! use mappo_core::{Status, Timeline};
//!
//! let timeline = Timeline::india();
//! let snapshot = timeline.resolve(45);
//! assert!(!snapshot.link("PB-TN").unwrap().active);
//! assert_eq!(snapshot.status_of("RJ"), Some(Status::Critical));
//! ```

pub mod model;
pub mod registry;
pub mod rules;
pub mod resolver;
pub mod validation;
pub mod metrics;
pub mod case_study;
pub mod strategy;
pub mod history;

// Re-export key types for convenience
pub use model::{
    clamp_cycle, Cycle, Entity, EventKind, PairwiseScore, Relationship, ResourceKind, Resources,
    ScriptedEvent, Status, Trend, MAX_CYCLE,
};
pub use registry::Registry;
pub use rules::{CycleRange, Regime, RegimeId, RuleTable};
pub use resolver::{Snapshot, Timeline};
pub use validation::{ValidationError, ValidationReport};
pub use metrics::{SnapshotMetrics, SystemStatus};
pub use case_study::{CaseLibrary, CaseStudy};
pub use strategy::{Phase, StrategyBook};
pub use history::{resource_history, ResourceSample};
