//! MAPPO Timeline Driver
//!
//! This crate owns the one piece of mutable state in the dashboard: the
//! cycle counter. It wraps the pure resolver from `mappo_core` with
//! playback controls and a timer loop.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    PlaybackRunner                        │
//! │   clock.sleep(interval) ──► coordinator.tick()           │
//! │                                   │                      │
//! │  ┌────────────────────────────────▼───────────────────┐  │
//! │  │ CycleCoordinator (cycle, playing, speed, selected) │  │
//! │  └────────────────────────────────┬───────────────────┘  │
//! │                                   │ cycle                │
//! │  ┌────────────────────────────────▼───────────────────┐  │
//! │  │ Timeline::resolve ──► Snapshot ──► observer/export │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock is either `TokioClock` (wall time) or `VirtualClock`, where
//! sleeping just advances a counter. Snapshots depend only on the cycle, so
//! both clocks produce identical frames.
//!
//! # Usage
//!
//! ```ignore
//! use mappo_sim::{CycleCoordinator, PlaybackRunner, VirtualClock};
//!
//! let mut coordinator = CycleCoordinator::default();
//! let runner = PlaybackRunner::new(VirtualClock::shared(42));
//! let report = runner.run(&mut coordinator, |snapshot| {
//!     println!("cycle {}", snapshot.cycle);
//! }).await;
//! ```

mod clock;
mod coordinator;
mod error;
pub mod exporter;
pub mod runner;
pub mod scenarios;

pub use clock::VirtualClock;
pub use coordinator::{CoordinatorConfig, CycleCoordinator, TickOutcome};
pub use error::SimError;
pub use exporter::{TimelineExport, TimelineFrame};
pub use runner::{PlaybackReport, PlaybackRunner};
pub use scenarios::{ResourceImpact, ScenarioId};
