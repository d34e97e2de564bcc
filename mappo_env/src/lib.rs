//! MAPPO Environment Abstraction Layer
//!
//! This crate provides the clock abstraction that lets the cycle coordinator
//! run against either **wall-clock time** (tokio) or a **virtual clock**
//! (deterministic playback in tests and exports).
//!
//! # Core Concept
//!
//! The timeline itself is a pure function of the cycle number. The only
//! thing that depends on time is *when* the cycle advances, so the playback
//! loop never touches `tokio::time` directly:
//! - Time (`now()`, `sleep()`)
//! - Seed for cosmetic jitter (`seed()`)
//!
//! # Example
//!
//! ```ignore
//! use mappo_env::{SimClock, PlaybackSpeed, BASE_TICK_INTERVAL};
//!
//! async fn playback<C: SimClock>(clock: &C, speed: PlaybackSpeed) {
//!     loop {
//!         clock.sleep(speed.scale(BASE_TICK_INTERVAL)).await;
//!         tick();
//!     }
//! }
//! ```

mod context;
mod types;
mod error;
mod tokio_impl;

pub use context::SimClock;
pub use types::{PlaybackSpeed, BASE_TICK_INTERVAL};
pub use error::EnvError;
pub use tokio_impl::TokioClock;
