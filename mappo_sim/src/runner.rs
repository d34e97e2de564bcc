//! Playback runner - drives the coordinator from a clock.

use crate::coordinator::{CycleCoordinator, TickOutcome};

use mappo_core::{Cycle, Snapshot};
use mappo_env::SimClock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Results from a playback run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackReport {
    /// Cycle playback started from
    pub start_cycle: Cycle,

    /// Cycle playback ended on
    pub end_cycle: Cycle,

    /// Ticks that advanced the cycle
    pub ticks: u64,

    /// Clock time spent waiting between ticks
    pub elapsed: Duration,

    /// Ids of scripted events that became visible during the run
    pub events_surfaced: Vec<String>,

    /// Whether playback ran into the last cycle
    pub finished: bool,

    /// Seed of the clock the run was driven by
    pub seed: u64,
}

/// Runs the timer loop: sleep, tick, resolve, observe.
pub struct PlaybackRunner<C: SimClock> {
    clock: Arc<C>,

    /// Cycle at which to pause instead of running to the end
    stop_at: Option<Cycle>,
}

impl<C: SimClock> PlaybackRunner<C> {
    /// Creates a runner on the given clock.
    pub fn new(clock: Arc<C>) -> Self {
        Self { clock, stop_at: None }
    }

    /// Pauses playback once this cycle is reached.
    pub fn with_stop_at(mut self, cycle: Cycle) -> Self {
        self.stop_at = Some(cycle);
        self
    }

    /// Plays the coordinator until it finishes, is paused, or hits `stop_at`.
    ///
    /// `observer` sees the snapshot of every cycle the run advances to.
    pub async fn run<F>(&self, coordinator: &mut CycleCoordinator, mut observer: F) -> PlaybackReport
    where
        F: FnMut(&Snapshot),
    {
        let start_cycle = coordinator.cycle();
        let started = self.clock.now();
        let mut ticks = 0;
        let mut events_surfaced = Vec::new();
        let mut finished = false;

        info!(
            "Playback from cycle {} at {} (interval {:?}, seed {})",
            start_cycle,
            coordinator.speed(),
            coordinator.tick_interval(),
            self.clock.seed()
        );
        coordinator.play();

        loop {
            if let Some(stop) = self.stop_at {
                if coordinator.cycle() >= stop {
                    coordinator.pause();
                    break;
                }
            }

            // At the last cycle the tick only stops playback, so don't wait for it
            if coordinator.cycle() < coordinator.max_cycle() {
                self.clock.sleep(coordinator.tick_interval()).await;
            }

            match coordinator.tick() {
                TickOutcome::Advanced { to, .. } => {
                    ticks += 1;
                    let snapshot = coordinator.snapshot();

                    for event in snapshot.events_at(to) {
                        info!("Cycle {}: {}", to, event.description);
                        events_surfaced.push(event.id.clone());
                    }
                    debug!(
                        "Cycle {} resolved: {} broken links, {} regimes active",
                        to,
                        snapshot.broken_links().count(),
                        snapshot.active_regimes.len()
                    );

                    observer(&snapshot);
                }
                TickOutcome::Finished { .. } => {
                    finished = true;
                    break;
                }
                TickOutcome::Idle { .. } => break,
            }
        }

        let report = PlaybackReport {
            start_cycle,
            end_cycle: coordinator.cycle(),
            ticks,
            elapsed: self.clock.now().saturating_sub(started),
            events_surfaced,
            finished,
            seed: self.clock.seed(),
        };

        info!(
            "Playback stopped at cycle {} after {} ticks ({:?})",
            report.end_cycle, report.ticks, report.elapsed
        );
        report
    }
}
