//! CycleCoordinator - owner of the simulation clock.
//!
//! The coordinator holds the only mutable state in the system: the cycle
//! counter, the playing flag, the speed multiplier and the selected
//! region. Everything else is derived by resolving a snapshot.

use crate::error::SimError;
use crate::scenarios::ScenarioId;

use mappo_core::{Cycle, Entity, Snapshot, Timeline, MAX_CYCLE};
use mappo_env::{PlaybackSpeed, BASE_TICK_INTERVAL};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Cycle at which playback stops (never above `MAX_CYCLE`)
    pub max_cycle: Cycle,

    /// Interval between ticks at 1x
    pub base_interval: Duration,

    /// Initial speed multiplier
    pub speed: PlaybackSpeed,

    /// Fast-forward ceiling
    pub max_speed: PlaybackSpeed,

    /// Cycle a quick scenario jumps to
    pub scenario_cycle: Cycle,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_cycle: MAX_CYCLE,
            base_interval: BASE_TICK_INTERVAL,
            speed: PlaybackSpeed::default(),
            max_speed: PlaybackSpeed::clamped(PlaybackSpeed::MAX),
            scenario_cycle: 45,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_max_cycle(mut self, max_cycle: Cycle) -> Self {
        self.max_cycle = max_cycle.min(MAX_CYCLE);
        self
    }

    pub fn with_base_interval(mut self, interval: Duration) -> Self {
        self.base_interval = interval;
        self
    }

    pub fn with_speed(mut self, speed: PlaybackSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the initial speed from a raw multiplier, rejecting values
    /// outside `1..=5`.
    pub fn with_speed_value(self, value: u32) -> Result<Self, SimError> {
        Ok(self.with_speed(PlaybackSpeed::new(value)?))
    }

    pub fn with_max_speed(mut self, max_speed: PlaybackSpeed) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_scenario_cycle(mut self, cycle: Cycle) -> Self {
        self.scenario_cycle = cycle;
        self
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The cycle moved forward by one
    Advanced { from: Cycle, to: Cycle },

    /// Already at the last cycle; playback has been stopped
    Finished { cycle: Cycle },

    /// Not playing; nothing changed
    Idle { cycle: Cycle },
}

/// The coordinator - owns the cycle counter and UI selection.
pub struct CycleCoordinator {
    /// Configuration
    config: CoordinatorConfig,

    /// Registries and rules
    timeline: Timeline,

    /// Current cycle
    cycle: Cycle,

    /// Whether the timer should advance the cycle
    playing: bool,

    /// Current speed multiplier
    speed: PlaybackSpeed,

    /// Selected region id
    selected: Option<String>,

    /// Ticks that advanced the cycle
    tick_count: u64,
}

impl CycleCoordinator {
    /// Creates a coordinator over the India timeline.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self::with_timeline(config, Timeline::india())
    }

    /// Creates a coordinator over a custom timeline.
    pub fn with_timeline(mut config: CoordinatorConfig, timeline: Timeline) -> Self {
        config.max_cycle = config.max_cycle.min(MAX_CYCLE);
        let speed = config.speed.min(config.max_speed);

        Self {
            config,
            timeline,
            cycle: 0,
            playing: false,
            speed,
            selected: None,
            tick_count: 0,
        }
    }

    /// Returns the current cycle.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Returns the selected region id.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Returns the number of ticks that advanced the cycle.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn max_cycle(&self) -> Cycle {
        self.config.max_cycle
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Interval the timer should wait before the next tick.
    pub fn tick_interval(&self) -> Duration {
        self.speed.scale(self.config.base_interval)
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flips play/pause and returns the new playing state.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Advances the cycle by one if playing.
    ///
    /// At the last cycle the counter stays put and playback stops.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Idle { cycle: self.cycle };
        }

        if self.cycle >= self.config.max_cycle {
            self.playing = false;
            self.cycle = self.config.max_cycle;
            info!("Reached final cycle {}, playback stopped", self.cycle);
            return TickOutcome::Finished { cycle: self.cycle };
        }

        let from = self.cycle;
        self.cycle += 1;
        self.tick_count += 1;
        debug!("Cycle {} -> {}", from, self.cycle);

        TickOutcome::Advanced {
            from,
            to: self.cycle,
        }
    }

    /// Stops playback, returns to cycle 0 and clears the selection.
    pub fn reset(&mut self) {
        self.playing = false;
        self.cycle = 0;
        self.selected = None;
        debug!("Coordinator reset");
    }

    /// Bumps the speed by one step, saturating at `max_speed`.
    pub fn fast_forward(&mut self) -> PlaybackSpeed {
        self.speed = self.speed.faster().min(self.config.max_speed);
        self.speed
    }

    /// Sets the speed, clamped to `[1, max_speed]`.
    pub fn set_speed(&mut self, speed: u32) -> PlaybackSpeed {
        self.speed = PlaybackSpeed::clamped(speed).min(self.config.max_speed);
        self.speed
    }

    /// Jumps to a cycle, clamped to `[0, max_cycle]`.
    pub fn jump_to(&mut self, cycle: i64) -> Cycle {
        self.cycle = cycle.clamp(0, self.config.max_cycle as i64) as Cycle;
        self.cycle
    }

    /// Jumps to the trigger cycle of a scripted event.
    pub fn jump_to_event(&mut self, event_id: &str) -> Result<Cycle, SimError> {
        let cycle = self
            .timeline
            .registry()
            .event(event_id)
            .map(|e| e.cycle)
            .ok_or_else(|| SimError::UnknownEvent(event_id.to_string()))?;

        Ok(self.jump_to(cycle as i64))
    }

    /// Selects a region.
    pub fn select(&mut self, entity_id: &str) -> Result<(), SimError> {
        if !self.timeline.registry().contains(entity_id) {
            return Err(SimError::UnknownEntity(entity_id.to_string()));
        }
        self.selected = Some(entity_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Jumps to the scenario cycle and selects the first affected region
    /// that exists in the registry.
    pub fn apply_scenario(&mut self, scenario: ScenarioId) -> Cycle {
        let cycle = self.jump_to(self.config.scenario_cycle as i64);

        let registry = self.timeline.registry();
        if let Some(id) = scenario
            .affected_states()
            .iter()
            .find(|id| registry.contains(id))
        {
            self.selected = Some(id.to_string());
        }

        info!("Applied scenario {} at cycle {}", scenario.title(), cycle);
        cycle
    }

    /// Resolves the snapshot for the current cycle.
    pub fn snapshot(&self) -> Snapshot {
        self.timeline.resolve(self.cycle)
    }

    /// Selected region as it stands at the current cycle.
    pub fn selected_entity(&self) -> Option<Entity> {
        let id = self.selected.as_deref()?;
        self.snapshot().entity(id).cloned()
    }
}

impl Default for CycleCoordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}
