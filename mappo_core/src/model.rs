//! Data model for the interstate resource timeline.
//!
//! Every type here is plain data: the registries build them once and the
//! resolver clones and overrides their derived fields per cycle.

use serde::{Deserialize, Serialize};

/// Discrete simulation step index.
pub type Cycle = u32;

/// Last cycle of the timeline. Playback stops here.
pub const MAX_CYCLE: Cycle = 100;

/// Clamps any integer into the timeline's cycle domain `[0, MAX_CYCLE]`.
pub fn clamp_cycle(raw: i64) -> Cycle {
    raw.clamp(0, MAX_CYCLE as i64) as Cycle
}

// =============================================================================
// ENTITIES
// =============================================================================

/// Resource stress level of a region.
///
/// Ordered from best to worst, so `max()` picks the more severe status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Stable,
    Stressed,
    Critical,
    Collapsed,
}

impl Status {
    /// All statuses, best first.
    pub const ALL: [Status; 4] = [
        Status::Stable,
        Status::Stressed,
        Status::Critical,
        Status::Collapsed,
    ];

    /// Returns the status name.
    pub fn name(&self) -> &'static str {
        match self {
            Status::Stable => "stable",
            Status::Stressed => "stressed",
            Status::Critical => "critical",
            Status::Collapsed => "collapsed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stable" | "green" => Ok(Status::Stable),
            "stressed" | "amber" => Ok(Status::Stressed),
            "critical" | "red" => Ok(Status::Critical),
            "collapsed" | "black" => Ok(Status::Collapsed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Resource levels of a region, each a percentage in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub water: u8,
    pub power: u8,
    pub agriculture: u8,
}

impl Resources {
    pub const fn new(water: u8, power: u8, agriculture: u8) -> Self {
        Self { water, power, agriculture }
    }

    /// Lowest of the three levels.
    pub fn weakest(&self) -> u8 {
        self.water.min(self.power).min(self.agriculture)
    }
}

/// Layout position. Carries no meaning for the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A region (state or union territory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique short code (e.g. "RJ")
    pub id: String,

    /// Display name
    pub name: String,

    /// Current status (baseline in the registry, derived in a snapshot)
    pub status: Status,

    /// Resource levels
    pub resources: Resources,

    /// Display position
    pub position: Position,
}

// =============================================================================
// RELATIONSHIPS
// =============================================================================

/// What flows along a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Water,
    Food,
    Power,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Water => "water",
            ResourceKind::Food => "food",
            ResourceKind::Power => "power",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A directed supply link between two regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub kind: ResourceKind,

    /// Relative volume, non-negative
    pub magnitude: f64,

    /// Whether the link is currently honoured
    pub active: bool,
}

impl Relationship {
    /// Returns the link key, e.g. `"PB-TN"`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }

    /// Returns true if this link runs `from -> to`.
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }
}

// =============================================================================
// PAIRWISE SCORES
// =============================================================================

/// Direction a conflict probability is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Stable,
    Falling,
}

/// Conflict likelihood between an unordered pair of regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseScore {
    pub a: String,
    pub b: String,

    /// Probability in [0, 1]
    pub probability: f64,

    pub trend: Trend,
}

impl PairwiseScore {
    /// Returns true if this score is for `{x, y}` in either order.
    pub fn matches(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

// =============================================================================
// SCRIPTED EVENTS
// =============================================================================

/// Category tag of a scripted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Trade,
    Conflict,
    Alliance,
    Crisis,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Trade => "trade",
            EventKind::Conflict => "conflict",
            EventKind::Alliance => "alliance",
            EventKind::Crisis => "crisis",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An authored narrative item that becomes visible at its trigger cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub id: String,

    /// First cycle at which the event is visible
    pub cycle: Cycle,

    pub description: String,
    pub kind: EventKind,

    /// Involved region ids
    pub entities: Vec<String>,
}

impl ScriptedEvent {
    /// Returns true if the event is visible at `cycle`.
    pub fn is_visible_at(&self, cycle: Cycle) -> bool {
        self.cycle <= cycle
    }

    /// Returns true if the event involves `entity_id`.
    pub fn involves(&self, entity_id: &str) -> bool {
        self.entities.iter().any(|e| e == entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_cycle() {
        assert_eq!(clamp_cycle(-5), 0);
        assert_eq!(clamp_cycle(0), 0);
        assert_eq!(clamp_cycle(57), 57);
        assert_eq!(clamp_cycle(100), 100);
        assert_eq!(clamp_cycle(i64::MAX), MAX_CYCLE);
    }

    #[test]
    fn test_status_ordering() {
        assert!(Status::Stable < Status::Stressed);
        assert!(Status::Critical < Status::Collapsed);
        assert_eq!(Status::Stressed.max(Status::Critical), Status::Critical);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("amber".parse::<Status>(), Ok(Status::Stressed));
        assert_eq!("Collapsed".parse::<Status>(), Ok(Status::Collapsed));
        assert!("purple".parse::<Status>().is_err());
        assert_eq!("red".parse::<Status>(), Ok(Status::Critical));
    }

    #[test]
    fn test_pair_matching_is_unordered() {
        let score = PairwiseScore {
            a: "KA".into(),
            b: "TN".into(),
            probability: 0.85,
            trend: Trend::Rising,
        };
        assert!(score.matches("KA", "TN"));
        assert!(score.matches("TN", "KA"));
        assert!(!score.matches("KA", "KL"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Collapsed).unwrap();
        assert_eq!(json, "\"collapsed\"");
    }
}
