//! Static registries: regions, supply links, conflict pairs and the event script.
//!
//! Built once at startup and never mutated. The resolver clones them and
//! overrides derived fields per cycle.

use crate::model::{
    Cycle, Entity, EventKind, PairwiseScore, Position, Relationship, ResourceKind, Resources,
    ScriptedEvent, Status, Trend,
};
use serde::{Deserialize, Serialize};

// (id, name, status, water, power, agriculture, x, y)
const REGIONS: &[(&str, &str, Status, u8, u8, u8, f64, f64)] = &[
    ("JK", "Jammu & Kashmir", Status::Stressed, 65, 45, 55, 180.0, 80.0),
    ("PB", "Punjab", Status::Stable, 85, 75, 95, 200.0, 140.0),
    ("HP", "Himachal Pradesh", Status::Stable, 90, 80, 70, 230.0, 110.0),
    ("HR", "Haryana", Status::Stable, 80, 70, 90, 210.0, 170.0),
    ("DL", "Delhi", Status::Stressed, 40, 60, 20, 230.0, 185.0),
    ("RJ", "Rajasthan", Status::Critical, 25, 55, 45, 150.0, 200.0),
    ("UP", "Uttar Pradesh", Status::Stressed, 60, 50, 80, 280.0, 200.0),
    ("BR", "Bihar", Status::Critical, 45, 35, 65, 350.0, 220.0),
    ("UT", "Uttarakhand", Status::Stable, 85, 75, 75, 250.0, 140.0),
    ("SK", "Sikkim", Status::Stable, 80, 60, 65, 420.0, 180.0),
    ("AR", "Arunachal Pradesh", Status::Stable, 90, 50, 70, 480.0, 160.0),
    ("NL", "Nagaland", Status::Stressed, 70, 40, 60, 470.0, 200.0),
    ("MN", "Manipur", Status::Stressed, 65, 35, 55, 460.0, 230.0),
    ("MZ", "Mizoram", Status::Stable, 75, 45, 65, 440.0, 250.0),
    ("TR", "Tripura", Status::Stressed, 60, 40, 60, 420.0, 260.0),
    ("ML", "Meghalaya", Status::Stable, 85, 45, 70, 430.0, 230.0),
    ("AS", "Assam", Status::Stressed, 70, 40, 75, 420.0, 210.0),
    ("WB", "West Bengal", Status::Stressed, 65, 45, 80, 380.0, 260.0),
    ("JH", "Jharkhand", Status::Critical, 50, 55, 60, 340.0, 260.0),
    ("OD", "Odisha", Status::Stressed, 60, 50, 70, 320.0, 300.0),
    ("CG", "Chhattisgarh", Status::Stressed, 65, 60, 75, 280.0, 280.0),
    ("MP", "Madhya Pradesh", Status::Stressed, 55, 65, 80, 230.0, 260.0),
    ("GJ", "Gujarat", Status::Stable, 70, 85, 85, 120.0, 260.0),
    ("MH", "Maharashtra", Status::Critical, 35, 70, 65, 180.0, 320.0),
    ("GA", "Goa", Status::Stable, 75, 60, 70, 140.0, 360.0),
    ("KA", "Karnataka", Status::Critical, 30, 65, 70, 180.0, 380.0),
    ("TL", "Telangana", Status::Stressed, 45, 60, 75, 220.0, 350.0),
    ("AP", "Andhra Pradesh", Status::Stressed, 50, 65, 80, 240.0, 380.0),
    ("TN", "Tamil Nadu", Status::Critical, 25, 60, 75, 220.0, 420.0),
    ("KL", "Kerala", Status::Stable, 80, 55, 85, 180.0, 440.0),
];

// (from, to, kind, volume)
const LINKS: &[(&str, &str, ResourceKind, f64)] = &[
    ("PB", "HR", ResourceKind::Food, 85.0),
    ("PB", "DL", ResourceKind::Food, 70.0),
    ("PB", "TN", ResourceKind::Food, 60.0),
    ("HR", "DL", ResourceKind::Water, 75.0),
    ("UP", "DL", ResourceKind::Power, 65.0),
    ("RJ", "GJ", ResourceKind::Power, 55.0),
    ("GJ", "MH", ResourceKind::Power, 80.0),
    ("MP", "GJ", ResourceKind::Power, 70.0),
    ("KA", "TN", ResourceKind::Water, 45.0),
    ("AP", "TN", ResourceKind::Power, 60.0),
    ("KL", "TN", ResourceKind::Water, 50.0),
    ("WB", "JH", ResourceKind::Food, 55.0),
    ("BR", "WB", ResourceKind::Water, 65.0),
    ("OD", "WB", ResourceKind::Power, 50.0),
    ("HP", "PB", ResourceKind::Water, 80.0),
    ("UT", "UP", ResourceKind::Water, 70.0),
    ("MH", "KA", ResourceKind::Food, 65.0),
    ("CG", "MH", ResourceKind::Power, 60.0),
];

// (a, b, probability, trend)
const CONFLICT_PAIRS: &[(&str, &str, f64, Trend)] = &[
    ("KA", "TN", 0.85, Trend::Rising),
    ("PB", "HR", 0.45, Trend::Stable),
    ("UP", "BR", 0.65, Trend::Rising),
    ("RJ", "PB", 0.55, Trend::Rising),
    ("MH", "KA", 0.40, Trend::Stable),
    ("AP", "TN", 0.35, Trend::Falling),
    ("WB", "BR", 0.50, Trend::Stable),
    ("GJ", "RJ", 0.30, Trend::Falling),
    ("MP", "UP", 0.45, Trend::Stable),
    ("KL", "TN", 0.25, Trend::Stable),
    ("OD", "WB", 0.40, Trend::Rising),
    ("JH", "BR", 0.55, Trend::Rising),
];

// (id, cycle, kind, entities, description); ordered by cycle
const SCRIPT: &[(&str, Cycle, EventKind, &[&str], &str)] = &[
    ("1", 38, EventKind::Trade, &["PB", "TN"],
        "Punjab reduced wheat supply commitment to Tamil Nadu. Tamil Nadu issued public protest."),
    ("2", 41, EventKind::Alliance, &["KA", "TN"],
        "Karnataka released 4.2 TMC extra from Kabini to Tamil Nadu. Gratitude expressed in Chennai."),
    ("11", 42, EventKind::Crisis, &["RJ", "UP", "MP", "HR"],
        "Monsoon failure across the north-west. Reservoir levels in Rajasthan fell sharply."),
    ("3", 47, EventKind::Trade, &["GJ", "RJ"],
        "Gujarat offered 1200 MW round-the-clock power to Rajasthan. Agreement signed."),
    ("4", 52, EventKind::Conflict, &["UP", "BR"],
        "Uttar Pradesh filed fresh Supreme Court case against Bihar regarding Ganga water sharing."),
    ("5", 55, EventKind::Crisis, &["MH"],
        "Maharashtra declared drought emergency in Marathwada region. Requested central assistance."),
    ("6", 58, EventKind::Trade, &["RJ", "GJ"],
        "Rajasthan begged for water guarantee from Gujarat. Gujarat asked for power purchase agreement."),
    ("7", 62, EventKind::Conflict, &["PB", "TN"],
        "Punjab threatened to stop wheat supply to Tamil Nadu due to payment delays."),
    ("8", 65, EventKind::Alliance, &["HR", "DL"],
        "Haryana agreed to increase water supply to Delhi by 15% during summer peak."),
    ("9", 68, EventKind::Crisis, &["KA", "TN"],
        "Karnataka reduced Kabini outflow to Tamil Nadu by 35%. Protests erupted in Mandya."),
    ("10", 72, EventKind::Trade, &["WB", "JH"],
        "West Bengal agreed to supply 500 MW power to Jharkhand. Interstate agreement signed."),
];

/// The static tables the timeline is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub scores: Vec<PairwiseScore>,
    pub events: Vec<ScriptedEvent>,
}

impl Registry {
    /// Builds the India registry: 30 regions, 18 supply links,
    /// 12 conflict pairs and 11 scripted events.
    pub fn india() -> Self {
        let entities = REGIONS
            .iter()
            .map(|&(id, name, status, water, power, agriculture, x, y)| Entity {
                id: id.to_string(),
                name: name.to_string(),
                status,
                resources: Resources::new(water, power, agriculture),
                position: Position { x, y },
            })
            .collect();

        let relationships = LINKS
            .iter()
            .map(|&(from, to, kind, magnitude)| Relationship {
                from: from.to_string(),
                to: to.to_string(),
                kind,
                magnitude,
                active: true,
            })
            .collect();

        let scores = CONFLICT_PAIRS
            .iter()
            .map(|&(a, b, probability, trend)| PairwiseScore {
                a: a.to_string(),
                b: b.to_string(),
                probability,
                trend,
            })
            .collect();

        let events = SCRIPT
            .iter()
            .map(|&(id, cycle, kind, entities, description)| ScriptedEvent {
                id: id.to_string(),
                cycle,
                description: description.to_string(),
                kind,
                entities: entities.iter().map(|e| e.to_string()).collect(),
            })
            .collect();

        Self {
            entities,
            relationships,
            scores,
            events,
        }
    }

    /// Looks up a region by id.
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Returns true if a region with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.entity(id).is_some()
    }

    /// Looks up a scripted event by id.
    pub fn event(&self, id: &str) -> Option<&ScriptedEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Looks up a link by direction.
    pub fn relationship(&self, from: &str, to: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(from, to))
    }

    /// Looks up a conflict pair in either order.
    pub fn score(&self, a: &str, b: &str) -> Option<&PairwiseScore> {
        self.scores.iter().find(|s| s.matches(a, b))
    }

    /// Returns every link touching `id`, in either direction.
    pub fn links_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships
            .iter()
            .filter(move |r| r.from == id || r.to == id)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::india()
    }
}
