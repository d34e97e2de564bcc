//! JSON exporter for timeline frames.
//!
//! Exports one frame per cycle so a dashboard (or a diff tool) can replay
//! the timeline without linking against the resolver.

use crate::error::SimError;
use crate::scenarios::{ResourceImpact, ScenarioId};

use mappo_core::{Cycle, RegimeId, ScriptedEvent, Snapshot, SnapshotMetrics, Status, Timeline};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single frame of timeline data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineFrame {
    pub cycle: Cycle,

    /// Derived status of every region
    pub statuses: Vec<EntityStatus>,

    /// Keys of inactive links
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub broken_links: Vec<String>,

    /// Events whose trigger is this cycle
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub new_events: Vec<ScriptedEvent>,

    pub scores: Vec<PairScore>,
    pub regimes: Vec<RegimeId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_study: Option<String>,

    pub metrics: SnapshotMetrics,
}

/// Status of one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStatus {
    pub id: String,
    pub status: Status,
}

/// Conflict probability of one pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairScore {
    pub pair: String,
    pub probability: f64,
}

impl TimelineFrame {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            cycle: snapshot.cycle,
            statuses: snapshot
                .entities
                .iter()
                .map(|e| EntityStatus {
                    id: e.id.clone(),
                    status: e.status,
                })
                .collect(),
            broken_links: snapshot.broken_links().map(|r| r.key()).collect(),
            new_events: snapshot.events_at(snapshot.cycle).cloned().collect(),
            scores: snapshot
                .scores
                .iter()
                .map(|s| PairScore {
                    pair: format!("{}-{}", s.a, s.b),
                    probability: s.probability,
                })
                .collect(),
            regimes: snapshot.active_regimes.clone(),
            case_study: snapshot.case_study.clone(),
            metrics: SnapshotMetrics::from_snapshot(snapshot),
        }
    }
}

/// Complete timeline export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineExport {
    /// Label for the run (scenario name or "timeline")
    pub label: String,

    /// Seed used for cosmetic jitter
    pub seed: u64,

    /// Resource deltas of the applied quick scenario
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub impact: Option<ResourceImpact>,

    /// All frames
    pub frames: Vec<TimelineFrame>,

    /// Whether the tables validated cleanly
    pub validated: bool,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub issues: Vec<String>,
}

impl TimelineExport {
    /// Creates a new export container.
    pub fn new(label: &str, seed: u64) -> Self {
        Self {
            label: label.to_string(),
            seed,
            impact: None,
            frames: Vec::new(),
            validated: false,
            issues: Vec::new(),
        }
    }

    /// Creates an export labelled with a quick scenario and its impact.
    pub fn for_scenario(scenario: ScenarioId, seed: u64) -> Self {
        Self {
            impact: Some(scenario.resource_impact()),
            ..Self::new(scenario.name(), seed)
        }
    }

    pub fn add_frame(&mut self, frame: TimelineFrame) {
        self.frames.push(frame);
    }

    /// Records the validation outcome.
    pub fn finalize(&mut self, timeline: &Timeline) {
        let report = timeline.validate();
        self.validated = report.is_clean();
        self.issues = report.issues.iter().map(|i| i.to_string()).collect();
    }

    /// Resolves and adds every cycle in `from..=to`.
    pub fn capture(&mut self, timeline: &Timeline, from: Cycle, to: Cycle) {
        for cycle in from..=to {
            self.add_frame(TimelineFrame::from_snapshot(&timeline.resolve(cycle)));
        }
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_at_breakpoint() {
        let timeline = Timeline::india();
        let frame = TimelineFrame::from_snapshot(&timeline.resolve(45));

        assert_eq!(frame.cycle, 45);
        assert_eq!(frame.statuses.len(), timeline.registry().entities.len());
        assert!(frame.broken_links.contains(&"PB-TN".to_string()));
        assert!(frame.new_events.iter().all(|e| e.cycle == 45));
        assert_eq!(frame.metrics.cycle, 45);
    }

    #[test]
    fn test_capture_full_range() {
        let timeline = Timeline::india();
        let mut export = TimelineExport::new("timeline", 7);
        export.capture(&timeline, 0, 100);
        export.finalize(&timeline);

        assert_eq!(export.frames.len(), 101);
        assert_eq!(export.frames.last().map(|f| f.cycle), Some(100));
        assert!(export.validated);
        assert!(export.issues.is_empty());
    }

    #[test]
    fn test_quiet_frame_omits_empty_fields() {
        let timeline = Timeline::india();
        let frame = TimelineFrame::from_snapshot(&timeline.resolve(10));
        let json = serde_json::to_value(&frame).unwrap();

        assert!(json.get("broken_links").is_none());
        assert!(json.get("cycle").is_some());
    }

    #[test]
    fn test_scenario_export_carries_impact() {
        let export = TimelineExport::for_scenario(ScenarioId::PunjabCrisis, 3);
        assert_eq!(export.label, ScenarioId::PunjabCrisis.name());
        assert_eq!(export.impact, Some(ScenarioId::PunjabCrisis.resource_impact()));

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["impact"]["water"], -45);
        assert!(serde_json::to_value(TimelineExport::new("timeline", 0))
            .unwrap()
            .get("impact")
            .is_none());
    }

    #[test]
    fn test_write_to_file() {
        let timeline = Timeline::india();
        let mut export = TimelineExport::new("timeline", 0);
        export.capture(&timeline, 40, 42);

        let path = std::env::temp_dir().join("mappo_export_test.json");
        export.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: TimelineExport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.frames.len(), 3);
        let _ = std::fs::remove_file(&path);
    }
}
