//! Snapshot resolver - the pure `cycle -> snapshot` function.
//!
//! The resolver owns nothing mutable. It clones the registry, folds the
//! rule table over it for the requested cycle, and returns the result.
//! Calling it twice with the same cycle yields identical snapshots.

use crate::case_study::CaseLibrary;
use crate::model::{
    clamp_cycle, Cycle, Entity, PairwiseScore, Relationship, ScriptedEvent, Status, Trend,
};
use crate::registry::Registry;
use crate::rules::{RegimeId, RuleTable};
use crate::validation::{validate, ValidationReport};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The complete derived view of the system at one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Cycle this snapshot was resolved for (already clamped)
    pub cycle: Cycle,

    /// Regions with derived status
    pub entities: Vec<Entity>,

    /// Links with derived active flag
    pub relationships: Vec<Relationship>,

    /// Scripted events visible at this cycle, in script order
    pub events: Vec<ScriptedEvent>,

    /// Conflict probabilities with threshold bumps applied
    pub scores: Vec<PairwiseScore>,

    /// Regimes whose window contains this cycle
    pub active_regimes: Vec<RegimeId>,

    /// Case study on display, if any
    pub case_study: Option<String>,
}

impl Snapshot {
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Derived status of a region.
    pub fn status_of(&self, id: &str) -> Option<Status> {
        self.entity(id).map(|e| e.status)
    }

    pub fn relationship(&self, from: &str, to: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(from, to))
    }

    /// Looks up a link by its `"FROM-TO"` key.
    pub fn link(&self, key: &str) -> Option<&Relationship> {
        let (from, to) = key.split_once('-')?;
        self.relationship(from, to)
    }

    pub fn score(&self, a: &str, b: &str) -> Option<&PairwiseScore> {
        self.scores.iter().find(|s| s.matches(a, b))
    }

    /// Conflict probability for a pair, 0 if the pair is not tracked.
    pub fn probability(&self, a: &str, b: &str) -> f64 {
        self.score(a, b).map(|s| s.probability).unwrap_or(0.0)
    }

    /// Links currently marked inactive.
    pub fn broken_links(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(|r| !r.active)
    }

    pub fn is_event_visible(&self, id: &str) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    /// Visible events with the given trigger cycle.
    pub fn events_at(&self, cycle: Cycle) -> impl Iterator<Item = &ScriptedEvent> {
        self.events.iter().filter(move |e| e.cycle == cycle)
    }

    pub fn is_regime_active(&self, id: RegimeId) -> bool {
        self.active_regimes.contains(&id)
    }
}

/// Registries, rules and case studies bundled for resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    registry: Registry,
    rules: RuleTable,
    cases: CaseLibrary,
}

impl Timeline {
    pub fn new(registry: Registry, rules: RuleTable, cases: CaseLibrary) -> Self {
        Self {
            registry,
            rules,
            cases,
        }
    }

    /// The India timeline with the authoritative rule table.
    pub fn india() -> Self {
        Self::new(Registry::india(), RuleTable::authoritative(), CaseLibrary::india())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn cases(&self) -> &CaseLibrary {
        &self.cases
    }

    /// Checks every rule and script entry against the registry.
    pub fn validate(&self) -> ValidationReport {
        validate(&self.registry, &self.rules, &self.cases)
    }

    /// Resolves the snapshot for `cycle`, clamped to `[0, MAX_CYCLE]`.
    ///
    /// Rules that name an unknown region, link or pair are skipped.
    pub fn resolve(&self, cycle: Cycle) -> Snapshot {
        let cycle = clamp_cycle(cycle as i64);

        let mut entities = self.registry.entities.clone();
        let mut relationships = self.registry.relationships.clone();
        let mut scores = self.registry.scores.clone();

        for regime in self.rules.regimes() {
            for rule in regime.status_rules.iter().filter(|r| r.range.contains(cycle)) {
                match entities.iter_mut().find(|e| e.id == rule.entity) {
                    Some(entity) => entity.status = rule.status,
                    None => warn!(
                        "Skipping {} status rule for unknown entity {}",
                        regime.id, rule.entity
                    ),
                }
            }

            for rule in regime.link_rules.iter().filter(|r| r.range.contains(cycle)) {
                match relationships.iter_mut().find(|r| r.connects(&rule.from, &rule.to)) {
                    Some(link) => link.active = rule.active,
                    None => warn!(
                        "Skipping {} link rule for unknown link {}-{}",
                        regime.id, rule.from, rule.to
                    ),
                }
            }

            for rule in regime.score_rules.iter().filter(|r| r.range.contains(cycle)) {
                let baseline = self.registry.score(&rule.a, &rule.b).map(|s| s.probability);
                match (scores.iter_mut().find(|s| s.matches(&rule.a, &rule.b)), baseline) {
                    (Some(score), Some(baseline)) => {
                        score.probability = rule.apply(baseline);
                        score.trend = Trend::Rising;
                    }
                    _ => warn!(
                        "Skipping {} score rule for unknown pair {}-{}",
                        regime.id, rule.a, rule.b
                    ),
                }
            }
        }

        // Guard against a registry entry authored outside [0, 1]
        for score in &mut scores {
            score.probability = score.probability.clamp(0.0, 1.0);
        }

        let events = self
            .registry
            .events
            .iter()
            .filter(|e| e.is_visible_at(cycle))
            .cloned()
            .collect();

        Snapshot {
            cycle,
            entities,
            relationships,
            events,
            scores,
            active_regimes: self.rules.active_at(cycle),
            case_study: self.cases.active_id_at(cycle).map(str::to_string),
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::india()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MAX_CYCLE;
    use crate::rules::{CycleRange, Regime};
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_is_deterministic() {
        let timeline = Timeline::india();
        for cycle in 0..=MAX_CYCLE {
            assert_eq!(timeline.resolve(cycle), timeline.resolve(cycle));
        }
    }

    #[test]
    fn test_baseline_before_first_threshold() {
        let timeline = Timeline::india();
        for cycle in 0..40 {
            let snapshot = timeline.resolve(cycle);
            assert_eq!(snapshot.entities, timeline.registry().entities);
            assert_eq!(snapshot.relationships, timeline.registry().relationships);
            assert_eq!(snapshot.scores, timeline.registry().scores);
        }
    }

    #[test]
    fn test_pb_tn_breaks_at_45() {
        let timeline = Timeline::india();
        assert!(timeline.resolve(44).link("PB-TN").unwrap().active);
        assert!(!timeline.resolve(45).link("PB-TN").unwrap().active);
        assert!(!timeline.resolve(MAX_CYCLE).link("PB-TN").unwrap().active);
    }

    #[test]
    fn test_ka_tn_breaks_at_55() {
        let timeline = Timeline::india();
        assert!(timeline.resolve(54).link("KA-TN").unwrap().active);
        let snapshot = timeline.resolve(55);
        assert!(!snapshot.link("KA-TN").unwrap().active);
        assert_eq!(snapshot.broken_links().count(), 2);
    }

    #[test]
    fn test_event_prefix() {
        let timeline = Timeline::india();
        for cycle in 42..=47 {
            let snapshot = timeline.resolve(cycle);
            assert!(snapshot.is_event_visible("11"), "monsoon event missing at {}", cycle);
            assert!(snapshot.events.iter().all(|e| e.cycle <= cycle));
        }
        assert!(!timeline.resolve(46).is_event_visible("3"));
        assert!(timeline.resolve(47).is_event_visible("3"));
        assert!(timeline.resolve(37).events.is_empty());
        assert_eq!(timeline.resolve(MAX_CYCLE).events.len(), 11);
    }

    #[test]
    fn test_drought_cascade_statuses() {
        let timeline = Timeline::india();
        let snapshot = timeline.resolve(46);
        assert_eq!(snapshot.status_of("RJ"), Some(Status::Critical));
        assert_eq!(snapshot.status_of("UP"), Some(Status::Stressed));
        assert_eq!(snapshot.status_of("HR"), Some(Status::Stressed));
        assert_eq!(snapshot.status_of("DL"), Some(Status::Critical));

        assert_eq!(timeline.resolve(49).status_of("RJ"), Some(Status::Collapsed));
        assert_eq!(timeline.resolve(55).status_of("RJ"), Some(Status::Critical));
    }

    #[test]
    fn test_overlap_later_regime_wins() {
        let rules = RuleTable::new(vec![
            Regime::new(RegimeId::DroughtCascade, CycleRange::new(40, 55))
                .status("MH", CycleRange::new(40, 55), Status::Stressed),
            Regime::new(RegimeId::SouthernConflict, CycleRange::new(52, 70))
                .status("MH", CycleRange::new(52, 70), Status::Collapsed),
        ]);
        let timeline = Timeline::new(Registry::india(), rules, CaseLibrary::india());

        assert_eq!(timeline.resolve(51).status_of("MH"), Some(Status::Stressed));
        for cycle in 52..55 {
            assert_eq!(timeline.resolve(cycle).status_of("MH"), Some(Status::Collapsed));
        }
    }

    #[test]
    fn test_no_region_improves_before_resolution() {
        let timeline = Timeline::india();
        for cycle in 0..70 {
            let snapshot = timeline.resolve(cycle);
            for baseline in &timeline.registry().entities {
                let status = snapshot.status_of(&baseline.id);
                assert!(
                    status >= Some(baseline.status),
                    "{} at {}: {:?} below baseline {:?}",
                    baseline.id,
                    cycle,
                    status,
                    baseline.status
                );
            }
        }
        // Marathwada emergency keeps Maharashtra critical through the drought
        for cycle in 40..70 {
            assert_eq!(timeline.resolve(cycle).status_of("MH"), Some(Status::Critical));
        }
    }

    #[test]
    fn test_tn_collapses_then_recovers() {
        let timeline = Timeline::india();
        assert_eq!(timeline.resolve(67).status_of("TN"), Some(Status::Critical));
        assert_eq!(timeline.resolve(68).status_of("TN"), Some(Status::Collapsed));
        assert_eq!(timeline.resolve(71).status_of("TN"), Some(Status::Critical));
        assert_eq!(timeline.resolve(72).status_of("TN"), Some(Status::Stressed));
    }

    #[test]
    fn test_score_bumps() {
        let timeline = Timeline::india();
        assert_relative_eq!(timeline.resolve(50).probability("KA", "TN"), 0.85);
        assert_relative_eq!(timeline.resolve(51).probability("KA", "TN"), 0.95);
        assert_relative_eq!(timeline.resolve(56).probability("TN", "KA"), 0.98);
        assert_relative_eq!(timeline.resolve(48).probability("UP", "BR"), 0.65);
        assert_relative_eq!(timeline.resolve(49).probability("UP", "BR"), 0.75, epsilon = 1e-9);
        assert_eq!(timeline.resolve(49).score("UP", "BR").unwrap().trend, Trend::Rising);
        assert_relative_eq!(timeline.resolve(49).probability("XX", "YY"), 0.0);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let timeline = Timeline::india();
        for cycle in 0..=MAX_CYCLE {
            for score in &timeline.resolve(cycle).scores {
                assert!((0.0..=1.0).contains(&score.probability));
            }
        }
    }

    #[test]
    fn test_cycle_past_end_is_clamped() {
        let timeline = Timeline::india();
        let end = timeline.resolve(MAX_CYCLE);
        assert_eq!(timeline.resolve(250), end);
        assert_eq!(timeline.resolve(u32::MAX).cycle, MAX_CYCLE);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let rules = RuleTable::new(vec![Regime::new(RegimeId::DroughtCascade, CycleRange::new(0, 10))
            .status("ZZ", CycleRange::new(0, 10), Status::Collapsed)
            .break_link("ZZ", "TN", CycleRange::new(0, 10))
            .bump_score("ZZ", "QQ", CycleRange::new(0, 10), 0.5, 1.0)
            .status("PB", CycleRange::new(0, 10), Status::Critical)]);
        let timeline = Timeline::new(Registry::india(), rules, CaseLibrary::india());

        let snapshot = timeline.resolve(5);
        assert_eq!(snapshot.status_of("PB"), Some(Status::Critical));
        assert!(snapshot.entity("ZZ").is_none());
        assert_eq!(snapshot.broken_links().count(), 0);
    }

    #[test]
    fn test_out_of_range_registry_probability_is_clamped() {
        let mut registry = Registry::india();
        registry.scores[0].probability = 1.4;
        let timeline = Timeline::new(registry, RuleTable::new(vec![]), CaseLibrary::india());
        assert_relative_eq!(timeline.resolve(0).scores[0].probability, 1.0);
    }

    #[test]
    fn test_regimes_and_case_study() {
        let timeline = Timeline::india();
        let snapshot = timeline.resolve(52);
        assert!(snapshot.is_regime_active(RegimeId::DroughtCascade));
        assert!(snapshot.is_regime_active(RegimeId::SouthernConflict));
        assert_eq!(snapshot.case_study.as_deref(), Some("4"));
        assert!(timeline.resolve(10).case_study.is_none());
    }
}
