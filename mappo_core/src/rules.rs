//! Declarative rule table.
//!
//! Each rule is `(target, cycle range, override)`. Rules are grouped into
//! named regimes; the resolver folds regimes in table order and rules in
//! declaration order, so when two rules set the same field the later one wins.
//!
//! # Regimes
//!
//! ```text
//! cycle   0        40    50   55        70                 100
//!         |baseline|drought-cascade|
//!                        |southern-conflict|
//!                                           |resolution-------|
//! ```
//!
//! A regime's window only controls whether the regime is reported as
//! active. A rule's own range can outlast it: a link broken during the
//! drought stays broken for the rest of the run.

use crate::model::{Cycle, Status, MAX_CYCLE};
use serde::{Deserialize, Serialize};

/// Half-open cycle interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleRange {
    pub start: Cycle,
    pub end: Cycle,
}

impl CycleRange {
    pub const fn new(start: Cycle, end: Cycle) -> Self {
        Self { start, end }
    }

    /// From `start` through the last cycle, inclusive.
    pub const fn from(start: Cycle) -> Self {
        Self {
            start,
            end: MAX_CYCLE + 1,
        }
    }

    pub fn contains(&self, cycle: Cycle) -> bool {
        self.start <= cycle && cycle < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns true if the two ranges share at least one cycle.
    pub fn overlaps(&self, other: &CycleRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for CycleRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Named regime identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegimeId {
    Baseline,
    DroughtCascade,
    SouthernConflict,
    Resolution,
}

impl RegimeId {
    /// Returns the regime name.
    pub fn name(&self) -> &'static str {
        match self {
            RegimeId::Baseline => "baseline",
            RegimeId::DroughtCascade => "drought-cascade",
            RegimeId::SouthernConflict => "southern-conflict",
            RegimeId::Resolution => "resolution",
        }
    }
}

impl std::fmt::Display for RegimeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sets a region's status while the cycle is in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRule {
    pub entity: String,
    pub range: CycleRange,
    pub status: Status,
}

/// Sets a link's active flag while the cycle is in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRule {
    pub from: String,
    pub to: String,
    pub range: CycleRange,
    pub active: bool,
}

/// Bumps a pair's conflict probability while the cycle is in range.
///
/// The bump is applied to the baseline probability, not to the output of an
/// earlier rule: `min(cap, baseline + bump)`, then clamped to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub a: String,
    pub b: String,
    pub range: CycleRange,
    pub bump: f64,
    pub cap: f64,
}

impl ScoreRule {
    /// Applies the rule to a baseline probability.
    pub fn apply(&self, baseline: f64) -> f64 {
        (baseline + self.bump).min(self.cap).clamp(0.0, 1.0)
    }
}

/// A named group of rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub id: RegimeId,

    /// Cycles during which the regime is reported as active
    pub window: CycleRange,

    pub status_rules: Vec<StatusRule>,
    pub link_rules: Vec<LinkRule>,
    pub score_rules: Vec<ScoreRule>,
}

impl Regime {
    /// Creates an empty regime.
    pub fn new(id: RegimeId, window: CycleRange) -> Self {
        Self {
            id,
            window,
            status_rules: Vec::new(),
            link_rules: Vec::new(),
            score_rules: Vec::new(),
        }
    }

    /// Adds a status override.
    pub fn status(mut self, entity: &str, range: CycleRange, status: Status) -> Self {
        self.status_rules.push(StatusRule {
            entity: entity.to_string(),
            range,
            status,
        });
        self
    }

    /// Marks a link inactive over `range`.
    pub fn break_link(mut self, from: &str, to: &str, range: CycleRange) -> Self {
        self.link_rules.push(LinkRule {
            from: from.to_string(),
            to: to.to_string(),
            range,
            active: false,
        });
        self
    }

    /// Adds a conflict probability bump.
    pub fn bump_score(mut self, a: &str, b: &str, range: CycleRange, bump: f64, cap: f64) -> Self {
        self.score_rules.push(ScoreRule {
            a: a.to_string(),
            b: b.to_string(),
            range,
            bump,
            cap,
        });
        self
    }

    pub fn is_active_at(&self, cycle: Cycle) -> bool {
        self.window.contains(cycle)
    }

    /// Number of rules of all kinds.
    pub fn rule_count(&self) -> usize {
        self.status_rules.len() + self.link_rules.len() + self.score_rules.len()
    }
}

/// Ordered list of regimes. Order is the fold order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    regimes: Vec<Regime>,
}

impl RuleTable {
    pub fn new(regimes: Vec<Regime>) -> Self {
        Self { regimes }
    }

    /// The authoritative table for the India timeline.
    ///
    /// Northern drought rules fold before southern conflict rules. In the
    /// overlap `[52, 55)` the two regimes set disjoint fields.
    pub fn authoritative() -> Self {
        let baseline = Regime::new(RegimeId::Baseline, CycleRange::new(0, 40));

        let drought = Regime::new(RegimeId::DroughtCascade, CycleRange::new(40, 55))
            .status("RJ", CycleRange::new(41, 55), Status::Critical)
            .status("UP", CycleRange::new(43, 55), Status::Stressed)
            .status("HR", CycleRange::new(43, 55), Status::Stressed)
            .status("MP", CycleRange::new(45, 55), Status::Stressed)
            .status("DL", CycleRange::new(46, 55), Status::Critical)
            .status("RJ", CycleRange::new(49, 55), Status::Collapsed)
            .break_link("PB", "TN", CycleRange::from(45))
            .bump_score("UP", "BR", CycleRange::from(49), 0.10, 0.85);

        let southern = Regime::new(RegimeId::SouthernConflict, CycleRange::new(52, 70))
            .status("MH", CycleRange::new(51, 70), Status::Critical)
            .status("KA", CycleRange::new(53, 70), Status::Critical)
            .status("TN", CycleRange::new(55, 70), Status::Critical)
            .status("TN", CycleRange::new(68, 70), Status::Collapsed)
            .break_link("KA", "TN", CycleRange::from(55))
            .bump_score("KA", "TN", CycleRange::from(51), 0.10, 0.95)
            .bump_score("KA", "TN", CycleRange::from(56), 0.15, 0.98);

        let resolution = Regime::new(RegimeId::Resolution, CycleRange::from(70))
            .status("RJ", CycleRange::from(70), Status::Stressed)
            .status("MH", CycleRange::from(70), Status::Stressed)
            .status("KA", CycleRange::from(70), Status::Stressed)
            .status("TN", CycleRange::from(72), Status::Stressed)
            .status("JH", CycleRange::from(72), Status::Stressed);

        Self::new(vec![baseline, drought, southern, resolution])
    }

    /// Regimes in fold order.
    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    /// Ids of regimes whose window contains `cycle`.
    pub fn active_at(&self, cycle: Cycle) -> Vec<RegimeId> {
        self.regimes
            .iter()
            .filter(|r| r.is_active_at(cycle))
            .map(|r| r.id)
            .collect()
    }

    /// Earliest cycle at which any rule takes effect.
    pub fn first_threshold(&self) -> Option<Cycle> {
        self.regimes
            .iter()
            .flat_map(|r| {
                r.status_rules
                    .iter()
                    .map(|s| s.range)
                    .chain(r.link_rules.iter().map(|l| l.range))
                    .chain(r.score_rules.iter().map(|s| s.range))
            })
            .filter(|range| !range.is_empty())
            .map(|range| range.start)
            .min()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::authoritative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_range_half_open() {
        let range = CycleRange::new(45, 50);
        assert!(!range.contains(44));
        assert!(range.contains(45));
        assert!(range.contains(49));
        assert!(!range.contains(50));
        assert!(CycleRange::new(5, 5).is_empty());
    }

    #[test]
    fn test_open_ended_range_covers_last_cycle() {
        let range = CycleRange::from(70);
        assert!(range.contains(MAX_CYCLE));
        assert!(!range.contains(69));
    }

    #[test]
    fn test_overlaps() {
        let drought = CycleRange::new(40, 55);
        let southern = CycleRange::new(52, 70);
        assert!(drought.overlaps(&southern));
        assert!(!drought.overlaps(&CycleRange::new(55, 60)));
    }

    #[test]
    fn test_score_rule_caps_and_clamps() {
        let rule = ScoreRule {
            a: "KA".into(),
            b: "TN".into(),
            range: CycleRange::from(51),
            bump: 0.10,
            cap: 0.95,
        };
        assert!((rule.apply(0.85) - 0.95).abs() < 1e-9);
        assert!((rule.apply(0.50) - 0.60).abs() < 1e-9);

        let runaway = ScoreRule { bump: 5.0, cap: 3.0, ..rule };
        assert_eq!(runaway.apply(0.5), 1.0);
    }

    #[test]
    fn test_authoritative_regime_order() {
        let table = RuleTable::authoritative();
        let ids: Vec<RegimeId> = table.regimes().iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                RegimeId::Baseline,
                RegimeId::DroughtCascade,
                RegimeId::SouthernConflict,
                RegimeId::Resolution
            ]
        );
    }

    #[test]
    fn test_active_regimes_overlap() {
        let table = RuleTable::authoritative();
        assert_eq!(table.active_at(10), vec![RegimeId::Baseline]);
        assert_eq!(
            table.active_at(52),
            vec![RegimeId::DroughtCascade, RegimeId::SouthernConflict]
        );
        assert_eq!(table.active_at(51), vec![RegimeId::DroughtCascade]);
        assert_eq!(table.active_at(100), vec![RegimeId::Resolution]);
    }

    #[test]
    fn test_first_threshold_is_after_baseline() {
        let table = RuleTable::authoritative();
        assert_eq!(table.first_threshold(), Some(41));
    }

    #[test]
    fn test_regime_name_serialization() {
        let json = serde_json::to_string(&RegimeId::SouthernConflict).unwrap();
        assert_eq!(json, "\"southern-conflict\"");
    }
}
