//! MAPPO Metrics Module
//! ====================
//!
//! Summary figures derived from a snapshot:
//! - **Status histogram**: how many regions sit at each status
//! - **Link health**: how many supply links are broken
//! - **Hotspot**: the pair with the highest conflict probability
//! - **System status**: a single healthy/degraded/critical verdict
//!
//! These drive the one-line summaries printed by the CLI and the
//! per-frame metrics in exports.

use crate::model::{Cycle, Status};
use crate::resolver::Snapshot;
use serde::{Deserialize, Serialize};

/// Pairs at or above this probability count as hotspots.
pub const HOTSPOT_THRESHOLD: f64 = 0.8;

/// A pair at or above this probability makes the system critical.
pub const CRITICAL_PAIR_THRESHOLD: f64 = 0.9;

/// This many critical regions make the system degraded.
pub const DEGRADED_CRITICAL_COUNT: usize = 5;

/// Overall system health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Healthy,
    Degraded,
    Critical,
}

impl SystemStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SystemStatus::Healthy => "healthy",
            SystemStatus::Degraded => "degraded",
            SystemStatus::Critical => "critical",
        }
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Metrics calculated for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetrics {
    pub cycle: Cycle,

    /// Region count per status, in `Status::ALL` order
    pub stable: usize,
    pub stressed: usize,
    pub critical: usize,
    pub collapsed: usize,

    /// Supply links currently inactive
    pub broken_links: usize,

    /// Scripted events visible so far
    pub visible_events: usize,

    /// Pair with the highest conflict probability, as `"A-B"`
    pub hottest_pair: Option<String>,
    pub hottest_probability: f64,

    /// Pairs at or above `HOTSPOT_THRESHOLD`
    pub hotspots: usize,

    /// Region with the lowest single resource level
    pub most_depleted: Option<String>,

    pub system_status: SystemStatus,
}

impl SnapshotMetrics {
    /// Computes metrics for a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let count = |status: Status| snapshot.entities.iter().filter(|e| e.status == status).count();

        let hottest = snapshot
            .scores
            .iter()
            .max_by(|x, y| x.probability.total_cmp(&y.probability));

        let most_depleted = snapshot
            .entities
            .iter()
            .min_by_key(|e| e.resources.weakest())
            .map(|e| e.id.clone());

        let mut metrics = Self {
            cycle: snapshot.cycle,
            stable: count(Status::Stable),
            stressed: count(Status::Stressed),
            critical: count(Status::Critical),
            collapsed: count(Status::Collapsed),
            broken_links: snapshot.broken_links().count(),
            visible_events: snapshot.events.len(),
            hottest_pair: hottest.map(|s| format!("{}-{}", s.a, s.b)),
            hottest_probability: hottest.map(|s| s.probability).unwrap_or(0.0),
            hotspots: snapshot
                .scores
                .iter()
                .filter(|s| s.probability >= HOTSPOT_THRESHOLD)
                .count(),
            most_depleted,
            system_status: SystemStatus::Healthy,
        };
        metrics.system_status = metrics.classify();
        metrics
    }

    /// Critical if anything collapsed or a pair is near-certain to fight;
    /// degraded if many regions are critical or any link is broken.
    fn classify(&self) -> SystemStatus {
        if self.collapsed > 0 || self.hottest_probability >= CRITICAL_PAIR_THRESHOLD {
            SystemStatus::Critical
        } else if self.critical >= DEGRADED_CRITICAL_COUNT || self.broken_links > 0 {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        }
    }

    /// Region count for a status.
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Stable => self.stable,
            Status::Stressed => self.stressed,
            Status::Critical => self.critical,
            Status::Collapsed => self.collapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Timeline;

    #[test]
    fn test_counts_sum_to_entity_total() {
        let timeline = Timeline::india();
        for cycle in [0, 45, 52, 68, 100] {
            let metrics = SnapshotMetrics::from_snapshot(&timeline.resolve(cycle));
            let total: usize = Status::ALL.iter().map(|s| metrics.count(*s)).sum();
            assert_eq!(total, 30);
        }
    }

    #[test]
    fn test_baseline_metrics() {
        let metrics = SnapshotMetrics::from_snapshot(&Timeline::india().resolve(0));
        assert_eq!(metrics.critical, 6);
        assert_eq!(metrics.collapsed, 0);
        assert_eq!(metrics.broken_links, 0);
        assert_eq!(metrics.hottest_pair.as_deref(), Some("KA-TN"));
        assert_eq!(metrics.hotspots, 1);
        // 6 critical regions at baseline
        assert_eq!(metrics.system_status, SystemStatus::Degraded);
        assert_eq!(metrics.most_depleted.as_deref(), Some("DL"));
    }

    #[test]
    fn test_collapse_is_critical() {
        let metrics = SnapshotMetrics::from_snapshot(&Timeline::india().resolve(49));
        assert_eq!(metrics.collapsed, 1);
        assert_eq!(metrics.system_status, SystemStatus::Critical);
    }

    #[test]
    fn test_late_cycles_remain_degraded() {
        let metrics = SnapshotMetrics::from_snapshot(&Timeline::india().resolve(100));
        assert_eq!(metrics.broken_links, 2);
        assert_eq!(metrics.visible_events, 11);
        // KA-TN stays bumped to 0.98
        assert_eq!(metrics.system_status, SystemStatus::Critical);
    }
}
