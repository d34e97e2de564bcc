//! Historical case studies surfaced alongside the timeline.

use crate::model::Cycle;
use serde::{Deserialize, Serialize};

/// A real-world episode the current pattern resembles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalParallel {
    pub event: String,
    pub year: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    pub id: String,
    pub pattern: String,
    pub description: String,
    pub parallel: HistoricalParallel,

    /// Similarity in [0, 1]
    pub similarity: f64,

    pub references: Vec<String>,
}

/// Shows `case_id` from `cycle` until a later trigger replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseTrigger {
    pub cycle: Cycle,
    pub case_id: String,
}

// (id, pattern, description, event, year, details, similarity, references)
const CASES: &[(&str, &str, &str, &str, &str, &str, f64, &[&str])] = &[
    (
        "1",
        "Upstream reservoir reduction → downstream protest",
        "Upstream state reduces water flow during acute downstream distress",
        "Karnataka reduced Kabini & Krishnaraja Sagar outflow to Tamil Nadu",
        "2016-17",
        "35-40% reduction during peak crisis → violence in Mandya & Bengaluru → Supreme Court monitored release order",
        0.87,
        &["NITI Aayog Report 2017", "CAG Audit 2018", "Supreme Court Order 2018"],
    ),
    (
        "2",
        "Chronic power over-drawal without payment",
        "State consistently draws more power than allocated without timely payment",
        "Punjab over-drew from Northern Grid",
        "2012-14",
        "Chronic over-drawal led to grid collapse in July 2012 affecting 600 million people",
        0.82,
        &["CERC Report 2013", "POSOCO Analysis 2014"],
    ),
    (
        "3",
        "Foodgrain supply defection during scarcity",
        "State fails to honor food supply commitments during scarcity period",
        "Punjab wheat supply disruption",
        "2006-07",
        "Reduced wheat allocation to southern states during low production year",
        0.78,
        &["FCI Records 2007", "Ministry of Agriculture Report"],
    ),
    (
        "4",
        "Repeated tribunal/Supreme Court violation",
        "State repeatedly violates water tribunal or court orders",
        "Karnataka-Tamil Nadu Cauvery disputes",
        "1990-2024",
        "Multiple instances of non-compliance with Cauvery Tribunal awards and SC orders",
        0.91,
        &["Cauvery Tribunal Award", "Supreme Court Orders 2018", "CWRC Reports"],
    ),
    (
        "5",
        "Hegemonic state gradually isolated",
        "Previously dominant state loses alliances due to aggressive policies",
        "Punjab gradual isolation in northern grid",
        "2015-2020",
        "Aggressive stance on water sharing led to reduced cooperation from neighboring states",
        0.75,
        &["NRSC Reports", "Inter-State Council Minutes"],
    ),
];

const TRIGGERS: &[(Cycle, &str)] = &[(45, "3"), (52, "4"), (68, "1")];

/// Case studies plus the cycles that bring them up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseLibrary {
    pub cases: Vec<CaseStudy>,

    /// Sorted by cycle
    pub triggers: Vec<CaseTrigger>,
}

impl CaseLibrary {
    pub fn india() -> Self {
        let cases = CASES
            .iter()
            .map(|&(id, pattern, description, event, year, details, similarity, refs)| CaseStudy {
                id: id.to_string(),
                pattern: pattern.to_string(),
                description: description.to_string(),
                parallel: HistoricalParallel {
                    event: event.to_string(),
                    year: year.to_string(),
                    details: details.to_string(),
                },
                similarity,
                references: refs.iter().map(|r| r.to_string()).collect(),
            })
            .collect();

        let triggers = TRIGGERS
            .iter()
            .map(|&(cycle, case_id)| CaseTrigger {
                cycle,
                case_id: case_id.to_string(),
            })
            .collect();

        Self { cases, triggers }
    }

    pub fn case(&self, id: &str) -> Option<&CaseStudy> {
        self.cases.iter().find(|c| c.id == id)
    }

    /// Id of the case on display at `cycle`: the latest trigger at or before it.
    pub fn active_id_at(&self, cycle: Cycle) -> Option<&str> {
        self.triggers
            .iter()
            .filter(|t| t.cycle <= cycle)
            .max_by_key(|t| t.cycle)
            .map(|t| t.case_id.as_str())
    }

    pub fn active_at(&self, cycle: Cycle) -> Option<&CaseStudy> {
        self.active_id_at(cycle).and_then(|id| self.case(id))
    }
}

impl Default for CaseLibrary {
    fn default() -> Self {
        Self::india()
    }
}
