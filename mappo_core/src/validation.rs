//! Validation Module - Registry and Rule Table Consistency
//! ========================================================
//!
//! The resolver is total: it skips any rule that names something the
//! registry does not contain. That makes authoring mistakes silent at
//! runtime, so they are caught here instead, at test time or via
//! `mappo-sim --validate`.
//!
//! Checks:
//! - Entity ids are unique
//! - Link endpoints, pair members and event participants exist
//! - Magnitudes are non-negative, probabilities lie in [0, 1]
//! - The event script is ordered by trigger cycle
//! - Every rule targets something that exists and has a non-empty range
//! - Case triggers point at known case studies
//!
//! Usage:
//! ```ignore
//! use mappo_core::Timeline;
//!
//! let report = Timeline::india().validate();
//! assert!(report.is_clean(), "{}", report);
//! ```

use crate::case_study::CaseLibrary;
use crate::model::{Cycle, MAX_CYCLE};
use crate::registry::Registry;
use crate::rules::{CycleRange, RegimeId, RuleTable};
use std::collections::HashSet;
use thiserror::Error;

// =============================================================================
// ISSUES
// =============================================================================

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Duplicate entity id: {0}")]
    DuplicateEntity(String),

    #[error("Link {link} references unknown entity {entity}")]
    UnknownLinkEndpoint { link: String, entity: String },

    #[error("Link {link} has negative magnitude {magnitude}")]
    NegativeMagnitude { link: String, magnitude: f64 },

    #[error("Pair {a}-{b} references unknown entity {entity}")]
    UnknownPairMember { a: String, b: String, entity: String },

    #[error("Pair {a}-{b} has probability {probability} outside [0, 1]")]
    ProbabilityOutOfRange { a: String, b: String, probability: f64 },

    #[error("Event {event} references unknown entity {entity}")]
    UnknownEventEntity { event: String, entity: String },

    #[error("Event {event} at cycle {cycle} is past the last cycle")]
    EventPastEnd { event: String, cycle: Cycle },

    #[error("Event {event} at cycle {cycle} is out of script order")]
    ScriptOutOfOrder { event: String, cycle: Cycle },

    #[error("Duplicate event id: {0}")]
    DuplicateEvent(String),

    #[error("{regime} rule references unknown target {target}")]
    UnknownRuleTarget { regime: RegimeId, target: String },

    #[error("{regime} rule for {target} has empty range {range}")]
    EmptyRange { regime: RegimeId, target: String, range: CycleRange },

    #[error("Case trigger at cycle {cycle} references unknown case study {case_id}")]
    UnknownCaseStudy { cycle: Cycle, case_id: String },
}

// =============================================================================
// REPORT
// =============================================================================

/// All issues found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Converts into a `Result`, returning the first issue on failure.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.issues.into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    fn push(&mut self, issue: ValidationError) {
        self.issues.push(issue);
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "no issues");
        }
        writeln!(f, "{} issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  - {}", issue)?;
        }
        Ok(())
    }
}

// =============================================================================
// CHECKS
// =============================================================================

/// Runs every check and collects all issues.
pub fn validate(registry: &Registry, rules: &RuleTable, cases: &CaseLibrary) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_entities(registry, &mut report);
    check_links(registry, &mut report);
    check_pairs(registry, &mut report);
    check_script(registry, &mut report);
    check_rules(registry, rules, &mut report);
    check_cases(cases, &mut report);

    report
}

fn check_entities(registry: &Registry, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for entity in &registry.entities {
        if !seen.insert(entity.id.as_str()) {
            report.push(ValidationError::DuplicateEntity(entity.id.clone()));
        }
    }
}

fn check_links(registry: &Registry, report: &mut ValidationReport) {
    for link in &registry.relationships {
        for endpoint in [&link.from, &link.to] {
            if !registry.contains(endpoint) {
                report.push(ValidationError::UnknownLinkEndpoint {
                    link: link.key(),
                    entity: endpoint.clone(),
                });
            }
        }
        if link.magnitude < 0.0 {
            report.push(ValidationError::NegativeMagnitude {
                link: link.key(),
                magnitude: link.magnitude,
            });
        }
    }
}

fn check_pairs(registry: &Registry, report: &mut ValidationReport) {
    for score in &registry.scores {
        for member in [&score.a, &score.b] {
            if !registry.contains(member) {
                report.push(ValidationError::UnknownPairMember {
                    a: score.a.clone(),
                    b: score.b.clone(),
                    entity: member.clone(),
                });
            }
        }
        if !(0.0..=1.0).contains(&score.probability) {
            report.push(ValidationError::ProbabilityOutOfRange {
                a: score.a.clone(),
                b: score.b.clone(),
                probability: score.probability,
            });
        }
    }
}

fn check_script(registry: &Registry, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    let mut last_cycle = 0;

    for event in &registry.events {
        if !seen.insert(event.id.as_str()) {
            report.push(ValidationError::DuplicateEvent(event.id.clone()));
        }
        if event.cycle < last_cycle {
            report.push(ValidationError::ScriptOutOfOrder {
                event: event.id.clone(),
                cycle: event.cycle,
            });
        }
        last_cycle = last_cycle.max(event.cycle);

        if event.cycle > MAX_CYCLE {
            report.push(ValidationError::EventPastEnd {
                event: event.id.clone(),
                cycle: event.cycle,
            });
        }
        for entity in &event.entities {
            if !registry.contains(entity) {
                report.push(ValidationError::UnknownEventEntity {
                    event: event.id.clone(),
                    entity: entity.clone(),
                });
            }
        }
    }
}

fn check_rules(registry: &Registry, rules: &RuleTable, report: &mut ValidationReport) {
    for regime in rules.regimes() {
        let mut check_range = |target: String, range: CycleRange| {
            if range.is_empty() {
                report.push(ValidationError::EmptyRange {
                    regime: regime.id,
                    target,
                    range,
                });
            }
        };

        for rule in &regime.status_rules {
            check_range(rule.entity.clone(), rule.range);
        }
        for rule in &regime.link_rules {
            check_range(format!("{}-{}", rule.from, rule.to), rule.range);
        }
        for rule in &regime.score_rules {
            check_range(format!("{}-{}", rule.a, rule.b), rule.range);
        }

        for rule in &regime.status_rules {
            if !registry.contains(&rule.entity) {
                report.push(ValidationError::UnknownRuleTarget {
                    regime: regime.id,
                    target: rule.entity.clone(),
                });
            }
        }
        for rule in &regime.link_rules {
            if registry.relationship(&rule.from, &rule.to).is_none() {
                report.push(ValidationError::UnknownRuleTarget {
                    regime: regime.id,
                    target: format!("{}-{}", rule.from, rule.to),
                });
            }
        }
        for rule in &regime.score_rules {
            if registry.score(&rule.a, &rule.b).is_none() {
                report.push(ValidationError::UnknownRuleTarget {
                    regime: regime.id,
                    target: format!("{}-{}", rule.a, rule.b),
                });
            }
        }
    }
}

fn check_cases(cases: &CaseLibrary, report: &mut ValidationReport) {
    for trigger in &cases.triggers {
        if cases.case(&trigger.case_id).is_none() {
            report.push(ValidationError::UnknownCaseStudy {
                cycle: trigger.cycle,
                case_id: trigger.case_id.clone(),
            });
        }
    }
}
