//! Learned strategy frequencies and agent attention weights.
//!
//! Both are authored tables: how often each state's agent picked an
//! action early vs. late in training, and how much attention an agent
//! pays to each neighbour.

use serde::{Deserialize, Serialize};

/// Training phase for strategy lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Early,
    Late,
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "early" => Ok(Phase::Early),
            "late" => Ok(Phase::Late),
            _ => Err(format!("Unknown phase: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAction {
    pub name: String,

    /// Selection frequency (%) early in training
    pub early: u8,

    /// Selection frequency (%) after training
    pub late: u8,
}

impl StrategyAction {
    pub fn frequency(&self, phase: Phase) -> u8 {
        match phase {
            Phase::Early => self.early,
            Phase::Late => self.late,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyProfile {
    pub state_id: String,
    pub actions: Vec<StrategyAction>,
}

impl StrategyProfile {
    /// `(action, frequency)` for a phase, most frequent first.
    pub fn ranked(&self, phase: Phase) -> Vec<(&str, u8)> {
        let mut ranked: Vec<(&str, u8)> = self
            .actions
            .iter()
            .map(|a| (a.name.as_str(), a.frequency(phase)))
            .collect();
        ranked.sort_by(|x, y| y.1.cmp(&x.1));
        ranked
    }

    /// Action whose frequency grew the most between phases.
    pub fn most_learned(&self) -> Option<&StrategyAction> {
        self.actions
            .iter()
            .max_by_key(|a| a.late as i16 - a.early as i16)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionWeight {
    pub target: String,

    /// Weight in [0, 1]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionProfile {
    pub agent: String,
    pub weights: Vec<AttentionWeight>,
}

impl AttentionProfile {
    /// Weights sorted by descending weight.
    pub fn ranked(&self) -> Vec<&AttentionWeight> {
        let mut ranked: Vec<&AttentionWeight> = self.weights.iter().collect();
        ranked.sort_by(|x, y| y.weight.total_cmp(&x.weight));
        ranked
    }
}

// (state, [(action, early, late)])
const STRATEGIES: &[(&str, &[(&str, u8, u8)])] = &[
    ("RJ", &[
        ("Offer long-term water sharing deal", 15, 73),
        ("Build solar & beg for grid connectivity", 12, 68),
        ("Request central drought assistance", 45, 45),
        ("Import food from neighboring states", 38, 38),
    ]),
    ("KA", &[
        ("Negotiate water release agreements", 20, 65),
        ("Build micro-irrigation infrastructure", 18, 58),
        ("Request tribunal intervention", 35, 42),
        ("Develop drought-resistant crops", 10, 35),
    ]),
    ("TN", &[
        ("File Supreme Court petitions", 25, 62),
        ("Build seawater desalination plants", 15, 55),
        ("Negotiate with upstream states", 30, 48),
        ("Implement water conservation", 22, 40),
    ]),
    ("MH", &[
        ("Declare drought emergency", 30, 58),
        ("Request inter-basin water transfer", 20, 52),
        ("Build more reservoirs", 35, 45),
        ("Promote drip irrigation", 25, 38),
    ]),
    ("PB", &[
        ("Maintain foodgrain supply commitments", 40, 70),
        ("Negotiate water sharing agreements", 25, 55),
        ("Invest in crop diversification", 20, 48),
        ("Build water conservation structures", 18, 42),
    ]),
];

const ATTENTION: &[(&str, &[(&str, f64)])] = &[
    ("GJ", &[("RJ", 0.85), ("MP", 0.72), ("MH", 0.55), ("KL", 0.15)]),
    ("KA", &[("TN", 0.90), ("MH", 0.60), ("AP", 0.45), ("KL", 0.40)]),
    ("UP", &[("BR", 0.75), ("MP", 0.65), ("RJ", 0.50), ("HR", 0.45)]),
];

/// Strategy and attention tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyBook {
    pub strategies: Vec<StrategyProfile>,
    pub attention: Vec<AttentionProfile>,
}

impl StrategyBook {
    pub fn india() -> Self {
        let strategies = STRATEGIES
            .iter()
            .map(|&(state, actions)| StrategyProfile {
                state_id: state.to_string(),
                actions: actions
                    .iter()
                    .map(|&(name, early, late)| StrategyAction {
                        name: name.to_string(),
                        early,
                        late,
                    })
                    .collect(),
            })
            .collect();

        let attention = ATTENTION
            .iter()
            .map(|&(agent, weights)| AttentionProfile {
                agent: agent.to_string(),
                weights: weights
                    .iter()
                    .map(|&(target, weight)| AttentionWeight {
                        target: target.to_string(),
                        weight,
                    })
                    .collect(),
            })
            .collect();

        Self {
            strategies,
            attention,
        }
    }

    pub fn strategy(&self, state_id: &str) -> Option<&StrategyProfile> {
        self.strategies.iter().find(|s| s.state_id == state_id)
    }

    /// Attention profile for `agent`, falling back to the first profile.
    pub fn attention(&self, agent: &str) -> Option<&AttentionProfile> {
        self.attention
            .iter()
            .find(|a| a.agent == agent)
            .or_else(|| self.attention.first())
    }
}

impl Default for StrategyBook {
    fn default() -> Self {
        Self::india()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_late_strategy() {
        let book = StrategyBook::india();
        let rj = book.strategy("RJ").unwrap();
        let ranked = rj.ranked(Phase::Late);
        assert_eq!(ranked[0], ("Offer long-term water sharing deal", 73));
        assert_eq!(ranked.len(), 4);
    }

    #[test]
    fn test_early_phase_ordering_differs() {
        let book = StrategyBook::india();
        let rj = book.strategy("RJ").unwrap();
        assert_eq!(rj.ranked(Phase::Early)[0].0, "Request central drought assistance");
        assert_eq!(rj.most_learned().unwrap().name, "Offer long-term water sharing deal");
    }

    #[test]
    fn test_attention_fallback_and_ranking() {
        let book = StrategyBook::india();
        assert_eq!(book.attention("KA").unwrap().ranked()[0].target, "TN");
        assert_eq!(book.attention("ZZ").unwrap().agent, "GJ");
        assert!(book.strategy("ZZ").is_none());
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("LATE".parse::<Phase>(), Ok(Phase::Late));
        assert!("mid".parse::<Phase>().is_err());
    }
}
