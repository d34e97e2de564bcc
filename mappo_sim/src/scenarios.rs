//! Quick scenarios for jumping the timeline to a crisis.

use serde::{Deserialize, Serialize};

/// Resource deltas (percentage points) a scenario applies to its states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceImpact {
    pub water: i8,
    pub power: i8,
    pub agriculture: i8,
}

impl std::fmt::Display for ResourceImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "water {:+}%, power {:+}%, agriculture {:+}%",
            self.water, self.power, self.agriculture
        )
    }
}

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Severe drought across 15 districts in Maharashtra
    MaharashtraDrought,

    /// Monsoon failure over Rajasthan and the northern plains
    MonsoonFailure,

    /// Karnataka-Tamil Nadu water sharing conflict intensifies
    CauveryEscalation,

    /// Groundwater depletion and crop failure in Punjab
    PunjabCrisis,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::MaharashtraDrought,
            ScenarioId::MonsoonFailure,
            ScenarioId::CauveryEscalation,
            ScenarioId::PunjabCrisis,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::MaharashtraDrought => "maharashtra_drought",
            ScenarioId::MonsoonFailure => "monsoon_failure",
            ScenarioId::CauveryEscalation => "cauvery_escalation",
            ScenarioId::PunjabCrisis => "punjab_crisis",
        }
    }

    /// Returns the display title.
    pub fn title(&self) -> &'static str {
        match self {
            ScenarioId::MaharashtraDrought => "Maharashtra Drought Crisis",
            ScenarioId::MonsoonFailure => "North India Monsoon Failure",
            ScenarioId::CauveryEscalation => "Cauvery Water Dispute Escalation",
            ScenarioId::PunjabCrisis => "Punjab Agricultural Crisis",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::MaharashtraDrought => {
                "Maharashtra Region is facing severe droughts affecting 15 districts"
            }
            ScenarioId::MonsoonFailure => {
                "Monsoon failure hits Rajasthan and surrounding states"
            }
            ScenarioId::CauveryEscalation => {
                "Karnataka-Tamil Nadu water sharing conflict intensifies"
            }
            ScenarioId::PunjabCrisis => "Punjab faces groundwater depletion and crop failure",
        }
    }

    /// Returns the affected region ids, primary region first.
    ///
    /// "TG" is kept as authored; the registry spells Telangana "TL".
    pub fn affected_states(&self) -> &'static [&'static str] {
        match self {
            ScenarioId::MaharashtraDrought => &["MH", "KA", "TG"],
            ScenarioId::MonsoonFailure => &["RJ", "UP", "MP", "HR"],
            ScenarioId::CauveryEscalation => &["KA", "TN", "KL"],
            ScenarioId::PunjabCrisis => &["PB", "HR", "UP"],
        }
    }

    /// Returns the resource impact on affected states.
    pub fn resource_impact(&self) -> ResourceImpact {
        let (water, agriculture, power) = match self {
            ScenarioId::MaharashtraDrought => (-40, -35, -20),
            ScenarioId::MonsoonFailure => (-50, -45, -15),
            ScenarioId::CauveryEscalation => (-30, -25, -10),
            ScenarioId::PunjabCrisis => (-45, -40, -10),
        };
        ResourceImpact {
            water,
            power,
            agriculture,
        }
    }

    /// Matches a free-text query against scenario keywords.
    ///
    /// ```ignore
    /// assert_eq!(
    ///     ScenarioId::match_query("Karnataka-Tamil Nadu water dispute escalation"),
    ///     Some(ScenarioId::CauveryEscalation)
    /// );
    /// ```
    pub fn match_query(query: &str) -> Option<ScenarioId> {
        let query = query.to_lowercase();
        let keywords: [(ScenarioId, &[&str]); 4] = [
            (ScenarioId::CauveryEscalation, &["cauvery", "karnataka", "tamil", "kabini"]),
            (ScenarioId::PunjabCrisis, &["punjab", "groundwater", "wheat"]),
            (ScenarioId::MaharashtraDrought, &["maharashtra", "marathwada"]),
            (ScenarioId::MonsoonFailure, &["monsoon", "rajasthan", "north"]),
        ];

        keywords
            .iter()
            .find(|(_, words)| words.iter().any(|w| query.contains(w)))
            .map(|(id, _)| *id)
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maharashtra_drought" | "maharashtradrought" | "1" => Ok(ScenarioId::MaharashtraDrought),
            "monsoon_failure" | "monsoonfailure" | "2" => Ok(ScenarioId::MonsoonFailure),
            "cauvery_escalation" | "cauveryescalation" | "3" => Ok(ScenarioId::CauveryEscalation),
            "punjab_crisis" | "punjabcrisis" | "4" => Ok(ScenarioId::PunjabCrisis),
            _ => ScenarioId::match_query(s).ok_or_else(|| format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_ids() {
        assert_eq!("punjab_crisis".parse::<ScenarioId>(), Ok(ScenarioId::PunjabCrisis));
        assert_eq!("2".parse::<ScenarioId>(), Ok(ScenarioId::MonsoonFailure));
        assert!("volcano".parse::<ScenarioId>().is_err());
    }

    #[test]
    fn test_example_queries() {
        assert_eq!(
            ScenarioId::match_query("Maharashtra Region is facing droughts"),
            Some(ScenarioId::MaharashtraDrought)
        );
        assert_eq!(
            ScenarioId::match_query("Karnataka-Tamil Nadu water dispute escalation"),
            Some(ScenarioId::CauveryEscalation)
        );
        assert_eq!(
            ScenarioId::match_query("Punjab agricultural crisis due to groundwater depletion"),
            Some(ScenarioId::PunjabCrisis)
        );
        assert_eq!(
            ScenarioId::match_query("North India monsoon failure affecting Rajasthan"),
            Some(ScenarioId::MonsoonFailure)
        );
        assert_eq!(ScenarioId::match_query("quiet day"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for id in ScenarioId::all() {
            assert_eq!(id.name().parse::<ScenarioId>(), Ok(id));
        }
    }

    #[test]
    fn test_impacts_are_losses() {
        for id in ScenarioId::all() {
            let impact = id.resource_impact();
            assert!(impact.water < 0 && impact.power < 0 && impact.agriculture < 0);
        }
    }

    #[test]
    fn test_impact_display() {
        assert_eq!(
            ScenarioId::MaharashtraDrought.resource_impact().to_string(),
            "water -40%, power -20%, agriculture -35%"
        );
    }
}
