//! The fixed set of skill domains tracked per user.

use serde::{Deserialize, Serialize};

/// A physical/skill domain a workout session can train.
///
/// The set is fixed; every user has exactly one rating row per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Strength,
    Agility,
    Endurance,
    Explosivity,
    Intelligence,
    Regeneration,
}

impl Domain {
    /// All domains, in canonical order.
    pub const ALL: [Domain; 6] = [
        Domain::Strength,
        Domain::Agility,
        Domain::Endurance,
        Domain::Explosivity,
        Domain::Intelligence,
        Domain::Regeneration,
    ];

    /// Stable lowercase code used in storage and audit rows.
    pub fn code(&self) -> &'static str {
        match self {
            Domain::Strength => "strength",
            Domain::Agility => "agility",
            Domain::Endurance => "endurance",
            Domain::Explosivity => "explosivity",
            Domain::Intelligence => "intelligence",
            Domain::Regeneration => "regeneration",
        }
    }

    /// Parse a storage code back into a domain.
    pub fn from_code(code: &str) -> Option<Domain> {
        match code {
            "strength" => Some(Domain::Strength),
            "agility" => Some(Domain::Agility),
            "endurance" => Some(Domain::Endurance),
            "explosivity" => Some(Domain::Explosivity),
            "intelligence" => Some(Domain::Intelligence),
            "regeneration" => Some(Domain::Regeneration),
            _ => None,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_code(domain.code()), Some(domain));
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(Domain::from_code("cardio"), None);
    }
}
