//! SRS proficiency levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five SRS proficiency levels Bunpro groups reviews into.
///
/// Serializes as the API name (`"beginner"`, `"adept"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    /// Newly learned items
    Beginner,
    /// Items past the first few reviews
    Adept,
    /// Items reviewed over several weeks
    Seasoned,
    /// Items reviewed over several months
    Expert,
    /// Fully learned items
    Master,
}

impl ProficiencyLevel {
    /// Every level, in the order they are fetched.
    pub const ALL: [ProficiencyLevel; 5] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Adept,
        ProficiencyLevel::Seasoned,
        ProficiencyLevel::Expert,
        ProficiencyLevel::Master,
    ];

    /// Value of the `level` query parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Adept => "adept",
            Self::Seasoned => "seasoned",
            Self::Expert => "expert",
            Self::Master => "master",
        }
    }

    /// Human label, also written to the `progress` CSV column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Adept => "Adept",
            Self::Seasoned => "Seasoned",
            Self::Expert => "Expert",
            Self::Master => "Master",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown proficiency level '{0}' (expected beginner, adept, seasoned, expert or master)")]
pub struct UnknownLevel(pub String);

impl FromStr for ProficiencyLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.api_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}
