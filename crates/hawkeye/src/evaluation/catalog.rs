use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest score a skill slider can hold.
pub const MIN_SCORE: u8 = 0;
/// Highest score a skill slider can hold.
pub const MAX_SCORE: u8 = 10;

/// One independently scored dimension of a player evaluation.
///
/// The declaration order is the catalog order: it drives form layout and the
/// column order of every CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillAxis {
    Hitting,
    Passing,
    Defense,
    Setting,
    Serving,
    Voice,
    Potential,
}

impl SkillAxis {
    pub const COUNT: usize = 7;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Hitting,
            Self::Passing,
            Self::Defense,
            Self::Setting,
            Self::Serving,
            Self::Voice,
            Self::Potential,
        ]
    }

    /// Stable key used in the persisted roster.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Hitting => "hitting",
            Self::Passing => "passing",
            Self::Defense => "defense",
            Self::Setting => "setting",
            Self::Serving => "serving",
            Self::Voice => "voice",
            Self::Potential => "potential",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hitting => "Hitting",
            Self::Passing => "Passing",
            Self::Defense => "Defense",
            Self::Setting => "Setting",
            Self::Serving => "Serving",
            Self::Voice => "Voice/Presence",
            Self::Potential => "Potential to Improve",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|axis| axis.id() == id)
    }
}

/// School grade of a player. Only grades 7 through 12 try out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl Grade {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Seventh,
            Self::Eighth,
            Self::Ninth,
            Self::Tenth,
            Self::Eleventh,
            Self::Twelfth,
        ]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Seventh => 7,
            Self::Eighth => 8,
            Self::Ninth => 9,
            Self::Tenth => 10,
            Self::Eleventh => 11,
            Self::Twelfth => 12,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Seventh => "7",
            Self::Eighth => "8",
            Self::Ninth => "9",
            Self::Tenth => "10",
            Self::Eleventh => "11",
            Self::Twelfth => "12",
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|grade| grade.number() == number)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = UnknownCatalogValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| UnknownCatalogValue::grade(value))
    }
}

/// Court position a player is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Outside,
    Middle,
    RightSide,
    Setter,
    LiberoDs,
}

impl Position {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Outside,
            Self::Middle,
            Self::RightSide,
            Self::Setter,
            Self::LiberoDs,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Outside => "Outside",
            Self::Middle => "Middle",
            Self::RightSide => "Right Side",
            Self::Setter => "Setter",
            Self::LiberoDs => "Libero/DS",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Position {
    type Err = UnknownCatalogValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ordered()
            .into_iter()
            .find(|position| position.label().eq_ignore_ascii_case(&collapsed))
            .ok_or_else(|| UnknownCatalogValue::position(value))
    }
}

/// Raised when free text does not name a grade or position from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a known {kind}")]
pub struct UnknownCatalogValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownCatalogValue {
    fn grade(value: &str) -> Self {
        Self {
            kind: "grade",
            value: value.to_string(),
        }
    }

    fn position(value: &str) -> Self {
        Self {
            kind: "position",
            value: value.to_string(),
        }
    }
}
