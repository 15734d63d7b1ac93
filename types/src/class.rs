//! Member class taxonomy.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The class a member plays as.
///
/// `Peasant` is the starting, non-combat class. The other five are the
/// combat roles that count towards the all-class experience bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberClass {
    Peasant,
    Warrior,
    Rogue,
    Wizard,
    Priest,
    Monk,
}

impl MemberClass {
    /// Every class value, in declaration order.
    pub const ALL: [MemberClass; 6] = [
        Self::Peasant,
        Self::Warrior,
        Self::Rogue,
        Self::Wizard,
        Self::Priest,
        Self::Monk,
    ];

    /// The five combat roles checked by the all-class bonus.
    pub const COMBAT: [MemberClass; 5] = [
        Self::Monk,
        Self::Priest,
        Self::Rogue,
        Self::Warrior,
        Self::Wizard,
    ];

    /// Whether this class is one of the combat roles.
    pub fn is_combat(&self) -> bool {
        !matches!(self, Self::Peasant)
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Peasant => "peasant",
            Self::Warrior => "warrior",
            Self::Rogue => "rogue",
            Self::Wizard => "wizard",
            Self::Priest => "priest",
            Self::Monk => "monk",
        }
    }
}

impl fmt::Display for MemberClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberClass {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypesError::UnknownClass(s.to_string()))
    }
}
