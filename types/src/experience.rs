//! Experience amount type.
//!
//! Experience is a non-negative integer. Bonuses are expressed in basis
//! points (10_000 = 100%) and always truncate towards zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis points in one whole (100%).
pub const BPS_SCALE: u128 = 10_000;

/// An amount of experience points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Experience(u64);

impl Experience {
    pub const ZERO: Self = Self(0);

    pub fn new(points: u64) -> Self {
        Self(points)
    }

    pub fn points(&self) -> u64 {
        self.0
    }

    /// Apply a percentage bonus given in basis points, truncating.
    ///
    /// `1000` bps is a 10% bonus: `1000 -> 1100`, `15 -> 16`.
    /// Saturates at `u64::MAX`.
    pub fn with_bonus_bps(self, bonus_bps: u32) -> Self {
        let scaled = self.0 as u128 * (BPS_SCALE + bonus_bps as u128) / BPS_SCALE;
        Self(u64::try_from(scaled).unwrap_or(u64::MAX))
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} xp", self.0)
    }
}
