//! Experience distribution policies.

use crate::group::Group;
use party_types::{Experience, MemberId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rule for computing each member's share of an experience pool.
///
/// Chosen when a group is formed and fixed for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionPolicy {
    /// Every member receives the full amount. Not a split.
    FullShare,
    /// Full share, boosted by `bonus_bps` when every combat class is present.
    AllClassBonus { bonus_bps: u32 },
}

impl DistributionPolicy {
    /// 10% bonus.
    pub const DEFAULT_BONUS_BPS: u32 = 1000;

    pub fn all_class_bonus() -> Self {
        Self::AllClassBonus {
            bonus_bps: Self::DEFAULT_BONUS_BPS,
        }
    }

    /// Per-member shares of `amount`, keyed by member id.
    ///
    /// `source` is the member the reward originated from. The built-in
    /// policies do not weight by it.
    pub fn shares(
        &self,
        group: &Group,
        _source: MemberId,
        amount: Experience,
    ) -> HashMap<MemberId, Experience> {
        match *self {
            Self::FullShare => full_share(group, amount),
            Self::AllClassBonus { bonus_bps } => {
                let amount = if group.contains_all_classes() {
                    amount.with_bonus_bps(bonus_bps)
                } else {
                    amount
                };
                full_share(group, amount)
            }
        }
    }
}

impl Default for DistributionPolicy {
    fn default() -> Self {
        Self::all_class_bonus()
    }
}

fn full_share(group: &Group, amount: Experience) -> HashMap<MemberId, Experience> {
    group.members().iter().map(|m| (m.id, amount)).collect()
}
