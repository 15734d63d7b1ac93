//! Group effect and view types.

use party_types::{Experience, GroupId, MemberClass, MemberId, MemberInfo, MessageKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A change a group asks its owner to apply to member sessions.
///
/// Effects are queued in the order the group produced them and must be
/// applied in that order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupEffect {
    /// Deliver a text notification to a member.
    Notify {
        member: MemberId,
        text: String,
        kind: MessageKind,
    },
    /// The member is now in `group`; set its back-reference.
    Joined { member: MemberId, group: GroupId },
    /// The member left `group`; clear its back-reference.
    Left { member: MemberId, group: GroupId },
    /// Grant experience to a member.
    Award { member: MemberId, amount: Experience },
}

/// Session-layer record of a registered member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberState {
    pub info: MemberInfo,
    /// Back-reference to the group this member is in, if any.
    pub group: Option<GroupId>,
}

impl MemberState {
    pub fn new(info: MemberInfo) -> Self {
        Self { info, group: None }
    }

    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }
}

/// Point-in-time, serializable view of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub members: Vec<MemberInfo>,
    pub class_counts: BTreeMap<MemberClass, u32>,
    pub max_members: usize,
    pub created_at: u64,
    pub age_secs: u64,
    pub all_classes: bool,
}
