use party_types::{GroupId, MemberId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("member {0} is not registered")]
    UnknownMember(MemberId),

    #[error("member {0} is already registered")]
    DuplicateMember(MemberId),

    #[error("member {member} already belongs to {group}")]
    AlreadyGrouped { member: MemberId, group: GroupId },

    #[error("member {0} is not in a group")]
    NotGrouped(MemberId),

    #[error("member {0} cannot invite themselves")]
    SelfInvite(MemberId),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("party registry lock poisoned")]
    LockPoisoned,
}
