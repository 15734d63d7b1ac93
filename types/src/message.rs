//! Message categories delivered to members.

use serde::{Deserialize, Serialize};

/// Category of a text notification sent to a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Server/system announcements (group membership changes use this).
    System,
    /// Chat addressed to the whole group.
    Group,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Group => "group",
        }
    }
}
