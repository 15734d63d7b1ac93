//! Read-only member descriptor.

use crate::class::MemberClass;
use crate::error::TypesError;
use crate::id::MemberId;
use serde::{Deserialize, Serialize};

/// What a group needs to know about a member: identity, name and class.
///
/// Mutable session state (the current group) is owned by whoever owns
/// the member, not by this descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub id: MemberId,
    pub name: String,
    pub class: MemberClass,
}

impl MemberInfo {
    pub fn new(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        class: MemberClass,
    ) -> Result<Self, TypesError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TypesError::EmptyName);
        }
        Ok(Self {
            id: id.into(),
            name,
            class,
        })
    }
}
