//! Thread-safe handle to a party registry.

use crate::error::GroupError;
use crate::registry::PartyRegistry;
use crate::types::GroupSnapshot;
use party_types::{Experience, GroupId, MemberId, MemberInfo, MemberSink, Timestamp};
use std::sync::{Arc, Mutex};

/// Cloneable handle that serializes every registry operation behind one lock.
///
/// Joins, leaves and shares touch both a group and its members' state, so a
/// single lock covers the whole registry. The sink is invoked while the
/// lock is held and must not block.
pub struct SharedRegistry<S> {
    inner: Arc<Mutex<PartyRegistry<S>>>,
}

impl<S> Clone for SharedRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MemberSink> SharedRegistry<S> {
    pub fn new(registry: PartyRegistry<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut PartyRegistry<S>) -> R) -> Result<R, GroupError> {
        let mut guard = self.inner.lock().map_err(|_| GroupError::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    pub fn register_member(&self, info: MemberInfo) -> Result<(), GroupError> {
        self.with(|r| r.register_member(info))?
    }

    pub fn unregister_member(&self, member: MemberId) -> Result<(), GroupError> {
        self.with(|r| r.unregister_member(member).map(|_| ()))?
    }

    pub fn invite(
        &self,
        inviter: MemberId,
        invitee: MemberId,
        now: Timestamp,
    ) -> Result<bool, GroupError> {
        self.with(|r| r.invite(inviter, invitee, now))?
    }

    pub fn join(&self, group: GroupId, member: MemberId) -> Result<bool, GroupError> {
        self.with(|r| r.join(group, member))?
    }

    pub fn leave(&self, member: MemberId) -> Result<(), GroupError> {
        self.with(|r| r.leave(member))?
    }

    pub fn say(&self, speaker: MemberId, text: &str) -> Result<(), GroupError> {
        self.with(|r| r.say(speaker, text))?
    }

    pub fn award_experience(&self, source: MemberId, amount: Experience) -> Result<(), GroupError> {
        self.with(|r| r.award_experience(source, amount))?
    }

    /// Snapshots of every live group, ordered by id.
    pub fn snapshots(&self, now: Timestamp) -> Result<Vec<GroupSnapshot>, GroupError> {
        self.with(|r| r.groups().into_iter().map(|g| g.snapshot(now)).collect())
    }
}
