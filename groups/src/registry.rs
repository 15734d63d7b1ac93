//! Party registry — owns member sessions' group state and the live groups.

use crate::config::GroupConfig;
use crate::error::GroupError;
use crate::group::Group;
use crate::types::{GroupEffect, MemberState};
use party_types::{Experience, GroupId, MemberId, MemberInfo, MemberSink, Timestamp};
use party_utils::StatsCounter;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

pub const STAT_GROUPS_FORMED: &str = "groups_formed";
pub const STAT_GROUPS_DISBANDED: &str = "groups_disbanded";
pub const STAT_MEMBERS_JOINED: &str = "members_joined";
pub const STAT_MEMBERS_LEFT: &str = "members_left";
pub const STAT_INVITES_REJECTED: &str = "invites_rejected";
pub const STAT_EXPERIENCE_AWARDED: &str = "experience_awarded";

const STAT_NAMES: &[&str] = &[
    STAT_GROUPS_FORMED,
    STAT_GROUPS_DISBANDED,
    STAT_MEMBERS_JOINED,
    STAT_MEMBERS_LEFT,
    STAT_INVITES_REJECTED,
    STAT_EXPERIENCE_AWARDED,
];

/// Registry of connected members and the groups they form.
///
/// This is the session layer for groups: it is the only writer of each
/// member's group back-reference, and it applies the effects groups queue,
/// delivering notifications and awards through `S`.
pub struct PartyRegistry<S> {
    sink: S,
    config: GroupConfig,
    members: HashMap<MemberId, MemberState>,
    groups: HashMap<GroupId, Group>,
    next_group_id: u64,
    stats: StatsCounter,
}

impl<S: MemberSink> PartyRegistry<S> {
    pub fn new(sink: S, config: GroupConfig) -> Self {
        Self {
            sink,
            config,
            members: HashMap::new(),
            groups: HashMap::new(),
            next_group_id: 1,
            stats: StatsCounter::new(STAT_NAMES),
        }
    }

    /// Register a connected member.
    pub fn register_member(&mut self, info: MemberInfo) -> Result<(), GroupError> {
        if self.members.contains_key(&info.id) {
            return Err(GroupError::DuplicateMember(info.id));
        }
        debug!(member = %info.id, name = %info.name, class = %info.class, "member registered");
        self.members.insert(info.id, MemberState::new(info));
        Ok(())
    }

    /// Unregister a member (disconnect). A grouped member leaves first.
    pub fn unregister_member(&mut self, member: MemberId) -> Result<MemberState, GroupError> {
        if self.state(member)?.is_grouped() {
            self.leave(member)?;
        }
        debug!(member = %member, "member unregistered");
        self.members
            .remove(&member)
            .ok_or(GroupError::UnknownMember(member))
    }

    /// Form a new group with `founder` as its only member.
    pub fn form_group(&mut self, founder: MemberId, now: Timestamp) -> Result<GroupId, GroupError> {
        let state = self.state(founder)?;
        if let Some(group) = state.group {
            return Err(GroupError::AlreadyGrouped {
                member: founder,
                group,
            });
        }
        let info = state.info.clone();

        let id = GroupId::new(self.next_group_id);
        self.next_group_id += 1;
        self.groups
            .insert(id, Group::with_config(id, info, &self.config, now));
        self.stats.increment(STAT_GROUPS_FORMED);
        self.settle(id);
        Ok(id)
    }

    /// Invite `invitee` into `inviter`'s group, forming one if needed.
    ///
    /// Returns whether the invitee joined. When a freshly formed group
    /// refuses the invitee, it is abandoned again.
    pub fn invite(
        &mut self,
        inviter: MemberId,
        invitee: MemberId,
        now: Timestamp,
    ) -> Result<bool, GroupError> {
        if inviter == invitee {
            return Err(GroupError::SelfInvite(inviter));
        }
        self.state(invitee)?;
        let group = match self.state(inviter)?.group {
            Some(group) => group,
            None => self.form_group(inviter, now)?,
        };
        self.join(group, invitee)
    }

    /// Add `member` to an existing group. Returns whether the member joined.
    pub fn join(&mut self, group: GroupId, member: MemberId) -> Result<bool, GroupError> {
        let state = self.state(member)?;
        let (info, grouped) = (state.info.clone(), state.is_grouped());

        let target = self
            .groups
            .get_mut(&group)
            .ok_or(GroupError::GroupNotFound(group))?;
        let joined = target.add(&info, grouped);
        if !joined {
            self.stats.increment(STAT_INVITES_REJECTED);
        }
        self.settle(group);
        Ok(joined)
    }

    /// Take `member` out of their group.
    pub fn leave(&mut self, member: MemberId) -> Result<(), GroupError> {
        let group = self
            .state(member)?
            .group
            .ok_or(GroupError::NotGrouped(member))?;

        match self.groups.get_mut(&group) {
            Some(target) => {
                target.remove(member);
                self.settle(group);
            }
            None => {
                warn!(member = %member, group = %group, "member referenced a missing group");
                if let Some(state) = self.members.get_mut(&member) {
                    state.group = None;
                }
            }
        }
        Ok(())
    }

    /// Award experience earned by `source`.
    ///
    /// A grouped source shares through its group's policy; otherwise the
    /// source receives the whole amount.
    pub fn award_experience(
        &mut self,
        source: MemberId,
        amount: Experience,
    ) -> Result<(), GroupError> {
        let group = self
            .state(source)?
            .group
            .filter(|g| self.groups.contains_key(g));
        match group {
            Some(g) => {
                if let Some(target) = self.groups.get_mut(&g) {
                    target.share_experience(source, amount);
                }
                self.settle(g);
            }
            None => {
                self.sink.award_experience(source, amount);
                self.stats.add(STAT_EXPERIENCE_AWARDED, amount.points());
            }
        }
        Ok(())
    }

    /// Relay a group chat line from `speaker` to their whole group.
    pub fn say(&mut self, speaker: MemberId, text: &str) -> Result<(), GroupError> {
        let group = self
            .state(speaker)?
            .group
            .ok_or(GroupError::NotGrouped(speaker))?;
        let target = self
            .groups
            .get_mut(&group)
            .ok_or(GroupError::GroupNotFound(group))?;
        target.say(speaker, text);
        self.settle(group);
        Ok(())
    }

    pub fn member(&self, member: MemberId) -> Option<&MemberState> {
        self.members.get(&member)
    }

    pub fn group(&self, group: GroupId) -> Option<&Group> {
        self.groups.get(&group)
    }

    /// The group `member` currently belongs to.
    pub fn group_of(&self, member: MemberId) -> Option<&Group> {
        self.members
            .get(&member)
            .and_then(|s| s.group)
            .and_then(|g| self.groups.get(&g))
    }

    /// All live groups, ordered by id.
    pub fn groups(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by_key(|g| g.id());
        groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn stats(&self) -> BTreeMap<&'static str, u64> {
        self.stats.snapshot()
    }

    fn state(&self, member: MemberId) -> Result<&MemberState, GroupError> {
        self.members
            .get(&member)
            .ok_or(GroupError::UnknownMember(member))
    }

    /// Apply a group's queued effects and drop it once empty.
    fn settle(&mut self, group: GroupId) {
        let Some(target) = self.groups.get_mut(&group) else {
            return;
        };
        let effects = target.take_effects();
        let empty = target.is_empty();

        for effect in effects {
            self.apply(effect);
        }

        if empty {
            self.groups.remove(&group);
            self.stats.increment(STAT_GROUPS_DISBANDED);
            info!(group = %group, live_groups = self.groups.len(), "group dropped");
        }
    }

    fn apply(&mut self, effect: GroupEffect) {
        match effect {
            GroupEffect::Notify { member, text, kind } => {
                self.sink.notify(member, &text, kind);
            }
            GroupEffect::Joined { member, group } => {
                if let Some(state) = self.members.get_mut(&member) {
                    state.group = Some(group);
                }
                self.stats.increment(STAT_MEMBERS_JOINED);
            }
            GroupEffect::Left { member, group } => {
                if let Some(state) = self.members.get_mut(&member) {
                    if state.group == Some(group) {
                        state.group = None;
                    }
                }
                self.stats.increment(STAT_MEMBERS_LEFT);
            }
            GroupEffect::Award { member, amount } => {
                self.sink.award_experience(member, amount);
                self.stats.add(STAT_EXPERIENCE_AWARDED, amount.points());
            }
        }
    }
}
