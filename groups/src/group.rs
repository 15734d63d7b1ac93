//! The group aggregate: membership, class counts and experience sharing.

use crate::config::GroupConfig;
use crate::distribution::DistributionPolicy;
use crate::types::{GroupEffect, GroupSnapshot};
use party_types::{Experience, GroupId, MemberClass, MemberId, MemberInfo, MessageKind, Timestamp};
use std::collections::BTreeMap;
use tracing::{debug, info, info_span};

const MSG_ALREADY_GROUPED: &str = "You're already in a group.";
const MSG_JOINED_SELF: &str = "You've joined a group.";
const MSG_LEFT_SELF: &str = "You've left a group.";

/// A party of members sharing notifications and experience.
///
/// Mutations never reach member sessions directly; they queue
/// [`GroupEffect`]s that the owner drains with [`Group::take_effects`].
#[derive(Debug)]
pub struct Group {
    id: GroupId,
    /// Insertion-ordered, duplicate-free. Index 0 is the anchor member.
    members: Vec<MemberInfo>,
    created_at: Timestamp,
    /// One entry per [`MemberClass`], always in sync with `members`.
    class_counts: BTreeMap<MemberClass, u32>,
    /// High-water mark of `members.len()`.
    max_members: usize,
    policy: DistributionPolicy,
    disband_on_failed_invite: bool,
    effects: Vec<GroupEffect>,
}

impl Group {
    /// Form a group around `founder` with the default configuration.
    pub fn new(id: GroupId, founder: MemberInfo, now: Timestamp) -> Self {
        Self::with_config(id, founder, &GroupConfig::default(), now)
    }

    /// Form a group around `founder`.
    ///
    /// The founder is assumed to be ungrouped; the caller checks that.
    pub fn with_config(
        id: GroupId,
        founder: MemberInfo,
        config: &GroupConfig,
        now: Timestamp,
    ) -> Self {
        let class_counts = MemberClass::ALL.into_iter().map(|c| (c, 0)).collect();
        let policy = config.policy();

        info!(
            group = %id,
            founder = %founder.id,
            name = %founder.name,
            ?policy,
            "creating new group"
        );

        let mut group = Self {
            id,
            members: Vec::new(),
            created_at: now,
            class_counts,
            max_members: 0,
            policy,
            disband_on_failed_invite: config.disband_on_failed_invite,
            effects: Vec::new(),
        };
        group.add(&founder, false);
        group
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Add `member` to the group.
    ///
    /// `grouped` is the candidate's current grouped flag as seen by the
    /// session layer. A grouped candidate (or one already in this group) is
    /// refused: the candidate and every current member are told, and a
    /// group holding a lone member is abandoned. Returns whether the member
    /// joined.
    pub fn add(&mut self, member: &MemberInfo, grouped: bool) -> bool {
        let _span = info_span!("group_add", group = %self.id, member = %member.id).entered();

        if grouped || self.contains(member.id) {
            self.notify(member.id, MSG_ALREADY_GROUPED);
            let text = format!("{} is in another group.", member.name);
            for existing in &self.members {
                self.effects.push(GroupEffect::Notify {
                    member: existing.id,
                    text: text.clone(),
                    kind: MessageKind::System,
                });
            }

            if self.disband_on_failed_invite && self.count() == 1 {
                let anchor = self.members[0].id;
                debug!(anchor = %anchor, "abandoning single-member group after refused add");
                self.remove(anchor);
            }

            debug!("refused: candidate already grouped");
            return false;
        }

        let text = format!("{} has joined your group.", member.name);
        for existing in &self.members {
            self.effects.push(GroupEffect::Notify {
                member: existing.id,
                text: text.clone(),
                kind: MessageKind::System,
            });
        }

        self.members.push(member.clone());
        self.effects.push(GroupEffect::Joined {
            member: member.id,
            group: self.id,
        });
        *self.class_counts.entry(member.class).or_insert(0) += 1;
        self.max_members = self.max_members.max(self.members.len());

        self.notify(member.id, MSG_JOINED_SELF);
        debug!(count = self.members.len(), class = %member.class, "member joined");
        true
    }

    /// Remove `member` from the group.
    ///
    /// Returns `false` (and changes nothing) if the member is not in this
    /// group. If exactly one member remains afterwards, that member is
    /// removed as well and the group ends up empty.
    pub fn remove(&mut self, member: MemberId) -> bool {
        let Some(pos) = self.members.iter().position(|m| m.id == member) else {
            debug!(group = %self.id, member = %member, "remove ignored: not a member");
            return false;
        };

        let mut leaving = self.members.remove(pos);
        loop {
            self.effects.push(GroupEffect::Left {
                member: leaving.id,
                group: self.id,
            });
            if let Some(count) = self.class_counts.get_mut(&leaving.class) {
                *count = count.saturating_sub(1);
            }

            // Only a group that was ever more than one member is visible to players.
            if self.max_members > 1 {
                let text = format!("{} has left your group.", leaving.name);
                for remaining in &self.members {
                    self.effects.push(GroupEffect::Notify {
                        member: remaining.id,
                        text: text.clone(),
                        kind: MessageKind::System,
                    });
                }
                self.notify(leaving.id, MSG_LEFT_SELF);
            }
            debug!(
                group = %self.id,
                member = %leaving.id,
                count = self.members.len(),
                "member left"
            );

            if self.members.len() != 1 {
                break;
            }
            leaving = self.members.remove(0);
        }

        if self.members.is_empty() {
            info!(group = %self.id, max_members = self.max_members, "group disbanded");
        }
        true
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    pub fn contains(&self, member: MemberId) -> bool {
        self.members.iter().any(|m| m.id == member)
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Seconds since the group was formed.
    pub fn age(&self, now: Timestamp) -> u64 {
        self.created_at.elapsed_since(now)
    }

    pub fn max_members(&self) -> usize {
        self.max_members
    }

    pub fn class_count(&self, class: MemberClass) -> u32 {
        self.class_counts.get(&class).copied().unwrap_or(0)
    }

    pub fn policy(&self) -> DistributionPolicy {
        self.policy
    }

    /// Whether every combat class has at least one member present.
    pub fn contains_all_classes(&self) -> bool {
        MemberClass::COMBAT
            .iter()
            .all(|class| self.class_count(*class) > 0)
    }

    /// Award each member their share of `amount` under the group's policy.
    pub fn share_experience(&mut self, source: MemberId, amount: Experience) {
        let shares = self.policy.shares(self, source, amount);
        debug!(
            group = %self.id,
            source = %source,
            %amount,
            members = self.members.len(),
            "sharing experience"
        );

        for member in &self.members {
            if let Some(share) = shares.get(&member.id) {
                self.effects.push(GroupEffect::Award {
                    member: member.id,
                    amount: *share,
                });
            }
        }
    }

    /// Relay a chat line from `speaker` to every member, speaker included.
    ///
    /// Returns `false` if the speaker is not in this group.
    pub fn say(&mut self, speaker: MemberId, text: &str) -> bool {
        let Some(from) = self.members.iter().find(|m| m.id == speaker) else {
            return false;
        };
        let line = format!("{}: {}", from.name, text);
        for member in &self.members {
            self.effects.push(GroupEffect::Notify {
                member: member.id,
                text: line.clone(),
                kind: MessageKind::Group,
            });
        }
        true
    }

    /// Drain the effects queued since the last call, in order.
    pub fn take_effects(&mut self) -> Vec<GroupEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn snapshot(&self, now: Timestamp) -> GroupSnapshot {
        GroupSnapshot {
            id: self.id,
            members: self.members.clone(),
            class_counts: self.class_counts.clone(),
            max_members: self.max_members,
            created_at: self.created_at.as_secs(),
            age_secs: self.age(now),
            all_classes: self.contains_all_classes(),
        }
    }

    fn notify(&mut self, member: MemberId, text: &str) {
        self.effects.push(GroupEffect::Notify {
            member,
            text: text.to_string(),
            kind: MessageKind::System,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DistributionKind;

    fn member(id: u32, name: &str, class: MemberClass) -> MemberInfo {
        MemberInfo::new(id, name, class).unwrap()
    }

    fn texts_for(effects: &[GroupEffect], id: u32) -> Vec<String> {
        effects
            .iter()
            .filter_map(|e| match e {
                GroupEffect::Notify { member, text, .. } if member.raw() == id => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn solo(id: u32, name: &str, class: MemberClass) -> Group {
        Group::new(GroupId::new(1), member(id, name, class), Timestamp::EPOCH)
    }

    fn full_party() -> Group {
        let founder = member(1, "Warrior", MemberClass::Warrior);
        let mut group = Group::new(GroupId::new(1), founder, Timestamp::new(100));
        for (id, name, class) in [
            (2, "Rogue", MemberClass::Rogue),
            (3, "Wizard", MemberClass::Wizard),
            (4, "Priest", MemberClass::Priest),
            (5, "Monk", MemberClass::Monk),
        ] {
            assert!(group.add(&member(id, name, class), false));
        }
        group.take_effects();
        group
    }

    #[test]
    fn new_group_holds_founder() {
        let founder = member(1, "Aisling", MemberClass::Warrior);
        let mut group = Group::new(GroupId::new(9), founder.clone(), Timestamp::new(50));

        assert_eq!(group.count(), 1);
        assert_eq!(group.members(), &[founder]);
        assert_eq!(group.created_at(), Timestamp::new(50));
        assert_eq!(group.max_members(), 1);
        for class in MemberClass::ALL {
            let expected = if class == MemberClass::Warrior { 1 } else { 0 };
            assert_eq!(group.class_count(class), expected, "{class}");
        }

        let effects = group.take_effects();
        assert_eq!(
            effects,
            vec![
                GroupEffect::Joined {
                    member: MemberId::new(1),
                    group: GroupId::new(9)
                },
                GroupEffect::Notify {
                    member: MemberId::new(1),
                    text: "You've joined a group.".into(),
                    kind: MessageKind::System
                },
            ]
        );
    }

    #[test]
    fn add_notifies_existing_members_before_confirming() {
        let mut group = solo(1, "A", MemberClass::Warrior);
        group.take_effects();

        assert!(group.add(&member(2, "B", MemberClass::Rogue), false));
        assert_eq!(group.count(), 2);
        assert_eq!(group.class_count(MemberClass::Rogue), 1);
        assert_eq!(group.max_members(), 2);

        let effects = group.take_effects();
        assert_eq!(texts_for(&effects, 1), vec!["B has joined your group."]);
        assert_eq!(texts_for(&effects, 2), vec!["You've joined a group."]);
        assert!(matches!(
            effects.first(),
            Some(GroupEffect::Notify { member, .. }) if member.raw() == 1
        ));
        assert!(matches!(
            effects.last(),
            Some(GroupEffect::Notify { member, .. }) if member.raw() == 2
        ));
    }

    #[test]
    fn refused_add_tells_candidate_and_members() {
        let mut group = solo(1, "A", MemberClass::Warrior);
        group.add(&member(2, "B", MemberClass::Rogue), false);
        group.take_effects();

        assert!(!group.add(&member(3, "A2", MemberClass::Monk), true));
        assert_eq!(group.count(), 2);
        assert_eq!(group.class_count(MemberClass::Monk), 0);

        let effects = group.take_effects();
        assert_eq!(texts_for(&effects, 3), vec!["You're already in a group."]);
        assert_eq!(texts_for(&effects, 1), vec!["A2 is in another group."]);
        assert_eq!(texts_for(&effects, 2), vec!["A2 is in another group."]);
    }

    #[test]
    fn refused_add_abandons_lone_founder_silently() {
        let mut group = solo(1, "A", MemberClass::Warrior);
        group.take_effects();

        assert!(!group.add(&member(2, "B", MemberClass::Rogue), true));
        assert_eq!(group.count(), 0);
        assert_eq!(group.class_count(MemberClass::Warrior), 0);

        let effects = group.take_effects();
        assert!(effects.contains(&GroupEffect::Left {
            member: MemberId::new(1),
            group: GroupId::new(1)
        }));
        // Never a real group, so no "left" chatter.
        assert!(!texts_for(&effects, 1).iter().any(|t| t.contains("left")));
    }

    #[test]
    fn refused_add_keeps_lone_founder_when_disabled() {
        let config = GroupConfig {
            disband_on_failed_invite: false,
            ..GroupConfig::default()
        };
        let founder = member(1, "A", MemberClass::Warrior);
        let mut group = Group::with_config(GroupId::new(1), founder, &config, Timestamp::EPOCH);

        assert!(!group.add(&member(2, "B", MemberClass::Rogue), true));
        assert_eq!(group.count(), 1);
    }

    #[test]
    fn adding_present_member_is_refused() {
        let mut group = full_party();
        assert!(!group.add(&member(3, "Wizard", MemberClass::Wizard), false));
        assert_eq!(group.count(), 5);
        assert_eq!(group.class_count(MemberClass::Wizard), 1);
    }

    #[test]
    fn remove_from_pair_disbands() {
        let mut group = solo(1, "A", MemberClass::Warrior);
        group.add(&member(2, "B", MemberClass::Rogue), false);
        group.take_effects();

        assert!(group.remove(MemberId::new(2)));
        assert!(group.is_empty());
        assert!(MemberClass::ALL.iter().all(|c| group.class_count(*c) == 0));

        let effects = group.take_effects();
        assert_eq!(
            texts_for(&effects, 1),
            vec!["B has left your group.", "You've left a group."]
        );
        assert_eq!(texts_for(&effects, 2), vec!["You've left a group."]);
        let left: Vec<u32> = effects
            .iter()
            .filter_map(|e| match e {
                GroupEffect::Left { member, .. } => Some(member.raw()),
                _ => None,
            })
            .collect();
        assert_eq!(left, vec![2, 1]);
    }

    #[test]
    fn remove_from_larger_group_keeps_rest() {
        let mut group = full_party();
        assert!(group.remove(MemberId::new(3)));
        assert_eq!(group.count(), 4);
        assert_eq!(group.class_count(MemberClass::Wizard), 0);
        assert!(!group.contains_all_classes());

        let effects = group.take_effects();
        for id in [1, 2, 4, 5] {
            assert_eq!(texts_for(&effects, id), vec!["Wizard has left your group."]);
        }
    }

    #[test]
    fn remove_of_stranger_is_noop() {
        let mut group = full_party();
        assert!(!group.remove(MemberId::new(42)));
        assert_eq!(group.count(), 5);
        assert!(group.take_effects().is_empty());
        assert!(MemberClass::COMBAT.iter().all(|c| group.class_count(*c) == 1));
    }

    #[test]
    fn all_classes_requires_each_combat_role() {
        let mut group = full_party();
        assert!(group.contains_all_classes());

        group.add(&member(6, "Peasant", MemberClass::Peasant), false);
        group.remove(MemberId::new(4));
        assert!(!group.contains_all_classes());
    }

    #[test]
    fn peasants_do_not_complete_the_set() {
        let mut group = solo(1, "P", MemberClass::Peasant);
        for (id, class) in [
            (2, MemberClass::Rogue),
            (3, MemberClass::Wizard),
            (4, MemberClass::Priest),
            (5, MemberClass::Monk),
        ] {
            group.add(&member(id, "x", class), false);
        }
        assert!(!group.contains_all_classes());
    }

    #[test]
    fn full_party_gets_bonus_share() {
        let mut group = full_party();
        group.share_experience(MemberId::new(1), Experience::new(100));

        let awards: Vec<_> = group
            .take_effects()
            .into_iter()
            .filter_map(|e| match e {
                GroupEffect::Award { member, amount } => Some((member.raw(), amount.points())),
                _ => None,
            })
            .collect();
        assert_eq!(awards, vec![(1, 110), (2, 110), (3, 110), (4, 110), (5, 110)]);
    }

    #[test]
    fn incomplete_party_gets_flat_share() {
        let mut group = solo(1, "A", MemberClass::Warrior);
        group.add(&member(2, "B", MemberClass::Rogue), false);
        group.take_effects();

        group.share_experience(MemberId::new(2), Experience::new(1000));
        let effects = group.take_effects();
        assert_eq!(effects.len(), 2);
        assert!(effects
            .iter()
            .all(|e| matches!(e, GroupEffect::Award { amount, .. } if amount.points() == 1000)));
    }

    #[test]
    fn full_share_policy_ignores_composition() {
        let config = GroupConfig {
            distribution: DistributionKind::FullShare,
            ..GroupConfig::default()
        };
        let founder = member(1, "W", MemberClass::Warrior);
        let mut group = Group::with_config(GroupId::new(1), founder, &config, Timestamp::EPOCH);
        for (id, class) in [
            (2, MemberClass::Rogue),
            (3, MemberClass::Wizard),
            (4, MemberClass::Priest),
            (5, MemberClass::Monk),
        ] {
            group.add(&member(id, "x", class), false);
        }
        group.take_effects();
        assert!(group.contains_all_classes());

        group.share_experience(MemberId::new(1), Experience::new(1000));
        assert!(group
            .take_effects()
            .iter()
            .all(|e| matches!(e, GroupEffect::Award { amount, .. } if amount.points() == 1000)));
    }

    #[test]
    fn snapshot_reports_age_and_composition() {
        let group = full_party();
        let snapshot = group.snapshot(Timestamp::new(160));
        assert_eq!(snapshot.age_secs, 60);
        assert_eq!(snapshot.members.len(), 5);
        assert!(snapshot.all_classes);
        assert_eq!(snapshot.class_counts[&MemberClass::Peasant], 0);
    }

    #[test]
    fn say_relays_to_every_member_as_group_chat() {
        let mut group = full_party();
        assert!(group.say(MemberId::new(4), "heal incoming"));

        let effects = group.take_effects();
        assert_eq!(effects.len(), 5);
        for id in 1..=5 {
            assert_eq!(texts_for(&effects, id), vec!["Priest: heal incoming"]);
        }
        assert!(effects
            .iter()
            .all(|e| matches!(e, GroupEffect::Notify { kind: MessageKind::Group, .. })));
    }

    #[test]
    fn say_from_outsider_is_refused() {
        let mut group = full_party();
        assert!(!group.say(MemberId::new(42), "hello?"));
        assert!(group.take_effects().is_empty());
    }
}
