//! Scripted party sessions: parse a TOML script and replay it against a registry.

use anyhow::Context;
use party_groups::{
    ChannelSink, GroupConfig, GroupError, GroupSnapshot, MemberEvent, PartyRegistry,
    SharedRegistry,
};
use party_types::{Experience, GroupId, MemberClass, MemberId, MemberInfo, Timestamp};
use party_utils::format_duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, info_span, warn};

/// A member declared by a script.
#[derive(Clone, Debug, Deserialize)]
pub struct ScriptMember {
    pub id: u32,
    pub name: String,
    pub class: MemberClass,
}

/// One step of a scripted session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Invite { inviter: u32, invitee: u32 },
    Join { group: u64, member: u32 },
    Leave { member: u32 },
    Share { source: u32, amount: u64 },
    Say { member: u32, text: String },
    Disconnect { member: u32 },
    Wait { secs: u64 },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Invite { .. } => "invite",
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Share { .. } => "share",
            Self::Say { .. } => "say",
            Self::Disconnect { .. } => "disconnect",
            Self::Wait { .. } => "wait",
        }
    }
}

/// A scripted session: the roster plus the steps to replay.
#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    /// Clock start in Unix seconds; the current time when absent.
    #[serde(default)]
    pub start: Option<u64>,
    pub members: Vec<ScriptMember>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid session script")
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

/// Outcome of a replayed session.
#[derive(Debug, Serialize)]
pub struct Report {
    pub names: BTreeMap<MemberId, String>,
    pub events: Vec<MemberEvent>,
    pub groups: Vec<GroupSnapshot>,
    pub stats: BTreeMap<&'static str, u64>,
    pub failed_steps: usize,
    pub finished_at: Timestamp,
}

impl Report {
    fn name(&self, member: MemberId) -> &str {
        self.names.get(&member).map(String::as_str).unwrap_or("?")
    }

    /// Plain-text rendering: deliveries, live groups, then counters.
    pub fn render_human(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            let member = event.member();
            let _ = match event {
                MemberEvent::Message { text, kind, .. } => writeln!(
                    out,
                    "{member} ({}) <- {}: {text}",
                    self.name(member),
                    kind.as_str()
                ),
                MemberEvent::Experience { amount, .. } => {
                    writeln!(out, "{member} ({}) <- +{amount}", self.name(member))
                }
            };
        }

        for group in &self.groups {
            let roster: Vec<String> = group
                .members
                .iter()
                .map(|m| format!("{} ({})", m.name, m.class))
                .collect();
            let _ = writeln!(
                out,
                "{}: {} members [{}], formed {} ago, all classes: {}",
                group.id,
                group.members.len(),
                roster.join(", "),
                format_duration(group.age_secs),
                if group.all_classes { "yes" } else { "no" }
            );
        }

        let counters: Vec<String> = self
            .stats
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let _ = writeln!(out, "stats: {}", counters.join(" "));
        if self.failed_steps > 0 {
            let _ = writeln!(out, "failed steps: {}", self.failed_steps);
        }
        out
    }
}

/// Replay `script` against a fresh registry.
///
/// Deliveries are drained by a separate task over the sink's channel, the
/// way a session layer would consume them. A step that fails is logged and
/// skipped.
pub async fn simulate(script: Script, config: &GroupConfig) -> anyhow::Result<Report> {
    let (sink, mut rx) = ChannelSink::new();
    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });

    let registry = SharedRegistry::new(PartyRegistry::new(sink, config.clone()));
    let mut names = BTreeMap::new();
    for member in &script.members {
        let info = MemberInfo::new(member.id, member.name.clone(), member.class)?;
        names.insert(info.id, info.name.clone());
        registry
            .register_member(info)
            .with_context(|| format!("failed to register member {}", member.id))?;
    }

    let mut now = Timestamp::new(script.start.unwrap_or_else(|| Timestamp::now().as_secs()));
    let mut failed_steps = 0;
    for (index, step) in script.steps.iter().enumerate() {
        let _span = info_span!("step", index, action = step.name()).entered();
        if let Err(e) = apply_step(&registry, step, &mut now) {
            warn!(error = %e, "step failed");
            failed_steps += 1;
        }
    }

    let groups = registry.snapshots(now)?;
    let stats = registry.with(|r| r.stats())?;
    drop(registry);
    let events = collector.await.context("event collector failed")?;

    info!(
        steps = script.steps.len(),
        failed_steps,
        live_groups = groups.len(),
        "session replayed"
    );

    Ok(Report {
        names,
        events,
        groups,
        stats,
        failed_steps,
        finished_at: now,
    })
}

fn apply_step(
    registry: &SharedRegistry<ChannelSink>,
    step: &Step,
    now: &mut Timestamp,
) -> Result<(), GroupError> {
    match *step {
        Step::Invite { inviter, invitee } => {
            let joined = registry.invite(MemberId::new(inviter), MemberId::new(invitee), *now)?;
            info!(inviter, invitee, joined, "invite");
        }
        Step::Join { group, member } => {
            let joined = registry.join(GroupId::new(group), MemberId::new(member))?;
            info!(group, member, joined, "join");
        }
        Step::Leave { member } => registry.leave(MemberId::new(member))?,
        Step::Share { source, amount } => {
            registry.award_experience(MemberId::new(source), Experience::new(amount))?
        }
        Step::Say { member, ref text } => registry.say(MemberId::new(member), text)?,
        Step::Disconnect { member } => registry.unregister_member(MemberId::new(member))?,
        Step::Wait { secs } => *now = Timestamp::new(now.as_secs().saturating_add(secs)),
    }
    Ok(())
}
