//! Channel-backed member sink.

use party_types::{Experience, MemberId, MemberSink, MessageKind};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Something delivered to a member session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MemberEvent {
    Message {
        member: MemberId,
        text: String,
        kind: MessageKind,
    },
    Experience {
        member: MemberId,
        amount: Experience,
    },
}

impl MemberEvent {
    pub fn member(&self) -> MemberId {
        match self {
            Self::Message { member, .. } | Self::Experience { member, .. } => *member,
        }
    }
}

/// A [`MemberSink`] that forwards every delivery onto an unbounded channel.
///
/// Sending never blocks. Once the receiver is dropped, deliveries are
/// discarded.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<MemberEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MemberEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn deliver(&self, event: MemberEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("member event dropped: receiver closed");
        }
    }
}

impl MemberSink for ChannelSink {
    fn notify(&self, member: MemberId, text: &str, kind: MessageKind) {
        self.deliver(MemberEvent::Message {
            member,
            text: text.to_string(),
            kind,
        });
    }

    fn award_experience(&self, member: MemberId, amount: Experience) {
        self.deliver(MemberEvent::Experience { member, amount });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.notify(MemberId::new(1), "hello", MessageKind::System);
        sink.award_experience(MemberId::new(2), Experience::new(30));

        assert_eq!(
            rx.try_recv().unwrap(),
            MemberEvent::Message {
                member: MemberId::new(1),
                text: "hello".into(),
                kind: MessageKind::System,
            }
        );
        let award = rx.try_recv().unwrap();
        assert_eq!(award.member(), MemberId::new(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.notify(MemberId::new(1), "nobody listening", MessageKind::System);
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = MemberEvent::Experience {
            member: MemberId::new(4),
            amount: Experience::new(110),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "experience");
        assert_eq!(json["member"], 4);
    }
}
