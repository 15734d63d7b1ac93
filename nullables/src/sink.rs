//! Nullable member sink — record deliveries instead of sending them.

use party_types::{Experience, MemberId, MemberSink, MessageKind};
use std::sync::Mutex;

/// A notification recorded by [`NullSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub member: MemberId,
    pub text: String,
    pub kind: MessageKind,
}

/// A member sink that records notifications and awards for assertions.
///
/// Thread-safe so it can back a registry shared across threads.
pub struct NullSink {
    messages: Mutex<Vec<SentMessage>>,
    awards: Mutex<Vec<(MemberId, Experience)>>,
}

impl NullSink {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            awards: Mutex::new(Vec::new()),
        }
    }

    /// Every notification "sent", in order.
    pub fn messages(&self) -> Vec<SentMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Texts sent to one member, in order.
    pub fn messages_for(&self, member: MemberId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.member == member)
            .map(|m| m.text.clone())
            .collect()
    }

    /// Every award granted, in order.
    pub fn awards(&self) -> Vec<(MemberId, Experience)> {
        self.awards.lock().unwrap().clone()
    }

    /// Sum of all awards granted to one member.
    pub fn total_awarded(&self, member: MemberId) -> Experience {
        self.awards
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| *m == member)
            .fold(Experience::ZERO, |acc, (_, amount)| acc.saturating_add(*amount))
    }

    /// Clear all recorded state.
    pub fn reset(&self) {
        self.messages.lock().unwrap().clear();
        self.awards.lock().unwrap().clear();
    }
}

impl Default for NullSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberSink for NullSink {
    fn notify(&self, member: MemberId, text: &str, kind: MessageKind) {
        self.messages.lock().unwrap().push(SentMessage {
            member,
            text: text.to_string(),
            kind,
        });
    }

    fn award_experience(&self, member: MemberId, amount: Experience) {
        self.awards.lock().unwrap().push((member, amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_resets() {
        let sink = NullSink::new();
        sink.notify(MemberId::new(1), "one", MessageKind::System);
        sink.notify(MemberId::new(2), "two", MessageKind::Group);
        sink.award_experience(MemberId::new(1), Experience::new(5));
        sink.award_experience(MemberId::new(1), Experience::new(7));

        assert_eq!(sink.messages().len(), 2);
        assert_eq!(sink.messages_for(MemberId::new(2)), vec!["two"]);
        assert_eq!(sink.total_awarded(MemberId::new(1)), Experience::new(12));

        sink.reset();
        assert!(sink.messages().is_empty());
        assert!(sink.awards().is_empty());
    }
}
