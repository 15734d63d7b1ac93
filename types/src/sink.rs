//! The collaborator through which groups reach connected members.

use crate::experience::Experience;
use crate::id::MemberId;
use crate::message::MessageKind;

/// Delivery channel to member sessions.
///
/// Both methods are fire-and-forget: implementations must not block and
/// must swallow delivery failures (a disconnected member simply misses
/// the message).
pub trait MemberSink {
    /// Send a one-way text notification to a member.
    fn notify(&self, member: MemberId, text: &str, kind: MessageKind);

    /// Grant experience to a member.
    fn award_experience(&self, member: MemberId, amount: Experience);
}

impl<T: MemberSink + ?Sized> MemberSink for &T {
    fn notify(&self, member: MemberId, text: &str, kind: MessageKind) {
        (**self).notify(member, text, kind)
    }

    fn award_experience(&self, member: MemberId, amount: Experience) {
        (**self).award_experience(member, amount)
    }
}

impl<T: MemberSink + ?Sized> MemberSink for std::sync::Arc<T> {
    fn notify(&self, member: MemberId, text: &str, kind: MessageKind) {
        (**self).notify(member, text, kind)
    }

    fn award_experience(&self, member: MemberId, amount: Experience) {
        (**self).award_experience(member, amount)
    }
}
