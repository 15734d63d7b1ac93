//! Fundamental types for party management.
//!
//! This crate defines the types shared across the workspace: member and
//! group identifiers, the class taxonomy, experience amounts, timestamps,
//! message kinds, and the [`MemberSink`] collaborator trait through which
//! groups reach connected players.

pub mod class;
pub mod error;
pub mod experience;
pub mod id;
pub mod member;
pub mod message;
pub mod sink;
pub mod time;

pub use class::MemberClass;
pub use error::TypesError;
pub use experience::Experience;
pub use id::{GroupId, MemberId};
pub use member::MemberInfo;
pub use message::MessageKind;
pub use sink::MemberSink;
pub use time::Timestamp;
