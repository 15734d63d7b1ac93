//! Party groups — membership bookkeeping and experience sharing.
//!
//! A [`Group`] is a small aggregate: an ordered member list, per-class
//! counts, a high-water mark and a distribution policy. It never touches
//! member sessions directly. Every side effect (notifications, group
//! back-references, experience awards) is queued as a [`GroupEffect`] and
//! applied by the owning [`PartyRegistry`], which is the sole writer of
//! member state.
//!
//! Design:
//! - A group of one is not a steady state: removing down to one member
//!   removes the last member too, and the registry drops the empty group.
//! - Reward distribution is a [`DistributionPolicy`] fixed at construction.
//! - [`SharedRegistry`] serializes all mutations behind one lock so
//!   concurrent sessions cannot interleave add/remove/share.

pub mod config;
pub mod distribution;
pub mod error;
pub mod group;
pub mod registry;
pub mod shared;
pub mod sink;
pub mod types;

pub use config::{DistributionKind, GroupConfig};
pub use distribution::DistributionPolicy;
pub use error::GroupError;
pub use group::Group;
pub use registry::PartyRegistry;
pub use shared::SharedRegistry;
pub use sink::{ChannelSink, MemberEvent};
pub use types::{GroupEffect, GroupSnapshot, MemberState};
