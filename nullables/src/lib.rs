//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators are abstracted behind traits in `party-types`.
//! This crate provides test-friendly implementations that record what they
//! were asked to do and never touch the network.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod sink;

pub use sink::{NullSink, SentMessage};
