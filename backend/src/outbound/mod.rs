//! Outbound adapters: storage, identity and queue implementations of the
//! domain ports.

pub mod identity;
pub mod persistence;
pub mod queue;
