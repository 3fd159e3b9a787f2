//! Inbound adapters: ways the outside world drives the domain.

pub mod http;
