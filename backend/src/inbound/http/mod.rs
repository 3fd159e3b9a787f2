//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod basket;
pub mod catalog;
pub mod error;
pub mod health;
pub mod orders;
pub mod partner;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::envelope;
pub use state::HttpState;
