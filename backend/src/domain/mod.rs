//! Domain core: entities, ports and the services that orchestrate them.
//!
//! Everything here is transport-agnostic. HTTP and persistence concerns live
//! in `inbound` and `outbound`; they meet the domain only through the traits
//! in [`ports`].

pub mod accounts;
pub mod basket;
pub mod catalog;
pub mod contact;
pub mod error;
pub mod import;
pub mod notification;
pub mod ports;
pub mod pricelist;
pub mod user;

pub use self::accounts::AccountService;
pub use self::basket::BasketService;
pub use self::error::{Error, ErrorCode};
pub use self::import::ImportService;

/// Convenient result alias for operations that surface API errors.
pub type ApiResult<T> = Result<T, Error>;
