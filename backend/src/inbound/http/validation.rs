//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies with mandatory fields are deserialised with every field
//! optional, then checked here so the client gets one "missing arguments"
//! failure naming all absent fields at once instead of a serde parse error
//! naming only the first.

use serde_json::json;

use crate::domain::Error;

/// Collects missing mandatory fields while draining an all-optional DTO.
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Take a mandatory field, recording its name when absent.
    pub(crate) fn take<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(field);
        }
        value
    }

    /// Fail with the fixed "missing arguments" envelope when any mandatory
    /// field was absent.
    pub(crate) fn check(self) -> Result<(), Error> {
        if self.missing.is_empty() {
            return Ok(());
        }
        Err(Error::invalid_request("missing arguments")
            .with_details(json!({ "missing": self.missing })))
    }
}
