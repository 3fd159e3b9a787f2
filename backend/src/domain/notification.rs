//! Events handed to the notification queue for out-of-process delivery.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification event.
///
/// The service only enqueues these; a separate worker renders and sends the
/// actual emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A new account needs its email address confirmed.
    RegistrationConfirmation { email: String, token: Uuid },
    /// A password reset was requested for an existing account.
    PasswordReset { email: String, token: Uuid },
    /// A basket was turned into a placed order.
    OrderPlaced { email: String, order_id: i64 },
}

impl Notification {
    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RegistrationConfirmation { .. } => "registration_confirmation",
            Self::PasswordReset { .. } => "password_reset",
            Self::OrderPlaced { .. } => "order_placed",
        }
    }

    /// Recipient address for this event.
    pub fn recipient(&self) -> &str {
        match self {
            Self::RegistrationConfirmation { email, .. }
            | Self::PasswordReset { email, .. }
            | Self::OrderPlaced { email, .. } => email,
        }
    }
}
