//! Notification errors

use thiserror::Error;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Provider rejected or failed the send
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Message failed local validation before any send
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}
