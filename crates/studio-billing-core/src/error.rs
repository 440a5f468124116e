//! Billing errors

use thiserror::Error;

/// Billing errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// Amount is zero, negative, or otherwise unchargeable
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// No price configured for the requested tier
    #[error("no price configured for tier")]
    UnknownTier,

    /// Payment provider error
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Whether this is a caller mistake rather than a provider fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidAmount(_) | Self::UnknownTier)
    }
}
