//! Payment provider abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use studio_types::MembershipTier;

use crate::BillingError;

/// A created payment intent, ready for client-side confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub amount_cents: i64,
    pub currency: String,
}

/// A recurring membership subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: String,
    pub customer_id: String,
    pub status: String,
}

/// Payment provider trait
///
/// Abstracts payment processing so handlers and tests do not depend on
/// Stripe directly.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a one-off payment intent
    ///
    /// `amount_cents` must be positive.
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, BillingError>;

    /// Start a recurring subscription for a membership tier
    async fn create_subscription(
        &self,
        customer_email: &str,
        tier: MembershipTier,
    ) -> Result<Subscription, BillingError>;

    /// Cancel a subscription
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), BillingError>;
}
