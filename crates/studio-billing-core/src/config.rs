//! Billing configuration

use std::collections::HashMap;

use studio_types::MembershipTier;

/// Billing service configuration
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Map of membership tiers to Stripe price IDs
    pub price_ids: HashMap<MembershipTier, String>,
    /// Currency for one-off payments
    pub default_currency: String,
}

impl BillingConfig {
    /// Create a new billing config
    pub fn new(stripe_secret_key: impl Into<String>) -> Self {
        Self {
            stripe_secret_key: stripe_secret_key.into(),
            price_ids: HashMap::new(),
            default_currency: "gbp".to_string(),
        }
    }

    /// Set the price ID for a tier
    pub fn with_price(mut self, tier: MembershipTier, price_id: impl Into<String>) -> Self {
        self.price_ids.insert(tier, price_id.into());
        self
    }

    /// Get the price ID for a tier
    pub fn get_price_id(&self, tier: MembershipTier) -> Option<&str> {
        self.price_ids.get(&tier).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_lookup_by_tier() {
        let config = BillingConfig::new("sk_test_123")
            .with_price(MembershipTier::Bronze, "price_bronze")
            .with_price(MembershipTier::Gold, "price_gold");

        assert_eq!(
            config.get_price_id(MembershipTier::Bronze),
            Some("price_bronze")
        );
        assert_eq!(config.get_price_id(MembershipTier::Silver), None);
    }
}
