//! Stripe payment provider implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use studio_types::MembershipTier;

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::provider::{PaymentIntent, PaymentProvider, Subscription};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Stripe payment provider
#[derive(Clone)]
pub struct StripeProvider {
    client: Client,
    config: BillingConfig,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: BillingConfig) -> Self {
        let client = Client::new();
        Self { client, config }
    }

    /// Make an authenticated form-encoded request to Stripe
    async fn stripe_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<T, BillingError> {
        let url = format!("{STRIPE_API_BASE}{endpoint}");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.config.stripe_secret_key, Option::<&str>::None);

        if let Some(form_data) = form {
            request = request.form(form_data);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Stripe API request failed");
            BillingError::ProviderError(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Stripe API error");
            return Err(BillingError::ProviderError(format!(
                "Stripe API error: {status}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Stripe response");
            BillingError::Internal(e.to_string())
        })
    }

    /// Find a customer by email, or create one
    #[instrument(skip(self))]
    async fn find_or_create_customer(&self, email: &str) -> Result<StripeCustomer, BillingError> {
        debug!(email = %email, "Looking up Stripe customer");

        let form = [("email", email), ("limit", "1")];
        let existing: StripeList<StripeCustomer> = self
            .stripe_request(reqwest::Method::GET, "/customers", Some(&form))
            .await?;

        if let Some(customer) = existing.data.into_iter().next() {
            return Ok(customer);
        }

        debug!(email = %email, "Creating Stripe customer");
        let form = [("email", email)];
        self.stripe_request(reqwest::Method::POST, "/customers", Some(&form))
            .await
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
    ) -> Result<PaymentIntent, BillingError> {
        if amount_cents <= 0 {
            return Err(BillingError::InvalidAmount(amount_cents));
        }

        debug!(amount_cents = %amount_cents, currency = %currency, "Creating payment intent");

        let amount_str = amount_cents.to_string();
        let form = [
            ("amount", amount_str.as_str()),
            ("currency", currency),
            ("automatic_payment_methods[enabled]", "true"),
        ];

        let intent: StripePaymentIntent = self
            .stripe_request(reqwest::Method::POST, "/payment_intents", Some(&form))
            .await?;

        Ok(PaymentIntent {
            payment_intent_id: intent.id,
            client_secret: intent.client_secret.unwrap_or_default(),
            amount_cents: intent.amount,
            currency: intent.currency,
        })
    }

    #[instrument(skip(self))]
    async fn create_subscription(
        &self,
        customer_email: &str,
        tier: MembershipTier,
    ) -> Result<Subscription, BillingError> {
        let price_id = self
            .config
            .get_price_id(tier)
            .ok_or(BillingError::UnknownTier)?
            .to_string();

        let customer = self.find_or_create_customer(customer_email).await?;

        debug!(customer_id = %customer.id, tier = %tier, "Creating subscription");

        let form = [
            ("customer", customer.id.as_str()),
            ("items[0][price]", price_id.as_str()),
            ("payment_behavior", "default_incomplete"),
        ];

        let subscription: StripeSubscription = self
            .stripe_request(reqwest::Method::POST, "/subscriptions", Some(&form))
            .await?;

        Ok(Subscription {
            subscription_id: subscription.id,
            customer_id: subscription.customer,
            status: subscription.status,
        })
    }

    #[instrument(skip(self))]
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), BillingError> {
        debug!(subscription_id = %subscription_id, "Cancelling subscription");

        let _: StripeSubscription = self
            .stripe_request(
                reqwest::Method::DELETE,
                &format!("/subscriptions/{subscription_id}"),
                None,
            )
            .await?;

        Ok(())
    }
}

// Stripe API response types

/// Stripe customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCustomer {
    /// Customer ID
    pub id: String,
    /// Customer email
    pub email: Option<String>,
}

/// Stripe payment intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripePaymentIntent {
    /// Intent ID
    pub id: String,
    /// Client secret for client-side confirmation
    pub client_secret: Option<String>,
    /// Amount in minor units
    pub amount: i64,
    /// Currency code
    pub currency: String,
    /// Intent status
    pub status: String,
}

/// Stripe subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeSubscription {
    /// Subscription ID
    pub id: String,
    /// Customer ID
    pub customer: String,
    /// Subscription status
    pub status: String,
    /// Whether the subscription cancels at period end
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

/// Stripe list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeList<T> {
    /// List data
    pub data: Vec<T>,
    /// Whether there are more items
    #[serde(default)]
    pub has_more: bool,
}
