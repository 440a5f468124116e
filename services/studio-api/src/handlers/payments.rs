//! Stripe payment handlers

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use studio_billing_core::PaymentProvider;
use studio_types::MembershipTier;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub email: String,
    pub tier: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscription_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelSubscriptionRequest {
    pub subscription_id: String,
}

#[derive(Debug, Serialize)]
pub struct CancelSubscriptionResponse {
    pub success: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /stripe/create-payment-intent
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentIntentRequest>,
) -> ApiResult<Json<PaymentIntentResponse>> {
    let start = Instant::now();

    validate_amount(req.amount)?;

    let currency = req
        .currency
        .unwrap_or_else(|| state.config.billing.default_currency.clone());

    let intent = state
        .payments
        .create_payment_intent(req.amount, &currency)
        .await?;

    metrics::counter!("studio_payment_intents_created_total").increment(1);
    metrics::histogram!("studio_operation_duration_seconds", "operation" => "create_payment_intent")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(PaymentIntentResponse {
        payment_intent_id: intent.payment_intent_id,
        client_secret: intent.client_secret,
    }))
}

/// POST /stripe/create-subscription
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> ApiResult<Json<SubscriptionResponse>> {
    validate_email(&req.email)?;

    let tier: MembershipTier = req
        .tier
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid tier: {}", req.tier)))?;

    let subscription = state.payments.create_subscription(&req.email, tier).await?;

    tracing::info!(tier = %tier, "Subscription created");

    Ok(Json(SubscriptionResponse {
        subscription_id: subscription.subscription_id,
        status: subscription.status,
    }))
}

/// POST /stripe/cancel-subscription
pub async fn cancel_subscription(
    State(state): State<AppState>,
    Json(req): Json<CancelSubscriptionRequest>,
) -> ApiResult<Json<CancelSubscriptionResponse>> {
    if req.subscription_id.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing subscription_id".to_string()));
    }

    state
        .payments
        .cancel_subscription(&req.subscription_id)
        .await?;

    metrics::counter!("studio_subscriptions_cancelled_total").increment(1);

    Ok(Json(CancelSubscriptionResponse { success: true }))
}

// ============================================================================
// Validation
// ============================================================================

/// Amounts are minor currency units; Stripe rejects zero and negatives, we
/// reject them before the round trip.
fn validate_amount(amount: i64) -> Result<(), ApiError> {
    if amount <= 0 {
        return Err(ApiError::BadRequest(
            "amount must be a positive number of minor units".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amounts_accepted() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(1500).is_ok());
        assert!(validate_amount(i64::MAX).is_ok());
    }

    #[test]
    fn zero_and_negative_amounts_rejected() {
        for amount in [0, -1, -1500, i64::MIN] {
            let err = validate_amount(amount).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "amount {amount}");
        }
    }

    #[test]
    fn plausible_email_accepted() {
        assert!(validate_email("jo@example.com").is_ok());
    }

    #[test]
    fn blank_or_malformed_email_rejected() {
        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("jo.example.com").is_err());
    }
}
