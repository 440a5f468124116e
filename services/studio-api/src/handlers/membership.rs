//! Membership handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use studio_booking_core::TierChange;
use studio_types::MembershipTier;

use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChangeTierRequest {
    pub tier: String,
}

#[derive(Debug, Deserialize)]
pub struct EnrolRequest {
    pub tier: String,
}

#[derive(Debug, Serialize)]
pub struct EnrolResponse {
    pub success: bool,
    pub tier: String,
}

#[derive(Debug, Serialize)]
pub struct ChangeTierResponse {
    pub success: bool,
    pub tier: String,
    /// `immediate` for upgrades, `scheduled` for deferred downgrades
    pub applied: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AllowanceResponse {
    /// Classes left this cycle; absent for uncapped tiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
    pub unlimited: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/membership/enrol
///
/// No-op for users who already hold a membership; their existing tier wins.
pub async fn enrol(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<EnrolRequest>,
) -> ApiResult<Json<EnrolResponse>> {
    let tier: MembershipTier = req
        .tier
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid tier: {}", req.tier)))?;

    state.memberships.enrol(user.user_id, tier).await?;

    tracing::info!(user_id = %user.user_id, tier = %tier, "Membership enrolment");

    Ok(Json(EnrolResponse {
        success: true,
        tier: tier.to_string(),
    }))
}

/// POST /api/v1/membership/change
pub async fn change_tier(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ChangeTierRequest>,
) -> ApiResult<Json<ChangeTierResponse>> {
    let tier: MembershipTier = req
        .tier
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid tier: {}", req.tier)))?;

    let change = state.memberships.change_tier(user.user_id, tier).await?;

    tracing::info!(user_id = %user.user_id, tier = %tier, "Membership tier change requested");

    let (applied, effective_date) = match change {
        TierChange::Immediate => ("immediate", None),
        TierChange::Scheduled(at) => ("scheduled", Some(at.to_rfc3339())),
    };

    Ok(Json(ChangeTierResponse {
        success: true,
        tier: tier.to_string(),
        applied,
        effective_date,
    }))
}

/// GET /api/v1/membership/allowance
pub async fn remaining_allowance(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<AllowanceResponse>> {
    let remaining = state.memberships.remaining_allowance(user.user_id).await?;

    Ok(Json(AllowanceResponse {
        unlimited: remaining.is_none(),
        remaining,
    }))
}
