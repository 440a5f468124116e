//! Hall-hire handlers

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studio_booking_core::HallHireRequest;
use studio_types::{HallBookingId, HallPackage};

use crate::error::{ApiError, ApiResult};
use crate::extractors::AdminUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HallBookRequest {
    pub package_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_date: NaiveDate,
    /// `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    pub end_time: String,
    pub expected_attendees: i32,
    pub event_type: String,
    pub special_requirements: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HallBookResponse {
    pub success: bool,
    pub booking_id: String,
    pub total_price_cents: i64,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    pub packages: &'static [HallPackage],
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /hall-hire/packages
pub async fn list_packages(State(state): State<AppState>) -> Json<PackagesResponse> {
    Json(PackagesResponse {
        packages: state.hall.packages(),
    })
}

/// POST /hall-hire/book
///
/// Public endpoint; the enquiry form carries the customer's contact details
/// instead of a gateway identity.
pub async fn book_hall(
    State(state): State<AppState>,
    Json(req): Json<HallBookRequest>,
) -> ApiResult<Json<HallBookResponse>> {
    let start = Instant::now();

    validate_hall_request(&req)?;

    let start_time = parse_time("start_time", &req.start_time)?;
    let end_time = parse_time("end_time", &req.end_time)?;

    let booking = state
        .hall
        .submit(HallHireRequest {
            package_id: req.package_id,
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
            event_date: req.event_date,
            start_time,
            end_time,
            expected_attendees: req.expected_attendees,
            event_type: req.event_type,
            special_requirements: req.special_requirements,
        })
        .await?;

    metrics::histogram!("studio_operation_duration_seconds", "operation" => "book_hall")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(HallBookResponse {
        success: true,
        booking_id: booking.id.to_string(),
        total_price_cents: booking.total_price_cents,
        status: booking.status.to_string(),
    }))
}

/// POST /hall-hire/{id}/confirm
///
/// Staff move a pending enquiry to confirmed once it has been reviewed.
pub async fn confirm_hall_booking(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<HallBookResponse>> {
    let booking = state.hall.confirm(HallBookingId::from(id)).await?;

    Ok(Json(HallBookResponse {
        success: true,
        booking_id: booking.id.to_string(),
        total_price_cents: booking.total_price_cents,
        status: booking.status.to_string(),
    }))
}

/// POST /hall-hire/{id}/cancel
///
/// Cancelling frees the slot for new submissions.
pub async fn cancel_hall_booking(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<HallBookResponse>> {
    let booking = state.hall.cancel(HallBookingId::from(id)).await?;

    Ok(Json(HallBookResponse {
        success: true,
        booking_id: booking.id.to_string(),
        total_price_cents: booking.total_price_cents,
        status: booking.status.to_string(),
    }))
}

// ============================================================================
// Validation
// ============================================================================

fn validate_hall_request(req: &HallBookRequest) -> Result<(), ApiError> {
    let required = [
        ("package_id", &req.package_id),
        ("customer_name", &req.customer_name),
        ("customer_email", &req.customer_email),
        ("customer_phone", &req.customer_phone),
        ("event_type", &req.event_type),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!("Missing field: {field}")));
        }
    }
    if !req.customer_email.contains('@') {
        return Err(ApiError::BadRequest("Invalid customer_email".to_string()));
    }
    if req.expected_attendees <= 0 {
        return Err(ApiError::BadRequest(
            "expected_attendees must be positive".to_string(),
        ));
    }
    Ok(())
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ApiError::BadRequest(format!("Invalid time in {field}: {value}")))
}
