//! Class booking handlers

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use studio_types::{Booking, BookingId, ClassId, GuestInfo};

use crate::error::ApiResult;
use crate::extractors::{AdminUser, AuthUser};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct BookClassRequest {
    /// Walk-in guest details, staff bookings only
    #[serde(default)]
    pub guest: Option<GuestInfo>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    pub attended: bool,
    pub notes: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/classes/{id}/book
pub async fn book_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(class_id): Path<Uuid>,
    body: Option<Json<BookClassRequest>>,
) -> ApiResult<Json<BookingResponse>> {
    let start = Instant::now();
    let Json(req) = body.unwrap_or_default();

    let booking = state
        .bookings
        .book(user.user_id, ClassId::from(class_id), req.guest)
        .await?;

    metrics::histogram!("studio_operation_duration_seconds", "operation" => "book_class")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}

/// POST /api/v1/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> ApiResult<Json<BookingResponse>> {
    let start = Instant::now();

    let booking = state.bookings.cancel(BookingId::from(booking_id)).await?;

    metrics::histogram!("studio_operation_duration_seconds", "operation" => "cancel_booking")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}

/// GET /api/v1/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<BookingsResponse>> {
    let bookings = state.bookings.user_bookings(user.user_id).await?;
    Ok(Json(BookingsResponse { bookings }))
}

/// POST /api/v1/bookings/{id}/attendance
pub async fn mark_attendance(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<AttendanceRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let booking = state
        .bookings
        .mark_attendance(
            BookingId::from(booking_id),
            req.attended,
            admin.user_id,
            req.notes,
        )
        .await?;

    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}
