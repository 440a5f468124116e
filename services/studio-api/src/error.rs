//! Error types for the studio API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use studio_booking_core::{BookingError, HallHireError, MembershipError};

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Booking(#[from] BookingError),

    #[error("{0}")]
    HallHire(#[from] HallHireError),

    #[error("{0}")]
    Membership(#[from] MembershipError),

    #[error("{0}")]
    Billing(#[from] studio_billing_core::BillingError),

    #[error("{0}")]
    Notify(#[from] studio_notify::NotifyError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        use studio_billing_core::BillingError;

        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Booking(e) => match e {
                BookingError::ClassNotFound | BookingError::BookingNotFound => {
                    StatusCode::NOT_FOUND
                }
                _ if e.is_conflict() => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::HallHire(e) => match e {
                HallHireError::SlotUnavailable
                | HallHireError::NotPending
                | HallHireError::AlreadyCancelled => StatusCode::CONFLICT,
                HallHireError::UnknownPackage(_) | HallHireError::InvalidTimeRange => {
                    StatusCode::BAD_REQUEST
                }
                HallHireError::NotFound => StatusCode::NOT_FOUND,
                HallHireError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Membership(e) => match e {
                MembershipError::NotFound => StatusCode::NOT_FOUND,
                MembershipError::SameTier => StatusCode::CONFLICT,
                MembershipError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Billing(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Notify(studio_notify::NotifyError::InvalidMessage(_)) => StatusCode::BAD_REQUEST,
            Self::Billing(_) | Self::Notify(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Booking(e) => match e {
                BookingError::ClassFull => "CLASS_FULL",
                BookingError::ClassNotFound => "CLASS_NOT_FOUND",
                BookingError::BookingNotFound => "BOOKING_NOT_FOUND",
                BookingError::AlreadyCancelled => "ALREADY_CANCELLED",
                BookingError::AlreadyBooked => "ALREADY_BOOKED",
                BookingError::ClassLimitReached => "CLASS_LIMIT_REACHED",
                BookingError::BookingCancelled => "BOOKING_CANCELLED",
                BookingError::Database(_) => "INTERNAL_ERROR",
            },
            Self::HallHire(e) => match e {
                HallHireError::SlotUnavailable => "SLOT_UNAVAILABLE",
                HallHireError::UnknownPackage(_) => "UNKNOWN_PACKAGE",
                HallHireError::InvalidTimeRange => "INVALID_TIME_RANGE",
                HallHireError::NotFound => "HALL_BOOKING_NOT_FOUND",
                HallHireError::NotPending => "NOT_PENDING",
                HallHireError::AlreadyCancelled => "ALREADY_CANCELLED",
                HallHireError::Database(_) => "INTERNAL_ERROR",
            },
            Self::Membership(e) => match e {
                MembershipError::NotFound => "MEMBERSHIP_NOT_FOUND",
                MembershipError::SameTier => "SAME_TIER",
                MembershipError::Database(_) => "INTERNAL_ERROR",
            },
            Self::Billing(e) if e.is_client_error() => "BAD_REQUEST",
            Self::Notify(studio_notify::NotifyError::InvalidMessage(_)) => "INVALID_MESSAGE",
            Self::Billing(_) | Self::Notify(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The user-facing message; internal failures get a generic one
    fn public_message(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.public_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
