//! Booking lifecycle types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingId, ClassId, UserId};

/// Booking lifecycle status
///
/// A booking is never physically deleted; cancellation is the
/// `Confirmed -> Cancelled` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Waitlisted,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Waitlisted => write!(f, "waitlisted"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "waitlisted" => Ok(Self::Waitlisted),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

/// Error parsing a status string
#[derive(Debug, Clone)]
pub struct StatusParseError(pub String);

impl std::fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid status: {}", self.0)
    }
}

impl std::error::Error for StatusParseError {}

/// A user's reservation against a class offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub class_id: ClassId,
    pub user_id: UserId,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    /// Attendance record, filled in after the class runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Attendance>,
    /// Contact details for admin-booked walk-ins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<GuestInfo>,
}

impl Booking {
    /// Whether this booking currently holds a seat
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// Attendance marking, independent of the booking lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub attended: bool,
    pub marked_by: UserId,
    pub marked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Walk-in guest details attached by an admin booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
