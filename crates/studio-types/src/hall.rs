//! Hall-hire types
//!
//! The hall is a single shared resource hired by date and time range rather
//! than fixed weekly slots. The core invariant: no two non-cancelled
//! bookings on the same calendar date may have overlapping `[start, end)`
//! intervals.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::HallBookingId;

/// Hall-hire booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HallBookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for HallBookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for HallBookingStatus {
    type Err = crate::booking::StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(crate::booking::StatusParseError(s.to_string())),
        }
    }
}

/// An ad-hoc hire of the hall for a date and time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallHireBooking {
    pub id: HallBookingId,
    pub package_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub expected_attendees: i32,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
    /// Total price in minor currency units
    pub total_price_cents: i64,
    pub status: HallBookingStatus,
    pub created_at: DateTime<Utc>,
}

impl HallHireBooking {
    /// Booked duration in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Pricing model for a hall-hire package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagePricing {
    /// Hourly rate, charged per started hour
    Hourly,
    /// Flat price regardless of duration
    Flat,
}

/// A hall-hire package from the static catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HallPackage {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in minor currency units; the hourly rate for hourly packages
    pub price_cents: i64,
    pub pricing: PackagePricing,
    /// Nominal duration in hours for flat packages
    pub duration_hours: Option<i32>,
    /// Maximum attendees the package covers
    pub capacity: i32,
}
