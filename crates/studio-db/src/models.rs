//! Database row models
//!
//! Row types map directly to table rows via SQLx's `FromRow` derive. Every
//! row is decoded into its domain type through a strict `TryFrom` at the
//! store boundary: status and weekday strings are parsed, never cast, and
//! malformed stored values surface as [`DbError::Decode`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use sqlx::FromRow;
use uuid::Uuid;

use studio_types::{
    Attendance, Booking, BookingStatus, ClassAvailability, ClassOffering, GuestInfo,
    HallBookingStatus, HallHireBooking, MembershipTier, PaymentRecord, UserMembership,
};

use crate::error::DbError;

/// Class offering row, including the live `spots_left` counter
#[derive(Debug, Clone, FromRow)]
pub struct ClassRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub day: String,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub instructor: String,
    pub capacity: i32,
    pub spots_left: i32,
}

impl TryFrom<ClassRow> for ClassAvailability {
    type Error = DbError;

    fn try_from(row: ClassRow) -> Result<Self, Self::Error> {
        let day: Weekday = row
            .day
            .parse()
            .map_err(|_| DbError::Decode(format!("invalid weekday '{}'", row.day)))?;

        Ok(ClassAvailability {
            offering: ClassOffering {
                id: row.id.into(),
                name: row.name,
                category: row.category,
                day,
                start_time: row.start_time,
                duration_minutes: row.duration_minutes,
                instructor: row.instructor,
                capacity: row.capacity,
            },
            spots_left: row.spots_left,
        })
    }
}

/// Booking row
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub class_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub booked_at: DateTime<Utc>,
    pub attended: Option<bool>,
    pub marked_by: Option<Uuid>,
    pub marked_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DbError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status: BookingStatus = row
            .status
            .parse()
            .map_err(|_| DbError::Decode(format!("invalid booking status '{}'", row.status)))?;

        // Attendance is only present once all three mandatory fields are set
        let attendance = match (row.attended, row.marked_by, row.marked_at) {
            (Some(attended), Some(marked_by), Some(marked_at)) => Some(Attendance {
                attended,
                marked_by: marked_by.into(),
                marked_at,
                notes: row.notes,
            }),
            _ => None,
        };

        let guest = row.guest_name.map(|name| GuestInfo {
            name,
            phone: row.guest_phone,
        });

        Ok(Booking {
            id: row.id.into(),
            class_id: row.class_id.into(),
            user_id: row.user_id.into(),
            status,
            booked_at: row.booked_at,
            attendance,
            guest,
        })
    }
}

/// Hall-hire booking row
#[derive(Debug, Clone, FromRow)]
pub struct HallHireRow {
    pub id: Uuid,
    pub package_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub expected_attendees: i32,
    pub event_type: String,
    pub special_requirements: Option<String>,
    pub total_price_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<HallHireRow> for HallHireBooking {
    type Error = DbError;

    fn try_from(row: HallHireRow) -> Result<Self, Self::Error> {
        let status: HallBookingStatus = row
            .status
            .parse()
            .map_err(|_| DbError::Decode(format!("invalid hall status '{}'", row.status)))?;

        Ok(HallHireBooking {
            id: row.id.into(),
            package_id: row.package_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            event_date: row.event_date,
            start_time: row.start_time,
            end_time: row.end_time,
            expected_attendees: row.expected_attendees,
            event_type: row.event_type,
            special_requirements: row.special_requirements,
            total_price_cents: row.total_price_cents,
            status,
            created_at: row.created_at,
        })
    }
}

/// Membership row
#[derive(Debug, Clone, FromRow)]
pub struct MembershipRow {
    pub user_id: Uuid,
    pub tier: String,
    pub pending_tier: Option<String>,
    pub change_effective_date: Option<DateTime<Utc>>,
    pub cycle_started_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for UserMembership {
    type Error = DbError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        let tier: MembershipTier = row
            .tier
            .parse()
            .map_err(|_| DbError::Decode(format!("invalid tier '{}'", row.tier)))?;

        let pending_change = row
            .pending_tier
            .map(|t| {
                t.parse::<MembershipTier>()
                    .map_err(|_| DbError::Decode(format!("invalid pending tier '{t}'")))
            })
            .transpose()?;

        Ok(UserMembership {
            user_id: row.user_id.into(),
            tier,
            pending_change,
            change_effective_date: row.change_effective_date,
            cycle_started_at: row.cycle_started_at,
        })
    }
}

/// Payment history row
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub description: String,
    pub paid_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        PaymentRecord {
            user_id: row.user_id.into(),
            amount_cents: row.amount_cents,
            description: row.description,
            paid_at: row.paid_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_row(status: &str) -> BookingRow {
        BookingRow {
            id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: status.to_string(),
            booked_at: Utc::now(),
            attended: None,
            marked_by: None,
            marked_at: None,
            notes: None,
            guest_name: None,
            guest_phone: None,
        }
    }

    #[test]
    fn booking_decode_rejects_unknown_status() {
        let err = Booking::try_from(booking_row("ghost")).unwrap_err();
        assert!(matches!(err, DbError::Decode(_)));
    }

    #[test]
    fn booking_decode_partial_attendance_is_none() {
        let mut row = booking_row("confirmed");
        row.attended = Some(true);
        // marked_by / marked_at missing: attendance not considered recorded
        let booking = Booking::try_from(row).unwrap();
        assert!(booking.attendance.is_none());
    }

    #[test]
    fn class_decode_rejects_bad_weekday() {
        let row = ClassRow {
            id: Uuid::new_v4(),
            name: "Spin".into(),
            category: "cardio".into(),
            day: "someday".into(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration_minutes: 45,
            instructor: "Alex".into(),
            capacity: 20,
            spots_left: 20,
        };
        assert!(ClassAvailability::try_from(row).is_err());
    }
}
