//! Class catalog types

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::ids::ClassId;

/// A scheduled recurring class offering
///
/// Catalog data is seeded once and rarely mutated; `capacity` is fixed and
/// only an admin-side edit may change it. The live seat count lives next to
/// the offering (see [`ClassAvailability`]) but is owned by the booking
/// orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassOffering {
    pub id: ClassId,
    pub name: String,
    pub category: String,
    #[serde(with = "weekday_str")]
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub instructor: String,
    pub capacity: i32,
}

/// A class offering together with its live remaining capacity
///
/// Invariant: `0 <= spots_left <= offering.capacity`, and `spots_left`
/// equals capacity minus the count of confirmed bookings for the class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAvailability {
    #[serde(flatten)]
    pub offering: ClassOffering,
    pub spots_left: i32,
}

impl ClassAvailability {
    /// Whether at least one seat remains
    pub fn has_space(&self) -> bool {
        self.spots_left > 0
    }
}

/// Serialize `chrono::Weekday` as its lowercase English name
mod weekday_str {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&day.to_string().to_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Weekday, D::Error> {
        let s = String::deserialize(de)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn offering(capacity: i32) -> ClassOffering {
        ClassOffering {
            id: ClassId::new(),
            name: "Ladies Yoga".into(),
            category: "yoga".into(),
            day: Weekday::Tue,
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            duration_minutes: 60,
            instructor: "Sarah".into(),
            capacity,
        }
    }

    #[test]
    fn has_space_reflects_spots_left() {
        let avail = ClassAvailability {
            offering: offering(12),
            spots_left: 1,
        };
        assert!(avail.has_space());

        let full = ClassAvailability {
            offering: offering(12),
            spots_left: 0,
        };
        assert!(!full.has_space());
    }

    #[test]
    fn weekday_serializes_lowercase() {
        let avail = ClassAvailability {
            offering: offering(12),
            spots_left: 12,
        };
        let json = serde_json::to_value(&avail).unwrap();
        assert_eq!(json["day"], "tue");
    }
}
