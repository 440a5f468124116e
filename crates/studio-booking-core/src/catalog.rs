//! Seeded catalogs
//!
//! The weekly class timetable and the hall-hire packages. Class IDs are
//! fixed so reseeding an existing database is a no-op.

use chrono::NaiveTime;
use uuid::Uuid;

use studio_db::SeedClass;
use studio_types::{HallPackage, PackagePricing};

fn class(
    n: u128,
    name: &str,
    category: &str,
    day: &str,
    (hour, minute): (u32, u32),
    duration_minutes: i32,
    instructor: &str,
    capacity: i32,
) -> SeedClass {
    SeedClass {
        // Stable per-class seed IDs, namespaced away from random v4 IDs
        id: Uuid::from_u128(0x5eed_c1a5_5000_0000_0000_0000_0000_0000 + n),
        name: name.to_string(),
        category: category.to_string(),
        day: day.to_string(),
        start_time: NaiveTime::from_hms_opt(hour, minute, 0)
            .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
        duration_minutes,
        instructor: instructor.to_string(),
        capacity,
    }
}

/// The weekly timetable
pub fn seed_classes() -> Vec<SeedClass> {
    vec![
        class(1, "Ladies Yoga", "yoga", "tue", (9, 30), 60, "Sarah", 12),
        class(2, "Power Yoga", "yoga", "thu", (18, 30), 60, "Sarah", 12),
        class(3, "Spin", "cardio", "mon", (7, 0), 45, "Alex", 20),
        class(4, "Spin", "cardio", "wed", (19, 0), 45, "Alex", 20),
        class(5, "Boxfit", "cardio", "tue", (18, 0), 50, "Marcus", 16),
        class(6, "Pilates", "pilates", "wed", (10, 0), 55, "Elena", 14),
        class(7, "Pilates", "pilates", "fri", (9, 0), 55, "Elena", 14),
        class(8, "Strength Basics", "strength", "mon", (18, 0), 60, "Marcus", 10),
        class(9, "Circuits", "strength", "sat", (9, 0), 45, "Alex", 18),
        class(10, "Stretch & Restore", "yoga", "sun", (10, 0), 60, "Elena", 15),
    ]
}

/// The static hall-hire package catalog
pub fn hall_packages() -> &'static [HallPackage] {
    const PACKAGES: [HallPackage; 4] = [
        HallPackage {
            id: "hourly",
            name: "Hourly Hire",
            price_cents: 3000,
            pricing: PackagePricing::Hourly,
            duration_hours: None,
            capacity: 80,
        },
        HallPackage {
            id: "half-day",
            name: "Half Day",
            price_cents: 10000,
            pricing: PackagePricing::Flat,
            duration_hours: Some(4),
            capacity: 80,
        },
        HallPackage {
            id: "full-day",
            name: "Full Day",
            price_cents: 18000,
            pricing: PackagePricing::Flat,
            duration_hours: Some(8),
            capacity: 80,
        },
        HallPackage {
            id: "party",
            name: "Party Package",
            price_cents: 15000,
            pricing: PackagePricing::Flat,
            duration_hours: Some(3),
            capacity: 60,
        },
    ];
    &PACKAGES
}
