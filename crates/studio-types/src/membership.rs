//! Membership tier types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Membership tier levels
///
/// Each tier grants a fixed monthly class-booking allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    /// Pay-as-you-go - classes bought individually, no monthly cap
    PayAsYouGo,
    /// Bronze - 4 classes per month
    Bronze,
    /// Silver - 8 classes per month
    Silver,
    /// Gold - unlimited classes
    Gold,
}

impl MembershipTier {
    /// Monthly class allowance; `None` means no monthly cap
    pub const fn class_limit(&self) -> Option<u32> {
        match self {
            Self::PayAsYouGo => None,
            Self::Bronze => Some(4),
            Self::Silver => Some(8),
            Self::Gold => None,
        }
    }

    /// Monthly price in minor currency units
    pub const fn price_cents(&self) -> u32 {
        match self {
            Self::PayAsYouGo => 0,
            Self::Bronze => 2_500,
            Self::Silver => 4_500,
            Self::Gold => 6_500,
        }
    }

    /// Tier ordering used to classify a change as upgrade or downgrade
    pub const fn rank(&self) -> u8 {
        match self {
            Self::PayAsYouGo => 0,
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 3,
        }
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayAsYouGo => write!(f, "payg"),
            Self::Bronze => write!(f, "bronze"),
            Self::Silver => write!(f, "silver"),
            Self::Gold => write!(f, "gold"),
        }
    }
}

impl std::str::FromStr for MembershipTier {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "payg" | "payasyougo" => Ok(Self::PayAsYouGo),
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            _ => Err(TierParseError(s.to_string())),
        }
    }
}

/// Error parsing a tier string
#[derive(Debug, Clone)]
pub struct TierParseError(pub String);

impl std::fmt::Display for TierParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tier: {}", self.0)
    }
}

impl std::error::Error for TierParseError {}

/// A user's membership state
///
/// Downgrades are deferred: `pending_change` holds the target tier and
/// `change_effective_date` the date it takes effect. Until then the current
/// tier (and its class limit) stays in force. Upgrades apply immediately and
/// clear any pending change. The asymmetry is a business rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMembership {
    pub user_id: UserId,
    pub tier: MembershipTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_change: Option<MembershipTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_effective_date: Option<DateTime<Utc>>,
    /// Start of the current billing cycle, the window class allowance counts
    pub cycle_started_at: DateTime<Utc>,
}

impl UserMembership {
    /// The tier whose class limit applies right now
    ///
    /// A pending downgrade has no effect until its effective date passes.
    pub fn effective_tier(&self, now: DateTime<Utc>) -> MembershipTier {
        match (self.pending_change, self.change_effective_date) {
            (Some(target), Some(effective)) if now >= effective => target,
            _ => self.tier,
        }
    }
}

/// One entry in a member's payment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub user_id: UserId,
    /// Amount in minor currency units
    pub amount_cents: i64,
    pub description: String,
    pub paid_at: DateTime<Utc>,
}
