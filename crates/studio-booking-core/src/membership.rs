//! Membership management
//!
//! Upgrades apply immediately; downgrades are deferred thirty days and the
//! current tier's class limit stays in force until then. The asymmetry is a
//! business rule, not an accident.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument};

use studio_db::{BookingRepository, MembershipRepository};
use studio_types::{MembershipTier, PaymentRecord, UserId, UserMembership};

use crate::error::MembershipError;

/// How long a downgrade is deferred
pub const DOWNGRADE_DEFERRAL_DAYS: i64 = 30;

/// How a tier change was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierChange {
    /// Upgrade, in force now
    Immediate,
    /// Downgrade, in force at the contained date
    Scheduled(DateTime<Utc>),
}

/// Membership management service
pub struct MembershipService<M, B> {
    memberships: Arc<M>,
    bookings: Arc<B>,
}

impl<M, B> MembershipService<M, B>
where
    M: MembershipRepository,
    B: BookingRepository,
{
    /// Create a new membership service
    pub fn new(memberships: Arc<M>, bookings: Arc<B>) -> Self {
        Self {
            memberships,
            bookings,
        }
    }

    /// A user's membership, if any
    pub async fn membership(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserMembership>, MembershipError> {
        let row = self.memberships.find_by_user(user_id.0).await?;
        Ok(row.map(UserMembership::try_from).transpose()?)
    }

    /// Enrol a user on a tier; does nothing if they already have one
    pub async fn enrol(&self, user_id: UserId, tier: MembershipTier) -> Result<(), MembershipError> {
        self.memberships
            .create(user_id.0, &tier.to_string())
            .await?;
        Ok(())
    }

    /// Change a user's tier
    ///
    /// Upgrades (higher rank) take effect immediately and clear any pending
    /// change. Downgrades set `pending_change` and an effective date of
    /// now + 30 days; the current tier keeps applying until then.
    #[instrument(skip(self), fields(user_id = %user_id, tier = %new_tier))]
    pub async fn change_tier(
        &self,
        user_id: UserId,
        new_tier: MembershipTier,
    ) -> Result<TierChange, MembershipError> {
        let membership = self
            .membership(user_id)
            .await?
            .ok_or(MembershipError::NotFound)?;

        if new_tier == membership.tier {
            return Err(MembershipError::SameTier);
        }

        if new_tier.rank() > membership.tier.rank() {
            self.memberships
                .set_tier(user_id.0, &new_tier.to_string())
                .await?;
            info!("Membership upgraded");
            return Ok(TierChange::Immediate);
        }

        let effective = Utc::now() + Duration::days(DOWNGRADE_DEFERRAL_DAYS);
        self.memberships
            .schedule_change(user_id.0, &new_tier.to_string(), effective)
            .await?;
        info!(effective = %effective, "Membership downgrade scheduled");
        Ok(TierChange::Scheduled(effective))
    }

    /// Classes left in the current cycle; `None` means no cap
    pub async fn remaining_allowance(
        &self,
        user_id: UserId,
    ) -> Result<Option<u32>, MembershipError> {
        let membership = self
            .membership(user_id)
            .await?
            .ok_or(MembershipError::NotFound)?;

        let Some(limit) = membership.effective_tier(Utc::now()).class_limit() else {
            return Ok(None);
        };

        let used = self
            .bookings
            .count_confirmed_since(user_id.0, membership.cycle_started_at)
            .await?;

        let remaining = i64::from(limit).saturating_sub(used).max(0);
        Ok(Some(remaining as u32))
    }

    /// Record a membership payment
    pub async fn record_payment(
        &self,
        user_id: UserId,
        amount_cents: i64,
        description: &str,
    ) -> Result<(), MembershipError> {
        self.memberships
            .record_payment(user_id.0, amount_cents, description)
            .await?;
        Ok(())
    }

    /// Payment history, newest first
    pub async fn payments(&self, user_id: UserId) -> Result<Vec<PaymentRecord>, MembershipError> {
        let rows = self.memberships.list_payments(user_id.0).await?;
        Ok(rows.into_iter().map(PaymentRecord::from).collect())
    }
}
