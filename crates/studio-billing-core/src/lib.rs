//! Studio Billing Core - payment provider integration
//!
//! One-off payments (payment intents for class and hall-hire checkouts)
//! and recurring membership subscriptions, behind a [`PaymentProvider`]
//! trait with a Stripe implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use studio_billing_core::{BillingConfig, StripeProvider, PaymentProvider};
//! use studio_types::MembershipTier;
//!
//! let config = BillingConfig::new("sk_test_...")
//!     .with_price(MembershipTier::Silver, "price_...");
//! let stripe = StripeProvider::new(config);
//!
//! let intent = stripe.create_payment_intent(1500, "gbp").await?;
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod stripe;

pub use config::BillingConfig;
pub use error::BillingError;
pub use provider::{PaymentIntent, PaymentProvider, Subscription};
pub use stripe::StripeProvider;
