//! Configuration for the studio API service.

use std::time::Duration;

use studio_billing_core::BillingConfig;
use studio_notify::MailerConfig;
use studio_types::MembershipTier;

/// Studio API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Billing core configuration
    pub billing: BillingConfig,
    /// Email provider configuration
    pub mailer: MailerConfig,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Stripe configuration
        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?;

        let mut billing = BillingConfig::new(&stripe_secret_key);
        for (tier, var) in [
            (MembershipTier::Bronze, "STRIPE_PRICE_BRONZE"),
            (MembershipTier::Silver, "STRIPE_PRICE_SILVER"),
            (MembershipTier::Gold, "STRIPE_PRICE_GOLD"),
        ] {
            if let Ok(price_id) = std::env::var(var) {
                billing = billing.with_price(tier, price_id);
            }
        }

        // Email provider
        let mailer = MailerConfig {
            api_url: std::env::var("EMAIL_API_URL")
                .map_err(|_| ConfigError::Missing("EMAIL_API_URL"))?,
            api_key: std::env::var("EMAIL_API_KEY")
                .map_err(|_| ConfigError::Missing("EMAIL_API_KEY"))?,
            from_address: std::env::var("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "bookings@studio.example".to_string()),
            admin_address: std::env::var("EMAIL_ADMIN_ADDRESS")
                .unwrap_or_else(|_| "admin@studio.example".to_string()),
        };

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            http_port,
            database_url,
            billing,
            mailer,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
