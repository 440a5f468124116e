//! Studio Notify - outbound templated email
//!
//! Email delivery is an external collaborator: this crate exposes a
//! [`Mailer`] trait ("send templated message to address") and an HTTP
//! provider client, plus the message templates the booking flows use.

pub mod error;
pub mod mailer;
pub mod templates;

pub use error::NotifyError;
pub use mailer::{EmailMessage, HttpMailer, Mailer, MailerConfig, SentEmail};
