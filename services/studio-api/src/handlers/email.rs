//! Outbound email handler

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use studio_notify::{EmailMessage, Mailer};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message_id: String,
}

/// POST /email/send-email
///
/// Synchronous relay through the provider; malformed messages are rejected
/// by the mailer before any provider call.
pub async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> ApiResult<Json<SendEmailResponse>> {
    let sent = state
        .mailer
        .send(EmailMessage {
            to: req.to,
            subject: req.subject,
            text: req.text,
            html: req.html,
        })
        .await?;

    metrics::counter!("studio_emails_sent_total").increment(1);

    Ok(Json(SendEmailResponse {
        success: true,
        message_id: sent.message_id,
    }))
}
