//! Axum extractors for gateway-provided identity
//!
//! Authentication happens upstream; the gateway stamps each request with an
//! `x-user-id` header (and `x-user-role` for staff). These extractors only
//! parse those headers, they never validate credentials.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use studio_types::UserId;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

/// Identity forwarded by the auth gateway
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub role: String,
}

impl AuthUser {
    /// Whether the gateway marked this request as staff
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Error response for identity failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Identity rejection type
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
}

impl AuthRejection {
    fn missing() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "MISSING_IDENTITY",
            message: "No user identity on request",
        }
    }

    fn invalid() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_IDENTITY",
            message: "Malformed x-user-id header",
        }
    }

    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: "FORBIDDEN",
            message: "Staff role required",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(AuthRejection::missing)?
            .to_str()
            .map_err(|_| AuthRejection::invalid())?;

        let user_id = UserId::parse(raw).map_err(|_| AuthRejection::invalid())?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("user")
            .to_string();

        Ok(AuthUser { user_id, role })
    }
}

/// Extractor requiring the staff role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AuthRejection::forbidden());
        }
        Ok(AdminUser(user))
    }
}
