//! Class catalog handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use studio_types::{ClassAvailability, ClassId};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClassesResponse {
    pub classes: Vec<ClassAvailability>,
}

/// GET /api/v1/classes
///
/// The full weekly catalog with live seat counts.
pub async fn list_classes(State(state): State<AppState>) -> ApiResult<Json<ClassesResponse>> {
    let classes = state.bookings.availability().await?;
    Ok(Json(ClassesResponse { classes }))
}

/// GET /api/v1/classes/{id}
pub async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
) -> ApiResult<Json<ClassAvailability>> {
    let class = state
        .bookings
        .class_availability(ClassId::from(class_id))
        .await?;
    Ok(Json(class))
}
