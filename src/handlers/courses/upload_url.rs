use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::AppState;
use crate::storage::{issue_upload_url, UploadTicket};

use super::utils::require_id;

/// POST /courses/:courseId/upload-url - Signed PUT URL for a course asset
pub async fn upload_url(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(course_id): Path<String>,
) -> Result<Json<UploadTicket>, ApiError> {
    let id = require_id(&course_id)?;
    if !state.courses.owned_exists(principal.id(), id).await? {
        return Err(ApiError::not_found("Course not found"));
    }

    let ticket = issue_upload_url(state.signer.as_ref()).await?;
    tracing::info!("Issued upload URL for course {} (object {})", id, ticket.key);
    Ok(Json(ticket))
}
