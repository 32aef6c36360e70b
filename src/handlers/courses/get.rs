use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::database::Course;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::AppState;

use super::utils::require_id;

/// GET /courses/:courseId - Courses matching a content identifier.
///
/// No match is an empty array, not an error.
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let content_id = require_id(&course_id)?;
    let rows = state.courses.by_content_id(principal.id(), content_id).await?;
    Ok(Json(rows))
}
