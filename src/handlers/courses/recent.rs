use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::database::Course;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::AppState;

use super::utils::{page_size, PageQuery};

/// GET /courses/recent?size - Most recently updated courses first
pub async fn recent(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let size = page_size(query.size.as_deref(), &state.api)?;
    let rows = state.courses.recent(principal.id(), size).await?;
    Ok(Json(rows))
}
