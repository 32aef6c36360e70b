use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::database::Course;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::AppState;

use super::utils::{PageQuery, Pagination};

/// GET /courses?page&size - Page through the caller's courses
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let page = Pagination::from_query(&query, &state.api)?;
    let rows = state
        .courses
        .list(principal.id(), page.size, page.offset())
        .await?;

    tracing::debug!("Listed {} courses (page {}, size {})", rows.len(), page.page, page.size);
    Ok(Json(rows))
}
