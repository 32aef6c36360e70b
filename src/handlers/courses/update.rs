use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Map, Value};

use crate::database::{ColumnValue, CourseColumn};
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::AppState;
use crate::storage::issue_upload_url;

use super::utils::{parse_object, require_id};

/// PATCH /courses/:courseId - Update whitelisted columns of an owned course.
///
/// `Id`, `User_Id` and `ContentId` in the body are ignored. When the legacy
/// upload mode is on and `Lessons` is the only field, the response also
/// carries a `signedUrl`.
pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(course_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let id = require_id(&course_id)?;
    let body = parse_object(&body)?;
    let values = update_values(&body)?;

    let affected = state.courses.update(principal.id(), id, &values).await?;
    if affected == 0 {
        tracing::warn!("Update matched no course {} owned by {}", id, principal.id());
    }

    let mut response = json!({
        "message": "Course updated successfully",
        "rowsAffected": affected,
    });

    if state.api.legacy_upload_url && affected > 0 && only_lessons(&values) {
        let ticket = issue_upload_url(state.signer.as_ref()).await?;
        response["signedUrl"] = Value::String(ticket.signed_url);
    }

    Ok(Json(response))
}

fn update_values(body: &Map<String, Value>) -> Result<Vec<(CourseColumn, ColumnValue)>, ApiError> {
    let mut values: Vec<(CourseColumn, ColumnValue)> = Vec::new();

    for (key, value) in body {
        if CourseColumn::is_immutable_key(key) {
            tracing::debug!("Ignoring immutable field {}", key);
            continue;
        }

        let column = CourseColumn::updatable_from_key(key)
            .ok_or_else(|| ApiError::validation_error(format!("Unknown field '{}'", key), Some(key.as_str())))?;
        if values.iter().any(|(existing, _)| *existing == column) {
            return Err(ApiError::validation_error(
                format!("Duplicate field '{}'", key),
                Some(key.as_str()),
            ));
        }
        values.push((column, column.coerce(value)?));
    }

    if values.is_empty() {
        return Err(ApiError::validation_error("No updatable fields", None));
    }
    Ok(values)
}

fn only_lessons(values: &[(CourseColumn, ColumnValue)]) -> bool {
    matches!(values, [(CourseColumn::Lessons, _)])
}
