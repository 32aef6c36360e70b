use axum::{body::Bytes, extract::State, Extension, Json};
use serde_json::{json, Map, Value};

use crate::database::{ColumnValue, CourseColumn};
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::state::AppState;

use super::utils::parse_object;

/// Checked in this order; the first missing one is reported
const REQUIRED_FIELDS: [CourseColumn; 3] = [CourseColumn::ContentId, CourseColumn::TimeTrack, CourseColumn::Done];

const OPTIONAL_FIELDS: [CourseColumn; 3] = [
    CourseColumn::Lessons,
    CourseColumn::CurrentLessonId,
    CourseColumn::EnrollStatus,
];

/// POST /courses - Enroll the caller in a piece of content.
///
/// A second create for the same `ContentId` is a conflict and inserts nothing.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let body = parse_object(&body)?;
    let values = create_values(&body)?;

    match state.courses.create(principal.id(), &values).await? {
        Some(id) => {
            tracing::info!("Created course {} for {}", id, principal.id());
            Ok(Json(json!({ "message": "Course created successfully", "id": id })))
        }
        None => Err(ApiError::conflict("Course already exists")),
    }
}

fn create_values(body: &Map<String, Value>) -> Result<Vec<(CourseColumn, ColumnValue)>, ApiError> {
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|column| !body.contains_key(column.name())) {
        return Err(ApiError::validation_error(
            format!("Missing {}", missing.name()),
            Some(missing.name()),
        ));
    }

    let mut values = Vec::new();
    for column in REQUIRED_FIELDS.into_iter().chain(OPTIONAL_FIELDS) {
        if let Some(value) = body.get(column.name()) {
            values.push((column, column.coerce(value)?));
        }
    }
    Ok(values)
}
