use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `Course` table, serialized with the column names as keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    #[serde(rename = "Id")]
    #[sqlx(rename = "Id")]
    pub id: String,
    #[serde(rename = "ContentId")]
    #[sqlx(rename = "ContentId")]
    pub content_id: String,
    #[serde(rename = "TimeTrack")]
    #[sqlx(rename = "TimeTrack")]
    pub time_track: i64,
    #[serde(rename = "Done")]
    #[sqlx(rename = "Done")]
    pub done: bool,
    #[serde(rename = "User_Id")]
    #[sqlx(rename = "User_Id")]
    pub user_id: String,
    #[serde(rename = "Lessons")]
    #[sqlx(rename = "Lessons")]
    pub lessons: Option<String>,
    #[serde(rename = "CurrentLessonId")]
    #[sqlx(rename = "CurrentLessonId")]
    pub current_lesson_id: Option<String>,
    #[serde(rename = "EnrollStatus")]
    #[sqlx(rename = "EnrollStatus")]
    pub enroll_status: Option<String>,
    #[serde(rename = "UpdatedAt")]
    #[sqlx(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
}
