use serde_json::Value;
use thiserror::Error;

/// Columns a client may write. `Id` and `User_Id` are server-owned and never
/// appear here; `ContentId` is writable on create only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseColumn {
    ContentId,
    TimeTrack,
    Done,
    Lessons,
    CurrentLessonId,
    EnrollStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Bool,
    Text,
    /// Text column that stores JSON documents as strings
    JsonText,
}

/// A request value coerced to the column's storage type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Int(Option<i64>),
    Bool(Option<bool>),
    Text(Option<String>),
}

#[derive(Debug, Error, PartialEq)]
#[error("Invalid {column}: expected {expected}")]
pub struct ColumnError {
    pub column: &'static str,
    pub expected: &'static str,
}

/// Keys a caller may send but which are silently dropped on update
pub const IMMUTABLE_KEYS: [&str; 3] = ["Id", "User_Id", "ContentId"];

impl CourseColumn {
    pub const UPDATABLE: [CourseColumn; 5] = [
        CourseColumn::TimeTrack,
        CourseColumn::Done,
        CourseColumn::Lessons,
        CourseColumn::CurrentLessonId,
        CourseColumn::EnrollStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CourseColumn::ContentId => "ContentId",
            CourseColumn::TimeTrack => "TimeTrack",
            CourseColumn::Done => "Done",
            CourseColumn::Lessons => "Lessons",
            CourseColumn::CurrentLessonId => "CurrentLessonId",
            CourseColumn::EnrollStatus => "EnrollStatus",
        }
    }

    /// Quoted identifier for SQL text
    pub fn quoted(self) -> String {
        format!("\"{}\"", self.name())
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            CourseColumn::ContentId => ColumnKind::Text,
            CourseColumn::TimeTrack => ColumnKind::Int,
            CourseColumn::Done => ColumnKind::Bool,
            CourseColumn::Lessons => ColumnKind::JsonText,
            CourseColumn::CurrentLessonId => ColumnKind::Text,
            CourseColumn::EnrollStatus => ColumnKind::Text,
        }
    }

    pub fn nullable(self) -> bool {
        !matches!(
            self,
            CourseColumn::ContentId | CourseColumn::TimeTrack | CourseColumn::Done
        )
    }

    /// Case-insensitive lookup among the updatable columns
    pub fn updatable_from_key(key: &str) -> Option<CourseColumn> {
        Self::UPDATABLE
            .into_iter()
            .find(|column| column.name().eq_ignore_ascii_case(key))
    }

    pub fn is_immutable_key(key: &str) -> bool {
        IMMUTABLE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
    }

    pub fn coerce(self, value: &Value) -> Result<ColumnValue, ColumnError> {
        if value.is_null() {
            if !self.nullable() {
                return Err(self.error());
            }
            return Ok(match self.kind() {
                ColumnKind::Int => ColumnValue::Int(None),
                ColumnKind::Bool => ColumnValue::Bool(None),
                ColumnKind::Text | ColumnKind::JsonText => ColumnValue::Text(None),
            });
        }

        match (self.kind(), value) {
            (ColumnKind::Int, Value::Number(n)) => n.as_i64().map(|i| ColumnValue::Int(Some(i))),
            (ColumnKind::Int, Value::String(s)) => s.trim().parse().ok().map(|i| ColumnValue::Int(Some(i))),
            (ColumnKind::Bool, Value::Bool(b)) => Some(ColumnValue::Bool(Some(*b))),
            (ColumnKind::Bool, Value::Number(n)) => match n.as_i64() {
                Some(0) => Some(ColumnValue::Bool(Some(false))),
                Some(1) => Some(ColumnValue::Bool(Some(true))),
                _ => None,
            },
            (ColumnKind::Text | ColumnKind::JsonText, Value::String(s)) => Some(ColumnValue::Text(Some(s.clone()))),
            (ColumnKind::Text, Value::Number(n)) => Some(ColumnValue::Text(Some(n.to_string()))),
            (ColumnKind::Text, Value::Bool(b)) => Some(ColumnValue::Text(Some(b.to_string()))),
            (ColumnKind::JsonText, Value::Array(_) | Value::Object(_)) => {
                serde_json::to_string(value).ok().map(|s| ColumnValue::Text(Some(s)))
            }
            _ => None,
        }
        .ok_or_else(|| self.error())
    }

    fn error(self) -> ColumnError {
        let expected = match (self.kind(), self.nullable()) {
            (ColumnKind::Int, _) => "an integer",
            (ColumnKind::Bool, _) => "a boolean",
            (ColumnKind::Text, false) => "a non-null string",
            (ColumnKind::Text, true) => "a string",
            (ColumnKind::JsonText, _) => "a list or string",
        };
        ColumnError { column: self.name(), expected }
    }
}
