use sqlx::{self, postgres::PgArguments, FromRow};

use crate::database::columns::{ColumnValue, CourseColumn};

pub const COURSE_TABLE: &str = "\"Course\"";

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub query: String,
    pub params: Vec<ColumnValue>,
}

/// Constructors for every statement the course handlers issue. Column names
/// come from `CourseColumn`, values always travel as `$n` parameters.
pub struct CourseQuery;

impl CourseQuery {
    pub fn list(owner: &str, limit: i64, offset: i64) -> SqlStatement {
        SqlStatement {
            query: format!(
                "SELECT * FROM {COURSE_TABLE} WHERE \"User_Id\" = $1 ORDER BY \"UpdatedAt\" DESC, \"Id\" LIMIT $2 OFFSET $3"
            ),
            params: vec![text(owner), int(limit), int(offset)],
        }
    }

    pub fn by_content_id(owner: &str, content_id: &str) -> SqlStatement {
        SqlStatement {
            query: format!("SELECT * FROM {COURSE_TABLE} WHERE \"ContentId\" = $1 AND \"User_Id\" = $2"),
            params: vec![text(content_id), text(owner)],
        }
    }

    pub fn recent(owner: &str, limit: i64) -> SqlStatement {
        SqlStatement {
            query: format!(
                "SELECT * FROM {COURSE_TABLE} WHERE \"User_Id\" = $1 ORDER BY \"UpdatedAt\" DESC LIMIT $2"
            ),
            params: vec![text(owner), int(limit)],
        }
    }

    pub fn owned_exists(owner: &str, id: &str) -> SqlStatement {
        SqlStatement {
            query: format!("SELECT 1 FROM {COURSE_TABLE} WHERE \"Id\" = $1 AND \"User_Id\" = $2"),
            params: vec![text(id), text(owner)],
        }
    }

    /// Conditional insert: no-op when a row with the same (ContentId, User_Id) exists.
    /// `ON CONFLICT` covers concurrent inserts when the table carries the
    /// `UNIQUE ("ContentId", "User_Id")` constraint.
    pub fn insert_if_absent(id: &str, owner: &str, values: &[(CourseColumn, ColumnValue)]) -> SqlStatement {
        let mut columns = vec!["\"Id\"".to_string(), "\"User_Id\"".to_string()];
        let mut params = vec![text(id), text(owner)];
        for (column, value) in values {
            columns.push(column.quoted());
            params.push(value.clone());
        }

        let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("${i}")).collect();
        let content_id = values
            .iter()
            .position(|(column, _)| *column == CourseColumn::ContentId)
            .map(|i| i + 3)
            .unwrap_or(1);

        SqlStatement {
            query: format!(
                "INSERT INTO {COURSE_TABLE} ({}) SELECT {} WHERE NOT EXISTS (SELECT 1 FROM {COURSE_TABLE} WHERE \"ContentId\" = ${content_id} AND \"User_Id\" = $2) ON CONFLICT DO NOTHING",
                columns.join(", "),
                placeholders.join(", "),
            ),
            params,
        }
    }

    /// Column assignments scoped by row id and owner; also refreshes `UpdatedAt`
    pub fn update(id: &str, owner: &str, values: &[(CourseColumn, ColumnValue)]) -> SqlStatement {
        let mut assignments: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", column.quoted(), i + 1))
            .collect();
        assignments.push("\"UpdatedAt\" = NOW()".to_string());

        let mut params: Vec<ColumnValue> = values.iter().map(|(_, v)| v.clone()).collect();
        let id_param = params.len() + 1;
        params.push(text(id));
        params.push(text(owner));

        SqlStatement {
            query: format!(
                "UPDATE {COURSE_TABLE} SET {} WHERE \"Id\" = ${} AND \"User_Id\" = ${}",
                assignments.join(", "),
                id_param,
                id_param + 1
            ),
            params,
        }
    }
}

fn text(s: &str) -> ColumnValue {
    ColumnValue::Text(Some(s.to_string()))
}

fn int(i: i64) -> ColumnValue {
    ColumnValue::Int(Some(i))
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q ColumnValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        ColumnValue::Int(i) => q.bind(*i),
        ColumnValue::Bool(b) => q.bind(*b),
        ColumnValue::Text(s) => q.bind(s.as_deref()),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q ColumnValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        ColumnValue::Int(i) => q.bind(*i),
        ColumnValue::Bool(b) => q.bind(*b),
        ColumnValue::Text(s) => q.bind(s.as_deref()),
    }
}
