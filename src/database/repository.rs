use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::database::columns::{ColumnValue, CourseColumn};
use crate::database::manager::DatabaseError;
use crate::database::models::Course;
use crate::database::query_builder::{bind_param_query, bind_param_query_as, CourseQuery, SqlStatement};

/// Owner-scoped access to the `Course` table
#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, owner: &str, limit: i64, offset: i64) -> Result<Vec<Course>, DatabaseError> {
        self.select(CourseQuery::list(owner, limit, offset)).await
    }

    pub async fn by_content_id(&self, owner: &str, content_id: &str) -> Result<Vec<Course>, DatabaseError> {
        self.select(CourseQuery::by_content_id(owner, content_id)).await
    }

    pub async fn recent(&self, owner: &str, limit: i64) -> Result<Vec<Course>, DatabaseError> {
        self.select(CourseQuery::recent(owner, limit)).await
    }

    pub async fn owned_exists(&self, owner: &str, id: &str) -> Result<bool, DatabaseError> {
        let stmt = CourseQuery::owned_exists(owner, id);
        let mut q = sqlx::query(&stmt.query);
        for p in stmt.params.iter() {
            q = bind_param_query(q, p);
        }
        Ok(q.fetch_optional(&self.pool).await?.is_some())
    }

    /// Insert unless the (ContentId, owner) pair exists. Returns the new row id,
    /// or `None` when an existing row blocked the insert.
    pub async fn create(
        &self,
        owner: &str,
        values: &[(CourseColumn, ColumnValue)],
    ) -> Result<Option<String>, DatabaseError> {
        let id = Uuid::new_v4().to_string();
        let affected = self.execute(CourseQuery::insert_if_absent(&id, owner, values)).await?;
        Ok((affected > 0).then_some(id))
    }

    /// Returns the number of rows changed (0 when the id is not owned by `owner`)
    pub async fn update(
        &self,
        owner: &str,
        id: &str,
        values: &[(CourseColumn, ColumnValue)],
    ) -> Result<u64, DatabaseError> {
        self.execute(CourseQuery::update(id, owner, values)).await
    }

    async fn select(&self, stmt: SqlStatement) -> Result<Vec<Course>, DatabaseError> {
        debug!("{}", stmt.query);
        let mut q = sqlx::query_as::<_, Course>(&stmt.query);
        for p in stmt.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn execute(&self, stmt: SqlStatement) -> Result<u64, DatabaseError> {
        debug!("{}", stmt.query);
        let mut q = sqlx::query(&stmt.query);
        for p in stmt.params.iter() {
            q = bind_param_query(q, p);
        }
        Ok(q.execute(&self.pool).await?.rows_affected())
    }
}
