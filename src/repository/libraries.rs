//! Libraries repository for database operations

use sqlx::{Executor, Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::library::Library,
};

#[derive(Clone)]
pub struct LibrariesRepository {
    pool: Pool<Sqlite>,
}

impl LibrariesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all libraries by id
    pub async fn list(&self) -> AppResult<Vec<Library>> {
        let rows = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get library by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Library> {
        self.find(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))
    }

    pub async fn find<'e, E>(&self, executor: E, id: i64) -> AppResult<Option<Library>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn exists<'e, E>(&self, executor: E, id: i64) -> AppResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(count > 0)
    }

    /// Create a library; the id is assigned by the database
    pub async fn insert<'e, E>(&self, executor: E, name: &str) -> AppResult<Library>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, Library>(
            "INSERT INTO libraries (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    /// Delete a library, returning whether a row was removed
    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> AppResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM libraries WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
