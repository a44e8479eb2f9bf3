//! Books repository for database operations

use sqlx::{Executor, Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

const BOOK_COLUMNS: &str =
    "isbn, name, author_name, publication_year, selling_price, library_id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all books in insertion order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY rowid",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get book by ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.find(&self.pool, isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", isbn)))
    }

    pub async fn find<'e, E>(&self, executor: E, isbn: &str) -> AppResult<Option<Book>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE isbn = ?",
            BOOK_COLUMNS
        ))
        .bind(isbn)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn exists<'e, E>(&self, executor: E, isbn: &str) -> AppResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE isbn = ?")
            .bind(isbn)
            .fetch_one(executor)
            .await?;
        Ok(count > 0)
    }

    /// Books referencing a library, in insertion order
    pub async fn list_by_library<'e, E>(&self, executor: E, library_id: i64) -> AppResult<Vec<Book>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE library_id = ? ORDER BY rowid",
            BOOK_COLUMNS
        ))
        .bind(library_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Every book attached to some library, in insertion order
    pub async fn list_attached(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE library_id IS NOT NULL ORDER BY rowid",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a new book. A duplicate ISBN is reported as an invalid request.
    pub async fn insert<'e, E>(&self, executor: E, book: &Book) -> AppResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO books (isbn, name, author_name, publication_year, selling_price, library_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.name)
        .bind(&book.author_name)
        .bind(book.publication_year)
        .bind(book.selling_price)
        .bind(book.library_id)
        .execute(executor)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .map_or(false, |db| db.is_unique_violation());
            if duplicate {
                AppError::InvalidRequest(format!("Book {} already exists", book.isbn))
            } else {
                AppError::Database(e)
            }
        })?;
        Ok(())
    }

    /// Persist every column of an existing book
    pub async fn save<'e, E>(&self, executor: E, book: &Book) -> AppResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET name = ?, author_name = ?, publication_year = ?, selling_price = ?, library_id = ?
            WHERE isbn = ?
            "#,
        )
        .bind(&book.name)
        .bind(&book.author_name)
        .bind(book.publication_year)
        .bind(book.selling_price)
        .bind(book.library_id)
        .bind(&book.isbn)
        .execute(executor)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", book.isbn)));
        }
        Ok(())
    }

    /// Delete a book, returning whether a row was removed
    pub async fn delete<'e, E>(&self, executor: E, isbn: &str) -> AppResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
