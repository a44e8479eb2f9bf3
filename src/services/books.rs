//! Book management service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get(&self, isbn: &str) -> AppResult<Book> {
        self.repository.books.get_by_isbn(isbn).await
    }

    /// Create a book, attaching it to a library when one is referenced.
    /// Duplicate ISBNs and unknown libraries are rejected before any write.
    pub async fn create(&self, data: CreateBook) -> AppResult<Book> {
        let mut tx = self.repository.begin().await?;

        if self.repository.books.exists(&mut *tx, &data.isbn).await? {
            return Err(AppError::InvalidRequest(format!(
                "Book {} already exists",
                data.isbn
            )));
        }

        if let Some(library_id) = data.library_id {
            if !self.repository.libraries.exists(&mut *tx, library_id).await? {
                return Err(AppError::InvalidRequest(format!(
                    "Library {} does not exist",
                    library_id
                )));
            }
        }

        let book = Book::from(data);
        self.repository.books.insert(&mut *tx, &book).await?;
        tx.commit().await?;

        tracing::info!(
            "Created book isbn={} library={:?}",
            book.isbn,
            book.library_id
        );
        Ok(book)
    }

    /// Apply a partial update. A `library_id` in the request moves the book
    /// to that library; without one the current association is kept.
    pub async fn update(&self, isbn: &str, data: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.repository.begin().await?;

        let mut book = self
            .repository
            .books
            .find(&mut *tx, isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", isbn)))?;

        data.apply_to(&mut book);

        if let Some(library_id) = data.target_library() {
            if !self.repository.libraries.exists(&mut *tx, library_id).await? {
                return Err(AppError::InvalidRequest(format!(
                    "Library {} does not exist",
                    library_id
                )));
            }

            match book.library_id {
                Some(previous) if previous != library_id => {
                    tracing::debug!(
                        "Moving book {} from library {} to library {}",
                        isbn,
                        previous,
                        library_id
                    );
                }
                None => tracing::debug!("Attaching book {} to library {}", isbn, library_id),
                _ => {}
            }
            book.library_id = Some(library_id);
        }

        self.repository.books.save(&mut *tx, &book).await?;
        tx.commit().await?;

        Ok(book)
    }

    /// Delete a book. A missing book is a bad delete, not a not-found.
    pub async fn delete(&self, isbn: &str) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;

        let book = self
            .repository
            .books
            .find(&mut *tx, isbn)
            .await?
            .ok_or_else(|| AppError::BadDelete(format!("Book {} does not exist", isbn)))?;

        if let Some(library_id) = book.library_id {
            tracing::debug!("Detaching book {} from library {}", isbn, library_id);
        }

        self.repository.books.delete(&mut *tx, isbn).await?;
        tx.commit().await?;

        tracing::info!("Deleted book isbn={}", isbn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_repository;
    use serde_json::json;

    fn create_request(isbn: &str, library_id: Option<i64>) -> CreateBook {
        CreateBook {
            isbn: isbn.to_string(),
            name: Some("book-1".to_string()),
            author_name: Some("author-1".to_string()),
            publication_year: Some(2018),
            selling_price: Some(250.0),
            library_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repository = test_repository().await;
        let service = BooksService::new(repository);

        let created = service.create(create_request("111", None)).await.unwrap();
        assert_eq!(created.library_id, None);

        let fetched = service.get("111").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_isbn_leaves_original() {
        let repository = test_repository().await;
        let service = BooksService::new(repository);

        service.create(create_request("111", None)).await.unwrap();

        let mut duplicate = create_request("111", None);
        duplicate.name = Some("other".to_string());
        let err = service.create(duplicate).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let stored = service.get("111").await.unwrap();
        assert_eq!(stored.name.as_deref(), Some("book-1"));
    }

    #[tokio::test]
    async fn test_create_with_unknown_library_writes_nothing() {
        let repository = test_repository().await;
        let service = BooksService::new(repository);

        let err = service.create(create_request("111", Some(42))).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(matches!(service.get("111").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_moves_between_libraries() {
        let repository = test_repository().await;
        let first = repository.libraries.insert(&repository.pool, "library-1").await.unwrap();
        let second = repository.libraries.insert(&repository.pool, "library-2").await.unwrap();
        let service = BooksService::new(repository.clone());

        service.create(create_request("111", Some(first.id))).await.unwrap();

        let update: UpdateBook = serde_json::from_value(json!({ "library_id": second.id })).unwrap();
        let updated = service.update("111", &update).await.unwrap();
        assert_eq!(updated.library_id, Some(second.id));

        let in_first = repository.books.list_by_library(&repository.pool, first.id).await.unwrap();
        let in_second = repository.books.list_by_library(&repository.pool, second.id).await.unwrap();
        assert!(in_first.is_empty());
        assert_eq!(in_second.len(), 1);
    }

    #[tokio::test]
    async fn test_update_to_current_library_keeps_membership() {
        let repository = test_repository().await;
        let library = repository.libraries.insert(&repository.pool, "library-1").await.unwrap();
        let service = BooksService::new(repository.clone());

        let created = service.create(create_request("111", Some(library.id))).await.unwrap();

        let update: UpdateBook = serde_json::from_value(json!({ "library_id": library.id })).unwrap();
        let updated = service.update("111", &update).await.unwrap();
        assert_eq!(updated, created);

        let members = repository.books.list_by_library(&repository.pool, library.id).await.unwrap();
        let isbns: Vec<_> = members.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["111"]);
    }

    #[tokio::test]
    async fn test_null_library_id_keeps_current_library() {
        let repository = test_repository().await;
        let library = repository.libraries.insert(&repository.pool, "library-1").await.unwrap();
        let service = BooksService::new(repository.clone());

        service.create(create_request("111", Some(library.id))).await.unwrap();

        let update: UpdateBook =
            serde_json::from_value(json!({ "name": "renamed", "library_id": null })).unwrap();
        let updated = service.update("111", &update).await.unwrap();
        assert_eq!(updated.name.as_deref(), Some("renamed"));
        assert_eq!(updated.library_id, Some(library.id));

        let stored = service.get("111").await.unwrap();
        assert_eq!(stored.library_id, Some(library.id));
    }

    #[tokio::test]
    async fn test_update_with_unknown_library_is_rejected_without_write() {
        let repository = test_repository().await;
        let service = BooksService::new(repository);

        service.create(create_request("111", None)).await.unwrap();

        let update: UpdateBook =
            serde_json::from_value(json!({ "name": "renamed", "library_id": 99 })).unwrap();
        let err = service.update("111", &update).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let stored = service.get("111").await.unwrap();
        assert_eq!(stored.name.as_deref(), Some("book-1"));
        assert_eq!(stored.library_id, None);
    }

    #[tokio::test]
    async fn test_update_missing_book_is_not_found() {
        let repository = test_repository().await;
        let service = BooksService::new(repository);

        let err = service.update("nope", &UpdateBook::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_book_is_bad_delete() {
        let repository = test_repository().await;
        let service = BooksService::new(repository);

        let err = service.delete("nope").await.unwrap_err();
        assert!(matches!(err, AppError::BadDelete(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_from_library() {
        let repository = test_repository().await;
        let library = repository.libraries.insert(&repository.pool, "library-1").await.unwrap();
        let service = BooksService::new(repository.clone());

        service.create(create_request("111", Some(library.id))).await.unwrap();
        service.create(create_request("222", Some(library.id))).await.unwrap();
        service.delete("111").await.unwrap();

        let remaining = repository.books.list_by_library(&repository.pool, library.id).await.unwrap();
        let isbns: Vec<_> = remaining.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["222"]);
    }
}
