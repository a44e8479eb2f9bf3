//! Library management service

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::LibraryBook,
        library::{CreateLibrary, Library, LibraryDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LibrariesService {
    repository: Repository,
}

impl LibrariesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all libraries together with their books
    pub async fn list(&self) -> AppResult<Vec<LibraryDetails>> {
        let libraries = self.repository.libraries.list().await?;

        let mut books_by_library: HashMap<i64, Vec<LibraryBook>> = HashMap::new();
        for book in self.repository.books.list_attached().await? {
            if let Some(library_id) = book.library_id {
                books_by_library
                    .entry(library_id)
                    .or_default()
                    .push(LibraryBook::from(book));
            }
        }

        Ok(libraries
            .into_iter()
            .map(|library| {
                let books = books_by_library.remove(&library.id).unwrap_or_default();
                LibraryDetails::new(library, books)
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<LibraryDetails> {
        let library = self.repository.libraries.get_by_id(id).await?;
        let books = self
            .repository
            .books
            .list_by_library(&self.repository.pool, id)
            .await?
            .into_iter()
            .map(LibraryBook::from)
            .collect();
        Ok(LibraryDetails::new(library, books))
    }

    pub async fn create(&self, data: &CreateLibrary) -> AppResult<LibraryDetails> {
        let mut tx = self.repository.begin().await?;
        let library: Library = self.repository.libraries.insert(&mut *tx, &data.name).await?;
        tx.commit().await?;

        tracing::info!("Created library id={} name={}", library.id, library.name);
        Ok(LibraryDetails::new(library, Vec::new()))
    }

    /// Delete a library. Its books are detached, in insertion order, before
    /// the library row goes away; none of them is deleted.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;

        if !self.repository.libraries.exists(&mut *tx, id).await? {
            return Err(AppError::BadDelete(format!("Library {} does not exist", id)));
        }

        let books = self.repository.books.list_by_library(&mut *tx, id).await?;
        let detached = books.len();
        for mut book in books {
            tracing::debug!("Detaching book {} from library {}", book.isbn, id);
            book.library_id = None;
            self.repository.books.save(&mut *tx, &book).await?;
        }

        self.repository.libraries.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("Deleted library id={} ({} books detached)", id, detached);
        Ok(())
    }
}
