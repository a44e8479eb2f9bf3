//! Library model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::LibraryBook;

/// Library record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i64,
    pub name: String,
}

/// Create library request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLibrary {
    #[validate(length(min = 1, message = "Library name must not be empty"))]
    pub name: String,
}

/// Library with the books currently referencing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LibraryDetails {
    pub id: i64,
    pub name: String,
    pub books: Vec<LibraryBook>,
}

impl LibraryDetails {
    pub fn new(library: Library, books: Vec<LibraryBook>) -> Self {
        Self {
            id: library.id,
            name: library.name,
            books,
        }
    }
}
