//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book record. Also the wire representation returned by `/books`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// ISBN, unique and immutable
    pub isbn: String,
    pub name: Option<String>,
    pub author_name: Option<String>,
    pub publication_year: Option<i32>,
    pub selling_price: Option<f64>,
    /// Owning library, omitted when the book is unattached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_id: Option<i64>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    pub name: Option<String>,
    pub author_name: Option<String>,
    pub publication_year: Option<i32>,
    pub selling_price: Option<f64>,
    pub library_id: Option<i64>,
}

impl From<CreateBook> for Book {
    fn from(data: CreateBook) -> Self {
        Self {
            isbn: data.isbn,
            name: data.name,
            author_name: data.author_name,
            publication_year: data.publication_year,
            selling_price: data.selling_price,
            library_id: data.library_id,
        }
    }
}

/// Update book request.
///
/// Every field distinguishes "absent" (`None`) from "explicit null"
/// (`Some(None)`). Both leave the stored value untouched; only
/// `Some(Some(value))` overwrites. The ISBN cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub author_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub publication_year: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>)]
    pub selling_price: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i64>)]
    pub library_id: Option<Option<i64>>,
}

impl UpdateBook {
    /// Overwrite the scalar fields that carry a value.
    /// `library_id` is left alone; moving between libraries is handled by
    /// the books service.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(Some(name)) = &self.name {
            book.name = Some(name.clone());
        }
        if let Some(Some(author_name)) = &self.author_name {
            book.author_name = Some(author_name.clone());
        }
        if let Some(Some(year)) = self.publication_year {
            book.publication_year = Some(year);
        }
        if let Some(Some(price)) = self.selling_price {
            book.selling_price = Some(price);
        }
    }

    /// Target library, if the request carries one
    pub fn target_library(&self) -> Option<i64> {
        self.library_id.flatten()
    }
}

/// Book as nested inside a library, without the back-reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LibraryBook {
    pub isbn: String,
    pub name: Option<String>,
    pub author_name: Option<String>,
    pub publication_year: Option<i32>,
    pub selling_price: Option<f64>,
}

impl From<Book> for LibraryBook {
    fn from(book: Book) -> Self {
        Self {
            isbn: book.isbn,
            name: book.name,
            author_name: book.author_name,
            publication_year: book.publication_year,
            selling_price: book.selling_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_book() -> Book {
        Book {
            isbn: "5589197551341".to_string(),
            name: Some("book-1".to_string()),
            author_name: Some("author-1".to_string()),
            publication_year: Some(2018),
            selling_price: Some(250.0),
            library_id: Some(1),
        }
    }

    #[test]
    fn test_update_distinguishes_absent_and_null() {
        let update: UpdateBook =
            serde_json::from_value(json!({ "name": null, "selling_price": 12.5 })).unwrap();
        assert_eq!(update.name, Some(None));
        assert_eq!(update.author_name, None);
        assert_eq!(update.selling_price, Some(Some(12.5)));
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let mut book = sample_book();
        let update: UpdateBook = serde_json::from_value(json!({
            "author_name": "author-1, author-2",
            "selling_price": 350.0,
            "name": null
        }))
        .unwrap();

        update.apply_to(&mut book);

        assert_eq!(book.name.as_deref(), Some("book-1"));
        assert_eq!(book.author_name.as_deref(), Some("author-1, author-2"));
        assert_eq!(book.publication_year, Some(2018));
        assert_eq!(book.selling_price, Some(350.0));
        assert_eq!(book.library_id, Some(1));
    }

    #[test]
    fn test_apply_ignores_library_id() {
        let mut book = sample_book();
        let update: UpdateBook = serde_json::from_value(json!({ "library_id": 7 })).unwrap();
        update.apply_to(&mut book);
        assert_eq!(book.library_id, Some(1));
        assert_eq!(update.target_library(), Some(7));
    }

    #[test]
    fn test_null_library_id_is_not_a_target() {
        let update: UpdateBook = serde_json::from_value(json!({ "library_id": null })).unwrap();
        assert_eq!(update.target_library(), None);
    }

    #[test]
    fn test_unattached_book_omits_library_id() {
        let mut book = sample_book();
        book.library_id = None;
        let value = serde_json::to_value(&book).unwrap();
        assert!(value.get("library_id").is_none());
        assert_eq!(value["isbn"], "5589197551341");
    }

    #[test]
    fn test_create_requires_isbn() {
        let result: Result<CreateBook, _> = serde_json::from_value(json!({ "name": "book-1" }));
        assert!(result.is_err());

        let empty: CreateBook = serde_json::from_value(json!({ "isbn": "" })).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_library_book_drops_back_reference() {
        let nested = LibraryBook::from(sample_book());
        let value = serde_json::to_value(&nested).unwrap();
        assert!(value.get("library_id").is_none());
        assert_eq!(value["name"], "book-1");
    }
}
