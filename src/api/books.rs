//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
    AppState,
};

use super::ValidatedJson;

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(&isbn).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "ISBN already exists or unknown library")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Partially update a book
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Unknown library"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    ValidatedJson(data): ValidatedJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(&isbn, &data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 400, description = "Book does not exist")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    state.services.books.delete(&isbn).await?;
    Ok(StatusCode::OK)
}
