//! API handlers for the library REST endpoints

pub mod books;
pub mod health;
pub mod libraries;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, Method},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::Validate;

use crate::{error::AppError, AppState};

/// JSON body extractor that also runs `validator` checks.
///
/// Malformed bodies and failed validations are both rejected as
/// [`AppError::InvalidRequest`].
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Library id taken from the `:id` path segment.
///
/// An id that is not a valid integer cannot name an existing library, so it
/// is reported like a missing one: [`AppError::BadDelete`] on `DELETE`,
/// [`AppError::NotFound`] otherwise.
pub struct LibraryId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for LibraryId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let deleting = parts.method == Method::DELETE;
        let missing = |message: String| {
            if deleting {
                AppError::BadDelete(message)
            } else {
                AppError::NotFound(message)
            }
        };

        let raw = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw,
            Err(rejection) => return Err(missing(rejection.body_text())),
        };

        raw.parse::<i64>()
            .map(LibraryId)
            .map_err(|_| missing(format!("Library {} does not exist", raw)))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:isbn",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Libraries
        .route(
            "/libraries",
            get(libraries::list_libraries).post(libraries::create_library),
        )
        .route(
            "/libraries/:id",
            get(libraries::get_library).delete(libraries::delete_library),
        )
        // OpenAPI documentation
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
