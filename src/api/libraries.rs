//! Library endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::library::{CreateLibrary, LibraryDetails},
    AppState,
};

use super::{LibraryId, ValidatedJson};

/// List all libraries with their books
#[utoipa::path(
    get,
    path = "/libraries",
    tag = "libraries",
    responses(
        (status = 200, description = "All libraries", body = Vec<LibraryDetails>)
    )
)]
pub async fn list_libraries(State(state): State<AppState>) -> AppResult<Json<Vec<LibraryDetails>>> {
    let libraries = state.services.libraries.list().await?;
    Ok(Json(libraries))
}

/// Get a library by ID
#[utoipa::path(
    get,
    path = "/libraries/{id}",
    tag = "libraries",
    params(("id" = i64, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library details", body = LibraryDetails),
        (status = 404, description = "Library not found")
    )
)]
pub async fn get_library(
    State(state): State<AppState>,
    LibraryId(id): LibraryId,
) -> AppResult<Json<LibraryDetails>> {
    let library = state.services.libraries.get(id).await?;
    Ok(Json(library))
}

/// Create a library
#[utoipa::path(
    post,
    path = "/libraries",
    tag = "libraries",
    request_body = CreateLibrary,
    responses(
        (status = 201, description = "Library created", body = LibraryDetails)
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CreateLibrary>,
) -> AppResult<(StatusCode, Json<LibraryDetails>)> {
    let library = state.services.libraries.create(&data).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

/// Delete a library, detaching its books
#[utoipa::path(
    delete,
    path = "/libraries/{id}",
    tag = "libraries",
    params(("id" = i64, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Library deleted"),
        (status = 400, description = "Library does not exist")
    )
)]
pub async fn delete_library(
    State(state): State<AppState>,
    LibraryId(id): LibraryId,
) -> AppResult<StatusCode> {
    state.services.libraries.delete(id).await?;
    Ok(StatusCode::OK)
}
