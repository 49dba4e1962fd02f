//! Book endpoints
//!
//! Every handler reports server-side failures once, with the operation and
//! book id, before the error is rendered as a generic 500.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{Book, BookListQuery, BookPage},
    services::books::require_book,
    AppState,
};

/// Log a failed operation and hand the error back for rendering
fn report<'a>(
    operation: &'static str,
    id: Option<&'a str>,
) -> impl FnOnce(AppError) -> AppError + 'a {
    move |err| {
        match (err.is_server_error(), id) {
            (true, Some(id)) => {
                tracing::error!(error = ?err, book_id = %id, "Error occurred while {}", operation)
            }
            (true, None) => tracing::error!(error = ?err, "Error occurred while {}", operation),
            (false, _) => tracing::warn!("Rejected request while {}: {}", operation, err),
        }
        err
    }
}

/// Location of the get-by-id endpoint for a book
pub fn book_location(id: &str) -> String {
    format!("/api/books/{}", id)
}

/// List books page by page
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Page of books with the total count", body = BookPage),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookListQuery>,
) -> AppResult<Json<BookPage>> {
    let page_number = query.page_number.unwrap_or(1);
    let page_size = query
        .page_size
        .unwrap_or(state.config.pagination.default_page_size);

    if page_number < 1 || page_size < 1 {
        return Err(AppError::InvalidArgument(
            "pageNumber and pageSize must be positive integers".to_string(),
        ));
    }

    let page = state
        .services
        .books
        .list(page_number, page_size)
        .await
        .map_err(report("getting all books", None))?;
    Ok(Json(page))
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let book = state
        .services
        .books
        .get_by_id(&id)
        .await
        .map_err(report("getting book", Some(id.as_str())))?;

    Ok(match book {
        Some(book) => Json(book).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", body = Book,
            headers(("location" = String, description = "URL of the new book"))),
        (status = 400, description = "Missing or invalid book", body = ErrorResponse),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Option<Json<Book>>,
) -> AppResult<Response> {
    let created = state
        .services
        .books
        .create(payload.map(|Json(book)| book))
        .await
        .map_err(report("creating a new book", None))?;

    let location = created.id.as_deref().map(book_location).ok_or_else(|| {
        report("creating a new book", None)(AppError::Internal(
            "Store did not assign an id".to_string(),
        ))
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    )
        .into_response())
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    request_body = Book,
    responses(
        (status = 204, description = "Book updated"),
        (status = 400, description = "Missing or invalid book", body = ErrorResponse),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Option<Json<Book>>,
) -> AppResult<StatusCode> {
    let books = &state.services.books;
    let book = require_book(payload.map(|Json(book)| book))
        .map_err(report("updating book", Some(id.as_str())))?;

    // The check and the replace are separate store calls; a concurrent delete
    // in between turns the replace into a no-op.
    let existing = books
        .get_by_id(&id)
        .await
        .map_err(report("updating book", Some(id.as_str())))?;
    if existing.is_none() {
        return Ok(StatusCode::NOT_FOUND);
    }

    books
        .update(&id, Some(book))
        .await
        .map_err(report("updating book", Some(id.as_str())))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let books = &state.services.books;

    let existing = books
        .get_by_id(&id)
        .await
        .map_err(report("deleting book", Some(id.as_str())))?;
    if existing.is_none() {
        return Ok(StatusCode::NOT_FOUND);
    }

    books
        .delete(&id)
        .await
        .map_err(report("deleting book", Some(id.as_str())))?;
    Ok(StatusCode::NO_CONTENT)
}
