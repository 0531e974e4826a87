//! HTTP handlers for the books resource.
//!
//! Only `GET /{id}` checks for existence and answers 404. `PUT` and `DELETE`
//! hand the id straight to the store, so a missing book surfaces as the
//! store's error (500).

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bookshelf_http::{AppResult, ValidatedJson, ValidatedPath};

use super::models::{Book, BookIdParam, BookInput, NotFoundBody};
use super::store::SharedBookStore;

/// Books routes, relative to the module mount path.
pub fn router(store: SharedBookStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(store)
}

async fn create_book(
    State(store): State<SharedBookStore>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = store.create(&input).await?;
    tracing::info!(book_id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(State(store): State<SharedBookStore>) -> AppResult<Json<Vec<Book>>> {
    let books = store.find_many().await?;
    Ok(Json(books))
}

async fn get_book(
    State(store): State<SharedBookStore>,
    ValidatedPath(param): ValidatedPath<BookIdParam>,
) -> AppResult<Response> {
    let id = param.id()?;
    match store.find_unique(id).await? {
        Some(book) => Ok(Json(book).into_response()),
        None => {
            tracing::debug!(book_id = id, "book not found");
            Ok((StatusCode::NOT_FOUND, Json(NotFoundBody::book())).into_response())
        }
    }
}

async fn update_book(
    State(store): State<SharedBookStore>,
    ValidatedPath(param): ValidatedPath<BookIdParam>,
    ValidatedJson(input): ValidatedJson<BookInput>,
) -> AppResult<Json<Book>> {
    let id = param.id()?;
    let book = store.update(id, &input).await?;
    tracing::info!(book_id = book.id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(store): State<SharedBookStore>,
    ValidatedPath(param): ValidatedPath<BookIdParam>,
) -> AppResult<StatusCode> {
    let id = param.id()?;
    store.delete(id).await?;
    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
