use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
    http::StatusCode,
};
use crate::server::AppState;
use crate::service::BookService;
use crate::{Book, Error};
use std::sync::Arc;

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Run a service call on the blocking pool; storage access is synchronous
async fn run<T, F>(state: &AppState, op: F) -> crate::Result<T>
where
    F: FnOnce(&BookService) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || op(&service)).await?
}

/// 500 with a fixed message; the cause is only logged
fn storage_failure(action: &str, e: Error, message: &str) -> (StatusCode, String) {
    tracing::error!("Failed to {}: {}", action, e);
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

fn mutation_failure(action: &str, e: Error, message: &str) -> (StatusCode, String) {
    match e {
        Error::Validation(v) => (StatusCode::BAD_REQUEST, v.to_string()),
        other => storage_failure(action, other, message),
    }
}

fn bad_json(rejection: JsonRejection) -> (StatusCode, String) {
    tracing::debug!("Rejected request body: {}", rejection);
    (StatusCode::BAD_REQUEST, rejection.body_text())
}

fn not_found(id: i64) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("Error! Book with id {} not found", id))
}

pub async fn hello() -> &'static str {
    "Hello, World"
}

pub async fn list_books(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Book>>> {
    run(&state, |service| service.list_all())
        .await
        .map(Json)
        .map_err(|e| storage_failure("list books", e, ""))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Book>> {
    match run(&state, move |service| service.get_by_id(id)).await {
        Ok(Some(book)) => Ok(Json(book)),
        Ok(None) => Err((StatusCode::NOT_FOUND, String::new())),
        Err(e) => Err(storage_failure("get book", e, "")),
    }
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Book>, JsonRejection>,
) -> ApiResult<(StatusCode, String)> {
    let Json(book) = payload.map_err(bad_json)?;

    let id = run(&state, move |service| service.create(&book))
        .await
        .map_err(|e| mutation_failure("add book", e, "Error! Book could not be added"))?;

    Ok((StatusCode::CREATED, id.to_string()))
}

pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<Book>, JsonRejection>,
) -> (StatusCode, String) {
    let book = match payload {
        Ok(Json(book)) => book,
        Err(rejection) => return bad_json(rejection),
    };

    match run(&state, move |service| service.update(id, &book)).await {
        Ok(true) => (StatusCode::OK, "Book updated successfully!".to_string()),
        Ok(false) => not_found(id),
        Err(e) => mutation_failure("update book", e, "Error! Book could not be updated"),
    }
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> (StatusCode, String) {
    match run(&state, move |service| service.delete(id)).await {
        Ok(true) => (StatusCode::OK, "Book deleted".to_string()),
        Ok(false) => not_found(id),
        Err(e) => storage_failure("delete book", e, "Error! Book could not be deleted"),
    }
}
