use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_borrow, get_book, get_eligibility, get_reader, list_reader_borrows,
    put_book, put_reader,
};

/// Creates the API router with all library borrowing endpoints
///
/// Command endpoints:
/// - POST /borrows - Borrow a book
/// - PUT /readers/:id - Register or update a reader
/// - PUT /books/:id - Register or update a catalog entry
///
/// Query endpoints:
/// - GET /readers/:id, GET /readers/:id/borrows
/// - GET /books/:id, GET /books/:id/eligibility?reader_id=
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/borrows", post(create_borrow))
        .route("/readers/:id", get(get_reader).put(put_reader))
        .route("/readers/:id/borrows", get(list_reader_borrows))
        .route("/books/:id", get(get_book).put(put_book))
        .route("/books/:id/eligibility", get(get_eligibility))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
