use axum::{Router, routing::get};
use std::sync::Arc;

use crate::search::SearchClient;

pub mod handlers;
pub mod models;

pub fn create_router(client: Arc<SearchClient>) -> Router {
    Router::new()
        .route("/search/do", get(handlers::search_handler))
        .with_state(client)
}
