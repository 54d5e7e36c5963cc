use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::rest::{self, AppState};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(rest::chat::chat))
        .route(
            "/chat/webhook",
            get(rest::chat::verify_webhook).post(rest::chat::receive_webhook),
        )
        .route("/generate", post(rest::chat::generate))
        .route("/products", get(rest::products::list_products))
        .route("/products/{id}", get(rest::products::get_product))
        .route("/carts", post(rest::carts::create_cart))
        .route(
            "/carts/{session_id}",
            get(rest::carts::get_cart)
                .patch(rest::carts::update_cart)
                .delete(rest::carts::delete_cart),
        )
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
