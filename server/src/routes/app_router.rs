use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::{request_tracing::with_request_tracing, ServerState};

use super::handlers::rfq;

pub const BANNER: &str = "RFQ backend is running";

pub struct AppRouter;

impl AppRouter {
    pub fn create(state: ServerState) -> Router {
        let router = Router::new()
            .route("/", get(|| async { BANNER }))
            .nest(
                "/api",
                Router::new()
                    .route("/run_rfq", get(rfq::run_rfq))
                    .route("/get_rfq_status", get(rfq::get_rfq_status)),
            )
            .fallback(handler_404)
            .layer(CorsLayer::permissive());

        with_request_tracing(router).with_state(state)
    }
}

pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Route does not exist")
}
