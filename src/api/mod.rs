pub mod health;
pub mod orders;
pub mod positions;
pub mod quotes;

use crate::config::Config;
use crate::db::Repository;
use crate::marketdata::QuoteSource;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub quotes: Arc<dyn QuoteSource>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config, quotes: Arc<dyn QuoteSource>) -> Self {
        Self {
            repo,
            config,
            quotes,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/orders",
            post(orders::submit_order).get(orders::list_orders),
        )
        .route("/v1/orders/:id/cancel", post(orders::cancel_order))
        .route("/v1/orders/:id", put(orders::amend_order))
        .route("/v1/quotes", get(quotes::get_quotes))
        .route("/v1/positions", get(positions::get_positions))
        .route(
            "/v1/positions/:ticker/breakdown",
            get(positions::get_breakdown),
        )
        .layer(cors)
        .with_state(state)
}
