use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::health::health_handler;

pub(crate) mod account;
pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api/account", account::router())
        .nest("/api/posts", posts::router(state))
}
