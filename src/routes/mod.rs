pub mod api;

use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::router())
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
