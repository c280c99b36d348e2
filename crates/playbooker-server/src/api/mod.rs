pub mod sessions;

use axum::Router;

use playbooker_core::state::AppState;

/// Build the complete API router with all sub-routes.
pub fn api_router() -> Router<AppState> {
    Router::new().nest("/api/sessions", sessions::router())
}
