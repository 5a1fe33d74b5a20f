pub mod apartment;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// ```text
/// /apartments          list / search, create
/// /apartments/{id}     get, update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/apartments", apartment::router())
}
