//! Route definitions for the `/apartments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::apartment;
use crate::state::AppState;

/// Routes mounted at `/apartments`.
///
/// ```text
/// GET    /        -> list (or search when query parameters are present)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(apartment::list).post(apartment::create))
        .route("/{id}", get(apartment::get_by_id).put(apartment::update))
}
