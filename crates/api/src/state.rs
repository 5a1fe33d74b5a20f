use std::sync::Arc;

use listings_db::ApartmentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Apartment listing store (PostgreSQL or in-memory).
    pub store: Arc<dyn ApartmentStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
