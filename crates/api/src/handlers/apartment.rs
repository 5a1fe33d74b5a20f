//! Handlers for the `/apartments` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use listings_core::error::CoreError;
use listings_core::listing_search::{ListingQuery, ListingSearchParams};
use listings_core::types::DbId;
use listings_db::models::apartment::{Apartment, CreateApartment};

use crate::error::{AppError, AppResult};
use crate::extractors::{ApiPath, ApiQuery, ValidatedJson};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Apartment",
        id,
    })
}

/// POST /apartments
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateApartment>,
) -> AppResult<(StatusCode, Json<Apartment>)> {
    let apartment = state.store.create(&input).await?;
    tracing::info!(id = apartment.id, unit_name = %apartment.unit_name, "Apartment created");
    Ok((StatusCode::CREATED, Json(apartment)))
}

/// GET /apartments
///
/// Without query parameters every listing is returned in insertion order.
/// Any filter, sort or paging parameter routes through the listing search.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListingSearchParams>,
) -> AppResult<Json<Vec<Apartment>>> {
    if params.is_empty() {
        let apartments = state.store.find_all().await?;
        return Ok(Json(apartments));
    }

    let query = ListingQuery::from_params(&params, state.config.search_mode)?;
    let apartments = state.store.find_matching(&query).await?;

    tracing::debug!(
        filter = ?query.filter,
        sort = ?query.sort,
        results = apartments.len(),
        "Apartment search"
    );

    Ok(Json(apartments))
}

/// GET /apartments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Apartment>> {
    let apartment = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(apartment))
}

/// PUT /apartments/{id}
///
/// Full-record replace; `id` and `createdAt` are kept.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ValidatedJson(input): ValidatedJson<CreateApartment>,
) -> AppResult<Json<Apartment>> {
    let apartment = state
        .store
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(id, "Apartment updated");
    Ok(Json(apartment))
}
