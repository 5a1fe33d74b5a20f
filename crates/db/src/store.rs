//! The listing store seam.
//!
//! Handlers talk to an [`ApartmentStore`] trait object. [`PgApartmentStore`]
//! delegates to [`ApartmentRepo`]; [`InMemoryApartmentStore`] keeps rows in a
//! `Vec` and evaluates searches with [`ListingFilter::matches`].
//!
//! [`ListingFilter::matches`]: listings_core::listing_search::ListingFilter::matches

use async_trait::async_trait;
use chrono::Utc;
use listings_core::listing_search::{ListingQuery, SortOrder};
use listings_core::types::DbId;
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::models::apartment::{Apartment, CreateApartment};
use crate::repositories::ApartmentRepo;
use crate::{DbPool, StoreError};

/// Storage operations behind the `/apartments` endpoints.
#[async_trait]
pub trait ApartmentStore: Send + Sync {
    /// Persist a new apartment, assigning its ID and timestamps.
    async fn create(&self, input: &CreateApartment) -> Result<Apartment, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Apartment>, StoreError>;

    /// Every apartment in insertion order.
    async fn find_all(&self) -> Result<Vec<Apartment>, StoreError>;

    /// Apartments satisfying the query's filter, ordered and paged.
    async fn find_matching(&self, query: &ListingQuery) -> Result<Vec<Apartment>, StoreError>;

    /// Full-record replace. Returns `None` if `id` is unknown.
    async fn update(
        &self,
        id: DbId,
        input: &CreateApartment,
    ) -> Result<Option<Apartment>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgApartmentStore {
    pool: DbPool,
}

impl PgApartmentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ApartmentStore for PgApartmentStore {
    async fn create(&self, input: &CreateApartment) -> Result<Apartment, StoreError> {
        Ok(ApartmentRepo::create(&self.pool, input).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Apartment>, StoreError> {
        Ok(ApartmentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_all(&self) -> Result<Vec<Apartment>, StoreError> {
        Ok(ApartmentRepo::list(&self.pool).await?)
    }

    async fn find_matching(&self, query: &ListingQuery) -> Result<Vec<Apartment>, StoreError> {
        Ok(ApartmentRepo::search(&self.pool, query).await?)
    }

    async fn update(
        &self,
        id: DbId,
        input: &CreateApartment,
    ) -> Result<Option<Apartment>, StoreError> {
        Ok(ApartmentRepo::update(&self.pool, id, input).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local store for development without a database and for tests.
///
/// Rows are kept in ascending ID order; IDs are never reused.
#[derive(Default)]
pub struct InMemoryApartmentStore {
    inner: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: DbId,
    rows: Vec<Apartment>,
}

impl InMemoryApartmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_row(id: DbId, input: &CreateApartment, created_at: listings_core::types::Timestamp) -> Apartment {
    Apartment {
        id,
        unit_name: input.unit_name.clone(),
        unit_number: input.unit_number.clone(),
        project: input.project.clone(),
        description: input.description.clone(),
        price: input.price,
        bedrooms: input.bedrooms,
        bathrooms: input.bathrooms,
        area: input.area,
        property_type: input.property_type.clone(),
        amenities: input.amenities.clone(),
        featured: input.featured,
        images: input.images.clone(),
        location: input.location.clone().map(Json),
        created_at,
        updated_at: Utc::now().max(created_at),
    }
}

fn sort_rows(rows: &mut [Apartment], sort: SortOrder) {
    match sort {
        SortOrder::Insertion => rows.sort_by_key(|a| a.id),
        SortOrder::PriceAsc => {
            rows.sort_by(|a, b| a.price.total_cmp(&b.price).then(a.id.cmp(&b.id)))
        }
        SortOrder::PriceDesc => {
            rows.sort_by(|a, b| b.price.total_cmp(&a.price).then(a.id.cmp(&b.id)))
        }
        SortOrder::Newest => {
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
        }
    }
}

#[async_trait]
impl ApartmentStore for InMemoryApartmentStore {
    async fn create(&self, input: &CreateApartment) -> Result<Apartment, StoreError> {
        let mut state = self.inner.write().await;
        state.last_id += 1;
        let row = to_row(state.last_id, input, Utc::now());
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Apartment>, StoreError> {
        let state = self.inner.read().await;
        Ok(state.rows.iter().find(|a| a.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Apartment>, StoreError> {
        Ok(self.inner.read().await.rows.clone())
    }

    async fn find_matching(&self, query: &ListingQuery) -> Result<Vec<Apartment>, StoreError> {
        let state = self.inner.read().await;
        let mut matched: Vec<Apartment> = state
            .rows
            .iter()
            .filter(|a| query.filter.matches(&a.view()))
            .cloned()
            .collect();
        drop(state);

        sort_rows(&mut matched, query.sort);

        let offset = usize::try_from(query.page.offset).unwrap_or(usize::MAX);
        let limit = query
            .page
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(
        &self,
        id: DbId,
        input: &CreateApartment,
    ) -> Result<Option<Apartment>, StoreError> {
        let mut state = self.inner.write().await;
        let Some(slot) = state.rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        *slot = to_row(id, input, slot.created_at);
        Ok(Some(slot.clone()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use listings_core::listing_search::{ListingSearchParams, SearchMode};

    use super::*;

    fn apartment(unit_name: &str, project: &str, price: f64, bedrooms: i32) -> CreateApartment {
        CreateApartment {
            unit_name: unit_name.to_string(),
            unit_number: format!("U-{bedrooms}"),
            project: project.to_string(),
            description: String::new(),
            price,
            bedrooms,
            bathrooms: 1.0,
            area: 80.0,
            property_type: "Apartment".to_string(),
            amenities: vec!["Gym".to_string()],
            featured: false,
            images: Vec::new(),
            location: None,
        }
    }

    async fn seeded() -> InMemoryApartmentStore {
        let store = InMemoryApartmentStore::new();
        for input in [
            apartment("Sunset Villa", "Coastal Heights", 3_500_000.0, 5),
            apartment("Urban Loft", "Downtown Residences", 750_000.0, 2),
            apartment("Garden Villa", "Green Park", 1_500_000.0, 4),
            apartment("Studio", "Villa Gardens", 1_000_000.0, 1),
        ] {
            store.create(&input).await.unwrap();
        }
        store
    }

    fn query(params: ListingSearchParams) -> ListingQuery {
        ListingQuery::from_params(&params, SearchMode::Combined).unwrap()
    }

    fn names(rows: &[Apartment]) -> Vec<&str> {
        rows.iter().map(|a| a.unit_name.as_str()).collect()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_timestamps() {
        let store = InMemoryApartmentStore::new();
        let first = store.create(&apartment("A", "P", 1.0, 1)).await.unwrap();
        let second = store.create(&apartment("B", "P", 1.0, 1)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.created_at <= first.updated_at);
    }

    #[tokio::test]
    async fn find_by_id_returns_created_row() {
        let store = seeded().await;
        let created = store
            .create(&apartment("Penthouse", "Sky Tower", 9_000_000.0, 4))
            .await
            .unwrap();
        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = seeded().await;
        assert_eq!(store.find_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = seeded().await;
        let all = store.find_all().await.unwrap();
        assert_eq!(
            names(&all),
            ["Sunset Villa", "Urban Loft", "Garden Villa", "Studio"]
        );
    }

    #[tokio::test]
    async fn empty_query_returns_everything() {
        let store = seeded().await;
        let rows = store
            .find_matching(&query(ListingSearchParams::default()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[tokio::test]
    async fn search_term_matches_name_or_project() {
        let store = seeded().await;
        let rows = store
            .find_matching(&query(ListingSearchParams {
                search: Some("villa".into()),
                ..ListingSearchParams::default()
            }))
            .await
            .unwrap();
        assert_eq!(names(&rows), ["Sunset Villa", "Garden Villa", "Studio"]);
    }

    #[tokio::test]
    async fn price_range_is_inclusive() {
        let store = seeded().await;
        let rows = store
            .find_matching(&query(ListingSearchParams {
                price_min: Some("1000000".into()),
                price_max: Some("2000000".into()),
                ..ListingSearchParams::default()
            }))
            .await
            .unwrap();
        assert_eq!(names(&rows), ["Garden Villa", "Studio"]);
    }

    #[tokio::test]
    async fn sort_and_page_apply_after_filtering() {
        let store = seeded().await;
        let rows = store
            .find_matching(&query(ListingSearchParams {
                bedrooms: Some("2".into()),
                sort: Some("price_desc".into()),
                limit: Some("2".into()),
                offset: Some("1".into()),
                ..ListingSearchParams::default()
            }))
            .await
            .unwrap();
        assert_eq!(names(&rows), ["Garden Villa", "Urban Loft"]);
    }

    #[tokio::test]
    async fn newest_puts_latest_insert_first() {
        let store = seeded().await;
        let rows = store
            .find_matching(&query(ListingSearchParams {
                sort: Some("newest".into()),
                ..ListingSearchParams::default()
            }))
            .await
            .unwrap();
        assert_eq!(rows.first().map(|a| a.id), Some(4));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() {
        let store = seeded().await;
        let before = store.find_by_id(2).await.unwrap().unwrap();

        let updated = store
            .update(2, &apartment("Urban Loft II", "Downtown Residences", 800_000.0, 3))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, 2);
        assert_eq!(updated.unit_name, "Urban Loft II");
        assert_eq!(updated.bedrooms, 3);
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(store.find_by_id(2).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = seeded().await;
        let result = store
            .update(42, &apartment("Ghost", "Nowhere", 1.0, 1))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
