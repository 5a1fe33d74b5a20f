//! Repository for the `apartments` table.

use listings_core::listing_search::{like_pattern, ListingFilter, ListingQuery, SortOrder};
use listings_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::apartment::{Apartment, CreateApartment};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for SELECT/RETURNING.
const COLUMNS: &str = "\
    id, unit_name, unit_number, project, description, price, bedrooms, \
    bathrooms, area, property_type, amenities, featured, images, location, \
    created_at, updated_at";

/// Column list for INSERT (excludes `id` and the timestamps).
const INSERT_COLUMNS: &str = "\
    unit_name, unit_number, project, description, price, bedrooms, \
    bathrooms, area, property_type, amenities, featured, images, location";

// ---------------------------------------------------------------------------
// ApartmentRepo
// ---------------------------------------------------------------------------

/// Provides create, lookup, search and update operations for apartments.
pub struct ApartmentRepo;

impl ApartmentRepo {
    /// Insert a new apartment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateApartment) -> Result<Apartment, sqlx::Error> {
        let query = format!(
            "INSERT INTO apartments ({INSERT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(&input.unit_name)
            .bind(&input.unit_number)
            .bind(&input.project)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.area)
            .bind(&input.property_type)
            .bind(&input.amenities)
            .bind(input.featured)
            .bind(&input.images)
            .bind(input.location.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find an apartment by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id = $1");
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all apartments in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Apartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM apartments ORDER BY id ASC");
        sqlx::query_as::<_, Apartment>(&query).fetch_all(pool).await
    }

    /// List apartments matching a listing search, ordered and paged.
    pub async fn search(pool: &PgPool, params: &ListingQuery) -> Result<Vec<Apartment>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_listing_filter(&params.filter);
        let order_by = order_by_clause(params.sort);

        let mut query = format!(
            "SELECT {COLUMNS} FROM apartments {where_clause} ORDER BY {order_by} OFFSET ${bind_idx}"
        );
        if params.page.limit.is_some() {
            query.push_str(&format!(" LIMIT ${}", bind_idx + 1));
        }

        let mut q = bind_listing_values(sqlx::query_as::<_, Apartment>(&query), &bind_values)
            .bind(params.page.offset);
        if let Some(limit) = params.page.limit {
            q = q.bind(limit);
        }
        q.fetch_all(pool).await
    }

    /// Replace every mutable field of an apartment.
    ///
    /// `id` and `created_at` are preserved; `updated_at` is refreshed by the
    /// table trigger. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateApartment,
    ) -> Result<Option<Apartment>, sqlx::Error> {
        let query = format!(
            "UPDATE apartments SET
                unit_name = $2,
                unit_number = $3,
                project = $4,
                description = $5,
                price = $6,
                bedrooms = $7,
                bathrooms = $8,
                area = $9,
                property_type = $10,
                amenities = $11,
                featured = $12,
                images = $13,
                location = $14
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Apartment>(&query)
            .bind(id)
            .bind(&input.unit_name)
            .bind(&input.unit_number)
            .bind(&input.project)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.area)
            .bind(&input.property_type)
            .bind(&input.amenities)
            .bind(input.featured)
            .bind(&input.images)
            .bind(input.location.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built listing queries.
#[derive(Debug, PartialEq)]
enum BindValue {
    BigInt(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

/// Build a WHERE clause and bind values from a [`ListingFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_listing_filter(filter: &ListingFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref term) = filter.search {
        conditions.push(format!(
            "(unit_name ILIKE ${bind_idx} OR unit_number ILIKE ${bind_idx} OR project ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(like_pattern(term)));
    }

    for (column, term) in [
        ("unit_name", &filter.unit_name),
        ("unit_number", &filter.unit_number),
        ("project", &filter.project),
    ] {
        if let Some(term) = term {
            conditions.push(format!("{column} ILIKE ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Text(like_pattern(term)));
        }
    }

    if let Some(ref property_type) = filter.property_type {
        conditions.push(format!("property_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(property_type.clone()));
    }

    if let Some(min) = filter.min_bedrooms {
        conditions.push(format!("bedrooms >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(min));
    }

    if let Some(min) = filter.min_bathrooms {
        conditions.push(format!("bathrooms >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Float(min));
    }

    if let Some(range) = filter.price {
        conditions.push(format!("price >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Float(range.min));

        if let Some(max) = range.max {
            conditions.push(format!("price <= ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Float(max));
        }
    }

    if let Some(featured) = filter.featured {
        conditions.push(format!("featured = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(featured));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

fn order_by_clause(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Insertion => "id ASC",
        SortOrder::PriceAsc => "price ASC, id ASC",
        SortOrder::PriceDesc => "price DESC, id ASC",
        SortOrder::Newest => "created_at DESC, id DESC",
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_listing_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Float(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}
