//! Apartment entity model and DTOs.

use listings_core::listing_search::ListingView;
use listings_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// Geographic position and street address of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub address: String,
}

/// An apartment row from the `apartments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: DbId,
    pub unit_name: String,
    pub unit_number: String,
    pub project: String,
    pub description: String,
    pub price: f64,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub area: f64,
    pub property_type: String,
    pub amenities: Vec<String>,
    pub featured: bool,
    pub images: Vec<String>,
    pub location: Option<Json<Location>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Apartment {
    /// The fields a listing search inspects.
    pub fn view(&self) -> ListingView<'_> {
        ListingView {
            unit_name: &self.unit_name,
            unit_number: &self.unit_number,
            project: &self.project,
            property_type: &self.property_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            price: self.price,
            featured: self.featured,
        }
    }
}

/// DTO for creating an apartment, also used for full-record updates.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApartment {
    #[validate(length(min = 1, message = "unitName must not be empty"))]
    pub unit_name: String,
    #[validate(length(min = 1, message = "unitNumber must not be empty"))]
    pub unit_number: String,
    #[validate(length(min = 1, message = "project must not be empty"))]
    pub project: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must be non-negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "bedrooms must be non-negative"))]
    pub bedrooms: i32,
    #[validate(range(min = 0.0, message = "bathrooms must be non-negative"))]
    pub bathrooms: f64,
    #[validate(range(min = 0.0, message = "area must be non-negative"))]
    pub area: f64,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(nested)]
    pub location: Option<Location>,
}
