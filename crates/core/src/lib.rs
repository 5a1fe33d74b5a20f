//! Listing domain types and search logic.
//!
//! This crate has no internal dependencies so the storage and HTTP layers
//! can share one interpretation of a listing search.

pub mod error;
pub mod listing_search;
pub mod numeric;
pub mod types;
