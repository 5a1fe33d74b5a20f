//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod apartment_repo;

pub use apartment_repo::ApartmentRepo;
