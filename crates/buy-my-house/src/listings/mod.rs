//! House listings: storage, price search, and CSV hydration.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{House, HouseId, HouseValidationError, PriceRange, MAX_DESCRIPTION_LEN};
pub use import::{HouseImporter, ListingImportError};
pub use repository::{HouseRepository, InMemoryHouseRepository};
pub use router::{listing_router, PriceQuery};
pub use service::{ListingError, ListingService};
