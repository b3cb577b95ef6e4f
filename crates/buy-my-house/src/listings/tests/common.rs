use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::RepositoryError;
use crate::listings::domain::{House, HouseId, PriceRange};
use crate::listings::repository::{HouseRepository, InMemoryHouseRepository};
use crate::listings::{listing_router, ListingService};

pub(super) fn house(id: u32, city: &str, price: i64) -> House {
    House {
        id: HouseId(id),
        address: format!("Teststraat {id}"),
        city: city.to_string(),
        price: Decimal::from(price),
        bedrooms: 2,
        bathrooms: 1,
        square_meters: 80,
        description: format!("Listing {id} in {city}"),
        listed_date: Utc
            .with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
        is_available: true,
    }
}

/// Inserted out of price order so ordering assertions mean something.
pub(super) fn catalogue() -> Vec<House> {
    vec![
        house(1, "Amsterdam", 450_000),
        house(2, "Haarlem", 350_000),
        house(3, "Utrecht", 525_000),
        house(4, "Leiden", 350_000),
        house(5, "Delft", 299_999),
    ]
}

pub(super) fn build_service() -> (
    ListingService<InMemoryHouseRepository>,
    InMemoryHouseRepository,
) {
    let repository = InMemoryHouseRepository::with_houses(catalogue()).expect("seed succeeds");
    (ListingService::new(Arc::new(repository.clone())), repository)
}

pub(super) fn router_with_service(
    service: ListingService<InMemoryHouseRepository>,
) -> axum::Router {
    listing_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

impl HouseRepository for UnavailableRepository {
    fn all(&self) -> Result<Vec<House>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_id(&self, _id: HouseId) -> Result<Option<House>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_price_range(&self, _range: PriceRange) -> Result<Vec<House>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _house: House) -> Result<House, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn ids(houses: &[House]) -> Vec<u32> {
    houses.iter().map(|house| house.id.0).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
