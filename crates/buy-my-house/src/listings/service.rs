use std::sync::Arc;

use rust_decimal::Decimal;

use super::domain::{House, HouseId, HouseValidationError, PriceRange};
use super::repository::HouseRepository;
use crate::error::RepositoryError;

/// Read and write operations over the listing store.
pub struct ListingService<R> {
    repository: Arc<R>,
}

impl<R> ListingService<R>
where
    R: HouseRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn all(&self) -> Result<Vec<House>, ListingError> {
        Ok(self.repository.all()?)
    }

    pub fn get(&self, id: HouseId) -> Result<House, ListingError> {
        self.repository.by_id(id)?.ok_or(ListingError::NotFound(id))
    }

    /// Houses priced between the bounds (inclusive). Missing bounds default to 0 and unbounded.
    pub fn search(
        &self,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
    ) -> Result<Vec<House>, ListingError> {
        let range = PriceRange::new(min_price, max_price).ok_or(ListingError::InvalidPriceRange)?;
        Ok(self.repository.by_price_range(range)?)
    }

    pub fn add(&self, house: House) -> Result<House, ListingError> {
        house.validate()?;
        Ok(self.repository.insert(house)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("House with ID {0} not found")]
    NotFound(HouseId),
    #[error("Invalid price range")]
    InvalidPriceRange,
    #[error(transparent)]
    Invalid(#[from] HouseValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
