use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseId(pub u32);

impl fmt::Display for HouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A house advertised for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct House {
    pub id: HouseId,
    pub address: String,
    pub city: String,
    pub price: Decimal,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub square_meters: u32,
    pub description: String,
    pub listed_date: DateTime<Utc>,
    pub is_available: bool,
}

impl House {
    pub fn validate(&self) -> Result<(), HouseValidationError> {
        if self.id.0 == 0 {
            return Err(HouseValidationError::MissingId);
        }
        if self.price < Decimal::ZERO {
            return Err(HouseValidationError::NegativePrice(self.price));
        }
        let length = self.description.chars().count();
        if length > MAX_DESCRIPTION_LEN {
            return Err(HouseValidationError::DescriptionTooLong(length));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HouseValidationError {
    #[error("house id must be a positive integer")]
    MissingId,
    #[error("price must not be negative (got {0})")]
    NegativePrice(Decimal),
    #[error("description is {0} characters; the limit is 1000")]
    DescriptionTooLong(usize),
}

/// Inclusive price bounds; a missing maximum means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl PriceRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Option<Self> {
        let min = min.unwrap_or(Decimal::ZERO);
        if min < Decimal::ZERO {
            return None;
        }
        match max {
            Some(max) if max < Decimal::ZERO || min > max => None,
            _ => Some(Self { min, max }),
        }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}
