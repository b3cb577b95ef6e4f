use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use super::domain::{House, HouseId, HouseValidationError};

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Invalid { id: u32, reason: String },
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listing export: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listing CSV data: {}", err),
            ListingImportError::Invalid { id, reason } => {
                write!(f, "listing {} rejected: {}", id, reason)
            }
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads houses from a CSV export with the column names used by the listing store.
pub struct HouseImporter;

impl HouseImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<House>, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<House>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut houses = Vec::new();

        for record in csv_reader.deserialize::<HouseRow>() {
            let row = record?;
            let id = row.id;
            let house = row.into_house().map_err(|reason| ListingImportError::Invalid {
                id,
                reason: reason.to_string(),
            })?;
            houses.push(house);
        }

        Ok(houses)
    }
}

#[derive(Debug, Deserialize)]
struct HouseRow {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Bedrooms")]
    bedrooms: u8,
    #[serde(rename = "Bathrooms")]
    bathrooms: u8,
    #[serde(rename = "SquareMeters")]
    square_meters: u32,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "ListedDate")]
    listed_date: String,
    #[serde(
        rename = "IsAvailable",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    is_available: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error("price '{0}' is not a number")]
    Price(String),
    #[error("listed date '{0}' is not RFC 3339 or YYYY-MM-DD")]
    ListedDate(String),
    #[error("availability '{0}' is not true/false")]
    Availability(String),
    #[error(transparent)]
    Validation(#[from] HouseValidationError),
}

impl HouseRow {
    fn into_house(self) -> Result<House, RowError> {
        let price = self
            .price
            .parse::<Decimal>()
            .map_err(|_| RowError::Price(self.price.clone()))?;
        let listed_date = parse_datetime(&self.listed_date)
            .ok_or_else(|| RowError::ListedDate(self.listed_date.clone()))?;
        let is_available = match self.is_available.as_deref() {
            None => true,
            Some(value) => {
                parse_flag(value).ok_or_else(|| RowError::Availability(value.to_string()))?
            }
        };

        let house = House {
            id: HouseId(self.id),
            address: self.address,
            city: self.city,
            price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_meters: self.square_meters,
            description: self.description,
            listed_date,
            is_available,
        };
        house.validate()?;
        Ok(house)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
