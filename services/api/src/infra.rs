use buy_my_house::config::ListingsConfig;
use buy_my_house::error::{AppError, RepositoryError};
use buy_my_house::listings::{House, HouseId, HouseImporter, InMemoryHouseRepository};
use buy_my_house::mortgage::{
    ApplicationId, ApplicationRecord, ApplicationRepository, MortgageOffer, OfferId,
    OfferRepository,
};
use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} lock poisoned")))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = lock(&self.records, "application")?;
        if guard.contains_key(&record.application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records, "application")?;
        if guard.contains_key(&record.application.id) {
            guard.insert(record.application.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = lock(&self.records, "application")?;
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryOfferRepository {
    offers: Arc<Mutex<HashMap<OfferId, MortgageOffer>>>,
}

impl OfferRepository for InMemoryOfferRepository {
    fn insert(&self, offer: MortgageOffer) -> Result<MortgageOffer, RepositoryError> {
        let mut guard = lock(&self.offers, "offer")?;
        if guard.contains_key(&offer.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(offer.id.clone(), offer.clone());
        Ok(offer)
    }

    fn fetch(&self, id: &OfferId) -> Result<Option<MortgageOffer>, RepositoryError> {
        let guard = lock(&self.offers, "offer")?;
        Ok(guard.get(id).cloned())
    }
}

/// Demo listings used when no CSV export is configured.
pub(crate) fn seed_listings(now: DateTime<Utc>) -> Vec<House> {
    vec![
        House {
            id: HouseId(1),
            address: "Dam 1".to_string(),
            city: "Amsterdam".to_string(),
            price: Decimal::from(450_000),
            bedrooms: 3,
            bathrooms: 2,
            square_meters: 120,
            description: "Beautiful canal house in the heart of Amsterdam".to_string(),
            listed_date: now - Duration::days(30),
            is_available: true,
        },
        House {
            id: HouseId(2),
            address: "Zeeweg 45".to_string(),
            city: "Haarlem".to_string(),
            price: Decimal::from(350_000),
            bedrooms: 2,
            bathrooms: 1,
            square_meters: 95,
            description: "Modern apartment near the beach".to_string(),
            listed_date: now - Duration::days(15),
            is_available: true,
        },
    ]
}

pub(crate) fn load_listings(config: &ListingsConfig) -> Result<InMemoryHouseRepository, AppError> {
    let houses = match &config.seed_csv {
        Some(path) => {
            let houses = HouseImporter::from_path(path)?;
            info!(path = %path.display(), count = houses.len(), "imported listings");
            houses
        }
        None => seed_listings(Utc::now()),
    };

    Ok(InMemoryHouseRepository::with_houses(houses)?)
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as a decimal amount ({err})"))
}
