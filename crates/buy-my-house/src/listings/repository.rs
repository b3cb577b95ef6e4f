use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;

use super::domain::{House, HouseId, PriceRange};
use crate::error::RepositoryError;

/// Storage abstraction for listings.
pub trait HouseRepository: Send + Sync {
    /// Every house, ordered by id.
    fn all(&self) -> Result<Vec<House>, RepositoryError>;
    fn by_id(&self, id: HouseId) -> Result<Option<House>, RepositoryError>;
    /// Houses priced within `range`, cheapest first.
    fn by_price_range(&self, range: PriceRange) -> Result<Vec<House>, RepositoryError>;
    fn insert(&self, house: House) -> Result<House, RepositoryError>;
}

#[derive(Default)]
struct HouseTable {
    rows: BTreeMap<HouseId, House>,
    by_price: BTreeSet<(Decimal, HouseId)>,
}

/// In-process store keeping a secondary price index next to the rows.
#[derive(Default, Clone)]
pub struct InMemoryHouseRepository {
    table: Arc<Mutex<HouseTable>>,
}

impl InMemoryHouseRepository {
    pub fn with_houses<I>(houses: I) -> Result<Self, RepositoryError>
    where
        I: IntoIterator<Item = House>,
    {
        let repository = Self::default();
        for house in houses {
            repository.insert(house)?;
        }
        Ok(repository)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HouseTable>, RepositoryError> {
        self.table
            .lock()
            .map_err(|_| RepositoryError::Unavailable("house table lock poisoned".to_string()))
    }
}

impl HouseRepository for InMemoryHouseRepository {
    fn all(&self) -> Result<Vec<House>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.rows.values().cloned().collect())
    }

    fn by_id(&self, id: HouseId) -> Result<Option<House>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.rows.get(&id).cloned())
    }

    fn by_price_range(&self, range: PriceRange) -> Result<Vec<House>, RepositoryError> {
        let guard = self.lock()?;
        let houses = guard
            .by_price
            .range((range.min, HouseId(0))..)
            .take_while(|(price, _)| range.contains(*price))
            .filter_map(|(_, id)| guard.rows.get(id).cloned())
            .collect();
        Ok(houses)
    }

    fn insert(&self, house: House) -> Result<House, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.rows.contains_key(&house.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.by_price.insert((house.price, house.id));
        guard.rows.insert(house.id, house.clone());
        Ok(house)
    }
}
