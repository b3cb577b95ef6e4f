use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::RepositoryError;
use crate::mortgage::domain::{ApplicationId, MortgageApplication, MortgageOffer, OfferId};
use crate::mortgage::observer::{DecisionObserver, LoanDecision};
use crate::mortgage::repository::{ApplicationRecord, ApplicationRepository, OfferRepository};
use crate::mortgage::{mortgage_router, MortgageOfferCalculator, MortgageService};

pub(super) fn application(
    id: &str,
    annual_income: i64,
    requested_amount: i64,
) -> MortgageApplication {
    MortgageApplication {
        id: ApplicationId(id.to_string()),
        annual_income: Decimal::from(annual_income),
        requested_amount: Decimal::from(requested_amount),
    }
}

/// 90k income asking for 400k: approved, priced in the 4.5% band.
pub(super) fn approvable_application() -> MortgageApplication {
    application("app-approvable", 90_000, 400_000)
}

/// 15k income: below the minimum regardless of the amount.
pub(super) fn low_income_application() -> MortgageApplication {
    application("app-low-income", 15_000, 50_000)
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Default)]
pub(super) struct RecordingObserver {
    decisions: Mutex<Vec<LoanDecision>>,
    offers: Mutex<Vec<MortgageOffer>>,
}

impl RecordingObserver {
    pub(super) fn decisions(&self) -> Vec<LoanDecision> {
        self.decisions.lock().expect("observer mutex poisoned").clone()
    }

    pub(super) fn offers(&self) -> Vec<MortgageOffer> {
        self.offers.lock().expect("observer mutex poisoned").clone()
    }
}

impl DecisionObserver for RecordingObserver {
    fn decision_made(&self, decision: &LoanDecision) {
        self.decisions
            .lock()
            .expect("observer mutex poisoned")
            .push(decision.clone());
    }

    fn offer_generated(&self, offer: &MortgageOffer) {
        self.offers
            .lock()
            .expect("observer mutex poisoned")
            .push(offer.clone());
    }
}

pub(super) fn recording_calculator() -> (MortgageOfferCalculator, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    (MortgageOfferCalculator::new(observer.clone()), observer)
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application.id) {
            guard.insert(record.application.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Holds the first `gated` fetches until that many callers have arrived, so concurrent
/// processors all observe the record before any of them writes.
pub(super) struct RendezvousApplications {
    inner: MemoryApplications,
    barrier: Barrier,
    gated: usize,
    fetches: AtomicUsize,
}

impl RendezvousApplications {
    pub(super) fn new(inner: MemoryApplications, gated: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(gated),
            gated,
            fetches: AtomicUsize::new(0),
        }
    }
}

impl ApplicationRepository for RendezvousApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        if self.fetches.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait();
        }
        self.inner.fetch(id)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryOffers {
    offers: Arc<Mutex<HashMap<OfferId, MortgageOffer>>>,
}

impl MemoryOffers {
    pub(super) fn len(&self) -> usize {
        self.offers.lock().expect("repository mutex poisoned").len()
    }
}

impl OfferRepository for MemoryOffers {
    fn insert(&self, offer: MortgageOffer) -> Result<MortgageOffer, RepositoryError> {
        let mut guard = self.offers.lock().expect("repository mutex poisoned");
        if guard.contains_key(&offer.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(offer.id.clone(), offer.clone());
        Ok(offer)
    }

    fn fetch(&self, id: &OfferId) -> Result<Option<MortgageOffer>, RepositoryError> {
        let guard = self.offers.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableOffers;

impl OfferRepository for UnavailableOffers {
    fn insert(&self, _offer: MortgageOffer) -> Result<MortgageOffer, RepositoryError> {
        Err(RepositoryError::Unavailable("offer store offline".to_string()))
    }

    fn fetch(&self, _id: &OfferId) -> Result<Option<MortgageOffer>, RepositoryError> {
        Err(RepositoryError::Unavailable("offer store offline".to_string()))
    }
}

pub(super) type TestService = MortgageService<MemoryApplications, MemoryOffers>;

pub(super) fn build_service() -> (
    TestService,
    MemoryApplications,
    MemoryOffers,
    Arc<RecordingObserver>,
) {
    let applications = MemoryApplications::default();
    let offers = MemoryOffers::default();
    let (calculator, observer) = recording_calculator();
    let service = MortgageService::new(
        Arc::new(applications.clone()),
        Arc::new(offers.clone()),
        calculator,
    );
    (service, applications, offers, observer)
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    mortgage_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
