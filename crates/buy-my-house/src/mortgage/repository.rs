use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, MortgageApplication, MortgageOffer, OfferId};
use crate::error::RepositoryError;

/// Lifecycle of a stored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Approved,
    Rejected,
}

/// Repository record pairing the application with its processing outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub application: MortgageApplication,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<OfferId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ApplicationRecord {
    pub fn submitted(application: MortgageApplication) -> Self {
        Self {
            application,
            status: ApplicationStatus::Submitted,
            offer_id: None,
            rejection_reason: None,
        }
    }
}

/// Storage abstraction for applications so the service can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn update(&self, record: ApplicationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
}

/// Storage abstraction for issued offers.
pub trait OfferRepository: Send + Sync {
    fn insert(&self, offer: MortgageOffer) -> Result<MortgageOffer, RepositoryError>;
    fn fetch(&self, id: &OfferId) -> Result<Option<MortgageOffer>, RepositoryError>;
}
