use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::calculator::{validate_application, MortgageOfferCalculator, OfferError};
use super::domain::{ApplicationId, MortgageApplication, MortgageOffer, OfferId};
use super::observer::LoanDecision;
use super::repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatus, OfferRepository,
};
use crate::error::RepositoryError;

/// Result of processing a stored application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferDecision {
    Approved { offer: MortgageOffer },
    Rejected { reason: String },
}

/// Unpersisted calculator output for ad-hoc quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MortgageQuote {
    pub decision: LoanDecision,
    pub offer: MortgageOffer,
}

/// Service composing the calculator with application and offer storage.
pub struct MortgageService<A, F> {
    applications: Arc<A>,
    offers: Arc<F>,
    calculator: MortgageOfferCalculator,
    // Held while a submitted application is decided so it yields at most one offer.
    processing: Mutex<()>,
}

impl<A, F> MortgageService<A, F>
where
    A: ApplicationRepository + 'static,
    F: OfferRepository + 'static,
{
    pub fn new(applications: Arc<A>, offers: Arc<F>, calculator: MortgageOfferCalculator) -> Self {
        Self {
            applications,
            offers,
            calculator,
            processing: Mutex::new(()),
        }
    }

    /// Store a new application in the `submitted` state.
    pub fn submit(
        &self,
        application: MortgageApplication,
    ) -> Result<ApplicationRecord, MortgageServiceError> {
        if application.id.0.trim().is_empty() {
            return Err(MortgageServiceError::MissingApplicationId);
        }
        validate_application(&application)?;

        let stored = self
            .applications
            .insert(ApplicationRecord::submitted(application))?;
        Ok(stored)
    }

    pub fn process(
        &self,
        application_id: &ApplicationId,
    ) -> Result<OfferDecision, MortgageServiceError> {
        self.process_at(application_id, Utc::now())
    }

    /// Decide a stored application, persisting the offer when approved.
    ///
    /// Already-decided applications return their recorded outcome unchanged.
    pub fn process_at(
        &self,
        application_id: &ApplicationId,
        now: DateTime<Utc>,
    ) -> Result<OfferDecision, MortgageServiceError> {
        let record = self.application(application_id)?;
        if let Some(decision) = self.recorded_outcome(&record)? {
            return Ok(decision);
        }

        let _processing = self.processing.lock().map_err(|_| {
            RepositoryError::Unavailable("application processing lock poisoned".to_string())
        })?;
        // Another caller may have decided the application while we waited.
        let mut record = self.application(application_id)?;
        if let Some(decision) = self.recorded_outcome(&record)? {
            return Ok(decision);
        }

        let decision = self.calculator.evaluate(&record.application);
        if let Some(reason) = decision.rejection_reason() {
            record.status = ApplicationStatus::Rejected;
            record.rejection_reason = Some(reason.clone());
            self.applications.update(record)?;
            return Ok(OfferDecision::Rejected { reason });
        }

        let offer = self.calculator.generate_offer_at(&record.application, now)?;
        let offer = self.offers.insert(offer)?;

        record.status = ApplicationStatus::Approved;
        record.offer_id = Some(offer.id.clone());
        self.applications.update(record)?;

        Ok(OfferDecision::Approved { offer })
    }

    fn recorded_outcome(
        &self,
        record: &ApplicationRecord,
    ) -> Result<Option<OfferDecision>, MortgageServiceError> {
        match record.status {
            ApplicationStatus::Submitted => Ok(None),
            ApplicationStatus::Approved => {
                let offer_id = record.offer_id.as_ref().ok_or(RepositoryError::NotFound)?;
                let offer = self.offer(offer_id)?;
                Ok(Some(OfferDecision::Approved { offer }))
            }
            ApplicationStatus::Rejected => {
                let reason = record.rejection_reason.clone().unwrap_or_default();
                Ok(Some(OfferDecision::Rejected { reason }))
            }
        }
    }

    /// Run the calculator without storing anything.
    pub fn quote(
        &self,
        application: &MortgageApplication,
    ) -> Result<MortgageQuote, MortgageServiceError> {
        let decision = self.calculator.evaluate(application);
        let offer = self.calculator.generate_offer(application)?;
        Ok(MortgageQuote { decision, offer })
    }

    pub fn application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, MortgageServiceError> {
        let record = self
            .applications
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn offer(&self, offer_id: &OfferId) -> Result<MortgageOffer, MortgageServiceError> {
        let offer = self
            .offers
            .fetch(offer_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(offer)
    }
}

/// Error raised by the mortgage service.
#[derive(Debug, thiserror::Error)]
pub enum MortgageServiceError {
    #[error("application id must not be empty")]
    MissingApplicationId,
    #[error(transparent)]
    Offer(#[from] OfferError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
