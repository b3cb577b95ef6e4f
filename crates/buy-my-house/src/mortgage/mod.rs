//! Mortgage applications, approval rules, and offer generation.

pub mod calculator;
pub mod domain;
pub mod observer;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use calculator::{
    assess_application, interest_rate_for, monthly_payment, price_offer, MortgageOfferCalculator,
    OfferError, TERM_IN_YEARS,
};
pub use domain::{ApplicationId, MortgageApplication, MortgageOffer, OfferId};
pub use observer::{DecisionObserver, LoanDecision, NoopObserver, TracingDecisionLog};
pub use repository::{
    ApplicationRecord, ApplicationRepository, ApplicationStatus, OfferRepository,
};
pub use router::mortgage_router;
pub use service::{MortgageQuote, MortgageService, MortgageServiceError, OfferDecision};
