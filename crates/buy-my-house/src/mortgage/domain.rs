use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for mortgage applications; assigned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for generated offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub String);

impl OfferId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Loan request as received from the applicant. Never mutated by the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageApplication {
    pub id: ApplicationId,
    pub annual_income: Decimal,
    pub requested_amount: Decimal,
}

/// Time-boxed proposal produced once per application.
///
/// `offer_document_url` stays empty until a document is generated for the offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageOffer {
    pub id: OfferId,
    pub application_id: ApplicationId,
    pub approved_amount: Decimal,
    pub interest_rate: Decimal,
    pub term_in_years: u32,
    pub monthly_payment: Decimal,
    pub offer_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub offer_document_url: String,
}

impl MortgageOffer {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration_date
    }
}
