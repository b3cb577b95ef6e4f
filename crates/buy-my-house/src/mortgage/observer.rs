use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::calculator::MINIMUM_ANNUAL_INCOME;
use super::domain::{ApplicationId, MortgageOffer};

/// Structured record of an approval check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDecision {
    pub application_id: ApplicationId,
    pub annual_income: Decimal,
    pub requested_amount: Decimal,
    pub max_loan: Decimal,
    pub approved: bool,
}

impl LoanDecision {
    /// Human-readable reason for a rejection, `None` when approved.
    pub fn rejection_reason(&self) -> Option<String> {
        if self.approved {
            return None;
        }

        if self.annual_income < MINIMUM_ANNUAL_INCOME {
            Some(format!(
                "annual income below minimum of {}",
                MINIMUM_ANNUAL_INCOME
            ))
        } else {
            Some(format!(
                "requested amount exceeds maximum loan of {}",
                self.max_loan
            ))
        }
    }
}

/// Receives calculator events without taking part in the calculation.
pub trait DecisionObserver: Send + Sync {
    fn decision_made(&self, decision: &LoanDecision);
    fn offer_generated(&self, offer: &MortgageOffer);
}

/// Default observer: writes both events as structured tracing records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDecisionLog;

impl DecisionObserver for TracingDecisionLog {
    fn decision_made(&self, decision: &LoanDecision) {
        info!(
            application_id = %decision.application_id.0,
            requested = %decision.requested_amount,
            max_loan = %decision.max_loan,
            approved = decision.approved,
            "mortgage application assessed"
        );
    }

    fn offer_generated(&self, offer: &MortgageOffer) {
        info!(
            offer_id = %offer.id.0,
            application_id = %offer.application_id.0,
            amount = %offer.approved_amount,
            rate = %offer.interest_rate,
            "mortgage offer generated"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DecisionObserver for NoopObserver {
    fn decision_made(&self, _decision: &LoanDecision) {}

    fn offer_generated(&self, _offer: &MortgageOffer) {}
}
