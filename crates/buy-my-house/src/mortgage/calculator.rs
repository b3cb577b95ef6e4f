//! Mortgage approval rules and offer pricing.
//!
//! The free functions are pure: they take the application (and, for offers, the id and
//! timestamp) and return values without touching any shared state. `MortgageOfferCalculator`
//! wraps them with id generation, the clock and a [`DecisionObserver`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use super::domain::{MortgageApplication, MortgageOffer, OfferId};
use super::observer::{DecisionObserver, LoanDecision, TracingDecisionLog};

const fn tenths(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 1)
}

/// Applicants earning less than this are never approved.
pub const MINIMUM_ANNUAL_INCOME: Decimal = Decimal::from_parts(20_000, 0, 0, false, 0);
/// Maximum loan as a multiple of annual income.
pub const INCOME_MULTIPLIER: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
pub const BASE_INTEREST_RATE: Decimal = tenths(35);
pub const TERM_IN_YEARS: u32 = 30;
pub const OFFER_VALIDITY_DAYS: i64 = 7;

/// Loan-to-income floors (exclusive) and the rate that applies above each, highest first.
const RATE_LADDER: [(Decimal, Decimal); 3] = [
    (tenths(45), tenths(50)),
    (tenths(40), tenths(45)),
    (tenths(35), tenths(40)),
];

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
const MONTHS_PER_YEAR: u32 = 12;

/// Failure to price an offer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferError {
    #[error("annual income must be greater than zero (got {0})")]
    InvalidIncome(Decimal),
    #[error("requested amount must be greater than zero (got {0})")]
    InvalidAmount(Decimal),
    #[error("loan term must be at least one year (got {0})")]
    InvalidTerm(u32),
    #[error("offer calculation overflowed for the given amounts")]
    Overflow,
}

/// Rejects inputs the pricing formula cannot handle.
pub fn validate_application(application: &MortgageApplication) -> Result<(), OfferError> {
    if application.annual_income <= Decimal::ZERO {
        return Err(OfferError::InvalidIncome(application.annual_income));
    }
    if application.requested_amount <= Decimal::ZERO {
        return Err(OfferError::InvalidAmount(application.requested_amount));
    }
    Ok(())
}

fn maximum_loan(annual_income: Decimal) -> Option<Decimal> {
    annual_income.checked_mul(INCOME_MULTIPLIER)
}

/// Applies the approval rules without emitting anything.
pub fn assess_application(application: &MortgageApplication) -> LoanDecision {
    // Saturate so an enormous income still compares sensibly against the request.
    let max_loan = maximum_loan(application.annual_income).unwrap_or(Decimal::MAX);
    let approved = application.annual_income >= MINIMUM_ANNUAL_INCOME
        && application.requested_amount <= max_loan;

    LoanDecision {
        application_id: application.id.clone(),
        annual_income: application.annual_income,
        requested_amount: application.requested_amount,
        max_loan,
        approved,
    }
}

/// Annual percentage rate for a loan-to-income ratio.
pub fn interest_rate_for(loan_to_income: Decimal) -> Decimal {
    RATE_LADDER
        .iter()
        .find(|(floor, _)| loan_to_income > *floor)
        .map(|(_, rate)| *rate)
        .unwrap_or(BASE_INTEREST_RATE)
}

/// Rounds to cents, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed monthly payment that amortizes `principal` over `term_in_years`.
///
/// The power term is evaluated in `f64`; the result is converted back and rounded to cents.
pub fn monthly_payment(
    principal: Decimal,
    annual_rate: Decimal,
    term_in_years: u32,
) -> Result<Decimal, OfferError> {
    if term_in_years == 0 {
        return Err(OfferError::InvalidTerm(term_in_years));
    }
    let payments = term_in_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or(OfferError::Overflow)?;
    let exponent = i32::try_from(payments).map_err(|_| OfferError::Overflow)?;
    let monthly_rate = (annual_rate / ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR))
        .to_f64()
        .ok_or(OfferError::Overflow)?;

    if monthly_rate == 0.0 {
        let payment = principal
            .checked_div(Decimal::from(payments))
            .ok_or(OfferError::Overflow)?;
        return Ok(round_currency(payment));
    }

    let principal = principal.to_f64().ok_or(OfferError::Overflow)?;
    let growth = (1.0 + monthly_rate).powi(exponent);
    let payment = principal * (monthly_rate * growth) / (growth - 1.0);
    if !payment.is_finite() {
        return Err(OfferError::Overflow);
    }

    let payment = Decimal::from_f64(payment).ok_or(OfferError::Overflow)?;
    Ok(round_currency(payment))
}

/// Builds the offer for `application`, clamping the amount to the income cap.
///
/// Does not re-check approval; callers decide whether an offer should be made.
pub fn price_offer(
    application: &MortgageApplication,
    offer_id: OfferId,
    offer_date: DateTime<Utc>,
) -> Result<MortgageOffer, OfferError> {
    validate_application(application)?;

    let max_loan = maximum_loan(application.annual_income).ok_or(OfferError::Overflow)?;
    let approved_amount = application.requested_amount.min(max_loan);
    let loan_to_income = approved_amount
        .checked_div(application.annual_income)
        .ok_or(OfferError::Overflow)?;
    let interest_rate = interest_rate_for(loan_to_income);
    let monthly_payment = monthly_payment(approved_amount, interest_rate, TERM_IN_YEARS)?;
    let expiration_date = offer_date
        .checked_add_signed(Duration::days(OFFER_VALIDITY_DAYS))
        .ok_or(OfferError::Overflow)?;

    Ok(MortgageOffer {
        id: offer_id,
        application_id: application.id.clone(),
        approved_amount,
        interest_rate,
        term_in_years: TERM_IN_YEARS,
        monthly_payment,
        offer_date,
        expiration_date,
        offer_document_url: String::new(),
    })
}

/// Stateless calculator that reports every decision and offer to its observer.
#[derive(Clone)]
pub struct MortgageOfferCalculator {
    observer: Arc<dyn DecisionObserver>,
}

impl Default for MortgageOfferCalculator {
    fn default() -> Self {
        Self::new(Arc::new(TracingDecisionLog))
    }
}

impl MortgageOfferCalculator {
    pub fn new(observer: Arc<dyn DecisionObserver>) -> Self {
        Self { observer }
    }

    /// Runs the approval rules and returns the full decision record.
    pub fn evaluate(&self, application: &MortgageApplication) -> LoanDecision {
        let decision = assess_application(application);
        self.observer.decision_made(&decision);
        decision
    }

    pub fn is_approved(&self, application: &MortgageApplication) -> bool {
        self.evaluate(application).approved
    }

    pub fn generate_offer(
        &self,
        application: &MortgageApplication,
    ) -> Result<MortgageOffer, OfferError> {
        self.generate_offer_at(application, Utc::now())
    }

    pub fn generate_offer_at(
        &self,
        application: &MortgageApplication,
        now: DateTime<Utc>,
    ) -> Result<MortgageOffer, OfferError> {
        let offer = price_offer(application, OfferId::generate(), now)?;
        self.observer.offer_generated(&offer);
        Ok(offer)
    }
}
