use buy_my_house::error::AppError;
use buy_my_house::mortgage::{
    ApplicationId, LoanDecision, MortgageApplication, MortgageOffer, MortgageOfferCalculator,
    MortgageQuote,
};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Identifier recorded on the offer
    #[arg(long, default_value = "cli-quote")]
    pub(crate) application_id: String,
    /// Gross annual income of the applicant
    #[arg(long, value_parser = crate::infra::parse_decimal)]
    pub(crate) annual_income: Decimal,
    /// Loan amount requested
    #[arg(long, value_parser = crate::infra::parse_decimal)]
    pub(crate) requested_amount: Decimal,
    /// Print the quote as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        application_id,
        annual_income,
        requested_amount,
        json,
    } = args;

    let application = MortgageApplication {
        id: ApplicationId(application_id),
        annual_income,
        requested_amount,
    };

    let calculator = MortgageOfferCalculator::default();
    let decision = calculator.evaluate(&application);
    let offer = calculator.generate_offer(&application)?;

    if json {
        match serde_json::to_string_pretty(&MortgageQuote { decision, offer }) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Quote payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_quote(&decision, &offer));
    }

    Ok(())
}

pub(crate) fn render_quote(decision: &LoanDecision, offer: &MortgageOffer) -> String {
    let mut out = String::new();
    out.push_str(&format!("Mortgage quote for {}\n", decision.application_id.0));
    out.push_str(&format!(
        "- Requested {} | maximum loan {}\n",
        decision.requested_amount, decision.max_loan
    ));
    match decision.rejection_reason() {
        None => out.push_str("- Decision: approved\n"),
        Some(reason) => out.push_str(&format!("- Decision: not approved ({reason})\n")),
    }
    out.push_str(&format!(
        "- Offer: {} over {} years at {}%\n",
        offer.approved_amount, offer.term_in_years, offer.interest_rate
    ));
    out.push_str(&format!("- Monthly payment: {}\n", offer.monthly_payment));
    out.push_str(&format!(
        "- Valid until {}\n",
        offer.expiration_date.format("%Y-%m-%d %H:%M UTC")
    ));
    out
}
