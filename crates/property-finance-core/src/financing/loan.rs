//! Annuity loan solver.
//!
//! A loan is described by its principal, an annual nominal interest rate and
//! exactly one repayment plan:
//! 1. **By repayment rate** -- initial repayment in % of principal per year
//!    (the usual German "Tilgungssatz" quote).
//! 2. **By installment** -- a fixed monthly payment.
//! 3. **By duration** -- the payoff horizon in years.
//!
//! Whatever the plan, the solver resolves the same three figures: monthly
//! installment, resulting duration and resulting effective repayment rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::{amortization_periods, annuity_payment, monthly_rate, MONTHS_PER_YEAR};
use crate::types::{pct_to_fraction, with_metadata, ComputationOutput, Money, Percent, Years};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the borrower wants to repay. Exactly one parameter per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RepaymentPlan {
    /// Initial repayment as % of principal per year
    ByRate { repayment_rate_pct: Percent },
    /// Fixed monthly installment (interest + principal)
    ByInstallment { monthly_installment: Money },
    /// Target payoff horizon in years
    ByDuration { years: Years },
}

/// Input parameters for a single loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: Money,
    /// Annual nominal interest rate in % (3.5 = 3.5%)
    pub annual_rate_pct: Percent,
    /// Repayment plan
    pub repayment: RepaymentPlan,
}

/// Derived loan figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    /// Principal the figures were derived from
    pub principal: Money,
    /// Monthly installment (interest + principal)
    pub monthly_installment: Money,
    /// Years until the loan is repaid
    pub duration_years: Years,
    /// Initial principal repayment as % of principal per year
    pub effective_repayment_rate_pct: Percent,
    /// First-year interest on the full principal
    pub annual_interest: Money,
    /// First-year principal repayment (12 installments less interest)
    pub annual_principal: Money,
    /// The installment never exceeds the interest-only payment
    pub never_amortizes: bool,
}

impl LoanResult {
    /// All-zero result used for a non-positive principal.
    pub fn zero() -> Self {
        LoanResult {
            principal: Decimal::ZERO,
            monthly_installment: Decimal::ZERO,
            duration_years: Decimal::ZERO,
            effective_repayment_rate_pct: Decimal::ZERO,
            annual_interest: Decimal::ZERO,
            annual_principal: Decimal::ZERO,
            never_amortizes: false,
        }
    }

    /// Interest plus principal paid per year.
    pub fn annual_debt_service(&self) -> Money {
        self.annual_interest + self.annual_principal
    }

    /// One-line summary, e.g. "779.17 EUR/month | approx. 28.9 years | repayment 2.00%".
    pub fn summary(&self) -> String {
        let duration = if self.never_amortizes {
            "never repaid".to_string()
        } else {
            format!("approx. {:.1} years", self.duration_years)
        };
        format!(
            "{:.2} EUR/month | {} | repayment {:.2}%",
            self.monthly_installment, duration, self.effective_repayment_rate_pct
        )
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve installment, duration and effective repayment rate for one loan.
///
/// Pure and total: a non-positive principal yields [`LoanResult::zero`], a zero
/// interest rate amortises linearly, and a plan whose installment never covers
/// the monthly interest is reported through `never_amortizes` with a zero
/// duration instead of an error.
pub fn solve(principal: Money, annual_rate_pct: Percent, repayment: &RepaymentPlan) -> LoanResult {
    if principal <= Decimal::ZERO {
        return LoanResult::zero();
    }

    let rate = monthly_rate(annual_rate_pct);
    let interest_only = principal * rate;

    let (monthly_installment, duration_months, never_amortizes) = match *repayment {
        RepaymentPlan::ByRate { repayment_rate_pct } => {
            let installment = principal * (annual_rate_pct + repayment_rate_pct)
                / Decimal::ONE_HUNDRED
                / MONTHS_PER_YEAR;
            match amortization_periods(principal, rate, installment) {
                Some(months) => (installment, months, false),
                // Linear payoff at the quoted repayment rate
                None if repayment_rate_pct > Decimal::ZERO => (
                    installment,
                    Decimal::ONE_HUNDRED / repayment_rate_pct * MONTHS_PER_YEAR,
                    false,
                ),
                None => (installment, Decimal::ZERO, true),
            }
        }
        RepaymentPlan::ByInstallment {
            monthly_installment,
        } => match amortization_periods(principal, rate, monthly_installment) {
            Some(months) => (monthly_installment, months, false),
            None => (monthly_installment, Decimal::ZERO, true),
        },
        RepaymentPlan::ByDuration { years } => {
            let months = years * MONTHS_PER_YEAR;
            match annuity_payment(principal, rate, months) {
                Some(installment) => (installment, months, false),
                None => (interest_only, Decimal::ZERO, true),
            }
        }
    };

    let effective_repayment_rate_pct =
        (monthly_installment - interest_only) * MONTHS_PER_YEAR / principal * Decimal::ONE_HUNDRED;
    let annual_interest = principal * pct_to_fraction(annual_rate_pct);
    let annual_principal = monthly_installment * MONTHS_PER_YEAR - annual_interest;

    LoanResult {
        principal,
        monthly_installment,
        duration_years: duration_months / MONTHS_PER_YEAR,
        effective_repayment_rate_pct,
        annual_interest,
        annual_principal,
        never_amortizes,
    }
}

/// Solve a loan and wrap the result in the standard output envelope.
pub fn solve_loan(terms: &LoanTerms) -> ComputationOutput<LoanResult> {
    let result = solve(terms.principal, terms.annual_rate_pct, &terms.repayment);
    let warnings = loan_warnings(&result, terms);

    log::debug!(
        "solved loan principal={} rate={}%: {}",
        terms.principal,
        terms.annual_rate_pct,
        result.summary()
    );

    with_metadata("Annuity Loan Solver", terms, warnings, result)
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

pub(crate) fn loan_warnings(result: &LoanResult, terms: &LoanTerms) -> Vec<String> {
    let mut warnings = Vec::new();

    if terms.principal <= Decimal::ZERO {
        return warnings;
    }

    if result.never_amortizes {
        let interest_only = terms.principal * monthly_rate(terms.annual_rate_pct);
        warnings.push(format!(
            "Installment {:.2} does not exceed the interest-only payment {:.2}; the loan is never repaid",
            result.monthly_installment, interest_only
        ));
    } else if result.duration_years > dec!(40) {
        warnings.push(format!(
            "Duration of {:.1} years exceeds 40 years, longer than typical bank terms",
            result.duration_years
        ));
    }

    if terms.annual_rate_pct < Decimal::ZERO {
        warnings.push(format!(
            "Negative interest rate {}% — verify loan terms",
            terms.annual_rate_pct
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
