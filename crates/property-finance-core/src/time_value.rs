use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{pct_to_fraction, Money, Percent};

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Periodic monthly rate from an annual nominal rate in percent (3.5 -> 0.0029166..).
pub fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    pct_to_fraction(annual_rate_pct) / MONTHS_PER_YEAR
}

/// Level payment retiring `principal` over `periods` at periodic `rate`.
///
/// P * r / (1 - (1+r)^-n), which is the textbook P * r(1+r)^n / ((1+r)^n - 1)
/// rearranged so a large compounding factor cannot overflow the product.
/// A zero rate amortises straight-line. Returns `None` for `periods <= 0`.
pub fn annuity_payment(principal: Money, rate: Decimal, periods: Decimal) -> Option<Money> {
    if periods <= Decimal::ZERO {
        return None;
    }
    if rate.is_zero() {
        return Some(principal / periods);
    }

    let factor = match (Decimal::ONE + rate).checked_powd(periods) {
        Some(f) => f,
        // (1+r)^n beyond Decimal range: the payment has converged to interest-only
        None => return Some(principal * rate),
    };
    if factor.is_zero() {
        return None;
    }

    let denominator = Decimal::ONE - Decimal::ONE / factor;
    if denominator.is_zero() {
        return None;
    }
    Some(principal * rate / denominator)
}

/// Number of periods a level `payment` needs to retire `principal` at periodic `rate`.
///
/// n = ln(A / (A - P*r)) / ln(1 + r). Returns `None` when the payment does not
/// exceed the periodic interest, i.e. the loan never amortises.
pub fn amortization_periods(principal: Money, rate: Decimal, payment: Money) -> Option<Decimal> {
    if payment <= Decimal::ZERO {
        return None;
    }
    if rate.is_zero() {
        return Some(principal / payment);
    }

    let interest_only = principal * rate;
    if payment <= interest_only {
        return None;
    }

    let numerator = (payment / (payment - interest_only)).checked_ln()?;
    let denominator = (Decimal::ONE + rate).checked_ln()?;
    if denominator.is_zero() {
        return None;
    }
    Some(numerator / denominator)
}
