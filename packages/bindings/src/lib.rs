use napi::Result as NapiResult;
use napi_derive::napi;

use property_finance_core::financing::loan::{self, LoanTerms};
use property_finance_core::investment::analysis::{self, PropertyInvestmentInput};
use property_finance_core::investment::carbon_levy::{self, CarbonLevyInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[napi]
pub fn solve_loan(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan::solve_loan(&terms);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investment
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_investment(input_json: String) -> NapiResult<String> {
    let input: PropertyInvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::analyze_investment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn assess_carbon_levy(input_json: String) -> NapiResult<String> {
    let input: CarbonLevyInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = carbon_levy::calculate_carbon_levy(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}
