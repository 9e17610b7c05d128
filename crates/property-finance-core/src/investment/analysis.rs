use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropertyError;
use crate::financing::loan::{loan_warnings, solve, LoanResult, LoanTerms, RepaymentPlan};
use crate::investment::acquisition::{compute_acquisition, AcquisitionCosts, AncillaryCostRates};
use crate::investment::carbon_levy::{assess_carbon_levy, CarbonLevyAssessment, HeatingProfile};
use crate::investment::depreciation::{compute_depreciation, ConstructionPeriod, Depreciation};
use crate::investment::ledger::{LineItem, OwnerFigures, RentalFigures, RentalProjection};
use crate::time_value::MONTHS_PER_YEAR;
use crate::types::{pct_to_fraction, with_metadata, ComputationOutput, Money, Percent, SquareMetres};
use crate::PropertyResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageMode {
    #[default]
    Rental,
    OwnerOccupied,
}

/// One financing tranche of the purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTranche {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Explicit amount; `None` takes whatever the other tranches leave uncovered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Money>,
    pub annual_rate_pct: Percent,
    pub repayment: RepaymentPlan,
}

/// Everything needed to evaluate a residential property purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInvestmentInput {
    pub purchase_price: Money,
    /// Garage or parking space bought alongside
    #[serde(default)]
    pub parking_cost: Money,
    #[serde(default)]
    pub ancillary_rates: AncillaryCostRates,
    /// Renovation or other capital needed on top of the purchase
    #[serde(default)]
    pub additional_capital: Money,
    #[serde(default)]
    pub equity: Money,
    #[serde(default)]
    pub usage: UsageMode,
    #[serde(default)]
    pub construction_period: ConstructionPeriod,
    /// Year of construction; when given it selects the period instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_year: Option<u32>,
    /// Building share of the purchase price in %, the rest being land
    #[serde(default = "default_building_share")]
    pub building_share_pct: Percent,
    #[serde(default)]
    pub loans: Vec<LoanTranche>,
    #[serde(default)]
    pub monthly_cold_rent: Money,
    /// Operating costs billed to the tenant
    #[serde(default)]
    pub monthly_recoverable_costs: Money,
    /// Operating costs borne by the owner
    #[serde(default)]
    pub annual_non_recoverable_costs: Money,
    #[serde(default)]
    pub vacancy_risk_pct: Percent,
    /// Private maintenance reserve per m² per month
    #[serde(default)]
    pub maintenance_reserve_per_sqm: Money,
    #[serde(default)]
    pub floor_area_sqm: SquareMetres,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating: Option<HeatingProfile>,
    /// Marginal personal income tax rate in %
    #[serde(default = "default_tax_rate")]
    pub tax_rate_pct: Percent,
    /// Disposable monthly income before the purchase
    #[serde(default)]
    pub prior_monthly_income: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

fn default_building_share() -> Percent {
    dec!(80)
}

fn default_tax_rate() -> Percent {
    dec!(42)
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheResult {
    pub label: String,
    #[serde(flatten)]
    pub loan: LoanResult,
    /// e.g. "779.17 EUR/month | approx. 28.9 years | repayment 2.00%"
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBuffers {
    pub vacancy: Money,
    pub maintenance_reserve: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRatios {
    /// Annual cold rent / total investment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_yield_pct: Option<Percent>,
    /// (Annual cold rent - non-recoverable costs) / total investment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_yield_pct: Option<Percent>,
    /// Steady-state after-tax cashflow / equity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity_yield_pct: Option<Percent>,
    /// Total investment not covered by loans
    pub required_equity: Money,
}

/// Slice of the financing pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingShare {
    pub label: String,
    pub amount: Money,
}

/// Monthly cashflow components for a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub cold_rent: Money,
    pub interest: Money,
    pub principal: Money,
    pub operating_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub usage: UsageMode,
    pub total_investment: Money,
    pub acquisition: AcquisitionCosts,
    pub loans: Vec<TrancheResult>,
    pub annual_interest: Money,
    pub annual_principal: Money,
    pub annual_debt_service: Money,
    /// Cold rent plus recoverable costs
    pub monthly_warm_rent: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<Depreciation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_levy: Option<CarbonLevyAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_buffers: Option<RiskBuffers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<RentalProjection>,
    /// Steady-state disposable income after the purchase
    pub new_monthly_income: Money,
    pub line_items: Vec<LineItem>,
    pub ratios: SummaryRatios,
    pub financing_structure: Vec<FinancingShare>,
    pub monthly_breakdown: MonthlyBreakdown,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate a property purchase for rental or owner-occupied use.
///
/// Resolves acquisition cost, the loan tranches, depreciation, the landlord's
/// carbon levy and risk buffers, then assembles the year-one vs. steady-state
/// ledger and the summary ratios. Fails only on a non-positive purchase price
/// or an ambiguous loan split; every other degenerate input resolves to zero.
pub fn analyze_investment(
    input: &PropertyInvestmentInput,
) -> PropertyResult<ComputationOutput<AnalysisResult>> {
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    // --- Acquisition ---
    let acquisition = compute_acquisition(
        input.purchase_price,
        input.parking_cost,
        &input.ancillary_rates,
        input.additional_capital,
        input.equity,
    );
    log::debug!(
        "acquisition: total_investment={} loan_requirement={}",
        acquisition.total_investment,
        acquisition.loan_requirement
    );
    if acquisition.loan_requirement < Decimal::ZERO {
        warnings.push(format!(
            "Equity exceeds the total investment by {:.2}; no loan is needed",
            -acquisition.loan_requirement
        ));
    }

    // --- Loans ---
    let loans = resolve_loans(&input.loans, acquisition.loan_requirement, &mut warnings);
    let annual_interest: Money = loans.iter().map(|t| t.loan.annual_interest).sum();
    let annual_principal: Money = loans.iter().map(|t| t.loan.annual_principal).sum();
    let annual_debt_service = annual_interest + annual_principal;
    let total_borrowed: Money = loans.iter().map(|t| t.loan.principal).sum();
    log::debug!(
        "loans: tranches={} interest={} principal={}",
        loans.len(),
        annual_interest,
        annual_principal
    );

    let annual_cold_rent = input.monthly_cold_rent * MONTHS_PER_YEAR;
    let required_equity = acquisition.total_investment - total_borrowed;

    let mut financing_structure: Vec<FinancingShare> = loans
        .iter()
        .map(|t| FinancingShare {
            label: t.label.clone(),
            amount: t.loan.principal,
        })
        .collect();
    financing_structure.push(FinancingShare {
        label: "Equity".into(),
        amount: input.equity,
    });

    let output = match input.usage {
        UsageMode::Rental => {
            let period = input
                .construction_year
                .map(ConstructionPeriod::from_year)
                .unwrap_or(input.construction_period);
            let depreciation =
                compute_depreciation(input.purchase_price, input.building_share_pct, period);

            let carbon_levy = input
                .heating
                .as_ref()
                .map(|h| assess_carbon_levy(h, input.floor_area_sqm));
            if let Some(levy) = &carbon_levy {
                log::debug!(
                    "carbon levy: intensity={} kg/m² landlord_share={}%",
                    levy.co2_intensity_kg_per_sqm,
                    levy.landlord_share_pct
                );
            }

            let risk_buffers = RiskBuffers {
                vacancy: annual_cold_rent * pct_to_fraction(input.vacancy_risk_pct),
                maintenance_reserve: input.floor_area_sqm
                    * input.maintenance_reserve_per_sqm
                    * MONTHS_PER_YEAR,
            };

            let figures = RentalFigures {
                annual_cold_rent,
                annual_recoverable_costs: input.monthly_recoverable_costs * MONTHS_PER_YEAR,
                non_recoverable_costs: input.annual_non_recoverable_costs,
                vacancy_buffer: risk_buffers.vacancy,
                maintenance_reserve: risk_buffers.maintenance_reserve,
                carbon_levy: carbon_levy
                    .as_ref()
                    .map(|l| l.landlord_cost)
                    .unwrap_or(Decimal::ZERO),
                annual_interest,
                annual_principal,
                depreciation: depreciation.annual,
                ancillary_costs: acquisition.ancillary_costs,
                tax_rate_pct: input.tax_rate_pct,
                prior_monthly_income: input.prior_monthly_income,
            };
            let projection = figures.project();
            log::debug!(
                "rental projection: pre_tax={} tax_effect={} after_tax={}",
                projection.pre_tax_cashflow,
                projection.tax_effect_steady_state,
                projection.after_tax_cashflow_steady_state
            );
            if projection.after_tax_cashflow_steady_state < Decimal::ZERO {
                warnings.push(format!(
                    "Negative after-tax cashflow of {:.2} p.a. must be covered from income",
                    projection.after_tax_cashflow_steady_state
                ));
            }

            let ratios = rental_ratios(
                annual_cold_rent,
                input.annual_non_recoverable_costs,
                acquisition.total_investment,
                input.equity,
                projection.after_tax_cashflow_steady_state,
                required_equity,
            );

            AnalysisResult {
                location: input.location.clone(),
                usage: input.usage,
                total_investment: acquisition.total_investment,
                acquisition,
                loans,
                annual_interest,
                annual_principal,
                annual_debt_service,
                monthly_warm_rent: input.monthly_cold_rent + input.monthly_recoverable_costs,
                depreciation: Some(depreciation),
                carbon_levy,
                risk_buffers: Some(risk_buffers),
                new_monthly_income: projection.new_monthly_income_steady_state,
                line_items: figures.line_items(&projection),
                projection: Some(projection),
                ratios,
                financing_structure,
                monthly_breakdown: MonthlyBreakdown {
                    cold_rent: input.monthly_cold_rent,
                    interest: annual_interest / MONTHS_PER_YEAR,
                    principal: annual_principal / MONTHS_PER_YEAR,
                    operating_costs: input.annual_non_recoverable_costs / MONTHS_PER_YEAR,
                },
            }
        }
        UsageMode::OwnerOccupied => {
            let figures = OwnerFigures {
                non_recoverable_costs: input.annual_non_recoverable_costs,
                debt_service: annual_debt_service,
                prior_monthly_income: input.prior_monthly_income,
            };
            let new_monthly_income = figures.new_monthly_income();
            if new_monthly_income < Decimal::ZERO {
                warnings.push(format!(
                    "Monthly property cost exceeds disposable income by {:.2}",
                    -new_monthly_income
                ));
            }

            AnalysisResult {
                location: input.location.clone(),
                usage: input.usage,
                total_investment: acquisition.total_investment,
                acquisition,
                loans,
                annual_interest,
                annual_principal,
                annual_debt_service,
                monthly_warm_rent: Decimal::ZERO,
                depreciation: None,
                carbon_levy: None,
                risk_buffers: None,
                projection: None,
                new_monthly_income,
                line_items: figures.line_items(),
                ratios: SummaryRatios {
                    gross_yield_pct: None,
                    net_yield_pct: None,
                    equity_yield_pct: None,
                    required_equity,
                },
                financing_structure,
                monthly_breakdown: MonthlyBreakdown {
                    cold_rent: Decimal::ZERO,
                    interest: annual_interest / MONTHS_PER_YEAR,
                    principal: annual_principal / MONTHS_PER_YEAR,
                    operating_costs: input.annual_non_recoverable_costs / MONTHS_PER_YEAR,
                },
            }
        }
    };

    Ok(with_metadata(
        "Property Investment Analysis (year-one vs. steady-state ledger)",
        input,
        warnings,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(
    input: &PropertyInvestmentInput,
    warnings: &mut Vec<String>,
) -> PropertyResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(PropertyError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }

    let residual_tranches = input.loans.iter().filter(|t| t.principal.is_none()).count();
    if residual_tranches > 1 {
        return Err(PropertyError::InvalidInput {
            field: "loans".into(),
            reason: format!(
                "At most one tranche may omit its principal, found {residual_tranches}"
            ),
        });
    }

    if input.building_share_pct < Decimal::ZERO || input.building_share_pct > Decimal::ONE_HUNDRED
    {
        warnings.push(format!(
            "Building share {}% is outside 0–100%",
            input.building_share_pct
        ));
    }
    if input.tax_rate_pct < Decimal::ZERO || input.tax_rate_pct > dec!(60) {
        warnings.push(format!(
            "Tax rate {}% is outside the usual 0–60% range",
            input.tax_rate_pct
        ));
    }
    if input.vacancy_risk_pct > dec!(20) {
        warnings.push(format!(
            "Vacancy risk of {}% exceeds 20% — above typical market norms",
            input.vacancy_risk_pct
        ));
    }
    if input.usage == UsageMode::Rental
        && input.heating.is_some()
        && input.floor_area_sqm <= Decimal::ZERO
    {
        warnings.push("Heating profile given without floor area — carbon levy is zero".into());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

/// Assign each tranche its principal and solve it.
///
/// Explicit principals are taken as given; the single open tranche absorbs the
/// rest of the loan requirement, or nothing if the explicit ones already cover it.
fn resolve_loans(
    tranches: &[LoanTranche],
    loan_requirement: Money,
    warnings: &mut Vec<String>,
) -> Vec<TrancheResult> {
    let explicit: Money = tranches.iter().filter_map(|t| t.principal).sum();
    let residual = loan_requirement - explicit;

    if tranches.is_empty() && loan_requirement > Decimal::ZERO {
        warnings.push(format!(
            "Loan requirement of {loan_requirement:.2} is not covered by any loan tranche"
        ));
    } else if tranches.iter().all(|t| t.principal.is_some())
        && residual.abs() > dec!(0.01)
        && loan_requirement > Decimal::ZERO
    {
        warnings.push(format!(
            "Loan tranches total {explicit:.2} but the loan requirement is {loan_requirement:.2}"
        ));
    }

    tranches
        .iter()
        .enumerate()
        .map(|(i, tranche)| {
            let principal = tranche.principal.unwrap_or(residual);
            let terms = LoanTerms {
                principal,
                annual_rate_pct: tranche.annual_rate_pct,
                repayment: tranche.repayment.clone(),
            };
            let loan = solve(terms.principal, terms.annual_rate_pct, &terms.repayment);
            let label = tranche
                .label
                .clone()
                .unwrap_or_else(|| format!("Loan {}", i + 1));
            warnings.extend(
                loan_warnings(&loan, &terms)
                    .into_iter()
                    .map(|w| format!("{label}: {w}")),
            );
            TrancheResult {
                summary: loan.summary(),
                label,
                loan,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

fn rental_ratios(
    annual_cold_rent: Money,
    non_recoverable_costs: Money,
    total_investment: Money,
    equity: Money,
    after_tax_cashflow: Money,
    required_equity: Money,
) -> SummaryRatios {
    let on_investment = |amount: Money| {
        if total_investment > Decimal::ZERO {
            amount / total_investment * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    };
    let equity_yield = if equity > Decimal::ZERO {
        after_tax_cashflow / equity * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    SummaryRatios {
        gross_yield_pct: Some(on_investment(annual_cold_rent)),
        net_yield_pct: Some(on_investment(annual_cold_rent - non_recoverable_costs)),
        equity_yield_pct: Some(equity_yield),
        required_equity,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
