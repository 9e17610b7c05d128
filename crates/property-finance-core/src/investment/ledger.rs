//! Year-of-acquisition vs. steady-state cashflow and tax ledger.
//!
//! Rental ledger sections, in order:
//! 1. Cashflow (the investor's account)
//! 2. Tax computation
//! 3. Results after tax
//! 4. Personal monthly position
//!
//! The owner-occupied ledger only tracks running cost against disposable
//! income; it never carries depreciation or tax lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_value::MONTHS_PER_YEAR;
use crate::types::{pct_to_fraction, Money, Percent};

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// Presentation hint attached to a ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineTag {
    Title,
    Emphasis,
    Separator,
    Profit,
    Loss,
}

/// What a ledger line represents, independent of its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Heading,
    Separator,
    ColdRent,
    RecoverableCollected,
    NonRecoverableCosts,
    VacancyBuffer,
    MaintenanceReserve,
    CarbonLevy,
    DebtService,
    PreTaxCashflow,
    Interest,
    Depreciation,
    AncillaryCosts,
    TaxableResult,
    TaxEffect,
    AfterTaxCashflow,
    TotalAnnualCost,
    PriorIncome,
    MonthlyCashflow,
    NewIncome,
}

/// One row of the ledger. `None` values render as blank cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: LineKind,
    pub label: String,
    pub year_one: Option<Money>,
    pub steady_state: Option<Money>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<LineTag>,
}

impl LineItem {
    pub fn title(label: &str) -> Self {
        LineItem {
            kind: LineKind::Heading,
            label: label.to_string(),
            year_one: None,
            steady_state: None,
            tags: vec![LineTag::Title],
        }
    }

    pub fn separator() -> Self {
        LineItem {
            kind: LineKind::Separator,
            label: "---".to_string(),
            year_one: None,
            steady_state: None,
            tags: vec![LineTag::Separator],
        }
    }

    pub fn values(kind: LineKind, label: &str, year_one: Money, steady_state: Money) -> Self {
        LineItem {
            kind,
            label: label.to_string(),
            year_one: Some(year_one),
            steady_state: Some(steady_state),
            tags: Vec::new(),
        }
    }

    /// Same value in both columns.
    pub fn flat(kind: LineKind, label: &str, value: Money) -> Self {
        Self::values(kind, label, value, value)
    }

    pub fn tagged(mut self, tags: &[LineTag]) -> Self {
        self.tags.extend_from_slice(tags);
        self
    }
}

fn profit_or_loss(favourable: bool) -> LineTag {
    if favourable {
        LineTag::Profit
    } else {
        LineTag::Loss
    }
}

// ---------------------------------------------------------------------------
// Rental ledger
// ---------------------------------------------------------------------------

/// Annual figures feeding the rental ledger. Costs are positive amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalFigures {
    pub annual_cold_rent: Money,
    pub annual_recoverable_costs: Money,
    pub non_recoverable_costs: Money,
    pub vacancy_buffer: Money,
    pub maintenance_reserve: Money,
    /// Landlord share of the carbon levy; reduces cashflow, not the taxable result
    pub carbon_levy: Money,
    pub annual_interest: Money,
    pub annual_principal: Money,
    pub depreciation: Money,
    /// One-off ancillary purchase costs, deductible in year one only
    pub ancillary_costs: Money,
    pub tax_rate_pct: Percent,
    pub prior_monthly_income: Money,
}

/// Derived rental cashflow and tax figures for both columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalProjection {
    pub pre_tax_cashflow: Money,
    pub taxable_result_year_one: Money,
    pub taxable_result_steady_state: Money,
    /// Positive = tax saving, negative = tax charge
    pub tax_effect_year_one: Money,
    pub tax_effect_steady_state: Money,
    pub after_tax_cashflow_year_one: Money,
    pub after_tax_cashflow_steady_state: Money,
    pub new_monthly_income_year_one: Money,
    pub new_monthly_income_steady_state: Money,
}

impl RentalFigures {
    pub fn debt_service(&self) -> Money {
        self.annual_interest + self.annual_principal
    }

    /// Tax effect of a taxable result: a loss saves tax, a profit costs tax.
    pub fn tax_effect(&self, taxable_result: Money) -> Money {
        -(taxable_result * pct_to_fraction(self.tax_rate_pct))
    }

    pub fn project(&self) -> RentalProjection {
        let pre_tax_cashflow = self.annual_cold_rent + self.annual_recoverable_costs
            - self.non_recoverable_costs
            - self.vacancy_buffer
            - self.maintenance_reserve
            - self.carbon_levy
            - self.debt_service();

        let taxable_result_steady_state = self.annual_cold_rent
            - self.non_recoverable_costs
            - self.annual_interest
            - self.depreciation
            - self.vacancy_buffer;
        let taxable_result_year_one = taxable_result_steady_state - self.ancillary_costs;

        let tax_effect_year_one = self.tax_effect(taxable_result_year_one);
        let tax_effect_steady_state = self.tax_effect(taxable_result_steady_state);
        let after_tax_cashflow_year_one = pre_tax_cashflow + tax_effect_year_one;
        let after_tax_cashflow_steady_state = pre_tax_cashflow + tax_effect_steady_state;

        RentalProjection {
            pre_tax_cashflow,
            taxable_result_year_one,
            taxable_result_steady_state,
            tax_effect_year_one,
            tax_effect_steady_state,
            after_tax_cashflow_year_one,
            after_tax_cashflow_steady_state,
            new_monthly_income_year_one: self.prior_monthly_income
                + after_tax_cashflow_year_one / MONTHS_PER_YEAR,
            new_monthly_income_steady_state: self.prior_monthly_income
                + after_tax_cashflow_steady_state / MONTHS_PER_YEAR,
        }
    }

    /// Ordered ledger lines. Deductions are shown as negative amounts.
    pub fn line_items(&self, p: &RentalProjection) -> Vec<LineItem> {
        let mut lines = vec![
            LineItem::title("Cashflow (your account)"),
            LineItem::flat(LineKind::ColdRent, " Cold rent p.a.", self.annual_cold_rent),
        ];

        if !self.annual_recoverable_costs.is_zero() {
            lines.push(LineItem::flat(
                LineKind::RecoverableCollected,
                " + Recoverable costs collected p.a.",
                self.annual_recoverable_costs,
            ));
        }

        lines.push(LineItem::flat(
            LineKind::NonRecoverableCosts,
            " - Non-recoverable costs p.a.",
            -self.non_recoverable_costs,
        ));
        lines.push(LineItem::flat(
            LineKind::VacancyBuffer,
            " - Vacancy buffer p.a.",
            -self.vacancy_buffer,
        ));
        lines.push(LineItem::flat(
            LineKind::MaintenanceReserve,
            " - Maintenance reserve p.a.",
            -self.maintenance_reserve,
        ));
        if !self.carbon_levy.is_zero() {
            lines.push(LineItem::flat(
                LineKind::CarbonLevy,
                " - Carbon levy (landlord share) p.a.",
                -self.carbon_levy,
            ));
        }
        lines.extend([
            LineItem::flat(LineKind::DebtService, " - Loan service p.a.", -self.debt_service()),
            LineItem::flat(
                LineKind::PreTaxCashflow,
                " = Cashflow before tax p.a.",
                p.pre_tax_cashflow,
            )
            .tagged(&[LineTag::Emphasis]),
            LineItem::separator(),
            LineItem::title("Tax computation"),
            LineItem::flat(LineKind::Interest, " - Interest p.a.", -self.annual_interest),
            LineItem::flat(LineKind::Depreciation, " - Depreciation p.a.", -self.depreciation),
            LineItem::values(
                LineKind::AncillaryCosts,
                " - Deductible ancillary costs (year one)",
                -self.ancillary_costs,
                Decimal::ZERO,
            ),
            LineItem::values(
                LineKind::TaxableResult,
                " = Taxable profit / loss p.a.",
                p.taxable_result_year_one,
                p.taxable_result_steady_state,
            )
            .tagged(&[LineTag::Emphasis]),
            LineItem::separator(),
            LineItem::title("Results"),
            LineItem::values(
                LineKind::TaxEffect,
                " + Tax saving / - tax charge p.a.",
                p.tax_effect_year_one,
                p.tax_effect_steady_state,
            )
            .tagged(&[
                LineTag::Emphasis,
                profit_or_loss(p.tax_effect_steady_state >= Decimal::ZERO),
            ]),
            LineItem::values(
                LineKind::AfterTaxCashflow,
                " = Cashflow after tax p.a.",
                p.after_tax_cashflow_year_one,
                p.after_tax_cashflow_steady_state,
            )
            .tagged(&[LineTag::Emphasis]),
            LineItem::separator(),
            LineItem::title("Personal monthly position"),
            LineItem::flat(
                LineKind::PriorIncome,
                " Disposable income (before)",
                self.prior_monthly_income,
            ),
            LineItem::values(
                LineKind::MonthlyCashflow,
                " +/- Monthly property cashflow",
                p.after_tax_cashflow_year_one / MONTHS_PER_YEAR,
                p.after_tax_cashflow_steady_state / MONTHS_PER_YEAR,
            ),
            LineItem::values(
                LineKind::NewIncome,
                " = New disposable income",
                p.new_monthly_income_year_one,
                p.new_monthly_income_steady_state,
            )
            .tagged(&[
                LineTag::Emphasis,
                profit_or_loss(p.new_monthly_income_steady_state >= self.prior_monthly_income),
            ]),
        ]);

        lines
    }
}

// ---------------------------------------------------------------------------
// Owner-occupied ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerFigures {
    pub non_recoverable_costs: Money,
    pub debt_service: Money,
    pub prior_monthly_income: Money,
}

impl OwnerFigures {
    pub fn total_annual_cost(&self) -> Money {
        self.non_recoverable_costs + self.debt_service
    }

    pub fn new_monthly_income(&self) -> Money {
        self.prior_monthly_income - self.total_annual_cost() / MONTHS_PER_YEAR
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        let total = self.total_annual_cost();
        let new_income = self.new_monthly_income();
        vec![
            LineItem::flat(LineKind::DebtService, "Loan service p.a.", -self.debt_service),
            LineItem::flat(
                LineKind::NonRecoverableCosts,
                "Running costs p.a.",
                -self.non_recoverable_costs,
            ),
            LineItem::separator(),
            LineItem::flat(LineKind::TotalAnnualCost, "Total annual cost", -total)
                .tagged(&[LineTag::Emphasis]),
            LineItem::separator(),
            LineItem::title("Personal monthly position"),
            LineItem::flat(
                LineKind::PriorIncome,
                " Disposable income (before)",
                self.prior_monthly_income,
            ),
            LineItem::flat(
                LineKind::MonthlyCashflow,
                " - Monthly property cost",
                -total / MONTHS_PER_YEAR,
            ),
            LineItem::flat(LineKind::NewIncome, " = New disposable income", new_income).tagged(&[
                LineTag::Emphasis,
                profit_or_loss(new_income >= self.prior_monthly_income),
            ]),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
