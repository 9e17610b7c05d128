use pretty_assertions::assert_eq;
use property_finance_core::financing::loan::RepaymentPlan;
use property_finance_core::investment::acquisition::{compute_acquisition, AncillaryCostRates};
use property_finance_core::investment::analysis::{
    analyze_investment, LoanTranche, PropertyInvestmentInput, UsageMode,
};
use property_finance_core::investment::carbon_levy::{
    assess_carbon_levy, landlord_share_pct, EnergyClass, HeatingFuel, HeatingProfile,
};
use property_finance_core::investment::depreciation::{compute_depreciation, ConstructionPeriod};
use property_finance_core::investment::ledger::{LineKind, LineTag, RentalFigures};
use property_finance_core::PropertyError;
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn rental_input() -> PropertyInvestmentInput {
    serde_json::from_value(serde_json::json!({
        "purchase_price": 250000,
        "additional_capital": 10000,
        "equity": 60000,
        "loans": [
            { "annual_rate_pct": 3.5, "repayment": { "mode": "by_rate", "repayment_rate_pct": 2 } }
        ],
        "monthly_cold_rent": 950,
        "monthly_recoverable_costs": 180,
        "annual_non_recoverable_costs": 900,
        "vacancy_risk_pct": 2,
        "maintenance_reserve_per_sqm": 0.8,
        "floor_area_sqm": 72,
        "heating": { "fuel": "natural_gas", "energy_class": "D" },
        "prior_monthly_income": 2800,
        "location": "Dresden-Neustadt"
    }))
    .unwrap()
}

// ===========================================================================
// Acquisition
// ===========================================================================

#[test]
fn test_total_investment_250k_reference() {
    let costs = compute_acquisition(
        dec!(250000),
        Decimal::ZERO,
        &AncillaryCostRates::default(),
        dec!(10000),
        Decimal::ZERO,
    );
    assert_eq!(costs.ancillary_costs, dec!(22675));
    assert_eq!(costs.total_investment, dec!(282675));
}

// ===========================================================================
// Full analysis
// ===========================================================================

#[test]
fn test_json_input_applies_defaults() {
    let input = rental_input();
    assert_eq!(input.tax_rate_pct, dec!(42));
    assert_eq!(input.building_share_pct, dec!(80));
    assert_eq!(input.usage, UsageMode::Rental);
    assert_eq!(input.construction_period, ConstructionPeriod::From1925To2022);
    assert_eq!(input.ancillary_rates, AncillaryCostRates::default());
}

#[test]
fn test_rental_analysis_end_to_end() {
    let out = analyze_investment(&rental_input()).unwrap();
    let r = &out.result;

    assert_eq!(r.total_investment, dec!(282675));
    assert_eq!(r.location.as_deref(), Some("Dresden-Neustadt"));
    assert_eq!(r.loans.len(), 1);
    assert_eq!(r.loans[0].loan.principal, dec!(222675));
    assert_eq!(r.monthly_warm_rent, dec!(1130));

    // 72 m² class D gas: 115 * 72 * 0.201 = 1664.28 kg, 23.115 kg/m² -> 30%
    let levy = r.carbon_levy.as_ref().unwrap();
    assert_eq!(levy.landlord_share_pct, dec!(30));

    let p = r.projection.as_ref().unwrap();
    assert_eq!(
        p.taxable_result_year_one,
        p.taxable_result_steady_state - r.acquisition.ancillary_costs
    );
    assert_eq!(r.new_monthly_income, p.new_monthly_income_steady_state);

    let first = &r.line_items[0];
    assert_eq!(first.kind, LineKind::Heading);
    assert!(first.tags.contains(&LineTag::Title));
    assert!(r.line_items.iter().any(|l| l.kind == LineKind::CarbonLevy));
}

#[test]
fn test_recoverable_costs_count_and_levy_stays_out_of_tax() {
    let input: PropertyInvestmentInput = serde_json::from_value(serde_json::json!({
        "purchase_price": 250000,
        "equity": 60000,
        "loans": [
            { "annual_rate_pct": 3.5, "repayment": { "mode": "by_rate", "repayment_rate_pct": 2 } }
        ],
        "monthly_cold_rent": 1000,
        "monthly_recoverable_costs": 200,
        "annual_non_recoverable_costs": 1200,
        "vacancy_risk_pct": 2,
        "maintenance_reserve_per_sqm": 1,
        "floor_area_sqm": 80,
        "heating": { "fuel": "heating_oil", "energy_class": "H" }
    }))
    .unwrap();

    let out = analyze_investment(&input).unwrap();
    let r = &out.result;
    let p = r.projection.as_ref().unwrap();
    let buffers = r.risk_buffers.as_ref().unwrap();
    let depreciation = r.depreciation.as_ref().unwrap();

    // 22000 kWh * 0.266 = 5852 kg at 73.15 kg/m² -> 95% of 321.86
    let levy = r.carbon_levy.as_ref().unwrap().landlord_cost;
    assert_eq!(levy, dec!(305.767));

    assert_eq!(
        p.pre_tax_cashflow,
        dec!(12000) + dec!(2400) - dec!(1200) - buffers.vacancy - buffers.maintenance_reserve
            - levy
            - r.annual_debt_service
    );
    assert_eq!(
        p.taxable_result_steady_state,
        dec!(12000) - dec!(1200) - r.annual_interest - depreciation.annual - buffers.vacancy
    );
    assert!(!r
        .line_items
        .iter()
        .any(|l| l.label.contains("passed through")));
}

#[test]
fn test_owner_occupied_ledger_has_no_tax_or_depreciation() {
    let mut input = rental_input();
    input.usage = UsageMode::OwnerOccupied;
    input.tax_rate_pct = dec!(45);
    input.construction_period = ConstructionPeriod::From2023;

    let out = analyze_investment(&input).unwrap();
    let r = &out.result;

    for line in &r.line_items {
        assert!(
            !matches!(
                line.kind,
                LineKind::Depreciation
                    | LineKind::TaxableResult
                    | LineKind::TaxEffect
                    | LineKind::VacancyBuffer
            ),
            "owner ledger contains {:?}",
            line.kind
        );
        assert_eq!(line.year_one, line.steady_state);
    }
    assert!(r.carbon_levy.is_none());
    assert!(r.ratios.equity_yield_pct.is_none());
    assert_eq!(r.ratios.required_equity, dec!(60000));
}

#[test]
fn test_zero_purchase_price_fails_with_field() {
    let mut input = rental_input();
    input.purchase_price = Decimal::ZERO;
    let err = analyze_investment(&input).unwrap_err();
    match err {
        PropertyError::InvalidInput { field, .. } => assert_eq!(field, "purchase_price"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_zero_rent_and_area_resolve_to_zero_items() {
    let mut input = rental_input();
    input.monthly_cold_rent = Decimal::ZERO;
    input.floor_area_sqm = Decimal::ZERO;
    input.equity = Decimal::ZERO;

    let out = analyze_investment(&input).unwrap();
    let r = &out.result;
    assert_eq!(r.ratios.gross_yield_pct, Some(Decimal::ZERO));
    assert_eq!(r.ratios.equity_yield_pct, Some(Decimal::ZERO));
    assert_eq!(r.risk_buffers.as_ref().unwrap().maintenance_reserve, Decimal::ZERO);
    assert_eq!(r.carbon_levy.as_ref().unwrap().landlord_cost, Decimal::ZERO);
}

#[test]
fn test_explicit_tranches_short_of_requirement_warn() {
    let mut input = rental_input();
    input.loans = vec![LoanTranche {
        label: Some("Bank".into()),
        principal: Some(dec!(100000)),
        annual_rate_pct: dec!(3.5),
        repayment: RepaymentPlan::ByDuration { years: dec!(25) },
    }];
    let out = analyze_investment(&input).unwrap();
    assert!(out.warnings.iter().any(|w| w.contains("loan requirement")));
    assert_eq!(out.result.ratios.required_equity, dec!(182675));
}

#[test]
fn test_analysis_is_idempotent() {
    let input = rental_input();
    let a = serde_json::to_string(&analyze_investment(&input).unwrap()).unwrap();
    let b = serde_json::to_string(&analyze_investment(&input).unwrap()).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_landlord_share_is_non_decreasing(a in 0i64..10_000, b in 0i64..10_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = Decimal::new(lo, 2);
        let hi = Decimal::new(hi, 2);
        prop_assert!(landlord_share_pct(lo) <= landlord_share_pct(hi));
    }

    #[test]
    fn prop_heat_pump_and_biomass_never_cost_the_landlord(
        area in 1i64..500,
        kwh in 0i64..200_000,
        biomass in proptest::bool::ANY
    ) {
        let profile = HeatingProfile {
            fuel: if biomass { HeatingFuel::Biomass } else { HeatingFuel::HeatPump },
            energy_class: EnergyClass::H,
            annual_consumption_kwh: Some(Decimal::from(kwh)),
            co2_price_per_tonne: None,
        };
        let a = assess_carbon_levy(&profile, Decimal::from(area));
        prop_assert_eq!(a.landlord_cost, Decimal::ZERO);
    }

    #[test]
    fn prop_depreciation_scales_with_building_share(
        price in 50_000i64..2_000_000,
        share in 1i64..50
    ) {
        let price = Decimal::from(price);
        let single = compute_depreciation(price, Decimal::from(share), ConstructionPeriod::From2023);
        let double = compute_depreciation(price, Decimal::from(share * 2), ConstructionPeriod::From2023);
        prop_assert_eq!(double.annual, single.annual * dec!(2));
    }

    #[test]
    fn prop_tax_effect_opposes_taxable_result(
        taxable in -100_000i64..100_000,
        rate in 0i64..60
    ) {
        let figures = RentalFigures {
            annual_cold_rent: Decimal::ZERO,
            annual_recoverable_costs: Decimal::ZERO,
            non_recoverable_costs: Decimal::ZERO,
            vacancy_buffer: Decimal::ZERO,
            maintenance_reserve: Decimal::ZERO,
            carbon_levy: Decimal::ZERO,
            annual_interest: Decimal::ZERO,
            annual_principal: Decimal::ZERO,
            depreciation: Decimal::ZERO,
            ancillary_costs: Decimal::ZERO,
            tax_rate_pct: Decimal::from(rate),
            prior_monthly_income: Decimal::ZERO,
        };
        let taxable = Decimal::from(taxable);
        let effect = figures.tax_effect(taxable);
        if taxable > Decimal::ZERO {
            prop_assert!(effect <= Decimal::ZERO);
        } else {
            prop_assert!(effect >= Decimal::ZERO);
        }
    }
}
