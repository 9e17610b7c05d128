//! Carbon levy allocation between landlord and tenant.
//!
//! Covers:
//! 1. **Consumption** -- metered kWh override, or an estimate from the energy
//!    certificate class times floor area.
//! 2. **Emissions** -- kWh times the fuel's CO2 factor.
//! 3. **Landlord share** -- ten-step staircase keyed on kg CO2 per m² per year;
//!    the worse the building, the more of the levy the landlord carries.
//!
//! Tables are plain `const` data; nothing here is mutable.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{pct_to_fraction, with_metadata, ComputationOutput, Money, Percent, SquareMetres};

// ---------------------------------------------------------------------------
// Static tariff data
// ---------------------------------------------------------------------------

/// Levy per tonne of CO2 (EUR).
pub const CO2_PRICE_PER_TONNE: Money = dec!(55);

/// Landlord cost share staircase: (lower bound inclusive, upper bound exclusive,
/// landlord share %), bounds in kg CO2 per m² per year.
pub const LANDLORD_SHARE_TIERS: [(Decimal, Decimal, Percent); 10] = [
    (dec!(0), dec!(12), dec!(0)),
    (dec!(12), dec!(17), dec!(10)),
    (dec!(17), dec!(22), dec!(20)),
    (dec!(22), dec!(27), dec!(30)),
    (dec!(27), dec!(32), dec!(40)),
    (dec!(32), dec!(37), dec!(50)),
    (dec!(37), dec!(42), dec!(60)),
    (dec!(42), dec!(47), dec!(70)),
    (dec!(47), dec!(52), dec!(80)),
    (dec!(52), Decimal::MAX, dec!(95)),
];

/// Heating energy carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingFuel {
    NaturalGas,
    HeatingOil,
    LiquefiedGas,
    DistrictHeating,
    HeatPump,
    Biomass,
}

impl HeatingFuel {
    /// kg CO2 per kWh of final energy.
    pub fn emission_factor(self) -> Decimal {
        match self {
            HeatingFuel::NaturalGas => dec!(0.201),
            HeatingFuel::HeatingOil => dec!(0.266),
            HeatingFuel::LiquefiedGas => dec!(0.239),
            HeatingFuel::DistrictHeating => dec!(0.180),
            HeatingFuel::HeatPump | HeatingFuel::Biomass => Decimal::ZERO,
        }
    }
}

/// Energy certificate efficiency class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyClass {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl EnergyClass {
    /// Representative final-energy demand in kWh per m² per year
    /// (midpoint of the class band; open-ended bands use a nearby value).
    pub fn consumption_intensity(self) -> Decimal {
        match self {
            EnergyClass::APlus => dec!(25),
            EnergyClass::A => dec!(40),
            EnergyClass::B => dec!(62.5),
            EnergyClass::C => dec!(87.5),
            EnergyClass::D => dec!(115),
            EnergyClass::E => dec!(145),
            EnergyClass::F => dec!(180),
            EnergyClass::G => dec!(225),
            EnergyClass::H => dec!(275),
        }
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// How the property is heated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatingProfile {
    pub fuel: HeatingFuel,
    pub energy_class: EnergyClass,
    /// Metered annual heating consumption; overrides the class estimate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_consumption_kwh: Option<Decimal>,
    /// Overrides [`CO2_PRICE_PER_TONNE`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_price_per_tonne: Option<Money>,
}

/// Standalone carbon levy request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonLevyInput {
    pub floor_area_sqm: SquareMetres,
    #[serde(flatten)]
    pub heating: HeatingProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonLevyAssessment {
    pub annual_consumption_kwh: Decimal,
    /// kg CO2 per kWh
    pub emission_factor: Decimal,
    pub co2_kg: Decimal,
    pub co2_intensity_kg_per_sqm: Decimal,
    pub landlord_share_pct: Percent,
    pub price_per_tonne: Money,
    /// Levy for the whole building-year
    pub total_levy: Money,
    pub landlord_cost: Money,
    pub tenant_cost: Money,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Landlord share in % for a CO2 intensity in kg per m² per year.
pub fn landlord_share_pct(co2_intensity: Decimal) -> Percent {
    LANDLORD_SHARE_TIERS
        .iter()
        .find(|(low, high, _)| co2_intensity >= *low && co2_intensity < *high)
        .map(|(_, _, share)| *share)
        .unwrap_or(Decimal::ZERO)
}

/// Annual carbon levy and its landlord / tenant split.
pub fn assess_carbon_levy(
    heating: &HeatingProfile,
    floor_area_sqm: SquareMetres,
) -> CarbonLevyAssessment {
    let annual_consumption_kwh = heating
        .annual_consumption_kwh
        .unwrap_or_else(|| heating.energy_class.consumption_intensity() * floor_area_sqm)
        .max(Decimal::ZERO);
    let emission_factor = heating.fuel.emission_factor();
    let co2_kg = annual_consumption_kwh * emission_factor;

    let co2_intensity_kg_per_sqm = if floor_area_sqm > Decimal::ZERO {
        co2_kg / floor_area_sqm
    } else {
        Decimal::ZERO
    };
    let landlord_share_pct = landlord_share_pct(co2_intensity_kg_per_sqm);

    let price_per_tonne = heating.co2_price_per_tonne.unwrap_or(CO2_PRICE_PER_TONNE);
    let total_levy = co2_kg / dec!(1000) * price_per_tonne;
    let landlord_cost = total_levy * pct_to_fraction(landlord_share_pct);

    CarbonLevyAssessment {
        annual_consumption_kwh,
        emission_factor,
        co2_kg,
        co2_intensity_kg_per_sqm,
        landlord_share_pct,
        price_per_tonne,
        total_levy,
        landlord_cost,
        tenant_cost: total_levy - landlord_cost,
    }
}

/// Assess the carbon levy for a standalone request, wrapped in the output envelope.
pub fn calculate_carbon_levy(input: &CarbonLevyInput) -> ComputationOutput<CarbonLevyAssessment> {
    let mut warnings = Vec::new();
    if input.floor_area_sqm <= Decimal::ZERO {
        warnings.push("Floor area is zero — CO2 intensity and landlord share default to 0".into());
    }

    let assessment = assess_carbon_levy(&input.heating, input.floor_area_sqm);
    if assessment.landlord_share_pct >= dec!(80) {
        warnings.push(format!(
            "CO2 intensity of {:.1} kg/m² puts {}% of the levy on the landlord",
            assessment.co2_intensity_kg_per_sqm, assessment.landlord_share_pct
        ));
    }

    with_metadata(
        "Carbon Levy Allocation (ten-step landlord share)",
        input,
        warnings,
        assessment,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gas_profile(class: EnergyClass) -> HeatingProfile {
        HeatingProfile {
            fuel: HeatingFuel::NaturalGas,
            energy_class: class,
            annual_consumption_kwh: None,
            co2_price_per_tonne: None,
        }
    }

    #[test]
    fn test_staircase_bounds() {
        assert_eq!(landlord_share_pct(dec!(0)), dec!(0));
        assert_eq!(landlord_share_pct(dec!(11.99)), dec!(0));
        assert_eq!(landlord_share_pct(dec!(12)), dec!(10));
        assert_eq!(landlord_share_pct(dec!(16.99)), dec!(10));
        assert_eq!(landlord_share_pct(dec!(17)), dec!(20));
        assert_eq!(landlord_share_pct(dec!(47)), dec!(80));
        assert_eq!(landlord_share_pct(dec!(51.99)), dec!(80));
        assert_eq!(landlord_share_pct(dec!(52)), dec!(95));
        assert_eq!(landlord_share_pct(dec!(500)), dec!(95));
    }

    #[test]
    fn test_every_boundary_starts_a_new_tier() {
        let boundaries = [12, 17, 22, 27, 32, 37, 42, 47, 52];
        for b in boundaries {
            let at = landlord_share_pct(Decimal::from(b));
            let below = landlord_share_pct(Decimal::from(b) - dec!(0.001));
            assert!(at > below, "boundary {b}: {at} should exceed {below}");
        }
    }

    #[test]
    fn test_negative_intensity_is_zero_share() {
        assert_eq!(landlord_share_pct(dec!(-1)), Decimal::ZERO);
    }

    #[test]
    fn test_class_estimate_gas() {
        // 80 m² class C: 87.5 * 80 = 7000 kWh -> 1407 kg -> 17.5875 kg/m² -> 20%
        let a = assess_carbon_levy(&gas_profile(EnergyClass::C), dec!(80));
        assert_eq!(a.annual_consumption_kwh, dec!(7000));
        assert_eq!(a.co2_kg, dec!(1407));
        assert_eq!(a.landlord_share_pct, dec!(20));
        // 1.407 t * 55 = 77.385
        assert_eq!(a.total_levy, dec!(77.385));
        assert_eq!(a.landlord_cost, dec!(15.477));
        assert_eq!(a.tenant_cost, dec!(61.908));
    }

    #[test]
    fn test_metered_override_wins() {
        let mut profile = gas_profile(EnergyClass::A);
        profile.annual_consumption_kwh = Some(dec!(20000));
        let a = assess_carbon_levy(&profile, dec!(100));
        assert_eq!(a.annual_consumption_kwh, dec!(20000));
        // 4020 kg / 100 m² = 40.2 -> 60%
        assert_eq!(a.landlord_share_pct, dec!(60));
    }

    #[test]
    fn test_heat_pump_and_biomass_cost_nothing() {
        for fuel in [HeatingFuel::HeatPump, HeatingFuel::Biomass] {
            let profile = HeatingProfile {
                fuel,
                energy_class: EnergyClass::H,
                annual_consumption_kwh: Some(dec!(50000)),
                co2_price_per_tonne: Some(dec!(300)),
            };
            let a = assess_carbon_levy(&profile, dec!(60));
            assert_eq!(a.landlord_cost, Decimal::ZERO);
            assert_eq!(a.total_levy, Decimal::ZERO);
        }
    }

    #[test]
    fn test_zero_floor_area() {
        let a = assess_carbon_levy(&gas_profile(EnergyClass::G), Decimal::ZERO);
        assert_eq!(a.co2_intensity_kg_per_sqm, Decimal::ZERO);
        assert_eq!(a.landlord_cost, Decimal::ZERO);
    }

    #[test]
    fn test_price_override() {
        let mut profile = gas_profile(EnergyClass::C);
        profile.co2_price_per_tonne = Some(dec!(110));
        let a = assess_carbon_levy(&profile, dec!(80));
        assert_eq!(a.total_levy, dec!(154.77));
    }

    #[test]
    fn test_calculate_wrapper_warns_on_high_share() {
        let input = CarbonLevyInput {
            floor_area_sqm: dec!(100),
            heating: HeatingProfile {
                fuel: HeatingFuel::HeatingOil,
                energy_class: EnergyClass::H,
                annual_consumption_kwh: None,
                co2_price_per_tonne: None,
            },
        };
        let out = calculate_carbon_levy(&input);
        // 275 kWh/m² * 0.266 = 73.15 kg/m²
        assert_eq!(out.result.landlord_share_pct, dec!(95));
        assert!(out.warnings.iter().any(|w| w.contains("95%")));
    }

    #[test]
    fn test_energy_class_serde() {
        let c: EnergyClass = serde_json::from_str(r#""A+""#).unwrap();
        assert_eq!(c, EnergyClass::APlus);
    }
}
