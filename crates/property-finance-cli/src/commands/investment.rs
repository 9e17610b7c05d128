use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use property_finance_core::investment::analysis::{self, PropertyInvestmentInput};
use property_finance_core::investment::carbon_levy::{self, CarbonLevyInput, HeatingProfile};

use crate::input;

/// Arguments for the full investment analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the carbon levy split
#[derive(Args)]
pub struct CarbonLevyArgs {
    /// Heated floor area in m²
    #[arg(long)]
    pub floor_area: Option<Decimal>,

    /// natural_gas, heating_oil, liquefied_gas, district_heating, heat_pump or biomass
    #[arg(long)]
    pub fuel: Option<String>,

    /// Energy certificate class (A+ to H)
    #[arg(long)]
    pub energy_class: Option<String>,

    /// Metered annual consumption in kWh (overrides the class estimate)
    #[arg(long)]
    pub consumption: Option<Decimal>,

    /// CO2 price per tonne
    #[arg(long)]
    pub co2_price: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: PropertyInvestmentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file> or stdin required for investment analysis".into());
    };
    let result = analysis::analyze_investment(&property)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_carbon_levy(args: CarbonLevyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let levy_input: CarbonLevyInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(floor_area_sqm) = args.floor_area {
        CarbonLevyInput {
            floor_area_sqm,
            heating: HeatingProfile {
                fuel: parse_label(args.fuel.as_deref(), "--fuel")?,
                energy_class: parse_label(args.energy_class.as_deref(), "--energy-class")?,
                annual_consumption_kwh: args.consumption,
                co2_price_per_tonne: args.co2_price,
            },
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file>, stdin or --floor-area with --fuel and --energy-class required".into());
    };
    let result = carbon_levy::calculate_carbon_levy(&levy_input);
    Ok(serde_json::to_value(result)?)
}

/// Parse a flag value through the type's serde labels.
fn parse_label<T: serde::de::DeserializeOwned>(
    value: Option<&str>,
    flag: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let raw = value.ok_or_else(|| format!("{flag} is required"))?;
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|_| format!("unrecognised value '{raw}' for {flag}").into())
}
