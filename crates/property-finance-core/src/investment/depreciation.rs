use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{pct_to_fraction, Money, Percent};

/// Construction-year bracket, which fixes the straight-line depreciation (AfA) rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConstructionPeriod {
    #[serde(rename = "before_1925", alias = "vor 1925")]
    Before1925,
    #[default]
    #[serde(rename = "1925_to_2022", alias = "1925 - 2022")]
    From1925To2022,
    #[serde(rename = "from_2023", alias = "ab 2023")]
    From2023,
}

impl ConstructionPeriod {
    pub fn from_year(year: u32) -> Self {
        match year {
            0..=1924 => ConstructionPeriod::Before1925,
            1925..=2022 => ConstructionPeriod::From1925To2022,
            _ => ConstructionPeriod::From2023,
        }
    }

    /// Annual depreciation rate in %.
    pub fn depreciation_rate_pct(self) -> Percent {
        match self {
            ConstructionPeriod::Before1925 => dec!(2.5),
            ConstructionPeriod::From1925To2022 => dec!(2.0),
            ConstructionPeriod::From2023 => dec!(3.0),
        }
    }
}

/// Annual building depreciation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depreciation {
    pub rate_pct: Percent,
    /// Building share of the purchase price; land is never depreciable
    pub base: Money,
    pub annual: Money,
}

pub fn compute_depreciation(
    purchase_price: Money,
    building_share_pct: Percent,
    period: ConstructionPeriod,
) -> Depreciation {
    let rate_pct = period.depreciation_rate_pct();
    let base = purchase_price * pct_to_fraction(building_share_pct);
    Depreciation {
        rate_pct,
        base,
        annual: base * pct_to_fraction(rate_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rates_by_period() {
        assert_eq!(ConstructionPeriod::Before1925.depreciation_rate_pct(), dec!(2.5));
        assert_eq!(ConstructionPeriod::From1925To2022.depreciation_rate_pct(), dec!(2.0));
        assert_eq!(ConstructionPeriod::From2023.depreciation_rate_pct(), dec!(3.0));
    }

    #[test]
    fn test_from_year_boundaries() {
        assert_eq!(ConstructionPeriod::from_year(1924), ConstructionPeriod::Before1925);
        assert_eq!(ConstructionPeriod::from_year(1925), ConstructionPeriod::From1925To2022);
        assert_eq!(ConstructionPeriod::from_year(2022), ConstructionPeriod::From1925To2022);
        assert_eq!(ConstructionPeriod::from_year(2023), ConstructionPeriod::From2023);
    }

    #[test]
    fn test_building_share_base() {
        let d = compute_depreciation(dec!(250000), dec!(80), ConstructionPeriod::From1925To2022);
        assert_eq!(d.base, dec!(200000));
        assert_eq!(d.annual, dec!(4000));
    }

    #[test]
    fn test_new_build_rate() {
        let d = compute_depreciation(dec!(400000), dec!(75), ConstructionPeriod::From2023);
        assert_eq!(d.annual, dec!(9000));
    }

    #[test]
    fn test_zero_share_no_depreciation() {
        let d = compute_depreciation(dec!(400000), Decimal::ZERO, ConstructionPeriod::Before1925);
        assert_eq!(d.annual, Decimal::ZERO);
    }

    #[test]
    fn test_period_accepts_form_labels() {
        let p: ConstructionPeriod = serde_json::from_str(r#""vor 1925""#).unwrap();
        assert_eq!(p, ConstructionPeriod::Before1925);
        let p: ConstructionPeriod = serde_json::from_str(r#""from_2023""#).unwrap();
        assert_eq!(p, ConstructionPeriod::From2023);
    }
}
