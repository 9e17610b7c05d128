use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{pct_to_fraction, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One-off ancillary purchase costs, each in % of the purchase base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AncillaryCostRates {
    /// Real estate transfer tax (Grunderwerbsteuer)
    pub transfer_tax_pct: Percent,
    /// Notary fees
    pub notary_pct: Percent,
    /// Land registry fees
    pub land_registry_pct: Percent,
    /// Broker commission
    pub broker_pct: Percent,
}

impl Default for AncillaryCostRates {
    fn default() -> Self {
        AncillaryCostRates {
            transfer_tax_pct: dec!(3.5),
            notary_pct: dec!(1.5),
            land_registry_pct: dec!(0.5),
            broker_pct: dec!(3.57),
        }
    }
}

impl AncillaryCostRates {
    pub fn total_pct(&self) -> Percent {
        self.transfer_tax_pct + self.notary_pct + self.land_registry_pct + self.broker_pct
    }
}

/// Breakdown of what the purchase costs and how much of it must be borrowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionCosts {
    /// Purchase price plus garage / parking space
    pub purchase_base: Money,
    pub transfer_tax: Money,
    pub notary: Money,
    pub land_registry: Money,
    pub broker: Money,
    /// Sum of all ancillary costs
    pub ancillary_costs: Money,
    /// Renovation or other capital needed on top of the purchase
    pub additional_capital: Money,
    /// purchase_base + additional_capital + ancillary_costs
    pub total_investment: Money,
    /// Cash equity contributed
    pub equity: Money,
    /// total_investment - equity; negative when over-funded
    pub loan_requirement: Money,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Total acquisition cost and resulting loan requirement.
pub fn compute_acquisition(
    purchase_price: Money,
    parking_cost: Money,
    rates: &AncillaryCostRates,
    additional_capital: Money,
    equity: Money,
) -> AcquisitionCosts {
    let purchase_base = purchase_price + parking_cost;
    let share = |pct: Percent| purchase_base * pct_to_fraction(pct);

    let ancillary_costs = share(rates.total_pct());
    let total_investment = purchase_base + additional_capital + ancillary_costs;

    AcquisitionCosts {
        purchase_base,
        transfer_tax: share(rates.transfer_tax_pct),
        notary: share(rates.notary_pct),
        land_registry: share(rates.land_registry_pct),
        broker: share(rates.broker_pct),
        ancillary_costs,
        additional_capital,
        total_investment,
        equity,
        loan_requirement: total_investment - equity,
    }
}
