pub mod acquisition;
pub mod analysis;
pub mod carbon_levy;
pub mod depreciation;
pub mod ledger;
