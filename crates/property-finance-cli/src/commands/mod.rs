pub mod financing;
pub mod investment;
