pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "financing")]
pub mod financing;

#[cfg(feature = "investment")]
pub mod investment;

pub use error::PropertyError;
pub use types::*;

/// Standard result type for all property-finance operations
pub type PropertyResult<T> = Result<T, PropertyError>;
