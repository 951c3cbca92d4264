//! Bike-share data models, types, and traits.

pub mod contract;
pub mod region;
pub mod station;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use contract::Contract;
pub use region::{Region, Span};
pub use station::Station;
pub use traits::ContractProvider;
pub use types::{BikeShareError, Provider, Result};
