//! Contract and station providers.

pub mod contract_provider;
pub mod station_index;

pub use contract_provider::StaticContractProvider;
pub use station_index::StationIndex;
