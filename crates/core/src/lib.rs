//! Bike-share services: station fetching and caching, contract loading,
//! configuration and viewport tracking.

pub mod citybikes;
pub mod config;
pub mod contracts;
pub mod error;
pub mod http;
pub mod poller;
pub mod stations;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the domain crate
pub use bicycle_transit as transit;

pub use config::{Endpoints, Preferences, RemoteConfig};
pub use contracts::ContractRepository;
pub use error::{CoreError, Result};
pub use http::HttpFetcher;
pub use poller::StationPoller;
pub use stations::{StationCache, Stations};
pub use tracker::{ContractEvent, ContractTracker};
