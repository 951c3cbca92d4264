//! # bicycle-transit
//!
//! Bike-share contracts and stations with spatial lookups.
//!
//! ## Features
//!
//! - **Contract resolution**: Find the coverage zone for a map position,
//!   nearest center winning when zones overlap
//! - **Region geometry**: Containment and intersection of coordinate regions
//! - **Station queries**: R-tree backed proximity search and ride planning
//! - **Pluggable networking**: Implement your own data fetching
//!
//! ## Example
//!
//! ```
//! use bicycle_transit::prelude::*;
//! use geo::Point;
//!
//! let toulouse = Contract::new(
//!     ContractName::new("Toulouse"),
//!     Point::new(1.444209, 43.604652),
//!     6000.0,
//!     "http://api.citybik.es/v2/networks/velo",
//!     Provider::CityBikes,
//!     278,
//!     CountryCode::new("FR"),
//! )
//! .unwrap();
//!
//! let provider = StaticContractProvider::from_contracts(vec![toulouse]);
//!
//! let capitole = Point::new(1.4437, 43.6045);
//! let contract = provider.resolve(capitole).unwrap();
//! assert_eq!(contract.name.as_str(), "Toulouse");
//! ```

pub mod identifiers;
pub mod models;
pub mod network;
pub mod provider;
pub mod ride;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{
        contract::Contract,
        region::{Region, Span},
        station::Station,
        traits::*,
        types::*,
    };
    pub use crate::network::traits::*;
    pub use crate::provider::{StaticContractProvider, StationIndex};
    pub use crate::ride::{plan_ride, Place, Ride, RideError, RideSearch};
}

pub use prelude::*;
