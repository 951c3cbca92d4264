//! Core traits for bike-share entities.
//!
//! These traits define the public interface for contract data.
//! Implementations can be in-memory, database-backed, or remote.

use geo::Point;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::contract::Contract;
use crate::models::region::Region;

/// Provider of the contract list with lookup and query methods
pub trait ContractProvider: Send + Sync {
    fn get_contract(&self, name: &ContractName) -> Option<Arc<Contract>>;

    fn all_contracts(&self) -> Vec<Arc<Contract>>;

    /// Contract covering `point`, nearest center wins when regions overlap
    fn resolve(&self, point: Point) -> Option<Arc<Contract>>;

    /// Contracts whose region overlaps `region`
    fn contracts_intersecting(&self, region: &Region) -> Vec<Arc<Contract>>;
}
