//! In-memory contract provider.
//!
//! Holds the contract list loaded for the session with a spatial index over
//! contract regions, and answers "which contract covers this point".

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::identifiers::*;
use crate::models::{contract::Contract, region::Region, traits::*};
use crate::spatial::index::ContractNode;
use crate::spatial::queries::haversine_distance;

/// In-memory contract provider with spatial indexing
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct StaticContractProvider {
    contracts: Vec<Arc<Contract>>,
    contract_map: HashMap<ContractName, Arc<Contract>>,
    contract_tree: RTree<ContractNode>,
}

impl StaticContractProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self {
            contracts: Vec::new(),
            contract_map: HashMap::new(),
            contract_tree: RTree::new(),
        }
    }

    /// Build provider from a contract list, keeping its order
    pub fn from_contracts(contracts: Vec<Contract>) -> Self {
        let contracts: Vec<Arc<Contract>> = contracts.into_iter().map(Arc::new).collect();

        let contract_map: HashMap<_, _> = contracts
            .iter()
            .map(|c| (c.name.clone(), c.clone()))
            .collect();

        let contract_tree = RTree::bulk_load(
            contracts
                .iter()
                .enumerate()
                .map(|(order, c)| ContractNode::new(order, c.clone()))
                .collect(),
        );

        Self {
            contracts,
            contract_map,
            contract_tree,
        }
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl Default for StaticContractProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractProvider for StaticContractProvider {
    fn get_contract(&self, name: &ContractName) -> Option<Arc<Contract>> {
        self.contract_map.get(name).cloned()
    }

    fn all_contracts(&self) -> Vec<Arc<Contract>> {
        self.contracts.clone()
    }

    fn resolve(&self, point: Point) -> Option<Arc<Contract>> {
        let mut candidates: Vec<&ContractNode> = self
            .contract_tree
            .locate_within_distance([point.x(), point.y()], 0.0)
            .filter(|node| node.region.contains(point))
            .collect();

        // The tree yields in its own order; ties go to the contract loaded first
        candidates.sort_by_key(|node| node.order);

        let mut nearest: Option<(&ContractNode, f64)> = None;
        for node in candidates {
            let distance = haversine_distance(point, node.contract.center);
            match nearest {
                Some((_, min)) if distance >= min => {}
                _ => nearest = Some((node, distance)),
            }
        }

        nearest.map(|(node, _)| node.contract.clone())
    }

    fn contracts_intersecting(&self, region: &Region) -> Vec<Arc<Contract>> {
        self.contracts
            .iter()
            .filter(|c| c.region().intersects(region))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::Provider;

    fn contract(name: &str, lon: f64, lat: f64, radius: f64) -> Contract {
        Contract::new(
            name.into(),
            Point::new(lon, lat),
            radius,
            format!("http://api.citybik.es/v2/networks/{}", name.to_lowercase()),
            Provider::CityBikes,
            10,
            "FR".into(),
        )
        .unwrap()
    }

    fn provider() -> StaticContractProvider {
        StaticContractProvider::from_contracts(vec![
            contract("Toulouse", 1.444209, 43.604652, 6000.0),
            contract("Lyon", 4.835659, 45.764043, 8000.0),
            // Overlaps the east side of Toulouse
            contract("Balma", 1.50, 43.61, 3000.0),
        ])
    }

    #[test]
    fn test_empty_provider() {
        let provider = StaticContractProvider::new();
        assert!(provider.is_empty());
        assert!(provider.resolve(Point::new(1.44, 43.6)).is_none());
    }

    #[test]
    fn test_resolve_single_match() {
        let resolved = provider().resolve(Point::new(4.83, 45.76)).unwrap();
        assert_eq!(resolved.name.as_str(), "Lyon");
    }

    #[test]
    fn test_resolve_no_match() {
        // Paris
        assert!(provider().resolve(Point::new(2.352222, 48.856613)).is_none());
    }

    #[test]
    fn test_resolve_overlap_picks_nearest_center() {
        let provider = provider();

        let near_toulouse = provider.resolve(Point::new(1.45, 43.605)).unwrap();
        assert_eq!(near_toulouse.name.as_str(), "Toulouse");

        let near_balma = provider.resolve(Point::new(1.495, 43.61)).unwrap();
        assert_eq!(near_balma.name.as_str(), "Balma");
    }

    #[test]
    fn test_resolve_tie_keeps_first_loaded() {
        // Same center and radius, different names
        let provider = StaticContractProvider::from_contracts(vec![
            contract("First", 2.0, 45.0, 1000.0),
            contract("Second", 2.0, 45.0, 1000.0),
        ]);

        let resolved = provider.resolve(Point::new(2.001, 45.001)).unwrap();
        assert_eq!(resolved.name.as_str(), "First");
    }

    #[test]
    fn test_lookup_by_name() {
        let provider = provider();
        assert!(provider.get_contract(&"Lyon".into()).is_some());
        assert!(provider.get_contract(&"Paris".into()).is_none());
        assert_eq!(provider.all_contracts().len(), 3);
    }

    #[test]
    fn test_contracts_intersecting() {
        let provider = provider();
        let viewport = Region::from_distance(Point::new(1.47, 43.607), 2000.0, 2000.0);

        let names: Vec<_> = provider
            .contracts_intersecting(&viewport)
            .iter()
            .map(|c| c.name.to_string())
            .collect();
        assert_eq!(names, vec!["Toulouse", "Balma"]);
    }
}
