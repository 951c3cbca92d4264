//! R-tree nodes for spatial indexing.
//!
//! Wraps bike-share entities with geometric data for efficient spatial queries.
//!
//! ## Two-Stage Filtering
//!
//! The spatial queries use a two-stage filtering approach:
//! 1. **R-tree filter**: Uses the planar envelope in degrees for fast candidate lookup
//! 2. **Exact filter**: Applies the region test or Haversine distance on the candidates

use std::sync::Arc;
use geo::Point;
use rstar::{Envelope, PointDistance, RTreeObject, AABB};

use crate::models::contract::Contract;
use crate::models::region::Region;
use crate::models::station::Station;

// ============================================================================
// Contract Spatial Node
// ============================================================================

#[derive(Clone)]
pub struct ContractNode {
    pub contract: Arc<Contract>,
    /// Position in the loaded contract list, used for tie-breaking
    pub order: usize,
    pub region: Region,
    aabb: AABB<[f64; 2]>,
}

impl ContractNode {
    pub fn new(order: usize, contract: Arc<Contract>) -> Self {
        let region = contract.region();
        Self {
            aabb: region.envelope(),
            region,
            contract,
            order,
        }
    }
}

impl RTreeObject for ContractNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

impl PointDistance for ContractNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        // Zero anywhere inside the region
        self.aabb.distance_2(point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.region.contains(Point::new(point[0], point[1]))
    }
}

// ============================================================================
// Station Spatial Node
// ============================================================================

#[derive(Clone)]
pub struct StationNode {
    pub station: Arc<Station>,
    point: [f64; 2],
}

impl StationNode {
    pub fn new(station: Arc<Station>) -> Self {
        Self {
            point: [station.location.x(), station.location.y()],
            station,
        }
    }
}

impl RTreeObject for StationNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for StationNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
