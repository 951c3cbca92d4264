//! Spatial index over a contract's station list.

use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::models::station::Station;
use crate::spatial::index::StationNode;
use crate::spatial::queries::{haversine_distance, meters_to_degrees_approx};

/// Latitude cap used when widening the prefilter radius for longitude
const MAX_PREFILTER_LATITUDE: f64 = 85.0;

#[derive(Clone)]
pub struct StationIndex {
    station_tree: RTree<StationNode>,
}

impl StationIndex {
    pub fn new(stations: &[Station]) -> Self {
        Self::from_shared(stations.iter().cloned().map(Arc::new).collect())
    }

    pub fn from_shared(stations: Vec<Arc<Station>>) -> Self {
        Self {
            station_tree: RTree::bulk_load(stations.into_iter().map(StationNode::new).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.station_tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stations within `radius_m` meters of `point`, closest first
    pub fn stations_near(&self, point: Point, radius_m: f64) -> Vec<Arc<Station>> {
        // Validate radius is positive
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        // Degrees of longitude shrink with latitude, so widen the planar radius
        let latitude = point.y().abs().min(MAX_PREFILTER_LATITUDE);
        let radius_deg = meters_to_degrees_approx(radius_m) / latitude.to_radians().cos();

        let mut found: Vec<(Arc<Station>, f64)> = self
            .station_tree
            .locate_within_distance([point.x(), point.y()], radius_deg * radius_deg)
            .map(|node| (node.station.clone(), haversine_distance(point, node.station.location)))
            .filter(|(_, distance)| *distance <= radius_m)
            .collect();

        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found.into_iter().map(|(station, _)| station).collect()
    }

    /// Find the N nearest stations to a point
    pub fn nearest_stations(&self, point: Point, n: usize) -> Vec<Arc<Station>> {
        self.station_tree
            .nearest_neighbor_iter(&[point.x(), point.y()])
            .take(n)
            .map(|node| node.station.clone())
            .collect()
    }
}
