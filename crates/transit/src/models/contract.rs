//! Bike-share contracts (operator coverage zones).

use geo::Point;

use crate::identifiers::*;
use crate::models::region::Region;
use crate::models::types::*;

/// An operator coverage zone
///
/// Two contracts are equal when their centers are equal; names and urls are
/// not compared.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contract {
    pub name: ContractName,
    pub center: Point,
    /// Coverage radius in meters
    pub radius: f64,
    /// Station feed url
    pub url: String,
    pub provider: Provider,
    pub station_count: u32,
    pub country_code: CountryCode,
}

impl Contract {
    /// Build a contract, rejecting coordinates and radii that cannot form a region
    pub fn new(
        name: ContractName,
        center: Point,
        radius: f64,
        url: impl Into<String>,
        provider: Provider,
        station_count: u32,
        country_code: CountryCode,
    ) -> Result<Self> {
        if !center.y().is_finite() || !(-90.0..=90.0).contains(&center.y()) {
            return Err(BikeShareError::InvalidData(format!(
                "{name}: latitude {} out of range",
                center.y()
            )));
        }
        if !center.x().is_finite() || !(-180.0..=180.0).contains(&center.x()) {
            return Err(BikeShareError::InvalidData(format!(
                "{name}: longitude {} out of range",
                center.x()
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(BikeShareError::InvalidData(format!(
                "{name}: radius {radius} must be positive"
            )));
        }

        Ok(Self {
            name,
            center,
            radius,
            url: url.into(),
            provider,
            station_count,
            country_code,
        })
    }

    /// Covering region, a square of twice the radius on each side
    pub fn region(&self) -> Region {
        Region::from_distance(self.center, self.radius * 2.0, self.radius * 2.0)
    }
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center
    }
}
