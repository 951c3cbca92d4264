//! Axis-aligned coordinate regions.
//!
//! A region is a center plus a latitude/longitude span in degrees, the same
//! shape a map viewport reports. Points use `geo` conventions: `x` is
//! longitude, `y` is latitude.

use geo::Point;
use rstar::AABB;

use crate::spatial::queries::meters_to_degrees_approx;

/// Latitude never gets closer to the poles than this when converting
/// longitudinal meters to degrees.
const MAX_PROJECTED_LATITUDE: f64 = 89.0;

/// Extent of a region in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub center: Point,
    pub span: Span,
}

impl Region {
    pub fn new(center: Point, span: Span) -> Self {
        Self { center, span }
    }

    /// Build a region covering `latitudinal_m` by `longitudinal_m` meters
    /// around `center`.
    pub fn from_distance(center: Point, latitudinal_m: f64, longitudinal_m: f64) -> Self {
        let latitude = center.y().clamp(-MAX_PROJECTED_LATITUDE, MAX_PROJECTED_LATITUDE);
        let latitude_delta = meters_to_degrees_approx(latitudinal_m);
        let longitude_delta = meters_to_degrees_approx(longitudinal_m) / latitude.to_radians().cos();

        Self {
            center,
            span: Span {
                latitude_delta,
                longitude_delta,
            },
        }
    }

    pub fn north_west(&self) -> Point {
        Point::new(
            self.center.x() - self.span.longitude_delta / 2.0,
            self.center.y() + self.span.latitude_delta / 2.0,
        )
    }

    pub fn north_east(&self) -> Point {
        Point::new(
            self.center.x() + self.span.longitude_delta / 2.0,
            self.center.y() + self.span.latitude_delta / 2.0,
        )
    }

    pub fn south_west(&self) -> Point {
        Point::new(
            self.center.x() - self.span.longitude_delta / 2.0,
            self.center.y() - self.span.latitude_delta / 2.0,
        )
    }

    pub fn south_east(&self) -> Point {
        Point::new(
            self.center.x() + self.span.longitude_delta / 2.0,
            self.center.y() - self.span.latitude_delta / 2.0,
        )
    }

    /// Point-in-box test, inclusive on every edge
    pub fn contains(&self, point: Point) -> bool {
        let sw = self.south_west();
        let ne = self.north_east();

        sw.y() <= point.y() && point.y() <= ne.y() && sw.x() <= point.x() && point.x() <= ne.x()
    }

    /// Overlap test on both axes. Touching edges count as intersecting.
    pub fn intersects(&self, other: &Region) -> bool {
        let (sw, ne) = (self.south_west(), self.north_east());
        let (other_sw, other_ne) = (other.south_west(), other.north_east());

        let lat_intersects = other_ne.y() >= sw.y() && other_sw.y() <= ne.y();
        let lng_intersects = other_ne.x() >= sw.x() && other_sw.x() <= ne.x();

        lat_intersects && lng_intersects
    }

    pub(crate) fn envelope(&self) -> AABB<[f64; 2]> {
        let sw = self.south_west();
        let ne = self.north_east();
        AABB::from_corners([sw.x(), sw.y()], [ne.x(), ne.y()])
    }
}
