//! Spatial query utilities for distance and zoom calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point};

/// Screen height MapKit leaves out of the visible area (status bar)
const STATUS_BAR_HEIGHT: f64 = 20.0;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Convert degrees to approximate meters at equator (for bounding box queries)
pub fn degrees_to_meters_approx(degrees: f64) -> f64 {
    degrees * 111_320.0 // meters per degree at equator
}

/// Convert meters to degrees at equator (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / 111_320.0
}

/// Web Mercator zoom level of a viewport
///
/// `longitude_delta` is the visible longitude span, `width`/`height` the
/// viewport size in points and `heading` the camera rotation in degrees.
/// Returns `None` for degenerate viewports.
pub fn zoom_level(longitude_delta: f64, width: f64, height: f64, heading: f64) -> Option<i32> {
    let mut rotation = heading.rem_euclid(360.0);
    if rotation > 270.0 {
        rotation = 360.0 - rotation;
    } else if rotation > 90.0 {
        rotation = (rotation - 180.0).abs();
    }
    let rotation = rotation.to_radians();

    // Longitude span the viewport would show unrotated
    let span_straight = width * longitude_delta
        / (width * rotation.cos() + (height - STATUS_BAR_HEIGHT) * rotation.sin());

    let level = (360.0 * ((width / 128.0) / span_straight)).log2();
    level.is_finite().then(|| level.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from Toulouse to Paris is approximately 589 km
        let toulouse = Point::new(1.444209, 43.604652);
        let paris = Point::new(2.352222, 48.856613);

        let dist = haversine_distance(toulouse, paris);
        assert!((dist - 589_000.0).abs() < 10_000.0);
    }

    #[test]
    fn test_degree_conversions() {
        let meters = degrees_to_meters_approx(meters_to_degrees_approx(500.0));
        assert!((meters - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_level_unrotated() {
        // 360 degrees over 128 points is zoom 0
        assert_eq!(zoom_level(360.0, 128.0, 128.0, 0.0), Some(0));
        // Halving the span adds one level
        assert_eq!(zoom_level(180.0, 128.0, 128.0, 0.0), Some(1));
        assert_eq!(zoom_level(0.0439, 375.0, 667.0, 0.0), Some(14));
    }

    #[test]
    fn test_zoom_level_heading_folds() {
        let north = zoom_level(0.05, 375.0, 667.0, 0.0);
        assert_eq!(zoom_level(0.05, 375.0, 667.0, 180.0), north);
        assert_eq!(zoom_level(0.05, 375.0, 667.0, 360.0), north);
        assert_eq!(zoom_level(0.05, 375.0, 667.0, 30.0), zoom_level(0.05, 375.0, 667.0, 330.0));
    }

    #[test]
    fn test_zoom_level_degenerate() {
        assert_eq!(zoom_level(0.0, 0.0, 0.0, 0.0), None);
    }
}
