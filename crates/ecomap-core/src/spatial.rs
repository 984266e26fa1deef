use geo::{Coord, HaversineDestination, HaversineDistance, LineString, Polygon};

use crate::error::EcomapError;
use crate::model::LngLat;

/// Vertex count of the zone buffer drawn by the dashboard.
pub const DEFAULT_ZONE_STEPS: usize = 64;

/// Great-circle distance in kilometres between a query origin and a facility.
///
/// Facilities without a usable position are infinitely far away, so they
/// can never fall inside a radius.
pub fn distance_km(origin: LngLat, target: Option<LngLat>) -> f64 {
    let Some(target) = target else {
        return f64::INFINITY;
    };
    if !origin.is_finite() || !target.is_finite() {
        return f64::INFINITY;
    }
    let meters = origin.to_point().haversine_distance(&target.to_point());
    if meters.is_nan() {
        f64::INFINITY
    } else {
        meters / 1000.0
    }
}

/// Whether a computed distance lies inside the zone.
///
/// A radius that is not strictly positive matches nothing, even a
/// facility sitting exactly on the origin.
pub fn within_radius(distance_km: f64, radius_km: f64) -> bool {
    radius_km > 0.0 && distance_km <= radius_km
}

/// Circular buffer around `center`, used by renderers to draw the same
/// zone the engine filters with.
///
/// Vertices are geodesic destinations at evenly spaced bearings, walking
/// counter-clockwise from due north.
pub fn zone_polygon(center: LngLat, radius_km: f64, steps: usize) -> Result<Polygon<f64>, EcomapError> {
    if !center.is_finite() {
        return Err(EcomapError::InvalidQuery(format!(
            "zone center {center} is not a finite coordinate"
        )));
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(EcomapError::InvalidQuery(format!(
            "zone radius must be a positive number of kilometres, got {radius_km}"
        )));
    }
    if steps < 3 {
        return Err(EcomapError::InvalidQuery(format!(
            "zone polygon needs at least 3 steps, got {steps}"
        )));
    }

    let origin = center.to_point();
    let meters = radius_km * 1000.0;
    let coords: Vec<Coord<f64>> = (0..steps)
        .map(|i| {
            let bearing = i as f64 * -360.0 / steps as f64;
            Coord::from(origin.haversine_destination(bearing, meters))
        })
        .collect();

    // Polygon::new closes the exterior ring.
    Ok(Polygon::new(LineString::from(coords), vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = LngLat::new(-70.6, -33.4);
        assert!(distance_km(p, Some(p)) < 1e-9);
    }

    #[test]
    fn test_santiago_neighbourhood_distance() {
        // Two points about 1.45 km apart in Santiago
        let d = distance_km(LngLat::new(-70.6, -33.4), Some(LngLat::new(-70.61, -33.41)));
        assert!((d - 1.45).abs() < 0.05, "expected ~1.45 km, got {d}");
    }

    #[test]
    fn test_missing_or_nan_location_is_infinite() {
        let origin = LngLat::new(-70.6, -33.4);
        assert_eq!(distance_km(origin, None), f64::INFINITY);
        assert_eq!(
            distance_km(origin, Some(LngLat::new(f64::NAN, -33.4))),
            f64::INFINITY
        );
    }

    #[test]
    fn test_non_positive_radius_matches_nothing() {
        assert!(!within_radius(0.0, 0.0));
        assert!(!within_radius(0.0, -1.0));
        assert!(!within_radius(0.0, f64::NAN));
        assert!(within_radius(3.0, 3.0));
        assert!(!within_radius(f64::INFINITY, 3.0));
    }

    #[test]
    fn test_zone_polygon_vertices_on_radius() {
        let center = LngLat::new(-70.6, -33.4);
        let poly = zone_polygon(center, 3.0, DEFAULT_ZONE_STEPS).unwrap();
        // steps + closing vertex
        assert_eq!(poly.exterior().0.len(), DEFAULT_ZONE_STEPS + 1);
        for c in poly.exterior().coords() {
            let d = distance_km(center, Some(LngLat::new(c.x, c.y)));
            assert!((d - 3.0).abs() < 0.01, "vertex at {d} km");
        }
    }

    #[test]
    fn test_zone_polygon_rejects_bad_input() {
        let center = LngLat::new(-70.6, -33.4);
        assert!(zone_polygon(center, 0.0, 64).is_err());
        assert!(zone_polygon(center, 3.0, 2).is_err());
        assert!(zone_polygon(LngLat::new(f64::NAN, 0.0), 3.0, 64).is_err());
    }
}
