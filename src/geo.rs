//! Geographic points and distance estimation.
//!
//! Coordinates are validated once, at construction. The distance functions
//! are pure; the strategy impls at the bottom adapt them to the engine's
//! [`DistanceStrategy`] seam.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::DistanceStrategy;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Rough kilometers per degree of latitude, used to scale Manhattan
/// estimates into the same unit the rest of the engine speaks.
pub const KM_PER_DEGREE: f64 = 111.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate ({lat}, {lng}): lat must be in [-90, 90], lng in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// A validated latitude/longitude pair.
///
/// Construction rejects non-finite and out-of-range values, so every
/// `GeoPoint` reaching the engine is well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Distance formula selector for [`distance_km`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMethod {
    /// Great-circle distance, accurate real-world approximation.
    Haversine,
    /// `|Δlat| + |Δlng|` scaled to km, cheap pre-filter.
    Manhattan,
}

/// Distance between two points in kilometers using the given method.
pub fn distance_km(from: GeoPoint, to: GeoPoint, method: DistanceMethod) -> f64 {
    match method {
        DistanceMethod::Haversine => haversine_km(from, to),
        DistanceMethod::Manhattan => manhattan_degrees(from, to) * KM_PER_DEGREE,
    }
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Manhattan distance between two points in degrees.
pub fn manhattan_degrees(from: GeoPoint, to: GeoPoint) -> f64 {
    (from.lat - to.lat).abs() + (from.lng - to.lng).abs()
}

/// Great-circle distance strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl DistanceStrategy for HaversineDistance {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        haversine_km(from, to)
    }
}

/// Manhattan-grid distance strategy.
///
/// Overestimates relative to haversine, which makes it a conservative
/// stand-in when screening distance budgets cheaply.
#[derive(Debug, Clone, Copy)]
pub struct ManhattanDistance {
    /// Scale factor from degrees to kilometers.
    pub km_per_degree: f64,
}

impl Default for ManhattanDistance {
    fn default() -> Self {
        Self {
            km_per_degree: KM_PER_DEGREE,
        }
    }
}

impl DistanceStrategy for ManhattanDistance {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        manhattan_degrees(from, to) * self.km_per_degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).expect("valid coordinate")
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        assert_eq!(
            GeoPoint::new(91.0, 0.0),
            Err(GeoError::InvalidCoordinate { lat: 91.0, lng: 0.0 })
        );
        assert_eq!(
            GeoPoint::new(-90.5, 0.0),
            Err(GeoError::InvalidCoordinate { lat: -90.5, lng: 0.0 })
        );
    }

    #[test]
    fn test_rejects_out_of_range_longitude() {
        assert!(GeoPoint::new(0.0, 180.5).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_accepts_boundary_values() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_haversine_same_point() {
        let p = point(40.7128, -74.0060);
        assert!(haversine_km(p, p) < 0.001, "same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // New York (40.71, -74.01) to Boston (42.36, -71.06)
        // Actual distance ~306 km
        let dist = haversine_km(point(40.7128, -74.0060), point(42.3601, -71.0589));
        assert!(dist > 290.0 && dist < 320.0, "NYC to Boston should be ~306km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = point(40.7128, -74.0060);
        let b = point(40.7614, -73.9776);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_manhattan_degrees() {
        let a = point(1.0, 2.0);
        let b = point(3.0, -1.0);
        assert!((manhattan_degrees(a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_manhattan_dominates_haversine_locally() {
        // Scaled Manhattan should upper-bound haversine over short hops,
        // which is what makes it usable as a budget pre-filter.
        let a = point(40.7128, -74.0060);
        let b = point(40.7505, -73.9934);
        let manhattan = distance_km(a, b, DistanceMethod::Manhattan);
        let haversine = distance_km(a, b, DistanceMethod::Haversine);
        assert!(manhattan >= haversine);
    }
}
