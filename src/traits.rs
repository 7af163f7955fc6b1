//! Strategy seams for distance and travel-time estimation.
//!
//! The engine never computes distances or travel times directly; it goes
//! through these traits so callers can swap the geometric estimators for a
//! real routing provider (see [`crate::osrm`]) without touching core logic.

use crate::geo::GeoPoint;
use crate::travel::TrafficCondition;

/// Estimates travel distance between two points.
pub trait DistanceStrategy: Send + Sync {
    /// Estimated travel distance in kilometers.
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64;
}

/// Estimates travel time between two points.
pub trait TravelTimeStrategy: Send + Sync {
    /// Estimated travel time in minutes.
    ///
    /// `distance_km` is the already-estimated distance for this leg, so
    /// implementations that derive time from distance need not recompute it.
    /// `traffic` applies an optional congestion penalty; `None` means the
    /// base estimate.
    fn travel_minutes(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        distance_km: f64,
        traffic: Option<TrafficCondition>,
    ) -> f64;
}

impl<S: DistanceStrategy + ?Sized> DistanceStrategy for &S {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        (**self).distance_km(from, to)
    }
}

impl<S: TravelTimeStrategy + ?Sized> TravelTimeStrategy for &S {
    fn travel_minutes(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        distance_km: f64,
        traffic: Option<TrafficCondition>,
    ) -> f64 {
        (**self).travel_minutes(from, to, distance_km, traffic)
    }
}
