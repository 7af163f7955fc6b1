//! Travel-time estimation from distance.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::traits::TravelTimeStrategy;

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Congestion level applied on top of a base travel-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficCondition {
    Light,
    Moderate,
    Heavy,
}

impl TrafficCondition {
    /// Multiplicative penalty on the base estimate.
    pub fn multiplier(self) -> f64 {
        match self {
            TrafficCondition::Light => 1.1,
            TrafficCondition::Moderate => 1.4,
            TrafficCondition::Heavy => 1.8,
        }
    }
}

/// Estimates travel time from distance at an assumed constant speed.
///
/// The default backend: cheap, deterministic, and close enough for daily
/// dispatch. Swap in [`crate::osrm::OsrmClient`] for road-network times.
#[derive(Debug, Clone, Copy)]
pub struct UniformSpeedEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for UniformSpeedEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl UniformSpeedEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }
}

impl TravelTimeStrategy for UniformSpeedEstimator {
    fn travel_minutes(
        &self,
        _from: GeoPoint,
        _to: GeoPoint,
        distance_km: f64,
        traffic: Option<TrafficCondition>,
    ) -> f64 {
        let base = distance_km / self.speed_kmh * 60.0;
        match traffic {
            Some(condition) => base * condition.multiplier(),
            None => base,
        }
    }
}
