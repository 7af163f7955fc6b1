//! OSRM HTTP adapter implementing the distance and travel-time seams.
//!
//! Queries the `/route/v1` endpoint per leg and degrades to the geometric
//! estimate when the provider is unreachable, so the engine stays total.

use serde::Deserialize;
use tracing::warn;

use crate::geo::{self, GeoPoint};
use crate::traits::{DistanceStrategy, TravelTimeStrategy};
use crate::travel::{DEFAULT_SPEED_KMH, TrafficCondition};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Road-network distance/time backend.
///
/// Implements both strategy traits so one client can drive the whole
/// engine: `AssignmentEngine::new(&client, &client)`.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
    /// Speed assumption for the fallback estimate when OSRM fails.
    fallback_speed_kmh: f64,
}

#[derive(Debug, Clone, Copy)]
struct Leg {
    distance_km: f64,
    duration_min: f64,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            fallback_speed_kmh: DEFAULT_SPEED_KMH,
        })
    }

    fn leg(&self, from: GeoPoint, to: GeoPoint) -> Option<Leg> {
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url,
            self.config.profile,
            from.lng(),
            from.lat(),
            to.lng(),
            to.lat()
        );

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>());

        match response {
            Ok(body) => body.routes.into_iter().next().map(|route| Leg {
                distance_km: route.distance / 1000.0,
                duration_min: route.duration / 60.0,
            }),
            Err(err) => {
                warn!(error = %err, "OSRM route request failed, using geometric fallback");
                None
            }
        }
    }
}

impl DistanceStrategy for OsrmClient {
    fn distance_km(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        self.leg(from, to)
            .map(|leg| leg.distance_km)
            .unwrap_or_else(|| geo::haversine_km(from, to))
    }
}

impl TravelTimeStrategy for OsrmClient {
    fn travel_minutes(
        &self,
        from: GeoPoint,
        to: GeoPoint,
        distance_km: f64,
        traffic: Option<TrafficCondition>,
    ) -> f64 {
        let base = self
            .leg(from, to)
            .map(|leg| leg.duration_min)
            .unwrap_or_else(|| distance_km / self.fallback_speed_kmh * 60.0);
        match traffic {
            Some(condition) => base * condition.multiplier(),
            None => base,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}
