//! Per-technician route sequencing.
//!
//! Nearest-neighbor construction with a 2-opt refinement pass. Suitable for
//! daily workloads of up to 15-20 stops; both phases are deterministic, with
//! distance ties broken by job id.

use crate::engine::OptimizeError;
use crate::geo::GeoPoint;
use crate::model::Job;
use crate::traits::{DistanceStrategy, TravelTimeStrategy};
use crate::travel::TrafficCondition;

/// Improvement threshold below which a 2-opt move is treated as noise.
const IMPROVEMENT_EPS: f64 = 1e-9;

/// One leg of a sequenced route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// Index into the job slice passed to [`RouteSequencer::sequence`].
    pub job_index: usize,
    /// Travel distance from the previous stop (or start) in kilometers.
    pub distance_km: f64,
    /// Travel time from the previous stop (or start) in minutes.
    pub travel_min: f64,
}

/// A technician's day, ordered to minimize cumulative travel.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedRoute {
    pub legs: Vec<RouteLeg>,
    pub total_distance_km: f64,
    /// Travel plus on-site service time, in minutes.
    pub total_time_min: f64,
}

/// Orders one technician's assigned jobs starting from a given location.
#[derive(Debug, Clone)]
pub struct RouteSequencer<D, T> {
    distance: D,
    travel: T,
    traffic: Option<TrafficCondition>,
    refine: bool,
    max_refine_passes: usize,
}

impl<D: DistanceStrategy, T: TravelTimeStrategy> RouteSequencer<D, T> {
    pub fn new(distance: D, travel: T) -> Self {
        Self {
            distance,
            travel,
            traffic: None,
            refine: true,
            max_refine_passes: 100,
        }
    }

    pub fn with_traffic(mut self, traffic: Option<TrafficCondition>) -> Self {
        self.traffic = traffic;
        self
    }

    /// Skips the 2-opt pass; nearest-neighbor order is kept as-is.
    pub fn without_refinement(mut self) -> Self {
        self.refine = false;
        self
    }

    /// Sequences `jobs` starting from `start`.
    ///
    /// Fails with [`OptimizeError::NoJobsToOptimize`] on an empty slice.
    pub fn sequence(&self, jobs: &[&Job], start: GeoPoint) -> Result<SequencedRoute, OptimizeError> {
        if jobs.is_empty() {
            return Err(OptimizeError::NoJobsToOptimize);
        }

        let mut order = self.nearest_neighbor(jobs, start);
        if self.refine && order.len() >= 3 {
            self.two_opt(jobs, start, &mut order);
        }

        let mut legs = Vec::with_capacity(order.len());
        let mut total_distance_km = 0.0;
        let mut total_travel_min = 0.0;
        let mut service_min = 0;
        let mut here = start;
        for &job_index in &order {
            let job = jobs[job_index];
            let distance_km = self.distance.distance_km(here, job.location);
            let travel_min = self
                .travel
                .travel_minutes(here, job.location, distance_km, self.traffic);
            total_distance_km += distance_km;
            total_travel_min += travel_min;
            service_min += job.estimated_duration_min;
            legs.push(RouteLeg {
                job_index,
                distance_km,
                travel_min,
            });
            here = job.location;
        }

        Ok(SequencedRoute {
            legs,
            total_distance_km,
            total_time_min: total_travel_min + service_min as f64,
        })
    }

    /// Greedy nearest-neighbor order; distance ties broken by job id.
    fn nearest_neighbor(&self, jobs: &[&Job], start: GeoPoint) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..jobs.len()).collect();
        let mut order = Vec::with_capacity(jobs.len());
        let mut here = start;

        while !remaining.is_empty() {
            let mut best_slot = 0;
            let mut best_dist = self.distance.distance_km(here, jobs[remaining[0]].location);
            for slot in 1..remaining.len() {
                let candidate = remaining[slot];
                let dist = self.distance.distance_km(here, jobs[candidate].location);
                match dist.total_cmp(&best_dist) {
                    std::cmp::Ordering::Less => {
                        best_slot = slot;
                        best_dist = dist;
                    }
                    std::cmp::Ordering::Equal
                        if jobs[candidate].id < jobs[remaining[best_slot]].id =>
                    {
                        best_slot = slot;
                    }
                    _ => {}
                }
            }
            let next = remaining.remove(best_slot);
            here = jobs[next].location;
            order.push(next);
        }

        order
    }

    /// Segment-reversal improvement until no move helps or the pass cap hits.
    fn two_opt(&self, jobs: &[&Job], start: GeoPoint, order: &mut [usize]) {
        let n = order.len();
        for _ in 0..self.max_refine_passes {
            let mut improved = false;
            let current = self.path_distance(jobs, start, order);
            'scan: for i in 0..n - 1 {
                for j in i + 1..n {
                    order[i..=j].reverse();
                    if self.path_distance(jobs, start, order) + IMPROVEMENT_EPS < current {
                        improved = true;
                        break 'scan;
                    }
                    order[i..=j].reverse();
                }
            }
            if !improved {
                break;
            }
        }
    }

    fn path_distance(&self, jobs: &[&Job], start: GeoPoint, order: &[usize]) -> f64 {
        let mut total = 0.0;
        let mut here = start;
        for &job_index in order {
            total += self.distance.distance_km(here, jobs[job_index].location);
            here = jobs[job_index].location;
        }
        total
    }
}
