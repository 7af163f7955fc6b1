//! Technician-to-job assignment engine.
//!
//! Builds the feasible (technician, job) edge set, ranks it by job priority
//! and the selected criterion, commits assignments greedily against a
//! per-call accumulator, then hands each technician's jobs to the
//! sequencer. Heuristic by design; never exhaustive.

use std::collections::HashMap;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::feasibility::{FeasibilityChecker, TechnicianLoad, UnassignedReason};
use crate::geo::HaversineDistance;
use crate::model::{Job, Technician};
use crate::score::ScoreCalculator;
use crate::sequence::RouteSequencer;
use crate::traits::{DistanceStrategy, TravelTimeStrategy};
use crate::travel::{TrafficCondition, UniformSpeedEstimator};

/// Objective the assignment ranking minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationCriterion {
    Distance,
    Time,
    Cost,
}

impl FromStr for OptimizationCriterion {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" => Ok(OptimizationCriterion::Distance),
            "time" => Ok(OptimizationCriterion::Time),
            "cost" => Ok(OptimizationCriterion::Cost),
            other => Err(OptimizeError::InvalidOptimizationCriterion(other.to_string())),
        }
    }
}

/// Fatal preconditions; per-job failures are reported in
/// [`RouteOptimizationResult::unassigned_jobs`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    #[error("no technicians available")]
    NoTechniciansAvailable,
    #[error("no jobs to optimize")]
    NoJobsToOptimize,
    #[error("invalid optimization criterion `{0}` (expected distance, time, or cost)")]
    InvalidOptimizationCriterion(String),
}

/// One committed technician/job pairing with its sequenced leg metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub technician_id: String,
    pub job_id: String,
    /// Travel distance from the previous stop (or the technician's start).
    pub distance_km: f64,
    pub travel_time_min: f64,
}

/// A technician's sequenced day. Present for every input technician,
/// assigned or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianRoute {
    pub technician_id: String,
    /// Stops in visiting order.
    pub stops: Vec<Assignment>,
    pub total_distance_km: f64,
    /// Travel plus on-site service time, in minutes.
    pub total_time_min: f64,
}

/// A job that could not be placed, with the last-seen failure reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedJob {
    pub job_id: String,
    pub reason: UnassignedReason,
}

/// Output of one `optimize` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOptimizationResult {
    pub routes: Vec<TechnicianRoute>,
    pub unassigned_jobs: Vec<UnassignedJob>,
    pub total_distance_km: f64,
    pub total_time_min: f64,
    pub total_cost: f64,
    pub efficiency_score: f64,
}

/// Candidate (technician, job) pairing scored under the run's criterion.
#[derive(Debug, Clone, Copy)]
struct CandidateEdge {
    job: usize,
    technician: usize,
    weight: f64,
}

/// Assigns jobs to technicians and sequences each technician's route.
///
/// Stateless between calls: every `optimize` invocation is a pure
/// computation over the supplied snapshots, safe to run concurrently from
/// multiple threads.
#[derive(Debug, Clone)]
pub struct AssignmentEngine<D, T> {
    distance: D,
    travel: T,
    traffic: Option<TrafficCondition>,
    service_date: Option<i64>,
    refine_routes: bool,
}

impl Default for AssignmentEngine<HaversineDistance, UniformSpeedEstimator> {
    fn default() -> Self {
        Self::new(HaversineDistance, UniformSpeedEstimator::default())
    }
}

impl<D: DistanceStrategy, T: TravelTimeStrategy> AssignmentEngine<D, T> {
    pub fn new(distance: D, travel: T) -> Self {
        Self {
            distance,
            travel,
            traffic: None,
            service_date: None,
            refine_routes: true,
        }
    }

    /// Applies a congestion penalty to every travel-time estimate this run.
    pub fn with_traffic(mut self, traffic: TrafficCondition) -> Self {
        self.traffic = Some(traffic);
        self
    }

    /// Screens out jobs whose `scheduled_date` differs from `date`.
    pub fn with_service_date(mut self, date: i64) -> Self {
        self.service_date = Some(date);
        self
    }

    /// Keeps raw nearest-neighbor routes, skipping the 2-opt pass.
    pub fn without_refinement(mut self) -> Self {
        self.refine_routes = false;
        self
    }

    /// String-criterion boundary used by the job-intake workflow.
    pub fn optimize_named(
        &self,
        technicians: &[Technician],
        jobs: &[Job],
        criterion: &str,
    ) -> Result<RouteOptimizationResult, OptimizeError> {
        self.optimize(technicians, jobs, criterion.parse()?)
    }

    /// Assigns `jobs` across `technicians`, minimizing `criterion`.
    ///
    /// Identical inputs always yield identical results: candidate edges are
    /// ranked with full tie-breaks (priority, weight, job id, technician
    /// id) and every later phase preserves that order.
    pub fn optimize(
        &self,
        technicians: &[Technician],
        jobs: &[Job],
        criterion: OptimizationCriterion,
    ) -> Result<RouteOptimizationResult, OptimizeError> {
        if technicians.is_empty() {
            return Err(OptimizeError::NoTechniciansAvailable);
        }
        if jobs.is_empty() {
            return Err(OptimizeError::NoJobsToOptimize);
        }

        let mut reasons: HashMap<usize, UnassignedReason> = HashMap::new();

        // Date screen: jobs dated for another day never reach pairing.
        let eligible: Vec<usize> = (0..jobs.len())
            .filter(|&j| {
                if let (Some(run_date), Some(job_date)) = (self.service_date, jobs[j].scheduled_date)
                {
                    if run_date != job_date {
                        reasons.insert(j, UnassignedReason::WrongDate);
                        return false;
                    }
                }
                true
            })
            .collect();

        let checker = FeasibilityChecker::new(&self.distance);
        let base_loads: Vec<TechnicianLoad> = technicians
            .iter()
            .map(TechnicianLoad::for_technician)
            .collect();

        // Candidate edges, fanned out per job. Deterministic despite the
        // parallelism: the merge keeps job order and the sort below imposes
        // the full ranking.
        let per_job: Vec<(Vec<CandidateEdge>, Option<UnassignedReason>)> = eligible
            .par_iter()
            .map(|&j| {
                let job = &jobs[j];
                let mut edges = Vec::new();
                let mut last_failure = None;
                for (t, technician) in technicians.iter().enumerate() {
                    match checker.check(technician, job, &base_loads[t]) {
                        Ok(hop_km) => {
                            let travel_min = self.travel.travel_minutes(
                                base_loads[t].last_location,
                                job.location,
                                hop_km,
                                self.traffic,
                            );
                            let weight = match criterion {
                                OptimizationCriterion::Distance => hop_km,
                                OptimizationCriterion::Time => travel_min,
                                OptimizationCriterion::Cost => {
                                    (travel_min + job.estimated_duration_min as f64) / 60.0
                                        * technician.hourly_rate
                                }
                            };
                            edges.push(CandidateEdge {
                                job: j,
                                technician: t,
                                weight,
                            });
                        }
                        Err(reason) => last_failure = Some(reason),
                    }
                }
                (edges, last_failure)
            })
            .collect();

        let mut edges: Vec<CandidateEdge> = Vec::new();
        for (slot, (mut job_edges, failure)) in per_job.into_iter().enumerate() {
            if let Some(reason) = failure {
                reasons.insert(eligible[slot], reason);
            }
            edges.append(&mut job_edges);
        }
        debug!(
            technicians = technicians.len(),
            jobs = jobs.len(),
            candidate_edges = edges.len(),
            "built candidate edge set"
        );

        edges.sort_by(|a, b| {
            jobs[b.job]
                .priority
                .cmp(&jobs[a.job].priority)
                .then(a.weight.total_cmp(&b.weight))
                .then(jobs[a.job].id.cmp(&jobs[b.job].id))
                .then(technicians[a.technician].id.cmp(&technicians[b.technician].id))
        });

        // Greedy commit walking the ranked edges, re-checking feasibility
        // against the live accumulator before each commit.
        let mut loads = base_loads;
        let mut assigned_to: Vec<Option<usize>> = vec![None; jobs.len()];
        let mut per_technician: Vec<Vec<usize>> = vec![Vec::new(); technicians.len()];
        for edge in &edges {
            if assigned_to[edge.job].is_some() {
                continue;
            }
            match checker.check(&technicians[edge.technician], &jobs[edge.job], &loads[edge.technician]) {
                Ok(hop_km) => {
                    loads[edge.technician].book(&jobs[edge.job], hop_km);
                    assigned_to[edge.job] = Some(edge.technician);
                    per_technician[edge.technician].push(edge.job);
                }
                Err(reason) => {
                    reasons.insert(edge.job, reason);
                }
            }
        }

        // Sequence each technician's day, then re-validate the budget
        // against the sequenced route; trailing stops that break it are
        // demoted back to unassigned.
        let sequencer = RouteSequencer::new(&self.distance, &self.travel).with_traffic(self.traffic);
        let sequencer = if self.refine_routes {
            sequencer
        } else {
            sequencer.without_refinement()
        };

        let mut routes = Vec::with_capacity(technicians.len());
        for (t, technician) in technicians.iter().enumerate() {
            let job_indices = &per_technician[t];
            if job_indices.is_empty() {
                routes.push(TechnicianRoute {
                    technician_id: technician.id.clone(),
                    stops: Vec::new(),
                    total_distance_km: 0.0,
                    total_time_min: 0.0,
                });
                continue;
            }

            let technician_jobs: Vec<&Job> = job_indices.iter().map(|&j| &jobs[j]).collect();
            let sequenced = sequencer.sequence(&technician_jobs, technician.current_location)?;

            let mut legs = sequenced.legs;
            let mut route_km = sequenced.total_distance_km;
            while route_km > technician.max_daily_distance_km + 1e-9 {
                let Some(dropped) = legs.pop() else { break };
                let job_index = job_indices[dropped.job_index];
                route_km -= dropped.distance_km;
                assigned_to[job_index] = None;
                reasons.insert(job_index, UnassignedReason::DistanceBudgetExceeded);
            }

            let mut stops = Vec::with_capacity(legs.len());
            let mut total_distance_km = 0.0;
            let mut total_travel_min = 0.0;
            let mut service_min = 0;
            for leg in &legs {
                let job = technician_jobs[leg.job_index];
                total_distance_km += leg.distance_km;
                total_travel_min += leg.travel_min;
                service_min += job.estimated_duration_min;
                stops.push(Assignment {
                    technician_id: technician.id.clone(),
                    job_id: job.id.clone(),
                    distance_km: leg.distance_km,
                    travel_time_min: leg.travel_min,
                });
            }

            routes.push(TechnicianRoute {
                technician_id: technician.id.clone(),
                stops,
                total_distance_km,
                total_time_min: total_travel_min + service_min as f64,
            });
        }

        let unassigned_jobs: Vec<UnassignedJob> = jobs
            .iter()
            .enumerate()
            .filter(|(j, _)| assigned_to[*j].is_none())
            .map(|(j, job)| UnassignedJob {
                job_id: job.id.clone(),
                reason: reasons
                    .get(&j)
                    .copied()
                    .unwrap_or(UnassignedReason::NoFeasibleTechnician),
            })
            .collect();

        let total_distance_km: f64 = routes.iter().map(|r| r.total_distance_km).sum();
        let total_time_min: f64 = routes.iter().map(|r| r.total_time_min).sum();
        let total_cost = ScoreCalculator::total_cost(&routes, technicians);
        let efficiency_score = ScoreCalculator::efficiency_score(&routes, technicians, jobs.len());

        info!(
            assigned = jobs.len() - unassigned_jobs.len(),
            unassigned = unassigned_jobs.len(),
            total_distance_km,
            efficiency_score,
            "route optimization complete"
        );

        Ok(RouteOptimizationResult {
            routes,
            unassigned_jobs,
            total_distance_km,
            total_time_min,
            total_cost,
            efficiency_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_parsing() {
        assert_eq!("distance".parse(), Ok(OptimizationCriterion::Distance));
        assert_eq!("time".parse(), Ok(OptimizationCriterion::Time));
        assert_eq!("cost".parse(), Ok(OptimizationCriterion::Cost));
        assert_eq!(
            "bogus".parse::<OptimizationCriterion>(),
            Err(OptimizeError::InvalidOptimizationCriterion("bogus".to_string()))
        );
    }

    #[test]
    fn test_criterion_rejects_case_variants() {
        assert!("Distance".parse::<OptimizationCriterion>().is_err());
        assert!("".parse::<OptimizationCriterion>().is_err());
    }
}
