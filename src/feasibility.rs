//! Feasibility checks for technician/job pairs.
//!
//! The checker is a pure predicate over an explicit [`TechnicianLoad`]
//! accumulator owned by a single `optimize` call, so concurrent runs cannot
//! interfere.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::model::{Job, Technician, TimeWindow};
use crate::traits::DistanceStrategy;

/// Why a job could not be placed. Recorded per job, never raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// Technician lacks at least one required skill.
    SkillMismatch,
    /// Job window overlaps a commitment or an already-booked job.
    TimeConflict,
    /// Marginal travel would push the technician past the daily budget.
    DistanceBudgetExceeded,
    /// No technician/job pair was ever evaluated for this job.
    NoFeasibleTechnician,
    /// Job is scheduled for a different day than the run's service date.
    WrongDate,
}

/// Per-technician state accumulated over one assignment run.
#[derive(Debug, Clone)]
pub struct TechnicianLoad {
    /// Distance committed so far this run, in kilometers.
    pub traveled_km: f64,
    /// Where the technician ends up after the jobs booked so far.
    pub last_location: GeoPoint,
    /// Commitments plus windows of jobs tentatively booked this run.
    pub booked: Vec<TimeWindow>,
}

impl TechnicianLoad {
    pub fn for_technician(technician: &Technician) -> Self {
        Self {
            traveled_km: 0.0,
            last_location: technician.current_location,
            booked: technician.commitments.clone(),
        }
    }

    /// Commits a job to this load.
    pub fn book(&mut self, job: &Job, hop_km: f64) {
        self.traveled_km += hop_km;
        self.last_location = job.location;
        self.booked.push(job.time_window);
    }
}

/// Decides whether a technician may take a job given the run state so far.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityChecker<D> {
    distance: D,
}

impl<D: DistanceStrategy> FeasibilityChecker<D> {
    pub fn new(distance: D) -> Self {
        Self { distance }
    }

    /// Checks skill match, time availability, and distance budget, in that
    /// order, short-circuiting on the first failure.
    ///
    /// Returns the marginal hop distance (from the technician's last in-run
    /// location to the job) on success so callers need not recompute it.
    pub fn check(
        &self,
        technician: &Technician,
        job: &Job,
        load: &TechnicianLoad,
    ) -> Result<f64, UnassignedReason> {
        if !technician.has_skills(&job.required_skills) {
            return Err(UnassignedReason::SkillMismatch);
        }
        if load.booked.iter().any(|window| window.overlaps(job.time_window)) {
            return Err(UnassignedReason::TimeConflict);
        }
        let hop_km = self.distance.distance_km(load.last_location, job.location);
        if load.traveled_km + hop_km > technician.max_daily_distance_km {
            return Err(UnassignedReason::DistanceBudgetExceeded);
        }
        Ok(hop_km)
    }
}
