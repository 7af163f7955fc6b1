//! Domain records: technicians, jobs, priorities, time windows.
//!
//! All records are caller-supplied snapshots; constructors validate the
//! numeric invariants up front so the engine never sees malformed data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ModelError {
    #[error("id must not be empty")]
    EmptyId,
    #[error("time window {start_min}..{end_min} is empty or negative")]
    InvalidTimeWindow { start_min: i32, end_min: i32 },
    #[error("max daily distance must be finite and non-negative, got {0}")]
    InvalidDistanceBudget(f64),
    #[error("hourly rate must be finite and non-negative, got {0}")]
    InvalidHourlyRate(f64),
    #[error("estimated duration must be positive, got {0} minutes")]
    InvalidDuration(i32),
}

/// Job urgency. Used only as the primary assignment tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Half-open interval in minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start_min: i32,
    end_min: i32,
}

impl TimeWindow {
    pub fn new(start_min: i32, end_min: i32) -> Result<Self, ModelError> {
        if start_min < 0 || end_min <= start_min {
            return Err(ModelError::InvalidTimeWindow { start_min, end_min });
        }
        Ok(Self { start_min, end_min })
    }

    pub fn start_min(&self) -> i32 {
        self.start_min
    }

    pub fn end_min(&self) -> i32 {
        self.end_min
    }

    pub fn duration_min(&self) -> i32 {
        self.end_min - self.start_min
    }

    /// True when the two half-open intervals share any minute.
    pub fn overlaps(&self, other: TimeWindow) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

/// Mobile worker snapshot. Externally owned; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    /// Skill tags this technician holds.
    pub skills: Vec<String>,
    pub current_location: GeoPoint,
    /// Daily travel budget in kilometers.
    pub max_daily_distance_km: f64,
    pub hourly_rate: f64,
    /// Already-committed intervals for the day, in minutes from midnight.
    pub commitments: Vec<TimeWindow>,
}

impl Technician {
    pub fn new(
        id: impl Into<String>,
        current_location: GeoPoint,
        max_daily_distance_km: f64,
        hourly_rate: f64,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        if !max_daily_distance_km.is_finite() || max_daily_distance_km < 0.0 {
            return Err(ModelError::InvalidDistanceBudget(max_daily_distance_km));
        }
        if !hourly_rate.is_finite() || hourly_rate < 0.0 {
            return Err(ModelError::InvalidHourlyRate(hourly_rate));
        }
        Ok(Self {
            id,
            skills: Vec::new(),
            current_location,
            max_daily_distance_km,
            hourly_rate,
            commitments: Vec::new(),
        })
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    pub fn with_commitment(mut self, window: TimeWindow) -> Self {
        self.commitments.push(window);
        self
    }

    /// True when this technician holds every required skill.
    ///
    /// An empty requirement list matches any technician.
    pub fn has_skills(&self, required: &[String]) -> bool {
        required.iter().all(|skill| self.skills.contains(skill))
    }
}

/// A unit of field work to be assigned and routed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub location: GeoPoint,
    pub required_skills: Vec<String>,
    /// Contiguous on-site service time in minutes.
    pub estimated_duration_min: i32,
    pub priority: Priority,
    pub time_window: TimeWindow,
    /// Unix day stamp; `None` means the job floats with the snapshot.
    pub scheduled_date: Option<i64>,
}

impl Job {
    pub fn new(
        id: impl Into<String>,
        location: GeoPoint,
        estimated_duration_min: i32,
        time_window: TimeWindow,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ModelError::EmptyId);
        }
        if estimated_duration_min <= 0 {
            return Err(ModelError::InvalidDuration(estimated_duration_min));
        }
        Ok(Self {
            id,
            location,
            required_skills: Vec::new(),
            estimated_duration_min,
            priority: Priority::default(),
            time_window,
            scheduled_date: None,
        })
    }

    pub fn with_required_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn scheduled_on(mut self, date: i64) -> Self {
        self.scheduled_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> GeoPoint {
        GeoPoint::new(0.0, 0.0).expect("valid coordinate")
    }

    #[test]
    fn test_time_window_rejects_empty_and_negative() {
        assert!(TimeWindow::new(600, 600).is_err());
        assert!(TimeWindow::new(600, 540).is_err());
        assert!(TimeWindow::new(-10, 60).is_err());
        assert!(TimeWindow::new(540, 600).is_ok());
    }

    #[test]
    fn test_time_window_overlap_is_half_open() {
        let morning = TimeWindow::new(540, 600).unwrap();
        let adjacent = TimeWindow::new(600, 660).unwrap();
        let inside = TimeWindow::new(550, 590).unwrap();

        assert!(!morning.overlaps(adjacent), "touching windows do not overlap");
        assert!(morning.overlaps(inside));
        assert!(inside.overlaps(morning));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn test_technician_validation() {
        assert_eq!(
            Technician::new("", origin(), 100.0, 50.0),
            Err(ModelError::EmptyId)
        );
        assert!(matches!(
            Technician::new("t-1", origin(), -1.0, 50.0),
            Err(ModelError::InvalidDistanceBudget(_))
        ));
        assert!(matches!(
            Technician::new("t-1", origin(), 100.0, f64::NAN),
            Err(ModelError::InvalidHourlyRate(_))
        ));
        assert!(Technician::new("t-1", origin(), 0.0, 0.0).is_ok());
    }

    #[test]
    fn test_job_validation() {
        let window = TimeWindow::new(540, 600).unwrap();
        assert!(matches!(
            Job::new("j-1", origin(), 0, window),
            Err(ModelError::InvalidDuration(0))
        ));
        assert!(Job::new("j-1", origin(), 30, window).is_ok());
    }

    #[test]
    fn test_skill_superset_semantics() {
        let tech = Technician::new("t-1", origin(), 100.0, 50.0)
            .unwrap()
            .with_skill("plumbing")
            .with_skill("hvac");

        assert!(tech.has_skills(&[]));
        assert!(tech.has_skills(&["plumbing".to_string()]));
        assert!(tech.has_skills(&["plumbing".to_string(), "hvac".to_string()]));
        assert!(!tech.has_skills(&["plumbing".to_string(), "electrical".to_string()]));
    }
}
