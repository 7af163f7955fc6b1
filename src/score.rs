//! Aggregate reporting calculations over a finished assignment run.

use crate::engine::TechnicianRoute;
use crate::model::Technician;

/// Weight of the placement ratio in the efficiency blend.
const PLACEMENT_WEIGHT: f64 = 0.7;
/// Weight of the mean remaining distance-budget slack.
const SLACK_WEIGHT: f64 = 0.3;

/// Derives the efficiency score and total cost for reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Normalized placement quality in `[0, 1]`.
    ///
    /// Zero when nothing was placed. Otherwise blends the placement ratio
    /// with the mean remaining distance-budget slack of technicians that
    /// received work, so the score is monotonically non-decreasing in the
    /// placement rate.
    pub fn efficiency_score(
        routes: &[TechnicianRoute],
        technicians: &[Technician],
        job_count: usize,
    ) -> f64 {
        let assigned: usize = routes.iter().map(|route| route.stops.len()).sum();
        if assigned == 0 || job_count == 0 {
            return 0.0;
        }

        let placement = assigned as f64 / job_count as f64;

        let mut slack_sum = 0.0;
        let mut slack_count = 0usize;
        for route in routes {
            if route.stops.is_empty() {
                continue;
            }
            let Some(technician) = technicians.iter().find(|t| t.id == route.technician_id) else {
                continue;
            };
            let budget = technician.max_daily_distance_km;
            let slack = if budget > 0.0 {
                ((budget - route.total_distance_km) / budget).clamp(0.0, 1.0)
            } else {
                0.0
            };
            slack_sum += slack;
            slack_count += 1;
        }
        let mean_slack = if slack_count > 0 {
            slack_sum / slack_count as f64
        } else {
            0.0
        };

        (PLACEMENT_WEIGHT * placement + SLACK_WEIGHT * mean_slack).clamp(0.0, 1.0)
    }

    /// Total labor cost across all routes: per technician,
    /// `(travel + service minutes) / 60 * hourly_rate`. Empty routes cost
    /// nothing.
    pub fn total_cost(routes: &[TechnicianRoute], technicians: &[Technician]) -> f64 {
        routes
            .iter()
            .filter(|route| !route.stops.is_empty())
            .filter_map(|route| {
                technicians
                    .iter()
                    .find(|t| t.id == route.technician_id)
                    .map(|technician| route.total_time_min / 60.0 * technician.hourly_rate)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Assignment;
    use crate::geo::GeoPoint;

    fn technician(id: &str, budget_km: f64, rate: f64) -> Technician {
        Technician::new(id, GeoPoint::new(0.0, 0.0).unwrap(), budget_km, rate).unwrap()
    }

    fn route(technician_id: &str, stops: usize, distance_km: f64, time_min: f64) -> TechnicianRoute {
        TechnicianRoute {
            technician_id: technician_id.to_string(),
            stops: (0..stops)
                .map(|i| Assignment {
                    technician_id: technician_id.to_string(),
                    job_id: format!("j-{i}"),
                    distance_km: distance_km / stops.max(1) as f64,
                    travel_time_min: 0.0,
                })
                .collect(),
            total_distance_km: distance_km,
            total_time_min: time_min,
        }
    }

    #[test]
    fn test_empty_assignments_score_zero() {
        let technicians = [technician("t-1", 100.0, 50.0)];
        assert_eq!(ScoreCalculator::efficiency_score(&[], &technicians, 0), 0.0);
        assert_eq!(
            ScoreCalculator::efficiency_score(&[route("t-1", 0, 0.0, 0.0)], &technicians, 3),
            0.0
        );
    }

    #[test]
    fn test_empty_assignments_cost_zero() {
        let technicians = [technician("t-1", 100.0, 50.0)];
        assert_eq!(ScoreCalculator::total_cost(&[], &technicians), 0.0);
        assert_eq!(
            ScoreCalculator::total_cost(&[route("t-1", 0, 0.0, 0.0)], &technicians),
            0.0
        );
    }

    #[test]
    fn test_score_monotone_in_placement() {
        let technicians = [technician("t-1", 100.0, 50.0)];
        let half = ScoreCalculator::efficiency_score(&[route("t-1", 2, 10.0, 60.0)], &technicians, 4);
        let full = ScoreCalculator::efficiency_score(&[route("t-1", 4, 10.0, 120.0)], &technicians, 4);
        assert!(full > half);
        assert!(half > 0.0 && full <= 1.0);
    }

    #[test]
    fn test_score_rewards_budget_slack() {
        let technicians = [technician("t-1", 100.0, 50.0)];
        let tight = ScoreCalculator::efficiency_score(&[route("t-1", 2, 95.0, 60.0)], &technicians, 2);
        let loose = ScoreCalculator::efficiency_score(&[route("t-1", 2, 10.0, 60.0)], &technicians, 2);
        assert!(loose > tight);
    }

    #[test]
    fn test_cost_formula() {
        let technicians = [technician("t-1", 100.0, 80.0)];
        // 90 minutes of travel + service at 80/h = 120.0
        let cost = ScoreCalculator::total_cost(&[route("t-1", 1, 5.0, 90.0)], &technicians);
        assert!((cost - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_sums_across_routes() {
        let technicians = [technician("t-1", 100.0, 60.0), technician("t-2", 100.0, 30.0)];
        let routes = [route("t-1", 1, 5.0, 60.0), route("t-2", 1, 5.0, 120.0)];
        // 60 min at 60/h + 120 min at 30/h = 60 + 60
        let cost = ScoreCalculator::total_cost(&routes, &technicians);
        assert!((cost - 120.0).abs() < 1e-9);
    }
}
