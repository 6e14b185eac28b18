//! Some stats of an accepted request.

use serde::{Deserialize, Serialize};

use crate::{feasibility::FinishTimes, schedule::Schedule};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Some stats of an accepted request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationStats {
    /// Time when the last reduce task completes.
    pub finish_time: f64,
    /// Time when the last map task completes.
    pub map_finish_time: f64,
    /// Number of allocation attempts including the accepted one.
    pub attempts: usize,
    /// Number of offers pruned from the pool before the accepted attempt.
    pub pruned: usize,
    /// Total price of provisioned offers per hour.
    pub hourly_cost: f64,
    /// Price of running all provisioned offers until the job finishes, billed per started hour.
    pub estimated_cost: f64,
}

impl AllocationStats {
    pub fn new(finish_times: FinishTimes, schedule: &Schedule, attempts: usize, pruned: usize) -> Self {
        let hourly_cost = schedule.hourly_cost();
        AllocationStats {
            finish_time: finish_times.finish_time,
            map_finish_time: finish_times.map_finish_time,
            attempts,
            pruned,
            hourly_cost,
            estimated_cost: hourly_cost * billed_hours(finish_times.finish_time),
        }
    }
}

/// Number of started hours in `seconds`.
pub fn billed_hours(seconds: f64) -> f64 {
    (seconds / SECONDS_PER_HOUR).ceil()
}
