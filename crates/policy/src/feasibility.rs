//! Finish times of a job under the map/reduce barrier model.

use serde::{Deserialize, Serialize};

use crate::{request::Job, schedule::Schedule, task::Task};

/// Completion times of a job, in seconds from its start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinishTimes {
    /// Time the slowest map task completes.
    pub map_finish_time: f64,
    /// Time the slowest reduce task completes. Reduce tasks start at [map_finish_time](FinishTimes::map_finish_time).
    pub finish_time: f64,
}

impl FinishTimes {
    /// Computes finish times from the durations of map and reduce tasks.
    ///
    /// A job without reduce tasks finishes with its map phase. A NaN duration makes the job infeasible.
    pub fn from_durations(map: impl IntoIterator<Item = f64>, reduce: impl IntoIterator<Item = f64>) -> Self {
        let map_finish_time = map.into_iter().fold(0.0, latest);
        let finish_time = reduce
            .into_iter()
            .map(|duration| map_finish_time + duration)
            .fold(map_finish_time, latest);
        FinishTimes {
            map_finish_time,
            finish_time,
        }
    }

    /// Recomputes finish times of a committed schedule. Returns `None` if some task isn't scheduled.
    pub fn from_schedule(job: &Job, schedule: &Schedule) -> Option<Self> {
        let durations = |tasks: &[Box<dyn Task>]| {
            tasks
                .iter()
                .map(|task| schedule.vm_type_of(task.id()).map(|vm_type| task.execution_time(vm_type)))
                .collect::<Option<Vec<f64>>>()
        };
        Some(Self::from_durations(
            durations(job.map_tasks())?,
            durations(job.reduce_tasks())?,
        ))
    }

    pub fn meets(&self, deadline: f64) -> bool {
        self.finish_time <= deadline
    }
}

// Like f64::max, but NaN wins.
fn latest(acc: f64, value: f64) -> f64 {
    if value.is_nan() || value > acc {
        value
    } else {
        acc
    }
}
