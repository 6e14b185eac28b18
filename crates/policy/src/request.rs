//! Jobs and requests submitted to provisioning policies.

use mrprov_cloud::user_class::UserClass;
use thiserror::Error;

use crate::{schedule::Schedule, task::Task};

#[derive(Error, Debug, PartialEq)]
pub enum RequestError {
    #[error("job has {reduce} reduce tasks but only {map} map tasks")]
    TooManyReduceTasks { map: usize, reduce: usize },

    #[error("deadline must be positive, got {0}")]
    NonPositiveDeadline(f64),
}

/// MapReduce job: map tasks followed by reduce tasks which start once all map tasks are done.
pub struct Job {
    map_tasks: Vec<Box<dyn Task>>,
    reduce_tasks: Vec<Box<dyn Task>>,
}

impl Job {
    /// Creates new job. There can't be more reduce tasks than map tasks.
    pub fn new(map_tasks: Vec<Box<dyn Task>>, reduce_tasks: Vec<Box<dyn Task>>) -> Result<Self, RequestError> {
        if reduce_tasks.len() > map_tasks.len() {
            return Err(RequestError::TooManyReduceTasks {
                map: map_tasks.len(),
                reduce: reduce_tasks.len(),
            });
        }
        Ok(Job {
            map_tasks,
            reduce_tasks,
        })
    }

    pub fn map_tasks(&self) -> &[Box<dyn Task>] {
        &self.map_tasks
    }

    pub fn reduce_tasks(&self) -> &[Box<dyn Task>] {
        &self.reduce_tasks
    }

    /// Number of map and reduce tasks together.
    pub fn total_tasks(&self) -> usize {
        self.map_tasks.len() + self.reduce_tasks.len()
    }
}

/// Request to run a job before a deadline.
pub struct Request {
    pub id: u64,
    pub user_class: UserClass,
    /// Time budget of the job in seconds.
    pub deadline: f64,
    pub job: Job,
    /// Filled by a policy when the request is accepted.
    pub schedule: Schedule,
}

impl Request {
    pub fn new(id: u64, user_class: UserClass, deadline: f64, job: Job) -> Result<Self, RequestError> {
        if deadline.is_nan() || deadline <= 0.0 {
            return Err(RequestError::NonPositiveDeadline(deadline));
        }
        Ok(Request {
            id,
            user_class,
            deadline,
            job,
            schedule: Schedule::default(),
        })
    }
}
