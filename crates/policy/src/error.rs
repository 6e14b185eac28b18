use thiserror::Error;

use crate::task::{Phase, TaskId};

/// Internal fault of a single allocation attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuardFailure {
    #[error("{phase} phase needs {needed} offers but only {remaining} remain")]
    PoolTooSmall { phase: Phase, needed: usize, remaining: usize },

    #[error("task {task_id} is scheduled twice")]
    DuplicateTask { task_id: TaskId },
}

/// Reason a request was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("pool of {available} offers can't host {required} tasks (after {attempts} attempts)")]
    InsufficientCapacity {
        available: usize,
        required: usize,
        attempts: usize,
    },

    #[error("allocation aborted: {0}")]
    AllocationGuard(#[from] GuardFailure),
}
