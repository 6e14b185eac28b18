//! Model of map and reduce tasks.

use std::fmt;

use mrprov_cloud::vm_type::VmType;
use serde::{Deserialize, Serialize};

pub type TaskId = u64;

/// One of the two ordered phases of a job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Map,
    Reduce,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Map => write!(f, "map"),
            Phase::Reduce => write!(f, "reduce"),
        }
    }
}

/// Trait for a task.
pub trait Task: Send {
    /// Task id, unique within a job.
    fn id(&self) -> TaskId;

    /// Time in seconds the task takes on an instance of `vm_type`, including transfer of its input.
    ///
    /// Must be deterministic, the policies evaluate it many times for the same VM type.
    fn execution_time(&self, vm_type: &VmType) -> f64;
}

/// Simple task which implements [Task] trait.
#[derive(Clone, Debug)]
pub struct SimpleTask {
    /// Id of the task.
    pub id: TaskId,
    /// Computational size in millions of instructions.
    pub length: f64,
    /// Size of the input in megabytes, transferred to the instance before processing.
    pub data_size: f64,
}

impl SimpleTask {
    /// Creates new task.
    pub fn new(id: TaskId, length: f64, data_size: f64) -> Self {
        SimpleTask { id, length, data_size }
    }
}

impl Task for SimpleTask {
    fn id(&self) -> TaskId {
        self.id
    }

    fn execution_time(&self, vm_type: &VmType) -> f64 {
        self.length / vm_type.mips + self.data_size / vm_type.bandwidth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_time_includes_transfer() {
        let task = SimpleTask::new(0, 4000.0, 100.0);
        let vm_type = VmType::new("vm", 0.1, 1000.0, 50.0);
        assert_eq!(task.execution_time(&vm_type), 4.0 + 2.0);
    }

    #[test]
    fn faster_vm_runs_faster() {
        let task = SimpleTask::new(0, 4000.0, 100.0);
        let slow = VmType::new("slow", 0.05, 500.0, 10.0);
        let fast = VmType::new("fast", 0.20, 2000.0, 100.0);
        assert!(task.execution_time(&fast) < task.execution_time(&slow));
    }
}
