//! Greedy cheapest-first assignment of offers to the tasks of a job.

use std::collections::BTreeSet;

use crate::{
    error::GuardFailure,
    feasibility::FinishTimes,
    offer::ResourceOffer,
    schedule::Schedule,
    task::{Phase, Task, TaskId},
};

/// Offer assigned to a task within one allocation attempt.
pub struct Assignment<'a> {
    pub task: &'a dyn Task,
    pub offer: &'a ResourceOffer,
}

impl Assignment<'_> {
    /// Execution time of the task on the assigned offer.
    pub fn duration(&self) -> f64 {
        self.task.execution_time(&self.offer.vm_type)
    }
}

/// Assignments of one phase, in the declared order of its tasks.
pub struct PhaseAllocation<'a> {
    pub phase: Phase,
    pub assignments: Vec<Assignment<'a>>,
}

/// Assigns `offers[i]` to `tasks[i]`.
///
/// `seen` collects ids of the tasks scheduled so far in the attempt, a repeated id fails the attempt.
pub fn allocate_phase<'a>(
    phase: Phase,
    tasks: &'a [Box<dyn Task>],
    offers: &'a [ResourceOffer],
    seen: &mut BTreeSet<TaskId>,
) -> Result<PhaseAllocation<'a>, GuardFailure> {
    if offers.len() < tasks.len() {
        return Err(GuardFailure::PoolTooSmall {
            phase,
            needed: tasks.len(),
            remaining: offers.len(),
        });
    }
    let mut assignments = Vec::with_capacity(tasks.len());
    for (task, offer) in tasks.iter().zip(offers) {
        if !seen.insert(task.id()) {
            return Err(GuardFailure::DuplicateTask { task_id: task.id() });
        }
        assignments.push(Assignment {
            task: task.as_ref(),
            offer,
        });
    }
    Ok(PhaseAllocation { phase, assignments })
}

/// One complete allocation attempt.
pub struct JobAllocation<'a> {
    pub map: PhaseAllocation<'a>,
    pub reduce: PhaseAllocation<'a>,
}

impl<'a> JobAllocation<'a> {
    /// Map tasks take the cheapest offers, reduce tasks continue with the offers right after them.
    pub fn allocate(
        map_tasks: &'a [Box<dyn Task>],
        reduce_tasks: &'a [Box<dyn Task>],
        offers: &'a [ResourceOffer],
    ) -> Result<Self, GuardFailure> {
        let mut seen = BTreeSet::new();
        let map = allocate_phase(Phase::Map, map_tasks, offers, &mut seen)?;
        let reduce_offers = offers.get(map_tasks.len()..).unwrap_or_default();
        let reduce = allocate_phase(Phase::Reduce, reduce_tasks, reduce_offers, &mut seen)?;
        Ok(JobAllocation { map, reduce })
    }

    pub fn finish_times(&self) -> FinishTimes {
        FinishTimes::from_durations(
            self.map.assignments.iter().map(Assignment::duration),
            self.reduce.assignments.iter().map(Assignment::duration),
        )
    }

    /// Materializes the attempt as a [Schedule].
    pub fn to_schedule(&self) -> Schedule {
        let mut schedule = Schedule::default();
        for assignment in self.map.assignments.iter().chain(self.reduce.assignments.iter()) {
            schedule
                .scheduling_plan
                .insert(assignment.task.id(), assignment.offer.id);
            schedule.provision_list.push(assignment.offer.clone());
        }
        schedule
    }
}
