//! Cheapest-first provisioning under a deadline.
//!
//! All public VM types are replicated once per task, private datacenters contribute their first VM type up to the
//! quota of the requester. Offers are sorted by price, map tasks take the cheapest ones and reduce tasks the next
//! ones. While the job misses its deadline the cheapest offer is dropped and allocation is retried on the rest,
//! trading money for speed until the deadline is met or the pool can't host the job anymore.

use mrprov_cloud::cloud::Cloud;
use serde::{Deserialize, Serialize};

use crate::{
    allocation_stats::AllocationStats,
    allocator::JobAllocation,
    error::{AllocationError, GuardFailure},
    policy::{Allocation, ProvisioningPolicy},
    pool::CandidatePool,
    request::Request,
};

/// What to do when an allocation attempt fails its internal checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardFailurePolicy {
    /// Treat the attempt like a missed deadline: prune the cheapest offer and retry.
    #[default]
    Prune,
    /// Reject the request right away.
    Abort,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub guard_failure: GuardFailurePolicy,
}

impl PolicyConfig {
    /// Builds config from `key=value` pairs, e.g. `guard_failure=Abort`. Unknown keys and values are rejected.
    pub fn from_args<'a>(args: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self, serde_yaml::Error> {
        let mapping = args
            .into_iter()
            .map(|(key, value)| (serde_yaml::Value::from(key), serde_yaml::Value::from(value)))
            .collect::<serde_yaml::Mapping>();
        serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))
    }
}

enum SearchState {
    Searching,
    Feasible(Allocation),
    Exhausted,
}

#[derive(Default)]
struct SearchProgress {
    attempts: usize,
    pruned: usize,
}

pub struct LffCostPolicy {
    config: PolicyConfig,
}

impl LffCostPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// One allocation attempt on the current pool. Prunes the pool unless the attempt is accepted.
    fn attempt(
        &self,
        request: &Request,
        pool: &mut CandidatePool,
        progress: &mut SearchProgress,
    ) -> Result<SearchState, GuardFailure> {
        progress.attempts += 1;
        let outcome = JobAllocation::allocate(request.job.map_tasks(), request.job.reduce_tasks(), pool.offers());
        match outcome {
            Ok(allocation) => {
                let finish_times = allocation.finish_times();
                if finish_times.meets(request.deadline) {
                    let schedule = allocation.to_schedule();
                    let stats = AllocationStats::new(finish_times, &schedule, progress.attempts, progress.pruned);
                    return Ok(SearchState::Feasible(Allocation { schedule, stats }));
                }
                log::debug!(
                    "request {}: attempt {} finishes at {} (map {}), deadline {}",
                    request.id,
                    progress.attempts,
                    finish_times.finish_time,
                    finish_times.map_finish_time,
                    request.deadline
                );
            }
            Err(failure) => {
                log::warn!("request {}: attempt {} failed: {}", request.id, progress.attempts, failure);
                if self.config.guard_failure == GuardFailurePolicy::Abort {
                    return Err(failure);
                }
            }
        }
        if let Some(offer) = pool.offers().first() {
            log::debug!(
                "request {}: pruning offer {} ({}, {}/h), {} left",
                request.id,
                offer.id,
                offer.vm_type.name,
                offer.cost_per_hour(),
                pool.len() - 1
            );
        }
        if pool.prune_front().is_none() {
            return Ok(SearchState::Exhausted);
        }
        progress.pruned += 1;
        Ok(SearchState::Searching)
    }
}

impl Default for LffCostPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl ProvisioningPolicy for LffCostPolicy {
    fn name(&self) -> &str {
        "LffCost"
    }

    fn allocate(&self, cloud: &Cloud, request: &Request) -> Result<Allocation, AllocationError> {
        let total_tasks = request.job.total_tasks();
        let mut pool = CandidatePool::build(cloud, request.user_class, total_tasks);
        log::debug!(
            "request {}: {} tasks, pool of {} offers",
            request.id,
            total_tasks,
            pool.len()
        );

        let mut progress = SearchProgress::default();
        let mut state = SearchState::Searching;
        loop {
            state = match state {
                SearchState::Searching if pool.len() < total_tasks => SearchState::Exhausted,
                SearchState::Searching => self.attempt(request, &mut pool, &mut progress)?,
                SearchState::Feasible(allocation) => return Ok(allocation),
                SearchState::Exhausted => {
                    return Err(AllocationError::InsufficientCapacity {
                        available: pool.len(),
                        required: total_tasks,
                        attempts: progress.attempts,
                    })
                }
            }
        }
    }
}
