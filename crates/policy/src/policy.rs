//! Trait for a provisioning policy.

use mrprov_cloud::cloud::Cloud;

use crate::{allocation_stats::AllocationStats, error::AllocationError, request::Request, schedule::Schedule};

/// Accepted allocation of a request.
#[derive(Clone, Debug)]
pub struct Allocation {
    pub schedule: Schedule,
    pub stats: AllocationStats,
}

/// Decides which offers to provision for a request and which task runs on which offer.
///
/// Policies keep no per-request state, so one instance can serve concurrent requests.
pub trait ProvisioningPolicy: Send + Sync {
    /// Name of the policy used in logs and experiment results.
    fn name(&self) -> &str;

    /// Computes a complete schedule for `request` or explains why there is none.
    fn allocate(&self, cloud: &Cloud, request: &Request) -> Result<Allocation, AllocationError>;

    /// Fills [Request::schedule] and returns `true` if the request is accepted.
    /// On rejection the schedule is left empty.
    fn run_algorithm(&self, cloud: &Cloud, request: &mut Request) -> bool {
        request.schedule.clear();
        match self.allocate(cloud, request) {
            Ok(allocation) => {
                log::info!(
                    "{}: execution time for request {} is {} (map finish time {})",
                    self.name(),
                    request.id,
                    allocation.stats.finish_time,
                    allocation.stats.map_finish_time
                );
                request.schedule = allocation.schedule;
                true
            }
            Err(err) => {
                log::info!("{}: request {} rejected: {}", self.name(), request.id, err);
                false
            }
        }
    }
}
