use std::{
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use itertools::Itertools;
use mrprov_cloud::cloud::Cloud;
use serde::{Deserialize, Serialize};
use threadpool::ThreadPool;

use crate::{allocation_stats::AllocationStats, parser::YamlRequest, policy::ProvisioningPolicy};

#[derive(Clone)]
pub struct RequestSet {
    pub name: String,
    pub requests: Vec<YamlRequest>,
}

struct Run {
    request_set: String,
    request: YamlRequest,
    policy: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestResult {
    pub request_set: String,
    pub request_id: u64,
    pub policy: String,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<AllocationStats>,
}

/// Aggregated results of one policy on one request set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub requests: usize,
    pub accepted: usize,
    pub acceptance_rate: f64,
    /// Mean finish time among accepted requests.
    pub mean_finish_time: f64,
    /// Sum of estimated costs of accepted requests.
    pub total_cost: f64,
}

impl ExperimentSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a RequestResult>) -> Self {
        let mut requests = 0;
        let mut finish_times = Vec::new();
        let mut total_cost = 0.0;
        for result in results {
            requests += 1;
            if let Some(stats) = result.stats.as_ref().filter(|_| result.accepted) {
                finish_times.push(stats.finish_time);
                total_cost += stats.estimated_cost;
            }
        }
        let accepted = finish_times.len();
        ExperimentSummary {
            requests,
            accepted,
            acceptance_rate: if requests == 0 {
                0.0
            } else {
                accepted as f64 / requests as f64
            },
            mean_finish_time: if accepted == 0 {
                0.0
            } else {
                finish_times.iter().sum::<f64>() / accepted as f64
            },
            total_cost,
        }
    }
}

/// Runs every request of every set with every policy on a shared catalog.
pub struct Experiment {
    cloud: Arc<Cloud>,
    request_sets: Vec<RequestSet>,
    policies: Vec<String>,
    policy_resolver: fn(&str) -> Box<dyn ProvisioningPolicy>,
    show_progress: bool,
}

impl Experiment {
    pub fn new(
        cloud: Cloud,
        request_sets: Vec<RequestSet>,
        policies: Vec<String>,
        policy_resolver: fn(&str) -> Box<dyn ProvisioningPolicy>,
    ) -> Self {
        Self {
            cloud: Arc::new(cloud),
            request_sets,
            policies,
            policy_resolver,
            show_progress: true,
        }
    }

    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn run(self, threads: usize) -> Vec<RequestResult> {
        let runs = self
            .request_sets
            .into_iter()
            .flat_map(|set| {
                let name = set.name;
                set.requests.into_iter().map(move |request| (name.clone(), request))
            })
            .cartesian_product(self.policies)
            .map(|((request_set, request), policy)| Run {
                request_set,
                request,
                policy,
            })
            .collect::<Vec<_>>();

        let total_runs = runs.len();

        let finished_run_atomic = Arc::new(AtomicUsize::new(0));
        let results = Arc::new(Mutex::new(Vec::new()));

        let pool = ThreadPool::new(threads.max(1));
        let start_time = Instant::now();
        for run in runs.into_iter() {
            let finished_run_atomic = finished_run_atomic.clone();
            let results = results.clone();
            let cloud = self.cloud.clone();
            let policy_resolver = self.policy_resolver;
            let show_progress = self.show_progress;
            pool.execute(move || {
                let policy = policy_resolver(&run.policy);
                let result = match run.request.to_request() {
                    Ok(request) => match policy.allocate(&cloud, &request) {
                        Ok(allocation) => RequestResult {
                            request_set: run.request_set,
                            request_id: request.id,
                            policy: run.policy,
                            accepted: true,
                            error: None,
                            stats: Some(allocation.stats),
                        },
                        Err(err) => RequestResult {
                            request_set: run.request_set,
                            request_id: request.id,
                            policy: run.policy,
                            accepted: false,
                            error: Some(err.to_string()),
                            stats: None,
                        },
                    },
                    Err(err) => RequestResult {
                        request_set: run.request_set,
                        request_id: run.request.id,
                        policy: run.policy,
                        accepted: false,
                        error: Some(err.to_string()),
                        stats: None,
                    },
                };

                results.lock().unwrap().push(result);

                finished_run_atomic.fetch_add(1, Ordering::SeqCst);
                if !show_progress {
                    return;
                }
                let finished_runs = finished_run_atomic.load(Ordering::SeqCst);

                let elapsed = start_time.elapsed();
                let remaining = Duration::from_secs_f64(
                    elapsed.as_secs_f64() / finished_runs as f64 * (total_runs - finished_runs) as f64,
                );
                print!("\r{}", " ".repeat(70));
                print!(
                    "\rFinished {}/{} [{}%] requests in {:.2?}, remaining time: {:.2?}",
                    finished_runs,
                    total_runs,
                    (finished_runs as f64 * 100. / total_runs as f64).round() as i32,
                    elapsed,
                    remaining
                );
                let _ = std::io::stdout().flush();
            });
        }

        pool.join();

        if self.show_progress {
            print!("\r{}", " ".repeat(70));
            println!("\rFinished {} requests in {:.2?}", total_runs, start_time.elapsed());
        }

        let mut results = std::mem::take(&mut *results.lock().unwrap());
        results.sort_by_cached_key(|result| (result.request_set.clone(), result.policy.clone(), result.request_id));
        results
    }
}
