use std::collections::{BTreeMap, BTreeSet};

use mrprov::{
    error::{AllocationError, GuardFailure},
    experiment::{Experiment, ExperimentSummary, RequestSet},
    feasibility::FinishTimes,
    parser::YamlRequestSet,
    policies::lff_cost::{GuardFailurePolicy, LffCostPolicy, PolicyConfig},
    policy::ProvisioningPolicy,
    request::{Job, Request},
    task::{Phase, Task, TaskId},
};
use mrprov_cloud::{
    cloud::Cloud,
    datacenter::{PrivateCloudDatacenter, PublicCloudDatacenter},
    user_class::UserClass,
    vm_type::VmType,
};

/// Task with a fixed duration per VM type name.
struct TableTask {
    id: TaskId,
    durations: BTreeMap<&'static str, f64>,
}

impl Task for TableTask {
    fn id(&self) -> TaskId {
        self.id
    }

    fn execution_time(&self, vm_type: &VmType) -> f64 {
        self.durations[vm_type.name.as_str()]
    }
}

fn task(id: TaskId, durations: &[(&'static str, f64)]) -> Box<dyn Task> {
    Box::new(TableTask {
        id,
        durations: durations.iter().copied().collect(),
    })
}

/// Type A costs 0.05/h and is slow, type B costs 0.10/h and is twice as fast.
fn two_type_cloud() -> Cloud {
    Cloud {
        public_datacenters: vec![PublicCloudDatacenter {
            name: "public".to_string(),
            vm_types: vec![VmType::new("A", 0.05, 1000.0, 10.0), VmType::new("B", 0.10, 2000.0, 20.0)],
        }],
        private_datacenters: Vec::new(),
    }
}

fn two_map_one_reduce(deadline: f64) -> Request {
    let map_durations = [("A", 100.0), ("B", 50.0)];
    let reduce_durations = [("A", 50.0), ("B", 25.0)];
    let job = Job::new(
        vec![task(0, &map_durations), task(1, &map_durations)],
        vec![task(2, &reduce_durations)],
    )
    .unwrap();
    Request::new(1, UserClass::Bronze, deadline, job).unwrap()
}

fn offer_types(cloud: &Cloud, request: &Request) -> Vec<String> {
    let policy = LffCostPolicy::default();
    let allocation = policy.allocate(cloud, request).unwrap();
    [0, 1, 2]
        .iter()
        .map(|&task_id| allocation.schedule.vm_type_of(task_id).unwrap().name.clone())
        .collect()
}

fn assert_complete(request: &Request) {
    let task_ids = request
        .job
        .map_tasks()
        .iter()
        .chain(request.job.reduce_tasks().iter())
        .map(|task| task.id())
        .collect::<BTreeSet<_>>();
    let plan = &request.schedule.scheduling_plan;
    assert_eq!(plan.keys().copied().collect::<BTreeSet<_>>(), task_ids);
    let offers = plan.values().copied().collect::<BTreeSet<_>>();
    assert_eq!(offers.len(), plan.len(), "offers must not be shared between tasks");
    assert_eq!(request.schedule.provision_list.len(), plan.len());
}

#[test]
fn loose_deadline_uses_cheapest_offers() {
    let cloud = two_type_cloud();
    let mut request = two_map_one_reduce(200.0);
    let policy = LffCostPolicy::default();

    let allocation = policy.allocate(&cloud, &request).unwrap();
    assert_eq!(allocation.stats.finish_time, 150.0);
    assert_eq!(allocation.stats.map_finish_time, 100.0);
    assert_eq!(allocation.stats.attempts, 1);
    assert_eq!(allocation.stats.pruned, 0);
    assert_eq!(
        allocation.schedule.scheduling_plan.into_iter().collect::<Vec<_>>(),
        vec![(0, 0), (1, 1), (2, 2)]
    );

    assert!(policy.run_algorithm(&cloud, &mut request));
    assert_complete(&request);
    assert_eq!(offer_types(&cloud, &request), vec!["A", "A", "A"]);
}

#[test]
fn tight_deadline_prunes_towards_faster_offers() {
    let cloud = two_type_cloud();
    let mut request = two_map_one_reduce(120.0);
    let policy = LffCostPolicy::default();

    let allocation = policy.allocate(&cloud, &request).unwrap();
    assert_eq!(allocation.stats.attempts, 4);
    assert_eq!(allocation.stats.pruned, 3);
    assert_eq!(allocation.stats.map_finish_time, 50.0);
    assert_eq!(allocation.stats.finish_time, 75.0);
    assert!((allocation.stats.hourly_cost - 0.30).abs() < 1e-12);
    assert!((allocation.stats.estimated_cost - 0.30).abs() < 1e-12);
    assert_eq!(
        allocation.schedule.scheduling_plan.into_iter().collect::<Vec<_>>(),
        vec![(0, 3), (1, 4), (2, 5)]
    );

    assert!(policy.run_algorithm(&cloud, &mut request));
    assert_complete(&request);
    assert_eq!(offer_types(&cloud, &request), vec!["B", "B", "B"]);
}

#[test]
fn unreachable_deadline_exhausts_pool() {
    let cloud = two_type_cloud();
    let mut request = two_map_one_reduce(50.0);
    let policy = LffCostPolicy::default();

    assert_eq!(
        policy.allocate(&cloud, &request).err(),
        Some(AllocationError::InsufficientCapacity {
            available: 2,
            required: 3,
            attempts: 4
        })
    );
    assert!(!policy.run_algorithm(&cloud, &mut request));
    assert!(request.schedule.is_empty());
}

#[test]
fn deadline_respected_on_success() {
    let cloud = two_type_cloud();
    let policy = LffCostPolicy::default();
    for deadline in [50.0, 74.9, 75.0, 100.0, 124.9, 125.0, 149.9, 150.0, 1000.0] {
        let mut request = two_map_one_reduce(deadline);
        if policy.run_algorithm(&cloud, &mut request) {
            assert_complete(&request);
            let finish_times = FinishTimes::from_schedule(&request.job, &request.schedule).unwrap();
            assert!(finish_times.finish_time <= deadline);
        } else {
            assert!(request.schedule.is_empty());
            assert!(deadline < 75.0);
        }
    }
}

#[test]
fn rejected_request_clears_previous_schedule() {
    let cloud = two_type_cloud();
    let policy = LffCostPolicy::default();
    let mut request = two_map_one_reduce(200.0);
    assert!(policy.run_algorithm(&cloud, &mut request));
    assert!(!request.schedule.is_empty());

    request.deadline = 10.0;
    assert!(!policy.run_algorithm(&cloud, &mut request));
    assert!(request.schedule.is_empty());
}

#[test]
fn undersized_pool_rejected_immediately() {
    let cloud = Cloud {
        public_datacenters: Vec::new(),
        private_datacenters: vec![PrivateCloudDatacenter {
            name: "private".to_string(),
            vm_types: vec![VmType::new("A", 0.0, 1000.0, 10.0)],
            max_vms: [(UserClass::Bronze, 2)].into_iter().collect(),
        }],
    };
    let mut request = two_map_one_reduce(1000.0);
    let policy = LffCostPolicy::default();
    assert_eq!(
        policy.allocate(&cloud, &request).err(),
        Some(AllocationError::InsufficientCapacity {
            available: 2,
            required: 3,
            attempts: 0
        })
    );
    assert!(!policy.run_algorithm(&cloud, &mut request));
    assert!(request.schedule.is_empty());
}

#[test]
fn private_offers_mix_with_public_ones() {
    let mut cloud = two_type_cloud();
    cloud.private_datacenters.push(PrivateCloudDatacenter {
        name: "private".to_string(),
        vm_types: vec![VmType::new("P", 0.0, 1500.0, 10.0), VmType::new("A", 0.05, 1000.0, 10.0)],
        max_vms: [(UserClass::Gold, 1)].into_iter().collect(),
    });
    let durations = [("A", 100.0), ("B", 50.0), ("P", 60.0)];
    let job = Job::new(vec![task(0, &durations), task(1, &durations)], vec![task(2, &durations)]).unwrap();
    let request = Request::new(1, UserClass::Gold, 1000.0, job).unwrap();

    let allocation = LffCostPolicy::default().allocate(&cloud, &request).unwrap();
    assert_eq!(allocation.schedule.vm_type_of(0).unwrap().name, "P");
    assert_eq!(allocation.schedule.vm_type_of(1).unwrap().name, "A");
    assert_eq!(allocation.schedule.vm_type_of(2).unwrap().name, "A");
    // Public offers get ids first, the private one comes last.
    assert_eq!(allocation.schedule.scheduling_plan[&0], 6);
}

fn map_only(deadline: f64) -> Request {
    let durations = [("A", 100.0), ("B", 50.0)];
    let job = Job::new(vec![task(0, &durations), task(1, &durations)], Vec::new()).unwrap();
    Request::new(4, UserClass::Bronze, deadline, job).unwrap()
}

#[test]
fn map_only_job_finishes_with_map_phase() {
    let cloud = two_type_cloud();
    let policy = LffCostPolicy::default();

    let allocation = policy.allocate(&cloud, &map_only(100.0)).unwrap();
    assert_eq!(allocation.stats.attempts, 1);
    assert_eq!(allocation.stats.finish_time, 100.0);
    assert_eq!(allocation.stats.map_finish_time, 100.0);

    let allocation = policy.allocate(&cloud, &map_only(60.0)).unwrap();
    assert_eq!(allocation.stats.finish_time, 50.0);
    assert_eq!(
        allocation.schedule.scheduling_plan.into_iter().collect::<Vec<_>>(),
        vec![(0, 2), (1, 3)]
    );

    let mut request = map_only(49.0);
    assert_eq!(
        policy.allocate(&cloud, &request).err(),
        Some(AllocationError::InsufficientCapacity {
            available: 1,
            required: 2,
            attempts: 3
        })
    );
    assert!(!policy.run_algorithm(&cloud, &mut request));
    assert!(request.schedule.is_empty());
}

fn empty_job(deadline: f64) -> Request {
    let job = Job::new(Vec::new(), Vec::new()).unwrap();
    Request::new(5, UserClass::Bronze, deadline, job).unwrap()
}

#[test]
fn empty_job_accepted_with_empty_schedule() {
    let mut request = empty_job(10.0);
    let policy = LffCostPolicy::default();
    let allocation = policy.allocate(&two_type_cloud(), &request).unwrap();
    assert_eq!(allocation.stats.attempts, 1);
    assert_eq!(allocation.stats.finish_time, 0.0);
    assert!(allocation.schedule.is_empty());
    assert!(policy.run_algorithm(&two_type_cloud(), &mut request));
}

#[test]
fn empty_job_with_unreachable_deadline_terminates() {
    let policy = LffCostPolicy::default();
    for deadline in [-1.0, f64::NAN] {
        let mut request = empty_job(10.0);
        request.deadline = deadline;
        assert_eq!(
            policy.allocate(&two_type_cloud(), &request).err(),
            Some(AllocationError::InsufficientCapacity {
                available: 0,
                required: 0,
                attempts: 1
            })
        );
        assert!(!policy.run_algorithm(&two_type_cloud(), &mut request));
        assert!(request.schedule.is_empty());
    }
}

fn request_with_duplicate_task() -> Request {
    let durations = [("A", 10.0), ("B", 5.0)];
    let job = Job::new(vec![task(0, &durations), task(1, &durations)], vec![task(1, &durations)]).unwrap();
    Request::new(3, UserClass::Bronze, 1000.0, job).unwrap()
}

#[test]
fn guard_failure_prunes_until_exhausted() {
    let cloud = two_type_cloud();
    let mut request = request_with_duplicate_task();
    let policy = LffCostPolicy::new(PolicyConfig {
        guard_failure: GuardFailurePolicy::Prune,
    });
    assert_eq!(
        policy.allocate(&cloud, &request).err(),
        Some(AllocationError::InsufficientCapacity {
            available: 2,
            required: 3,
            attempts: 4
        })
    );
    assert!(!policy.run_algorithm(&cloud, &mut request));
    assert!(request.schedule.is_empty());
}

#[test]
fn guard_failure_aborts_search() {
    let cloud = two_type_cloud();
    let mut request = request_with_duplicate_task();
    let policy = LffCostPolicy::new(PolicyConfig {
        guard_failure: GuardFailurePolicy::Abort,
    });
    assert_eq!(
        policy.allocate(&cloud, &request).err(),
        Some(AllocationError::AllocationGuard(GuardFailure::DuplicateTask { task_id: 1 }))
    );
    assert!(!policy.run_algorithm(&cloud, &mut request));
    assert!(request.schedule.is_empty());
}

#[test]
fn guard_failure_names_phase() {
    let failure = GuardFailure::PoolTooSmall {
        phase: Phase::Reduce,
        needed: 2,
        remaining: 1,
    };
    assert_eq!(failure.to_string(), "reduce phase needs 2 offers but only 1 remain");
}

fn resolve_policy(name: &str) -> Box<dyn ProvisioningPolicy> {
    match name {
        "Prune" => Box::new(LffCostPolicy::default()),
        "Abort" => Box::new(LffCostPolicy::new(PolicyConfig {
            guard_failure: GuardFailurePolicy::Abort,
        })),
        x => panic!("Unknown policy {}", x),
    }
}

#[test]
fn experiment_runs_all_requests() {
    let catalog = r#"
public_datacenters:
  - name: public
    vm_types:
      - name: slow
        cost_per_hour: 0.05
        mips: 100.0
        bandwidth: 10.0
      - name: fast
        cost_per_hour: 0.10
        mips: 200.0
        bandwidth: 20.0
"#;
    // Map tasks take 100s on slow and 50s on fast, reduce tasks 50s and 25s.
    let requests = r#"
requests:
  - id: 1
    deadline: 200.0
    map_tasks: [{length: 10000.0}, {length: 10000.0}]
    reduce_tasks: [{length: 5000.0}]
  - id: 2
    deadline: 120.0
    map_tasks: [{length: 10000.0}, {length: 10000.0}]
    reduce_tasks: [{length: 5000.0}]
  - id: 3
    deadline: 50.0
    map_tasks: [{length: 10000.0}, {length: 10000.0}]
    reduce_tasks: [{length: 5000.0}]
"#;
    let cloud = Cloud::from_yaml_str(catalog).unwrap();
    let set = YamlRequestSet::from_yaml_str(requests).unwrap();
    let experiment = Experiment::new(
        cloud,
        vec![RequestSet {
            name: "scenario".to_string(),
            requests: set.requests,
        }],
        vec!["Prune".to_string(), "Abort".to_string()],
        resolve_policy,
    )
    .show_progress(false);

    let results = experiment.run(4);
    assert_eq!(results.len(), 6);
    assert_eq!(
        results
            .iter()
            .map(|r| (r.policy.as_str(), r.request_id, r.accepted))
            .collect::<Vec<_>>(),
        vec![
            ("Abort", 1, true),
            ("Abort", 2, true),
            ("Abort", 3, false),
            ("Prune", 1, true),
            ("Prune", 2, true),
            ("Prune", 3, false),
        ]
    );
    assert_eq!(results[4].stats.as_ref().unwrap().finish_time, 75.0);

    let summary = ExperimentSummary::from_results(results.iter().filter(|r| r.policy == "Prune"));
    assert_eq!(summary.requests, 3);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.mean_finish_time, (150.0 + 75.0) / 2.0);
}
