use std::{
    collections::BTreeMap,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use clap::Parser;
use env_logger::Builder;
use itertools::Itertools;
use mrprov::{
    experiment::{Experiment, ExperimentSummary, RequestResult, RequestSet},
    parser::YamlRequestSet,
    policies::lff_cost::{LffCostPolicy, PolicyConfig},
    policy::ProvisioningPolicy,
};
use mrprov_cloud::cloud::Cloud;
use serde::Deserialize;

#[derive(Deserialize)]
struct Config {
    catalog: PathBuf,
    request_sets: Vec<PathBuf>,
    policies: Vec<String>,
}

/// Runs provisioning policies over sets of requests.
#[derive(Parser, Debug)]
struct Args {
    /// Path to config.
    #[arg(short, long)]
    config: PathBuf,

    /// Path to file with results.
    #[arg(short, long)]
    output: PathBuf,

    /// Do not run experiments, just read results from --output.
    #[arg(long)]
    precalculated: bool,

    /// Number of threads.
    #[arg(long, default_value_t = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))]
    threads: usize,
}

fn filename(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|name| name.to_str())
        .unwrap_or("requests")
        .to_string()
}

/// Splits `Name[key=value,...]` into the name and its arguments.
fn read_name(name: &str) -> Result<(&str, Vec<(&str, &str)>), String> {
    let Some(open) = name.find('[') else {
        return Ok((name, Vec::new()));
    };
    let inner = name[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| format!("Missing closing bracket in {}", name))?;
    let args = inner
        .split(',')
        .filter(|arg| !arg.is_empty())
        .map(|arg| {
            arg.split_once('=')
                .ok_or_else(|| format!("Argument {} of {} is not key=value", arg, name))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((&name[..open], args))
}

fn resolve_policy(name: &str) -> Result<Box<dyn ProvisioningPolicy>, String> {
    let (name, args) = read_name(name)?;
    match name {
        "LffCost" => {
            let config = PolicyConfig::from_args(args).map_err(|e| format!("Invalid arguments of {}: {}", name, e))?;
            Ok(Box::new(LffCostPolicy::new(config)))
        }
        x => Err(format!("Unknown provisioning policy {}", x)),
    }
}

fn policy_resolver(name: &str) -> Box<dyn ProvisioningPolicy> {
    resolve_policy(name).unwrap_or_else(|e| panic!("{}", e))
}

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    let config: Config = serde_yaml::from_str(&std::fs::read_to_string(args.config).expect("Can't read config file"))
        .expect("Can't parse config file");

    let result: Vec<RequestResult> = if args.precalculated {
        serde_json::from_str(&std::fs::read_to_string(&args.output).expect("Can't read file with result"))
            .expect("Can't parse file with result")
    } else {
        let cloud = Cloud::from_yaml(&config.catalog).unwrap_or_else(|e| panic!("Can't load catalog: {e}"));
        let request_sets = config
            .request_sets
            .iter()
            .enumerate()
            .map(|(i, path)| RequestSet {
                name: format!("{}_{}", i, filename(path)),
                requests: YamlRequestSet::from_yaml(path)
                    .unwrap_or_else(|e| panic!("Can't load requests from {}: {e}", path.display()))
                    .requests,
            })
            .collect();
        for policy in config.policies.iter() {
            // fail before running anything
            if let Err(e) = resolve_policy(policy) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }

        let experiment = Experiment::new(cloud, request_sets, config.policies, policy_resolver);
        let result = experiment.run(args.threads);
        File::create(&args.output)
            .expect("Can't create output file")
            .write_all(
                serde_json::to_string_pretty(&result)
                    .expect("Can't serialize results")
                    .as_bytes(),
            )
            .expect("Can't write to output file");
        result
    };

    let summaries: BTreeMap<(String, String), ExperimentSummary> = result
        .iter()
        .into_group_map_by(|run| (run.request_set.clone(), run.policy.clone()))
        .into_iter()
        .map(|(key, runs)| (key, ExperimentSummary::from_results(runs)))
        .collect();

    let width = summaries
        .keys()
        .map(|(set, policy)| set.len() + policy.len() + 3)
        .max()
        .unwrap_or(0)
        .max("requests / policy".len());
    println!(
        "| {: <width$} | requests | accepted | acceptance | mean finish time | total cost |",
        "requests / policy",
        width = width
    );
    println!(
        "|-{:-<width$}-|----------|----------|------------|------------------|------------|",
        "",
        width = width
    );
    for ((set, policy), summary) in summaries.into_iter() {
        println!(
            "| {: <width$} | {: >8} | {: >8} | {: >9.2}% | {: >16.2} | {: >10.3} |",
            format!("{} / {}", set, policy),
            summary.requests,
            summary.accepted,
            summary.acceptance_rate * 100.,
            summary.mean_finish_time,
            summary.total_cost,
            width = width
        );
    }
}
