use std::{fs::File, io::Write, path::PathBuf};

use clap::Parser;
use mrprov::parser::{YamlRequest, YamlRequestSet, YamlTask};
use mrprov_cloud::user_class::UserClass;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Generates a random set of requests.
#[derive(Parser, Debug)]
struct Args {
    /// Path to the resulting YAML file.
    #[arg(short, long)]
    output: PathBuf,

    /// Number of requests.
    #[arg(short, long, default_value_t = 100)]
    requests: u64,

    /// Seed of the generator.
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Bounds of uniform distribution for the number of map tasks.
    #[arg(long, default_value_t = 1)]
    map_tasks_from: usize,

    /// Bounds of uniform distribution for the number of map tasks.
    #[arg(long, default_value_t = 20)]
    map_tasks_to: usize,

    /// Number of reduce tasks relative to the number of map tasks, at least one reduce task is generated.
    #[arg(long, default_value_t = 0.25)]
    reduce_ratio: f64,

    /// Bounds of uniform distribution for task length in millions of instructions.
    #[arg(long, default_value_t = 100000.0)]
    length_from: f64,

    /// Bounds of uniform distribution for task length in millions of instructions.
    #[arg(long, default_value_t = 1000000.0)]
    length_to: f64,

    /// Bounds of uniform distribution for task input size in megabytes.
    #[arg(long, default_value_t = 64.0)]
    data_size_from: f64,

    /// Bounds of uniform distribution for task input size in megabytes.
    #[arg(long, default_value_t = 512.0)]
    data_size_to: f64,

    /// Bounds of uniform distribution for deadline in seconds.
    #[arg(long, default_value_t = 600.0)]
    deadline_from: f64,

    /// Bounds of uniform distribution for deadline in seconds.
    #[arg(long, default_value_t = 7200.0)]
    deadline_to: f64,
}

fn main() {
    let args = Args::parse();
    let mut rng = Pcg64::seed_from_u64(args.seed);

    let user_classes = [UserClass::Gold, UserClass::Silver, UserClass::Bronze];
    let random_task = |rng: &mut Pcg64| YamlTask {
        length: rng.gen_range(args.length_from..=args.length_to),
        data_size: rng.gen_range(args.data_size_from..=args.data_size_to),
    };

    let requests = (0..args.requests)
        .map(|id| {
            let map_tasks = rng.gen_range(args.map_tasks_from.max(1)..=args.map_tasks_to.max(1));
            let reduce_tasks = ((map_tasks as f64 * args.reduce_ratio).round() as usize).clamp(1, map_tasks);
            YamlRequest {
                id,
                user_class: user_classes[rng.gen_range(0..user_classes.len())],
                deadline: rng.gen_range(args.deadline_from..=args.deadline_to),
                map_tasks: (0..map_tasks).map(|_| random_task(&mut rng)).collect(),
                reduce_tasks: (0..reduce_tasks).map(|_| random_task(&mut rng)).collect(),
            }
        })
        .collect();

    let set = YamlRequestSet { requests };
    File::create(&args.output)
        .unwrap_or_else(|_| panic!("Can't create file {}", args.output.display()))
        .write_all(serde_yaml::to_string(&set).expect("Can't serialize requests").as_bytes())
        .unwrap_or_else(|_| panic!("Can't write requests to {}", args.output.display()));
    println!("Generated {} requests in {}", args.requests, args.output.display());
}
