use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use digit_network::{
    AppConfig, Dataset, Network,
    config::seed_or_random,
    katas::{anagram, contains_duplicate, k_distinct, two_sum},
    logging, mnist,
};
use ndarray_rand::rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a digit classifier with mini-batch stochastic gradient descent
    Train(TrainArgs),
    /// Run each kata on a few random inputs
    Katas {
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// YAML file with training settings; flags given here override it
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding the gzipped MNIST IDX files
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Train on N samples per class of two synthetic 2-D clusters instead of MNIST
    #[arg(long, value_name = "N", conflicts_with = "data_dir")]
    synthetic: Option<usize>,
    /// Hidden layer sizes, comma separated
    #[arg(long, value_name = "SIZES", value_delimiter = ',')]
    hidden: Option<Vec<usize>>,
    #[arg(short, long)]
    epochs: Option<usize>,
    #[arg(short = 'b', long)]
    mini_batch_size: Option<usize>,
    #[arg(short, long)]
    learning_rate: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Train(args) => train(args),
        Command::Katas { seed } => {
            let mut rng = StdRng::seed_from_u64(resolve_seed(seed));
            run_katas(&mut rng);
            Ok(())
        }
    }
}

// The seed goes to stdout with the rest of the run's output so any run can be replayed with --seed.
fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = seed_or_random(seed);
    println!("Seed: {seed}");
    info!(seed, "seeded random number generator");
    seed
}

fn train(args: TrainArgs) -> Result<(), Box<dyn Error>> {
    let file_config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let cli_config = AppConfig {
        hidden_layers: args.hidden,
        epochs: args.epochs,
        mini_batch_size: args.mini_batch_size,
        learning_rate: args.learning_rate,
        seed: args.seed,
        data_dir: args.data_dir,
    };
    let config = file_config.merge(cli_config).resolve()?;

    let mut rng = StdRng::seed_from_u64(resolve_seed(config.seed));
    let (mut dataset, classes) = match args.synthetic {
        Some(samples_per_class) => (Dataset::two_clusters(samples_per_class, &mut rng)?, 2),
        None => (mnist::load(&config.data_dir)?, mnist::CLASSES),
    };

    let sizes = config.layer_sizes(dataset.input_size()?, classes);
    let mut network = Network::new(sizes, &mut rng)?;
    network.stochastic_gradient_descent(
        &mut dataset.training_data,
        config.epochs,
        config.mini_batch_size,
        config.learning_rate,
        Some(dataset.test_data.as_slice()),
        &mut rng,
    )?;

    if !dataset.validation_data.is_empty() {
        let correct = network.evaluate(&dataset.validation_data);
        println!("Validation: {correct} / {}", dataset.validation_data.len());
    }
    Ok(())
}

// The same small demonstrations the exercises shipped with: random inputs for the numeric katas,
// fixed words for the string ones.
fn run_katas<R: Rng>(rng: &mut R) {
    let nums: Vec<i64> = (0..5).map(|_| rng.gen_range(-5..=10)).collect();
    let answer = contains_duplicate::brute_force(&nums);
    println!("contains_duplicate::brute_force: nums={nums:?} answer={answer}");

    let nums: Vec<i64> = (0..10).map(|_| rng.gen_range(-100..=100)).collect();
    let answer = contains_duplicate::hashed(&nums);
    println!("contains_duplicate::hashed: nums={nums:?} answer={answer}");

    let anagrams: [(&str, fn(&str, &str) -> bool, &str, &str); 3] = [
        ("sorted", anagram::sorted, "car", "tac"),
        ("counted", anagram::counted, "car", "tac"),
        ("single_pass", anagram::single_pass, "anagram", "gnarama"),
    ];
    for (name, approach, s, t) in anagrams {
        let answer = approach(s, t);
        println!("anagram::{name}: s={s:?} t={t:?} answer={answer}");
    }

    for (s, k) in [("eceba", 2), ("ecebbdabrheee", 3), ("ecebbdabrheee", 4)] {
        let answer = k_distinct::longest_substring(s, k);
        println!("k_distinct::longest_substring: s={s:?} k={k} answer={answer:?}");
    }

    let nums: Vec<i64> = (0..6).map(|_| rng.gen_range(-5..=5)).collect();
    let target = rng.gen_range(-5..=5);
    let answer = two_sum::brute_force(&nums, target);
    println!("two_sum::brute_force: nums={nums:?} target={target} answer={answer:?}");

    let nums: Vec<i64> = (0..6).map(|_| rng.gen_range(-5..=5)).collect();
    let target = rng.gen_range(-5..=5);
    let answer = two_sum::hashed(&nums, target);
    println!("two_sum::hashed: nums={nums:?} target={target} answer={answer:?}");
}
