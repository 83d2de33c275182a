//! Trains the digit ensemble on a data file and reports validation accuracy.
//!
//! ```text
//! digit_ensemble --data data/training-data.txt --crossfold 2 --seed 1
//! digit_ensemble --data data/training-data.txt --config config/training_constant.json \
//!     --architecture config/architectures/split_digits.json --confusion
//! ```

use clap::Parser;
use digit_ensemble::architecture::{load_architecture, ArchitectureConfig};
use digit_ensemble::config::{load_config, TrainingConfig};
use digit_ensemble::dataset::{DataSet, Split};
use digit_ensemble::ensemble::Ensemble;
use digit_ensemble::report::{assess, ConfusionMatrix};
use digit_ensemble::utils::{Filters, SimpleRng};
use env_logger::Env;
use log::info;
use std::error::Error;
use std::io;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(about = "Handwritten digit recognition with specialist networks and nearest neighbour")]
struct Cli {
    /// Comma-separated samples, label last
    #[arg(long, default_value = "data/training-data.txt")]
    data: String,

    /// Training configuration JSON (default: cyclical schedule)
    #[arg(long)]
    config: Option<String>,

    /// Architecture JSON (default: two split-digit specialists)
    #[arg(long)]
    architecture: Option<String>,

    /// Split factor: 0 validates on everything, -1 trains on everything,
    /// f >= 2 keeps the last 1/f of the file for validation
    #[arg(long, default_value_t = 2, allow_hyphen_values = true)]
    crossfold: i32,

    /// Seed for weight initialisation (default: current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Append edge-filtered copies of every image to its features
    #[arg(long)]
    filters: bool,

    /// Print the ensemble's confusion matrix
    #[arg(long)]
    confusion: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let program_start = Instant::now();

    let filters = cli.filters.then(Filters::edges);
    let data = DataSet::from_path(&cli.data, Split::from_factor(cli.crossfold)?, filters.as_ref())?;
    let input_size = data.feature_width().unwrap_or(0);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TrainingConfig::default(),
    };
    let architecture = match &cli.architecture {
        Some(path) => load_architecture(path)?,
        None => ArchitectureConfig::split_digits(input_size),
    };
    if architecture.input_size() != Some(input_size) {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "architecture expects {:?} inputs but samples have {}",
                architecture.input_size(),
                input_size
            ),
        )));
    }

    let mut rng = match cli.seed {
        Some(seed) => SimpleRng::new(seed),
        None => SimpleRng::from_time(),
    };
    let mut ensemble = Ensemble::from_architecture(
        data.training.clone(),
        &architecture,
        config.activation(),
        config.weight_bound(),
        &mut rng,
    )?;

    let train_start = Instant::now();
    ensemble.train(&data.training, &config);
    let train_time = train_start.elapsed().as_secs_f64();

    let knn = assess("Nearest neighbour", ensemble.knn(), &data.validation);
    let combined = assess(
        "Multiple networks plus nearest neighbour",
        &ensemble,
        &data.validation,
    );
    println!("\n{}", knn);
    println!("\n{}", combined);

    if cli.confusion {
        println!("\n{}", ConfusionMatrix::build(&ensemble, &data.validation));
    }

    info!(
        "Training time {:.2}s, total time {:.2}s",
        train_time,
        program_start.elapsed().as_secs_f64()
    );
    Ok(())
}
