// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use clap::Args;

use duckbox_core::constant;
use duckbox_core::ds;
use duckbox_core::ut;

#[derive(Debug, Args)]
#[command(about = "Split a dataset into train and validation lists.")]
pub struct SplitArgs {
    #[arg(
        short = 'd',
        long,
        help = "Dataset directory containing images/ and labels/.",
        required = true
    )]
    pub dataset: Option<String>,

    #[arg(
        short = 'f',
        long,
        help = "Fraction of samples assigned to the training set.",
        default_value = "0.8"
    )]
    pub fraction: Option<f32>,

    #[arg(
        short = 's',
        long,
        help = "Seed for the shuffle generator.",
        default_value = "42"
    )]
    pub seed: Option<u64>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn split(args: &SplitArgs) {
    let fraction = args.fraction.unwrap_or(constant::DEFAULT_TRAIN_FRACTION);
    let seed = args.seed.unwrap_or(constant::DEFAULT_SPLIT_SEED);

    if !(0.0..=1.0).contains(&fraction) {
        eprintln!("[duckbox::split] ERROR: fraction must be between 0.0 and 1.0.");
        std::process::exit(1);
    }

    let dataset = args.dataset.to_owned().unwrap();

    let names = ds::collect_sample_names(&dataset).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    if names.is_empty() {
        eprintln!(
            "[duckbox::split] ERROR: No samples were detected. Please check that the dataset contains label files."
        );
        std::process::exit(1);
    }

    let (train, val) = ds::split_samples(names, fraction, seed);

    ds::write_split_lists(&dataset, &train, &val).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    ut::track::progress_log(
        &format!(
            "Split {} samples into {} train and {} validation.",
            ut::track::thousands_format(train.len() + val.len()),
            ut::track::thousands_format(train.len()),
            ut::track::thousands_format(val.len())
        ),
        args.verbose,
    );
}
