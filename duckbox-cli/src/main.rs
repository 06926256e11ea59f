// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use duckbox_cli::{build, split};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    name: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Build(build::BuildArgs),
    Split(split::SplitArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Build(build_args)) => build::build(build_args),
        Some(Commands::Split(split_args)) => split::split(split_args),
        None => {}
    }
}
