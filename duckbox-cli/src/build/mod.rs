// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use clap::{Args, Subcommand};

mod real;
mod sim;

use real::{BuildRealArgs, build_real};
use sim::{BuildSimArgs, build_sim};

#[derive(Debug, Args)]
#[command(about = "Build detection datasets from segmented renders or annotated frames.")]
#[command(args_conflicts_with_subcommands = true)]
#[command(arg_required_else_help = true)]
#[command(flatten_help = true)]
pub struct BuildArgs {
    #[command(subcommand)]
    command: Option<BuildCommands>,
}

#[derive(Debug, Subcommand)]
enum BuildCommands {
    Sim(BuildSimArgs),
    Real(BuildRealArgs),
}

pub fn build(args: &BuildArgs) {
    match args.command.as_ref().unwrap() {
        BuildCommands::Sim(sim) => build_sim(sim),
        BuildCommands::Real(real) => build_real(real),
    }
}
