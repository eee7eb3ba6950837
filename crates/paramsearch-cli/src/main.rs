use std::process::ExitCode;

use clap::{Parser, Subcommand};
use paramsearch_core::errors::PsError;
use paramsearch_core::SamplingMode;
use paramsearch_exp::WriteSummary;
use tracing::Level;

use commands::{
    grid::{self, GridArgs},
    random::{self, RandomArgs},
};

mod commands;
mod params;

#[derive(Parser, Debug)]
#[command(
    name = "paramsearch",
    version,
    about = "Generate hyperparameter tables for experiment runners"
)]
struct Cli {
    /// Maximum level of diagnostics written to stderr.
    #[arg(long, global = true, default_value_t = Level::WARN)]
    log_level: Level,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exhaustive grid: --name=(start,stop,count) per parameter.
    Grid(GridArgs),
    /// Gaussian draws: --name=(mean,stddev) per parameter.
    Normal(RandomArgs),
    /// Uniform draws on [low, high): --name=(low,high) per parameter.
    Uniform(RandomArgs),
    /// Log-uniform draws on [low, high): --name=(low,high) per parameter.
    Loguniform(RandomArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match dispatch(&cli.command) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("paramsearch: {err}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: &Command) -> Result<WriteSummary, PsError> {
    match command {
        Command::Grid(args) => grid::run(args),
        Command::Normal(args) => random::run(SamplingMode::Normal, args),
        Command::Uniform(args) => random::run(SamplingMode::Uniform, args),
        Command::Loguniform(args) => random::run(SamplingMode::LogUniform, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grid_with_trailing_params() {
        let cli = Cli::try_parse_from([
            "paramsearch",
            "grid",
            "out.csv",
            "--num-gpu",
            "2",
            "--lr=(0.0,1.0,4)",
            "--bs=(1,2,2)",
        ])
        .unwrap();
        let Command::Grid(args) = cli.command else {
            panic!("expected grid");
        };
        assert_eq!(args.table.num_gpu, 2);
        assert_eq!(args.table.params, ["--lr=(0.0,1.0,4)", "--bs=(1,2,2)"]);
        let specs = args.table.specs().unwrap();
        assert_eq!(specs.names().collect::<Vec<_>>(), vec!["bs", "lr"]);
    }

    #[test]
    fn accepts_snake_case_aliases() {
        let cli = Cli::try_parse_from([
            "paramsearch",
            "uniform",
            "out.csv",
            "--num_sample",
            "5",
            "--seed_value",
            "42",
            "--gpu_prefix",
            "cuda:",
            "--x=(0,1)",
        ])
        .unwrap();
        let Command::Uniform(args) = cli.command else {
            panic!("expected uniform");
        };
        assert_eq!(args.num_sample, 5);
        assert_eq!(args.seed_value, Some(42));
        assert_eq!(args.table.gpu_prefix.as_deref(), Some("cuda:"));
        assert_eq!(args.table.num_gpu, 0);
    }

    #[test]
    fn negative_device_count_reaches_validation() {
        let cli = Cli::try_parse_from([
            "paramsearch",
            "grid",
            "out.csv",
            "--num-gpu",
            "-1",
            "--lr=(0,1,2)",
        ])
        .unwrap();
        let Command::Grid(args) = &cli.command else {
            panic!("expected grid");
        };
        assert_eq!(args.table.num_gpu, -1);
    }

    #[test]
    fn log_level_defaults_to_warn() {
        let cli = Cli::try_parse_from(["paramsearch", "normal", "out.csv", "--x=(0,1)"]).unwrap();
        assert_eq!(cli.log_level, Level::WARN);
    }
}
