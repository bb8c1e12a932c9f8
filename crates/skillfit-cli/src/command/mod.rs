use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use self::{check_params::CheckParamsArg, run::RunArg};

mod check_params;
mod run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter (trace, debug, info, warn, error, or a full filter directive)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evaluate a skill by driving the harness from a stream of world states
    Run(#[clap(flatten)] RunArg),
    /// Validate a named parameters file and print the first beam target
    CheckParams(#[clap(flatten)] CheckParamsArg),
}

/// Skill variant to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, derive_more::Display)]
pub(crate) enum Variant {
    #[display("kick")]
    Kick,
    #[display("walk")]
    Walk,
    #[display("stand")]
    Stand,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(&args.log_level)?;
    match args.mode {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::CheckParams(arg) => check_params::run(&arg)?,
    }
    Ok(())
}

/// Installs the stderr subscriber. Stdout is reserved for the command stream.
fn init_logging(filter: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter).with_context(|| format!("Invalid log filter: {filter}"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_args() {
        let args = CommandArgs::try_parse_from([
            "skillfit",
            "run",
            "--variant",
            "walk",
            "--output",
            "fitness.txt",
            "--seed",
            "7",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.log_level, "debug");
        assert!(matches!(args.mode, Mode::Run(_)));
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let result = CommandArgs::try_parse_from([
            "skillfit",
            "check-params",
            "--variant",
            "dribble",
            "--params",
            "p.txt",
        ]);
        assert!(result.is_err());
    }
}
