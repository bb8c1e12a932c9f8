use std::{io::BufRead as _, path::PathBuf};

use anyhow::{Context as _, bail};
use rand::Rng as _;
use skillfit_engine::WorldState;
use skillfit_evaluator::{
    EvaluationHarness,
    config::NamedParams,
    strategy::{KickStrategy, StandStrategy, TrialStrategy, WalkStrategy},
};
use skillfit_fitness::FileSink;

use crate::{
    command::Variant,
    schema::report::RunReport,
    util::{self, Input, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Skill variant to evaluate
    #[arg(long, value_enum)]
    variant: Variant,
    /// Fitness output file, written once after the last trial
    #[arg(long)]
    output: PathBuf,
    /// Named parameters file (`key value` per line)
    #[arg(long)]
    params: Option<PathBuf>,
    /// World states, one JSON object per line (stdin if omitted)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Where to write commands, one JSON object per line (stdout if omitted)
    #[arg(long)]
    commands: Option<PathBuf>,
    /// Write a JSON run report to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Seed for the random walk waypoints
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let params = arg
        .params
        .as_deref()
        .map(util::read_params_file)
        .transpose()?;

    match arg.variant {
        Variant::Kick => {
            let params = params.context("The kick variant needs --params")?;
            let strategy =
                KickStrategy::from_params(&params).context("Invalid kick parameters")?;
            drive(arg, strategy)
        }
        Variant::Walk => {
            warn_unused(params.as_ref(), arg.variant);
            let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
            tracing::info!(seed, "walk waypoint seed");
            drive(arg, WalkStrategy::new(seed))
        }
        Variant::Stand => {
            warn_unused(params.as_ref(), arg.variant);
            drive(arg, StandStrategy::new())
        }
    }
}

fn warn_unused(params: Option<&NamedParams>, variant: Variant) {
    if let Some(params) = params.filter(|p| !p.is_empty()) {
        tracing::warn!(%variant, keys = params.len(), "named parameters are not used by this variant");
    }
}

fn drive<S>(arg: &RunArg, strategy: S) -> anyhow::Result<()>
where
    S: TrialStrategy,
{
    let input = Input::from_input_path(arg.input.clone())?;
    let source = input.display_path();
    let mut commands = Output::from_output_path(arg.commands.clone())?;
    let mut harness = EvaluationHarness::new(strategy, FileSink::new(arg.output.clone()));

    for (line_index, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read world state from {source}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let world: WorldState = serde_json::from_str(&line).with_context(|| {
            format!("Invalid world state at {source} line {}", line_index + 1)
        })?;
        let command = harness.tick(&world);
        commands.write_json_line(&command)?;
    }

    if let Some(path) = &arg.report {
        let report = RunReport::from_harness(arg.variant.to_string(), &harness);
        Output::save_json(&report, Some(path.clone()))?;
    }

    if let Some(err) = harness.persist_error() {
        bail!("Failed to persist fitness to {}: {err}", arg.output.display());
    }
    if !harness.is_finished() {
        let fitness = harness.fitness();
        bail!(
            "Input ended after {} of {} trials; no fitness was written",
            fitness.completed(),
            fitness.total()
        );
    }
    Ok(())
}
