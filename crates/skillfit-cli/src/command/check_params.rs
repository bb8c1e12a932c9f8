use std::path::PathBuf;

use anyhow::Context as _;
use skillfit_evaluator::strategy::{KickStrategy, StandStrategy, TrialStrategy, WalkStrategy};

use crate::{
    command::Variant,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CheckParamsArg {
    /// Skill variant the parameters are for
    #[arg(long, value_enum)]
    variant: Variant,
    /// Named parameters file (`key value` per line)
    #[arg(long)]
    params: PathBuf,
}

pub(crate) fn run(arg: &CheckParamsArg) -> anyhow::Result<()> {
    let params = util::read_params_file(&arg.params)?;
    let beam = match arg.variant {
        Variant::Kick => KickStrategy::from_params(&params)
            .context("Invalid kick parameters")?
            .beam_target(0),
        Variant::Walk => WalkStrategy::new(0).beam_target(0),
        Variant::Stand => StandStrategy::new().beam_target(0),
    };
    eprintln!(
        "{} parameters OK ({} keys) from {}",
        arg.variant,
        params.len(),
        arg.params.display()
    );
    Output::save_json(&beam, None)
}
