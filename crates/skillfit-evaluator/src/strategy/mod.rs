//! Per-skill evaluation strategies.
//!
//! The [`EvaluationHarness`](crate::harness::EvaluationHarness) owns the
//! episode flow (beam, settle, verify, execute, measure). A
//! [`TrialStrategy`] fills in what differs between skills:
//!
//! | Strategy | Skill under test | Trials | Score |
//! |---|---|---|---|
//! | [`KickStrategy`] | `kick_left_leg` | 10 | forward ball displacement |
//! | [`WalkStrategy`] | `walk_to` | 11 | distance walked along the course |
//! | [`StandStrategy`] | get-up after `recovery_down` | 10 | seconds to recover |
//!
//! Strategies keep whatever per-trial state they need (the kick's
//! stillness detector, the walk's anchor and direction) and reset it in
//! [`TrialStrategy::begin_trial`].

use skillfit_engine::{BeamRequest, Command, Tolerance, WorldState};

use crate::harness::Trial;

pub use self::{kick::*, stand::*, walk::*};

mod kick;
mod stand;
mod walk;

/// Why a trial received its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum TrialOutcome {
    /// Scored from the measurement itself.
    #[display("measured")]
    Measured,
    /// The agent fell and the strategy penalizes falls.
    #[display("fell")]
    Fell,
    /// The ball ended up behind the kicker.
    #[display("backward")]
    Backward,
    /// The ball did not travel far enough.
    #[display("insufficient distance")]
    InsufficientDistance,
    /// The agent ran into the ball before kicking.
    #[display("contact before execution")]
    Contact,
    /// The beam failed verification twice in a row.
    #[display("reset verification failed")]
    VerificationFailed,
    /// The agent was still down at the measurement deadline.
    #[display("still fallen")]
    StillFallen,
    /// The forced fall never happened.
    #[display("never fell")]
    NeverFell,
}

/// Score of one completed trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialScore {
    pub score: f64,
    pub outcome: TrialOutcome,
}

impl TrialScore {
    #[must_use]
    pub const fn measured(score: f64) -> Self {
        Self {
            score,
            outcome: TrialOutcome::Measured,
        }
    }

    #[must_use]
    pub const fn penalty(score: f64, outcome: TrialOutcome) -> Self {
        Self { score, outcome }
    }
}

/// Skill-specific parts of an evaluation run.
///
/// Called by the harness in this order for each trial: [`beam_target`] on
/// Idle entry, [`begin_trial`] right after, then on every Executing tick
/// [`execute`] followed by [`is_complete`], and [`score`] once completion
/// holds.
///
/// [`beam_target`]: TrialStrategy::beam_target
/// [`begin_trial`]: TrialStrategy::begin_trial
/// [`execute`]: TrialStrategy::execute
/// [`is_complete`]: TrialStrategy::is_complete
/// [`score`]: TrialStrategy::score
pub trait TrialStrategy {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Number of trials in a run.
    fn trial_count(&self) -> usize;

    /// Seconds to wait after a beam before verifying it.
    fn settle_time(&self) -> f64;

    fn tolerance(&self) -> Tolerance;

    /// Score given to a trial whose beam fails verification twice.
    fn verification_penalty(&self) -> f64;

    /// Label of the trial with the given ordinal.
    fn trial_tag(&self, index: usize) -> &'static str;

    fn beam_target(&self, index: usize) -> BeamRequest;

    /// Environment message sent once the beam is verified.
    fn begin_play_message(&self) -> &'static str;

    /// Resets per-trial state.
    fn begin_trial(&mut self, trial: &Trial, world: &WorldState);

    /// Issues this tick's command and latches strategy-specific flags.
    ///
    /// The harness has already sampled the fall detector for this tick, so
    /// `trial.flags().fell` is current.
    fn execute(&mut self, trial: &mut Trial, world: &WorldState) -> Command;

    fn is_complete(&self, trial: &Trial, world: &WorldState) -> bool;

    fn score(&self, trial: &Trial, world: &WorldState) -> TrialScore;
}
