use skillfit_engine::{BeamRequest, Command, Pose, Skill, Tolerance, WorldState};

use crate::harness::Trial;

use super::{TrialOutcome, TrialScore, TrialStrategy};

const TRIAL_COUNT: usize = 10;
const SETTLE_TIME: f64 = 2.0;

/// Seconds after the fall onset by which the agent must be up again.
const RECOVERY_DEADLINE: f64 = 10.0;

/// Seconds after execution starts within which the forced fall must happen.
const FALL_TIMEOUT: f64 = 3.0;

const FAILED_RECOVERY_PENALTY: f64 = -10.0;

const TOLERANCE: Tolerance = Tolerance {
    position: 0.1,
    heading_deg: 5.0,
    ball: None,
};

/// Measures how long a get-up takes.
///
/// Each trial knocks the agent over with the recovery-down skill, then lets
/// the stand skill bring it back up. The score is the time from the first
/// fallen tick to the first tick the agent is no longer fallen.
#[derive(Debug, Clone, Default)]
pub struct StandStrategy {
    fall_onset: Option<f64>,
    recovered_at: Option<f64>,
}

impl StandStrategy {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fall_onset: None,
            recovered_at: None,
        }
    }

    #[must_use]
    pub const fn fall_onset(&self) -> Option<f64> {
        self.fall_onset
    }

    /// Seconds the agent stayed down, once it is back up.
    #[must_use]
    pub fn recovery_time(&self) -> Option<f64> {
        Some(self.recovered_at? - self.fall_onset?)
    }
}

impl TrialStrategy for StandStrategy {
    fn name(&self) -> &'static str {
        "stand"
    }

    fn trial_count(&self) -> usize {
        TRIAL_COUNT
    }

    fn settle_time(&self) -> f64 {
        SETTLE_TIME
    }

    fn tolerance(&self) -> Tolerance {
        TOLERANCE
    }

    fn verification_penalty(&self) -> f64 {
        FAILED_RECOVERY_PENALTY
    }

    fn trial_tag(&self, _index: usize) -> &'static str {
        "get-up"
    }

    fn beam_target(&self, _index: usize) -> BeamRequest {
        BeamRequest::agent_only(Pose::on_ground(-5.0, 0.0, 0.0))
    }

    fn begin_play_message(&self) -> &'static str {
        "(playMode PlayOn)"
    }

    fn begin_trial(&mut self, _trial: &Trial, _world: &WorldState) {
        self.fall_onset = None;
        self.recovered_at = None;
    }

    fn execute(&mut self, trial: &mut Trial, world: &WorldState) -> Command {
        let Some(onset) = self.fall_onset else {
            if world.fallen {
                tracing::debug!(trial = trial.index(), time = world.time, "fall onset");
                self.fall_onset = Some(world.time);
                return Command::STAND;
            }
            return Command::Skill(Skill::RecoveryDown);
        };

        if self.recovered_at.is_none() && !world.fallen {
            self.recovered_at = Some(world.time);
            trial.set_duration(world.time - onset);
        }
        Command::STAND
    }

    fn is_complete(&self, trial: &Trial, world: &WorldState) -> bool {
        match self.fall_onset {
            Some(onset) => self.recovered_at.is_some() || world.time >= onset + RECOVERY_DEADLINE,
            None => trial
                .execution_start()
                .is_some_and(|start| world.time - start >= FALL_TIMEOUT),
        }
    }

    fn score(&self, trial: &Trial, _world: &WorldState) -> TrialScore {
        let score = match (self.fall_onset, self.recovery_time()) {
            (Some(_), Some(recovery)) => TrialScore::measured(recovery),
            (Some(_), None) => {
                TrialScore::penalty(FAILED_RECOVERY_PENALTY, TrialOutcome::StillFallen)
            }
            (None, _) => TrialScore::penalty(FAILED_RECOVERY_PENALTY, TrialOutcome::NeverFell),
        };
        tracing::info!(
            trial = trial.index(),
            score = score.score,
            outcome = %score.outcome,
            "get-up measured"
        );
        score
    }
}
