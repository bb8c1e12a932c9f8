use skillfit_engine::{
    BeamRequest, Command, Motion, Pose, Position, Skill, StillnessDetector, Tolerance, WorldState,
};

use crate::{
    config::{ConfigError, NamedParams},
    harness::Trial,
};

use super::{TrialOutcome, TrialScore, TrialStrategy};

const TRIAL_COUNT: usize = 10;
const SETTLE_TIME: f64 = 3.0;

/// Minimum time between the end of settling and measurement.
const MEASURE_AFTER: f64 = 15.0;

/// Ball x below which the kick counts as backward.
const BACKWARD_LIMIT: f64 = -0.25;

/// Ball x at or below which the kick counts as a failure.
const MIN_DISTANCE: f64 = 0.1;

const FALL_PENALTY: f64 = -1.0;
const FAILED_KICK_PENALTY: f64 = -100.0;

const TOLERANCE: Tolerance = Tolerance {
    position: 0.1,
    heading_deg: 3.0,
    ball: Some(0.1),
};

/// Beam placement of the kicker relative to the ball at the field origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickOffsets {
    pub x: f64,
    pub y: f64,
    pub angle_deg: f64,
}

impl KickOffsets {
    pub const X_KEY: &'static str = "kick_xoffset";
    pub const Y_KEY: &'static str = "kick_yoffset";
    pub const ANGLE_KEY: &'static str = "kick_angle";

    pub fn from_params(params: &NamedParams) -> Result<Self, ConfigError> {
        Ok(Self {
            x: params.require_f64(Self::X_KEY)?,
            y: params.require_f64(Self::Y_KEY)?,
            angle_deg: params.require_f64(Self::ANGLE_KEY)?,
        })
    }
}

/// Measures a fixed kick: how far forward the ball rolls.
///
/// The ball is beamed to the origin and the kicker next to it. Once the beam
/// checks out the kick is issued exactly once; the trial ends when the ball
/// has come to rest and 15 seconds have passed, or immediately when the
/// kicker falls.
#[derive(Debug, Clone)]
pub struct KickStrategy {
    offsets: KickOffsets,
    kicked: bool,
    stillness: StillnessDetector,
    motion: Motion,
}

impl KickStrategy {
    /// Builds the strategy from the candidate's named parameters.
    ///
    /// ```
    /// use skillfit_evaluator::{config::NamedParams, strategy::KickStrategy};
    ///
    /// let params: NamedParams = [("kick_xoffset", "-0.2"), ("kick_yoffset", "0.05")]
    ///     .into_iter()
    ///     .collect();
    /// assert!(KickStrategy::from_params(&params).is_err());
    /// ```
    pub fn from_params(params: &NamedParams) -> Result<Self, ConfigError> {
        KickOffsets::from_params(params).map(Self::new)
    }

    #[must_use]
    pub const fn new(offsets: KickOffsets) -> Self {
        Self {
            offsets,
            kicked: false,
            stillness: StillnessDetector::new(Position::ORIGIN, 0.0),
            motion: Motion::Moving,
        }
    }

    #[must_use]
    pub const fn offsets(&self) -> &KickOffsets {
        &self.offsets
    }
}

impl TrialStrategy for KickStrategy {
    fn name(&self) -> &'static str {
        "kick"
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
        FAILED_KICK_PENALTY
    }

    fn trial_tag(&self, _index: usize) -> &'static str {
        "kick"
    }

    fn beam_target(&self, _index: usize) -> BeamRequest {
        let KickOffsets { x, y, angle_deg } = self.offsets;
        BeamRequest::with_ball(Pose::on_ground(x, y, angle_deg), Position::ORIGIN)
    }

    fn begin_play_message(&self) -> &'static str {
        "(playMode KickOff_Left)"
    }

    fn begin_trial(&mut self, _trial: &Trial, _world: &WorldState) {
        self.kicked = false;
        self.motion = Motion::Moving;
    }

    fn execute(&mut self, trial: &mut Trial, world: &WorldState) -> Command {
        if !self.kicked {
            // play-on before the kick means the ball was already touched
            if world.play_mode.is_play_on() {
                trial.flags_mut().contact = true;
            }
            self.kicked = true;
            self.stillness.reset(world.ball, world.time);
            self.motion = Motion::Moving;
            return Command::Skill(Skill::KickLeftLeg);
        }

        if world.ball.x < BACKWARD_LIMIT {
            trial.flags_mut().backward = true;
        }
        self.motion = self.stillness.sample(world.ball, world.time);
        Command::STAND
    }

    fn is_complete(&self, trial: &Trial, world: &WorldState) -> bool {
        if trial.flags().fell {
            return true;
        }
        self.kicked
            && self.motion.is_settled()
            && trial.elapsed_since_settle(world.time, SETTLE_TIME) >= MEASURE_AFTER
    }

    fn score(&self, trial: &Trial, world: &WorldState) -> TrialScore {
        let flags = trial.flags();
        if flags.fell {
            return TrialScore::penalty(FALL_PENALTY, TrialOutcome::Fell);
        }

        let distance = world.ball.x;
        tracing::info!(
            trial = trial.index(),
            distance,
            final_x = world.ball.x,
            final_y = world.ball.y,
            angle_offset = world.ball.bearing_deg().abs(),
            "kick measured"
        );
        if flags.backward {
            TrialScore::penalty(FAILED_KICK_PENALTY, TrialOutcome::Backward)
        } else if flags.contact {
            TrialScore::penalty(FAILED_KICK_PENALTY, TrialOutcome::Contact)
        } else if distance <= MIN_DISTANCE {
            TrialScore::penalty(FAILED_KICK_PENALTY, TrialOutcome::InsufficientDistance)
        } else {
            TrialScore::measured(distance)
        }
    }
}

#[cfg(test)]
mod tests {
    use skillfit_engine::PlayMode;

    use super::*;

    fn strategy() -> KickStrategy {
        KickStrategy::new(KickOffsets {
            x: -0.2,
            y: 0.0,
            angle_deg: 0.0,
        })
    }

    fn world(time: f64, ball: Position) -> WorldState {
        WorldState::new(time, Pose::on_ground(-0.2, 0.0, 0.0), ball)
            .with_play_mode(PlayMode::KickOffLeft)
    }

    fn executing_trial(kick: &mut KickStrategy) -> Trial {
        let beam = kick.beam_target(0);
        let mut trial = Trial::new(0, "kick", beam, 0.0);
        kick.begin_trial(&trial, &world(0.0, Position::ORIGIN));
        trial.start_execution(3.0);
        trial
    }

    #[test]
    fn test_offsets_from_params() {
        let params: NamedParams = [
            ("kick_xoffset", "-0.18"),
            ("kick_yoffset", "0.04"),
            ("kick_angle", "2"),
        ]
        .into_iter()
        .collect();
        let kick = KickStrategy::from_params(&params).unwrap();
        let beam = kick.beam_target(3);
        assert_eq!(beam.agent, Pose::on_ground(-0.18, 0.04, 2.0));
        assert_eq!(beam.ball, Some(Position::ORIGIN));
    }

    #[test]
    fn test_unparseable_offset_is_config_error() {
        let params: NamedParams = [
            ("kick_xoffset", "-0.18"),
            ("kick_yoffset", "left"),
            ("kick_angle", "2"),
        ]
        .into_iter()
        .collect();
        let err = KickStrategy::from_params(&params).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { ref key, .. } if key == "kick_yoffset"));
    }

    #[test]
    fn test_kick_is_issued_once() {
        let mut kick = strategy();
        let mut trial = executing_trial(&mut kick);
        let first = kick.execute(&mut trial, &world(3.02, Position::ORIGIN));
        assert_eq!(first, Command::Skill(Skill::KickLeftLeg));
        let second = kick.execute(&mut trial, &world(3.04, Position::ORIGIN));
        assert_eq!(second, Command::STAND);
        assert!(!trial.flags().contact);
    }

    #[test]
    fn test_play_on_before_kick_sets_contact() {
        let mut kick = strategy();
        let mut trial = executing_trial(&mut kick);
        let touched = world(3.02, Position::ORIGIN).with_play_mode(PlayMode::PlayOn);
        kick.execute(&mut trial, &touched);
        assert!(trial.flags().contact);
    }

    #[test]
    fn test_waits_for_measurement_window() {
        let mut kick = strategy();
        let mut trial = executing_trial(&mut kick);
        kick.execute(&mut trial, &world(3.02, Position::ORIGIN));
        // the ball stops early but the window has not elapsed
        let resting = Position::on_ground(2.0, 0.1);
        kick.execute(&mut trial, &world(3.1, resting));
        kick.execute(&mut trial, &world(10.0, resting));
        assert!(!kick.is_complete(&trial, &world(10.0, resting)));
        kick.execute(&mut trial, &world(18.0, resting));
        assert!(kick.is_complete(&trial, &world(18.0, resting)));
        assert_eq!(
            kick.score(&trial, &world(18.0, resting)),
            TrialScore::measured(2.0)
        );
    }

    #[test]
    fn test_backward_and_short_kicks_are_penalized() {
        let mut kick = strategy();
        let mut trial = executing_trial(&mut kick);
        kick.execute(&mut trial, &world(3.02, Position::ORIGIN));
        let behind = Position::on_ground(-0.5, 0.0);
        kick.execute(&mut trial, &world(4.0, behind));
        assert!(trial.flags().backward);
        let score = kick.score(&trial, &world(19.0, behind));
        assert_eq!(score.score, -100.0);
        assert!(score.outcome.is_backward());

        let mut kick = strategy();
        let mut trial = executing_trial(&mut kick);
        kick.execute(&mut trial, &world(3.02, Position::ORIGIN));
        let dribble = Position::on_ground(0.08, 0.0);
        kick.execute(&mut trial, &world(4.0, dribble));
        let score = kick.score(&trial, &world(19.0, dribble));
        assert!(score.outcome.is_insufficient_distance());
    }

    #[test]
    fn test_fall_ends_trial_with_small_penalty() {
        let mut kick = strategy();
        let mut trial = executing_trial(&mut kick);
        kick.execute(&mut trial, &world(3.02, Position::ORIGIN));
        trial.flags_mut().fell = true;
        let now = world(4.0, Position::on_ground(1.0, 0.0));
        assert!(kick.is_complete(&trial, &now));
        assert_eq!(
            kick.score(&trial, &now),
            TrialScore::penalty(-1.0, TrialOutcome::Fell)
        );
    }
}
