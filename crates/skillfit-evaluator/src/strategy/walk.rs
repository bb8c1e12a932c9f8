use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use skillfit_engine::{BeamRequest, Command, Pose, Position, Skill, Tolerance, WorldState};

use crate::{
    harness::Trial,
    waypoint::{RANDOM_TRIAL, WaypointContext, WaypointShape, next_waypoint},
};

use super::{TrialScore, TrialStrategy};

const TRIAL_COUNT: usize = 11;
const SETTLE_TIME: f64 = 1.0;

/// Trial length measured from the end of settling.
const TRIAL_LENGTH: f64 = 15.0;

/// Time after settling at which the zig-zag and arc courses stop walking.
const STAND_AFTER: f64 = 12.5;

/// A waypoint counts as reached within this ground distance.
const REACH_RADIUS: f64 = 0.2;

const FALL_COST: f64 = 5.0;
const FAILED_RESET_PENALTY: f64 = -100.0;

const TOLERANCE: Tolerance = Tolerance {
    position: 0.05,
    heading_deg: 5.0,
    ball: None,
};

/// Lateral gates of the forward arc.
const FORWARD_CURVE_START: f64 = -3.464;
const FORWARD_CURVE_END: f64 = 3.4;

/// Lateral gates of the backward arc.
const BACKWARD_CURVE_START: f64 = -2.838;
const BACKWARD_CURVE_END: f64 = -8.9;

/// Start positions, indexed by trial ordinal modulo five.
const STARTS: [(f64, f64); 5] = [(-8.0, -7.0), (-6.0, 0.0), (-1.0, 0.0), (-8.0, -7.0), (-12.0, 0.0)];
const RANDOM_TRIAL_START: (f64, f64) = (-10.0, 0.0);

/// Measures a gait by the distance walked along a course.
///
/// Each trial ordinal picks a [`WaypointShape`]. Distance is banked whenever
/// the agent reaches its waypoint (zig-zag and wander courses) or crosses a
/// gate (arc courses), measured from the previous banking point. A fall that
/// happens after the last banking point costs five meters.
#[derive(Debug, Clone)]
#[expect(clippy::struct_excessive_bools)]
pub struct WalkStrategy {
    rng: Pcg32,
    direction: f64,
    curve: bool,
    flip: bool,
    standing: bool,
    fell_since_banked: bool,
    anchor: Position,
    target: Option<Position>,
    last_flip_second: Option<i64>,
}

impl WalkStrategy {
    /// Creates a strategy whose random waypoints are drawn from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            direction: -1.0,
            curve: false,
            flip: true,
            standing: false,
            fell_since_banked: false,
            anchor: Position::ORIGIN,
            target: None,
            last_flip_second: None,
        }
    }

    /// Current zig-zag direction, `-1.0` or `1.0`.
    #[must_use]
    pub const fn direction(&self) -> f64 {
        self.direction
    }

    /// Last point at which distance was banked.
    #[must_use]
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    /// Waypoint computed on the most recent tick.
    #[must_use]
    pub const fn target(&self) -> Option<Position> {
        self.target
    }

    #[must_use]
    pub const fn is_standing(&self) -> bool {
        self.standing
    }

    fn waypoint(&mut self, shape: WaypointShape, position: Position) -> Position {
        let ctx = WaypointContext {
            shape,
            position,
            anchor: self.anchor,
            direction: self.direction,
            curve: self.curve,
            flip: self.flip,
            previous: self.target,
        };
        let waypoint = next_waypoint(&ctx, &mut self.rng);
        if waypoint.drew_random {
            self.flip = false;
        }
        self.target = Some(waypoint.target);
        waypoint.target
    }

    fn bank(&mut self, trial: &mut Trial, position: Position) {
        let walked = self.anchor.ground_distance_to(position);
        trial.add_distance(walked);
        self.anchor = position;
        tracing::debug!(
            trial = trial.index(),
            walked,
            total = trial.distance(),
            "distance banked"
        );
    }

    /// Re-arms the random redraw at the start of every even simulation second.
    #[expect(clippy::cast_possible_truncation)]
    fn flip_on_even_second(&mut self, trial: &Trial, time: f64) {
        let second = trial.elapsed(time).floor() as i64;
        if second % 2 == 0 && self.last_flip_second != Some(second) {
            self.flip = true;
            self.last_flip_second = Some(second);
        }
    }

    /// Waypoint-reach banking shared by the zig-zag and wander courses.
    fn bank_on_reach(
        &mut self,
        trial: &mut Trial,
        shape: WaypointShape,
        me: Position,
        target: Position,
    ) -> Position {
        if self.standing || me.ground_distance_to(target) > REACH_RADIUS {
            return target;
        }
        self.bank(trial, me);
        self.fell_since_banked = false;
        self.direction = -self.direction;
        self.waypoint(shape, me)
    }

    fn walk_arc(&mut self, trial: &mut Trial, shape: WaypointShape, me: Position, target: Position) {
        let (in_curve, past_curve) = if shape.is_forward_arc() {
            (
                (FORWARD_CURVE_START..FORWARD_CURVE_END).contains(&me.x),
                me.x >= FORWARD_CURVE_END,
            )
        } else {
            (
                me.x <= BACKWARD_CURVE_START && me.x > BACKWARD_CURVE_END,
                me.x <= BACKWARD_CURVE_END,
            )
        };
        if in_curve {
            self.bank(trial, me);
            self.curve = true;
        } else if past_curve && self.curve {
            self.bank(trial, me);
            self.curve = false;
        }
        if me.ground_distance_to(target) <= REACH_RADIUS {
            self.standing = true;
        }
    }
}

impl TrialStrategy for WalkStrategy {
    fn name(&self) -> &'static str {
        "walk"
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
        FAILED_RESET_PENALTY
    }

    fn trial_tag(&self, index: usize) -> &'static str {
        WaypointShape::for_trial(index).label()
    }

    fn beam_target(&self, index: usize) -> BeamRequest {
        let (x, y) = if index == RANDOM_TRIAL {
            RANDOM_TRIAL_START
        } else {
            STARTS[index % STARTS.len()]
        };
        BeamRequest::agent_only(Pose::on_ground(x, y, 0.0))
    }

    fn begin_play_message(&self) -> &'static str {
        "(playMode PlayOn) (ball (pos 0 -9 0) (vel 0 0 0))"
    }

    fn begin_trial(&mut self, trial: &Trial, _world: &WorldState) {
        self.direction = -1.0;
        self.curve = false;
        self.flip = true;
        self.standing = false;
        self.fell_since_banked = false;
        self.anchor = trial.target().agent.position.ground();
        self.target = None;
        self.last_flip_second = None;
    }

    fn execute(&mut self, trial: &mut Trial, world: &WorldState) -> Command {
        let me = world.agent_ground();
        let since_settle = trial.elapsed_since_settle(world.time, SETTLE_TIME);
        let index = trial.index();
        let shape = WaypointShape::for_trial(index);
        if world.fallen {
            self.fell_since_banked = true;
        }

        if shape.is_wander() {
            self.flip_on_even_second(trial, world.time);
        }
        let mut target = self.waypoint(shape, me);

        match index % 5 {
            _ if index == RANDOM_TRIAL => {}
            0 | 3 => {
                target = self.bank_on_reach(trial, shape, me, target);
                if since_settle >= STAND_AFTER {
                    self.standing = true;
                    self.fell_since_banked = false;
                }
            }
            1 | 2 => {
                self.walk_arc(trial, shape, me, target);
                if since_settle >= STAND_AFTER {
                    self.standing = true;
                }
            }
            _ => target = self.bank_on_reach(trial, shape, me, target),
        }

        if self.standing {
            Command::STAND
        } else {
            Command::Skill(Skill::WalkTo { target })
        }
    }

    fn is_complete(&self, trial: &Trial, world: &WorldState) -> bool {
        trial.elapsed_since_settle(world.time, SETTLE_TIME) >= TRIAL_LENGTH
    }

    fn score(&self, trial: &Trial, _world: &WorldState) -> TrialScore {
        let penalty = if self.fell_since_banked { FALL_COST } else { 0.0 };
        let score = trial.distance() - penalty;
        tracing::info!(
            trial = trial.index(),
            course = trial.tag(),
            distance = trial.distance(),
            fell = self.fell_since_banked,
            score,
            "walk measured"
        );
        TrialScore::measured(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(time: f64, x: f64, y: f64) -> WorldState {
        WorldState::new(time, Pose::on_ground(x, y, 0.0), Position::on_ground(0.0, -9.0))
    }

    fn executing_trial(walk: &mut WalkStrategy, index: usize) -> Trial {
        let beam = walk.beam_target(index);
        let mut trial = Trial::new(index, walk.trial_tag(index), beam, 0.0);
        let start = beam.agent.position;
        walk.begin_trial(&trial, &world(0.0, start.x, start.y));
        trial.start_execution(1.0);
        trial
    }

    #[test]
    fn test_start_positions() {
        let walk = WalkStrategy::new(0);
        let starts: Vec<_> = (0..11)
            .map(|i| {
                let p = walk.beam_target(i).agent.position;
                (p.x, p.y)
            })
            .collect();
        assert_eq!(starts[0], (-8.0, -7.0));
        assert_eq!(starts[2], (-1.0, 0.0));
        assert_eq!(starts[4], (-12.0, 0.0));
        assert_eq!(starts[6], (-6.0, 0.0));
        assert_eq!(starts[10], (-10.0, 0.0));
        assert_eq!(walk.trial_tag(7), "backward-arc");
    }

    #[test]
    fn test_reaching_waypoint_banks_and_flips() {
        let mut walk = WalkStrategy::new(0);
        let mut trial = executing_trial(&mut walk, 0);

        let command = walk.execute(&mut trial, &world(1.02, -8.0, -7.0));
        let first = Position::on_ground(-8.0 - 0.8 * 3.5, -7.0 + 3.5);
        assert_eq!(command, Command::Skill(Skill::WalkTo { target: first }));
        assert_eq!(trial.distance(), 0.0);

        // within 0.15 m of the waypoint
        let command = walk.execute(&mut trial, &world(6.0, -10.7, -3.5));
        let walked = (2.7_f64.powi(2) + 3.5_f64.powi(2)).sqrt();
        assert!((trial.distance() - walked).abs() < 1e-9);
        assert_eq!(walk.direction(), 1.0);
        assert_eq!(walk.anchor(), Position::on_ground(-10.7, -3.5));
        let Command::Skill(Skill::WalkTo { target }) = command else {
            panic!("expected walk_to, got {command:?}");
        };
        assert!((target.x - (-10.7 + 2.8)).abs() < 1e-9);
        assert!(target.y.abs() < 1e-9);
    }

    #[test]
    fn test_zig_zag_stands_late_and_forgives_falls() {
        let mut walk = WalkStrategy::new(0);
        let mut trial = executing_trial(&mut walk, 3);
        walk.execute(&mut trial, &world(5.0, -8.0, -6.0).with_fallen(true));
        let command = walk.execute(&mut trial, &world(13.6, -8.0, -6.0));
        assert_eq!(command, Command::STAND);
        assert!(walk.is_standing());
        assert!(!walk.is_complete(&trial, &world(13.6, -8.0, -6.0)));
        assert!(walk.is_complete(&trial, &world(16.0, -8.0, -6.0)));
        assert_eq!(
            walk.score(&trial, &world(16.0, -8.0, -6.0)),
            TrialScore::measured(0.0)
        );
    }

    #[test]
    fn test_forward_arc_banks_at_gates() {
        let mut walk = WalkStrategy::new(0);
        let mut trial = executing_trial(&mut walk, 1);
        // before the first gate nothing is banked
        walk.execute(&mut trial, &world(2.0, -5.0, 0.0));
        assert_eq!(trial.distance(), 0.0);

        walk.execute(&mut trial, &world(4.0, -3.0, 0.0));
        assert!((trial.distance() - 3.0).abs() < 1e-9);
        walk.execute(&mut trial, &world(6.0, 0.0, -2.0));
        walk.execute(&mut trial, &world(8.0, 3.5, 0.0));
        let expected = 3.0 + 13.0_f64.sqrt() + (3.5_f64.powi(2) + 4.0).sqrt();
        assert!((trial.distance() - expected).abs() < 1e-9);

        // past the gate with the curve cleared nothing more is banked
        walk.execute(&mut trial, &world(9.0, 5.0, 0.0));
        assert!((trial.distance() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fall_after_banking_costs_five() {
        let mut walk = WalkStrategy::new(0);
        let mut trial = executing_trial(&mut walk, 2);
        walk.execute(&mut trial, &world(3.0, -3.0, 0.0));
        walk.execute(&mut trial, &world(4.0, -3.0, 0.0).with_fallen(true));
        let score = walk.score(&trial, &world(16.0, -3.0, 0.0));
        assert!((score.score - (2.0 - 5.0)).abs() < 1e-9);
    }

    #[test]
    fn test_random_trial_only_counts_falls() {
        let mut walk = WalkStrategy::new(3);
        let mut trial = executing_trial(&mut walk, RANDOM_TRIAL);
        let first = walk.execute(&mut trial, &world(1.1, -10.0, 0.0));
        let Command::Skill(Skill::WalkTo { target }) = first else {
            panic!("expected walk_to, got {first:?}");
        };
        // standing on the waypoint banks nothing in this trial
        walk.execute(&mut trial, &world(1.2, target.x, target.y));
        assert_eq!(trial.distance(), 0.0);
        assert_eq!(walk.target(), Some(target));

        walk.execute(&mut trial, &world(5.0, 0.0, 0.0).with_fallen(true));
        assert_eq!(
            walk.score(&trial, &world(16.0, 0.0, 0.0)),
            TrialScore::measured(-5.0)
        );
    }
}
