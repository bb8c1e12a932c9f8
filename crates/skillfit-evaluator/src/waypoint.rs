//! Target selection for the locomotion trials.
//!
//! Locomotion runs cycle through five course shapes chosen by the trial
//! ordinal modulo five, plus one extra random-retargeting trial at ordinal
//! [`RANDOM_TRIAL`]:
//!
//! ```text
//! 0  Straight     zig-zag between two lateral offsets ahead of the anchor
//! 1  ForwardArc   parabola through the center circle, walked toward +x
//! 2  BackwardArc  mirrored parabola, walked toward -x
//! 3  Diagonal     wider zig-zag
//! 4  Wander       hold the previous target, re-draw at random while `flip` is set
//! 10 Wander       (always, regardless of the ordinal)
//! ```
//!
//! [`next_waypoint`] is a pure function of the context it is handed; the
//! only state it touches is the caller's random generator.

use rand::Rng;
use skillfit_engine::Position;

/// Nominal length of one straight course segment, in meters.
pub const STRIDE: f64 = 3.5;

/// Trial ordinal that always uses the random/repeat rule.
pub const RANDOM_TRIAL: usize = 10;

/// Field length and width in meters.
pub const FIELD_X: f64 = 30.0;
pub const FIELD_Y: f64 = 20.0;

/// Number of integer x values a random target can take (`1.5 × FIELD_X`).
const RANDOM_SPAN_X: i32 = 45;
/// Number of integer y values a random target can take (`1.5 × FIELD_Y`).
const RANDOM_SPAN_Y: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum WaypointShape {
    Straight,
    ForwardArc,
    BackwardArc,
    Diagonal,
    Wander,
}

impl WaypointShape {
    /// Shape used by the trial with the given ordinal.
    #[must_use]
    pub const fn for_trial(index: usize) -> Self {
        if index == RANDOM_TRIAL {
            return Self::Wander;
        }
        match index % 5 {
            0 => Self::Straight,
            1 => Self::ForwardArc,
            2 => Self::BackwardArc,
            3 => Self::Diagonal,
            _ => Self::Wander,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::ForwardArc => "forward-arc",
            Self::BackwardArc => "backward-arc",
            Self::Diagonal => "diagonal",
            Self::Wander => "wander",
        }
    }
}

/// Everything [`next_waypoint`] looks at.
#[derive(Debug, Clone, Copy)]
pub struct WaypointContext {
    pub shape: WaypointShape,
    /// Current agent position.
    pub position: Position,
    /// Last accumulation point.
    pub anchor: Position,
    /// `-1.0` or `1.0`, flipped every time a zig-zag waypoint is reached.
    pub direction: f64,
    /// Whether the agent is inside the curved section of an arc course.
    pub curve: bool,
    /// Whether a wander target should be re-drawn.
    pub flip: bool,
    /// Target returned by the previous call, if any.
    pub previous: Option<Position>,
}

/// A target plus whether it was freshly drawn at random.
///
/// Callers clear their `flip` flag when `drew_random` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub target: Position,
    pub drew_random: bool,
}

impl Waypoint {
    const fn fixed(target: Position) -> Self {
        Self {
            target,
            drew_random: false,
        }
    }
}

/// Computes the target the agent should walk toward this tick.
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use skillfit_engine::Position;
/// use skillfit_evaluator::waypoint::{WaypointContext, WaypointShape, next_waypoint};
///
/// let ctx = WaypointContext {
///     shape: WaypointShape::Straight,
///     position: Position::on_ground(-8.0, -7.0),
///     anchor: Position::on_ground(-8.0, -7.0),
///     direction: -1.0,
///     curve: false,
///     flip: false,
///     previous: None,
/// };
/// let waypoint = next_waypoint(&ctx, &mut Pcg32::seed_from_u64(0));
/// assert_eq!(waypoint.target, Position::on_ground(-8.0 - 0.8 * 3.5, -7.0 + 3.5));
/// ```
pub fn next_waypoint<R>(ctx: &WaypointContext, rng: &mut R) -> Waypoint
where
    R: Rng + ?Sized,
{
    let WaypointContext {
        position: me,
        anchor,
        direction,
        ..
    } = *ctx;
    match ctx.shape {
        WaypointShape::Straight => Waypoint::fixed(Position::on_ground(
            anchor.x + direction * 0.8 * STRIDE,
            anchor.y + STRIDE,
        )),
        WaypointShape::ForwardArc => {
            if ctx.curve {
                let x = me.x + 1.5;
                Waypoint::fixed(Position::on_ground(x, 0.2 * x * x - 2.0))
            } else {
                Waypoint::fixed(Position::on_ground(12.0, anchor.y))
            }
        }
        WaypointShape::BackwardArc => {
            if ctx.curve {
                let x = me.x - 1.5;
                let shifted = x + 6.0;
                Waypoint::fixed(Position::on_ground(x, -(0.2 * shifted * shifted - 2.0)))
            } else {
                Waypoint::fixed(Position::on_ground(-15.0, 0.0))
            }
        }
        WaypointShape::Diagonal => Waypoint::fixed(Position::on_ground(
            anchor.x + direction * STRIDE * 1.5,
            anchor.y + STRIDE,
        )),
        WaypointShape::Wander => match ctx.previous {
            Some(previous) if !ctx.flip => Waypoint::fixed(previous),
            _ => Waypoint {
                target: random_field_point(rng),
                drew_random: true,
            },
        },
    }
}

/// Uniform integer point in the inflated field box `[-30, 14] × [-20, 9]`.
fn random_field_point<R>(rng: &mut R) -> Position
where
    R: Rng + ?Sized,
{
    let x = f64::from(rng.random_range(0..RANDOM_SPAN_X)) - FIELD_X;
    let y = f64::from(rng.random_range(0..RANDOM_SPAN_Y)) - FIELD_Y;
    Position::on_ground(x, y)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn context(shape: WaypointShape) -> WaypointContext {
        WaypointContext {
            shape,
            position: Position::on_ground(-1.0, 0.0),
            anchor: Position::on_ground(-1.0, 0.0),
            direction: -1.0,
            curve: false,
            flip: false,
            previous: None,
        }
    }

    #[test]
    fn test_shapes_cycle_by_ordinal() {
        let shapes: Vec<_> = (0..11).map(WaypointShape::for_trial).collect();
        assert_eq!(shapes[0], WaypointShape::Straight);
        assert_eq!(shapes[5], WaypointShape::Straight);
        assert_eq!(shapes[6], WaypointShape::ForwardArc);
        assert_eq!(shapes[7], WaypointShape::BackwardArc);
        assert_eq!(shapes[8], WaypointShape::Diagonal);
        assert_eq!(shapes[9], WaypointShape::Wander);
        assert_eq!(shapes[10], WaypointShape::Wander);
    }

    #[test]
    fn test_direction_mirrors_straight_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        let left = next_waypoint(&context(WaypointShape::Straight), &mut rng);
        let right = next_waypoint(
            &WaypointContext {
                direction: 1.0,
                ..context(WaypointShape::Straight)
            },
            &mut rng,
        );
        assert!((left.target.x - (-1.0 - 2.8)).abs() < 1e-12);
        assert!((right.target.x - (-1.0 + 2.8)).abs() < 1e-12);
        assert_eq!(left.target.y, 3.5);
        assert_eq!(right.target.y, 3.5);
    }

    #[test]
    fn test_forward_arc_follows_parabola_in_curve() {
        let mut rng = Pcg32::seed_from_u64(1);
        let straight = next_waypoint(&context(WaypointShape::ForwardArc), &mut rng);
        assert_eq!(straight.target, Position::on_ground(12.0, 0.0));

        let curved = next_waypoint(
            &WaypointContext {
                curve: true,
                position: Position::on_ground(0.5, -1.9),
                ..context(WaypointShape::ForwardArc)
            },
            &mut rng,
        );
        assert!((curved.target.x - 2.0).abs() < 1e-12);
        assert!((curved.target.y - (0.2 * 4.0 - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_backward_arc_mirrors_forward_arc() {
        let mut rng = Pcg32::seed_from_u64(1);
        let straight = next_waypoint(&context(WaypointShape::BackwardArc), &mut rng);
        assert_eq!(straight.target, Position::on_ground(-15.0, 0.0));

        let curved = next_waypoint(
            &WaypointContext {
                curve: true,
                position: Position::on_ground(-4.5, 0.0),
                ..context(WaypointShape::BackwardArc)
            },
            &mut rng,
        );
        assert!((curved.target.x + 6.0).abs() < 1e-12);
        assert!((curved.target.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wander_repeats_until_flip() {
        let mut rng = Pcg32::seed_from_u64(7);
        let first = next_waypoint(&context(WaypointShape::Wander), &mut rng);
        assert!(first.drew_random);

        let held = next_waypoint(
            &WaypointContext {
                previous: Some(first.target),
                ..context(WaypointShape::Wander)
            },
            &mut rng,
        );
        assert!(!held.drew_random);
        assert_eq!(held.target, first.target);

        let redrawn = next_waypoint(
            &WaypointContext {
                previous: Some(first.target),
                flip: true,
                ..context(WaypointShape::Wander)
            },
            &mut rng,
        );
        assert!(redrawn.drew_random);
    }

    #[test]
    fn test_random_points_stay_in_inflated_box() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..1000 {
            let p = random_field_point(&mut rng);
            assert!((-30.0..=14.0).contains(&p.x), "{p:?}");
            assert!((-20.0..=9.0).contains(&p.y), "{p:?}");
            assert_eq!(p.x.fract(), 0.0);
            assert_eq!(p.y.fract(), 0.0);
        }
    }
}
