use crate::core::Position;

/// Displacement from the anchor that counts as movement, in meters.
pub const MOVEMENT_THRESHOLD: f64 = 0.01;

/// Time without movement required before an object counts as settled, in seconds.
pub const SETTLE_WINDOW: f64 = 0.5;

/// Result of sampling a [`StillnessDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Motion {
    #[display("moving")]
    Moving,
    #[display("settled")]
    Settled,
}

/// Decides whether an object (the ball) has come to rest.
///
/// The detector remembers an anchor position and the time the object was
/// last seen moving. A sample more than [`MOVEMENT_THRESHOLD`] away from the
/// anchor moves the anchor and restarts the [`SETTLE_WINDOW`]; small jitter
/// around the anchor does not.
///
/// # Example
///
/// ```
/// use skillfit_engine::{Motion, Position, StillnessDetector};
///
/// let mut detector = StillnessDetector::new(Position::ORIGIN, 0.0);
/// assert_eq!(detector.sample(Position::on_ground(0.5, 0.0), 0.1), Motion::Moving);
/// assert_eq!(detector.sample(Position::on_ground(0.5, 0.0), 0.4), Motion::Moving);
/// assert_eq!(detector.sample(Position::on_ground(0.5, 0.0), 0.7), Motion::Settled);
/// ```
#[derive(Debug, Clone)]
pub struct StillnessDetector {
    anchor: Position,
    last_movement: f64,
}

impl StillnessDetector {
    /// Creates a detector anchored at `position`, treating `time` as the last movement.
    #[must_use]
    pub const fn new(position: Position, time: f64) -> Self {
        Self {
            anchor: position.ground(),
            last_movement: time,
        }
    }

    /// Re-anchors the detector for a new trial.
    pub const fn reset(&mut self, position: Position, time: f64) {
        *self = Self::new(position, time);
    }

    /// Feeds one observation and reports whether the object is still moving.
    pub fn sample(&mut self, position: Position, time: f64) -> Motion {
        let position = position.ground();
        if position.distance_to(self.anchor) > MOVEMENT_THRESHOLD {
            self.anchor = position;
            self.last_movement = time;
            return Motion::Moving;
        }
        if time - self.last_movement < SETTLE_WINDOW {
            Motion::Moving
        } else {
            Motion::Settled
        }
    }

    #[must_use]
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub const fn last_movement(&self) -> f64 {
        self.last_movement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.02;

    #[expect(clippy::cast_precision_loss)]
    fn tick(i: usize) -> f64 {
        i as f64 * DT
    }

    #[test]
    fn test_still_object_settles_after_window() {
        let ball = Position::on_ground(2.0, 0.0);
        let mut detector = StillnessDetector::new(ball, 0.0);
        let mut first_settled = None;
        for i in 1..60 {
            // sub-threshold jitter
            let jitter = if i % 2 == 0 { 0.003 } else { -0.003 };
            let sample = Position::on_ground(2.0 + jitter, 0.0);
            if detector.sample(sample, tick(i)).is_settled() && first_settled.is_none() {
                first_settled = Some(tick(i));
            }
        }
        let first_settled = first_settled.unwrap();
        assert!(first_settled >= SETTLE_WINDOW - 1e-9);
        assert!(first_settled < SETTLE_WINDOW + DT + 1e-9);
    }

    #[test]
    fn test_single_jump_resets_window() {
        let mut detector = StillnessDetector::new(Position::ORIGIN, 0.0);
        assert!(detector.sample(Position::ORIGIN, 0.6).is_settled());

        let moved = Position::on_ground(0.0, 0.02);
        assert!(detector.sample(moved, 0.62).is_moving());
        assert_eq!(detector.anchor(), moved);
        assert!(detector.sample(moved, 1.0).is_moving());
        assert!(detector.sample(moved, 1.2).is_settled());
    }

    #[test]
    fn test_height_changes_are_ignored() {
        let mut detector = StillnessDetector::new(Position::ORIGIN, 0.0);
        assert!(detector.sample(Position::new(0.0, 0.0, 0.5), 1.0).is_settled());
    }

    #[test]
    fn test_reset_forgets_previous_trial() {
        let mut detector = StillnessDetector::new(Position::ORIGIN, 0.0);
        assert!(detector.sample(Position::ORIGIN, 5.0).is_settled());
        detector.reset(Position::on_ground(1.0, 1.0), 10.0);
        assert!(detector.sample(Position::on_ground(1.0, 1.0), 10.1).is_moving());
        assert_eq!(detector.last_movement(), 10.0);
    }
}
