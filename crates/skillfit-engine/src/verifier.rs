//! Post-beam pose verification.
//!
//! After a beam the simulator may leave the agent (or the ball) slightly off
//! the commanded pose. [`ResetVerifier`] measures how far off and decides
//! whether the trial can start. It is a pure predicate: each call measures
//! the observation it is given, and any retry policy belongs to the caller.

use crate::core::{BeamRequest, Pose, Position, heading_error_deg};

/// Maximum deviations accepted by a [`ResetVerifier`]. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Ground-plane position error in meters.
    pub position: f64,
    /// Heading error in degrees.
    pub heading_deg: f64,
    /// Ground-plane ball position error in meters, when the ball is part of the reset.
    pub ball: Option<f64>,
}

/// Deviations measured by one verification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub position_error: f64,
    pub heading_error: f64,
    pub ball_error: Option<f64>,
    pub passed: bool,
}

impl Verification {
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResetVerifier {
    tolerance: Tolerance,
}

impl ResetVerifier {
    #[must_use]
    pub const fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    #[must_use]
    pub const fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Compares observed ground truth against the beam request.
    ///
    /// The ball is only checked when both the tolerance and the request mention it.
    ///
    /// ```
    /// use skillfit_engine::{BeamRequest, Pose, Position, ResetVerifier, Tolerance};
    ///
    /// let verifier = ResetVerifier::new(Tolerance { position: 0.1, heading_deg: 3.0, ball: None });
    /// let desired = BeamRequest::agent_only(Pose::on_ground(0.0, 0.0, 0.0));
    ///
    /// let close = Pose::on_ground(0.05, 0.0, 2.0);
    /// assert!(verifier.verify(&desired, &close, Position::ORIGIN).passed());
    ///
    /// let far = Pose::on_ground(0.2, 0.0, 0.0);
    /// assert!(!verifier.verify(&desired, &far, Position::ORIGIN).passed());
    /// ```
    #[must_use]
    pub fn verify(&self, desired: &BeamRequest, agent: &Pose, ball: Position) -> Verification {
        let position_error = agent
            .position
            .ground_distance_to(desired.agent.position);
        let heading_error = heading_error_deg(agent.heading_deg, desired.agent.heading_deg);
        let ball_error = self
            .tolerance
            .ball
            .and(desired.ball)
            .map(|expected| ball.ground_distance_to(expected));

        let ball_ok = match (ball_error, self.tolerance.ball) {
            (Some(error), Some(limit)) => error <= limit,
            _ => true,
        };
        let passed = position_error <= self.tolerance.position
            && heading_error <= self.tolerance.heading_deg
            && ball_ok;

        Verification {
            position_error,
            heading_error,
            ball_error,
            passed,
        }
    }
}
