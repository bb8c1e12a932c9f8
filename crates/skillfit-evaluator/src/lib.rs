//! Episodic skill evaluation.
//!
//! An [`EvaluationHarness`] repeatedly beams the agent into a known pose,
//! waits for the simulator to settle, verifies the reset, runs the skill under
//! test and scores the trial. After `N` trials it writes the mean score as the
//! fitness the optimizer sees. Everything that differs between skills lives
//! behind [`TrialStrategy`](strategy::TrialStrategy).
//!
//! # Modules
//!
//! - [`harness`] - The phase state machine and the verification retry
//! - [`strategy`] - Kick, walk and stand-recovery strategies
//! - [`waypoint`] - Course targets for the walk trials
//! - [`config`] - Named candidate parameters
//!
//! # Example
//!
//! ```
//! use skillfit_engine::{Command, Pose, Position, WorldState};
//! use skillfit_evaluator::{EvaluationHarness, strategy::StandStrategy};
//!
//! let mut harness = EvaluationHarness::new(StandStrategy::new(), Vec::<f64>::new());
//! let world = WorldState::new(0.0, Pose::on_ground(3.0, 1.0, 45.0), Position::ORIGIN);
//!
//! let Command::Beam(beam) = harness.tick(&world) else { unreachable!() };
//! assert_eq!(beam.agent, Pose::on_ground(-5.0, 0.0, 0.0));
//! assert!(harness.phase().is_beaming());
//! ```

pub use self::harness::{EpisodePhase, EvaluationHarness, TrialReport};

pub mod config;
pub mod harness;
pub mod strategy;
pub mod waypoint;
