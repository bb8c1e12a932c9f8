//! Core vocabulary shared by every evaluation harness.
//!
//! This crate holds the pieces that do not depend on which skill is being
//! measured:
//!
//! - [`core`] - Positions and poses, the per-tick [`WorldState`] snapshot and
//!   the [`Command`] vocabulary sent back to the simulator
//! - [`detector`] - Small sub-state machines that debounce simulator noise
//!   ([`StillnessDetector`]) or sample the fallen predicate ([`FallDetector`])
//! - [`verifier`] - The [`ResetVerifier`] predicate that checks a beam landed
//!
//! Everything here is single-threaded and tick-driven. Nothing reads a wall
//! clock; time always comes from [`WorldState::time`].

pub use self::{core::*, detector::*, verifier::*};

pub mod core;
pub mod detector;
pub mod verifier;
