//! Geometry, world snapshots and commands.
//!
//! - [`Position`] / [`Pose`] - Ground-truth coordinates in meters and degrees
//! - [`WorldState`] - What the harness may read on a tick
//! - [`Command`] - What the harness may emit on a tick (exactly one)

pub use self::{command::*, geometry::*, world::*};

mod command;
mod geometry;
mod world;
