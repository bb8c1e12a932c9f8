use serde::{Deserialize, Serialize};

use super::geometry::{Pose, Position};

/// Play mode reported by the simulator.
///
/// Only the modes the harness reacts to are distinguished; everything else
/// deserializes to [`PlayMode::Other`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    #[default]
    BeforeKickOff,
    KickOffLeft,
    PlayOn,
    #[serde(other)]
    Other,
}

/// Ground-truth snapshot read by the harness once per simulation tick.
///
/// # Example
///
/// ```
/// use skillfit_engine::{PlayMode, WorldState};
///
/// let json = r#"{
///     "time": 12.5,
///     "agent": { "position": { "x": -5.0, "y": 0.0 }, "heading_deg": 0.0 },
///     "ball": { "x": 0.0, "y": 0.0, "z": 0.04 },
///     "fallen": false,
///     "play_mode": "play_on"
/// }"#;
/// let world: WorldState = serde_json::from_str(json).unwrap();
/// assert_eq!(world.play_mode, PlayMode::PlayOn);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Simulation clock in seconds.
    pub time: f64,
    pub agent: Pose,
    pub ball: Position,
    /// Output of the external upright/fallen predicate.
    #[serde(default)]
    pub fallen: bool,
    #[serde(default)]
    pub play_mode: PlayMode,
}

impl WorldState {
    #[must_use]
    pub const fn new(time: f64, agent: Pose, ball: Position) -> Self {
        Self {
            time,
            agent,
            ball,
            fallen: false,
            play_mode: PlayMode::BeforeKickOff,
        }
    }

    #[must_use]
    pub const fn with_fallen(mut self, fallen: bool) -> Self {
        self.fallen = fallen;
        self
    }

    #[must_use]
    pub const fn with_play_mode(mut self, play_mode: PlayMode) -> Self {
        self.play_mode = play_mode;
        self
    }

    /// Agent position projected onto the ground plane.
    #[must_use]
    pub const fn agent_ground(&self) -> Position {
        self.agent.position.ground()
    }
}
