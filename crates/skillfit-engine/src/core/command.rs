use serde::{Deserialize, Serialize};

use super::geometry::{Pose, Position};

/// Motor skills the harness may invoke for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Skill {
    Stand,
    KickLeftLeg,
    WalkTo { target: Position },
    /// Deliberately drops the robot so a get-up can be measured.
    RecoveryDown,
}

/// Where to relocate the agent, and optionally the ball, between trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamRequest {
    pub agent: Pose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball: Option<Position>,
}

impl BeamRequest {
    #[must_use]
    pub const fn agent_only(agent: Pose) -> Self {
        Self { agent, ball: None }
    }

    #[must_use]
    pub const fn with_ball(agent: Pose, ball: Position) -> Self {
        Self {
            agent,
            ball: Some(ball),
        }
    }
}

/// The single command emitted by a harness on each tick.
///
/// Beams are issued together with a reset to the before-kick-off play mode
/// by the host; environment messages are forwarded verbatim.
///
/// ```
/// use skillfit_engine::{Command, Skill};
///
/// let json = serde_json::to_string(&Command::Skill(Skill::KickLeftLeg)).unwrap();
/// assert_eq!(json, r#"{"type":"skill","name":"kick_left_leg"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Beam(BeamRequest),
    Environment { message: String },
    Skill(Skill),
}

impl Command {
    pub const STAND: Self = Self::Skill(Skill::Stand);

    #[must_use]
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment {
            message: message.into(),
        }
    }
}
