//! Turtle state and operations for ribbon interpretation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The state of the ribbon turtle.
///
/// Tracks position, orientation and the current step length. The whole frame is
/// saved on branch-start and restored on branch-end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleFrame {
    /// Current world-space position of the "cursor".
    pub position: Vec3,

    /// Current world-space orientation.
    pub rotation: Quat,

    /// Distance covered by the next forward move (scaled by `"`).
    pub step: f32,
}

impl Default for TurtleFrame {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            step: 1.0,
        }
    }
}

impl TurtleFrame {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            ..Default::default()
        }
    }

    /// Returns the direction of travel (local Y axis) in world space.
    pub fn heading(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the ribbon surface normal (local Z axis) in world space.
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Moves the cursor `distance` units along the heading.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.heading() * distance;
    }

    /// Rotates the turtle around its local X axis by `angle` radians (Pitch).
    pub fn rotate_local_x(&mut self, angle: f32) {
        self.rotation *= Quat::from_axis_angle(Vec3::X, angle);
        self.rotation = self.rotation.normalize();
    }

    /// Rotates the turtle around its local Y axis by `angle` radians (Roll).
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.rotation *= Quat::from_axis_angle(Vec3::Y, angle);
        self.rotation = self.rotation.normalize();
    }

    /// Rotates the turtle around its local Z axis by `angle` radians (Yaw).
    pub fn rotate_local_z(&mut self, angle: f32) {
        self.rotation *= Quat::from_axis_angle(Vec3::Z, angle);
        self.rotation = self.rotation.normalize();
    }
}

/// Operations that can be performed by the ribbon turtle.
///
/// The signed variants carry a multiplier applied to the configured turn angle.
/// In a description's `commands` table they are written as `"forward"`,
/// `{"yaw": -1.0}` and so on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurtleOp {
    // --- Drawing ---
    /// Advance one step and emit a curve point (`F`).
    Forward,
    /// Advance one step without drawing; the next strand starts there (`f`).
    Move,

    // --- Orientation ---
    /// Rotate around Z (`+`/`-`).
    Yaw(f32),
    /// Rotate around X (`&`/`^`).
    Pitch(f32),
    /// Rotate around Y, the heading (`\` / `/`).
    Roll(f32),
    /// Turn 180 degrees (`|`).
    TurnAround,

    // --- Configuration ---
    /// Multiply the step length by the configured length factor (`"`).
    ScaleStep,

    // --- Flow Control ---
    /// Save the turtle frame and open a branch strand (`[`).
    BranchStart,
    /// Restore the most recently saved frame (`]`).
    BranchEnd,
    /// No-op; the symbol has no drawing meaning.
    Ignore,
}

/// The conventional symbol-to-operation table.
pub const STANDARD_SYMBOLS: [(&str, TurtleOp); 12] = [
    ("F", TurtleOp::Forward),
    ("f", TurtleOp::Move),
    ("+", TurtleOp::Yaw(1.0)),
    ("-", TurtleOp::Yaw(-1.0)),
    ("&", TurtleOp::Pitch(1.0)),
    ("^", TurtleOp::Pitch(-1.0)),
    ("\\", TurtleOp::Roll(1.0)),
    ("/", TurtleOp::Roll(-1.0)),
    ("|", TurtleOp::TurnAround),
    ("\"", TurtleOp::ScaleStep),
    ("[", TurtleOp::BranchStart),
    ("]", TurtleOp::BranchEnd),
];
