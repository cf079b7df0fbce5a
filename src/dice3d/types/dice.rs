//! Die-related types and components
//!
//! This module contains the per-face data of the d20, the components attached
//! to the spawned die hierarchy, and the message published when a roll settles.

use bevy::prelude::*;

/// Number of faces on the die.
pub const FACE_COUNT: u8 = 20;

/// One triangular face of the d20, in die-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// The number printed on this face, 1 through 20.
    pub number: u8,
    /// Unit-length, outward-pointing face normal.
    pub normal: Vec3,
    /// Centroid of the three corners.
    pub center: Vec3,
    /// Corners in counter-clockwise order when seen from outside.
    pub corners: [Vec3; 3],
}

/// Marker for the die body entity. Its `Transform::rotation` mirrors the roll
/// controller's orientation.
#[derive(Component)]
pub struct D20Die;

/// Highlight overlay for one face. Entities carrying this start hidden.
#[derive(Component, Debug, Clone, Copy)]
pub struct FaceHighlight {
    pub number: u8,
}

/// Marker for the result text node
#[derive(Component)]
pub struct ResultsText;

/// Published once per finished roll session.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollFinished {
    pub rolled: u8,
}

/// Resource holding what the result display shows.
#[derive(Resource, Default, Debug)]
pub struct RollDisplay {
    pub last_rolled: Option<u8>,
}

impl RollDisplay {
    pub const IDLE_PROMPT: &'static str = "Click or drag to roll";

    /// Text for the display node.
    pub fn label(&self, rolling: bool) -> String {
        if rolling {
            return "Rolling...".to_string();
        }
        match self.last_rolled {
            Some(value) => format!("Rolled {}", value),
            None => Self::IDLE_PROMPT.to_string(),
        }
    }
}
