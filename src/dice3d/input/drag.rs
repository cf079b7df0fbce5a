//! Pointer gesture tracking
//!
//! Classifies a press/release pair as a tap or a drag, turns pointer motion
//! into manual spin, and lets that spin coast down once released.

use bevy::math::DVec2;
use bevy::prelude::*;

/// Radians of rotation per pixel of pointer motion.
pub const DRAG_SENSITIVITY: f64 = 0.005;
/// Per-frame decay of the residual manual spin.
pub const IDLE_DECAY: f64 = 0.95;
/// Pointer travel (logical pixels) below which a release counts as a tap.
pub const TAP_SLOP: f32 = 4.0;

const REST_SPEED: f64 = 1e-6;

/// What a pointer release amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Release without a matching press.
    None,
    Tap,
    /// Release after dragging, with the last manual spin speed.
    DragRelease(DVec2),
}

#[derive(Resource, Debug, Default, Clone)]
pub struct DragTracker {
    pressed: bool,
    last_position: Option<Vec2>,
    travel: f32,
    speed: DVec2,
}

impl DragTracker {
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Current manual spin speed (Euler x, Euler y).
    pub fn speed(&self) -> DVec2 {
        self.speed
    }

    pub fn press(&mut self, position: Vec2) {
        self.pressed = true;
        self.last_position = Some(position);
        self.travel = 0.0;
        self.speed = DVec2::ZERO;
    }

    /// Pointer moved while pressed. Returns the rotation step to apply, or
    /// `None` if nothing moved or a roll owns the die.
    pub fn drag_to(&mut self, position: Vec2, rolling: bool) -> Option<DVec2> {
        if !self.pressed {
            return None;
        }
        let last = self.last_position.replace(position)?;
        let delta = position - last;
        if delta == Vec2::ZERO {
            return None;
        }
        self.travel += delta.length();
        if rolling {
            return None;
        }

        // Vertical motion tips the die about x, horizontal motion about y.
        self.speed = DVec2::new(
            f64::from(delta.y) * DRAG_SENSITIVITY,
            f64::from(delta.x) * DRAG_SENSITIVITY,
        );
        Some(self.speed)
    }

    pub fn release(&mut self) -> Gesture {
        if !self.pressed {
            return Gesture::None;
        }
        self.pressed = false;
        self.last_position = None;
        if self.travel < TAP_SLOP {
            Gesture::Tap
        } else {
            Gesture::DragRelease(self.speed)
        }
    }

    /// Decay the residual spin and return the step to apply this frame.
    pub fn coast(&mut self) -> Option<DVec2> {
        if self.pressed || self.speed.abs().element_sum() < REST_SPEED {
            return None;
        }
        self.speed *= IDLE_DECAY;
        Some(self.speed)
    }

    /// A roll took over; drop any manual spin.
    pub fn stop_spin(&mut self) {
        self.speed = DVec2::ZERO;
    }
}
