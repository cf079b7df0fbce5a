//! Camera-related types and components
//!
//! This module contains the main camera marker component.

use bevy::math::DVec3;
use bevy::prelude::*;

/// Marker component for the main 3D camera
#[derive(Component)]
pub struct MainCamera;

/// Unit vector from the die (at the origin) toward the camera.
///
/// Falls back to +Z when the camera sits on the origin.
pub fn camera_direction(camera_position: Vec3) -> DVec3 {
    let direction = camera_position.as_dvec3().normalize_or_zero();
    if direction == DVec3::ZERO {
        DVec3::Z
    } else {
        direction
    }
}
