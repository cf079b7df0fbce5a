//! Orientation math for the roll controller
//!
//! All of this runs in double precision; the render boundary narrows to `f32`.

use std::f64::consts::{PI, TAU};

use bevy::log::debug;
use bevy::math::{DQuat, DVec3, EulerRot};

use crate::dice3d::types::DegenerateNormalError;

/// Cross products shorter than this are treated as parallel vectors.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Minimal rotation that turns `normal` onto `camera_dir`.
///
/// Both inputs must be unit length.
pub fn try_face_to_camera(normal: DVec3, camera_dir: DVec3) -> Result<DQuat, DegenerateNormalError> {
    let cos_angle = normal.dot(camera_dir).clamp(-1.0, 1.0);
    let axis = normal.cross(camera_dir);
    if axis.length() < PARALLEL_EPSILON {
        return Err(if cos_angle > 0.0 {
            DegenerateNormalError::Parallel
        } else {
            DegenerateNormalError::Antiparallel
        });
    }
    Ok(DQuat::from_axis_angle(axis.normalize(), cos_angle.acos()))
}

/// Like [`try_face_to_camera`], but substitutes an axis perpendicular to the
/// normal when the two vectors are (anti)parallel.
pub fn face_to_camera(normal: DVec3, camera_dir: DVec3) -> DQuat {
    match try_face_to_camera(normal, camera_dir) {
        Ok(rotation) => rotation,
        Err(err) => {
            debug!("{err}; using a fallback rotation axis");
            let angle = match err {
                DegenerateNormalError::Parallel => 0.0,
                DegenerateNormalError::Antiparallel => PI,
            };
            DQuat::from_axis_angle(normal.any_orthonormal_vector(), angle)
        }
    }
}

/// Full turn about the (1, 1, 1) diagonal, composed into the target of a
/// roll that repeats the previous outcome.
pub fn extra_turn() -> DQuat {
    DQuat::from_axis_angle(DVec3::ONE.normalize(), TAU)
}

/// Die orientation kept both as accumulated XYZ Euler angles and as a
/// quaternion.
///
/// Incremental rotation adds to the angles directly, so an axis keeps turning
/// through ±π/2 instead of folding back. Writing a quaternion (slerp, snap)
/// re-derives the angles from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerPose {
    angles: DVec3,
    orientation: DQuat,
}

impl Default for EulerPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl EulerPose {
    pub const IDENTITY: Self = Self {
        angles: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    pub fn angles(&self) -> DVec3 {
        self.angles
    }

    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    /// Add per-axis angles and rebuild the quaternion from the sums.
    pub fn rotate_by(&mut self, step: DVec3) {
        self.angles += step;
        self.orientation =
            DQuat::from_euler(EulerRot::XYZ, self.angles.x, self.angles.y, self.angles.z);
    }

    pub fn set_orientation(&mut self, orientation: DQuat) {
        let (x, y, z) = orientation.to_euler(EulerRot::XYZ);
        self.angles = DVec3::new(x, y, z);
        self.orientation = orientation;
    }
}

/// Angle between where `normal` ends up under `orientation` and `camera_dir`.
pub fn alignment_error(orientation: DQuat, normal: DVec3, camera_dir: DVec3) -> f64 {
    (orientation * normal).angle_between(camera_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_face_to_camera_general_case() {
        let normal = DVec3::new(0.3, -0.8, 0.52).normalize();
        let camera = DVec3::new(4.0, 4.0, 4.0).normalize();
        let rotation = face_to_camera(normal, camera);
        assert!(alignment_error(rotation, normal, camera) < EPS);
    }

    #[test]
    fn test_parallel_normal_is_reported() {
        assert_eq!(
            try_face_to_camera(DVec3::Z, DVec3::Z),
            Err(DegenerateNormalError::Parallel)
        );
        assert_eq!(
            try_face_to_camera(DVec3::Z, DVec3::NEG_Z),
            Err(DegenerateNormalError::Antiparallel)
        );
    }

    #[test]
    fn test_parallel_fallback_is_identity_rotation() {
        let normal = DVec3::new(1.0, 2.0, 3.0).normalize();
        let rotation = face_to_camera(normal, normal);
        assert!(alignment_error(rotation, normal, normal) < EPS);
        assert!(rotation.angle_between(DQuat::IDENTITY) < EPS);
    }

    #[test]
    fn test_antiparallel_fallback_flips_the_face() {
        let normal = DVec3::new(-0.2, 0.9, 0.1).normalize();
        let rotation = face_to_camera(normal, -normal);
        assert!(rotation.is_finite());
        assert!(alignment_error(rotation, normal, -normal) < 1e-7);
    }

    #[test]
    fn test_extra_turn_is_same_orientation() {
        let turn = extra_turn();
        assert!(turn.angle_between(DQuat::IDENTITY) < 1e-7);
    }

    #[test]
    fn test_pose_single_axis_step() {
        let mut pose = EulerPose::IDENTITY;
        pose.rotate_by(DVec3::new(0.0, 0.25, 0.0));
        assert!(pose.orientation().angle_between(DQuat::from_rotation_y(0.25)) < EPS);
    }

    #[test]
    fn test_pose_turns_through_gimbal_lock() {
        let mut pose = EulerPose::IDENTITY;
        for _ in 0..20 {
            pose.rotate_by(DVec3::new(0.0, 0.1, 0.0));
        }
        assert!((pose.angles().y - 2.0).abs() < 1e-12);
        assert!(pose.orientation().angle_between(DQuat::from_rotation_y(2.0)) < 1e-9);
    }

    #[test]
    fn test_pose_matches_summed_euler_angles() {
        let step = DVec3::new(0.13, 0.21, -0.07);
        let mut pose = EulerPose::IDENTITY;
        for _ in 0..30 {
            pose.rotate_by(step);
        }
        let sum = step * 30.0;
        let expected = DQuat::from_euler(EulerRot::XYZ, sum.x, sum.y, sum.z);
        assert!(pose.orientation().angle_between(expected) < 1e-9);
    }

    #[test]
    fn test_pose_set_orientation_resyncs_angles() {
        let mut pose = EulerPose::IDENTITY;
        let target = DQuat::from_euler(EulerRot::XYZ, 0.4, -0.3, 1.1);
        pose.set_orientation(target);
        pose.rotate_by(DVec3::ZERO);
        assert!(pose.orientation().angle_between(target) < 1e-9);
    }
}
