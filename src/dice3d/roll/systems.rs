//! Roll Controller Systems
//!
//! Bridges the controller to the ECS: the controller writes into
//! [`PendingDieView`], and [`apply_die_view`] copies that onto the die
//! entities each frame.

use bevy::prelude::*;

use super::state::{DieView, RollController};
use crate::dice3d::types::{D20Die, FaceHighlight, MainCamera, RollFinished, FACE_COUNT};

/// Pending render changes produced by the controller this frame.
#[derive(Resource, Debug, Default)]
pub struct PendingDieView {
    pub orientation: Option<Quat>,
    /// Indexed by `face - 1`: (visible, opacity).
    pub highlights: [Option<(bool, f32)>; FACE_COUNT as usize],
}

impl DieView for PendingDieView {
    fn set_orientation(&mut self, orientation: bevy::math::DQuat) {
        self.orientation = Some(orientation.as_quat());
    }

    fn set_face_highlight(&mut self, face: u8, visible: bool, opacity: f64) {
        if let Some(slot) = usize::from(face)
            .checked_sub(1)
            .and_then(|i| self.highlights.get_mut(i))
        {
            *slot = Some((visible, opacity as f32));
        }
    }
}

/// Follow the camera so new rolls land facing it.
pub fn sync_camera_direction(
    camera: Query<&GlobalTransform, (With<MainCamera>, Changed<GlobalTransform>)>,
    mut controller: ResMut<RollController>,
) {
    if let Ok(transform) = camera.single() {
        controller.set_camera_direction(transform.translation().as_dvec3());
    }
}

/// Advance the roll controller one step and publish finished rolls.
pub fn tick_roll_controller(
    mut controller: ResMut<RollController>,
    mut view: ResMut<PendingDieView>,
    mut finished: MessageWriter<RollFinished>,
) {
    if let Some(outcome) = controller.tick(&mut *view) {
        finished.write(RollFinished {
            rolled: outcome.rolled,
        });
    }
}

/// Copy pending orientation and highlight state onto the die entities.
pub fn apply_die_view(
    mut view: ResMut<PendingDieView>,
    mut die_query: Query<&mut Transform, With<D20Die>>,
    mut highlight_query: Query<(
        &FaceHighlight,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if let Some(rotation) = view.orientation.take() {
        for mut transform in die_query.iter_mut() {
            transform.rotation = rotation;
        }
    }

    if view.highlights.iter().all(Option::is_none) {
        return;
    }

    for (highlight, mut visibility, material) in highlight_query.iter_mut() {
        let Some(slot) = usize::from(highlight.number)
            .checked_sub(1)
            .and_then(|i| view.highlights.get_mut(i))
        else {
            continue;
        };
        let Some((visible, opacity)) = slot.take() else {
            continue;
        };

        *visibility = if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::DQuat;

    #[test]
    fn test_pending_view_records_highlights() {
        let mut view = PendingDieView::default();
        view.set_face_highlight(1, true, 0.5);
        view.set_face_highlight(20, false, 0.0);
        view.set_face_highlight(0, true, 1.0);
        view.set_face_highlight(21, true, 1.0);
        assert_eq!(view.highlights[0], Some((true, 0.5)));
        assert_eq!(view.highlights[19], Some((false, 0.0)));
        assert_eq!(view.highlights.iter().flatten().count(), 2);
    }

    #[test]
    fn test_pending_view_narrows_orientation() {
        let mut view = PendingDieView::default();
        view.set_orientation(DQuat::from_rotation_x(0.5));
        let rotation = view.orientation.unwrap();
        assert!(rotation.angle_between(Quat::from_rotation_x(0.5)) < 1e-4);
    }
}
