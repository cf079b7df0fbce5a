//! Input handling systems
//!
//! Mouse (left button) and touch (first finger) drive the same gesture
//! tracker. Taps roll immediately; drags spin the die and roll on a fast
//! enough release.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::drag::{DragTracker, Gesture};
use crate::dice3d::roll::{PendingDieView, RollController};

pub fn handle_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut tracker: ResMut<DragTracker>,
    mut controller: ResMut<RollController>,
    mut view: ResMut<PendingDieView>,
) {
    let cursor = windows.single().ok().and_then(Window::cursor_position);
    let pointer = touches.iter().next().map(|touch| touch.position()).or(cursor);

    if mouse.just_pressed(MouseButton::Left) || touches.any_just_pressed() {
        if let Some(position) = pointer {
            tracker.press(position);
        }
    } else if mouse.just_released(MouseButton::Left) || touches.any_just_released() {
        if let Some(position) = touches
            .iter_just_released()
            .next()
            .map(|touch| touch.position())
            .or(cursor)
        {
            tracker.drag_to(position, controller.is_rolling());
        }
        match tracker.release() {
            Gesture::Tap => {
                controller.on_trigger_gesture(&mut *view);
                tracker.stop_spin();
            }
            Gesture::DragRelease(speed) => {
                if controller.on_drag_release(speed, &mut *view) {
                    tracker.stop_spin();
                } else {
                    debug!("Drag released too slowly to roll ({speed:?})");
                }
            }
            Gesture::None => {}
        }
    } else if tracker.is_pressed() {
        if let Some(position) = pointer {
            let rolling = controller.is_rolling();
            if let Some(step) = tracker.drag_to(position, rolling) {
                controller.nudge(step);
            }
        }
    }

    if !tracker.is_pressed() && !controller.is_rolling() {
        if let Some(step) = tracker.coast() {
            controller.nudge(step);
        }
    }
}
