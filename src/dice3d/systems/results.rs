//! Result display
//!
//! Keeps the result text in sync with the roll controller and the
//! `RollFinished` messages it publishes.

use bevy::prelude::*;

use crate::dice3d::roll::RollController;
use crate::dice3d::types::{ResultsText, RollDisplay, RollFinished};

/// System to update the results display text
pub fn update_results_display(
    mut finished: MessageReader<RollFinished>,
    controller: Res<RollController>,
    mut display: ResMut<RollDisplay>,
    mut text_query: Query<&mut Text, With<ResultsText>>,
) {
    for message in finished.read() {
        display.last_rolled = Some(message.rolled);
    }

    let label = display.label(controller.is_rolling());
    for mut text in text_query.iter_mut() {
        if text.0 != label {
            text.0.clone_from(&label);
        }
    }
}
