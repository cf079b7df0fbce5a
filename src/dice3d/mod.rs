pub mod input;
pub mod meshes;
pub mod roll;
pub mod systems;
pub mod texture;
pub mod types;

pub use bevy::math::{DQuat, DVec2, DVec3};
pub use input::*;
pub use meshes::*;
pub use roll::*;
pub use systems::*;
pub use texture::*;
pub use types::*;

use bevy::prelude::*;

/// Wires the die, roll controller, input and display into an app.
pub struct D20RollerPlugin {
    settings: RollerSettings,
    model: D20Model,
}

impl D20RollerPlugin {
    pub fn new(settings: RollerSettings, model: D20Model) -> Self {
        Self { settings, model }
    }
}

impl Plugin for D20RollerPlugin {
    fn build(&self, app: &mut App) {
        let camera_dir = camera_direction(self.settings.camera_position());
        let controller = match self.settings.seed {
            Some(seed) => {
                info!("Using fixed roll seed {}", seed);
                RollController::new(&self.model, camera_dir, Roller::from_seed(seed))
            }
            None => RollController::new(&self.model, camera_dir, Roller::new()),
        };

        app.insert_resource(self.settings.clone())
            .insert_resource(self.model.clone())
            .insert_resource(controller)
            .init_resource::<PendingDieView>()
            .init_resource::<DragTracker>()
            .init_resource::<RollDisplay>()
            .add_message::<RollFinished>()
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (
                    sync_camera_direction,
                    handle_pointer_input,
                    tick_roll_controller,
                    apply_die_view,
                    update_results_display,
                )
                    .chain(),
            )
            .add_systems(Update, update_smoke_texture);
    }
}
