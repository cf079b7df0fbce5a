//! Systems module for dice3d
//!
//! - `setup`: Scene initialization (camera, lights, die, UI)
//! - `results`: Result text display

mod results;
mod setup;

pub use results::update_results_display;
pub use setup::setup;
