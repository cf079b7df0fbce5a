//! Roll Control Module
//!
//! This module drives a roll from trigger to settle: it picks the face,
//! computes the orientation that turns that face toward the camera, and
//! animates the die through spin, alignment, settle and highlight fade.

pub mod orientation;
pub mod random;
mod state;
mod systems;

pub use orientation::*;
pub use random::*;
pub use state::*;
pub use systems::*;
