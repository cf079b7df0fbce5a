//! Pointer and touch input for the die

mod drag;
mod systems;

pub use drag::*;
pub use systems::*;
