//! Type definitions for the D20 roller
//!
//! This module is organized into submodules:
//! - `dice` - Die model data, components, and roll messages
//! - `camera` - Camera-related components
//! - `settings` - Application settings and persistence
//! - `errors` - Error types surfaced by die construction and settings loading

pub mod camera;
pub mod dice;
pub mod errors;
pub mod settings;

// Re-export all public types for convenient access
pub use camera::*;
pub use dice::*;
pub use errors::*;
pub use settings::*;
