//! Entity Component System module
//!
//! Defines the anatomy components and the system that drives them.

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::{AnatomyHealth, AnatomySystem, StimulusOutcome};
