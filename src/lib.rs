//! Anatomy - body-part health for ECS worlds
//!
//! Entities own an anatomy of part entities. Each part tracks health and
//! reacts to damage, heal and revive stimuli, while the owner keeps an
//! injury model and a skeletal effect history in step.

pub mod anatomy;
pub mod config;
pub mod console;
pub mod data;
pub mod ecs;
pub mod error;
pub mod events;
pub mod host;
pub mod registry;
pub mod save;
pub mod shared;

// Re-export commonly used types
pub use anatomy::{Bones, InjuredBones, PartSkeletalDetails, Severity};
pub use config::AnatomyConfig;
pub use ecs::components::*;
pub use ecs::{AnatomySystem, StimulusOutcome};
pub use error::{AnatomyError, Result};
pub use events::{DamageEvent, HealEvent, KillEvent, Notification, ReviveEvent, Stimulus};
pub use host::{PartFactory, SaveHook};
pub use shared::SharedAnatomy;
