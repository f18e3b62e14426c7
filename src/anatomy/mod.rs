//! Anatomy rules and aggregate models

pub mod rules;
pub mod injury;
pub mod skeleton;

pub use rules::{DamageOutcome, HealOutcome, ReviveOutcome};
pub use injury::{InjuredBones, PartHealthDetails, Severity};
pub use skeleton::{Bones, EffectKind, PartEffectOutcome, PartSkeletalDetails};
