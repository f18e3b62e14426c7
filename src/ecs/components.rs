//! ECS Components
//!
//! Components attached to character and body-part entities.

use hecs::Entity;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identity & Naming
// ============================================================================

/// Name component for entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marks an entity as the player
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

// ============================================================================
// Anatomy
// ============================================================================

/// Health state of a single body part.
///
/// Health and alive-ness are decoupled: a dead part stays dead until it is
/// explicitly revived, whatever its stored health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnatomyPart {
    /// Part identifier, unique within its owner's part set
    pub name: String,
    /// Current health, within `0..=max_health` between operations
    pub health: i32,
    /// Maximum health, fixed for the part's lifetime
    pub max_health: i32,
    /// Whether the part is functional
    pub is_alive: bool,
    /// Health restored per regeneration tick
    #[serde(default)]
    pub health_regen: i32,
}

impl AnatomyPart {
    /// A part at full health. A part with no health to give starts dead.
    pub fn new(name: impl Into<String>, max_health: i32) -> Self {
        let max_health = max_health.max(0);
        Self {
            name: name.into(),
            health: max_health,
            max_health,
            is_alive: max_health > 0,
            health_regen: 0,
        }
    }

    /// Start at a specific health instead of full
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health.clamp(0, self.max_health);
        self.is_alive = self.health > 0;
        self
    }

    pub fn with_regen(mut self, regen: i32) -> Self {
        self.health_regen = regen.max(0);
        self
    }

    pub fn is_health_full(&self) -> bool {
        self.health >= self.max_health
    }
}

/// The whole-body aggregate carried by a character.
///
/// `prefab_names` lists the part templates to instantiate; `parts` holds the
/// spawned part entities in the same order once assembled.
#[derive(Debug, Clone, Default)]
pub struct Anatomy {
    pub prefab_names: Vec<String>,
    pub parts: Vec<Entity>,
    pub assembled: bool,
}

impl Anatomy {
    pub fn new<I, S>(prefab_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefab_names: prefab_names.into_iter().map(Into::into).collect(),
            parts: Vec::new(),
            assembled: false,
        }
    }
}

/// Back-link from a part entity to the character that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnatomyOwner(pub Entity);
