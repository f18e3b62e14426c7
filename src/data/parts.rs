//! Part templates for data-driven anatomy assembly
//!
//! These templates are loaded from RON files and used to spawn body parts.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::anatomy::PartSkeletalDetails;
use crate::ecs::AnatomyPart;
use crate::error::{AnatomyError, Result};
use crate::host::PartFactory;

/// A template for creating body parts from external data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTemplate {
    /// Unique template ID for reference
    pub id: String,
    /// Part name given to spawned parts
    pub name: String,
    pub max_health: i32,
    /// Starting health, full if absent
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub health_regen: i32,
    /// Bones making up the part; empty for soft tissue
    #[serde(default)]
    pub bones: Vec<String>,
}

impl PartTemplate {
    /// Build the part component described by this template
    pub fn to_part(&self) -> AnatomyPart {
        let part = AnatomyPart::new(self.name.clone(), self.max_health).with_regen(self.health_regen);
        match self.health {
            Some(health) => part.with_health(health),
            None => part,
        }
    }
}

/// Collection of part templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartTemplates {
    pub templates: Vec<PartTemplate>,
}

impl PartTemplates {
    /// Find a template by ID
    pub fn find(&self, id: &str) -> Option<&PartTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }
}

impl PartFactory for PartTemplates {
    fn create_part(&self, world: &mut World, template_id: &str) -> Result<Entity> {
        let template = self
            .find(template_id)
            .ok_or_else(|| AnatomyError::UnknownTemplate(template_id.to_string()))?;

        let entity = if template.bones.is_empty() {
            world.spawn((template.to_part(),))
        } else {
            world.spawn((template.to_part(), PartSkeletalDetails::new(template.bones.iter().cloned())))
        };

        log::debug!("Spawned part {} from template {}", template.name, template.id);
        Ok(entity)
    }

    fn has_template(&self, template_id: &str) -> bool {
        self.find(template_id).is_some()
    }
}

fn template(id: &str, max_health: i32, health_regen: i32, bones: &[&str]) -> PartTemplate {
    PartTemplate {
        id: id.to_string(),
        name: id.to_string(),
        max_health,
        health: None,
        health_regen,
        bones: bones.iter().map(|b| b.to_string()).collect(),
    }
}

/// Create default part templates (hardcoded fallback)
pub fn default_part_templates() -> PartTemplates {
    PartTemplates {
        templates: vec![
            template("head", 50, 1, &["skull", "mandible"]),
            template("torso", 100, 2, &["sternum", "ribs", "spine", "pelvis"]),
            template("left_arm", 60, 1, &["humerus", "radius", "ulna"]),
            template("right_arm", 60, 1, &["humerus", "radius", "ulna"]),
            template("left_leg", 75, 1, &["femur", "patella", "tibia", "fibula"]),
            template("right_leg", 75, 1, &["femur", "patella", "tibia", "fibula"]),
            template("heart", 40, 0, &[]),
        ],
    }
}
