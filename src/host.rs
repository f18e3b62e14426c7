//! Host contracts
//!
//! The anatomy system leans on its host for two things: turning a template id
//! into a part entity, and persisting/replicating records after they change.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::anatomy::{Bones, InjuredBones};
use crate::ecs::AnatomyPart;
use crate::error::Result;

/// Part fields sent to remote observers after every mutation
pub const REPLICATED_PART_FIELDS: [&str; 4] = ["name", "health", "max_health", "is_alive"];

/// Spawns part entities from template ids
pub trait PartFactory {
    /// Create a part entity carrying an `AnatomyPart` (and optionally a
    /// `PartSkeletalDetails`) for the given template.
    fn create_part(&self, world: &mut World, template_id: &str) -> Result<Entity>;

    /// Whether `create_part` would find this template
    fn has_template(&self, template_id: &str) -> bool;
}

/// Replicated state of a part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSnapshot {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub is_alive: bool,
}

impl From<&AnatomyPart> for PartSnapshot {
    fn from(part: &AnatomyPart) -> Self {
        Self {
            name: part.name.clone(),
            health: part.health,
            max_health: part.max_health,
            is_alive: part.is_alive,
        }
    }
}

/// Replicated state of a whole anatomy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnatomySnapshot {
    /// Part names in assembly order
    pub parts: Vec<String>,
    pub injuries: InjuredBones,
    pub bones: Bones,
}

/// Persistence hook, called after every mutating operation
pub trait SaveHook {
    fn save_part(&mut self, entity: Entity, snapshot: &PartSnapshot);
    fn save_anatomy(&mut self, owner: Entity, snapshot: &AnatomySnapshot);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSaveHook;

impl SaveHook for NullSaveHook {
    fn save_part(&mut self, _entity: Entity, _snapshot: &PartSnapshot) {}
    fn save_anatomy(&mut self, _owner: Entity, _snapshot: &AnatomySnapshot) {}
}

/// Writes each snapshot to the debug log as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSaveHook;

impl SaveHook for LogSaveHook {
    fn save_part(&mut self, entity: Entity, snapshot: &PartSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => log::debug!("save part {:?}: {}", entity, json),
            Err(e) => log::warn!("Failed to serialize part {:?}: {}", entity, e),
        }
    }

    fn save_anatomy(&mut self, owner: Entity, snapshot: &AnatomySnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => log::debug!("save anatomy {:?}: {}", owner, json),
            Err(e) => log::warn!("Failed to serialize anatomy {:?}: {}", owner, e),
        }
    }
}

/// Keeps every snapshot in order, for replication or inspection
#[derive(Debug, Clone, Default)]
pub struct ReplicationLog {
    pub parts: Vec<(Entity, PartSnapshot)>,
    pub anatomies: Vec<(Entity, AnatomySnapshot)>,
}

impl ReplicationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent snapshot saved for a part
    pub fn latest_part(&self, entity: Entity) -> Option<&PartSnapshot> {
        self.parts
            .iter()
            .rev()
            .find(|(e, _)| *e == entity)
            .map(|(_, snapshot)| snapshot)
    }

    /// Most recent snapshot saved for an anatomy owner
    pub fn latest_anatomy(&self, owner: Entity) -> Option<&AnatomySnapshot> {
        self.anatomies
            .iter()
            .rev()
            .find(|(e, _)| *e == owner)
            .map(|(_, snapshot)| snapshot)
    }

    /// Number of saves recorded for a part
    pub fn saves_for(&self, entity: Entity) -> usize {
        self.parts.iter().filter(|(e, _)| *e == entity).count()
    }

    pub fn clear(&mut self) {
        self.parts.clear();
        self.anatomies.clear();
    }
}

impl SaveHook for ReplicationLog {
    fn save_part(&mut self, entity: Entity, snapshot: &PartSnapshot) {
        self.parts.push((entity, snapshot.clone()));
    }

    fn save_anatomy(&mut self, owner: Entity, snapshot: &AnatomySnapshot) {
        self.anatomies.push((owner, snapshot.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_carries_replicated_fields() {
        let part = AnatomyPart::new("head", 50).with_health(20).with_regen(3);
        let snapshot = PartSnapshot::from(&part);

        let json = serde_json::to_value(&snapshot).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), REPLICATED_PART_FIELDS.len());
        for field in REPLICATED_PART_FIELDS {
            assert!(object.contains_key(field), "missing {}", field);
        }
        assert_eq!(snapshot.health, 20);
    }

    #[test]
    fn test_replication_log_latest() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());

        let mut log = ReplicationLog::new();
        log.save_part(a, &PartSnapshot::from(&AnatomyPart::new("head", 50)));
        log.save_part(b, &PartSnapshot::from(&AnatomyPart::new("torso", 100)));
        log.save_part(a, &PartSnapshot::from(&AnatomyPart::new("head", 50).with_health(10)));

        assert_eq!(log.latest_part(a).map(|s| s.health), Some(10));
        assert_eq!(log.saves_for(a), 2);
        assert_eq!(log.saves_for(b), 1);
        assert!(log.latest_anatomy(a).is_none());
    }
}
