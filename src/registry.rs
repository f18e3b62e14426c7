//! Anatomy registry
//!
//! Index of anatomy owners and their parts, so lookups by owner or part name
//! never scan the world. Kept current by the system on assembly and despawn.

use std::collections::HashMap;

use hecs::Entity;

/// A registered part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPart {
    pub name: String,
    pub entity: Entity,
}

#[derive(Debug, Clone, Default)]
pub struct AnatomyRegistry {
    /// Owners in registration order
    owners: Vec<Entity>,
    parts: HashMap<Entity, Vec<RegisteredPart>>,
    /// Lowercased part name -> part entities across all owners
    by_name: HashMap<String, Vec<Entity>>,
}

impl AnatomyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_owner(&mut self, owner: Entity) {
        if !self.parts.contains_key(&owner) {
            self.owners.push(owner);
            self.parts.insert(owner, Vec::new());
        }
    }

    pub fn register_part(&mut self, owner: Entity, name: &str, entity: Entity) {
        self.register_owner(owner);
        if let Some(parts) = self.parts.get_mut(&owner) {
            parts.push(RegisteredPart { name: name.to_string(), entity });
        }
        self.by_name.entry(name.to_lowercase()).or_default().push(entity);
    }

    /// Remove an owner and return its part entities
    pub fn unregister_owner(&mut self, owner: Entity) -> Vec<Entity> {
        self.owners.retain(|&o| o != owner);
        let parts = self.parts.remove(&owner).unwrap_or_default();

        for part in &parts {
            let key = part.name.to_lowercase();
            if let Some(entities) = self.by_name.get_mut(&key) {
                entities.retain(|&e| e != part.entity);
                if entities.is_empty() {
                    self.by_name.remove(&key);
                }
            }
        }

        parts.into_iter().map(|p| p.entity).collect()
    }

    pub fn contains_owner(&self, owner: Entity) -> bool {
        self.parts.contains_key(&owner)
    }

    pub fn owners(&self) -> &[Entity] {
        &self.owners
    }

    pub fn parts_of(&self, owner: Entity) -> &[RegisteredPart] {
        self.parts.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Part entities with this name, case-insensitive, across all owners
    pub fn find_parts(&self, name: &str) -> &[Entity] {
        self.by_name
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every registered part, grouped by owner in registration order
    pub fn all_parts(&self) -> impl Iterator<Item = (Entity, &RegisteredPart)> {
        self.owners
            .iter()
            .flat_map(move |&owner| self.parts_of(owner).iter().map(move |p| (owner, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn clear(&mut self) {
        self.owners.clear();
        self.parts.clear();
        self.by_name.clear();
    }
}
