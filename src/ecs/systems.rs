//! Anatomy system
//!
//! Reacts to stimuli addressed to part entities, keeps each owner's injury
//! and skeletal models in step, persists through the save hook and queues
//! notifications for observers.

use std::fmt;

use hecs::{Entity, World};

use crate::anatomy::{
    Bones, DamageOutcome, EffectKind, HealOutcome, InjuredBones, PartEffectOutcome,
    PartSkeletalDetails, ReviveOutcome,
};
use crate::config::AnatomyConfig;
use crate::ecs::{Anatomy, AnatomyOwner, AnatomyPart, Name};
use crate::error::{AnatomyError, Result};
use crate::events::{DamageEvent, HealEvent, KillEvent, Notification, ReviveEvent, Stimulus};
use crate::host::{AnatomySnapshot, PartFactory, PartSnapshot, SaveHook};
use crate::registry::AnatomyRegistry;

/// What a stimulus did to its part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimulusOutcome {
    Damage(DamageOutcome),
    Heal(HealOutcome),
    Revive(ReviveOutcome),
    /// Dead transition ran; `was_alive` tells whether it changed anything
    Kill { was_alive: bool },
}

/// Health of every part of one anatomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnatomyHealth {
    pub owner: Entity,
    pub label: String,
    pub parts: Vec<PartSnapshot>,
}

impl fmt::Display for AnatomyHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has the following anatomy health values:", self.label)?;
        for part in &self.parts {
            write!(f, "\n  {} has health: {}/{}", part.name, part.health, part.max_health)?;
            if !part.is_alive {
                write!(f, " (destroyed)")?;
            }
        }
        Ok(())
    }
}

/// Applies damage, heal and revive to body parts
pub struct AnatomySystem<H: SaveHook> {
    config: AnatomyConfig,
    registry: AnatomyRegistry,
    notifications: Vec<Notification>,
    hook: H,
}

impl<H: SaveHook> AnatomySystem<H> {
    pub fn new(config: AnatomyConfig, hook: H) -> Self {
        Self {
            config,
            registry: AnatomyRegistry::new(),
            notifications: Vec::new(),
            hook,
        }
    }

    pub fn config(&self) -> &AnatomyConfig {
        &self.config
    }

    pub fn registry(&self) -> &AnatomyRegistry {
        &self.registry
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    /// Notifications queued since the last drain, oldest first
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ========================================================================
    // Stimuli
    // ========================================================================

    /// Deliver a stimulus to a part entity
    pub fn handle(&mut self, world: &mut World, part: Entity, stimulus: Stimulus) -> Result<StimulusOutcome> {
        match stimulus {
            Stimulus::Damage(event) => self.on_damage(world, part, &event).map(StimulusOutcome::Damage),
            Stimulus::Heal(event) => self.on_heal(world, part, &event).map(StimulusOutcome::Heal),
            Stimulus::Revive(event) => self.on_revive(world, part, &event).map(StimulusOutcome::Revive),
            Stimulus::Kill(event) => self
                .on_kill(world, part, &event)
                .map(|was_alive| StimulusOutcome::Kill { was_alive }),
        }
    }

    fn on_damage(&mut self, world: &mut World, entity: Entity, event: &DamageEvent) -> Result<DamageOutcome> {
        let (outcome, part) = {
            let mut part = part_mut(world, entity)?;
            (part.take_damage(event.amount), part.clone())
        };

        if outcome == DamageOutcome::Ignored {
            log::info!("{} is destroyed and can't take damage", part.name);
            return Ok(outcome);
        }

        log::info!(
            "{}'s {} has taken {} points of damage!",
            entity_label(world, owner_of(world, entity).unwrap_or(entity)),
            part.name,
            event.amount
        );
        self.record_effect(world, entity, &part, EffectKind::Damage, event.amount);

        if outcome == DamageOutcome::Killed {
            log::info!("{} has been destroyed!", part.name);
            self.record_effect(world, entity, &part, EffectKind::Death, 0);
            self.notifications.push(Notification::PartDied {
                part: entity,
                name: part.name.clone(),
                instigator: event.instigator,
            });
        }

        self.persist_part(entity, &part);
        Ok(outcome)
    }

    /// The dead transition on demand. Returns whether the part was alive.
    fn on_kill(&mut self, world: &mut World, entity: Entity, event: &KillEvent) -> Result<bool> {
        let (was_alive, part) = {
            let mut part = part_mut(world, entity)?;
            let was_alive = part.is_alive;
            part.mark_dead();
            (was_alive, part.clone())
        };

        log::info!("{} has been destroyed!", part.name);

        if was_alive {
            self.record_effect(world, entity, &part, EffectKind::Death, 0);
            self.notifications.push(Notification::PartDied {
                part: entity,
                name: part.name.clone(),
                instigator: event.instigator,
            });
        }

        self.persist_part(entity, &part);
        Ok(was_alive)
    }

    fn on_heal(&mut self, world: &mut World, entity: Entity, event: &HealEvent) -> Result<HealOutcome> {
        self.apply_heal(world, entity, event.amount, EffectKind::Heal)
    }

    fn apply_heal(&mut self, world: &mut World, entity: Entity, amount: i32, effect: EffectKind) -> Result<HealOutcome> {
        let (outcome, part) = {
            let mut part = part_mut(world, entity)?;
            (part.heal(amount), part.clone())
        };

        match outcome {
            HealOutcome::Dead => log::info!("{} can't be healed as it's dead!", part.name),
            HealOutcome::AlreadyFull => log::info!("{} is already at max health!", part.name),
            HealOutcome::Healed { amount, .. } => {
                log::info!("{} has recovered {} points of health!", part.name, amount);
                self.record_effect(world, entity, &part, effect, amount);
            }
            HealOutcome::Restored { .. } => {
                log::info!("{} has recovered {} points of health!", part.name, amount);
                log::info!("{} is at max health!", part.name);
                self.record_effect(world, entity, &part, effect, amount);
            }
        }

        self.persist_part(entity, &part);
        Ok(outcome)
    }

    fn on_revive(&mut self, world: &mut World, entity: Entity, event: &ReviveEvent) -> Result<ReviveOutcome> {
        let (outcome, part) = {
            let mut part = part_mut(world, entity)?;
            (part.revive(event.amount), part.clone())
        };

        match outcome {
            ReviveOutcome::AlreadyAlive => {
                log::info!("{} is already alive.", part.name);
                return Ok(outcome);
            }
            ReviveOutcome::Failed => {
                log::info!("{} can't be revived without any health.", part.name);
                return Ok(outcome);
            }
            ReviveOutcome::Revived { health } => {
                log::info!("{} has been revived with {} health!", part.name, health);
                self.record_effect(world, entity, &part, EffectKind::Revive, event.amount);
                self.notifications.push(Notification::PartRevived {
                    part: entity,
                    name: part.name.clone(),
                    health,
                });
            }
        }

        self.persist_part(entity, &part);
        Ok(outcome)
    }

    /// Periodic action hook. Regenerates every living part when the id is
    /// the configured regeneration action; returns how many parts healed.
    pub fn on_periodic_action(&mut self, world: &mut World, action_id: &str) -> Result<usize> {
        if action_id != self.config.regen_action_id || !self.config.regen_enabled {
            return Ok(0);
        }

        let candidates: Vec<(Entity, i32)> = self
            .registry
            .all_parts()
            .filter_map(|(_, registered)| {
                let part = world.get::<&AnatomyPart>(registered.entity).ok()?;
                (part.is_alive && !part.is_health_full() && part.health_regen > 0)
                    .then_some((registered.entity, part.health_regen))
            })
            .collect();

        let mut healed = 0;
        for (entity, regen) in candidates {
            if matches!(
                self.apply_heal(world, entity, regen, EffectKind::Regen)?,
                HealOutcome::Healed { .. } | HealOutcome::Restored { .. }
            ) {
                healed += 1;
            }
        }

        log::debug!("Regenerated {} parts", healed);
        Ok(healed)
    }

    // ========================================================================
    // Aggregates & persistence
    // ========================================================================

    /// Update the owner's injury and skeletal models after a part changed
    fn record_effect(&mut self, world: &World, entity: Entity, part: &AnatomyPart, effect: EffectKind, amount: i32) {
        let Some(owner) = owner_of(world, entity) else {
            return;
        };

        if let Ok(mut injuries) = world.get::<&mut InjuredBones>(owner) {
            injuries.update_from(part);
        }

        if let Ok(mut bones) = world.get::<&mut Bones>(owner) {
            if bones.has_part(&part.name) {
                let outcome = PartEffectOutcome {
                    effect,
                    amount,
                    health_after: part.health,
                    alive_after: part.is_alive,
                };
                if let Err(e) = bones.record_outcome(&part.name, outcome) {
                    log::warn!("Failed to record {:?} on {}: {}", effect, part.name, e);
                }
            }
        }

        self.persist_anatomy(world, owner);
    }

    fn persist_part(&mut self, entity: Entity, part: &AnatomyPart) {
        self.hook.save_part(entity, &PartSnapshot::from(part));
    }

    fn persist_anatomy(&mut self, world: &World, owner: Entity) {
        let snapshot = self.snapshot(world, owner);
        self.hook.save_anatomy(owner, &snapshot);
    }

    /// Replicated view of an anatomy owner
    pub fn snapshot(&self, world: &World, owner: Entity) -> AnatomySnapshot {
        AnatomySnapshot {
            parts: self
                .registry
                .parts_of(owner)
                .iter()
                .map(|p| p.name.clone())
                .collect(),
            injuries: world
                .get::<&InjuredBones>(owner)
                .map(|i| (*i).clone())
                .unwrap_or_default(),
            bones: world
                .get::<&Bones>(owner)
                .map(|b| (*b).clone())
                .unwrap_or_default(),
        }
    }

    /// Re-persist every anatomy and part
    pub fn save_all(&mut self, world: &World) {
        let owners = self.registry.owners().to_vec();
        for owner in owners {
            self.persist_anatomy(world, owner);

            let parts: Vec<Entity> = self.registry.parts_of(owner).iter().map(|p| p.entity).collect();
            for entity in parts {
                if let Ok(part) = world.get::<&AnatomyPart>(entity) {
                    self.hook.save_part(entity, &PartSnapshot::from(&*part));
                }
            }
        }
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    /// Spawn the owner's parts from its template list, in order.
    ///
    /// Runs once per owner; a second call fails with `AlreadyAssembled`.
    pub fn assemble<F>(&mut self, world: &mut World, owner: Entity, factory: &F) -> Result<Vec<Entity>>
    where
        F: PartFactory + ?Sized,
    {
        let prefabs = {
            let anatomy = world
                .get::<&Anatomy>(owner)
                .map_err(|_| AnatomyError::NoAnatomy(owner))?;
            if anatomy.assembled {
                return Err(AnatomyError::AlreadyAssembled(owner));
            }
            anatomy.prefab_names.clone()
        };

        let mut created = Vec::with_capacity(prefabs.len());
        for template_id in &prefabs {
            match factory.create_part(world, template_id) {
                Ok(entity) => created.push(entity),
                Err(e) => {
                    for entity in created {
                        let _ = world.despawn(entity);
                    }
                    return Err(e);
                }
            }
        }

        let mut bones = Bones::default();
        let mut injuries = InjuredBones::new();
        for &entity in &created {
            // Owner link first so later stimuli can find the aggregates
            let _ = world.insert_one(entity, AnatomyOwner(owner));

            let part = part_mut(world, entity)?.clone();
            if let Ok(details) = world.get::<&PartSkeletalDetails>(entity) {
                bones.insert_part(part.name.clone(), (*details).clone());
            }
            injuries.update_from(&part);
            self.registry.register_part(owner, &part.name, entity);
        }

        if let Ok(mut anatomy) = world.get::<&mut Anatomy>(owner) {
            anatomy.parts.extend(created.iter().copied());
            anatomy.assembled = true;
        }
        let _ = world.insert(owner, (bones, injuries));
        self.registry.register_owner(owner);

        log::info!("Assembled {} anatomy parts for {}", created.len(), entity_label(world, owner));
        self.persist_anatomy(world, owner);
        Ok(created)
    }

    /// Despawn the owner's parts and assemble them again from scratch.
    ///
    /// Every template is checked first; on a missing one the current parts
    /// are left untouched.
    pub fn reassemble<F>(&mut self, world: &mut World, owner: Entity, factory: &F) -> Result<Vec<Entity>>
    where
        F: PartFactory + ?Sized,
    {
        let prefabs = world
            .get::<&Anatomy>(owner)
            .map_err(|_| AnatomyError::NoAnatomy(owner))?
            .prefab_names
            .clone();
        if let Some(missing) = prefabs.iter().find(|id| !factory.has_template(id)) {
            log::warn!("Can't reassemble {}: no template `{}`", entity_label(world, owner), missing);
            return Err(AnatomyError::UnknownTemplate(missing.clone()));
        }

        self.clear_parts(world, owner)?;
        self.assemble(world, owner, factory)
    }

    /// Spawn hook: give a new character the default anatomy and assemble it
    pub fn on_player_spawned<F>(&mut self, world: &mut World, entity: Entity, factory: &F) -> Result<Vec<Entity>>
    where
        F: PartFactory + ?Sized,
    {
        log::info!("Player creation caught!");
        if world.get::<&Anatomy>(entity).is_err() {
            world
                .insert_one(entity, Anatomy::new(self.config.default_prefabs.iter().cloned()))
                .map_err(|_| AnatomyError::NoAnatomy(entity))?;
        }
        self.assemble(world, entity, factory)
    }

    /// Start tracking an owner whose parts already exist in the world,
    /// e.g. after loading a save
    pub fn track(&mut self, world: &World, owner: Entity) -> Result<()> {
        let parts = world
            .get::<&Anatomy>(owner)
            .map_err(|_| AnatomyError::NoAnatomy(owner))?
            .parts
            .clone();

        self.registry.unregister_owner(owner);
        self.registry.register_owner(owner);
        for entity in parts {
            let part = world
                .get::<&AnatomyPart>(entity)
                .map_err(|_| AnatomyError::NotAPart(entity))?;
            self.registry.register_part(owner, &part.name, entity);
        }
        Ok(())
    }

    /// Despawn an owner together with its parts
    pub fn despawn_anatomy(&mut self, world: &mut World, owner: Entity) -> Result<()> {
        self.clear_parts(world, owner)?;
        self.registry.unregister_owner(owner);
        let _ = world.despawn(owner);
        Ok(())
    }

    fn clear_parts(&mut self, world: &mut World, owner: Entity) -> Result<()> {
        let parts = {
            let mut anatomy = world
                .get::<&mut Anatomy>(owner)
                .map_err(|_| AnatomyError::NoAnatomy(owner))?;
            anatomy.assembled = false;
            std::mem::take(&mut anatomy.parts)
        };

        for entity in parts {
            let _ = world.despawn(entity);
        }
        let _ = world.remove::<(Bones, InjuredBones)>(owner);
        self.registry.unregister_owner(owner);
        Ok(())
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Current health of every part of every tracked anatomy
    pub fn health_report(&self, world: &World) -> Vec<AnatomyHealth> {
        self.registry
            .owners()
            .iter()
            .map(|&owner| AnatomyHealth {
                owner,
                label: entity_label(world, owner),
                parts: self
                    .registry
                    .parts_of(owner)
                    .iter()
                    .filter_map(|p| world.get::<&AnatomyPart>(p.entity).ok().map(|part| PartSnapshot::from(&*part)))
                    .collect(),
            })
            .collect()
    }
}

fn part_mut(world: &World, entity: Entity) -> Result<hecs::RefMut<'_, AnatomyPart>> {
    world
        .get::<&mut AnatomyPart>(entity)
        .map_err(|_| AnatomyError::NotAPart(entity))
}

fn owner_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<&AnatomyOwner>(entity).ok().map(|o| o.0)
}

/// Display name for log lines
fn entity_label(world: &World, entity: Entity) -> String {
    world
        .get::<&Name>(entity)
        .map(|n| n.0.clone())
        .unwrap_or_else(|_| format!("{:?}", entity))
}
