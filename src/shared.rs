//! Thread-shared anatomy
//!
//! Hosts that deliver stimuli from several threads share one world through
//! this handle. Each stimulus runs its whole read-modify-write under the lock.

use std::sync::Arc;

use hecs::{Entity, World};
use parking_lot::Mutex;

use crate::ecs::{AnatomySystem, StimulusOutcome};
use crate::error::Result;
use crate::events::Stimulus;
use crate::host::SaveHook;

/// World and system guarded together
pub struct AnatomyState<H: SaveHook> {
    pub world: World,
    pub system: AnatomySystem<H>,
}

pub struct SharedAnatomy<H: SaveHook> {
    inner: Arc<Mutex<AnatomyState<H>>>,
}

impl<H: SaveHook> Clone for SharedAnatomy<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: SaveHook> SharedAnatomy<H> {
    pub fn new(world: World, system: AnatomySystem<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AnatomyState { world, system })),
        }
    }

    /// Deliver a stimulus, holding the lock until it is fully processed
    pub fn handle(&self, part: Entity, stimulus: Stimulus) -> Result<StimulusOutcome> {
        let mut state = self.inner.lock();
        let AnatomyState { world, system } = &mut *state;
        system.handle(world, part, stimulus)
    }

    /// Run arbitrary work against the world and system under the lock
    pub fn with<R>(&self, f: impl FnOnce(&mut World, &mut AnatomySystem<H>) -> R) -> R {
        let mut state = self.inner.lock();
        let AnatomyState { world, system } = &mut *state;
        f(world, system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnatomyConfig;
    use crate::data::default_part_templates;
    use crate::ecs::AnatomyPart;
    use crate::events::DamageEvent;
    use crate::host::ReplicationLog;

    #[test]
    fn test_concurrent_damage_is_serialized() {
        let mut world = World::new();
        let mut system = AnatomySystem::new(AnatomyConfig::default(), ReplicationLog::new());
        let player = world.spawn(());
        system
            .on_player_spawned(&mut world, player, &default_part_templates())
            .unwrap();
        let torso = system.registry().find_parts("torso")[0];

        let shared = SharedAnatomy::new(world, system);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let shared = shared.clone();
                scope.spawn(move || {
                    for _ in 0..5 {
                        shared.handle(torso, DamageEvent::new(1).into()).unwrap();
                    }
                });
            }
        });

        let (health, saves) = shared.with(|world, system| {
            let health = world.get::<&AnatomyPart>(torso).unwrap().health;
            (health, system.hook().saves_for(torso))
        });
        assert_eq!(health, 80);
        assert_eq!(saves, 20);
    }
}
