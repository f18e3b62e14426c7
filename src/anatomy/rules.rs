//! Part health rules
//!
//! Damage, death, healing and revival for a single body part. Every method
//! leaves `health` within `0..=max_health`.

use crate::ecs::AnatomyPart;
use super::injury::Severity;

/// Result of damaging a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The part was already dead; nothing changed
    Ignored,
    /// The part survived with this much health left
    Wounded { health: i32 },
    /// The part's health dropped to zero or below and it died
    Killed,
}

/// Result of healing a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealOutcome {
    /// Dead parts can't be healed, only revived
    Dead,
    /// Already at max health; nothing changed
    AlreadyFull,
    /// Health went up by `amount`
    Healed { amount: i32, health: i32 },
    /// Health went up and was capped at max
    Restored { health: i32 },
}

/// Result of reviving a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviveOutcome {
    /// The part was alive; nothing changed
    AlreadyAlive,
    /// The part is alive again with this much health
    Revived { health: i32 },
    /// The revive carried no health, so the part stayed dead
    Failed,
}

impl AnatomyPart {
    /// Apply damage. Dead parts ignore it; a part driven to zero or below
    /// goes through the dead transition before this returns.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.is_alive {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount.max(0));

        if self.health <= 0 {
            self.mark_dead();
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded { health: self.health }
        }
    }

    /// The dead transition. Idempotent.
    pub fn mark_dead(&mut self) {
        self.health = 0;
        self.is_alive = false;
    }

    /// Heal a living, injured part, capped at max health.
    ///
    /// Branch order matters: a dead part at "full" stored health still
    /// reports `Dead`.
    pub fn heal(&mut self, amount: i32) -> HealOutcome {
        if !self.is_alive {
            return HealOutcome::Dead;
        }
        if self.is_health_full() {
            return HealOutcome::AlreadyFull;
        }

        let amount = amount.max(0);
        self.health = self.health.saturating_add(amount);

        if self.health >= self.max_health {
            self.health = self.max_health;
            HealOutcome::Restored { health: self.health }
        } else {
            HealOutcome::Healed { amount, health: self.health }
        }
    }

    /// Bring a dead part back, then heal it by `amount`.
    ///
    /// The alive flag flips first so the heal takes the living branch.
    pub fn revive(&mut self, amount: i32) -> ReviveOutcome {
        if self.is_alive {
            return ReviveOutcome::AlreadyAlive;
        }

        self.is_alive = true;
        self.heal(amount);

        if self.health <= 0 {
            self.mark_dead();
            return ReviveOutcome::Failed;
        }

        ReviveOutcome::Revived { health: self.health }
    }

    /// Injury classification of the part's current state
    pub fn severity(&self) -> Severity {
        Severity::classify(self.health, self.max_health, self.is_alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part() -> AnatomyPart {
        AnatomyPart::new("left_arm", 100)
    }

    #[test]
    fn test_damage_reduces_health_exactly() {
        let mut p = part();
        assert_eq!(p.take_damage(30), DamageOutcome::Wounded { health: 70 });
        assert_eq!(p.health, 70);
        assert!(p.is_alive);
    }

    #[test]
    fn test_lethal_damage_clamps_to_zero() {
        let mut p = part().with_health(40);
        assert_eq!(p.take_damage(50), DamageOutcome::Killed);
        assert_eq!(p.health, 0);
        assert!(!p.is_alive);
    }

    #[test]
    fn test_exact_lethal_damage() {
        let mut p = part().with_health(10);
        assert_eq!(p.take_damage(10), DamageOutcome::Killed);
        assert_eq!(p.health, 0);
    }

    #[test]
    fn test_damage_on_dead_part_is_ignored() {
        let mut p = part();
        p.mark_dead();
        let before = p.clone();
        assert_eq!(p.take_damage(25), DamageOutcome::Ignored);
        assert_eq!(p, before);
    }

    #[test]
    fn test_mark_dead_is_idempotent() {
        let mut once = part();
        once.take_damage(20);
        once.mark_dead();

        let mut twice = once.clone();
        twice.mark_dead();

        assert_eq!(once, twice);
        assert_eq!(twice.health, 0);
        assert!(!twice.is_alive);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut p = part().with_health(90);
        assert_eq!(p.heal(25), HealOutcome::Restored { health: 100 });
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_heal_partial() {
        let mut p = part().with_health(20);
        assert_eq!(p.heal(15), HealOutcome::Healed { amount: 15, health: 35 });
    }

    #[test]
    fn test_heal_at_full_is_noop() {
        let mut p = part();
        assert_eq!(p.heal(10), HealOutcome::AlreadyFull);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_heal_dead_part_is_noop() {
        let mut p = part();
        p.mark_dead();
        assert_eq!(p.heal(20), HealOutcome::Dead);
        assert_eq!(p.health, 0);
        assert!(!p.is_alive);
    }

    #[test]
    fn test_revive_flips_then_heals() {
        let mut p = part();
        p.mark_dead();
        assert_eq!(p.revive(30), ReviveOutcome::Revived { health: 30 });
        assert!(p.is_alive);
        assert_eq!(p.health, 30);
    }

    #[test]
    fn test_revive_alive_part_does_not_heal() {
        let mut p = part().with_health(50);
        assert_eq!(p.revive(30), ReviveOutcome::AlreadyAlive);
        assert_eq!(p.health, 50);
    }

    #[test]
    fn test_revive_without_health_stays_dead() {
        let mut p = part();
        p.mark_dead();
        assert_eq!(p.revive(0), ReviveOutcome::Failed);
        assert!(!p.is_alive);
        assert_eq!(p.health, 0);
    }

    #[test]
    fn test_revive_caps_at_max() {
        let mut p = part();
        p.mark_dead();
        p.revive(500);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_negative_amounts_do_nothing() {
        let mut p = part().with_health(50);
        p.take_damage(-20);
        assert_eq!(p.health, 50);
        p.heal(-20);
        assert_eq!(p.health, 50);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut p = part();

        p.take_damage(60);
        assert_eq!((p.health, p.is_alive), (40, true));

        p.take_damage(50);
        assert_eq!((p.health, p.is_alive), (0, false));

        p.heal(20);
        assert_eq!((p.health, p.is_alive), (0, false));

        p.revive(30);
        assert_eq!((p.health, p.is_alive), (30, true));
    }

    #[test]
    fn test_health_stays_in_bounds() {
        let mut p = part();
        let ops: [(u8, i32); 8] = [(0, 250), (1, 40), (2, 1000), (0, 99), (1, 7), (0, 1), (2, 3), (1, 200)];
        for (op, amount) in ops {
            match op {
                0 => { p.take_damage(amount); }
                1 => { p.heal(amount); }
                _ => { p.revive(amount); }
            }
            assert!(p.health >= 0 && p.health <= p.max_health, "out of bounds: {:?}", p);
            if p.health == 0 {
                assert!(!p.is_alive);
            }
        }
    }
}
