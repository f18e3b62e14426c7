//! Stimuli and notifications
//!
//! Stimuli are requests addressed to a part entity. Notifications are what
//! the system reports back for observers (a part died, a part came back).

use hecs::Entity;

/// Request to damage a part
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub amount: i32,
    pub part_name: Option<String>,
    pub instigator: Option<Entity>,
    /// Item used to inflict the damage, if any
    pub tool: Option<Entity>,
    pub direction: Option<[f32; 3]>,
}

impl DamageEvent {
    pub fn new(amount: i32) -> Self {
        Self {
            amount,
            part_name: None,
            instigator: None,
            tool: None,
            direction: None,
        }
    }

    pub fn with_part_name(mut self, name: impl Into<String>) -> Self {
        self.part_name = Some(name.into());
        self
    }

    pub fn with_instigator(mut self, instigator: Entity) -> Self {
        self.instigator = Some(instigator);
        self
    }

    pub fn with_tool(mut self, tool: Entity) -> Self {
        self.tool = Some(tool);
        self
    }

    pub fn with_direction(mut self, direction: [f32; 3]) -> Self {
        self.direction = Some(direction);
        self
    }
}

/// Request to heal a part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealEvent {
    pub amount: i32,
    pub part_name: Option<String>,
    pub instigator: Option<Entity>,
}

impl HealEvent {
    pub fn new(amount: i32) -> Self {
        Self { amount, part_name: None, instigator: None }
    }

    pub fn with_part_name(mut self, name: impl Into<String>) -> Self {
        self.part_name = Some(name.into());
        self
    }

    pub fn with_instigator(mut self, instigator: Entity) -> Self {
        self.instigator = Some(instigator);
        self
    }
}

/// Request to revive a dead part with some starting health
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviveEvent {
    pub amount: i32,
    pub part_name: Option<String>,
    pub instigator: Option<Entity>,
}

impl ReviveEvent {
    pub fn new(amount: i32) -> Self {
        Self { amount, part_name: None, instigator: None }
    }

    pub fn with_part_name(mut self, name: impl Into<String>) -> Self {
        self.part_name = Some(name.into());
        self
    }

    pub fn with_instigator(mut self, instigator: Entity) -> Self {
        self.instigator = Some(instigator);
        self
    }
}

/// Request to run the dead transition on a part directly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillEvent {
    pub instigator: Option<Entity>,
}

/// Anything that can be sent to a part
#[derive(Debug, Clone, PartialEq)]
pub enum Stimulus {
    Damage(DamageEvent),
    Heal(HealEvent),
    Revive(ReviveEvent),
    Kill(KillEvent),
}

impl From<DamageEvent> for Stimulus {
    fn from(event: DamageEvent) -> Self {
        Stimulus::Damage(event)
    }
}

impl From<HealEvent> for Stimulus {
    fn from(event: HealEvent) -> Self {
        Stimulus::Heal(event)
    }
}

impl From<ReviveEvent> for Stimulus {
    fn from(event: ReviveEvent) -> Self {
        Stimulus::Revive(event)
    }
}

impl From<KillEvent> for Stimulus {
    fn from(event: KillEvent) -> Self {
        Stimulus::Kill(event)
    }
}

/// Reported to observers after a part changes alive state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    PartDied {
        part: Entity,
        name: String,
        instigator: Option<Entity>,
    },
    PartRevived {
        part: Entity,
        name: String,
        health: i32,
    },
}
