//! Injury tracking
//!
//! `InjuredBones` holds the health detail of every injured part and an index
//! from severity to the parts at that severity. Both maps are private so the
//! index can't drift from the details.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ecs::AnatomyPart;

/// How badly a part is hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Full health
    Healthy,
    /// More than half health left
    Bruised,
    /// Half health or less
    Fractured,
    /// Dead part
    Broken,
}

impl Severity {
    /// Classify a part by its health and alive flag
    pub fn classify(health: i32, max_health: i32, is_alive: bool) -> Self {
        if !is_alive || health <= 0 {
            Severity::Broken
        } else if health >= max_health {
            Severity::Healthy
        } else if health.saturating_mul(2) > max_health {
            Severity::Bruised
        } else {
            Severity::Fractured
        }
    }

    /// Display label for this severity
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Healthy => "healthy",
            Severity::Bruised => "bruised",
            Severity::Fractured => "fractured",
            Severity::Broken => "broken",
        }
    }

    pub fn is_injury(&self) -> bool {
        !matches!(self, Severity::Healthy)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health detail of one injured part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartHealthDetails {
    pub severity: Severity,
    pub health: i32,
    pub max_health: i32,
}

impl From<&AnatomyPart> for PartHealthDetails {
    fn from(part: &AnatomyPart) -> Self {
        Self {
            severity: part.severity(),
            health: part.health,
            max_health: part.max_health,
        }
    }
}

/// Injured skeletal system details, carried by the anatomy owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InjuredBonesData", into = "InjuredBonesData")]
pub struct InjuredBones {
    part_healths: BTreeMap<String, PartHealthDetails>,
    parts: BTreeMap<Severity, BTreeSet<String>>,
}

impl InjuredBones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state of a part. Healthy parts leave the model.
    pub fn update(&mut self, name: &str, details: PartHealthDetails) {
        self.unindex(name);

        if details.severity.is_injury() {
            self.parts
                .entry(details.severity)
                .or_default()
                .insert(name.to_string());
            self.part_healths.insert(name.to_string(), details);
        } else {
            self.part_healths.remove(name);
        }
    }

    /// Record a part straight from its component
    pub fn update_from(&mut self, part: &AnatomyPart) {
        self.update(&part.name, PartHealthDetails::from(part));
    }

    /// Drop a part from the model entirely
    pub fn remove(&mut self, name: &str) -> Option<PartHealthDetails> {
        self.unindex(name);
        self.part_healths.remove(name)
    }

    fn unindex(&mut self, name: &str) {
        if let Some(previous) = self.part_healths.get(name) {
            let severity = previous.severity;
            if let Some(bucket) = self.parts.get_mut(&severity) {
                bucket.remove(name);
                if bucket.is_empty() {
                    self.parts.remove(&severity);
                }
            }
        }
    }

    pub fn details(&self, name: &str) -> Option<&PartHealthDetails> {
        self.part_healths.get(name)
    }

    /// Severity of a part; parts not in the model are healthy
    pub fn severity_of(&self, name: &str) -> Severity {
        self.part_healths
            .get(name)
            .map(|d| d.severity)
            .unwrap_or(Severity::Healthy)
    }

    /// Parts currently at the given severity, in name order
    pub fn parts_at(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.parts
            .get(&severity)
            .into_iter()
            .flat_map(|bucket| bucket.iter().map(String::as_str))
    }

    pub fn part_healths(&self) -> &BTreeMap<String, PartHealthDetails> {
        &self.part_healths
    }

    pub fn severity_index(&self) -> &BTreeMap<Severity, BTreeSet<String>> {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.part_healths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.part_healths.len()
    }

    pub fn clear(&mut self) {
        self.part_healths.clear();
        self.parts.clear();
    }

    /// Every injured part sits in exactly one bucket, the one matching its details
    pub fn is_consistent(&self) -> bool {
        let indexed: usize = self.parts.values().map(BTreeSet::len).sum();
        indexed == self.part_healths.len()
            && self.part_healths.iter().all(|(name, details)| {
                details.severity.is_injury()
                    && self
                        .parts
                        .get(&details.severity)
                        .is_some_and(|bucket| bucket.contains(name))
            })
    }
}

/// Wire form. Only the details are stored; the index is rebuilt on load.
#[derive(Serialize, Deserialize)]
struct InjuredBonesData {
    part_healths: BTreeMap<String, PartHealthDetails>,
}

impl From<InjuredBonesData> for InjuredBones {
    fn from(data: InjuredBonesData) -> Self {
        let mut injuries = InjuredBones::new();
        for (name, details) in data.part_healths {
            injuries.update(&name, details);
        }
        injuries
    }
}

impl From<InjuredBones> for InjuredBonesData {
    fn from(injuries: InjuredBones) -> Self {
        Self {
            part_healths: injuries.part_healths,
        }
    }
}
