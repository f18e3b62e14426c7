//! Skeletal model
//!
//! Maps each bone-bearing part to its bone composition and keeps an ordered
//! history of the effects applied to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnatomyError, Result};

/// Bone composition of a part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSkeletalDetails {
    pub bones: Vec<String>,
}

impl PartSkeletalDetails {
    pub fn new<I, S>(bones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bones: bones.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// Kind of effect applied to a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Damage,
    Death,
    Heal,
    Revive,
    Regen,
}

/// One entry in a part's effect history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartEffectOutcome {
    pub effect: EffectKind,
    /// Amount requested by the stimulus
    pub amount: i32,
    pub health_after: i32,
    pub alive_after: bool,
}

/// Bones of an entity's anatomy, carried by the anatomy owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BonesData", into = "BonesData")]
pub struct Bones {
    parts: BTreeMap<String, PartSkeletalDetails>,
    part_effect_outcomes: BTreeMap<String, Vec<PartEffectOutcome>>,
}

impl Bones {
    /// Build a skeleton, rejecting effect history for unknown parts
    pub fn new(
        parts: BTreeMap<String, PartSkeletalDetails>,
        part_effect_outcomes: BTreeMap<String, Vec<PartEffectOutcome>>,
    ) -> Result<Self> {
        if let Some(orphan) = part_effect_outcomes.keys().find(|name| !parts.contains_key(*name)) {
            return Err(AnatomyError::OrphanEffectHistory(orphan.clone()));
        }
        Ok(Self { parts, part_effect_outcomes })
    }

    /// Register (or replace) a part's bone composition
    pub fn insert_part(&mut self, name: impl Into<String>, details: PartSkeletalDetails) {
        self.parts.insert(name.into(), details);
    }

    /// Forget a part along with its history
    pub fn remove_part(&mut self, name: &str) -> Option<PartSkeletalDetails> {
        self.part_effect_outcomes.remove(name);
        self.parts.remove(name)
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn details(&self, name: &str) -> Option<&PartSkeletalDetails> {
        self.parts.get(name)
    }

    /// Append to a part's effect history
    pub fn record_outcome(&mut self, name: &str, outcome: PartEffectOutcome) -> Result<()> {
        if !self.parts.contains_key(name) {
            return Err(AnatomyError::UnknownSkeletalPart(name.to_string()));
        }
        self.part_effect_outcomes
            .entry(name.to_string())
            .or_default()
            .push(outcome);
        Ok(())
    }

    /// Effect history of a part, oldest first
    pub fn outcomes(&self, name: &str) -> &[PartEffectOutcome] {
        self.part_effect_outcomes
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn parts(&self) -> &BTreeMap<String, PartSkeletalDetails> {
        &self.parts
    }

    pub fn part_effect_outcomes(&self) -> &BTreeMap<String, Vec<PartEffectOutcome>> {
        &self.part_effect_outcomes
    }

    pub fn clear(&mut self) {
        self.parts.clear();
        self.part_effect_outcomes.clear();
    }
}

#[derive(Serialize, Deserialize)]
struct BonesData {
    parts: BTreeMap<String, PartSkeletalDetails>,
    #[serde(default)]
    part_effect_outcomes: BTreeMap<String, Vec<PartEffectOutcome>>,
}

impl TryFrom<BonesData> for Bones {
    type Error = AnatomyError;

    fn try_from(data: BonesData) -> Result<Self> {
        Bones::new(data.parts, data.part_effect_outcomes)
    }
}

impl From<Bones> for BonesData {
    fn from(bones: Bones) -> Self {
        Self {
            parts: bones.parts,
            part_effect_outcomes: bones.part_effect_outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(effect: EffectKind, amount: i32, health_after: i32) -> PartEffectOutcome {
        PartEffectOutcome {
            effect,
            amount,
            health_after,
            alive_after: health_after > 0,
        }
    }

    fn arm_skeleton() -> Bones {
        let mut bones = Bones::default();
        bones.insert_part("left_arm", PartSkeletalDetails::new(["humerus", "radius", "ulna"]));
        bones
    }

    #[test]
    fn test_orphan_history_rejected() {
        let mut history = BTreeMap::new();
        history.insert("tail".to_string(), vec![outcome(EffectKind::Damage, 5, 15)]);

        let result = Bones::new(BTreeMap::new(), history);
        assert_eq!(result, Err(AnatomyError::OrphanEffectHistory("tail".to_string())));
    }

    #[test]
    fn test_outcomes_keep_order() {
        let mut bones = arm_skeleton();
        bones.record_outcome("left_arm", outcome(EffectKind::Damage, 30, 70)).unwrap();
        bones.record_outcome("left_arm", outcome(EffectKind::Heal, 10, 80)).unwrap();

        let effects: Vec<_> = bones.outcomes("left_arm").iter().map(|o| o.effect).collect();
        assert_eq!(effects, vec![EffectKind::Damage, EffectKind::Heal]);
    }

    #[test]
    fn test_record_for_unknown_part_fails() {
        let mut bones = arm_skeleton();
        let err = bones.record_outcome("wing", outcome(EffectKind::Damage, 1, 9)).unwrap_err();
        assert_eq!(err, AnatomyError::UnknownSkeletalPart("wing".to_string()));
        assert!(bones.part_effect_outcomes().is_empty());
    }

    #[test]
    fn test_remove_part_drops_history() {
        let mut bones = arm_skeleton();
        bones.record_outcome("left_arm", outcome(EffectKind::Damage, 30, 70)).unwrap();
        bones.remove_part("left_arm");
        assert!(bones.outcomes("left_arm").is_empty());
        assert!(!bones.has_part("left_arm"));
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = r#"{"parts":{},"part_effect_outcomes":{"tail":[]}}"#;
        assert!(serde_json::from_str::<Bones>(bad).is_err());

        let good = r#"{"parts":{"tail":{"bones":["caudal"]}}}"#;
        let bones: Bones = serde_json::from_str(good).unwrap();
        assert!(bones.has_part("tail"));
    }
}
