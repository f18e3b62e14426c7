//! Anatomy configuration
//!
//! Loaded from a RON file, falling back to defaults when the file is missing
//! or malformed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Periodic action id that triggers part regeneration
pub const REGEN_ACTION_ID: &str = "Anatomy:RegenHealth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnatomyConfig {
    /// Part templates given to a freshly spawned character, in order
    pub default_prefabs: Vec<String>,
    /// Periodic action id that triggers regeneration
    pub regen_action_id: String,
    pub regen_enabled: bool,
    /// Slot written by the console `save` command
    pub save_slot: u8,
}

impl Default for AnatomyConfig {
    fn default() -> Self {
        Self {
            default_prefabs: [
                "head", "torso", "left_arm", "right_arm", "left_leg", "right_leg",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            regen_action_id: REGEN_ACTION_ID.to_string(),
            regen_enabled: true,
            save_slot: 0,
        }
    }
}

impl AnatomyConfig {
    /// Load `anatomy.ron` from the given directory, or use defaults
    pub fn load(base_path: &Path) -> Self {
        let path = base_path.join("anatomy.ron");
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Failed to parse {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
            }
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnatomyConfig::default();
        assert_eq!(config.default_prefabs.len(), 6);
        assert_eq!(config.regen_action_id, REGEN_ACTION_ID);
        assert!(config.regen_enabled);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config: AnatomyConfig = ron::from_str("(regen_enabled: false)").unwrap();
        assert!(!config.regen_enabled);
        assert_eq!(config.default_prefabs, AnatomyConfig::default().default_prefabs);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = std::env::temp_dir().join("anatomy-config-missing");
        assert_eq!(AnatomyConfig::load(&dir), AnatomyConfig::default());
    }
}
