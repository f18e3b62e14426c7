//! RON data loader
//!
//! Loads anatomy data from external RON files, with fallback to hardcoded defaults.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::AnatomyConfig;
use super::parts::{default_part_templates, PartTemplates};

/// Directory the binary reads data files from
pub const DATA_DIR: &str = "assets/data";

/// Manages all external anatomy data
#[derive(Debug, Clone, Default)]
pub struct DataManager {
    /// Part templates
    pub parts: PartTemplates,
    /// System configuration
    pub config: AnatomyConfig,
}

impl DataManager {
    /// Create a new DataManager, loading from `assets/data` or using defaults
    pub fn new() -> Self {
        Self::load_from(Path::new(DATA_DIR))
    }

    /// Load data from a directory. Missing or broken files fall back to defaults.
    pub fn load_from(base_path: &Path) -> Self {
        Self {
            parts: Self::load_parts(base_path),
            config: AnatomyConfig::load(base_path),
        }
    }

    /// Load part templates from RON file
    fn load_parts(base_path: &Path) -> PartTemplates {
        let path = base_path.join("parts.ron");
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str(&content) {
                    Ok(templates) => return templates,
                    Err(e) => log::warn!("Failed to parse parts.ron: {}", e),
                },
                Err(e) => log::warn!("Failed to read parts.ron: {}", e),
            }
        }
        default_part_templates()
    }

    /// Get part templates
    pub fn part_templates(&self) -> &PartTemplates {
        &self.parts
    }

    pub fn config(&self) -> &AnatomyConfig {
        &self.config
    }
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(base_path: &Path) -> io::Result<()> {
    fs::create_dir_all(base_path)?;

    let pretty = ron::ser::PrettyConfig::default();

    let parts = ron::ser::to_string_pretty(&default_part_templates(), pretty.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(base_path.join("parts.ron"), parts)?;

    let config = ron::ser::to_string_pretty(&AnatomyConfig::default(), pretty)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(base_path.join("anatomy.ron"), config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_then_load() {
        let dir = std::env::temp_dir().join("anatomy-data-export");
        export_default_data(&dir).unwrap();

        assert!(dir.join("parts.ron").exists(), "parts.ron not created");
        assert!(dir.join("anatomy.ron").exists(), "anatomy.ron not created");

        let manager = DataManager::load_from(&dir);
        assert_eq!(manager.parts, default_part_templates());
        assert_eq!(manager.config, AnatomyConfig::default());
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = std::env::temp_dir().join("anatomy-data-broken");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("parts.ron"), "(templates: [oops").unwrap();

        let manager = DataManager::load_from(&dir);
        assert_eq!(manager.parts, default_part_templates());
    }
}
