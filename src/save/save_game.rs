//! Anatomy save/load
//!
//! Writes every tracked anatomy (parts, injuries, bone history) to a JSON
//! slot file and rebuilds it in a world on load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anatomy::{Bones, InjuredBones, PartSkeletalDetails};
use crate::ecs::{Anatomy, AnatomyOwner, AnatomyPart, AnatomySystem, Name};
use crate::error::AnatomyError;
use crate::host::SaveHook;

/// Save file version for compatibility checking
const SAVE_VERSION: u32 = 1;

/// Complete save data structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub anatomies: Vec<AnatomySaveData>,
}

/// One owner's anatomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnatomySaveData {
    pub name: Option<String>,
    pub prefab_names: Vec<String>,
    /// Parts in assembly order
    pub parts: Vec<PartSaveData>,
    pub injuries: InjuredBones,
    pub bones: Bones,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSaveData {
    pub part: AnatomyPart,
    pub skeleton: Option<PartSkeletalDetails>,
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Invalid save data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Anatomy(#[from] AnatomyError),
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "anatomy", "Anatomy") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        PathBuf::from("./saves")
    }
}

/// Path of a save slot inside a directory
pub fn slot_path(dir: &Path, slot: u8) -> PathBuf {
    dir.join(format!("anatomy_{}.json", slot))
}

/// Get the path for a specific save slot
pub fn save_path(slot: u8) -> PathBuf {
    slot_path(&save_directory(), slot)
}

/// Check if a save exists in the given slot
pub fn save_exists(slot: u8) -> bool {
    save_exists_in(&save_directory(), slot)
}

pub fn save_exists_in(dir: &Path, slot: u8) -> bool {
    slot_path(dir, slot).exists()
}

/// Collect every anatomy the system tracks
pub fn extract_save_data<H: SaveHook>(world: &World, system: &AnatomySystem<H>) -> Result<SaveData, SaveError> {
    let mut anatomies = Vec::new();

    for &owner in system.registry().owners() {
        let anatomy = world
            .get::<&Anatomy>(owner)
            .map_err(|_| SaveError::InvalidData(format!("Missing anatomy on {:?}", owner)))?;

        let mut parts = Vec::with_capacity(anatomy.parts.len());
        for &entity in &anatomy.parts {
            let part = world
                .get::<&AnatomyPart>(entity)
                .map_err(|_| SaveError::InvalidData(format!("Missing part component on {:?}", entity)))?;
            let skeleton = world
                .get::<&PartSkeletalDetails>(entity)
                .ok()
                .map(|s| (*s).clone());
            parts.push(PartSaveData { part: (*part).clone(), skeleton });
        }

        anatomies.push(AnatomySaveData {
            name: world.get::<&Name>(owner).ok().map(|n| n.0.clone()),
            prefab_names: anatomy.prefab_names.clone(),
            parts,
            injuries: world
                .get::<&InjuredBones>(owner)
                .map(|i| (*i).clone())
                .unwrap_or_default(),
            bones: world
                .get::<&Bones>(owner)
                .map(|b| (*b).clone())
                .unwrap_or_default(),
        });
    }

    Ok(SaveData {
        version: SAVE_VERSION,
        anatomies,
    })
}

/// Write save data to a file
pub fn write_save(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read save data from a file, rejecting other versions
pub fn read_save(path: &Path) -> Result<SaveData, SaveError> {
    let data = fs::read_to_string(path)?;
    let save: SaveData = serde_json::from_str(&data)?;

    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }

    Ok(save)
}

/// Save all tracked anatomies to a slot
pub fn save_anatomy<H: SaveHook>(world: &World, system: &AnatomySystem<H>, slot: u8) -> Result<PathBuf, SaveError> {
    save_anatomy_in(&save_directory(), world, system, slot)
}

pub fn save_anatomy_in<H: SaveHook>(
    dir: &Path,
    world: &World,
    system: &AnatomySystem<H>,
    slot: u8,
) -> Result<PathBuf, SaveError> {
    let data = extract_save_data(world, system)?;
    let path = slot_path(dir, slot);
    write_save(&path, &data)?;
    log::info!("Anatomy saved to slot {}", slot);
    Ok(path)
}

/// Load anatomy data from a slot
pub fn load_anatomy(slot: u8) -> Result<SaveData, SaveError> {
    load_anatomy_from(&save_directory(), slot)
}

pub fn load_anatomy_from(dir: &Path, slot: u8) -> Result<SaveData, SaveError> {
    let save = read_save(&slot_path(dir, slot))?;
    log::info!("Anatomy loaded from slot {}", slot);
    Ok(save)
}

/// Delete a save slot
pub fn delete_save(slot: u8) -> Result<(), SaveError> {
    delete_save_in(&save_directory(), slot)
}

pub fn delete_save_in(dir: &Path, slot: u8) -> Result<(), SaveError> {
    let path = slot_path(dir, slot);
    if path.exists() {
        fs::remove_file(&path)?;
        log::info!("Deleted save slot {}", slot);
    }
    Ok(())
}

/// Respawn saved anatomies into a world and start tracking them.
/// Returns the new owner entities.
pub fn restore<H: SaveHook>(
    world: &mut World,
    system: &mut AnatomySystem<H>,
    data: &SaveData,
) -> Result<Vec<Entity>, SaveError> {
    let mut owners = Vec::with_capacity(data.anatomies.len());

    for saved in &data.anatomies {
        let owner = world.spawn((Anatomy {
            prefab_names: saved.prefab_names.clone(),
            parts: Vec::new(),
            assembled: true,
        },));
        if let Some(name) = &saved.name {
            let _ = world.insert_one(owner, Name::new(name.clone()));
        }

        let mut parts = Vec::with_capacity(saved.parts.len());
        for part in &saved.parts {
            let entity = world.spawn((part.part.clone(), AnatomyOwner(owner)));
            if let Some(skeleton) = &part.skeleton {
                let _ = world.insert_one(entity, skeleton.clone());
            }
            parts.push(entity);
        }

        if let Ok(mut anatomy) = world.get::<&mut Anatomy>(owner) {
            anatomy.parts = parts;
        }
        let _ = world.insert(owner, (saved.bones.clone(), saved.injuries.clone()));

        system.track(world, owner)?;
        owners.push(owner);
    }

    log::info!("Restored {} anatomies", owners.len());
    Ok(owners)
}
