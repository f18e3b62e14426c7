//! Save/load system
//!
//! Persists anatomies to JSON save slots.

pub mod save_game;

pub use save_game::{
    AnatomySaveData, PartSaveData, SaveData, SaveError,
    delete_save, delete_save_in, extract_save_data, load_anatomy, load_anatomy_from,
    read_save, restore, save_anatomy, save_anatomy_in, save_directory, save_exists,
    save_exists_in, save_path, slot_path, write_save,
};
