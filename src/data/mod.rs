//! Data loading and external anatomy content
//!
//! Part templates and configuration live in RON files so creatures can be
//! described without recompiling.

pub mod loader;
pub mod parts;

pub use loader::{export_default_data, DataManager, DATA_DIR};
pub use parts::{default_part_templates, PartTemplate, PartTemplates};
