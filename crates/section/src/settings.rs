//! Compiler settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Limits and resource locations for one compiler instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Upper bound on cells in a single unit grid
    pub max_grid_cells: usize,
    /// Directory texture paths are resolved against
    pub texture_root: PathBuf,
    /// Textures larger than this are not loaded
    pub max_texture_bytes: u64,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            max_grid_cells: 250_000,
            texture_root: PathBuf::from("."),
            max_texture_bytes: 16 * 1024 * 1024,
        }
    }
}

impl CompilerSettings {
    /// Platform config location: `<config dir>/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "section", "section")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from a JSON file; missing or broken files give defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    tracing::debug!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Invalid settings file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::debug!("No settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load from the platform config location, if there is one
    pub fn load_default() -> Self {
        Self::default_path()
            .map(|p| Self::load(&p))
            .unwrap_or_default()
    }
}
