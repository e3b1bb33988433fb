use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{project_dirs, DEFAULT_GROUP_SIZE};

/// Persistent user settings that are saved between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder backing the local bucket
    #[serde(default)]
    pub storage_root: Option<PathBuf>,

    /// Base URL the bucket is served from; `file://` links when unset
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Last dataset that was selected
    #[serde(default)]
    pub last_dataset: Option<String>,

    /// Group size used for the last upload
    #[serde(default = "default_group_size")]
    pub last_group_size: usize,

    /// Last folder picked for export
    #[serde(default)]
    pub last_export_dir: Option<PathBuf>,

    /// Last window width
    pub window_width: f32,

    /// Last window height
    pub window_height: f32,
}

fn default_group_size() -> usize {
    DEFAULT_GROUP_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_root: None,
            public_base_url: None,
            last_dataset: None,
            last_group_size: default_group_size(),
            last_export_dir: None,
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl Settings {
    /// Get the path to the settings file in the user's config directory
    pub fn get_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from disk, or return defaults if file doesn't exist or is corrupted
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(config_path) => Self::load_from(&config_path),
            None => {
                warn!("Could not determine config directory. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn load_from(config_path: &Path) -> Self {
        info!("Loading settings from: {:?}", config_path);

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(settings) => {
                    info!("Successfully loaded settings");
                    return settings;
                }
                Err(e) => {
                    warn!("Failed to parse settings file: {}. Using defaults.", e);
                }
            },
            Err(e) => {
                // It's normal for the file not to exist on first run
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read settings file: {}. Using defaults.", e);
                } else {
                    info!("No settings file found. Using defaults.");
                }
            }
        }

        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self) {
        match Self::get_config_path() {
            Some(config_path) => self.save_to(&config_path),
            None => warn!("Could not determine config directory. Settings not saved."),
        }
    }

    pub fn save_to(&self, config_path: &Path) {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(config_path, json) {
                    warn!("Failed to write settings file: {}", e);
                } else {
                    info!("Settings saved to: {:?}", config_path);
                }
            }
            Err(e) => {
                warn!("Failed to serialize settings: {}", e);
            }
        }
    }
}
