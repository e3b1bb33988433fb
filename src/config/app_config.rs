use directories::ProjectDirs;
use std::path::PathBuf;

/// Group size proposed when uploading a new dataset
pub const DEFAULT_GROUP_SIZE: usize = 50;

/// Project directories of the application (settings, logs, local bucket)
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "csv-textedit-hub")
}

/// Application configuration containing all hardcoded values
///
/// Values the reviewer can change at runtime live in `Settings`; this struct
/// holds the defaults they start from.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Folder backing the local bucket when settings do not name one
    pub default_storage_root: PathBuf,
    /// Name shown for the bucket in the UI and logs
    pub bucket_name: String,
    /// Rows shown per page while reviewing a group
    pub rows_per_page: usize,
    pub window_width: f32,
    pub window_height: f32,
    pub side_panel_width: f32,
    /// Seconds a toast stays on screen
    pub toast_seconds: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let default_storage_root = project_dirs()
            .map(|dirs| dirs.data_dir().join("bucket"))
            .unwrap_or_else(|| PathBuf::from("bucket"));

        Self {
            default_storage_root,
            bucket_name: "local-bucket".to_string(),
            rows_per_page: 10,
            window_width: 1200.0,
            window_height: 800.0,
            side_panel_width: 260.0,
            toast_seconds: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.rows_per_page, 10);
        assert!(config.default_storage_root.ends_with("bucket"));
    }
}
