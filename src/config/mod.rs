mod app_config;

pub use app_config::{project_dirs, AppConfig, DEFAULT_GROUP_SIZE};
