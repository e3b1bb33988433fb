use std::path::PathBuf;
use tracing::{error, info};

mod app;
mod config;
mod core;
mod logging;
mod navigation;
mod state;
mod ui;

use app::TextEditHubApp;
use config::{project_dirs, AppConfig};
use crate::core::storage::{DatasetRepository, LocalObjectStore};
use state::Settings;

fn main() -> Result<(), eframe::Error> {
    let log_dir = project_dirs()
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    if let Err(e) = logging::setup_logging(&log_dir) {
        eprintln!("Failed to set up logging in {:?}: {}", log_dir, e);
    }

    let config = AppConfig::default();
    let settings = Settings::load();

    let storage_root = settings
        .storage_root
        .clone()
        .unwrap_or_else(|| config.default_storage_root.clone());
    let store = match LocalObjectStore::open(&storage_root) {
        Ok(store) => match &settings.public_base_url {
            Some(base_url) => store.with_public_base_url(base_url.as_str()),
            None => store,
        },
        Err(e) => {
            error!("Could not open bucket at {:?}: {}", storage_root, e);
            std::process::exit(1);
        }
    };
    info!("Using bucket '{}' at {:?}", config.bucket_name, store.root());
    let repo = DatasetRepository::new(store);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([config.window_width / 2.0, config.window_height / 2.0])
            .with_title("CSV TextEdit Hub"),
        ..Default::default()
    };

    info!("Launching application window");
    eframe::run_native(
        "CSV TextEdit Hub",
        options,
        Box::new(move |cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(TextEditHubApp::new(config, settings, repo)))
        }),
    )
}
