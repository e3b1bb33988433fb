use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{channel, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::core::dataset::AnnotationFlag;
use crate::core::error::{HubError, HubResult};
use crate::core::operations::{
    concat_csv_files_for_downloading, upload_audio_files, upload_csv_files, AudioUploadReport,
    IngestReport,
};
use crate::core::storage::{DatasetManifest, DatasetRepository};
use crate::state::{ReviewSession, Settings, TaskMessage, TaskState, UIState};
use crate::ui;
use crate::ui::toast::Toasts;

pub struct TextEditHubApp {
    // Core application state
    pub config: AppConfig,
    pub settings: Settings,
    pub repo: Arc<DatasetRepository>,
    pub session: ReviewSession,
    /// Datasets found in the bucket
    pub datasets: Vec<String>,
    /// Manifest of the selected dataset
    pub manifest: Option<DatasetManifest>,

    // Organized state modules
    pub ui: UIState,
    pub task: TaskState,
    pub toasts: Toasts,
}

impl TextEditHubApp {
    pub fn new(config: AppConfig, settings: Settings, repo: DatasetRepository) -> Self {
        let session = ReviewSession::new(config.rows_per_page);
        let mut app = Self {
            config,
            settings,
            repo: Arc::new(repo),
            session,
            datasets: Vec::new(),
            manifest: None,
            ui: UIState::new(),
            task: TaskState::new(),
            toasts: Toasts::new(),
        };

        app.refresh_datasets();

        // Reopen the last dataset if it is still in the bucket
        if let Some(last) = app.settings.last_dataset.clone() {
            if app.datasets.contains(&last) {
                app.select_dataset(&last);
            } else {
                warn!("Last dataset '{}' is no longer in the bucket", last);
            }
        }

        app
    }

    pub fn refresh_datasets(&mut self) {
        match self.repo.list_datasets() {
            Ok(datasets) => {
                debug!("Bucket holds {} datasets", datasets.len());
                self.datasets = datasets;
            }
            Err(e) => self.report_error("Could not list datasets", &e),
        }
    }

    fn report_error(&mut self, context: &str, err: &HubError) {
        error!("{}: {}", context, err);
        self.toasts.error(format!("{}: {}", context, err));
    }

    /// Adopt the session returned by a command, or report its error.
    /// Returns true when the command succeeded.
    fn apply(&mut self, context: &str, result: HubResult<ReviewSession>) -> bool {
        match result {
            Ok(session) => {
                self.session = session;
                true
            }
            Err(e) => {
                self.report_error(context, &e);
                if matches!(e, HubError::GroupClosed { .. }) {
                    self.reload_board();
                }
                false
            }
        }
    }

    /// Re-read group statuses after another session closed a group
    fn reload_board(&mut self) {
        let Some(dataset) = self.session.dataset.clone() else {
            return;
        };
        match self.repo.group_statuses(&dataset) {
            Ok(board) => {
                self.session.board = board;
                let open = self.session.group.as_ref().map(|group| group.id);
                if let Some(group) = open {
                    if self.session.board.status(group).is_some_and(|s| s.is_done()) {
                        info!("Group {} was finished elsewhere, closing it", group);
                        self.session.group = None;
                        self.session.page = 0;
                    }
                }
            }
            Err(e) => error!("Could not reload group statuses of '{}': {}", dataset, e),
        }
    }

    /// Save pending edits before leaving the open group
    fn save_before_leaving(&mut self) -> bool {
        if !self.session.is_dirty() {
            return true;
        }
        let result = self.session.save(&self.repo);
        self.apply("Could not save edits", result)
    }

    pub fn select_dataset(&mut self, dataset: &str) {
        if !self.save_before_leaving() {
            return;
        }
        let result = self.session.select_dataset(&self.repo, dataset);
        if self.apply("Could not open dataset", result) {
            self.manifest = match self.repo.read_manifest(dataset) {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    warn!("No manifest for '{}': {}", dataset, e);
                    None
                }
            };
            self.settings.last_dataset = Some(dataset.to_string());
            self.settings.save();
        }
    }

    pub fn select_group(&mut self, group: u32) {
        if !self.save_before_leaving() {
            return;
        }
        let result = self.session.select_group(&self.repo, group);
        self.apply("Could not open group", result);
    }

    pub fn edit_text(&mut self, row: usize, text: &str) {
        let result = self.session.edit_text(row, text);
        self.apply("Could not edit row", result);
    }

    pub fn toggle_flag(&mut self, row: usize, flag: AnnotationFlag) {
        let result = self.session.toggle_flag(row, flag);
        self.apply("Could not change flag", result);
    }

    pub fn next_page(&mut self) {
        let result = self.session.next_page(&self.repo);
        self.apply("Could not save page", result);
    }

    pub fn prev_page(&mut self) {
        let result = self.session.prev_page();
        self.apply("Could not go back", result);
    }

    pub fn save(&mut self) {
        let was_dirty = self.session.is_dirty();
        let result = self.session.save(&self.repo);
        if self.apply("Could not save edits", result) && was_dirty {
            self.toasts.success("Edits saved");
        }
    }

    pub fn finish_group(&mut self) {
        let Some(group) = self.session.group.as_ref().map(|group| group.id) else {
            return;
        };
        let result = self.session.finish_group(&self.repo);
        if self.apply("Could not finish group", result) {
            self.toasts.success(format!("Group {} is done", group));
            if self.session.board.all_done() {
                self.toasts.info("Every group of this dataset is done");
            }
        }
    }

    /// Upload a dataset folder in the background: audio first, then the CSVs.
    pub fn start_upload(&mut self, folder: PathBuf, group_size: usize) {
        if self.task.is_running() {
            warn!("A background job is already running");
            return;
        }
        info!("Uploading {:?} with group size {}", folder, group_size);
        self.settings.last_group_size = group_size;
        self.settings.save();

        let (tx, rx) = channel();
        self.task.start(format!("Uploading {}", folder.display()), rx);
        let repo = Arc::clone(&self.repo);

        thread::spawn(move || {
            let _ = tx.send(TaskMessage::Progress("Uploading audio clips".to_string()));
            let result = upload_audio_files(&repo, &folder).and_then(|audio| {
                let _ = tx.send(TaskMessage::Progress(format!(
                    "Uploaded {} clips, splitting transcripts into groups",
                    audio.uploaded
                )));
                upload_csv_files(&repo, &folder, group_size).map(|report| (audio, report))
            });
            let _ = tx.send(TaskMessage::Ingested(result));
        });
    }

    /// Export the selected dataset into `destination` in the background.
    pub fn start_export(&mut self, destination: PathBuf) {
        let Some(dataset) = self.session.dataset.clone() else {
            return;
        };
        if self.task.is_running() {
            warn!("A background job is already running");
            return;
        }
        if !self.save_before_leaving() {
            return;
        }
        self.settings.last_export_dir = Some(destination.clone());
        self.settings.save();

        let (tx, rx) = channel();
        self.task.start(format!("Exporting {}", dataset), rx);
        let repo = Arc::clone(&self.repo);

        thread::spawn(move || {
            let _ = tx.send(TaskMessage::Progress("Reassembling groups".to_string()));
            let result = concat_csv_files_for_downloading(&repo, &dataset, &destination);
            let _ = tx.send(TaskMessage::Exported(result));
        });
    }

    /// Drain messages from the background job
    fn poll_task(&mut self) {
        let mut messages = Vec::new();
        let mut disconnected = false;
        if let Some(receiver) = &self.task.receiver {
            loop {
                match receiver.try_recv() {
                    Ok(message) => messages.push(message),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        for message in messages {
            match message {
                TaskMessage::Progress(line) => {
                    debug!("Task progress: {}", line);
                    self.task.progress = Some(line);
                }
                TaskMessage::Ingested(result) => {
                    self.task.finish();
                    self.on_ingested(result);
                }
                TaskMessage::Exported(result) => {
                    self.task.finish();
                    match result {
                        Ok(report) => {
                            let mut message = format!(
                                "Exported {} train and {} val rows",
                                report.train_rows, report.val_rows
                            );
                            if !report.open_groups.is_empty() {
                                message.push_str(&format!(
                                    " ({} groups still open)",
                                    report.open_groups.len()
                                ));
                            }
                            self.toasts.success(message);
                        }
                        Err(e) => self.report_error("Export failed", &e),
                    }
                }
            }
        }

        // Worker exited without a final message (panicked)
        if disconnected && self.task.is_running() {
            let label = self.task.running.clone().unwrap_or_default();
            self.task.finish();
            error!("Background job '{}' stopped without a result", label);
            self.toasts
                .error(format!("{} stopped unexpectedly, check the log", label));
        }
    }

    /// Drop the open session when its dataset was re-ingested
    fn discard_replaced_session(&mut self, dataset: &str) {
        if self.session.dataset.as_deref() != Some(dataset) {
            return;
        }
        if let Some(group) = self.session.group.as_ref().filter(|group| group.dirty) {
            warn!(
                "Re-upload of '{}' discarded unsaved edits in group {}",
                dataset, group.id
            );
            self.toasts.error(format!(
                "Unsaved edits in group {} were discarded by the new upload",
                group.id
            ));
        }
        self.session = self.session.reset();
    }

    fn on_ingested(&mut self, result: HubResult<(AudioUploadReport, IngestReport)>) {
        match result {
            Ok((audio, report)) => {
                self.toasts.success(format!(
                    "'{}': {} clips, {} rows in {} groups",
                    report.dataset,
                    audio.uploaded,
                    report.train_rows + report.val_rows,
                    report.groups
                ));
                if report.missing_audio > 0 {
                    self.toasts
                        .info(format!("{} rows have no audio clip", report.missing_audio));
                }
                self.refresh_datasets();

                // The open dataset was replaced, start over on the new groups
                self.discard_replaced_session(&report.dataset);
                self.select_dataset(&report.dataset);
            }
            Err(e) => self.report_error("Upload failed", &e),
        }
    }
}

impl eframe::App for TextEditHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_task();

        ui::render_top_panel(self, ctx);
        ui::render_bottom_panel(self, ctx);
        ui::render_group_panel(self, ctx);
        ui::render_central_panel(self, ctx);

        ui::render_upload_dialog(self, ctx);
        ui::render_finish_confirmation(self, ctx);
        ui::render_task_progress(self, ctx);
        ui::render_toasts(self, ctx);

        ui::handle_keyboard_shortcuts(self, ctx);
    }
}
