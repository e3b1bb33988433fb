use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use crate::core::error::HubResult;
use crate::core::operations::{AudioUploadReport, ExportReport, IngestReport};

/// Messages sent back by background upload and export jobs
pub enum TaskMessage {
    /// Free-form progress line shown in the task window
    Progress(String),
    Ingested(HubResult<(AudioUploadReport, IngestReport)>),
    Exported(HubResult<ExportReport>),
}

/// UI-related state for dialogs and user input
#[derive(Debug, Default)]
pub struct UIState {
    /// Folder waiting for the group size dialog
    pub pending_upload: Option<PathBuf>,
    /// Group size input field content
    pub group_size_input: String,
    /// Whether the finish group confirmation is shown
    pub show_finish_confirm: bool,
}

impl UIState {
    /// Create a new UIState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the group size dialog for `folder`
    pub fn request_upload(&mut self, folder: PathBuf, group_size: usize) {
        self.pending_upload = Some(folder);
        self.group_size_input = group_size.to_string();
    }

    /// Parsed group size input; `None` unless it is a whole number of at least one
    pub fn parsed_group_size(&self) -> Option<usize> {
        self.group_size_input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|size| *size >= 1)
    }
}

/// Background job state including progress reporting
#[derive(Default)]
pub struct TaskState {
    /// Label of the running job
    pub running: Option<String>,
    /// Last progress line
    pub progress: Option<String>,
    /// Channel receiver for messages from the background thread
    pub(crate) receiver: Option<Receiver<TaskMessage>>,
}

impl TaskState {
    /// Create a new TaskState with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn start(&mut self, label: impl Into<String>, receiver: Receiver<TaskMessage>) {
        self.running = Some(label.into());
        self.progress = None;
        self.receiver = Some(receiver);
    }

    pub fn finish(&mut self) {
        self.running = None;
        self.progress = None;
        self.receiver = None;
    }
}
