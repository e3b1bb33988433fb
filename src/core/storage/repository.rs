use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::dataset::{read_group_file, write_records, TranscriptRecord};
use crate::core::error::{HubError, HubResult};
use crate::core::grouping::{CompletionBoard, GroupStatus, SplitLayout};

use super::layout::{
    audio_path, csv_path, csv_prefix, group_file_name, parse_group_file_name,
    validate_dataset_name, validate_file_name, CSV_ROOT, MANIFEST_FILE,
};
use super::{ObjectStore, CSV_CONTENT_TYPE, JSON_CONTENT_TYPE, WAV_CONTENT_TYPE};

/// Split layout recorded at ingestion, needed to reassemble a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    #[serde(flatten)]
    pub layout: SplitLayout,
    pub total_groups: usize,
    pub created_at: DateTime<Utc>,
}

impl DatasetManifest {
    pub fn new(layout: SplitLayout) -> Self {
        Self {
            total_groups: layout.total_groups(),
            layout,
            created_at: Utc::now(),
        }
    }
}

/// Dataset-level view of an object store
pub struct DatasetRepository {
    store: Box<dyn ObjectStore>,
}

impl DatasetRepository {
    pub fn new(store: impl ObjectStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Dataset names that have a folder under `csv_files/`
    pub fn list_datasets(&self) -> HubResult<Vec<String>> {
        let prefix = format!("{}/", CSV_ROOT);
        let names: BTreeSet<String> = self
            .store
            .list(&prefix)?
            .iter()
            .filter_map(|path| {
                let rest = path.strip_prefix(&prefix)?;
                let (dataset, _) = rest.split_once('/')?;
                Some(dataset.to_string())
            })
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Group ids that have a `group_<n>.csv` file
    pub fn list_group_files(&self, dataset: &str) -> HubResult<BTreeSet<u32>> {
        validate_dataset_name(dataset)?;
        let prefix = csv_prefix(dataset);
        Ok(self
            .store
            .list(&prefix)?
            .iter()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .filter_map(parse_group_file_name)
            .collect())
    }

    pub fn read_file(&self, dataset: &str, file_name: &str) -> HubResult<Vec<u8>> {
        validate_dataset_name(dataset)?;
        validate_file_name(file_name)?;
        self.store.read(&csv_path(dataset, file_name))
    }

    pub fn write_file(&self, dataset: &str, file_name: &str, bytes: &[u8]) -> HubResult<()> {
        validate_dataset_name(dataset)?;
        validate_file_name(file_name)?;
        let content_type = if file_name.ends_with(".json") {
            JSON_CONTENT_TYPE
        } else {
            CSV_CONTENT_TYPE
        };
        self.store.write(&csv_path(dataset, file_name), bytes, content_type)
    }

    pub fn delete_file(&self, dataset: &str, file_name: &str) -> HubResult<()> {
        validate_dataset_name(dataset)?;
        validate_file_name(file_name)?;
        self.store.delete(&csv_path(dataset, file_name))
    }

    /// Upload one audio clip to `audio_files/<dataset>/<file_name>`
    pub fn upload_audio(&self, dataset: &str, file_name: &str, bytes: &[u8]) -> HubResult<()> {
        validate_dataset_name(dataset)?;
        validate_file_name(file_name)?;
        self.store.write(&audio_path(dataset, file_name), bytes, WAV_CONTENT_TYPE)
    }

    /// Public link of an uploaded clip, `None` when the clip does not exist
    pub fn derive_audio_link(
        &self,
        dataset: &str,
        audio_file_name: &str,
    ) -> HubResult<Option<String>> {
        validate_dataset_name(dataset)?;
        if validate_file_name(audio_file_name).is_err() {
            warn!("Audio reference '{}' is not a file name", audio_file_name);
            return Ok(None);
        }

        let path = audio_path(dataset, audio_file_name);
        if !self.store.exists(&path)? {
            warn!("Audio clip '{}' not found, leaving link empty", path);
            return Ok(None);
        }
        let token = match self.store.download_token(&path) {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("Audio clip '{}' has no download token", path);
                return Ok(None);
            }
            Err(e) if e.is_recoverable() => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(Some(self.store.public_url(&path, &token)))
    }

    pub fn read_group(&self, dataset: &str, group: u32) -> HubResult<Vec<TranscriptRecord>> {
        let records = read_group_file(&self.read_file(dataset, &group_file_name(group))?)?;
        if let Some(stray) = records.iter().find(|record| record.group != group) {
            return Err(HubError::MalformedCsv(format!(
                "{} contains a row of group {}",
                group_file_name(group),
                stray.group
            )));
        }
        debug!("Read group {} of '{}' ({} rows)", group, dataset, records.len());
        Ok(records)
    }

    pub fn write_group(
        &self,
        dataset: &str,
        group: u32,
        records: &[TranscriptRecord],
    ) -> HubResult<()> {
        if let Some(stray) = records.iter().find(|record| record.group != group) {
            return Err(HubError::InvalidConfiguration(format!(
                "row of group {} cannot be written to {}",
                stray.group,
                group_file_name(group)
            )));
        }
        self.write_file(dataset, &group_file_name(group), &write_records(records)?)?;
        debug!("Wrote group {} of '{}' ({} rows)", group, dataset, records.len());
        Ok(())
    }

    pub fn read_manifest(&self, dataset: &str) -> HubResult<DatasetManifest> {
        let bytes = self.read_file(dataset, MANIFEST_FILE)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn write_manifest(&self, dataset: &str, manifest: &DatasetManifest) -> HubResult<()> {
        let bytes = serde_json::to_vec_pretty(manifest)?;
        self.write_file(dataset, MANIFEST_FILE, &bytes)?;
        info!(
            "Manifest of '{}' written: {} train, {} val, {} groups of {}",
            dataset,
            manifest.layout.train_len,
            manifest.layout.val_len,
            manifest.total_groups,
            manifest.layout.group_size
        );
        Ok(())
    }

    /// Completion status of every group file of `dataset`
    pub fn group_statuses(&self, dataset: &str) -> HubResult<CompletionBoard> {
        let mut board = CompletionBoard::new();
        for group in self.list_group_files(dataset)? {
            let records = self.read_group(dataset, group)?;
            board.insert(group, GroupStatus::of(&records));
        }
        Ok(board)
    }
}
