//! Upload of a local dataset folder into the bucket.
//!
//! Audio clips go first so that every row can resolve its `audio_link`.
//! CSV ingestion then snapshots `raw_text`, partitions train+val into review
//! groups and writes one file per group plus the dataset manifest.

use std::path::Path;

use tracing::{info, warn};

use crate::core::dataset::{read_source_file, DatasetSplit, TranscriptRecord};
use crate::core::error::{HubError, HubResult};
use crate::core::grouping::{label_records, materialize_groups, partition};
use crate::core::storage::layout::{group_file_name, validate_dataset_name};
use crate::core::storage::{DatasetManifest, DatasetRepository};

use super::file_ops::{folder_name, list_wav_files, read_local_file};

/// Outcome of an audio folder upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUploadReport {
    pub dataset: String,
    pub uploaded: usize,
}

/// Outcome of a CSV ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub dataset: String,
    pub train_rows: usize,
    pub val_rows: usize,
    pub groups: usize,
    /// Rows whose audio clip was not found in the bucket
    pub missing_audio: usize,
    /// Group files of an earlier ingestion that no longer exist in the new layout
    pub removed_groups: Vec<u32>,
}

fn dataset_name_of(folder: &Path) -> HubResult<String> {
    let name = folder_name(folder).ok_or_else(|| {
        HubError::InvalidConfiguration(format!("{:?} has no usable folder name", folder))
    })?;
    validate_dataset_name(&name)?;
    Ok(name)
}

/// Upload every `.wav` of `folder` to `audio_files/<folder name>/`.
pub fn upload_audio_files(repo: &DatasetRepository, folder: &Path) -> HubResult<AudioUploadReport> {
    let dataset = dataset_name_of(folder)?;
    let files = list_wav_files(folder)?;

    let mut uploaded = 0;
    for file in &files {
        let Some(file_name) = file.file_name().and_then(|name| name.to_str()) else {
            warn!("Skipping clip with a non UTF-8 name: {:?}", file);
            continue;
        };
        let bytes = read_local_file(file)?;
        repo.upload_audio(&dataset, file_name, &bytes)?;
        uploaded += 1;
    }

    if uploaded < files.len() {
        warn!("Skipped {} of {} clips for '{}'", files.len() - uploaded, files.len(), dataset);
    }
    info!("Uploaded {} audio clips for '{}'", uploaded, dataset);
    Ok(AudioUploadReport { dataset, uploaded })
}

/// Fill `audio_link` of every row; missing clips leave the link empty.
/// Returns the number of rows without a clip.
fn resolve_audio_links(
    repo: &DatasetRepository,
    dataset: &str,
    records: &mut [TranscriptRecord],
) -> HubResult<usize> {
    let mut missing = 0;
    for record in records.iter_mut() {
        record.audio_link = match record.audio_file_name() {
            Some(file_name) => repo.derive_audio_link(dataset, file_name)?,
            None => None,
        };
        if record.audio_link.is_none() {
            missing += 1;
        }
    }
    Ok(missing)
}

/// Partition `train` + `val` into groups and write them to the bucket.
///
/// Group files left over from an earlier ingestion with more groups are
/// deleted so that the dataset folder only holds the new layout.
pub fn ingest_dataset(
    repo: &DatasetRepository,
    dataset: &str,
    mut train: Vec<TranscriptRecord>,
    mut val: Vec<TranscriptRecord>,
    group_size: usize,
) -> HubResult<IngestReport> {
    validate_dataset_name(dataset)?;
    let assignment = partition(train.len(), val.len(), group_size)?;

    let mut missing_audio = resolve_audio_links(repo, dataset, &mut train)?;
    missing_audio += resolve_audio_links(repo, dataset, &mut val)?;
    if missing_audio > 0 {
        warn!("{} rows of '{}' have no audio clip", missing_audio, dataset);
    }

    label_records(&mut train, &mut val, &assignment)?;
    let groups = materialize_groups(&train, &val, &assignment)?;
    for (group, records) in &groups {
        repo.write_group(dataset, *group, records)?;
    }
    repo.write_manifest(dataset, &DatasetManifest::new(assignment.layout()))?;

    let mut removed_groups = Vec::new();
    for stale in repo.list_group_files(dataset)? {
        if stale as usize > assignment.total_groups() {
            repo.delete_file(dataset, &group_file_name(stale))?;
            removed_groups.push(stale);
        }
    }
    if !removed_groups.is_empty() {
        info!("Removed stale groups {:?} of '{}'", removed_groups, dataset);
    }

    info!(
        "Ingested '{}': {} train + {} val rows into {} groups of {}",
        dataset,
        train.len(),
        val.len(),
        groups.len(),
        group_size
    );
    Ok(IngestReport {
        dataset: dataset.to_string(),
        train_rows: train.len(),
        val_rows: val.len(),
        groups: groups.len(),
        missing_audio,
        removed_groups,
    })
}

/// Read `train.csv` and `val.csv` from `folder` and ingest them as the
/// dataset named after the folder.
pub fn upload_csv_files(
    repo: &DatasetRepository,
    folder: &Path,
    group_size: usize,
) -> HubResult<IngestReport> {
    let dataset = dataset_name_of(folder)?;
    if group_size < 1 {
        return Err(HubError::InvalidConfiguration(
            "group size must be at least 1".to_string(),
        ));
    }

    let train = read_source_file(&read_local_file(&folder.join(DatasetSplit::Train.file_name()))?)?;
    let val = read_source_file(&read_local_file(&folder.join(DatasetSplit::Val.file_name()))?)?;
    info!(
        "Read {} train and {} val rows from {:?}",
        train.len(),
        val.len(),
        folder
    );

    ingest_dataset(repo, &dataset, train, val, group_size)
}
