use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::dataset::{write_records, Dataset, DatasetSplit};
use crate::core::error::HubResult;
use crate::core::grouping::{reassemble, GroupStatus};
use crate::core::storage::DatasetRepository;

use super::file_ops::write_local_file;

/// Outcome of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub dataset: String,
    pub train_rows: usize,
    pub val_rows: usize,
    /// Groups still open at export time
    pub open_groups: Vec<u32>,
    pub train_path: PathBuf,
    pub val_path: PathBuf,
}

/// Pull every group file of `dataset` and rebuild its train/val splits.
///
/// Returns the dataset together with the ids of groups not yet marked done.
pub fn reassemble_dataset(
    repo: &DatasetRepository,
    dataset: &str,
) -> HubResult<(Dataset, Vec<u32>)> {
    let manifest = repo.read_manifest(dataset)?;

    let mut group_files = Vec::new();
    let mut open_groups = Vec::new();
    for group in repo.list_group_files(dataset)? {
        let records = repo.read_group(dataset, group)?;
        if !GroupStatus::of(&records).is_done() {
            open_groups.push(group);
        }
        group_files.push(records);
    }

    let (train, val) = reassemble(dataset, group_files, &manifest.layout)?;
    Ok((Dataset::new(dataset, train, val), open_groups))
}

/// Reassemble `dataset`, save `<dataset>_train.csv` and `<dataset>_val.csv`
/// into `destination`, and refresh the whole-split files in the bucket.
pub fn concat_csv_files_for_downloading(
    repo: &DatasetRepository,
    dataset: &str,
    destination: &Path,
) -> HubResult<ExportReport> {
    let (reassembled, open_groups) = reassemble_dataset(repo, dataset)?;
    if !open_groups.is_empty() {
        warn!(
            "Exporting '{}' with groups {:?} still under review",
            dataset, open_groups
        );
    }

    let train_bytes = write_records(reassembled.split(DatasetSplit::Train))?;
    let val_bytes = write_records(reassembled.split(DatasetSplit::Val))?;

    repo.write_file(dataset, &DatasetSplit::Train.file_name(), &train_bytes)?;
    repo.write_file(dataset, &DatasetSplit::Val.file_name(), &val_bytes)?;

    let train_name = format!("{}_train.csv", dataset);
    let val_name = format!("{}_val.csv", dataset);
    let train_path = write_local_file(destination, &train_name, &train_bytes)?;
    let val_path = write_local_file(destination, &val_name, &val_bytes)?;

    info!(
        "Exported '{}': {} train rows to {:?}, {} val rows to {:?}",
        dataset,
        reassembled.train.len(),
        train_path,
        reassembled.val.len(),
        val_path
    );
    Ok(ExportReport {
        dataset: dataset.to_string(),
        train_rows: reassembled.train.len(),
        val_rows: reassembled.val.len(),
        open_groups,
        train_path,
        val_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::{read_group_file, TranscriptRecord};
    use crate::core::error::HubError;
    use crate::core::operations::{editing_done, ingest_dataset};
    use crate::core::storage::layout::group_file_name;
    use crate::core::storage::InMemoryStore;
    use std::fs;
    use tempfile::tempdir;

    fn source_rows(prefix: &str, count: usize) -> Vec<TranscriptRecord> {
        (0..count)
            .map(|i| TranscriptRecord::ingested(format!("{} {}", prefix, i), format!("{}_{}.wav", prefix, i)))
            .collect()
    }

    fn ingested_repo() -> DatasetRepository {
        let repo = DatasetRepository::new(InMemoryStore::new());
        ingest_dataset(&repo, "ds", source_rows("train", 120), source_rows("val", 30), 50).unwrap();
        repo
    }

    #[test]
    fn test_export_restores_split_sizes() {
        let repo = ingested_repo();
        let temp = tempdir().unwrap();

        let report = concat_csv_files_for_downloading(&repo, "ds", temp.path()).unwrap();
        assert_eq!(report.train_rows, 120);
        assert_eq!(report.val_rows, 30);
        assert_eq!(report.open_groups, vec![1, 2, 3]);

        let train = read_group_file(&fs::read(&report.train_path).unwrap()).unwrap();
        assert_eq!(train.len(), 120);
        assert_eq!(train[119].text, "train 119");
        let val = read_group_file(&fs::read(&report.val_path).unwrap()).unwrap();
        assert_eq!(val[0].text, "val 0");
        assert!(val.iter().all(|r| r.group == 3));

        assert!(repo.store().exists("csv_files/ds/train.csv").unwrap());
        assert!(repo.store().exists("csv_files/ds/val.csv").unwrap());
    }

    #[test]
    fn test_done_group_still_exported() {
        let repo = ingested_repo();
        editing_done(&repo, "ds", 2).unwrap();

        let (dataset, open_groups) = reassemble_dataset(&repo, "ds").unwrap();
        assert_eq!(open_groups, vec![1, 3]);
        assert_eq!(dataset.train.len() + dataset.val.len(), 150);
        assert!(dataset.train[50..100].iter().all(|r| r.edit_status));
        assert!(!dataset.train[0].edit_status);
    }

    #[test]
    fn test_export_with_missing_group_fails() {
        let repo = ingested_repo();
        repo.delete_file("ds", &group_file_name(3)).unwrap();
        let temp = tempdir().unwrap();

        let err = concat_csv_files_for_downloading(&repo, "ds", temp.path()).unwrap_err();
        assert!(matches!(err, HubError::IncompleteDataset { ref missing, .. } if missing == &vec![3]));
        assert!(!temp.path().join("ds_train.csv").exists());
    }

    #[test]
    fn test_export_without_manifest_is_not_found() {
        let repo = DatasetRepository::new(InMemoryStore::new());
        let temp = tempdir().unwrap();
        let err = concat_csv_files_for_downloading(&repo, "ds", temp.path()).unwrap_err();
        assert!(matches!(err, HubError::NotFound { .. }));
    }
}
