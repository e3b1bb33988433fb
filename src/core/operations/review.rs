use tracing::info;

use crate::core::error::HubResult;
use crate::core::grouping::mark_done;
use crate::core::storage::DatasetRepository;

/// Mark `group` of `dataset` as reviewed and persist it.
///
/// Fails with `GroupClosed` when the group was already done.
pub fn editing_done(repo: &DatasetRepository, dataset: &str, group: u32) -> HubResult<()> {
    let mut records = repo.read_group(dataset, group)?;
    mark_done(dataset, group, &mut records)?;
    repo.write_group(dataset, group, &records)?;
    info!("Editing of group {} in '{}' is done", group, dataset);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::TranscriptRecord;
    use crate::core::error::HubError;
    use crate::core::operations::ingest_dataset;
    use crate::core::storage::InMemoryStore;

    #[test]
    fn test_editing_done_is_persisted_once() {
        let repo = DatasetRepository::new(InMemoryStore::new());
        let rows: Vec<TranscriptRecord> = (0..6)
            .map(|i| TranscriptRecord::ingested(format!("row {}", i), format!("{}.wav", i)))
            .collect();
        ingest_dataset(&repo, "ds", rows, Vec::new(), 3).unwrap();

        editing_done(&repo, "ds", 2).unwrap();
        assert_eq!(repo.group_statuses("ds").unwrap().editable_groups(), vec![1]);

        let err = editing_done(&repo, "ds", 2).unwrap_err();
        assert!(matches!(err, HubError::GroupClosed { group: 2, .. }));
    }

    #[test]
    fn test_editing_done_on_missing_group() {
        let repo = DatasetRepository::new(InMemoryStore::new());
        let err = editing_done(&repo, "ds", 6).unwrap_err();
        assert!(err.is_recoverable());
    }
}
