use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::core::dataset::TranscriptRecord;
use crate::core::error::{HubError, HubResult};

use super::SplitLayout;

/// Check that `group_files` holds every group of `layout` exactly once and
/// that each group still has its original row count.
fn check_complete(
    dataset: &str,
    group_files: &[Vec<TranscriptRecord>],
    layout: &SplitLayout,
) -> HubResult<()> {
    let expected_groups = layout.total_groups() as u32;

    // how many files contain each group id
    let mut files_per_group: BTreeMap<u32, usize> = BTreeMap::new();
    for file in group_files {
        let ids: BTreeSet<u32> = file.iter().map(|record| record.group).collect();
        for id in ids {
            *files_per_group.entry(id).or_default() += 1;
        }
    }

    if let Some(unexpected) = files_per_group
        .keys()
        .copied()
        .find(|id| *id == 0 || *id > expected_groups)
    {
        return Err(HubError::SizeMismatch {
            context: format!("group ids of '{}' (found group {})", dataset, unexpected),
            expected: expected_groups as usize,
            actual: files_per_group.len(),
        });
    }

    let missing: Vec<u32> = (1..=expected_groups)
        .filter(|id| !files_per_group.contains_key(id))
        .collect();
    let duplicated: Vec<u32> = files_per_group
        .iter()
        .filter(|(_, files)| **files > 1)
        .map(|(id, _)| *id)
        .collect();

    if !missing.is_empty() || !duplicated.is_empty() {
        warn!(
            "Dataset '{}' cannot be reassembled: missing {:?}, duplicated {:?}",
            dataset, missing, duplicated
        );
        return Err(HubError::IncompleteDataset {
            dataset: dataset.to_string(),
            missing,
            duplicated,
        });
    }

    let mut rows_per_group: BTreeMap<u32, usize> = BTreeMap::new();
    for record in group_files.iter().flatten() {
        *rows_per_group.entry(record.group).or_default() += 1;
    }
    for (group, rows) in rows_per_group {
        let expected = layout.group_len(group);
        if rows != expected {
            return Err(HubError::SizeMismatch {
                context: format!("group {} of '{}'", group, dataset),
                expected,
                actual: rows,
            });
        }
    }

    Ok(())
}

/// Rebuild `(train, val)` from the complete set of group files of a dataset.
///
/// Rows are concatenated, stable-sorted by group and cut at `train_len`, so
/// the row order inside each group is kept.
///
/// # Errors
/// * `IncompleteDataset` if a group is missing or appears in more than one file
/// * `SizeMismatch` if the row counts disagree with the recorded layout
pub fn reassemble(
    dataset: &str,
    group_files: Vec<Vec<TranscriptRecord>>,
    layout: &SplitLayout,
) -> HubResult<(Vec<TranscriptRecord>, Vec<TranscriptRecord>)> {
    check_complete(dataset, &group_files, layout)?;

    let mut rows: Vec<TranscriptRecord> = group_files.into_iter().flatten().collect();
    if rows.len() != layout.total() || layout.train_len > rows.len() {
        return Err(HubError::SizeMismatch {
            context: format!("reassembled '{}'", dataset),
            expected: layout.total(),
            actual: rows.len(),
        });
    }

    rows.sort_by_key(|record| record.group);
    let val = rows.split_off(layout.train_len);

    debug!(
        "Reassembled '{}': {} train rows, {} val rows",
        dataset,
        rows.len(),
        val.len()
    );
    Ok((rows, val))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grouping::{label_records, materialize_groups, partition, GroupAssignment};

    fn rows(prefix: &str, count: usize) -> Vec<TranscriptRecord> {
        (0..count)
            .map(|i| {
                TranscriptRecord::ingested(format!("{}-{}", prefix, i), format!("{}/{}.wav", prefix, i))
            })
            .collect()
    }

    fn labelled(
        train: &[TranscriptRecord],
        val: &[TranscriptRecord],
        assignment: &GroupAssignment,
    ) -> (Vec<TranscriptRecord>, Vec<TranscriptRecord>) {
        let mut train = train.to_vec();
        let mut val = val.to_vec();
        label_records(&mut train, &mut val, assignment).unwrap();
        (train, val)
    }

    #[test]
    fn test_round_trip_restores_splits() {
        let shapes = [(120, 30, 50), (0, 7, 3), (9, 0, 4), (5, 5, 1), (3, 2, 100)];
        for (train_len, val_len, group_size) in shapes {
            let train = rows("train", train_len);
            let val = rows("val", val_len);
            let assignment = partition(train_len, val_len, group_size).unwrap();

            let groups = materialize_groups(&train, &val, &assignment).unwrap();
            // groups come back in arbitrary order
            let files: Vec<Vec<TranscriptRecord>> = groups.into_values().rev().collect();

            let (got_train, got_val) = reassemble("ds", files, &assignment.layout()).unwrap();
            let (want_train, want_val) = labelled(&train, &val, &assignment);
            assert_eq!(got_train, want_train);
            assert_eq!(got_val, want_val);
        }
    }

    #[test]
    fn test_reassembly_is_idempotent() {
        let train = rows("train", 11);
        let val = rows("val", 4);
        let assignment = partition(11, 4, 4).unwrap();
        let groups = materialize_groups(&train, &val, &assignment).unwrap();
        let files: Vec<Vec<TranscriptRecord>> = groups.into_values().collect();

        let first = reassemble("ds", files.clone(), &assignment.layout()).unwrap();
        let second = reassemble("ds", files, &assignment.layout()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_edits_survive_reassembly() {
        let train = rows("train", 6);
        let val = rows("val", 4);
        let assignment = partition(6, 4, 5).unwrap();
        let mut groups = materialize_groups(&train, &val, &assignment).unwrap();

        let second = groups.get_mut(&2).unwrap();
        second[1].text = "corrected".to_string();
        second[1].flags.unclear = true;

        let (train_out, val_out) =
            reassemble("ds", groups.into_values().collect(), &assignment.layout()).unwrap();
        assert_eq!(train_out.len(), 6);
        assert_eq!(train_out[5].text, "train-5");
        assert_eq!(val_out[0].text, "corrected");
        assert_eq!(val_out[0].raw_text, "val-0");
        assert!(val_out[0].flags.unclear);
    }

    #[test]
    fn test_missing_group_is_incomplete() {
        let train = rows("train", 120);
        let val = rows("val", 30);
        let assignment = partition(120, 30, 50).unwrap();
        let mut groups = materialize_groups(&train, &val, &assignment).unwrap();
        groups.remove(&3);

        let err = reassemble("ds", groups.into_values().collect(), &assignment.layout()).unwrap_err();
        match err {
            HubError::IncompleteDataset { missing, duplicated, .. } => {
                assert_eq!(missing, vec![3]);
                assert!(duplicated.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicated_group_is_incomplete() {
        let train = rows("train", 4);
        let val = rows("val", 0);
        let assignment = partition(4, 0, 2).unwrap();
        let groups = materialize_groups(&train, &val, &assignment).unwrap();
        let mut files: Vec<Vec<TranscriptRecord>> = groups.into_values().collect();
        files.push(files[0].clone());

        let err = reassemble("ds", files, &assignment.layout()).unwrap_err();
        assert!(matches!(err, HubError::IncompleteDataset { ref duplicated, .. } if duplicated == &vec![1]));
    }

    #[test]
    fn test_dropped_row_is_size_mismatch() {
        let train = rows("train", 4);
        let val = rows("val", 4);
        let assignment = partition(4, 4, 3).unwrap();
        let mut groups = materialize_groups(&train, &val, &assignment).unwrap();
        groups.get_mut(&2).unwrap().pop();

        let err = reassemble("ds", groups.into_values().collect(), &assignment.layout()).unwrap_err();
        assert!(matches!(err, HubError::SizeMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_short_group_against_recorded_layout_is_size_mismatch() {
        let layout = SplitLayout {
            train_len: 10,
            val_len: 0,
            group_size: 10,
        };
        let train = rows("train", 5);
        let assignment = partition(5, 0, 10).unwrap();
        let files: Vec<Vec<TranscriptRecord>> = materialize_groups(&train, &[], &assignment)
            .unwrap()
            .into_values()
            .collect();

        let err = reassemble("ds", files, &layout).unwrap_err();
        assert!(matches!(err, HubError::SizeMismatch { expected: 10, actual: 5, .. }));
    }

    #[test]
    fn test_empty_dataset_reassembles_to_empty_splits() {
        let layout = SplitLayout {
            train_len: 0,
            val_len: 0,
            group_size: 50,
        };
        let (train, val) = reassemble("ds", Vec::new(), &layout).unwrap();
        assert!(train.is_empty());
        assert!(val.is_empty());
    }
}
