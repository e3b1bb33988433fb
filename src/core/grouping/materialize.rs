use std::collections::BTreeMap;

use crate::core::dataset::TranscriptRecord;
use crate::core::error::{HubError, HubResult};

use super::GroupAssignment;

fn check_lengths(
    train: &[TranscriptRecord],
    val: &[TranscriptRecord],
    assignment: &GroupAssignment,
) -> HubResult<()> {
    let layout = assignment.layout();
    if train.len() != layout.train_len {
        return Err(HubError::SizeMismatch {
            context: "train split".to_string(),
            expected: layout.train_len,
            actual: train.len(),
        });
    }
    if val.len() != layout.val_len {
        return Err(HubError::SizeMismatch {
            context: "val split".to_string(),
            expected: layout.val_len,
            actual: val.len(),
        });
    }
    Ok(())
}

/// Write the assigned group onto each row of train and val in place
/// (whole-split layout).
pub fn label_records(
    train: &mut [TranscriptRecord],
    val: &mut [TranscriptRecord],
    assignment: &GroupAssignment,
) -> HubResult<()> {
    check_lengths(train, val, assignment)?;

    for (record, group) in train.iter_mut().zip(assignment.train_labels()) {
        record.group = *group;
    }
    for (record, group) in val.iter_mut().zip(assignment.val_labels()) {
        record.group = *group;
    }
    Ok(())
}

/// Split the labelled train-then-val rows into one row list per group.
///
/// Row order inside a group follows the concatenation order, so every row
/// lands in exactly one group and none is dropped.
pub fn materialize_groups(
    train: &[TranscriptRecord],
    val: &[TranscriptRecord],
    assignment: &GroupAssignment,
) -> HubResult<BTreeMap<u32, Vec<TranscriptRecord>>> {
    check_lengths(train, val, assignment)?;

    let mut groups: BTreeMap<u32, Vec<TranscriptRecord>> = BTreeMap::new();
    for (record, group) in train.iter().chain(val.iter()).zip(assignment.labels()) {
        let mut record = record.clone();
        record.group = *group;
        groups.entry(*group).or_default().push(record);
    }

    Ok(groups)
}
