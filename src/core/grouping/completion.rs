use std::collections::BTreeMap;

use tracing::info;

use crate::core::dataset::TranscriptRecord;
use crate::core::error::{HubError, HubResult};

/// Review state of one group. `Open -> Done` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupStatus {
    #[default]
    Open,
    Done,
}

impl GroupStatus {
    /// A group is done when it has rows and all of them carry `edit_status`
    pub fn of(records: &[TranscriptRecord]) -> Self {
        if !records.is_empty() && records.iter().all(|record| record.edit_status) {
            GroupStatus::Done
        } else {
            GroupStatus::Open
        }
    }

    pub fn is_done(&self) -> bool {
        *self == GroupStatus::Done
    }

    pub fn as_str(&self) -> &str {
        match self {
            GroupStatus::Open => "open",
            GroupStatus::Done => "done",
        }
    }
}

/// Fail with `GroupClosed` if the rows of `group` are already marked done
pub fn ensure_open(dataset: &str, group: u32, records: &[TranscriptRecord]) -> HubResult<()> {
    if GroupStatus::of(records).is_done() {
        return Err(HubError::GroupClosed {
            dataset: dataset.to_string(),
            group,
        });
    }
    Ok(())
}

/// Flip every row of an open group to `edit_status = true`.
///
/// # Errors
/// * `GroupClosed` if the group was already done
pub fn mark_done(dataset: &str, group: u32, records: &mut [TranscriptRecord]) -> HubResult<()> {
    ensure_open(dataset, group, records)?;
    for record in records.iter_mut() {
        record.edit_status = true;
    }
    info!("Group {} of '{}' marked done ({} rows)", group, dataset, records.len());
    Ok(())
}

/// Status of every group of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionBoard {
    statuses: BTreeMap<u32, GroupStatus>,
}

impl CompletionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: u32, status: GroupStatus) {
        self.statuses.insert(group, status);
    }

    pub fn status(&self, group: u32) -> Option<GroupStatus> {
        self.statuses.get(&group).copied()
    }

    /// Record that `group` finished review
    pub fn set_done(&mut self, group: u32) {
        self.statuses.insert(group, GroupStatus::Done);
    }

    /// Groups still open for editing, ascending
    pub fn editable_groups(&self) -> Vec<u32> {
        self.statuses
            .iter()
            .filter(|(_, status)| !status.is_done())
            .map(|(group, _)| *group)
            .collect()
    }

    pub fn done_groups(&self) -> Vec<u32> {
        self.statuses
            .iter()
            .filter(|(_, status)| status.is_done())
            .map(|(group, _)| *group)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// True when there is at least one group and none is open
    pub fn all_done(&self) -> bool {
        !self.statuses.is_empty() && self.statuses.values().all(GroupStatus::is_done)
    }
}

impl FromIterator<(u32, GroupStatus)> for CompletionBoard {
    fn from_iter<I: IntoIterator<Item = (u32, GroupStatus)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}
