//! Editing session of one reviewer.
//!
//! Every command handler takes the current session by reference and returns
//! the next one. On error the caller keeps the session it had, so a failed
//! save never leaves half-applied state behind.

use std::ops::Range;

use tracing::{debug, info};

use crate::core::dataset::{AnnotationFlag, TranscriptRecord};
use crate::core::error::{HubError, HubResult};
use crate::core::grouping::{ensure_open, CompletionBoard};
use crate::core::operations::editing_done;
use crate::core::storage::layout::validate_dataset_name;
use crate::core::storage::DatasetRepository;
use crate::navigation::Paginator;

/// Group currently open for editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGroup {
    pub id: u32,
    pub rows: Vec<TranscriptRecord>,
    /// True when rows changed since the last save
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    pub dataset: Option<String>,
    pub board: CompletionBoard,
    pub group: Option<OpenGroup>,
    /// 0-based page of the open group
    pub page: usize,
    pub rows_per_page: usize,
}

impl ReviewSession {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            dataset: None,
            board: CompletionBoard::new(),
            group: None,
            page: 0,
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// Fresh session with the same page size
    pub fn reset(&self) -> Self {
        Self::new(self.rows_per_page)
    }

    pub fn paginator(&self) -> Paginator {
        let rows = self.group.as_ref().map(|group| group.rows.len()).unwrap_or(0);
        Paginator::new(rows, self.rows_per_page)
    }

    /// Row indices (within the open group) shown on the current page
    pub fn page_range(&self) -> Range<usize> {
        self.paginator().page_range(self.page)
    }

    pub fn page_rows(&self) -> &[TranscriptRecord] {
        match &self.group {
            Some(group) => &group.rows[self.page_range()],
            None => &[],
        }
    }

    pub fn is_last_page(&self) -> bool {
        self.paginator().is_last(self.page)
    }

    pub fn is_dirty(&self) -> bool {
        self.group.as_ref().map(|group| group.dirty).unwrap_or(false)
    }

    /// Groups that can still be opened for editing
    pub fn editable_groups(&self) -> Vec<u32> {
        self.board.editable_groups()
    }

    fn dataset_name(&self) -> HubResult<&str> {
        self.dataset
            .as_deref()
            .ok_or_else(|| HubError::InvalidConfiguration("no dataset selected".to_string()))
    }

    fn open_group(&self) -> HubResult<&OpenGroup> {
        self.group
            .as_ref()
            .ok_or_else(|| HubError::InvalidConfiguration("no group selected".to_string()))
    }

    fn with_row<F>(&self, row: usize, change: F) -> HubResult<Self>
    where
        F: FnOnce(&mut TranscriptRecord) -> bool,
    {
        let mut next = self.clone();
        let group = next
            .group
            .as_mut()
            .ok_or_else(|| HubError::InvalidConfiguration("no group selected".to_string()))?;
        let group_id = group.id;
        let record = group.rows.get_mut(row).ok_or_else(|| {
            HubError::InvalidConfiguration(format!("row {} is outside group {}", row, group_id))
        })?;
        if change(record) {
            group.dirty = true;
        }
        Ok(next)
    }

    /// Switch to `dataset` and load the status of its groups
    pub fn select_dataset(&self, repo: &DatasetRepository, dataset: &str) -> HubResult<Self> {
        validate_dataset_name(dataset)?;
        let board = repo.group_statuses(dataset)?;
        info!(
            "Selected dataset '{}': {} groups, {} editable",
            dataset,
            board.len(),
            board.editable_groups().len()
        );
        Ok(Self {
            dataset: Some(dataset.to_string()),
            board,
            ..self.reset()
        })
    }

    /// Open `group` for editing; done groups are refused with `GroupClosed`
    pub fn select_group(&self, repo: &DatasetRepository, group: u32) -> HubResult<Self> {
        let dataset = self.dataset_name()?;
        let rows = repo.read_group(dataset, group)?;
        ensure_open(dataset, group, &rows)?;

        info!("Opened group {} of '{}' ({} rows)", group, dataset, rows.len());
        Ok(Self {
            group: Some(OpenGroup {
                id: group,
                rows,
                dirty: false,
            }),
            page: 0,
            ..self.clone()
        })
    }

    /// Replace the transcript of `row` (index within the open group)
    pub fn edit_text(&self, row: usize, text: &str) -> HubResult<Self> {
        self.with_row(row, |record| {
            if record.text == text {
                return false;
            }
            record.text = text.to_string();
            true
        })
    }

    pub fn toggle_flag(&self, row: usize, flag: AnnotationFlag) -> HubResult<Self> {
        self.with_row(row, |record| {
            record.flags.toggle(flag);
            true
        })
    }

    /// Write pending edits of the open group back to storage.
    ///
    /// The stored copy is re-read first so that a group finished by another
    /// session is not overwritten.
    pub fn save(&self, repo: &DatasetRepository) -> HubResult<Self> {
        let dataset = self.dataset_name()?;
        let group = self.open_group()?;
        if !group.dirty {
            return Ok(self.clone());
        }

        let stored = repo.read_group(dataset, group.id)?;
        ensure_open(dataset, group.id, &stored)?;
        repo.write_group(dataset, group.id, &group.rows)?;
        debug!("Saved group {} of '{}'", group.id, dataset);

        let mut next = self.clone();
        if let Some(group) = next.group.as_mut() {
            group.dirty = false;
        }
        Ok(next)
    }

    /// Save pending edits, then move to the next page (if any)
    pub fn next_page(&self, repo: &DatasetRepository) -> HubResult<Self> {
        let mut next = self.save(repo)?;
        if let Some(page) = next.paginator().next(next.page) {
            next.page = page;
        }
        Ok(next)
    }

    pub fn prev_page(&self) -> HubResult<Self> {
        self.open_group()?;
        let mut next = self.clone();
        if let Some(page) = next.paginator().prev(next.page) {
            next.page = page;
        }
        Ok(next)
    }

    /// Mark the open group done once its last page is reached.
    ///
    /// Pending edits are saved first. The group is then closed and removed
    /// from the editable set.
    pub fn finish_group(&self, repo: &DatasetRepository) -> HubResult<Self> {
        let dataset = self.dataset_name()?;
        let group = self.open_group()?;
        if !self.is_last_page() {
            return Err(HubError::InvalidConfiguration(format!(
                "group {} still has pages to review",
                group.id
            )));
        }

        let mut next = self.save(repo)?;
        editing_done(repo, dataset, group.id)?;

        next.board.set_done(group.id);
        next.group = None;
        next.page = 0;
        Ok(next)
    }
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operations::{ingest_dataset, reassemble_dataset};
    use crate::core::storage::InMemoryStore;

    fn seeded_repo() -> DatasetRepository {
        let repo = DatasetRepository::new(InMemoryStore::new());
        let train: Vec<TranscriptRecord> = (0..20)
            .map(|i| TranscriptRecord::ingested(format!("train {}", i), format!("t{}.wav", i)))
            .collect();
        let val: Vec<TranscriptRecord> = (0..5)
            .map(|i| TranscriptRecord::ingested(format!("val {}", i), format!("v{}.wav", i)))
            .collect();
        ingest_dataset(&repo, "ds", train, val, 12).unwrap();
        repo
    }

    fn opened(repo: &DatasetRepository, group: u32) -> ReviewSession {
        ReviewSession::new(5)
            .select_dataset(repo, "ds")
            .unwrap()
            .select_group(repo, group)
            .unwrap()
    }

    #[test]
    fn test_select_dataset_lists_groups() {
        let repo = seeded_repo();
        let session = ReviewSession::new(5).select_dataset(&repo, "ds").unwrap();

        assert_eq!(session.dataset.as_deref(), Some("ds"));
        assert_eq!(session.editable_groups(), vec![1, 2, 3]);
        assert!(session.group.is_none());
    }

    #[test]
    fn test_edit_text_is_pure_until_saved() {
        let repo = seeded_repo();
        let session = opened(&repo, 1);

        let edited = session.edit_text(2, "fixed").unwrap();
        assert!(edited.is_dirty());
        assert!(!session.is_dirty());
        assert_eq!(session.page_rows()[2].text, "train 2");
        assert_eq!(repo.read_group("ds", 1).unwrap()[2].text, "train 2");

        let unchanged = edited.edit_text(2, "fixed").unwrap();
        assert_eq!(unchanged, edited);
    }

    #[test]
    fn test_next_page_saves_edits() {
        let repo = seeded_repo();
        let session = opened(&repo, 1)
            .edit_text(0, "first row fixed")
            .unwrap()
            .toggle_flag(1, AnnotationFlag::LoudNoise)
            .unwrap();

        let moved = session.next_page(&repo).unwrap();
        assert_eq!(moved.page, 1);
        assert!(!moved.is_dirty());
        assert_eq!(moved.page_range(), 5..10);

        let stored = repo.read_group("ds", 1).unwrap();
        assert_eq!(stored[0].text, "first row fixed");
        assert_eq!(stored[0].raw_text, "train 0");
        assert!(stored[1].flags.loud_noise);
    }

    #[test]
    fn test_paging_stops_at_bounds() {
        let repo = seeded_repo();
        let mut session = opened(&repo, 1);
        assert!(!session.is_last_page());

        session = session.prev_page().unwrap();
        assert_eq!(session.page, 0);
        for _ in 0..5 {
            session = session.next_page(&repo).unwrap();
        }
        assert_eq!(session.page, 2);
        assert!(session.is_last_page());
        assert_eq!(session.page_rows().len(), 2);
    }

    #[test]
    fn test_row_out_of_group_is_rejected() {
        let repo = seeded_repo();
        let session = opened(&repo, 3);
        assert_eq!(session.group.as_ref().unwrap().rows.len(), 1);
        assert!(session.edit_text(0, "x").is_ok());
        assert!(matches!(
            session.edit_text(1000, "x"),
            Err(HubError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_finish_group_requires_last_page() {
        let repo = seeded_repo();
        let session = opened(&repo, 2);
        assert!(session.finish_group(&repo).is_err());

        let mut session = session.edit_text(11, "last row edit").unwrap();
        while !session.is_last_page() {
            session = session.next_page(&repo).unwrap();
        }
        let finished = session.finish_group(&repo).unwrap();

        assert!(finished.group.is_none());
        assert_eq!(finished.editable_groups(), vec![1, 3]);
        let stored = repo.read_group("ds", 2).unwrap();
        assert!(stored.iter().all(|r| r.edit_status));
        assert_eq!(stored[11].text, "last row edit");
    }

    #[test]
    fn test_done_group_cannot_be_opened_but_is_exported() {
        let repo = seeded_repo();
        editing_done(&repo, "ds", 2).unwrap();

        let session = ReviewSession::new(5).select_dataset(&repo, "ds").unwrap();
        assert_eq!(session.editable_groups(), vec![1, 3]);
        assert!(matches!(
            session.select_group(&repo, 2),
            Err(HubError::GroupClosed { group: 2, .. })
        ));

        let (dataset, _) = reassemble_dataset(&repo, "ds").unwrap();
        assert_eq!(dataset.train.len(), 20);
        assert_eq!(dataset.val.len(), 5);
    }

    #[test]
    fn test_save_refuses_group_finished_elsewhere() {
        let repo = seeded_repo();
        let session = opened(&repo, 1).edit_text(0, "late edit").unwrap();
        editing_done(&repo, "ds", 1).unwrap();

        let err = session.save(&repo).unwrap_err();
        assert!(matches!(err, HubError::GroupClosed { group: 1, .. }));
        assert_eq!(repo.read_group("ds", 1).unwrap()[0].text, "train 0");
    }

    #[test]
    fn test_reset_clears_everything_but_page_size() {
        let repo = seeded_repo();
        let session = opened(&repo, 1).reset();
        assert_eq!(session, ReviewSession::new(5));
    }

    #[test]
    fn test_commands_without_selection_fail() {
        let repo = seeded_repo();
        let session = ReviewSession::default();
        assert!(session.select_group(&repo, 1).is_err());
        assert!(session.edit_text(0, "x").is_err());
        assert!(session.prev_page().is_err());
        assert!(session.next_page(&repo).is_err());
    }
}
