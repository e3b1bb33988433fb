//! Single-pass partitioning of a train/val pair into review groups.
//!
//! Train and val are treated as one sequence (train first) and cut into
//! consecutive runs of `group_size` rows. The train/val boundary plays no
//! part in the cut, so a group may hold the tail of train and the head of val.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::error::{HubError, HubResult};

/// Number of groups needed to cover `total` rows
pub fn total_groups(total: usize, group_size: usize) -> usize {
    if group_size == 0 {
        return 0;
    }
    total.div_ceil(group_size)
}

/// Recorded shape of a partitioned dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitLayout {
    pub train_len: usize,
    pub val_len: usize,
    pub group_size: usize,
}

impl SplitLayout {
    pub fn total(&self) -> usize {
        self.train_len + self.val_len
    }

    pub fn total_groups(&self) -> usize {
        total_groups(self.total(), self.group_size)
    }

    /// Concatenated positions covered by `group` (1-based); empty when out of range
    pub fn group_range(&self, group: u32) -> Range<usize> {
        let group = group as usize;
        if group == 0 || group > self.total_groups() {
            return 0..0;
        }
        let start = (group - 1) * self.group_size;
        let end = (group * self.group_size).min(self.total());
        start..end
    }

    /// Expected row count of `group`
    pub fn group_len(&self, group: u32) -> usize {
        self.group_range(group).len()
    }
}

/// Group label of every position in the train-then-val concatenation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    layout: SplitLayout,
    labels: Vec<u32>,
}

impl GroupAssignment {
    pub fn layout(&self) -> SplitLayout {
        self.layout
    }

    pub fn total_groups(&self) -> usize {
        self.layout.total_groups()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Group of the concatenated position `index`
    pub fn group_of(&self, index: usize) -> Option<u32> {
        self.labels.get(index).copied()
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Labels of the train rows (slice before `train_len`)
    pub fn train_labels(&self) -> &[u32] {
        &self.labels[..self.layout.train_len]
    }

    /// Labels of the val rows (slice from `train_len`)
    pub fn val_labels(&self) -> &[u32] {
        &self.labels[self.layout.train_len..]
    }
}

/// Assign every row of a `train_len + val_len` concatenation a 1-based group.
///
/// # Errors
/// * `InvalidConfiguration` if `group_size` is zero
pub fn partition(
    train_len: usize,
    val_len: usize,
    group_size: usize,
) -> HubResult<GroupAssignment> {
    if group_size < 1 {
        return Err(HubError::InvalidConfiguration(format!(
            "group size must be at least 1, got {}",
            group_size
        )));
    }

    let layout = SplitLayout {
        train_len,
        val_len,
        group_size,
    };
    let total = layout.total();

    let mut labels = Vec::with_capacity(total);
    for group in 1..=layout.total_groups() as u32 {
        let range = layout.group_range(group);
        labels.extend(std::iter::repeat(group).take(range.len()));
    }

    Ok(GroupAssignment { layout, labels })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_counts(assignment: &GroupAssignment) -> Vec<usize> {
        let mut counts = vec![0; assignment.total_groups()];
        for label in assignment.labels() {
            counts[*label as usize - 1] += 1;
        }
        counts
    }

    #[test]
    fn test_group_straddles_train_val_boundary() {
        let assignment = partition(120, 30, 50).unwrap();

        assert_eq!(assignment.total_groups(), 3);
        assert_eq!(group_counts(&assignment), vec![50, 50, 50]);

        let train = assignment.train_labels();
        assert_eq!(train.len(), 120);
        assert!(train[..50].iter().all(|g| *g == 1));
        assert!(train[50..100].iter().all(|g| *g == 2));
        assert!(train[100..].iter().all(|g| *g == 3));

        let val = assignment.val_labels();
        assert_eq!(val.len(), 30);
        assert!(val.iter().all(|g| *g == 3));
    }

    #[test]
    fn test_last_group_holds_remainder() {
        let assignment = partition(7, 6, 5).unwrap();
        assert_eq!(group_counts(&assignment), vec![5, 5, 3]);
        assert_eq!(assignment.layout().group_len(3), 3);
        assert_eq!(assignment.layout().group_range(2), 5..10);
    }

    #[test]
    fn test_zero_group_size_is_rejected() {
        let err = partition(10, 10, 0).unwrap_err();
        assert!(matches!(err, HubError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_empty_dataset_has_no_groups() {
        let assignment = partition(0, 0, 50).unwrap();
        assert!(assignment.is_empty());
        assert_eq!(assignment.total_groups(), 0);
    }

    #[test]
    fn test_group_size_one_gives_singletons() {
        let assignment = partition(3, 2, 1).unwrap();
        assert_eq!(assignment.labels(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_group_size_larger_than_total_gives_one_group() {
        let assignment = partition(3, 4, 50).unwrap();
        assert_eq!(assignment.total_groups(), 1);
        assert!(assignment.labels().iter().all(|g| *g == 1));

        let exact = partition(3, 4, 7).unwrap();
        assert_eq!(exact.total_groups(), 1);
    }

    #[test]
    fn test_one_sided_datasets() {
        let only_val = partition(0, 12, 5).unwrap();
        assert!(only_val.train_labels().is_empty());
        assert_eq!(only_val.val_labels(), &[1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3]);

        let only_train = partition(12, 0, 5).unwrap();
        assert!(only_train.val_labels().is_empty());
        assert_eq!(only_train.total_groups(), 3);
    }

    #[test]
    fn test_partition_invariants_over_small_shapes() {
        for train_len in 0..15 {
            for val_len in 0..15 {
                for group_size in 1..20 {
                    let assignment = partition(train_len, val_len, group_size).unwrap();
                    let total = train_len + val_len;
                    let expected_groups = total.div_ceil(group_size);

                    assert_eq!(assignment.labels().len(), total);
                    assert_eq!(assignment.total_groups(), expected_groups);

                    // labels are non-decreasing and step by at most one
                    for pair in assignment.labels().windows(2) {
                        assert!(pair[1] == pair[0] || pair[1] == pair[0] + 1);
                    }

                    let counts = group_counts(&assignment);
                    for (idx, count) in counts.iter().enumerate() {
                        if idx + 1 < counts.len() {
                            assert_eq!(*count, group_size);
                        } else {
                            assert!(*count >= 1 && *count <= group_size);
                        }
                    }
                }
            }
        }
    }
}
