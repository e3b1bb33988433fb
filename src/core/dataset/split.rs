use super::TranscriptRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Val,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
        }
    }

    /// Name of the whole-split CSV file (`train.csv` / `val.csv`)
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}

/// A named pair of train/val record sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub train: Vec<TranscriptRecord>,
    pub val: Vec<TranscriptRecord>,
}

impl Dataset {
    pub fn new(
        name: impl Into<String>,
        train: Vec<TranscriptRecord>,
        val: Vec<TranscriptRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            train,
            val,
        }
    }

    pub fn split(&self, split: DatasetSplit) -> &[TranscriptRecord] {
        match split {
            DatasetSplit::Train => &self.train,
            DatasetSplit::Val => &self.val,
        }
    }
}
