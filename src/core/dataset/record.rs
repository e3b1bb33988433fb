use serde::{Deserialize, Serialize};

/// Boolean annotation flags a reviewer can toggle on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationFlag {
    MultiSpeaker,
    LoudNoise,
    Unclear,
    IncompleteSentence,
}

impl AnnotationFlag {
    /// CSV column name of the flag
    pub fn column(&self) -> &'static str {
        match self {
            AnnotationFlag::MultiSpeaker => "multi_speaker",
            AnnotationFlag::LoudNoise => "loud_noise",
            AnnotationFlag::Unclear => "unclear",
            AnnotationFlag::IncompleteSentence => "incomplete_sentence",
        }
    }

    /// Human-readable label for checkboxes
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationFlag::MultiSpeaker => "Multi speaker",
            AnnotationFlag::LoudNoise => "Loud noise",
            AnnotationFlag::Unclear => "Unclear",
            AnnotationFlag::IncompleteSentence => "Incomplete sentence",
        }
    }

    pub fn all() -> [AnnotationFlag; 4] {
        [
            AnnotationFlag::MultiSpeaker,
            AnnotationFlag::LoudNoise,
            AnnotationFlag::Unclear,
            AnnotationFlag::IncompleteSentence,
        ]
    }
}

/// The four annotation flags of a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationFlags {
    pub multi_speaker: bool,
    pub loud_noise: bool,
    pub unclear: bool,
    pub incomplete_sentence: bool,
}

impl AnnotationFlags {
    pub fn get(&self, flag: AnnotationFlag) -> bool {
        match flag {
            AnnotationFlag::MultiSpeaker => self.multi_speaker,
            AnnotationFlag::LoudNoise => self.loud_noise,
            AnnotationFlag::Unclear => self.unclear,
            AnnotationFlag::IncompleteSentence => self.incomplete_sentence,
        }
    }

    pub fn set(&mut self, flag: AnnotationFlag, value: bool) {
        match flag {
            AnnotationFlag::MultiSpeaker => self.multi_speaker = value,
            AnnotationFlag::LoudNoise => self.loud_noise = value,
            AnnotationFlag::Unclear => self.unclear = value,
            AnnotationFlag::IncompleteSentence => self.incomplete_sentence = value,
        }
    }

    pub fn toggle(&mut self, flag: AnnotationFlag) {
        let current = self.get(flag);
        self.set(flag, !current);
    }
}

/// One transcript row of a dataset.
///
/// `raw_text` is the snapshot of `text` taken at ingestion and never changes
/// afterwards. `group` is assigned once by the partitioner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptRecord {
    /// Current transcript, edited by reviewers
    pub text: String,
    /// Original transcript
    pub raw_text: String,
    /// Source audio reference the link is derived from
    pub full_path: String,
    /// Download URL of the audio clip, `None` when the clip is missing
    pub audio_link: Option<String>,
    pub flags: AnnotationFlags,
    /// True once the group this row belongs to has been reviewed
    pub edit_status: bool,
    /// 1-based review group, 0 until partitioned
    pub group: u32,
    /// Columns of the source data the hub does not interpret, in header order
    pub passthrough: Vec<(String, String)>,
}

impl TranscriptRecord {
    /// Build a freshly ingested row: `raw_text` snapshots `text`.
    pub fn ingested(text: impl Into<String>, full_path: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw_text: text.clone(),
            text,
            full_path: full_path.into(),
            ..Default::default()
        }
    }

    /// File name of the source audio, accepting both `/` and `\` separators
    pub fn audio_file_name(&self) -> Option<&str> {
        let name = self
            .full_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.full_path)
            .trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// True when the reviewer changed the transcript
    pub fn is_text_edited(&self) -> bool {
        self.text != self.raw_text
    }
}
