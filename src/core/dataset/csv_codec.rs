//! CSV encoding of transcript rows.
//!
//! Group files carry the full schema (`GROUP_FILE_COLUMNS`) followed by any
//! passthrough columns of the source data. Source files only need `text` and
//! `full_path`; derived columns found there are recomputed at ingestion.

use std::collections::{HashMap, HashSet};

use crate::core::error::{HubError, HubResult};

use super::{AnnotationFlag, TranscriptRecord};

/// Column order of a group file
pub const GROUP_FILE_COLUMNS: [&str; 10] = [
    "text",
    "raw_text",
    "full_path",
    "audio_link",
    "multi_speaker",
    "loud_noise",
    "unclear",
    "incomplete_sentence",
    "edit_status",
    "group",
];

const SOURCE_REQUIRED_COLUMNS: [&str; 2] = ["text", "full_path"];

/// Header positions split into schema columns and passthrough columns
struct HeaderIndex {
    known: HashMap<&'static str, usize>,
    passthrough: Vec<(String, usize)>,
}

impl HeaderIndex {
    fn build(headers: &csv::StringRecord) -> HubResult<Self> {
        let mut known = HashMap::new();
        let mut passthrough = Vec::new();
        let mut seen = HashSet::new();

        for (position, raw_name) in headers.iter().enumerate() {
            let name = raw_name.trim_start_matches('\u{feff}').trim();
            if name.is_empty() {
                return Err(HubError::MalformedCsv(format!(
                    "header column {} has an empty name",
                    position + 1
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(HubError::MalformedCsv(format!(
                    "header column '{}' appears more than once",
                    name
                )));
            }
            match GROUP_FILE_COLUMNS.iter().find(|column| **column == name) {
                Some(column) => {
                    known.insert(*column, position);
                }
                None => passthrough.push((name.to_string(), position)),
            }
        }

        Ok(Self { known, passthrough })
    }

    fn require(&self, columns: &[&str]) -> HubResult<()> {
        let missing: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|column| !self.known.contains_key(*column))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(HubError::MalformedCsv(format!(
                "missing required columns: {}",
                missing.join(", ")
            )))
        }
    }

    fn field<'r>(&self, row: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        self.known.get(column).and_then(|position| row.get(*position))
    }

    fn passthrough_of(&self, row: &csv::StringRecord) -> Vec<(String, String)> {
        self.passthrough
            .iter()
            .map(|(name, position)| (name.clone(), row.get(*position).unwrap_or("").to_string()))
            .collect()
    }
}

/// Parse a boolean cell. Accepts the `True`/`False` spelling written by this
/// codec plus lowercase and `1`/`0`; an empty cell reads as false.
pub fn parse_bool(value: &str, column: &str, line: u64) -> HubResult<bool> {
    match value.trim() {
        "True" | "true" | "TRUE" | "1" => Ok(true),
        "False" | "false" | "FALSE" | "0" | "" => Ok(false),
        other => Err(HubError::MalformedCsv(format!(
            "line {}: '{}' is not a boolean in column '{}'",
            line, other, column
        ))),
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn parse_group(value: &str, line: u64) -> HubResult<u32> {
    match value.trim().parse::<u32>() {
        Ok(group) if group >= 1 => Ok(group),
        _ => Err(HubError::MalformedCsv(format!(
            "line {}: group '{}' is not a positive integer",
            line,
            value.trim()
        ))),
    }
}

fn line_of(row: &csv::StringRecord) -> u64 {
    row.position().map(|position| position.line()).unwrap_or(0)
}

fn read_flags(
    index: &HeaderIndex,
    row: &csv::StringRecord,
    record: &mut TranscriptRecord,
) -> HubResult<()> {
    let line = line_of(row);
    for flag in AnnotationFlag::all() {
        if let Some(value) = index.field(row, flag.column()) {
            record.flags.set(flag, parse_bool(value, flag.column(), line)?);
        }
    }
    Ok(())
}

/// Parse a group file. Every schema column must be present.
pub fn read_group_file(bytes: &[u8]) -> HubResult<Vec<TranscriptRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let index = HeaderIndex::build(reader.headers()?)?;
    index.require(&GROUP_FILE_COLUMNS)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = line_of(&row);
        let field = |column: &str| index.field(&row, column).unwrap_or("");

        let audio_link = field("audio_link").trim();
        let mut record = TranscriptRecord {
            text: field("text").to_string(),
            raw_text: field("raw_text").to_string(),
            full_path: field("full_path").to_string(),
            audio_link: if audio_link.is_empty() {
                None
            } else {
                Some(audio_link.to_string())
            },
            edit_status: parse_bool(field("edit_status"), "edit_status", line)?,
            group: parse_group(field("group"), line)?,
            passthrough: index.passthrough_of(&row),
            ..Default::default()
        };
        read_flags(&index, &row, &mut record)?;
        records.push(record);
    }

    Ok(records)
}

/// Parse a source `train.csv`/`val.csv` picked for ingestion.
///
/// `raw_text` is snapshotted from `text`; `audio_link`, `group` and
/// `edit_status` are left for the ingestion step to fill in.
pub fn read_source_file(bytes: &[u8]) -> HubResult<Vec<TranscriptRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let index = HeaderIndex::build(reader.headers()?)?;
    index.require(&SOURCE_REQUIRED_COLUMNS)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = TranscriptRecord::ingested(
            index.field(&row, "text").unwrap_or(""),
            index.field(&row, "full_path").unwrap_or(""),
        );
        record.passthrough = index.passthrough_of(&row);
        read_flags(&index, &row, &mut record)?;
        records.push(record);
    }

    Ok(records)
}

/// Passthrough column names across all rows, in first-seen order
fn passthrough_columns(records: &[TranscriptRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for (name, _) in &record.passthrough {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

/// Serialize rows with the group-file header. Rows lacking a passthrough
/// column get an empty cell.
pub fn write_records(records: &[TranscriptRecord]) -> HubResult<Vec<u8>> {
    let extra_columns = passthrough_columns(records);
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = GROUP_FILE_COLUMNS.to_vec();
    header.extend(extra_columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for record in records {
        let group = record.group.to_string();
        let mut row: Vec<&str> = vec![
            record.text.as_str(),
            record.raw_text.as_str(),
            record.full_path.as_str(),
            record.audio_link.as_deref().unwrap_or(""),
            format_bool(record.flags.multi_speaker),
            format_bool(record.flags.loud_noise),
            format_bool(record.flags.unclear),
            format_bool(record.flags.incomplete_sentence),
            format_bool(record.edit_status),
            group.as_str(),
        ];
        for column in &extra_columns {
            let value = record
                .passthrough
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.as_str())
                .unwrap_or("");
            row.push(value);
        }
        writer.write_record(&row)?;
    }

    writer
        .into_inner()
        .map_err(|e| HubError::StorageFailure(e.into_error()))
}
