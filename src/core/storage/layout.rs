//! Object paths of the bucket.
//!
//! ```text
//! audio_files/<dataset>/<clip>.wav
//! csv_files/<dataset>/group_<n>.csv
//! csv_files/<dataset>/train.csv | val.csv
//! csv_files/<dataset>/manifest.json
//! ```

use crate::core::error::{HubError, HubResult};

pub const CSV_ROOT: &str = "csv_files";
pub const AUDIO_ROOT: &str = "audio_files";
pub const MANIFEST_FILE: &str = "manifest.json";

const GROUP_FILE_PREFIX: &str = "group_";
const GROUP_FILE_SUFFIX: &str = ".csv";

/// Reject dataset names that cannot be a single path segment
pub fn validate_dataset_name(name: &str) -> HubResult<()> {
    let invalid = |reason: &str| {
        Err(HubError::InvalidConfiguration(format!(
            "dataset name '{}' {}",
            name, reason
        )))
    };

    if name.trim().is_empty() {
        return invalid("is empty");
    }
    if name.trim() != name {
        return invalid("has leading or trailing whitespace");
    }
    if name == "." || name == ".." {
        return invalid("is a relative path marker");
    }
    if name.contains(['/', '\\']) || name.chars().any(char::is_control) {
        return invalid("contains a path separator or control character");
    }
    Ok(())
}

/// Reject file names that would escape their dataset folder
pub fn validate_file_name(name: &str) -> HubResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(HubError::InvalidConfiguration(format!(
            "'{}' is not a valid file name",
            name
        )));
    }
    Ok(())
}

/// Check every segment of an object path
pub fn validate_object_path(path: &str) -> HubResult<()> {
    let bad_segment = |segment: &str| segment.is_empty() || segment == "." || segment == "..";
    if path.is_empty() || path.split('/').any(bad_segment) {
        return Err(HubError::InvalidConfiguration(format!(
            "'{}' is not a valid object path",
            path
        )));
    }
    Ok(())
}

/// Listing prefix of a dataset's CSV folder (with trailing slash)
pub fn csv_prefix(dataset: &str) -> String {
    format!("{}/{}/", CSV_ROOT, dataset)
}

pub fn csv_path(dataset: &str, file_name: &str) -> String {
    format!("{}/{}/{}", CSV_ROOT, dataset, file_name)
}

pub fn audio_path(dataset: &str, file_name: &str) -> String {
    format!("{}/{}/{}", AUDIO_ROOT, dataset, file_name)
}

pub fn group_file_name(group: u32) -> String {
    format!("{}{}{}", GROUP_FILE_PREFIX, group, GROUP_FILE_SUFFIX)
}

/// Group id of a `group_<n>.csv` file name; `None` for any other file
pub fn parse_group_file_name(file_name: &str) -> Option<u32> {
    let digits = file_name
        .strip_prefix(GROUP_FILE_PREFIX)?
        .strip_suffix(GROUP_FILE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u32>() {
        Ok(group) if group >= 1 => Some(group),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(csv_path("kru_mild-01", "group_3.csv"), "csv_files/kru_mild-01/group_3.csv");
        assert_eq!(audio_path("kru_mild-01", "a.wav"), "audio_files/kru_mild-01/a.wav");
        assert_eq!(csv_prefix("x"), "csv_files/x/");
    }

    #[test]
    fn test_group_file_names() {
        assert_eq!(group_file_name(12), "group_12.csv");
        assert_eq!(parse_group_file_name("group_12.csv"), Some(12));
        assert_eq!(parse_group_file_name("group_0.csv"), None);
        assert_eq!(parse_group_file_name("group_.csv"), None);
        assert_eq!(parse_group_file_name("group_-1.csv"), None);
        assert_eq!(parse_group_file_name("group_+1.csv"), None);
        assert_eq!(parse_group_file_name("train.csv"), None);
        assert_eq!(parse_group_file_name("group_2.csv.bak"), None);
    }

    #[test]
    fn test_dataset_name_validation() {
        assert!(validate_dataset_name("kru_mild-01").is_ok());
        assert!(validate_dataset_name("").is_err());
        assert!(validate_dataset_name("  ").is_err());
        assert!(validate_dataset_name(" padded").is_err());
        assert!(validate_dataset_name("..").is_err());
        assert!(validate_dataset_name("a/b").is_err());
        assert!(validate_dataset_name(r"a\b").is_err());
    }

    #[test]
    fn test_object_path_validation() {
        assert!(validate_object_path("csv_files/a/group_1.csv").is_ok());
        assert!(validate_object_path("csv_files//x").is_err());
        assert!(validate_object_path("../etc/passwd").is_err());
        assert!(validate_object_path("").is_err());
    }
}
