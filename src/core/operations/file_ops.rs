use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::core::error::{HubError, HubResult};

/// Name of the last component of a local folder, used as the dataset name.
///
/// # Arguments
/// * `folder` - Local folder picked for upload
///
/// # Returns
/// * `Some(String)` with the folder name
/// * `None` if the path has no final component or it is not valid UTF-8
pub fn folder_name(folder: &Path) -> Option<String> {
    folder
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
}

/// List the `.wav` files directly inside `folder`, sorted by path.
///
/// # Arguments
/// * `folder` - Local folder holding the audio clips
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` with the clip paths
/// * `Err(HubError)` if the folder cannot be read
pub fn list_wav_files(folder: &Path) -> HubResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension() {
            if ext.to_string_lossy().eq_ignore_ascii_case("wav") {
                files.push(path);
            }
        }
    }
    files.sort();
    info!("Found {} wav files in {:?}", files.len(), folder);
    Ok(files)
}

/// Read a local file, reporting a missing file as `NotFound`.
///
/// # Arguments
/// * `path` - Local file path
///
/// # Returns
/// * `Ok(Vec<u8>)` with the file content
/// * `Err(HubError::NotFound)` if the file does not exist
/// * `Err(HubError::StorageFailure)` for any other I/O error
pub fn read_local_file(path: &Path) -> HubResult<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(HubError::not_found(path.to_string_lossy()))
        }
        Err(e) => {
            error!("Failed to read {:?}: {}", path, e);
            Err(HubError::StorageFailure(e))
        }
    }
}

/// Write a file into a local destination folder, creating the folder first.
///
/// # Arguments
/// * `folder` - Destination folder
/// * `file_name` - Name of the file inside `folder`
/// * `bytes` - Content to write
///
/// # Returns
/// * `Ok(PathBuf)` with the written path
/// * `Err(HubError)` if the folder or file could not be written
pub fn write_local_file(folder: &Path, file_name: &str, bytes: &[u8]) -> HubResult<PathBuf> {
    fs::create_dir_all(folder)?;
    let path = folder.join(file_name);
    if let Err(e) = fs::write(&path, bytes) {
        error!("Failed to write {:?}: {}", path, e);
        return Err(HubError::StorageFailure(e));
    }
    info!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(path)
}
