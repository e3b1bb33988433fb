use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::error::{HubError, HubResult};

use super::layout::validate_object_path;
use super::{encode_object_path, new_download_token, ObjectStore};

/// Sidecar folder holding object metadata, skipped by listings
const METADATA_DIR: &str = ".metadata";

/// Metadata kept next to every object
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectMetadata {
    content_type: String,
    download_token: String,
    updated_at: DateTime<Utc>,
}

/// Bucket backed by a local directory.
///
/// Objects live at `<root>/<object path>`; their metadata at
/// `<root>/.metadata/<object path>.json`.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl LocalObjectStore {
    /// Open (and create if needed) a bucket rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> HubResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        info!("Local object store opened at {:?}", root);
        Ok(Self {
            root,
            public_base_url: None,
        })
    }

    /// Serve public URLs from `base_url` instead of `file://` paths
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.public_base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, path: &str) -> HubResult<PathBuf> {
        validate_object_path(path)?;
        if path == METADATA_DIR || path.starts_with(&format!("{}/", METADATA_DIR)) {
            return Err(HubError::InvalidConfiguration(format!(
                "'{}' is reserved for object metadata",
                path
            )));
        }
        Ok(path.split('/').fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }

    fn metadata_path(&self, path: &str) -> PathBuf {
        let relative = format!("{}.json", path);
        relative
            .split('/')
            .fold(self.root.join(METADATA_DIR), |acc, segment| acc.join(segment))
    }

    fn read_metadata(&self, path: &str) -> Option<ObjectMetadata> {
        let contents = fs::read_to_string(self.metadata_path(path)).ok()?;
        match serde_json::from_str(&contents) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("Ignoring unreadable metadata for '{}': {}", path, e);
                None
            }
        }
    }

    fn write_metadata(&self, path: &str, metadata: &ObjectMetadata) -> HubResult<()> {
        let metadata_path = self.metadata_path(path);
        if let Some(parent) = metadata_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(metadata_path, serde_json::to_vec_pretty(metadata)?)?;
        Ok(())
    }

    /// Object path of a file under the root, using `/` separators
    fn relative_object_path(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.root).ok()?;
        let segments: Option<Vec<&str>> = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect();
        Some(segments?.join("/"))
    }
}

impl ObjectStore for LocalObjectStore {
    fn list(&self, prefix: &str) -> HubResult<Vec<String>> {
        let metadata_root = self.root.join(METADATA_DIR);
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.path() != metadata_root)
        {
            let entry = entry.map_err(|e| {
                HubError::StorageFailure(
                    e.into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory walk failed")),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match self.relative_object_path(entry.path()) {
                Some(path) if path.starts_with(prefix) => paths.push(path),
                Some(_) => {}
                None => warn!("Skipping non UTF-8 object path {:?}", entry.path()),
            }
        }

        paths.sort();
        debug!("Listed {} objects under '{}'", paths.len(), prefix);
        Ok(paths)
    }

    fn read(&self, path: &str) -> HubResult<Vec<u8>> {
        let file = self.object_path(path)?;
        match fs::read(&file) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(HubError::not_found(path)),
            Err(e) => Err(HubError::StorageFailure(e)),
        }
    }

    fn write(&self, path: &str, bytes: &[u8], content_type: &str) -> HubResult<()> {
        let file = self.object_path(path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, bytes)?;

        let download_token = self
            .read_metadata(path)
            .map(|metadata| metadata.download_token)
            .unwrap_or_else(new_download_token);
        self.write_metadata(
            path,
            &ObjectMetadata {
                content_type: content_type.to_string(),
                download_token,
                updated_at: Utc::now(),
            },
        )?;

        debug!("Wrote {} bytes to '{}'", bytes.len(), path);
        Ok(())
    }

    fn exists(&self, path: &str) -> HubResult<bool> {
        Ok(self.object_path(path)?.is_file())
    }

    fn delete(&self, path: &str) -> HubResult<()> {
        let file = self.object_path(path)?;
        match fs::remove_file(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(HubError::not_found(path)),
            Err(e) => return Err(HubError::StorageFailure(e)),
        }
        if let Err(e) = fs::remove_file(self.metadata_path(path)) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove metadata of '{}': {}", path, e);
            }
        }
        info!("Deleted '{}'", path);
        Ok(())
    }

    fn download_token(&self, path: &str) -> HubResult<Option<String>> {
        if !self.exists(path)? {
            return Err(HubError::not_found(path));
        }
        Ok(self.read_metadata(path).map(|metadata| metadata.download_token))
    }

    fn public_url(&self, path: &str, token: &str) -> String {
        match &self.public_base_url {
            Some(base_url) => format!(
                "{}/{}?alt=media&token={}",
                base_url,
                encode_object_path(path),
                token
            ),
            None => {
                let file = path
                    .split('/')
                    .fold(self.root.clone(), |acc, segment| acc.join(segment));
                let file = fs::canonicalize(&file).unwrap_or(file);
                let display = file.to_string_lossy().replace('\\', "/");
                if display.starts_with('/') {
                    format!("file://{}", encode_object_path(&display))
                } else {
                    format!("file:///{}", encode_object_path(&display))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_read_list_delete() {
        let temp = tempdir().unwrap();
        let store = LocalObjectStore::open(temp.path().join("bucket")).unwrap();

        store.write("csv_files/ds/group_1.csv", b"a,b\n", "text/csv").unwrap();
        store.write("csv_files/ds/group_2.csv", b"c,d\n", "text/csv").unwrap();
        store.write("audio_files/ds/x.wav", b"RIFF", "audio/wav").unwrap();

        assert_eq!(store.read("csv_files/ds/group_2.csv").unwrap(), b"c,d\n");
        assert_eq!(
            store.list("csv_files/").unwrap(),
            vec!["csv_files/ds/group_1.csv", "csv_files/ds/group_2.csv"]
        );
        assert!(store.exists("audio_files/ds/x.wav").unwrap());

        store.delete("csv_files/ds/group_1.csv").unwrap();
        assert!(!store.exists("csv_files/ds/group_1.csv").unwrap());
        assert!(matches!(
            store.delete("csv_files/ds/group_1.csv"),
            Err(HubError::NotFound { .. })
        ));
    }

    #[test]
    fn test_metadata_is_not_listed() {
        let temp = tempdir().unwrap();
        let store = LocalObjectStore::open(temp.path()).unwrap();
        store.write("a/b.csv", b"x", "text/csv").unwrap();

        assert_eq!(store.list("").unwrap(), vec!["a/b.csv"]);
    }

    #[test]
    fn test_missing_object_is_not_found() {
        let temp = tempdir().unwrap();
        let store = LocalObjectStore::open(temp.path()).unwrap();

        assert!(matches!(store.read("csv_files/none.csv"), Err(HubError::NotFound { .. })));
        assert!(matches!(
            store.download_token("csv_files/none.csv"),
            Err(HubError::NotFound { .. })
        ));
    }

    #[test]
    fn test_token_survives_overwrite() {
        let temp = tempdir().unwrap();
        let store = LocalObjectStore::open(temp.path()).unwrap();

        store.write("csv_files/ds/group_1.csv", b"v1", "text/csv").unwrap();
        let first = store.download_token("csv_files/ds/group_1.csv").unwrap();
        store.write("csv_files/ds/group_1.csv", b"v2", "text/csv").unwrap();
        let second = store.download_token("csv_files/ds/group_1.csv").unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let temp = tempdir().unwrap();
        let store = LocalObjectStore::open(temp.path()).unwrap();

        assert!(store.write("../outside.csv", b"x", "text/csv").is_err());
        assert!(store.write(".metadata/x.json", b"x", "text/csv").is_err());
    }

    #[test]
    fn test_public_url_with_base() {
        let temp = tempdir().unwrap();
        let store = LocalObjectStore::open(temp.path())
            .unwrap()
            .with_public_base_url("http://localhost:8000/");

        assert_eq!(
            store.public_url("audio_files/ds/a b.wav", "tok"),
            "http://localhost:8000/audio_files/ds/a%20b.wav?alt=media&token=tok"
        );
    }

    #[test]
    fn test_public_url_defaults_to_file_scheme() {
        let temp = tempdir().unwrap();
        let store = LocalObjectStore::open(temp.path()).unwrap();
        store.write("audio_files/ds/a.wav", b"RIFF", "audio/wav").unwrap();

        let url = store.public_url("audio_files/ds/a.wav", "tok");
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("audio_files/ds/a.wav"));
    }
}
