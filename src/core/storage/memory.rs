use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, MutexGuard};

use crate::core::error::{HubError, HubResult};

use super::layout::validate_object_path;
use super::{encode_object_path, new_download_token, ObjectStore};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
    download_token: String,
}

/// Bucket kept in memory; used by tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> HubResult<MutexGuard<'_, BTreeMap<String, StoredObject>>> {
        self.objects
            .lock()
            .map_err(|_| HubError::StorageFailure(io::Error::other("object map lock poisoned")))
    }

    /// Content type recorded for `path`
    pub fn content_type(&self, path: &str) -> HubResult<Option<String>> {
        Ok(self.objects()?.get(path).map(|object| object.content_type.clone()))
    }

    pub fn len(&self) -> usize {
        self.objects().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for InMemoryStore {
    fn list(&self, prefix: &str) -> HubResult<Vec<String>> {
        Ok(self
            .objects()?
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> HubResult<Vec<u8>> {
        self.objects()?
            .get(path)
            .map(|object| object.bytes.clone())
            .ok_or_else(|| HubError::not_found(path))
    }

    fn write(&self, path: &str, bytes: &[u8], content_type: &str) -> HubResult<()> {
        validate_object_path(path)?;
        let mut objects = self.objects()?;
        let download_token = objects
            .get(path)
            .map(|object| object.download_token.clone())
            .unwrap_or_else(new_download_token);
        objects.insert(
            path.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
                download_token,
            },
        );
        Ok(())
    }

    fn exists(&self, path: &str) -> HubResult<bool> {
        Ok(self.objects()?.contains_key(path))
    }

    fn delete(&self, path: &str) -> HubResult<()> {
        self.objects()?
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| HubError::not_found(path))
    }

    fn download_token(&self, path: &str) -> HubResult<Option<String>> {
        self.objects()?
            .get(path)
            .map(|object| Some(object.download_token.clone()))
            .ok_or_else(|| HubError::not_found(path))
    }

    fn public_url(&self, path: &str, token: &str) -> String {
        format!("memory://{}?token={}", encode_object_path(path), token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());

        store.write("csv_files/a/train.csv", b"x", "text/csv").unwrap();
        store.write("csv_files/b/train.csv", b"y", "text/csv").unwrap();

        assert_eq!(store.list("csv_files/a/").unwrap(), vec!["csv_files/a/train.csv"]);
        assert_eq!(store.read("csv_files/b/train.csv").unwrap(), b"y");
        assert_eq!(
            store.content_type("csv_files/b/train.csv").unwrap().as_deref(),
            Some("text/csv")
        );
        assert!(store.exists("csv_files/a/train.csv").unwrap());

        store.delete("csv_files/a/train.csv").unwrap();
        assert_eq!(store.len(), 1);
        assert!(matches!(store.read("csv_files/a/train.csv"), Err(HubError::NotFound { .. })));
    }

    #[test]
    fn test_overwrite_keeps_token() {
        let store = InMemoryStore::new();
        store.write("x/y.wav", b"1", "audio/wav").unwrap();
        let token = store.download_token("x/y.wav").unwrap();
        store.write("x/y.wav", b"2", "audio/wav").unwrap();

        assert_eq!(store.download_token("x/y.wav").unwrap(), token);
        assert!(store
            .public_url("x/y.wav", token.as_deref().unwrap())
            .starts_with("memory://x/y.wav?token="));
    }
}
