//! Object storage behind the review workflow.
//!
//! `ObjectStore` is the narrow bucket interface (list, read, write, exists,
//! delete, download tokens, public URLs). `DatasetRepository` layers the
//! dataset folder layout and the typed group files on top of it.

pub mod layout;
mod local;
#[cfg(test)]
mod memory;
mod repository;

pub use local::LocalObjectStore;
#[cfg(test)]
pub use memory::InMemoryStore;
pub use repository::{DatasetManifest, DatasetRepository};

use uuid::Uuid;

use crate::core::error::HubResult;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const WAV_CONTENT_TYPE: &str = "audio/wav";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Minimal bucket interface.
///
/// Paths are forward-slash separated object names. Calls are blocking and
/// independent of each other; the caller sequences read-before-write.
pub trait ObjectStore: Send + Sync {
    /// Object paths starting with `prefix`, sorted
    fn list(&self, prefix: &str) -> HubResult<Vec<String>>;

    /// Object content; `NotFound` when absent
    fn read(&self, path: &str) -> HubResult<Vec<u8>>;

    /// Create or overwrite an object. A download token is minted for new
    /// objects and kept for overwritten ones.
    fn write(&self, path: &str, bytes: &[u8], content_type: &str) -> HubResult<()>;

    fn exists(&self, path: &str) -> HubResult<bool>;

    /// Remove an object; `NotFound` when absent
    fn delete(&self, path: &str) -> HubResult<()>;

    /// Download token stored in the object's metadata
    fn download_token(&self, path: &str) -> HubResult<Option<String>>;

    /// Public download URL of `path` authorised by `token`
    fn public_url(&self, path: &str, token: &str) -> String;
}

/// Random v4 UUID used as an object's download token
pub fn new_download_token() -> String {
    Uuid::new_v4().to_string()
}

/// Percent-encode an object path for use inside a URL; `/` is kept
pub fn encode_object_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{:02X}", other)),
        }
    }
    encoded
}
