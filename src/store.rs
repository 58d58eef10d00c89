//! Blob store access for chat documents.
//!
//! Chat exports live in an object store addressed by `(bucket, key)`. The
//! [`BlobStore`] trait is the seam: [`FsBlobStore`] maps buckets to
//! directories, [`MemoryBlobStore`] keeps everything in a map (tests,
//! embedding). Network-backed stores implement the same two methods.
//!
//! A manifest names a document by a *search string* rather than a full key:
//! [`fetch_document`] lists the bucket and reads the first key that contains
//! it.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{BlobError, EcholaliaError};

/// Read access to a bucketed object store.
pub trait BlobStore: Send + Sync {
    /// Lists every key in `bucket`, in a stable order.
    fn list(&self, bucket: &str) -> Result<Vec<String>, BlobError>;

    /// Reads the object stored under `key`.
    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError>;
}

/// A store whose buckets are directories under a root.
///
/// Keys are `/`-separated paths relative to the bucket directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, BlobError> {
        let dir = self.root.join(bucket);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(BlobError::NotFound(format!("bucket '{bucket}'")))
        }
    }
}

fn collect_keys(base: &Path, dir: &Path, keys: &mut Vec<String>) -> Result<(), BlobError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_keys(base, &path, keys)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }
    }
    Ok(())
}

impl BlobStore for FsBlobStore {
    fn list(&self, bucket: &str) -> Result<Vec<String>, BlobError> {
        let dir = self.bucket_dir(bucket)?;
        let mut keys = Vec::new();
        collect_keys(&dir, &dir, &mut keys)?;
        keys.sort();
        Ok(keys)
    }

    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.bucket_dir(bucket)?.join(key);
        if !path.is_file() {
            return Err(BlobError::NotFound(key.to_string()));
        }
        Ok(fs::read(path)?)
    }
}

/// An in-memory store.
///
/// Can be told to fail the next few reads of a key with
/// [`BlobError::Transient`] to exercise retry paths.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: BTreeMap<(String, String), Vec<u8>>,
    failures: Mutex<HashMap<String, u32>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object.
    pub fn insert(&mut self, bucket: impl Into<String>, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.insert((bucket.into(), key.into()), data.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(bucket, key, data);
        self
    }

    /// Makes the next `times` reads of `key` fail transiently.
    #[must_use]
    pub fn with_transient_failures(self, key: impl Into<String>, times: u32) -> Self {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(key.into(), times);
        }
        self
    }
}

impl BlobStore for MemoryBlobStore {
    fn list(&self, bucket: &str) -> Result<Vec<String>, BlobError> {
        Ok(self
            .objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect())
    }

    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        if let Ok(mut failures) = self.failures.lock() {
            if let Some(remaining) = failures.get_mut(key).filter(|n| **n > 0) {
                *remaining -= 1;
                return Err(BlobError::Transient(format!("injected failure reading '{key}'")));
            }
        }

        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }
}

/// Runs `op`, retrying transient failures up to `max_attempts` in total.
fn with_retry<T>(
    max_attempts: u32,
    what: &str,
    mut op: impl FnMut() -> Result<T, BlobError>,
) -> Result<T, BlobError> {
    let mut attempt = 1;
    loop {
        match op() {
            Err(err) if err.is_transient() && attempt < max_attempts => {
                tracing::warn!(attempt, max_attempts, error = %err, "{what} failed, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// A document fetched from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// The full key that matched the search string
    pub key: String,
    /// UTF-8 content of the object
    pub content: String,
}

/// Finds and reads the first object in `bucket` whose key contains `search`.
///
/// # Errors
///
/// Any failure (no matching key, unreadable object, non-UTF-8 content, or a
/// transient error that persists past `max_attempts`) is reported as
/// [`EcholaliaError::RetrievalFailure`].
///
/// # Example
///
/// ```rust
/// use echolalia::store::{MemoryBlobStore, fetch_document};
///
/// let store = MemoryBlobStore::new().with_object("logs", "2024/alice/_chat.txt", "hi");
/// let doc = fetch_document(&store, "logs", "alice", 3)?;
/// assert_eq!(doc.key, "2024/alice/_chat.txt");
/// assert_eq!(doc.content, "hi");
/// # Ok::<(), echolalia::EcholaliaError>(())
/// ```
pub fn fetch_document(
    store: &dyn BlobStore,
    bucket: &str,
    search: &str,
    max_attempts: u32,
) -> Result<FetchedDocument, EcholaliaError> {
    let failure = |source: BlobError| EcholaliaError::retrieval(bucket, search, source);

    let keys = with_retry(max_attempts, "list", || store.list(bucket)).map_err(failure)?;
    let key = keys
        .into_iter()
        .find(|k| k.contains(search))
        .ok_or_else(|| failure(BlobError::NotFound(search.to_string())))?;

    let bytes = with_retry(max_attempts, "read", || store.read(bucket, &key)).map_err(failure)?;
    let content = String::from_utf8(bytes).map_err(|e| failure(BlobError::Encoding(e)))?;

    tracing::debug!(bucket, key = %key, bytes = content.len(), "fetched document");
    Ok(FetchedDocument { key, content })
}
