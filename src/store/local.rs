use crate::error::{ProcessingError, Result};
use crate::store::{ListPage, ObjectStore};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_PAGE_SIZE, KEY_SEPARATOR};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

type KeySnapshot = (String, Arc<Vec<String>>);

/// An object store over a local directory tree; keys are `/`-separated paths under `root`.
///
/// Prefixes are raw string prefixes of keys, as in S3: `readings` also matches
/// `readings2/part-0.csv`, while `readings/` only matches keys inside `readings`.
pub struct LocalObjectStore {
    root: PathBuf,
    page_size: usize,
    // Keys of the listing in progress; pages after the first are served from it
    snapshot: Mutex<Option<KeySnapshot>>,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size: DEFAULT_PAGE_SIZE,
            snapshot: Mutex::new(None),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn listing_error(prefix: &str, message: impl Into<String>) -> ProcessingError {
        ProcessingError::Listing {
            prefix: prefix.to_string(),
            message: message.into(),
        }
    }

    /// Sorted keys starting with `prefix`. A first page walks the tree; later pages of the
    /// same prefix reuse that walk.
    fn prefix_keys(&self, prefix: &str, first_page: bool) -> Result<Arc<Vec<String>>> {
        if !first_page {
            let snapshot = self
                .snapshot
                .lock()
                .map_err(|_| Self::listing_error(prefix, "listing snapshot poisoned"))?;
            if let Some((cached, keys)) = snapshot.as_ref() {
                if cached == prefix {
                    return Ok(keys.clone());
                }
            }
        }

        let keys: Arc<Vec<String>> = Arc::new(
            self.walk(prefix)?
                .into_iter()
                .filter(|key| key.starts_with(prefix))
                .collect(),
        );

        *self
            .snapshot
            .lock()
            .map_err(|_| Self::listing_error(prefix, "listing snapshot poisoned"))? =
            Some((prefix.to_string(), keys.clone()));
        Ok(keys)
    }

    /// Every file key below the deepest directory named by `prefix`, sorted
    fn walk(&self, prefix: &str) -> Result<Vec<String>> {
        let base = match prefix.rsplit_once(KEY_SEPARATOR) {
            Some((dir, _)) => self.path_of(dir)?,
            None => self.root.clone(),
        };
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        let mut pending = vec![base];

        while let Some(dir) = pending.pop() {
            let entries = std::fs::read_dir(&dir)
                .map_err(|e| Self::listing_error(prefix, format!("{}: {}", dir.display(), e)))?;

            for entry in entries {
                let entry =
                    entry.map_err(|e| Self::listing_error(prefix, e.to_string()))?;
                let path = entry.path();

                if path.is_dir() {
                    pending.push(path);
                } else if path.is_file() {
                    if let Some(key) = self.key_of(&path) {
                        keys.push(key);
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn key_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join(KEY_SEPARATOR))
    }

    /// An empty directory is a valid, empty prefix
    fn prefix_is_directory(&self, prefix: &str) -> bool {
        let trimmed = prefix.trim_end_matches(KEY_SEPARATOR);
        trimmed.is_empty() || self.path_of(trimmed).map_or(false, |path| path.is_dir())
    }

    fn path_of(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ProcessingError::InvalidFormat(format!(
                "Object key must be a relative path without '..': '{}'",
                key
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for LocalObjectStore {
    fn list_page(&self, prefix: &str, continuation: Option<&str>) -> Result<ListPage> {
        if !self.root.is_dir() {
            return Err(Self::listing_error(
                prefix,
                format!("store root {} does not exist", self.root.display()),
            ));
        }

        let keys = self.prefix_keys(prefix, continuation.is_none())?;

        if continuation.is_none() && keys.is_empty() && !self.prefix_is_directory(prefix) {
            return Err(Self::listing_error(prefix, "no objects under prefix"));
        }

        let start = continuation.map_or(0, |after| keys.partition_point(|key| key.as_str() <= after));
        let remaining = &keys[start..];
        let page: Vec<String> = remaining.iter().take(self.page_size).cloned().collect();
        let next = if remaining.len() > self.page_size {
            page.last().cloned()
        } else {
            None
        };

        Ok(ListPage { keys: page, next })
    }

    fn open(&self, key: &str) -> Result<Box<dyn Read + Send>> {
        let file = File::open(self.path_of(key)?)?;
        Ok(Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)))
    }
}
