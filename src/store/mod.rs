pub mod local;

pub use local::LocalObjectStore;

use crate::error::Result;
use std::io::Read;

/// One page of a listing; `next` continues it when more keys remain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub next: Option<String>,
}

/// Read access to a keyed object store.
pub trait ObjectStore: Send + Sync {
    /// List one page of keys under `prefix`, starting after `continuation` if given.
    fn list_page(&self, prefix: &str, continuation: Option<&str>) -> Result<ListPage>;

    /// Open an object for reading.
    fn open(&self, key: &str) -> Result<Box<dyn Read + Send>>;

    /// All keys under `prefix`, following continuations until the listing is exhausted.
    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self.list_page(prefix, continuation.as_deref())?;
            keys.extend(page.keys);

            match page.next {
                Some(next) => continuation = Some(next),
                None => break,
            }
        }

        Ok(keys)
    }
}
