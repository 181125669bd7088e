use crate::utils::constants::{DEFAULT_SHARD_SUFFIX, KEY_SEPARATOR};
use std::collections::BTreeSet;
use std::fmt;

/// A partitioned dataset: the shards directly under `prefix` whose names end in `suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub prefix: String,
    pub suffix: String,
}

impl Node {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Wildcard form of the node, e.g. `readings/station_1/*.csv`
    pub fn pattern(&self) -> String {
        if self.prefix.is_empty() {
            format!("*{}", self.suffix)
        } else {
            format!("{}{}*{}", self.prefix, KEY_SEPARATOR, self.suffix)
        }
    }

    /// Listing prefix covering every shard of the node
    pub fn listing_prefix(&self) -> String {
        if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.prefix, KEY_SEPARATOR)
        }
    }

    /// Whether `key` is a shard of this node: a direct child ending in the suffix
    pub fn contains(&self, key: &str) -> bool {
        let Some(name) = key.strip_prefix(&self.listing_prefix()) else {
            return false;
        };
        !name.is_empty() && !name.contains(KEY_SEPARATOR) && name.ends_with(&self.suffix)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}

/// Derives the distinct nodes of a set of object keys.
pub struct PartitionLocator {
    suffix: String,
}

impl PartitionLocator {
    pub fn new() -> Self {
        Self::with_suffix(DEFAULT_SHARD_SUFFIX)
    }

    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Unique parent prefixes of the shard keys, in prefix order
    pub fn locate<S: AsRef<str>>(&self, keys: &[S]) -> Vec<Node> {
        let prefixes: BTreeSet<&str> = keys
            .iter()
            .map(AsRef::as_ref)
            .filter(|key| key.ends_with(&self.suffix))
            .map(|key| key.rsplit_once(KEY_SEPARATOR).map_or("", |(parent, _)| parent))
            .collect();

        prefixes
            .into_iter()
            .map(|prefix| Node::new(prefix, self.suffix.clone()))
            .collect()
    }
}

impl Default for PartitionLocator {
    fn default() -> Self {
        Self::new()
    }
}
