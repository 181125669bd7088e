use crate::error::{ProcessingError, Result};
use crate::models::{GroupKey, ReadingTable};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-group computation. A plain `fn` cannot capture state, so it is safe on any worker.
pub type GroupFn<T> = fn(&GroupKey, &[f64]) -> Result<T>;

/// The `(sequence_id, date, measure)` projection of a table, grouped by key.
#[derive(Debug, Clone, Default)]
pub struct GroupedMeasures {
    groups: BTreeMap<GroupKey, Vec<f64>>,
}

impl GroupedMeasures {
    pub fn from_table(table: &ReadingTable) -> Self {
        let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
        for reading in &table.readings {
            groups
                .entry(reading.group_key())
                .or_default()
                .push(reading.measure);
        }
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&[f64]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }
}

/// Applies a per-group function to every group on a shared worker pool.
///
/// The first failing group fails the whole computation; no partial results are returned.
#[derive(Clone)]
pub struct GroupExecutor {
    pool: Arc<ThreadPool>,
}

impl GroupExecutor {
    pub fn new(pool: Arc<ThreadPool>) -> Self {
        Self { pool }
    }

    /// Build an executor over a dedicated pool of `max_workers` threads
    pub fn with_workers(max_workers: usize) -> Result<Self> {
        Ok(Self::new(Arc::new(build_pool(max_workers)?)))
    }

    pub fn pool(&self) -> &Arc<ThreadPool> {
        &self.pool
    }

    /// Results in group key order
    pub fn apply<T: Send>(&self, groups: &GroupedMeasures, compute: GroupFn<T>) -> Result<Vec<T>> {
        self.pool.install(|| {
            groups
                .groups
                .par_iter()
                .map(|(key, measures)| compute(key, measures))
                .collect()
        })
    }
}

/// Worker pool shared by shard reads and grouped aggregation
pub fn build_pool(max_workers: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .thread_name(|index| format!("spreads-worker-{}", index))
        .build()
        .map_err(|e| ProcessingError::Config(e.to_string()))
}
