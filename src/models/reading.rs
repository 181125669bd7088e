use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of raw telemetry: a measure of a sequence on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sequence_id: i64,
    pub date: String,
    pub measure: f64,
}

impl Reading {
    pub fn new(sequence_id: i64, date: impl Into<String>, measure: f64) -> Self {
        Self {
            sequence_id,
            date: date.into(),
            measure,
        }
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.sequence_id, self.date.clone())
    }
}

/// The `(sequence_id, date)` pair that identifies one day of one sequence.
///
/// Ordering is by sequence, then by date; ISO dates sort chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub sequence_id: i64,
    pub date: String,
}

impl GroupKey {
    pub fn new(sequence_id: i64, date: impl Into<String>) -> Self {
        Self {
            sequence_id,
            date: date.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sequence {} on {}", self.sequence_id, self.date)
    }
}

/// All readings of one node, concatenated across its shards in no particular order.
#[derive(Debug, Clone, Default)]
pub struct ReadingTable {
    pub readings: Vec<Reading>,
    pub shards: usize,
}

impl ReadingTable {
    pub fn new(readings: Vec<Reading>, shards: usize) -> Self {
        Self { readings, shards }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
