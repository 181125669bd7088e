use crate::error::{ProcessingError, Result};
use crate::models::ReferenceAttributes;
use std::collections::HashMap;

/// Looks up the reference attributes of a sequence.
///
/// Exactly one reference record must exist per sequence: a missing or duplicated record is a
/// [`ProcessingError::JoinIntegrity`] error, never resolved by picking one of the candidates.
pub struct AttributeJoiner {
    by_sequence: HashMap<i64, Vec<ReferenceAttributes>>,
}

impl AttributeJoiner {
    pub fn new(references: Vec<ReferenceAttributes>) -> Self {
        let mut by_sequence: HashMap<i64, Vec<ReferenceAttributes>> = HashMap::new();
        for reference in references {
            by_sequence
                .entry(reference.sequence_id)
                .or_default()
                .push(reference);
        }
        Self { by_sequence }
    }

    pub fn attributes(&self, sequence_id: i64) -> Result<ReferenceAttributes> {
        match self.by_sequence.get(&sequence_id).map(Vec::as_slice) {
            Some([reference]) => Ok(reference.clone()),
            matches => Err(ProcessingError::JoinIntegrity {
                sequence_id,
                matches: matches.map_or(0, <[ReferenceAttributes]>::len),
            }),
        }
    }

    /// Sequences with more than one reference record, sorted
    pub fn duplicated_sequences(&self) -> Vec<i64> {
        let mut duplicated: Vec<i64> = self
            .by_sequence
            .iter()
            .filter(|(_, records)| records.len() > 1)
            .map(|(sequence_id, _)| *sequence_id)
            .collect();
        duplicated.sort_unstable();
        duplicated
    }

    pub fn len(&self) -> usize {
        self.by_sequence.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sequence.is_empty()
    }
}
