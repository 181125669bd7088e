use crate::error::{ProcessingError, Result};
use crate::models::{ExtremaRow, GroupKey};
use crate::processors::grouping::{GroupExecutor, GroupedMeasures};

/// Minimum and maximum of one group. A NaN measure makes both NaN.
pub fn extrema(key: &GroupKey, measures: &[f64]) -> Result<ExtremaRow> {
    let Some(&first) = measures.first() else {
        return Err(ProcessingError::GroupComputation {
            sequence_id: key.sequence_id,
            date: key.date.clone(),
            message: "no measures in group".to_string(),
        });
    };

    if measures.iter().any(|m| m.is_nan()) {
        return Ok(ExtremaRow::new(key, f64::NAN, f64::NAN));
    }

    let (minimum, maximum) = measures
        .iter()
        .fold((first, first), |(lo, hi), &m| (lo.min(m), hi.max(m)));

    Ok(ExtremaRow::new(key, minimum, maximum))
}

/// Computes the extrema rows of every group on the worker pool.
pub struct ExtremaCalculator {
    executor: GroupExecutor,
}

impl ExtremaCalculator {
    pub fn new(executor: GroupExecutor) -> Self {
        Self { executor }
    }

    pub fn calculate(&self, groups: &GroupedMeasures) -> Result<Vec<ExtremaRow>> {
        self.executor.apply(groups, extrema)
    }
}
