use crate::error::{ProcessingError, Result};
use crate::models::{GroupKey, QuantileRow, QUANTILE_PROBABILITIES};
use crate::processors::grouping::{GroupExecutor, GroupedMeasures};

/// Quantile of an ascending sample by linear interpolation at index `p * (n - 1)`.
///
/// Returns NaN for an empty sample.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }

    let position = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// The five daily quantiles of one group. A NaN measure makes every quantile NaN.
pub fn quantiles(key: &GroupKey, measures: &[f64]) -> Result<QuantileRow> {
    if measures.is_empty() {
        return Err(ProcessingError::GroupComputation {
            sequence_id: key.sequence_id,
            date: key.date.clone(),
            message: "no measures in group".to_string(),
        });
    }

    if measures.iter().any(|m| m.is_nan()) {
        return Ok(QuantileRow::new(key, [f64::NAN; 5]));
    }

    let mut sorted = measures.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(QuantileRow::new(
        key,
        QUANTILE_PROBABILITIES.map(|p| quantile(&sorted, p)),
    ))
}

/// Computes the quantile rows of every group on the worker pool.
pub struct DistributionCalculator {
    executor: GroupExecutor,
}

impl DistributionCalculator {
    pub fn new(executor: GroupExecutor) -> Self {
        Self { executor }
    }

    pub fn calculate(&self, groups: &GroupedMeasures) -> Result<Vec<QuantileRow>> {
        self.executor.apply(groups, quantiles)
    }
}
