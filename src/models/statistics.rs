use serde::{Deserialize, Serialize};

use crate::models::GroupKey;

/// Probabilities evaluated by the distribution calculator, in slot order.
pub const QUANTILE_PROBABILITIES: [f64; 5] = [0.1, 0.25, 0.5, 0.75, 0.9];

/// Five quantiles of one group's measures; `values[i]` is at `QUANTILE_PROBABILITIES[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileRow {
    pub sequence_id: i64,
    pub date: String,
    pub values: [f64; 5],
}

impl QuantileRow {
    pub fn new(key: &GroupKey, values: [f64; 5]) -> Self {
        Self {
            sequence_id: key.sequence_id,
            date: key.date.clone(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremaRow {
    pub sequence_id: i64,
    pub date: String,
    pub minimum: f64,
    pub maximum: f64,
}

impl ExtremaRow {
    pub fn new(key: &GroupKey, minimum: f64, maximum: f64) -> Self {
        Self {
            sequence_id: key.sequence_id,
            date: key.date.clone(),
            minimum,
            maximum,
        }
    }
}

/// A quantile row joined with the extrema row of the same group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub sequence_id: i64,
    pub date: String,
    pub lower_decile: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub upper_decile: f64,
    pub minimum: f64,
    pub maximum: f64,
}

impl MergedRow {
    /// Whether the spread is ordered from minimum through the quantiles to maximum.
    pub fn is_monotonic(&self) -> bool {
        let ordered = [
            self.minimum,
            self.lower_decile,
            self.lower_quartile,
            self.median,
            self.upper_quartile,
            self.upper_decile,
            self.maximum,
        ];
        ordered.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// A merged row with its day expressed as milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpread {
    pub epochmilli: i64,
    #[serde(flatten)]
    pub row: MergedRow,
}

impl DailySpread {
    pub fn new(epochmilli: i64, row: MergedRow) -> Self {
        Self { epochmilli, row }
    }

    pub fn sequence_id(&self) -> i64 {
        self.row.sequence_id
    }
}
