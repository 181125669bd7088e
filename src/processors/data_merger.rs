use crate::models::{ExtremaRow, GroupKey, MergedRow, QuantileRow};
use std::collections::HashMap;

/// Rows that belong to one `(sequence_id, date)` group.
pub trait Keyed {
    fn key(&self) -> GroupKey;
}

impl Keyed for QuantileRow {
    fn key(&self) -> GroupKey {
        GroupKey::new(self.sequence_id, self.date.clone())
    }
}

impl Keyed for ExtremaRow {
    fn key(&self) -> GroupKey {
        GroupKey::new(self.sequence_id, self.date.clone())
    }
}

impl Keyed for MergedRow {
    fn key(&self) -> GroupKey {
        GroupKey::new(self.sequence_id, self.date.clone())
    }
}

/// Inner join on the group key, in key order; keys missing on either side are dropped.
pub fn inner_join<'a, L: Keyed, R: Keyed>(left: &'a [L], right: &'a [R]) -> Vec<(&'a L, &'a R)> {
    let index: HashMap<GroupKey, &R> = right.iter().map(|row| (row.key(), row)).collect();

    let mut joined: Vec<(GroupKey, &L, &R)> = left
        .iter()
        .filter_map(|l| {
            let key = l.key();
            index.get(&key).map(|r| (key, l, *r))
        })
        .collect();

    joined.sort_by(|a, b| a.0.cmp(&b.0));
    joined.into_iter().map(|(_, l, r)| (l, r)).collect()
}

/// Joins quantile and extrema rows into named daily spreads.
///
/// Inputs are only borrowed; every merged row is a fresh copy.
pub struct DataMerger;

impl DataMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, quantiles: &[QuantileRow], extrema: &[ExtremaRow]) -> Vec<MergedRow> {
        inner_join(quantiles, extrema)
            .into_iter()
            .map(|(q, e)| Self::merged_row(q, e))
            .collect()
    }

    fn merged_row(quantiles: &QuantileRow, extrema: &ExtremaRow) -> MergedRow {
        let [lower_decile, lower_quartile, median, upper_quartile, upper_decile] = quantiles.values;

        MergedRow {
            sequence_id: quantiles.sequence_id,
            date: quantiles.date.clone(),
            lower_decile,
            lower_quartile,
            median,
            upper_quartile,
            upper_decile,
            minimum: extrema.minimum,
            maximum: extrema.maximum,
        }
    }
}

impl Default for DataMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::{Reading, ReadingTable};
    use crate::processors::{DistributionCalculator, ExtremaCalculator, GroupExecutor, GroupedMeasures};
    use pretty_assertions::assert_eq;

    fn quantile_row(sequence_id: i64, date: &str, base: f64) -> QuantileRow {
        QuantileRow::new(
            &GroupKey::new(sequence_id, date),
            [base + 1.0, base + 2.0, base + 3.0, base + 4.0, base + 5.0],
        )
    }

    fn extrema_row(sequence_id: i64, date: &str, base: f64) -> ExtremaRow {
        ExtremaRow::new(&GroupKey::new(sequence_id, date), base, base + 6.0)
    }

    #[test]
    fn test_merge_renames_quantile_slots() {
        let quantiles = vec![quantile_row(1, "2023-01-01", 10.0)];
        let extrema = vec![extrema_row(1, "2023-01-01", 10.0)];

        let merged = DataMerger::new().merge(&quantiles, &extrema);

        assert_eq!(
            merged,
            vec![MergedRow {
                sequence_id: 1,
                date: "2023-01-01".to_string(),
                lower_decile: 11.0,
                lower_quartile: 12.0,
                median: 13.0,
                upper_quartile: 14.0,
                upper_decile: 15.0,
                minimum: 10.0,
                maximum: 16.0,
            }]
        );
    }

    #[test]
    fn test_unmatched_keys_are_dropped() {
        // Only 2023-01-02 exists on both sides; the other rows have no partner and vanish.
        let quantiles = vec![
            quantile_row(1, "2023-01-01", 0.0),
            quantile_row(1, "2023-01-02", 0.0),
        ];
        let extrema = vec![
            extrema_row(1, "2023-01-02", 0.0),
            extrema_row(2, "2023-01-02", 0.0),
        ];

        let merged = DataMerger::new().merge(&quantiles, &extrema);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].key(), GroupKey::new(1, "2023-01-02"));
        assert!(merged.len() <= quantiles.len().min(extrema.len()));
    }

    #[test]
    fn test_inputs_are_untouched() {
        let quantiles = vec![quantile_row(1, "2023-01-01", 0.0)];
        let extrema = vec![extrema_row(1, "2023-01-01", 0.0)];
        let (quantiles_before, extrema_before) = (quantiles.clone(), extrema.clone());

        let _ = DataMerger::new().merge(&quantiles, &extrema);

        assert_eq!(quantiles, quantiles_before);
        assert_eq!(extrema, extrema_before);
    }

    #[test]
    fn test_join_is_commutative() {
        let quantiles = vec![
            quantile_row(2, "2023-01-01", 5.0),
            quantile_row(1, "2023-01-02", 1.0),
            quantile_row(1, "2023-01-01", 0.0),
        ];
        let extrema = vec![
            extrema_row(1, "2023-01-01", 0.0),
            extrema_row(2, "2023-01-01", 5.0),
            extrema_row(1, "2023-01-02", 1.0),
        ];

        let quantiles_first: Vec<MergedRow> = inner_join(&quantiles, &extrema)
            .into_iter()
            .map(|(q, e)| DataMerger::merged_row(q, e))
            .collect();
        let extrema_first: Vec<MergedRow> = inner_join(&extrema, &quantiles)
            .into_iter()
            .map(|(e, q)| DataMerger::merged_row(q, e))
            .collect();

        assert_eq!(quantiles_first, extrema_first);
        assert_eq!(quantiles_first.len(), 3);
        assert_eq!(quantiles_first[0].key(), GroupKey::new(1, "2023-01-01"));
    }

    #[test]
    fn test_row_keys() {
        let key = GroupKey::new(3, "2024-02-29");
        assert_eq!(QuantileRow::new(&key, [0.0; 5]).key(), key);
        assert_eq!(ExtremaRow::new(&key, 0.0, 1.0).key(), key);
    }

    #[test]
    fn test_computed_spreads_are_ordered() -> Result<()> {
        // One, two, seven and fifty measures per group
        let mut readings = vec![
            Reading::new(1, "2023-01-01", 4.2),
            Reading::new(2, "2023-01-01", -3.0),
            Reading::new(2, "2023-01-01", 8.5),
        ];
        for (i, measure) in [7.0, -1.5, 3.25, 3.25, 100.0, 0.0, 12.5].into_iter().enumerate() {
            readings.push(Reading::new(3, "2023-01-01", measure));
            readings.push(Reading::new(3, "2023-01-02", measure * (i as f64 - 3.0)));
        }
        for i in 0..50 {
            readings.push(Reading::new(4, "2023-01-01", ((i * 37) % 23) as f64 / 3.0));
        }
        let groups = GroupedMeasures::from_table(&ReadingTable::new(readings, 1));
        let executor = GroupExecutor::with_workers(2)?;

        let quantiles = DistributionCalculator::new(executor.clone()).calculate(&groups)?;
        let extrema = ExtremaCalculator::new(executor).calculate(&groups)?;
        let merged = DataMerger::new().merge(&quantiles, &extrema);

        assert_eq!(merged.len(), groups.len());
        for row in &merged {
            assert!(row.is_monotonic(), "{:?}", row);
        }
        Ok(())
    }
}
