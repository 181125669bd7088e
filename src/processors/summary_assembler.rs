use crate::error::Result;
use crate::models::{DailySpread, Summary, TightFrame, SUMMARY_FIELDS};
use crate::processors::AttributeJoiner;
use serde_json::Value;
use std::collections::BTreeMap;

/// Packages daily spreads into one summary document per sequence.
pub struct SummaryAssembler<'a> {
    joiner: &'a AttributeJoiner,
}

impl<'a> SummaryAssembler<'a> {
    pub fn new(joiner: &'a AttributeJoiner) -> Self {
        Self { joiner }
    }

    /// One summary per distinct sequence, in sequence order
    pub fn assemble(&self, spreads: &[DailySpread]) -> Result<Vec<Summary>> {
        let mut by_sequence: BTreeMap<i64, Vec<&DailySpread>> = BTreeMap::new();
        for spread in spreads {
            by_sequence
                .entry(spread.sequence_id())
                .or_default()
                .push(spread);
        }

        by_sequence
            .into_iter()
            .map(|(sequence_id, rows)| {
                let attributes = self.joiner.attributes(sequence_id)?;
                Ok(Summary::new(attributes, Self::tight_frame(rows)))
            })
            .collect()
    }

    /// Tight layout of the summary fields, rows ordered by date
    pub fn tight_frame(mut rows: Vec<&DailySpread>) -> TightFrame {
        rows.sort_by(|a, b| a.row.date.cmp(&b.row.date));

        TightFrame {
            index: (0..rows.len()).collect(),
            columns: SUMMARY_FIELDS.iter().map(|c| c.to_string()).collect(),
            data: rows.into_iter().map(Self::values).collect(),
        }
    }

    // Same order as SUMMARY_FIELDS; non-finite floats become null
    fn values(spread: &DailySpread) -> Vec<Value> {
        let row = &spread.row;
        vec![
            Value::from(spread.epochmilli),
            Value::from(row.lower_decile),
            Value::from(row.lower_quartile),
            Value::from(row.median),
            Value::from(row.upper_quartile),
            Value::from(row.upper_decile),
            Value::from(row.minimum),
            Value::from(row.maximum),
            Value::from(row.date.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::models::{MergedRow, ReferenceAttributes};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spread(sequence_id: i64, date: &str, epochmilli: i64, median: f64) -> DailySpread {
        DailySpread::new(
            epochmilli,
            MergedRow {
                sequence_id,
                date: date.to_string(),
                lower_decile: median - 2.0,
                lower_quartile: median - 1.0,
                median,
                upper_quartile: median + 1.0,
                upper_decile: median + 2.0,
                minimum: median - 3.0,
                maximum: median + 3.0,
            },
        )
    }

    fn joiner() -> AttributeJoiner {
        AttributeJoiner::new(vec![
            ReferenceAttributes::new(1, 1017, 6),
            ReferenceAttributes::new(2, 1017, 7),
        ])
    }

    #[test]
    fn test_one_summary_per_sequence() -> Result<()> {
        let joiner = joiner();
        let spreads = vec![
            spread(2, "2023-01-01", 1_672_531_200_000, 5.0),
            spread(1, "2023-01-02", 1_672_617_600_000, 20.0),
            spread(1, "2023-01-01", 1_672_531_200_000, 10.0),
        ];

        let summaries = SummaryAssembler::new(&joiner).assemble(&spreads)?;

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].sequence_id(), 1);
        assert_eq!(summaries[0].row_count(), 2);
        assert_eq!(summaries[1].attributes.pollutant_id, 7);
        assert_eq!(summaries[1].document_stem(), "pollutant_7_station_1017");
        Ok(())
    }

    #[test]
    fn test_fixed_columns_and_date_order() -> Result<()> {
        let joiner = joiner();
        let spreads = vec![
            spread(1, "2023-01-02", 1_672_617_600_000, 20.0),
            spread(1, "2023-01-01", 1_672_531_200_000, 10.0),
        ];

        let summaries = SummaryAssembler::new(&joiner).assemble(&spreads)?;
        let summary = &summaries[0];

        assert_eq!(
            summary.columns,
            vec![
                "epochmilli",
                "lower_decile",
                "lower_quartile",
                "median",
                "upper_quartile",
                "upper_decile",
                "minimum",
                "maximum",
                "date"
            ]
        );
        assert_eq!(
            summary.data[0],
            vec![
                json!(1_672_531_200_000_i64),
                json!(8.0),
                json!(9.0),
                json!(10.0),
                json!(11.0),
                json!(12.0),
                json!(7.0),
                json!(13.0),
                json!("2023-01-01")
            ]
        );
        assert_eq!(summary.data[1][8], json!("2023-01-02"));
        Ok(())
    }

    #[test]
    fn test_tight_frame_index_and_nan() {
        let nan_spread = spread(1, "2023-01-03", 1_672_704_000_000, f64::NAN);
        let regular = spread(1, "2023-01-01", 1_672_531_200_000, 1.0);

        let frame = SummaryAssembler::tight_frame(vec![&nan_spread, &regular]);

        assert_eq!(frame.index, vec![0, 1]);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.column("median"), Some(vec![&json!(1.0), &Value::Null]));
    }

    #[test]
    fn test_unknown_sequence_fails() {
        let joiner = joiner();
        let spreads = vec![spread(9, "2023-01-01", 1_672_531_200_000, 1.0)];

        assert!(matches!(
            SummaryAssembler::new(&joiner).assemble(&spreads),
            Err(ProcessingError::JoinIntegrity { sequence_id: 9, .. })
        ));
    }

    #[test]
    fn test_no_spreads_no_summaries() -> Result<()> {
        let joiner = joiner();
        assert!(SummaryAssembler::new(&joiner).assemble(&[])?.is_empty());
        Ok(())
    }
}
