use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ReferenceAttributes;

/// Output fields of a summary, in document order.
pub const SUMMARY_FIELDS: [&str; 9] = [
    "epochmilli",
    "lower_decile",
    "lower_quartile",
    "median",
    "upper_quartile",
    "upper_decile",
    "minimum",
    "maximum",
    "date",
];

/// A table in tight layout: a row index, the column names and row-major values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TightFrame {
    pub index: Vec<usize>,
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl TightFrame {
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let position = self.columns.iter().position(|c| c == name)?;
        Some(self.data.iter().map(|row| &row[position]).collect())
    }
}

/// The persisted document of one sequence: its attributes and daily spreads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub attributes: ReferenceAttributes,
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl Summary {
    pub fn new(attributes: ReferenceAttributes, frame: TightFrame) -> Self {
        Self {
            attributes,
            columns: frame.columns,
            data: frame.data,
        }
    }

    pub fn sequence_id(&self) -> i64 {
        self.attributes.sequence_id
    }

    pub fn document_stem(&self) -> String {
        self.attributes.document_stem()
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}
