pub mod reading;
pub mod reference;
pub mod statistics;
pub mod summary;

pub use reading::{GroupKey, Reading, ReadingTable};
pub use reference::ReferenceAttributes;
pub use statistics::{DailySpread, ExtremaRow, MergedRow, QuantileRow, QUANTILE_PROBABILITIES};
pub use summary::{Summary, TightFrame, SUMMARY_FIELDS};
