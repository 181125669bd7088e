pub mod attribute_joiner;
pub mod data_merger;
pub mod distributions;
pub mod epoch;
pub mod extrema;
pub mod grouping;
pub mod pipeline;
pub mod summary_assembler;

pub use attribute_joiner::AttributeJoiner;
pub use data_merger::{inner_join, DataMerger, Keyed};
pub use distributions::{quantile, quantiles, DistributionCalculator};
pub use epoch::{date_from_epoch_millis, epoch_millis, parse_date, EpochEnricher};
pub use extrema::{extrema, ExtremaCalculator};
pub use grouping::{build_pool, GroupExecutor, GroupFn, GroupedMeasures};
pub use pipeline::{NodeFailure, NodeReport, RunReport, SpreadsPipeline};
pub use summary_assembler::SummaryAssembler;
