pub mod partition_locator;
pub mod partitioned_reader;
pub mod reference_reader;

pub use partition_locator::{Node, PartitionLocator};
pub use partitioned_reader::PartitionedReader;
pub use reference_reader::ReferenceReader;
