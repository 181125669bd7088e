pub mod constants;
pub mod directories;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use directories::StorageDirectories;
pub use logging::init_tracing;
pub use progress::ProgressReporter;
