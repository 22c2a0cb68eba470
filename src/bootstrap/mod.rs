//! Bootstrap orchestration.

pub mod pipeline;
pub mod status;

pub use pipeline::{BootstrapOutcome, BootstrapPipeline};
pub use status::{inspect, StatusReport};
