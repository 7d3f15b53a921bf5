mod metrics;
mod processor;

pub use metrics::BatchSummary;
pub use processor::BatchProcessor;
