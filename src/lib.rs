pub mod chart;
pub mod dataset;
pub mod label;
pub mod record;

pub use record::BenchmarkRecord;
