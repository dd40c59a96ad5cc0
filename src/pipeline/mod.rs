pub mod engine;
pub mod report;

pub use engine::{compute_metrics, MetricsEngine};
pub use report::{MetricsRun, SymbolStatus, SymbolSummary};
