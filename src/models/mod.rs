pub mod metric;
pub mod price;

pub use metric::MetricRecord;
pub use price::PriceRecord;
