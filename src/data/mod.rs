pub mod csv_store;

pub use csv_store::{metrics_to_csv_string, write_metrics, write_metrics_csv, CsvPriceSource};

use crate::error::MetricsError;
use crate::models::PriceRecord;

/// 소스에서 읽은 가격 테이블
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    pub records: Vec<PriceRecord>,
    /// 행은 있었지만 유효한 종가가 하나도 없던 심볼 (사전순)
    pub empty_symbols: Vec<String>,
}

impl From<Vec<PriceRecord>> for PriceTable {
    fn from(records: Vec<PriceRecord>) -> Self {
        Self { records, empty_symbols: Vec::new() }
    }
}

/// 가격 테이블 제공자 (CSV 파일, 원격 수집기 등)
pub trait PriceSource {
    fn describe(&self) -> String;
    fn load_prices(&self) -> Result<PriceTable, MetricsError>;
}
