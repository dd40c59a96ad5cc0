use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 일봉 가격 레코드. 코어는 `date`, `symbol`, `close`만 사용한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
    pub dividends: Option<f64>,
    pub stock_splits: Option<f64>,
}

impl PriceRecord {
    pub fn new(symbol: impl Into<String>, date: NaiveDate, close: f64) -> Self {
        PriceRecord {
            date,
            symbol: symbol.into(),
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
            dividends: None,
            stock_splits: None,
        }
    }
}
