use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub current_price: f64,
    pub normalized_short: f64,
    pub normalized_long: f64,
    pub predicted_return_short: f64,
    pub predicted_return_long: f64,
}

impl MetricRecord {
    /// 모든 수치 필드가 유한한지 확인
    pub fn is_finite(&self) -> bool {
        [
            self.current_price,
            self.normalized_short,
            self.normalized_long,
            self.predicted_return_short,
            self.predicted_return_long,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
