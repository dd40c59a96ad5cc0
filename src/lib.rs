//! 일봉 가격 지표 계산 라이브러리
//!
//! 심볼별 가격 이력으로부터 범위 정규화 위치와 로그-선형 외삽 기반 예측 수익 비율을 계산합니다.

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod utils;

// 핵심 타입 재노출
pub use crate::config::{ColumnLabels, Config, DataErrorPolicy, MetricsConfig};
pub use crate::data::{CsvPriceSource, PriceSource, PriceTable};
pub use crate::error::MetricsError;
pub use crate::indicators::{fit_log_linear, normalize, predict_log_linear, Indicator};
pub use crate::models::{MetricRecord, PriceRecord};
pub use crate::pipeline::{compute_metrics, MetricsEngine, MetricsRun};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, MetricsError>;
