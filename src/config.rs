/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::MetricsError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub dir: String,
    pub stock_prices_file: String,
    pub metrics_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub window_short: usize,
    pub window_long: usize,
    pub predict_days: usize,
    #[serde(default)]
    pub on_data_error: DataErrorPolicy,
    #[serde(default)]
    pub parallel: bool,
}

/// 심볼 단위 데이터 품질 오류 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataErrorPolicy {
    /// 해당 심볼만 건너뛰고 계속 진행
    #[default]
    SkipSymbol,
    /// 전체 실행 중단
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

/// 출력 테이블 컬럼 이름 (윈도우 크기에 연동)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabels {
    pub normalized_short: String,
    pub normalized_long: String,
    pub predicted_return_short: String,
    pub predicted_return_long: String,
}

impl Config {
    /// Load configuration from `config.json` in the working directory
    pub fn load() -> Result<Self, MetricsError> {
        Self::load_from(Path::new("config.json"))
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self, MetricsError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| MetricsError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| MetricsError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str::<Config>(&contents)
                .map_err(|e| MetricsError::ConfigError(format!("Failed to parse config file: {}", e)))?
        } else {
            Config::default()
        };

        cfg.apply_env_overrides()?;
        cfg.metrics.validate()?;
        Ok(cfg)
    }

    /// Apply environment variable overrides for runtime fields
    fn apply_env_overrides(&mut self) -> Result<(), MetricsError> {
        use std::env;
        if let Ok(v) = env::var("STOCK_DATA_DIR") { if !v.is_empty() { self.data.dir = v; } }
        if let Ok(v) = env::var("METRICS_WINDOW_SHORT") { self.metrics.window_short = parse_env("METRICS_WINDOW_SHORT", &v)?; }
        if let Ok(v) = env::var("METRICS_WINDOW_LONG") { self.metrics.window_long = parse_env("METRICS_WINDOW_LONG", &v)?; }
        if let Ok(v) = env::var("METRICS_PREDICT_DAYS") { self.metrics.predict_days = parse_env("METRICS_PREDICT_DAYS", &v)?; }
        if let Ok(v) = env::var("METRICS_ON_DATA_ERROR") {
            self.metrics.on_data_error = match v.to_lowercase().as_str() {
                "skip" | "skip_symbol" => DataErrorPolicy::SkipSymbol,
                "abort" => DataErrorPolicy::Abort,
                other => {
                    return Err(MetricsError::ConfigError(format!(
                        "METRICS_ON_DATA_ERROR: expected 'skip_symbol' or 'abort', found '{}'",
                        other
                    )))
                }
            };
        }
        Ok(())
    }

    pub fn stock_prices_path(&self) -> PathBuf {
        Path::new(&self.data.dir).join(&self.data.stock_prices_file)
    }

    pub fn metrics_path(&self) -> PathBuf {
        Path::new(&self.data.dir).join(&self.data.metrics_file)
    }
}

fn parse_env(name: &str, value: &str) -> Result<usize, MetricsError> {
    value.trim().parse::<usize>().map_err(|_| {
        MetricsError::ConfigError(format!("{}: expected a positive integer, found '{}'", name, value))
    })
}

impl MetricsConfig {
    pub fn new(window_short: usize, window_long: usize, predict_days: usize) -> Self {
        MetricsConfig {
            window_short,
            window_long,
            predict_days,
            on_data_error: DataErrorPolicy::default(),
            parallel: false,
        }
    }

    pub fn with_policy(mut self, policy: DataErrorPolicy) -> Self {
        self.on_data_error = policy;
        self
    }

    /// 윈도우/예측 기간 검증
    pub fn validate(&self) -> Result<(), MetricsError> {
        // 회귀 적합에는 최소 2개의 가격이 필요
        if self.window_short < 2 {
            return Err(MetricsError::ConfigError(format!(
                "window_short must be >= 2 (stricter than the nominal lower bound of 1: \
                 the log-linear fit needs two points), found {}",
                self.window_short
            )));
        }
        if self.window_long < self.window_short {
            return Err(MetricsError::ConfigError(format!(
                "window_long must be >= window_short ({}), found {}",
                self.window_short, self.window_long
            )));
        }
        if self.predict_days < 1 {
            return Err(MetricsError::ConfigError(format!(
                "predict_days must be >= 1, found {}",
                self.predict_days
            )));
        }
        // 최소 필요 데이터 수(window_long + 1)와 예측 지점 계산이 넘치지 않아야 함
        if self.window_long.checked_add(1).is_none() {
            return Err(MetricsError::ConfigError(format!(
                "window_long is too large, found {}",
                self.window_long
            )));
        }
        if (self.window_long - 1).checked_add(self.predict_days).is_none() {
            return Err(MetricsError::ConfigError(format!(
                "window_long - 1 + predict_days overflows: window_long={}, predict_days={}",
                self.window_long, self.predict_days
            )));
        }
        Ok(())
    }

    /// 심볼별 최소 필요 데이터 수
    pub fn required_points(&self) -> usize {
        self.window_long.saturating_add(1)
    }

    pub fn labels(&self) -> ColumnLabels {
        ColumnLabels::from(self)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig::new(20, 200, 200)
    }
}

impl From<&MetricsConfig> for ColumnLabels {
    fn from(cfg: &MetricsConfig) -> Self {
        ColumnLabels {
            normalized_short: format!("Normalized_{}", cfg.window_short),
            normalized_long: format!("Normalized_{}", cfg.window_long),
            predicted_return_short: format!("PredReturn_{}exp", cfg.window_short),
            predicted_return_long: format!("PredReturn_{}exp", cfg.window_long),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                dir: "data".to_string(),
                stock_prices_file: "stock_prices.csv".to_string(),
                metrics_file: "metrics.csv".to_string(),
            },
            metrics: MetricsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}
