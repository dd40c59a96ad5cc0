//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::config::LoggingConfig;
use crate::error::MetricsError;

/// 로그 레벨 문자열 파싱
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로그 출력 대상 결정: `file_path`가 있으면 해당 파일에 이어 쓰고, 없으면 stderr
pub fn log_target(config: &LoggingConfig) -> Result<Target, MetricsError> {
    let Some(file_path) = config.file_path.as_deref().filter(|p| !p.is_empty()) else {
        return Ok(Target::Stderr);
    };

    let path = Path::new(file_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MetricsError::ConfigError(format!("Failed to open log file {}: {}", file_path, e)))?;

    Ok(Target::Pipe(Box::new(file)))
}

/// 로깅 시스템 초기화
///
/// `RUST_LOG` 환경변수가 설정 파일의 레벨보다 우선한다.
pub fn init(config: &LoggingConfig) -> Result<(), MetricsError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    builder
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis()
        .target(log_target(config)?)
        .try_init()
        .map_err(|e| MetricsError::ConfigError(format!("Failed to initialize logger: {}", e)))?;

    log::info!(
        "로깅 시스템 초기화 완료: 레벨 = {}, 출력 = {}",
        log_level,
        config.file_path.as_deref().unwrap_or("stderr")
    );

    Ok(())
}

/// 심볼 처리 시작 로그
pub fn log_symbol_start(symbol: &str, index: usize, total: usize) {
    log::info!("지표 계산 시작: {} ({}/{})", symbol, index, total);
}

/// 심볼 처리 완료 로그
pub fn log_symbol_done(symbol: &str, emitted: usize, skipped: usize) {
    log::info!(
        "지표 계산 완료: {} - 생성: {} 행 - 이력 부족으로 건너뜀: {} 행",
        symbol, emitted, skipped
    );
}

/// 이력 부족 심볼 로그
pub fn log_symbol_insufficient(symbol: &str, points: usize, required: usize) {
    log::warn!(
        "심볼 건너뜀: {} - 데이터 {} 개, 최소 {} 개 필요",
        symbol, points, required
    );
}

/// 데이터 품질 오류로 건너뛴 심볼 로그
pub fn log_symbol_failed(symbol: &str, error: &MetricsError) {
    log::warn!("데이터 품질 오류로 심볼 건너뜀: {} - 원인: {}", symbol, error);
}
