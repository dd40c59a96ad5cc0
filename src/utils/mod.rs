//! 공통 유틸리티
//!
//! 날짜 파싱, 로깅, 수학 함수 제공

pub mod logging;
pub mod math;

use chrono::{DateTime, NaiveDate};

use crate::error::MetricsError;

/// 날짜 문자열을 달력 날짜로 변환
///
/// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS±HH:MM`, RFC 3339 형식을 허용한다.
pub fn parse_date(raw: &str) -> Result<NaiveDate, MetricsError> {
  let s = raw.trim();

  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Ok(date);
  }
  if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
    return Ok(dt.date_naive());
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.date_naive());
  }

  Err(MetricsError::ParseError(format!("Unrecognized date '{}'", raw)))
}

/// 날짜를 `YYYY-MM-DD` 문자열로 변환
pub fn format_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}
