use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ColumnLabels;
use crate::error::MetricsError;
use crate::models::{MetricRecord, PriceRecord};
use crate::utils::{format_date, parse_date};

use super::{PriceSource, PriceTable};

/// 입력 테이블 필수 컬럼
pub const REQUIRED_COLUMNS: [&str; 3] = ["Date", "Symbol", "Close"];

pub struct CsvPriceSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), delimiter: b',' }
    }

    /// 단일 바이트 구분자 지정 (예: `b';'`)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self) -> Result<csv::Reader<fs::File>, MetricsError> {
        let file = fs::File::open(&self.path).map_err(|e| {
            log::error!("가격 파일을 열 수 없음: {}", self.path.display());
            MetricsError::IoError(io::Error::new(
                e.kind(),
                format!("{}: {}", self.path.display(), e),
            ))
        })?;

        Ok(csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(file))
    }
}

impl PriceSource for CsvPriceSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load_prices(&self) -> Result<PriceTable, MetricsError> {
        let mut rdr = self.reader()?;

        let headers = rdr.headers()?.clone();
        let found: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        if REQUIRED_COLUMNS.iter().any(|col| !found.iter().any(|h| h == col)) {
            return Err(MetricsError::MissingColumns {
                expected: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found,
            });
        }

        let mut result = Vec::new();
        let mut seen_symbols = BTreeSet::new();
        let mut dropped = 0usize;

        for rec in rdr.deserialize() {
            let row: CsvPriceRow = rec?;

            if row.symbol.is_empty() {
                return Err(MetricsError::ParseError(format!(
                    "empty Symbol on row dated '{}'",
                    row.date
                )));
            }
            let date = parse_date(&row.date)?;
            seen_symbols.insert(row.symbol.clone());

            // 종가가 비어 있는 행은 제외
            let Some(close) = row.close else {
                dropped += 1;
                continue;
            };

            result.push(PriceRecord {
                date,
                symbol: row.symbol,
                open: row.open,
                high: row.high,
                low: row.low,
                close,
                volume: row.volume,
                dividends: row.dividends,
                stock_splits: row.stock_splits,
            });
        }

        if dropped > 0 {
            log::warn!("종가가 없는 {} 개 행 제외", dropped);
        }
        for record in &result {
            seen_symbols.remove(&record.symbol);
        }
        let empty_symbols: Vec<String> = seen_symbols.into_iter().collect();
        for symbol in &empty_symbols {
            log::warn!("{}", MetricsError::NoValidRows(symbol.clone()));
        }

        log::info!("{} 에서 {} 개 가격 레코드 로드", self.describe(), result.len());
        Ok(PriceTable { records: result, empty_symbols })
    }
}

#[derive(serde::Deserialize)]
struct CsvPriceRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Open", default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(rename = "High", default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(rename = "Low", default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Volume", default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
    #[serde(rename = "Dividends", default, deserialize_with = "csv::invalid_option")]
    dividends: Option<f64>,
    #[serde(rename = "Stock Splits", default, deserialize_with = "csv::invalid_option")]
    stock_splits: Option<f64>,
}

/// 지표 테이블을 CSV로 기록
pub fn write_metrics<W: io::Write>(
    writer: W,
    records: &[MetricRecord],
    labels: &ColumnLabels,
) -> Result<(), MetricsError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "Date",
        "Symbol",
        "CurrentPrice",
        labels.normalized_short.as_str(),
        labels.normalized_long.as_str(),
        labels.predicted_return_short.as_str(),
        labels.predicted_return_long.as_str(),
    ])?;

    for r in records {
        wtr.write_record([
            format_date(r.date),
            r.symbol.clone(),
            r.current_price.to_string(),
            r.normalized_short.to_string(),
            r.normalized_long.to_string(),
            r.predicted_return_short.to_string(),
            r.predicted_return_long.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 지표 테이블을 파일로 저장 (상위 디렉터리 생성)
pub fn write_metrics_csv(
    path: &Path,
    records: &[MetricRecord],
    labels: &ColumnLabels,
) -> Result<(), MetricsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = fs::File::create(path)?;
    write_metrics(io::BufWriter::new(file), records, labels)?;
    log::info!("{} 에 {} 행 저장", path.display(), records.len());
    Ok(())
}

pub fn metrics_to_csv_string(
    records: &[MetricRecord],
    labels: &ColumnLabels,
) -> Result<String, MetricsError> {
    let mut buf = Vec::new();
    write_metrics(&mut buf, records, labels)?;
    String::from_utf8(buf).map_err(|e| MetricsError::ParseError(e.to_string()))
}
