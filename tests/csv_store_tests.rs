/**
* filename : csv_store_tests
* author : HAMA
* date: 2025. 5. 13.
* description:
**/

use std::fs;
use std::path::PathBuf;

use stock_metrics::config::{DataErrorPolicy, MetricsConfig};
use stock_metrics::data::{write_metrics_csv, CsvPriceSource, PriceSource};
use stock_metrics::error::MetricsError;
use stock_metrics::pipeline::{MetricsEngine, SymbolStatus};

/// 테스트별 임시 디렉터리
fn temp_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("stock_metrics_{}_{}", name, std::process::id()));
  let _ = fs::remove_dir_all(&dir);
  fs::create_dir_all(&dir).unwrap();
  dir
}

fn price_csv(symbols: &[(&str, usize)]) -> String {
  let mut out = String::from("Date,Open,High,Low,Close,Volume,Dividends,Stock Splits,Symbol\n");
  for (symbol, len) in symbols {
    for i in 0..*len {
      let close = 100.0 + i as f64;
      out.push_str(&format!(
        "2023-01-{:02} 00:00:00-05:00,{},{},{},{},1000,0.0,0.0,{}\n",
        i + 1, close - 1.0, close + 1.0, close - 2.0, close, symbol
      ));
    }
  }
  out
}

#[test]
fn test_load_prices_ignores_extra_columns() {
  let dir = temp_dir("extra_columns");
  let path = dir.join("stock_prices.csv");
  fs::write(&path, price_csv(&[("AAPL", 10), ("MSFT", 5)])).unwrap();

  let prices = CsvPriceSource::new(&path).load_prices().unwrap().records;
  assert_eq!(prices.len(), 15);

  let first = &prices[0];
  assert_eq!(first.symbol, "AAPL");
  assert_eq!(first.date.to_string(), "2023-01-01");
  assert_eq!(first.close, 100.0);
  assert_eq!(first.volume, Some(1000.0));
}

#[test]
fn test_load_prices_minimal_columns() {
  let dir = temp_dir("minimal_columns");
  let path = dir.join("prices.csv");
  fs::write(&path, "Symbol,Date,Close\nAAA,2023-02-01,10.5\nAAA,2023-02-02,\nAAA,2023-02-03,11\n").unwrap();

  let table = CsvPriceSource::new(&path).load_prices().unwrap();
  assert!(table.empty_symbols.is_empty());
  let prices = table.records;
  // 종가가 빈 행은 제외
  assert_eq!(prices.len(), 2);
  assert_eq!(prices[1].close, 11.0);
  assert_eq!(prices[1].open, None);
}

#[test]
fn test_missing_column_is_structural_error() {
  let dir = temp_dir("missing_column");
  let path = dir.join("prices.csv");
  fs::write(&path, "Date,Symbol,Open\n2023-01-01,AAA,1.0\n").unwrap();

  match CsvPriceSource::new(&path).load_prices() {
    Err(MetricsError::MissingColumns { expected, found }) => {
      assert!(expected.contains(&"Close".to_string()));
      assert_eq!(found, vec!["Date", "Symbol", "Open"]);
    }
    other => panic!("expected MissingColumns, got {:?}", other.map(|t| t.records.len())),
  }
}

#[test]
fn test_missing_file_is_error() {
  let dir = temp_dir("missing_file");
  let result = CsvPriceSource::new(dir.join("nope.csv")).load_prices();
  assert!(matches!(result, Err(MetricsError::IoError(_))));
}

#[test]
fn test_header_only_file_is_empty_input() {
  let dir = temp_dir("header_only");
  let path = dir.join("prices.csv");
  fs::write(&path, "Date,Symbol,Close\n").unwrap();

  let engine = MetricsEngine::new(MetricsConfig::new(2, 3, 1)).unwrap();
  let result = engine.run_from_source(&CsvPriceSource::new(&path));
  assert!(matches!(result, Err(MetricsError::EmptyInput)));
}

#[test]
fn test_symbol_without_closes_is_reported_failed() {
  let dir = temp_dir("no_valid_rows");
  let path = dir.join("prices.csv");
  let mut csv = String::from("Date,Symbol,Close\n");
  for i in 1..=6 {
    csv.push_str(&format!("2023-03-{:02},GOOD,{}\n", i, 10.0 + i as f64));
    csv.push_str(&format!("2023-03-{:02},EMPTY,\n", i));
  }
  fs::write(&path, csv).unwrap();

  let table = CsvPriceSource::new(&path).load_prices().unwrap();
  assert_eq!(table.empty_symbols, vec!["EMPTY"]);
  assert_eq!(table.records.len(), 6);

  let engine = MetricsEngine::new(MetricsConfig::new(2, 3, 1)).unwrap();
  let run = engine.run_from_source(&CsvPriceSource::new(&path)).unwrap();
  assert_eq!(run.processed_symbols(), vec!["GOOD"]);
  assert_eq!(run.failed_symbols(), vec!["EMPTY"]);
  assert_eq!(run.row_count(), 3);

  let empty = run.symbols.iter().find(|s| s.symbol == "EMPTY").unwrap();
  assert_eq!((empty.points, empty.emitted), (0, 0));
  match &empty.status {
    SymbolStatus::Failed(reason) => assert!(reason.contains("EMPTY")),
    other => panic!("expected Failed, got {:?}", other),
  }
}

#[test]
fn test_symbol_without_closes_aborts_under_abort_policy() {
  let dir = temp_dir("no_valid_rows_abort");
  let path = dir.join("prices.csv");
  fs::write(&path, "Date,Symbol,Close\n2023-03-01,EMPTY,\n2023-03-02,EMPTY,\n").unwrap();

  let config = MetricsConfig::new(2, 3, 1).with_policy(DataErrorPolicy::Abort);
  let engine = MetricsEngine::new(config).unwrap();
  match engine.run_from_source(&CsvPriceSource::new(&path)) {
    Err(MetricsError::SymbolFailed { symbol, source }) => {
      assert_eq!(symbol, "EMPTY");
      assert!(matches!(*source, MetricsError::NoValidRows(_)));
    }
    other => panic!("expected SymbolFailed, got {:?}", other.map(|r| r.row_count())),
  }
}

#[test]
fn test_semicolon_delimiter() {
  let dir = temp_dir("semicolon");
  let path = dir.join("prices.csv");
  fs::write(&path, "Date;Symbol;Close\n2023-01-01;AAA;1.5\n").unwrap();

  let prices = CsvPriceSource::new(&path).with_delimiter(b';').load_prices().unwrap().records;
  assert_eq!(prices.len(), 1);
  assert_eq!(prices[0].close, 1.5);
}

#[test]
fn test_csv_round_trip_through_engine() {
  let dir = temp_dir("round_trip");
  let input = dir.join("stock_prices.csv");
  let output = dir.join("out").join("metrics.csv");
  fs::write(&input, price_csv(&[("AAPL", 12), ("TINY", 3)])).unwrap();

  let config = MetricsConfig::new(3, 8, 5);
  let engine = MetricsEngine::new(config.clone()).unwrap();
  let run = engine.run_from_source(&CsvPriceSource::new(&input)).unwrap();
  assert_eq!(run.row_count(), 4);
  assert_eq!(run.insufficient_symbols(), vec!["TINY"]);

  write_metrics_csv(&output, &run.records, &config.labels()).unwrap();
  let first = fs::read(&output).unwrap();

  let text = String::from_utf8(first.clone()).unwrap();
  let mut lines = text.lines();
  assert_eq!(
    lines.next().unwrap(),
    "Date,Symbol,CurrentPrice,Normalized_3,Normalized_8,PredReturn_3exp,PredReturn_8exp"
  );
  assert!(lines.next().unwrap().starts_with("2023-01-09,AAPL,108,1,1,"));
  assert_eq!(text.lines().count(), 5);

  // 같은 입력으로 다시 실행하면 바이트 단위로 동일
  let again = engine.run_from_source(&CsvPriceSource::new(&input)).unwrap();
  write_metrics_csv(&output, &again.records, &config.labels()).unwrap();
  assert_eq!(fs::read(&output).unwrap(), first);
}
