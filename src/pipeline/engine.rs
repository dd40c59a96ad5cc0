use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::{DataErrorPolicy, MetricsConfig};
use crate::data::{PriceSource, PriceTable};
use crate::error::MetricsError;
use crate::indicators::{
    calculate_indicators, indicators_ready, update_indicators, Indicator, LogLinearForecast,
    NormalizedRange,
};
use crate::models::{MetricRecord, PriceRecord};
use crate::utils::{format_date, logging};

use super::report::{MetricsRun, SymbolStatus, SymbolSummary};

/// 한 심볼의 시간순 (날짜, 종가) 시계열
type Series = Vec<(NaiveDate, f64)>;

/// 한 심볼 처리 결과
struct SymbolOutcome {
    records: Vec<MetricRecord>,
    summary: SymbolSummary,
}

/// 가격 테이블을 지표 테이블로 변환하는 배치 엔진
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// 설정을 검증한 뒤 엔진 생성
    pub fn new(config: MetricsConfig) -> Result<Self, MetricsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// 전체 심볼을 순차 처리
    pub fn run(&self, prices: &[PriceRecord]) -> Result<MetricsRun, MetricsError> {
        self.run_grouped(prices, &[])
    }

    /// 유효 행이 없는 심볼까지 포함한 가격 테이블을 순차 처리
    pub fn run_table(&self, table: &PriceTable) -> Result<MetricsRun, MetricsError> {
        self.run_grouped(&table.records, &table.empty_symbols)
    }

    fn run_grouped(
        &self,
        prices: &[PriceRecord],
        empty_symbols: &[String],
    ) -> Result<MetricsRun, MetricsError> {
        let groups = group_by_symbol(prices, empty_symbols)?;
        let total = groups.len();
        log::info!("{} 개 레코드, {} 개 심볼 처리 시작", prices.len(), total);

        let outcomes = groups
            .into_iter()
            .enumerate()
            .map(|(idx, (symbol, series))| {
                logging::log_symbol_start(&symbol, idx + 1, total);
                let outcome = compute_symbol(&symbol, &series, &self.config);
                (symbol, series.len(), outcome)
            })
            .collect();

        self.assemble(outcomes)
    }

    /// 심볼 그룹을 블로킹 작업으로 병렬 처리 (결과는 `run`과 동일)
    pub async fn run_concurrent(&self, prices: &[PriceRecord]) -> Result<MetricsRun, MetricsError> {
        self.run_grouped_concurrent(prices, &[]).await
    }

    pub async fn run_table_concurrent(&self, table: &PriceTable) -> Result<MetricsRun, MetricsError> {
        self.run_grouped_concurrent(&table.records, &table.empty_symbols).await
    }

    async fn run_grouped_concurrent(
        &self,
        prices: &[PriceRecord],
        empty_symbols: &[String],
    ) -> Result<MetricsRun, MetricsError> {
        let groups = group_by_symbol(prices, empty_symbols)?;
        let total = groups.len();
        log::info!("{} 개 레코드, {} 개 심볼 병렬 처리 시작", prices.len(), total);

        let config = Arc::new(self.config.clone());
        let handles: Vec<_> = groups
            .into_iter()
            .enumerate()
            .map(|(idx, (symbol, series))| {
                let config = config.clone();
                tokio::task::spawn_blocking(move || {
                    logging::log_symbol_start(&symbol, idx + 1, total);
                    let outcome = compute_symbol(&symbol, &series, &config);
                    (symbol, series.len(), outcome)
                })
            })
            .collect();

        // join_all은 입력 순서를 유지하므로 심볼 순서가 보존됨
        let mut outcomes = Vec::with_capacity(handles.len());
        for joined in futures::future::join_all(handles).await {
            outcomes.push(joined.map_err(|e| MetricsError::TaskError(e.to_string()))?);
        }

        self.assemble(outcomes)
    }

    /// 가격 소스에서 읽어 처리
    pub fn run_from_source(&self, source: &dyn PriceSource) -> Result<MetricsRun, MetricsError> {
        let table = source.load_prices()?;
        self.run_table(&table)
    }

    fn assemble(
        &self,
        outcomes: Vec<(String, usize, Result<SymbolOutcome, MetricsError>)>,
    ) -> Result<MetricsRun, MetricsError> {
        let mut records = Vec::new();
        let mut symbols = Vec::with_capacity(outcomes.len());

        for (symbol, points, outcome) in outcomes {
            match outcome {
                Ok(outcome) => {
                    records.extend(outcome.records);
                    symbols.push(outcome.summary);
                }
                Err(err) if err.is_data_quality() => match self.config.on_data_error {
                    DataErrorPolicy::SkipSymbol => {
                        logging::log_symbol_failed(&symbol, &err);
                        symbols.push(SymbolSummary {
                            symbol,
                            points,
                            emitted: 0,
                            skipped: points,
                            status: SymbolStatus::Failed(err.to_string()),
                        });
                    }
                    DataErrorPolicy::Abort => {
                        log::error!("데이터 품질 오류로 실행 중단: {} - {}", symbol, err);
                        return Err(MetricsError::SymbolFailed {
                            symbol,
                            source: Box::new(err),
                        });
                    }
                },
                Err(err) => return Err(err),
            }
        }

        log::info!("지표 계산 완료: {} 개 심볼, {} 행", symbols.len(), records.len());

        Ok(MetricsRun { records, symbols })
    }
}

/// 가격 테이블을 지표 레코드로 변환 (기본 정책: 오류 심볼 건너뜀)
pub fn compute_metrics(
    prices: &[PriceRecord],
    config: &MetricsConfig,
) -> Result<Vec<MetricRecord>, MetricsError> {
    let engine = MetricsEngine::new(config.clone())?;
    Ok(engine.run(prices)?.records)
}

/// 심볼별로 묶고 날짜순 정렬 (심볼은 사전순). 유효 행이 없는 심볼은 빈 시계열로 남김
fn group_by_symbol(
    prices: &[PriceRecord],
    empty_symbols: &[String],
) -> Result<BTreeMap<String, Series>, MetricsError> {
    if prices.is_empty() && empty_symbols.is_empty() {
        log::error!("가격 테이블이 비어 있음");
        return Err(MetricsError::EmptyInput);
    }

    let mut groups: BTreeMap<String, Series> = BTreeMap::new();
    for record in prices {
        groups
            .entry(record.symbol.clone())
            .or_default()
            .push((record.date, record.close));
    }
    for symbol in empty_symbols {
        groups.entry(symbol.clone()).or_default();
    }

    for series in groups.values_mut() {
        series.sort_by_key(|(date, _)| *date);
    }

    Ok(groups)
}

/// 단일 심볼 후행 윈도우 스캔
fn compute_symbol(
    symbol: &str,
    series: &[(NaiveDate, f64)],
    config: &MetricsConfig,
) -> Result<SymbolOutcome, MetricsError> {
    if series.is_empty() {
        return Err(MetricsError::NoValidRows(symbol.to_string()));
    }
    if let Some(pair) = series.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(MetricsError::DuplicateDate {
            symbol: symbol.to_string(),
            date: format_date(pair[0].0),
        });
    }

    let points = series.len();
    let required = config.required_points();
    if points < required {
        logging::log_symbol_insufficient(symbol, points, required);
        return Ok(SymbolOutcome {
            records: Vec::new(),
            summary: SymbolSummary {
                symbol: symbol.to_string(),
                points,
                emitted: 0,
                skipped: points,
                status: SymbolStatus::InsufficientHistory,
            },
        });
    }

    // 순서: 단기 정규화, 장기 정규화, 단기 예측, 장기 예측
    let mut indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(NormalizedRange::new(config.window_short)),
        Box::new(NormalizedRange::new(config.window_long)),
        Box::new(LogLinearForecast::new(config.window_short, config.predict_days)),
        Box::new(LogLinearForecast::new(config.window_long, config.predict_days)),
    ];

    let mut records = Vec::with_capacity(points - config.window_long);
    for &(date, price) in series {
        if indicators_ready(&indicators) {
            let values = calculate_indicators(&indicators, price)?;
            let record = MetricRecord {
                date,
                symbol: symbol.to_string(),
                current_price: price,
                normalized_short: values[0],
                normalized_long: values[1],
                predicted_return_short: values[2],
                predicted_return_long: values[3],
            };

            if !record.is_finite() {
                return Err(MetricsError::NonFiniteMetric {
                    symbol: symbol.to_string(),
                    date: format_date(date),
                });
            }

            log::debug!("{} {} {:?}", symbol, format_date(date), values);
            records.push(record);
        }

        // 현재 가격은 계산 후에 윈도우로 들어감
        update_indicators(&mut indicators, price)?;
    }

    let emitted = records.len();
    let skipped = points - emitted;
    logging::log_symbol_done(symbol, emitted, skipped);

    Ok(SymbolOutcome {
        records,
        summary: SymbolSummary {
            symbol: symbol.to_string(),
            points,
            emitted,
            skipped,
            status: SymbolStatus::Processed,
        },
    })
}
