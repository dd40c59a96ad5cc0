use serde::{Deserialize, Serialize};

use crate::models::MetricRecord;

/// 심볼별 처리 결과
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SymbolStatus {
    /// 한 행 이상 생성
    Processed,
    /// 이력이 `window_long + 1`개 미만
    InsufficientHistory,
    /// 데이터 품질 오류로 건너뜀
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolSummary {
    pub symbol: String,
    pub points: usize,
    pub emitted: usize,
    pub skipped: usize,
    pub status: SymbolStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsRun {
    pub records: Vec<MetricRecord>,
    pub symbols: Vec<SymbolSummary>,
}

impl MetricsRun {
    /// 생성된 행 수
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn processed_symbols(&self) -> Vec<&str> {
        self.with_status(|s| matches!(s, SymbolStatus::Processed))
    }

    pub fn insufficient_symbols(&self) -> Vec<&str> {
        self.with_status(|s| matches!(s, SymbolStatus::InsufficientHistory))
    }

    pub fn failed_symbols(&self) -> Vec<&str> {
        self.with_status(|s| matches!(s, SymbolStatus::Failed(_)))
    }

    fn with_status(&self, pred: impl Fn(&SymbolStatus) -> bool) -> Vec<&str> {
        self.symbols
            .iter()
            .filter(|s| pred(&s.status))
            .map(|s| s.symbol.as_str())
            .collect()
    }

    /// 특정 심볼의 행
    pub fn records_for(&self, symbol: &str) -> Vec<&MetricRecord> {
        self.records.iter().filter(|r| r.symbol == symbol).collect()
    }

    /// 결과 요약 문자열
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("=== 지표 계산 결과 ===\n");
        out.push_str(&format!("심볼 수: {}\n", self.symbols.len()));
        out.push_str(&format!("처리 완료: {}\n", self.processed_symbols().len()));
        out.push_str(&format!("이력 부족: {}\n", self.insufficient_symbols().len()));
        out.push_str(&format!("오류로 건너뜀: {}\n", self.failed_symbols().len()));
        out.push_str(&format!("생성된 행: {}\n", self.row_count()));

        for s in &self.symbols {
            let status = match &s.status {
                SymbolStatus::Processed => "ok".to_string(),
                SymbolStatus::InsufficientHistory => "insufficient history".to_string(),
                SymbolStatus::Failed(reason) => format!("failed: {}", reason),
            };
            out.push_str(&format!(
                "  {:<8} points={:<6} emitted={:<6} skipped={:<6} {}\n",
                s.symbol, s.points, s.emitted, s.skipped, status
            ));
        }

        out
    }
}
