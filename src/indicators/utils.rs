/**
* filename : utils
* author : HAMA
* date: 2025. 5. 11.
* description: 
**/

use std::collections::VecDeque;

use crate::error::MetricsError;
use super::Indicator;

/// 고정 길이 후행 가격 윈도우
#[derive(Debug, Clone)]
pub struct PriceWindow {
  period: usize,
  values: VecDeque<f64>,
}

impl PriceWindow {
  pub fn new(period: usize) -> Self {
    PriceWindow {
      period,
      values: VecDeque::with_capacity(period + 1),
    }
  }
  
  pub fn period(&self) -> usize {
    self.period
  }
  
  pub fn push(&mut self, price: f64) {
    self.values.push_back(price);
    
    // 오래된 가격 제거
    if self.values.len() > self.period {
      self.values.pop_front();
    }
  }
  
  pub fn is_full(&self) -> bool {
    self.values.len() >= self.period
  }
  
  /// 시간순 가격 복사본
  pub fn to_vec(&self) -> Vec<f64> {
    self.values.iter().copied().collect()
  }
  
  pub fn clear(&mut self) {
    self.values.clear();
  }
  
  /// 가득 차지 않았으면 InsufficientData
  pub fn require_full(&self) -> Result<Vec<f64>, MetricsError> {
    if !self.is_full() {
      return Err(MetricsError::InsufficientData {
        required: self.period,
        available: self.values.len(),
      });
    }
    Ok(self.to_vec())
  }
}

// 과거 가격 하나로 여러 지표 업데이트
pub fn update_indicators(
  indicators: &mut [Box<dyn Indicator>],
  price: f64,
) -> Result<(), MetricsError> {
  for indicator in indicators.iter_mut() {
    indicator.update(price)?;
  }
  
  Ok(())
}

// 현재 가격 기준으로 여러 지표 값 계산 (입력 순서 유지)
pub fn calculate_indicators(
  indicators: &[Box<dyn Indicator>],
  current_price: f64,
) -> Result<Vec<f64>, MetricsError> {
  indicators.iter()
    .map(|indicator| indicator.calculate(current_price))
    .collect()
}

// 모든 지표가 준비되었는지 확인
pub fn indicators_ready(indicators: &[Box<dyn Indicator>]) -> bool {
  indicators.iter().all(|indicator| indicator.is_ready())
}
