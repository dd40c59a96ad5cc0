/**
* filename : forecast
* author : HAMA
* date: 2025. 5. 12.
* description: 
**/

use crate::error::MetricsError;
use super::{fit_log_linear, Indicator, PriceWindow};

/// 로그-선형 외삽 기반 예측 수익 비율 (예측 가격 / 현재 가격)
#[derive(Debug)]
pub struct LogLinearForecast {
  name: String,
  window: PriceWindow,
  predict_days: usize,
}

impl LogLinearForecast {
  pub fn new(period: usize, predict_days: usize) -> Self {
    LogLinearForecast {
      name: format!("PredReturn-{}exp", period),
      window: PriceWindow::new(period),
      predict_days,
    }
  }
  
  pub fn period(&self) -> usize {
    self.window.period()
  }
  
  /// 윈도우 인덱스 기준 예측 지점: 마지막 윈도우 인덱스 + 예측 기간
  pub fn prediction_index(&self) -> f64 {
    // 정수 덧셈 오버플로 방지를 위해 부동소수로 계산
    (self.window.period() as f64 - 1.0) + self.predict_days as f64
  }
}

impl Indicator for LogLinearForecast {
  fn name(&self) -> &str {
    &self.name
  }
  
  fn update(&mut self, price: f64) -> Result<(), MetricsError> {
    self.window.push(price);
    Ok(())
  }
  
  fn calculate(&self, current_price: f64) -> Result<f64, MetricsError> {
    let prices = self.window.require_full()?;
    
    if !crate::utils::math::is_valid_price(current_price) {
      return Err(MetricsError::InvalidInput(format!(
        "current price must be positive and finite, got {}",
        current_price
      )));
    }
    
    let fit = fit_log_linear(&prices)?;
    Ok(fit.ratio_to(self.prediction_index(), current_price))
  }
  
  fn is_ready(&self) -> bool {
    self.window.is_full()
  }
  
  fn reset(&mut self) {
    self.window.clear();
  }
}
