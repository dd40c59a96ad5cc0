/**
* filename : range
* author : HAMA
* date: 2025. 5. 12.
* description: 
**/

use crate::error::MetricsError;
use super::{normalize, Indicator, PriceWindow};

/// 후행 윈도우 범위 내 현재 가격의 정규화 위치
#[derive(Debug)]
pub struct NormalizedRange {
  name: String,
  window: PriceWindow,
}

impl NormalizedRange {
  pub fn new(period: usize) -> Self {
    NormalizedRange {
      name: format!("Normalized-{}", period),
      window: PriceWindow::new(period),
    }
  }
  
  pub fn period(&self) -> usize {
    self.window.period()
  }
}

impl Indicator for NormalizedRange {
  fn name(&self) -> &str {
    &self.name
  }
  
  fn update(&mut self, price: f64) -> Result<(), MetricsError> {
    self.window.push(price);
    Ok(())
  }
  
  fn calculate(&self, current_price: f64) -> Result<f64, MetricsError> {
    let prices = self.window.require_full()?;
    normalize(&prices, current_price)
  }
  
  fn is_ready(&self) -> bool {
    self.window.is_full()
  }
  
  fn reset(&mut self) {
    self.window.clear();
  }
}
