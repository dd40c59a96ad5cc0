/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description: 
**/
pub mod forecast;
pub mod range;
pub mod stats;
pub mod utils;

pub use forecast::*;
pub use range::*;
pub use stats::*;
pub use utils::*;

use std::fmt::Debug;

pub trait Indicator: Debug + Send + Sync {
  fn name(&self) -> &str;
  
  // 과거 가격 하나를 윈도우에 추가
  fn update(&mut self, price: f64) -> Result<(), crate::error::MetricsError>;
  
  // 현재 가격 기준 지표 값 (윈도우에는 현재 가격이 포함되지 않음)
  fn calculate(&self, current_price: f64) -> Result<f64, crate::error::MetricsError>;
  
  // 윈도우가 가득 찼는지 확인
  fn is_ready(&self) -> bool;
  
  // 지표 상태 리셋
  fn reset(&mut self);
}
