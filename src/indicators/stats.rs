/**
* filename : stats
* author : HAMA
* date: 2025. 5. 12.
* description: 윈도우 통계 - 범위 정규화, 로그-선형 회귀, 지수 곡선 적합
**/

use statrs::statistics::Statistics;

use crate::error::MetricsError;
use crate::utils::math::{clamp, first_invalid_price};

/// 평탄한 윈도우(최대 == 최소)에서 반환하는 중립 값
pub const NEUTRAL_POSITION: f64 = 0.5;

/// 비선형 지수 적합의 최대 함수 평가 횟수
pub const MAX_FUNCTION_EVALS: usize = 10_000;

/// `ln(price) ≈ slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLinearFit {
  pub slope: f64,
  pub intercept: f64,
}

impl LogLinearFit {
  /// 인덱스 `x`에서의 예측 가격
  pub fn predict(&self, x: f64) -> f64 {
    (self.slope * x + self.intercept).exp()
  }

  /// 인덱스 `x`의 예측 가격 / `current_price` 비율 (로그 공간에서 계산)
  pub fn ratio_to(&self, x: f64, current_price: f64) -> f64 {
    (self.slope * x + self.intercept - current_price.ln()).exp()
  }
}

/// `price ≈ a * exp(b * index)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialFit {
  pub a: f64,
  pub b: f64,
}

impl ExponentialFit {
  pub fn predict(&self, x: f64) -> f64 {
    self.a * (self.b * x).exp()
  }
}

/// 윈도우의 [최소, 최대] 범위 안에서 현재 가격의 상대 위치를 [0, 1]로 반환
///
/// 범위가 평탄하면 0.5, 현재 가격이 범위를 벗어나면 0 또는 1로 제한된다.
pub fn normalize(window: &[f64], current_price: f64) -> Result<f64, MetricsError> {
  if window.is_empty() {
    return Err(MetricsError::InvalidInput("normalize requires a non-empty window".to_string()));
  }

  let min_w = Statistics::min(window);
  let max_w = Statistics::max(window);

  if max_w == min_w {
    return Ok(NEUTRAL_POSITION);
  }

  let position = (current_price - min_w) / (max_w - min_w);
  Ok(clamp(position, 0.0, 1.0))
}

/// 로그 가격을 인덱스(0..len-1)에 대해 최소제곱 직선 적합
pub fn fit_log_linear(window_prices: &[f64]) -> Result<LogLinearFit, MetricsError> {
  if window_prices.len() < 2 {
    return Err(MetricsError::InvalidInput(format!(
      "log-linear fit requires at least 2 prices, got {}",
      window_prices.len()
    )));
  }

  // 로그를 취하기 전에 명시적으로 검사
  if let Some((index, price)) = first_invalid_price(window_prices) {
    return Err(MetricsError::InvalidInput(format!(
      "non-positive or non-finite price {} at window index {}",
      price, index
    )));
  }

  let log_prices: Vec<f64> = window_prices.iter().map(|p| p.ln()).collect();

  let n = log_prices.len() as f64;
  let x_mean = (n - 1.0) / 2.0;
  let y_mean = log_prices.as_slice().mean();

  let (numerator, denominator) = log_prices.iter()
    .enumerate()
    .fold((0.0, 0.0), |(num, den), (i, y)| {
      let dx = i as f64 - x_mean;
      (num + dx * (y - y_mean), den + dx * dx)
    });

  let slope = numerator / denominator;
  let intercept = y_mean - slope * x_mean;

  Ok(LogLinearFit { slope, intercept })
}

/// 로그-선형 모델로 인덱스 `x_pred`의 가격을 외삽
pub fn predict_log_linear(window_prices: &[f64], x_pred: f64) -> Result<f64, MetricsError> {
  let fit = fit_log_linear(window_prices)?;
  Ok(fit.predict(x_pred))
}

/// `a * exp(b * x)` 비선형 최소제곱 적합 (Levenberg-Marquardt)
///
/// 초기값은 `(prices[0], 0.001)`. 주 예측에는 사용하지 않는 보조 루틴이다.
pub fn fit_exponential(window_prices: &[f64]) -> Result<ExponentialFit, MetricsError> {
  if window_prices.len() < 2 {
    return Err(MetricsError::InvalidInput(format!(
      "exponential fit requires at least 2 prices, got {}",
      window_prices.len()
    )));
  }
  if let Some(p) = window_prices.iter().find(|p| !p.is_finite()) {
    return Err(MetricsError::InvalidInput(format!("non-finite price {} in window", p)));
  }

  let sse = |a: f64, b: f64| -> f64 {
    window_prices.iter()
      .enumerate()
      .map(|(i, y)| {
        let r = y - a * (b * i as f64).exp();
        r * r
      })
      .sum::<f64>()
  };

  let mut a = window_prices[0];
  let mut b = 0.001;
  let mut lambda = 1e-3;
  let mut cost = sse(a, b);
  let mut evals = 1;

  while evals < MAX_FUNCTION_EVALS {
    // 정규 방정식 JᵀJ, Jᵀr
    let (mut j00, mut j01, mut j11, mut g0, mut g1) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (i, y) in window_prices.iter().enumerate() {
      let x = i as f64;
      let e = (b * x).exp();
      let r = y - a * e;
      let da = e;
      let db = a * x * e;
      j00 += da * da;
      j01 += da * db;
      j11 += db * db;
      g0 += da * r;
      g1 += db * r;
    }

    let m00 = j00 * (1.0 + lambda);
    let m11 = j11 * (1.0 + lambda);
    let det = m00 * m11 - j01 * j01;

    if det == 0.0 || !det.is_finite() {
      lambda *= 10.0;
      evals += 1;
      if lambda > 1e20 {
        break;
      }
      continue;
    }

    let step_a = (g0 * m11 - g1 * j01) / det;
    let step_b = (m00 * g1 - j01 * g0) / det;
    let new_cost = sse(a + step_a, b + step_b);
    evals += 1;

    if new_cost.is_finite() && new_cost <= cost {
      let improvement = cost - new_cost;
      a += step_a;
      b += step_b;
      cost = new_cost;
      lambda = (lambda / 10.0).max(1e-12);

      let tiny_step = step_a.abs() <= 1e-12 * (a.abs() + 1e-12)
        && step_b.abs() <= 1e-12 * (b.abs() + 1e-12);
      if tiny_step || improvement <= 1e-15 * cost {
        return finish_exponential(a, b);
      }
    } else {
      lambda *= 10.0;
      // 더 이상 개선할 수 없으면 현재 값이 최소점
      if lambda > 1e20 {
        return finish_exponential(a, b);
      }
    }
  }

  Err(MetricsError::CalculationError(format!(
    "exponential fit did not converge within {} evaluations",
    MAX_FUNCTION_EVALS
  )))
}

fn finish_exponential(a: f64, b: f64) -> Result<ExponentialFit, MetricsError> {
  if a.is_finite() && b.is_finite() {
    Ok(ExponentialFit { a, b })
  } else {
    Err(MetricsError::CalculationError("exponential fit produced non-finite parameters".to_string()))
  }
}

/// 지수 곡선 모델로 인덱스 `x_pred`의 가격을 외삽
pub fn predict_exponential(window_prices: &[f64], x_pred: f64) -> Result<f64, MetricsError> {
  let fit = fit_exponential(window_prices)?;
  Ok(fit.predict(x_pred))
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};

  fn exponential_series(a: f64, b: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| a * (b * i as f64).exp()).collect()
  }

  #[test]
  fn test_normalize_flat_window_is_neutral() {
    assert_eq!(normalize(&[100.0, 100.0, 100.0], 100.0).unwrap(), 0.5);
    assert_eq!(normalize(&[100.0, 100.0, 100.0], 250.0).unwrap(), 0.5);
    assert_eq!(normalize(&[42.0], 1.0).unwrap(), 0.5);
  }

  #[test]
  fn test_normalize_positions() {
    let window = [100.0, 105.0, 110.0, 95.0, 100.0];
    assert_eq!(normalize(&window, 110.0).unwrap(), 1.0);
    assert_eq!(normalize(&window, 95.0).unwrap(), 0.0);
    assert!((normalize(&window, 102.5).unwrap() - 0.5).abs() < 1e-12);
    assert!(normalize(&window, 107.0).unwrap() > 0.5);
  }

  #[test]
  fn test_normalize_clamps_outside_range() {
    let window = [10.0, 20.0];
    assert_eq!(normalize(&window, 25.0).unwrap(), 1.0);
    assert_eq!(normalize(&window, 5.0).unwrap(), 0.0);
  }

  #[test]
  fn test_normalize_empty_window() {
    assert!(matches!(normalize(&[], 1.0), Err(MetricsError::InvalidInput(_))));
  }

  #[test]
  fn test_normalize_bounded_and_monotonic() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
      let len = rng.gen_range(1..30);
      let window: Vec<f64> = (0..len).map(|_| rng.gen_range(1.0..500.0)).collect();
      let mut prices: Vec<f64> = (0..20).map(|_| rng.gen_range(-100.0..700.0)).collect();
      prices.sort_by(|a, b| a.partial_cmp(b).unwrap());

      let mut prev = f64::NEG_INFINITY;
      for price in prices {
        let value = normalize(&window, price).unwrap();
        assert!((0.0..=1.0).contains(&value));
        assert!(value >= prev);
        prev = value;
      }
    }
  }

  #[test]
  fn test_fit_log_linear_recovers_exponential() {
    let prices = exponential_series(100.0, 0.05, 50);
    let fit = fit_log_linear(&prices).unwrap();
    assert!((fit.slope - 0.05).abs() < 1e-10);
    assert!((fit.intercept - 100.0_f64.ln()).abs() < 1e-10);
  }

  #[test]
  fn test_fit_log_linear_flat_has_zero_slope() {
    let fit = fit_log_linear(&[50.0; 20]).unwrap();
    assert_eq!(fit.slope, 0.0);
    assert!((fit.predict(1000.0) - 50.0).abs() < 1e-9);
    assert_eq!(fit.ratio_to(1000.0, 50.0), 1.0);
  }

  #[test]
  fn test_fit_log_linear_rejects_bad_prices() {
    assert!(matches!(fit_log_linear(&[100.0, 0.0, 104.0]), Err(MetricsError::InvalidInput(_))));
    assert!(matches!(fit_log_linear(&[100.0, -50.0, 104.0]), Err(MetricsError::InvalidInput(_))));
    assert!(matches!(fit_log_linear(&[100.0, f64::NAN]), Err(MetricsError::InvalidInput(_))));
    assert!(matches!(fit_log_linear(&[100.0]), Err(MetricsError::InvalidInput(_))));
  }

  #[test]
  fn test_predict_log_linear_growth() {
    let window = [100.0, 102.0, 104.0, 106.0, 108.0];
    assert!(predict_log_linear(&window, 10.0).unwrap() > 108.0);

    let falling = [108.0, 106.0, 104.0, 102.0, 100.0];
    assert!(predict_log_linear(&falling, 10.0).unwrap() < 100.0);
  }

  #[test]
  fn test_predict_log_linear_extrapolates_exactly() {
    let prices = exponential_series(10.0, 0.02, 30);
    let predicted = predict_log_linear(&prices, 100.0).unwrap();
    let expected = 10.0 * (0.02_f64 * 100.0).exp();
    assert!((predicted / expected - 1.0).abs() < 1e-9);
  }

  #[test]
  fn test_fit_exponential_recovers_parameters() {
    let prices = exponential_series(100.0, 0.01, 20);
    let fit = fit_exponential(&prices).unwrap();
    assert!((fit.a - 100.0).abs() < 1e-6);
    assert!((fit.b - 0.01).abs() < 1e-8);
  }

  #[test]
  fn test_fit_exponential_agrees_with_log_linear_on_clean_data() {
    let prices = exponential_series(50.0, -0.005, 40);
    let nonlinear = predict_exponential(&prices, 60.0).unwrap();
    let linear = predict_log_linear(&prices, 60.0).unwrap();
    assert!((nonlinear / linear - 1.0).abs() < 1e-6);
  }

  #[test]
  fn test_fit_exponential_rejects_short_window() {
    assert!(matches!(fit_exponential(&[1.0]), Err(MetricsError::InvalidInput(_))));
    assert!(matches!(fit_exponential(&[1.0, f64::INFINITY]), Err(MetricsError::InvalidInput(_))));
  }
}
