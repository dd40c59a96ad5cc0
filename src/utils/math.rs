//! 수학 관련 유틸리티
//!
//! 범위 제한, 가격 유효성 검사 함수 제공

/// 최소값 계산
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
  if a < b { a } else { b }
}

/// 최대값 계산
pub fn max<T: PartialOrd>(a: T, b: T) -> T {
  if a > b { a } else { b }
}

/// 값을 범위 내로 제한
pub fn clamp<T: PartialOrd>(value: T, min_value: T, max_value: T) -> T {
  max(min_value, min(max_value, value))
}

/// 양수이면서 유한한 가격인지 확인 (NaN 포함 거부)
pub fn is_valid_price(price: f64) -> bool {
  price.is_finite() && price > 0.0
}

/// 첫 번째 유효하지 않은 가격의 (인덱스, 값)
pub fn first_invalid_price(prices: &[f64]) -> Option<(usize, f64)> {
  prices.iter()
    .copied()
    .enumerate()
    .find(|(_, p)| !is_valid_price(*p))
}
