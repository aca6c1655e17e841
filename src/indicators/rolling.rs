//! 通用滑動窗口聚合

use super::error::{IndicatorError, IndicatorResult};
use statrs::statistics::Statistics;

/// 對每個位置計算結尾於該位置、長度為 `window` 的窗口聚合值
///
/// 前 `window - 1` 個位置沒有完整窗口，結果為 `None`。
/// 只使用當前與之前的觀察值，不會向後看。
pub fn rolling<F>(values: &[f64], window: usize, aggregate: F) -> IndicatorResult<Vec<Option<f64>>>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 {
        return Err(IndicatorError::InvalidWindow(window));
    }

    let warmup = (window - 1).min(values.len());
    let mut out = Vec::with_capacity(values.len());
    out.resize(warmup, None);
    out.extend(values.windows(window).map(|w| Some(aggregate(w))));
    Ok(out)
}

/// 算術平均
pub fn mean(window: &[f64]) -> f64 {
    window.iter().mean()
}

/// 母體標準差（分母為窗口大小）
pub fn population_std_dev(window: &[f64]) -> f64 {
    window.iter().population_std_dev()
}

/// 簡單移動平均
pub fn rolling_mean(values: &[f64], window: usize) -> IndicatorResult<Vec<Option<f64>>> {
    rolling(values, window, mean)
}

/// 滾動母體標準差
pub fn rolling_population_std_dev(
    values: &[f64],
    window: usize,
) -> IndicatorResult<Vec<Option<f64>>> {
    rolling(values, window, population_std_dev)
}
