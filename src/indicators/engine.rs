//! 指標引擎

use super::error::{IndicatorError, IndicatorResult};
use super::rolling::{rolling_mean, rolling_population_std_dev};
use crate::config::IndicatorConfig;
use crate::data_ingestion::validator::validate_price_records;
use crate::domain_types::{ColumnName, IndicatorColumn, IndicatorSeries, PriceSeries};
use std::collections::BTreeSet;
use tracing::debug;

/// 畫面顯示用的移動平均窗口
pub const DEFAULT_MOVING_AVERAGE_WINDOWS: [usize; 7] = [50, 200, 300, 400, 500, 600, 700];

/// 布林通道參數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerParams {
    /// 窗口大小
    pub window: usize,
    /// 上下軌距離中軌的標準差倍數
    pub num_std: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            window: 20,
            num_std: 2.0,
        }
    }
}

/// 指標引擎
///
/// 移動平均窗口與布林通道窗口是彼此獨立的參數。
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    moving_average_windows: BTreeSet<usize>,
    bollinger: Option<BollingerParams>,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MOVING_AVERAGE_WINDOWS).with_bollinger(BollingerParams::default())
    }
}

impl IndicatorEngine {
    /// 以指定的移動平均窗口建立引擎（不含布林通道）
    pub fn new(windows: impl IntoIterator<Item = usize>) -> Self {
        Self {
            moving_average_windows: windows.into_iter().collect(),
            bollinger: None,
        }
    }

    pub fn from_config(config: &IndicatorConfig) -> Self {
        Self::new(config.moving_average_windows.iter().copied()).with_bollinger(BollingerParams {
            window: config.bollinger_window,
            num_std: config.bollinger_num_std,
        })
    }

    pub fn with_bollinger(mut self, params: BollingerParams) -> Self {
        self.bollinger = Some(params);
        self
    }

    pub fn without_bollinger(mut self) -> Self {
        self.bollinger = None;
        self
    }

    pub fn moving_average_windows(&self) -> impl Iterator<Item = usize> + '_ {
        self.moving_average_windows.iter().copied()
    }

    pub fn bollinger(&self) -> Option<BollingerParams> {
        self.bollinger
    }

    /// 由價格序列計算所有指標
    pub fn compute(&self, series: &PriceSeries) -> IndicatorResult<IndicatorSeries> {
        self.apply(IndicatorSeries::from(series.clone()))
    }

    /// 在既有指標序列上重新計算所有指標
    ///
    /// 同名欄位會被取代，其餘欄位（例如下載時附加的長週期均線）原樣保留，
    /// 因此重複套用的結果與套用一次相同。
    pub fn apply(&self, series: IndicatorSeries) -> IndicatorResult<IndicatorSeries> {
        validate_input(series.prices())?;

        let closes = series.prices().closes();
        let mut columns = Vec::with_capacity(self.moving_average_windows.len() + 3);

        for &window in &self.moving_average_windows {
            columns.push(IndicatorColumn::new(
                ColumnName::moving_average(window),
                rolling_mean(&closes, window)?,
            ));
        }

        if let Some(params) = self.bollinger {
            columns.extend(bollinger_bands(&closes, params)?);
        }

        let mut series = series;
        for column in columns {
            debug!(
                column = %column.name,
                defined = column.defined_count(),
                "指標欄位計算完成"
            );
            series.upsert_column(column)?;
        }

        Ok(series)
    }
}

/// 驗證輸入序列：日期嚴格遞增、不重複，價格為正的有限數值
pub fn validate_input(series: &PriceSeries) -> IndicatorResult<()> {
    validate_price_records(series.records())?;
    Ok(())
}

/// 計算布林通道的中軌、上軌與下軌
pub fn bollinger_bands(
    closes: &[f64],
    params: BollingerParams,
) -> IndicatorResult<[IndicatorColumn; 3]> {
    if !params.num_std.is_finite() || params.num_std < 0.0 {
        return Err(IndicatorError::InvalidMultiplier(params.num_std));
    }

    let middle = rolling_mean(closes, params.window)?;
    let std_dev = rolling_population_std_dev(closes, params.window)?;

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&std_dev)
            .map(|(m, s)| Some(m.as_ref()? + sign * params.num_std * s.as_ref()?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    Ok([
        IndicatorColumn::new(ColumnName::MIDDLE_BAND, middle),
        IndicatorColumn::new(ColumnName::UPPER_BAND, upper),
        IndicatorColumn::new(ColumnName::LOWER_BAND, lower),
    ])
}

/// 計算單一移動平均欄位
///
/// 下載流程用它附加長週期均線，與畫面顯示的指標計算分開。
pub fn moving_average_column(
    series: &PriceSeries,
    window: usize,
    name: &str,
) -> IndicatorResult<IndicatorColumn> {
    validate_input(series)?;
    Ok(IndicatorColumn::new(
        name,
        rolling_mean(&series.closes(), window)?,
    ))
}

/// 計算指定窗口的移動平均與 20 日、2 倍標準差的布林通道
pub fn compute_indicators(
    series: &PriceSeries,
    windows: &BTreeSet<usize>,
) -> IndicatorResult<IndicatorSeries> {
    IndicatorEngine::new(windows.iter().copied())
        .with_bollinger(BollingerParams::default())
        .compute(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::PriceRecord;
    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PriceRecord::from_close(start + Duration::days(i as i64), c))
                .collect(),
        )
    }

    #[test]
    fn test_moving_average_example() {
        let series = series_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = IndicatorEngine::new([3]).compute(&series).unwrap();

        let ma = result.column("3_MA").unwrap();
        assert_eq!(ma.values[0], None);
        assert_eq!(ma.values[1], None);
        for (i, expected) in [(2, 2.0), (3, 3.0), (4, 4.0)] {
            assert!((ma.values[i].unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_default_engine_columns() {
        let series = series_from_closes(&[10.0; 25]);
        let result = IndicatorEngine::default().compute(&series).unwrap();

        assert_eq!(
            result.column_names(),
            vec![
                "50_MA",
                "200_MA",
                "300_MA",
                "400_MA",
                "500_MA",
                "600_MA",
                "700_MA",
                "Middle_Band",
                "Upper_Band",
                "Lower_Band",
            ]
        );
        // 資料不足 50 筆，所有均線皆未定義
        assert_eq!(result.column("50_MA").unwrap().defined_count(), 0);
        assert_eq!(result.column("Middle_Band").unwrap().defined_count(), 6);
    }

    #[test]
    fn test_bollinger_constant_series_collapses() {
        let series = series_from_closes(&[10.0; 20]);
        let result = compute_indicators(&series, &BTreeSet::new()).unwrap();

        assert_eq!(result.value("Middle_Band", 19), Some(10.0));
        assert_eq!(result.value("Upper_Band", 19), Some(10.0));
        assert_eq!(result.value("Lower_Band", 19), Some(10.0));
        assert_eq!(result.value("Upper_Band", 18), None);
    }

    #[test]
    fn test_bollinger_uses_population_std_dev() {
        let closes: Vec<f64> = (1..=20).map(f64::from).collect();
        let series = series_from_closes(&closes);
        let result = compute_indicators(&series, &BTreeSet::new()).unwrap();

        // 1..=20 的母體變異數為 (20^2 - 1) / 12
        let sd = ((20.0_f64 * 20.0 - 1.0) / 12.0).sqrt();
        let middle = result.value("Middle_Band", 19).unwrap();
        assert!((middle - 10.5).abs() < 1e-12);
        assert!((result.value("Upper_Band", 19).unwrap() - (10.5 + 2.0 * sd)).abs() < 1e-9);
        assert!((result.value("Lower_Band", 19).unwrap() - (10.5 - 2.0 * sd)).abs() < 1e-9);
    }

    #[test]
    fn test_custom_bollinger_params() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let series = series_from_closes(&closes);
        let engine = IndicatorEngine::new([]).with_bollinger(BollingerParams {
            window: 5,
            num_std: 1.0,
        });
        let result = engine.compute(&series).unwrap();

        assert_eq!(result.column("Middle_Band").unwrap().defined_count(), 6);
        let upper = result.value("Upper_Band", 9).unwrap();
        let sd = 2.0_f64.sqrt();
        assert!((upper - (8.0 + sd)).abs() < 1e-9);
    }

    #[test]
    fn test_without_bollinger() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        let result = IndicatorEngine::default()
            .without_bollinger()
            .compute(&series)
            .unwrap();
        assert!(result.column("Middle_Band").is_none());
    }

    #[test]
    fn test_unsorted_input_rejected() {
        let mut records = series_from_closes(&[1.0, 2.0, 3.0]).into_records();
        records.swap(0, 2);
        let result = IndicatorEngine::new([2]).compute(&PriceSeries::new(records));

        assert_matches!(result, Err(IndicatorError::InvalidInput(_)));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let mut records = series_from_closes(&[1.0, 2.0]).into_records();
        records[1].date = records[0].date;
        let result = IndicatorEngine::new([2]).compute(&PriceSeries::new(records));

        assert_matches!(result, Err(IndicatorError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_window_rejected() {
        let series = series_from_closes(&[1.0, 2.0]);
        let result = IndicatorEngine::new([0]).compute(&series);
        assert_matches!(result, Err(IndicatorError::InvalidWindow(0)));
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let result = bollinger_bands(
            &[1.0, 2.0],
            BollingerParams {
                window: 2,
                num_std: -1.0,
            },
        );
        assert_matches!(result, Err(IndicatorError::InvalidMultiplier(_)));
    }

    #[test]
    fn test_apply_keeps_unrelated_columns() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        let mut input = IndicatorSeries::from(series);
        input
            .upsert_column(IndicatorColumn::new("3Y_MA", vec![None, None, Some(2.0)]))
            .unwrap();

        let result = IndicatorEngine::new([2]).apply(input).unwrap();
        assert_eq!(result.column_names(), vec!["3Y_MA", "2_MA"]);
        assert_eq!(result.value("3Y_MA", 2), Some(2.0));
    }

    #[test]
    fn test_moving_average_column() {
        let series = series_from_closes(&[2.0, 4.0, 6.0]);
        let column = moving_average_column(&series, 2, ColumnName::LONG_MOVING_AVERAGE).unwrap();

        assert_eq!(column.name, "3Y_MA");
        assert_eq!(column.values, vec![None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn test_empty_series() {
        let result = IndicatorEngine::default()
            .compute(&PriceSeries::default())
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns().len(), 10);
    }
}
