#![allow(dead_code)]

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use index_analysis::domain_types::{PriceRecord, PriceSeries};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 以收盤價建立連續日曆日的序列
pub fn series_from_closes(start: NaiveDate, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceRecord::from_close(start + Duration::days(i as i64), close))
            .collect(),
    )
}

/// 只含平日的 OHLCV 序列，模擬週末缺口
pub fn weekday_series(start: NaiveDate, days: usize) -> PriceSeries {
    let mut records = Vec::with_capacity(days);
    let mut current = start;
    let mut i = 0usize;

    while records.len() < days {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            let close = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
            records.push(PriceRecord::new(
                current,
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                1_000_000.0 + i as f64,
            ));
            i += 1;
        }
        current += Duration::days(1);
    }

    PriceSeries::new(records)
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "actual {} != expected {}",
        actual,
        expected
    );
}
