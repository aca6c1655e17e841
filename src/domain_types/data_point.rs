use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 日線價格記錄
///
/// 收盤價為必要欄位，所有指標都由收盤價計算；
/// 其餘欄位在行情來源或 CSV 中可能為空。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

impl PriceRecord {
    /// 只包含收盤價的記錄
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// 完整的 OHLCV 記錄
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(volume),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_record_creation() {
        let date = NaiveDate::from_ymd_opt(2019, 3, 15).unwrap();
        let record = PriceRecord::new(date, 280.0, 283.5, 279.1, 282.2, 1_000_000.0);

        assert_eq!(record.date, date);
        assert_eq!(record.open, Some(280.0));
        assert_eq!(record.high, Some(283.5));
        assert_eq!(record.low, Some(279.1));
        assert_eq!(record.close, 282.2);
        assert_eq!(record.volume, Some(1_000_000.0));
        assert_eq!(record.year(), 2019);
        assert_eq!(record.month(), 3);
    }

    #[test]
    fn test_close_only_record() {
        let date = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        let record = PriceRecord::from_close(date, 373.88);

        assert_eq!(record.close, 373.88);
        assert!(record.open.is_none());
        assert!(record.volume.is_none());
    }
}
