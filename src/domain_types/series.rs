//! 日線時間序列與指標序列

use super::data_point::PriceRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 序列結構錯誤
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("欄位 {name} 長度為 {actual}，與序列長度 {expected} 不一致")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// 日線價格序列
///
/// 依觀察順序保存記錄。日期排序與唯一性不在建構時檢查，
/// 而是在進入指標計算前由驗證器統一把關。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PriceRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }

    /// 收盤價向量（觀察順序）
    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// 以日期查找位置，要求序列已依日期遞增排序
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.records.binary_search_by_key(&date, |r| r.date).ok()
    }

    /// 取出 `[from, to]` 日期區間內的記錄，要求序列已依日期遞增排序
    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> &[PriceRecord] {
        let start = self.records.partition_point(|r| r.date < from);
        let end = self.records.partition_point(|r| r.date <= to);
        if start >= end {
            return &[];
        }
        &self.records[start..end]
    }
}

impl From<Vec<PriceRecord>> for PriceSeries {
    fn from(records: Vec<PriceRecord>) -> Self {
        Self::new(records)
    }
}

/// 衍生指標欄位，未定義的位置為 `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl IndicatorColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 已定義值的數量
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// 附帶指標欄位的價格序列
///
/// 每個欄位的長度都與價格序列相同，並依欄位加入的順序保存。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    prices: PriceSeries,
    columns: Vec<IndicatorColumn>,
}

impl IndicatorSeries {
    pub fn new(prices: PriceSeries) -> Self {
        Self {
            prices,
            columns: Vec::new(),
        }
    }

    /// 以既有欄位建立序列，欄位長度必須與價格序列一致
    pub fn with_columns(
        prices: PriceSeries,
        columns: Vec<IndicatorColumn>,
    ) -> Result<Self, SeriesError> {
        let mut series = Self::new(prices);
        for column in columns {
            series.upsert_column(column)?;
        }
        Ok(series)
    }

    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    pub fn records(&self) -> &[PriceRecord] {
        self.prices.records()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn columns(&self) -> &[IndicatorColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&IndicatorColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// 取得指定欄位在某一列的值
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name)?.values.get(row).copied().flatten()
    }

    /// 新增欄位，若同名欄位已存在則原位取代
    pub fn upsert_column(&mut self, column: IndicatorColumn) -> Result<(), SeriesError> {
        if column.len() != self.len() {
            return Err(SeriesError::ColumnLength {
                name: column.name,
                expected: self.len(),
                actual: column.values.len(),
            });
        }

        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// 依記錄條件挑選列，保留原本順序與所有欄位
    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(&PriceRecord) -> bool,
    {
        let selected: Vec<usize> = self
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| keep(record))
            .map(|(i, _)| i)
            .collect();

        let records = selected
            .iter()
            .map(|&i| self.records()[i].clone())
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|column| IndicatorColumn {
                name: column.name.clone(),
                values: selected.iter().map(|&i| column.values[i]).collect(),
            })
            .collect();

        Self {
            prices: PriceSeries::new(records),
            columns,
        }
    }
}

impl From<PriceSeries> for IndicatorSeries {
    fn from(prices: PriceSeries) -> Self {
        Self::new(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_prices() -> PriceSeries {
        PriceSeries::new(vec![
            PriceRecord::from_close(date(2019, 12, 30), 321.0),
            PriceRecord::from_close(date(2019, 12, 31), 322.0),
            PriceRecord::from_close(date(2020, 1, 2), 324.0),
            PriceRecord::from_close(date(2020, 1, 3), 322.5),
        ])
    }

    #[test]
    fn test_range_query() {
        let prices = sample_prices();
        let slice = prices.range(date(2019, 12, 31), date(2020, 1, 2));
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].close, 322.0);
        assert_eq!(slice[1].close, 324.0);

        assert!(prices.range(date(2021, 1, 1), date(2021, 2, 1)).is_empty());
        assert_eq!(prices.position(date(2020, 1, 3)), Some(3));
        assert_eq!(prices.position(date(2020, 1, 1)), None);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut series = IndicatorSeries::new(sample_prices());
        series
            .upsert_column(IndicatorColumn::new("A", vec![None; 4]))
            .unwrap();
        series
            .upsert_column(IndicatorColumn::new("B", vec![Some(1.0); 4]))
            .unwrap();
        series
            .upsert_column(IndicatorColumn::new("A", vec![Some(2.0); 4]))
            .unwrap();

        assert_eq!(series.column_names(), vec!["A", "B"]);
        assert_eq!(series.value("A", 0), Some(2.0));
    }

    #[test]
    fn test_upsert_rejects_length_mismatch() {
        let mut series = IndicatorSeries::new(sample_prices());
        let err = series
            .upsert_column(IndicatorColumn::new("short", vec![None; 2]))
            .unwrap_err();

        assert_eq!(
            err,
            SeriesError::ColumnLength {
                name: "short".to_string(),
                expected: 4,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_filter_rows_keeps_columns_aligned() {
        let series = IndicatorSeries::with_columns(
            sample_prices(),
            vec![IndicatorColumn::new(
                "X",
                vec![None, Some(1.0), Some(2.0), Some(3.0)],
            )],
        )
        .unwrap();

        let filtered = series.filter_rows(|r| r.date.year() == 2020);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.records()[0].close, 324.0);
        assert_eq!(filtered.column("X").unwrap().values, vec![Some(2.0), Some(3.0)]);
    }
}
