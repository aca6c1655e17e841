//! 年份與月份篩選

use crate::domain_types::IndicatorSeries;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 代表「不篩選」的選項文字
pub const ALL: &str = "All";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("無效的年份選項: '{0}'（請輸入年份或 All）")]
    InvalidYear(String),

    #[error("無效的月份選項: '{0}'（請輸入 1-12 或 All）")]
    InvalidMonth(String),
}

/// 年份篩選
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

/// 月份篩選
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl YearFilter {
    pub fn matches(&self, year: i32) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(y) => *y == year,
        }
    }
}

impl MonthFilter {
    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl FromStr for YearFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            return Ok(YearFilter::All);
        }
        s.parse()
            .map(YearFilter::Year)
            .map_err(|_| FilterError::InvalidYear(s.to_string()))
    }
}

impl FromStr for MonthFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            return Ok(MonthFilter::All);
        }
        match s.parse() {
            Ok(month @ 1..=12) => Ok(MonthFilter::Month(month)),
            _ => Err(FilterError::InvalidMonth(s.to_string())),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => f.write_str(ALL),
            YearFilter::Year(y) => write!(f, "{}", y),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str(ALL),
            MonthFilter::Month(m) => write!(f, "{}", m),
        }
    }
}

impl Serialize for YearFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 依年份與月份篩選
///
/// 月份只在年份篩選後的子集上套用；年份為 All 時比對所有年份的同一月份。
/// 結果可以是空序列。
pub fn select_window(
    series: &IndicatorSeries,
    year: YearFilter,
    month: MonthFilter,
) -> IndicatorSeries {
    series.filter_rows(|record| year.matches(record.year()) && month.matches(record.month()))
}

/// 年份選項：資料中出現的年份（遞增）加上 All
pub fn available_years(series: &IndicatorSeries) -> Vec<YearFilter> {
    let years: BTreeSet<i32> = series.records().iter().map(|r| r.year()).collect();
    years
        .into_iter()
        .map(YearFilter::Year)
        .chain(std::iter::once(YearFilter::All))
        .collect()
}

/// 月份選項：年份篩選後資料中出現的月份（遞增）加上 All
pub fn available_months(series: &IndicatorSeries, year: YearFilter) -> Vec<MonthFilter> {
    let months: BTreeSet<u32> = series
        .records()
        .iter()
        .filter(|r| year.matches(r.year()))
        .map(|r| r.month())
        .collect();
    months
        .into_iter()
        .map(MonthFilter::Month)
        .chain(std::iter::once(MonthFilter::All))
        .collect()
}
