use super::error::{ValidationError, ValidationErrors, ValidationResult};
use super::traits::Validator;
use crate::domain_types::PriceRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::marker::PhantomData;

/// 通用時間序列記錄特徵
pub trait TimeSeriesRecord {
    /// 記錄所屬的交易日期
    fn date(&self) -> NaiveDate;
}

impl TimeSeriesRecord for PriceRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// 時間序列驗證器
///
/// 要求日期嚴格遞增且不重複。日線資料以觀察順序為準，
/// 週末與假日造成的日曆缺口不視為錯誤。
pub struct TimeSeriesValidator<T: TimeSeriesRecord> {
    _phantom: PhantomData<T>,
}

impl<T: TimeSeriesRecord> TimeSeriesValidator<T> {
    /// 創建新的時間序列驗證器
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    /// 驗證時間序列
    pub fn validate_series(&self, records: &[T]) -> Result<TimeSeriesStats, ValidationErrors> {
        if records.is_empty() {
            return Ok(TimeSeriesStats::default());
        }

        let mut errors = ValidationErrors::new();
        let mut seen = HashSet::with_capacity(records.len());
        let mut stats = TimeSeriesStats {
            total_records: records.len(),
            start_date: Some(records[0].date()),
            ..Default::default()
        };

        for (i, record) in records.iter().enumerate() {
            let date = record.date();

            // 檢查重複
            if !seen.insert(date) {
                errors.add(
                    i,
                    ValidationError::DuplicateEntry {
                        date: date.to_string(),
                    },
                );
                continue;
            }

            if i == 0 {
                continue;
            }

            let previous = records[i - 1].date();
            if date <= previous {
                errors.add(
                    i,
                    ValidationError::OutOfOrder {
                        previous: previous.to_string(),
                        current: date.to_string(),
                    },
                );
            } else {
                let gap = (date - previous).num_days();
                stats.max_gap_days = Some(stats.max_gap_days.map_or(gap, |max| max.max(gap)));
            }
        }

        stats.end_date = records.last().map(|r| r.date());

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(stats)
        }
    }
}

impl<T: TimeSeriesRecord> Default for TimeSeriesValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSeriesRecord> Validator for TimeSeriesValidator<T> {
    type Data = T;

    fn name(&self) -> &str {
        "TimeSeriesValidator"
    }

    // 順序只能在批次中判斷
    fn validate_record(&self, _record: &Self::Data) -> ValidationResult<()> {
        Ok(())
    }

    fn validate_batch(&self, data: &[Self::Data]) -> Result<(), ValidationErrors> {
        self.validate_series(data).map(|_| ())
    }
}

/// 時間序列統計資訊
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesStats {
    /// 總記錄數
    pub total_records: usize,
    /// 開始日期
    pub start_date: Option<NaiveDate>,
    /// 結束日期
    pub end_date: Option<NaiveDate>,
    /// 相鄰記錄間最大的日曆天數差
    pub max_gap_days: Option<i64>,
}
