//! 資料驗證器模組
//!
//! 確保進入指標計算的日線資料符合質量標準。
//!
//! # 主要功能
//!
//! - **數值驗證**：價格必須為正的有限數值，成交量不可為負
//! - **價格一致性檢查**：最高價不低於最低價
//! - **時間序列驗證**：日期嚴格遞增且不重複
//!
//! # 使用範例
//!
//! ```rust,ignore
//! use index_analysis::data_ingestion::validator::{OhlcvValidator, TimeSeriesValidator, Validator};
//!
//! OhlcvValidator::new().validate_batch(series.records())?;
//!
//! let stats = TimeSeriesValidator::new().validate_series(series.records())?;
//! ```

pub mod error;
pub mod ohlcv_validator;
pub mod time_series_validator;
pub mod traits;

// 重新導出常用類型
pub use error::{ValidationError, ValidationErrors, ValidationResult};
pub use ohlcv_validator::OhlcvValidator;
pub use time_series_validator::{TimeSeriesRecord, TimeSeriesStats, TimeSeriesValidator};
pub use traits::Validator;

use crate::domain_types::PriceRecord;

/// 驗證一組日線記錄：先逐筆檢查數值，再檢查時間順序
pub fn validate_price_records(records: &[PriceRecord]) -> Result<TimeSeriesStats, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(record_errors) = OhlcvValidator::new().validate_batch(records) {
        errors.merge(record_errors);
    }

    match TimeSeriesValidator::<PriceRecord>::new().validate_series(records) {
        Ok(stats) if !errors.has_errors() => Ok(stats),
        Ok(_) => Err(errors),
        Err(order_errors) => {
            errors.merge(order_errors);
            Err(errors)
        }
    }
}
