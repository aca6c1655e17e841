use crate::data_ingestion::validator::ValidationErrors;
use crate::domain_types::SeriesError;
use thiserror::Error;

/// 指標計算錯誤
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 輸入序列未排序、日期重複或價格無效
    #[error("無效的輸入序列: {0}")]
    InvalidInput(#[from] ValidationErrors),

    #[error("無效的窗口大小: {0}")]
    InvalidWindow(usize),

    #[error("無效的布林通道倍數: {0}")]
    InvalidMultiplier(f64),

    #[error("序列結構錯誤: {0}")]
    Series(#[from] SeriesError),
}

pub type IndicatorResult<T> = Result<T, IndicatorError>;
