use crate::data_ingestion::CsvError;
use crate::indicators::IndicatorError;
use chrono::NaiveDate;
use thiserror::Error;

/// 行情取得錯誤
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("網路請求失敗: {0}")]
    Network(#[from] reqwest::Error),

    #[error("供應商回應錯誤 (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    #[error("無效的代號 {symbol}: {message}")]
    InvalidSymbol { symbol: String, message: String },

    #[error("{symbol} 在 {start} 至 {end} 之間沒有資料")]
    EmptyResult {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("回應解析失敗: {0}")]
    Decode(String),

    #[error("無效的日期範圍: {start} 至 {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// 下載流程錯誤
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("快照讀寫失敗: {0}")]
    Storage(#[from] CsvError),

    #[error("長週期均線計算失敗: {0}")]
    Indicator(#[from] IndicatorError),
}
