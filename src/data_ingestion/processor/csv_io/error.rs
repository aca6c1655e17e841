//! CSV 處理錯誤定義

use crate::domain_types::SeriesError;
use thiserror::Error;

/// CSV 處理錯誤類型
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("檔案讀取錯誤: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV 解析錯誤: {0}")]
    ParseError(#[from] csv::Error),

    #[error("缺少必要欄位: {0}")]
    MissingColumn(String),

    #[error("無效的欄位格式: 第 {row} 行, 欄位 {column}, 值 {value}, 原因: {reason}")]
    InvalidFormat {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("日期解析錯誤: 第 {row} 行, 值 '{value}'")]
    TimestampParseError { row: usize, value: String },

    #[error("數值解析錯誤: 第 {row} 行, 欄位 {column}, 值 '{value}'")]
    NumberParseError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("序列結構錯誤: {0}")]
    Series(#[from] SeriesError),
}

/// CSV 處理結果類型
pub type CsvResult<T> = Result<T, CsvError>;
