// utils.rs - 公共工具模組
//
// 提供日期解析與時間戳轉換等通用工具函數。

pub mod time_utils;

pub use time_utils::{
    date_to_unix_seconds, format_date, parse_trading_date, unix_seconds_to_local_date,
    DATE_FORMAT,
};
