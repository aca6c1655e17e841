// time_utils.rs
//
// 提供日期相關的工具函數：
// 1. 解析 CSV 中各種形式的交易日期
// 2. 在交易日期與 Unix 時間戳之間轉換（行情來源使用秒為單位）

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};

/// 快照檔案使用的日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 帶時區偏移的日期時間格式（例如 `2018-01-02 00:00:00-05:00`）
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
];

/// 不帶時區的日期時間格式
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y/%m/%d %H:%M:%S",
];

/// 0001-01-01 到 1970-01-01 的天數
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

const SECONDS_PER_DAY: i64 = 86_400;

/// 解析交易日期
///
/// 依序嘗試 `extra_formats`、純日期、帶偏移的日期時間與不帶時區的日期時間。
/// 帶偏移的值取其當地日期部分，與交易所所在時區的交易日一致。
pub fn parse_trading_date(value: &str, extra_formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for fmt in extra_formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(value, fmt) {
            return Some(dt.date_naive());
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// 以快照格式輸出日期
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 日期當天 00:00 UTC 的 Unix 秒數
pub fn date_to_unix_seconds(date: NaiveDate) -> i64 {
    (date.num_days_from_ce() as i64 - UNIX_EPOCH_DAYS_FROM_CE) * SECONDS_PER_DAY
}

/// 將 Unix 秒數加上交易所偏移後轉為當地日期
pub fn unix_seconds_to_local_date(timestamp: i64, gmt_offset_seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmt_offset_seconds, 0).map(|dt| dt.date_naive())
}
