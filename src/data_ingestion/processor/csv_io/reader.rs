//! CSV 檔案讀取器

use super::error::{CsvError, CsvResult};
use crate::domain_types::{ColumnName, IndicatorColumn, IndicatorSeries, PriceRecord, PriceSeries};
use crate::utils::parse_trading_date;
use csv::StringRecord;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// CSV 讀取器配置
#[derive(Debug, Clone)]
pub struct CsvReaderConfig {
    /// 分隔符
    pub separator: u8,
    /// 額外的日期格式，優先於內建格式嘗試
    pub date_formats: Vec<String>,
    /// 日期欄位名稱（None 表示自動偵測，找不到時使用第一欄）
    pub date_column: Option<String>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            separator: b',',
            date_formats: Vec::new(),
            date_column: None,
        }
    }
}

/// 欄位位置對照
#[derive(Debug)]
struct ColumnLayout {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
    /// 其餘數值欄位（預先計算的指標、股利等），依原始順序保留
    extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord, date_column: Option<&str>) -> CsvResult<Self> {
        let names: Vec<&str> = headers.iter().collect();

        let date = match date_column {
            Some(wanted) => names
                .iter()
                .position(|n| n.eq_ignore_ascii_case(wanted))
                .ok_or_else(|| CsvError::MissingColumn(wanted.to_string()))?,
            None => names
                .iter()
                .position(|n| {
                    let n = n.to_ascii_lowercase();
                    n == "date" || n == "datetime" || n == "timestamp"
                })
                .unwrap_or(0),
        };

        let mut open = None;
        let mut high = None;
        let mut low = None;
        let mut close = None;
        let mut volume = None;
        let mut extras = Vec::new();

        let mut seen = HashSet::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            // 重複的欄位名稱無法對應到唯一的指標欄位
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(CsvError::InvalidFormat {
                    row: 1,
                    column: name.to_string(),
                    value: name.to_string(),
                    reason: "欄位名稱重複".to_string(),
                });
            }
            if idx == date {
                continue;
            }
            let slot = match name.to_ascii_lowercase().as_str() {
                "open" => &mut open,
                "high" => &mut high,
                "low" => &mut low,
                "close" => &mut close,
                "volume" => &mut volume,
                _ => {
                    extras.push((idx, name.to_string()));
                    continue;
                }
            };
            *slot = Some(idx);
        }

        let close = close.ok_or_else(|| CsvError::MissingColumn(ColumnName::CLOSE.to_string()))?;

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            extras,
        })
    }
}

/// CSV 檔案讀取器
///
/// 可讀取原始快照與附帶指標欄位的快照；
/// OHLCV 以外的數值欄位會以指標欄位的形式保留。
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    config: CsvReaderConfig,
}

impl CsvReader {
    /// 創建新的 CSV 讀取器
    pub fn new(config: CsvReaderConfig) -> Self {
        Self { config }
    }

    /// 設定分隔符
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.config.separator = separator;
        self
    }

    /// 增加日期格式
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.config.date_formats.push(format.into());
        self
    }

    /// 指定日期欄位名稱
    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.config.date_column = Some(column.into());
        self
    }

    /// 從檔案路徑讀取 CSV
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> CsvResult<IndicatorSeries> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CsvError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("檔案不存在: {}", path.display()),
            )));
        }

        let file = std::fs::File::open(path)?;
        let series = self.read_from(file)?;
        debug!(path = %path.display(), rows = series.len(), "CSV 讀取完成");
        Ok(series)
    }

    /// 從字串讀取 CSV
    pub fn read_str(&self, data: &str) -> CsvResult<IndicatorSeries> {
        self.read_from(data.as_bytes())
    }

    /// 從任意來源讀取 CSV
    pub fn read_from<R: Read>(&self, source: R) -> CsvResult<IndicatorSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.separator)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let layout = ColumnLayout::from_headers(&headers, self.config.date_column.as_deref())?;

        let mut records = Vec::new();
        let mut extras: Vec<Vec<Option<f64>>> = vec![Vec::new(); layout.extras.len()];

        for (i, row) in reader.records().enumerate() {
            let row = row?;
            // 標題佔第 1 行
            let line = i + 2;

            let raw_date = row.get(layout.date).unwrap_or("");
            let date = parse_trading_date(raw_date, &self.config.date_formats).ok_or_else(|| {
                CsvError::TimestampParseError {
                    row: line,
                    value: raw_date.to_string(),
                }
            })?;

            let close = parse_cell(&row, layout.close, line, ColumnName::CLOSE)?.ok_or_else(|| {
                CsvError::InvalidFormat {
                    row: line,
                    column: ColumnName::CLOSE.to_string(),
                    value: String::new(),
                    reason: "收盤價不可為空".to_string(),
                }
            })?;

            records.push(PriceRecord {
                date,
                open: parse_optional(&row, layout.open, line, ColumnName::OPEN)?,
                high: parse_optional(&row, layout.high, line, ColumnName::HIGH)?,
                low: parse_optional(&row, layout.low, line, ColumnName::LOW)?,
                close,
                volume: parse_optional(&row, layout.volume, line, ColumnName::VOLUME)?,
            });

            for (values, (idx, name)) in extras.iter_mut().zip(&layout.extras) {
                values.push(parse_cell(&row, *idx, line, name)?);
            }
        }

        let columns = layout
            .extras
            .into_iter()
            .zip(extras)
            .map(|((_, name), values)| IndicatorColumn::new(name, values))
            .collect();

        Ok(IndicatorSeries::with_columns(PriceSeries::new(records), columns)?)
    }
}

/// 解析數值欄位，空白與 NaN 視為缺值
fn parse_cell(row: &StringRecord, idx: usize, line: usize, column: &str) -> CsvResult<Option<f64>> {
    let raw = row.get(idx).unwrap_or("");
    if raw.is_empty() {
        return Ok(None);
    }

    let value: f64 = raw.parse().map_err(|_| CsvError::NumberParseError {
        row: line,
        column: column.to_string(),
        value: raw.to_string(),
    })?;

    Ok(if value.is_nan() { None } else { Some(value) })
}

fn parse_optional(
    row: &StringRecord,
    idx: Option<usize>,
    line: usize,
    column: &str,
) -> CsvResult<Option<f64>> {
    match idx {
        Some(idx) => parse_cell(row, idx, line, column),
        None => Ok(None),
    }
}
