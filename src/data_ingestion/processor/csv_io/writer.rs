//! CSV 檔案寫入器

use super::error::CsvResult;
use crate::domain_types::{ColumnName, IndicatorColumn, IndicatorSeries, PriceSeries};
use crate::utils::format_date;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// CSV 檔案寫入器
///
/// 輸出欄位依序為 `Date,Open,High,Low,Close,Volume`，之後接上指標欄位。
/// 缺值寫成空白欄位；浮點數使用最短且可精確還原的十進位表示。
#[derive(Debug, Clone)]
pub struct CsvWriter {
    separator: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { separator: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定分隔符
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// 寫入指標序列到檔案（覆寫既有檔案）
    pub fn write_file<P: AsRef<Path>>(&self, path: P, series: &IndicatorSeries) -> CsvResult<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_to(file, series)?;
        debug!(path = %path.display(), rows = series.len(), "CSV 寫入完成");
        Ok(())
    }

    /// 寫入純價格序列到檔案（覆寫既有檔案）
    pub fn write_prices_file<P: AsRef<Path>>(&self, path: P, prices: &PriceSeries) -> CsvResult<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_parts(file, prices, &[])?;
        debug!(path = %path.display(), rows = prices.len(), "CSV 寫入完成");
        Ok(())
    }

    /// 寫入到任意目標
    pub fn write_to<W: Write>(&self, target: W, series: &IndicatorSeries) -> CsvResult<()> {
        self.write_parts(target, series.prices(), series.columns())
    }

    /// 輸出為字串
    pub fn to_csv_string(&self, series: &IndicatorSeries) -> CsvResult<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, series)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_parts<W: Write>(
        &self,
        target: W,
        prices: &PriceSeries,
        columns: &[IndicatorColumn],
    ) -> CsvResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.separator)
            .from_writer(target);

        let mut header = vec![
            ColumnName::DATE.to_string(),
            ColumnName::OPEN.to_string(),
            ColumnName::HIGH.to_string(),
            ColumnName::LOW.to_string(),
            ColumnName::CLOSE.to_string(),
            ColumnName::VOLUME.to_string(),
        ];
        header.extend(columns.iter().map(|c| c.name.clone()));
        writer.write_record(&header)?;

        for (row, record) in prices.records().iter().enumerate() {
            let mut fields = vec![
                format_date(record.date),
                format_value(record.open),
                format_value(record.high),
                format_value(record.low),
                format_value(Some(record.close)),
                format_value(record.volume),
            ];
            fields.extend(
                columns
                    .iter()
                    .map(|c| format_value(c.values.get(row).copied().flatten())),
            );
            writer.write_record(&fields)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
