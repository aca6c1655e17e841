//! 收盤價與移動平均的日資料表

use crate::domain_types::{ColumnName, IndicatorSeries};
use crate::utils::format_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// 表格中缺值的顯示文字
pub const MISSING: &str = "NaN";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// 日資料表：日期、收盤價與每一條移動平均
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl DailyTable {
    /// 由指標序列建立，移動平均欄位依窗口大小排序
    pub fn from_series(series: &IndicatorSeries) -> Self {
        let mut averages: Vec<(usize, &str)> = series
            .columns()
            .iter()
            .filter_map(|c| ColumnName::parse_moving_average(&c.name).map(|w| (w, c.name.as_str())))
            .collect();
        averages.sort_by_key(|(window, _)| *window);

        let mut headers = vec![ColumnName::CLOSE.to_string()];
        headers.extend(averages.iter().map(|(_, name)| name.to_string()));

        let rows = series
            .records()
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let mut values = vec![Some(record.close)];
                values.extend(averages.iter().map(|(_, name)| series.value(name, row)));
                TableRow {
                    date: record.date,
                    values,
                }
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 以固定寬度的純文字輸出
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                std::iter::once(format_date(row.date))
                    .chain(row.values.iter().map(|v| format_cell(*v)))
                    .collect()
            })
            .collect();

        let mut header = vec![ColumnName::DATE.to_string()];
        header.extend(self.headers.iter().cloned());

        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let mut out = String::new();
        for line in std::iter::once(&header).chain(cells.iter()) {
            let rendered: Vec<String> = line
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, width))| {
                    if i == 0 {
                        format!("{:<width$}", cell, width = *width)
                    } else {
                        format!("{:>width$}", cell, width = *width)
                    }
                })
                .collect();
            let _ = writeln!(out, "{}", rendered.join("  ").trim_end());
        }
        out
    }
}

fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::{IndicatorColumn, PriceRecord, PriceSeries};

    fn sample() -> IndicatorSeries {
        let prices = PriceSeries::new(vec![
            PriceRecord::from_close(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(), 324.87),
            PriceRecord::from_close(NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(), 322.41),
        ]);
        IndicatorSeries::with_columns(
            prices,
            vec![
                IndicatorColumn::new("200_MA", vec![None, Some(300.0)]),
                IndicatorColumn::new("50_MA", vec![Some(310.5), Some(311.0)]),
                IndicatorColumn::new("Upper_Band", vec![None, Some(330.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_columns_sorted_by_window_and_bands_excluded() {
        let table = DailyTable::from_series(&sample());
        assert_eq!(table.headers, vec!["Close", "50_MA", "200_MA"]);
        assert_eq!(table.rows[0].values, vec![Some(324.87), Some(310.5), None]);
    }

    #[test]
    fn test_render_marks_missing() {
        let rendered = DailyTable::from_series(&sample()).render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[1].starts_with("2020-01-02"));
        assert!(lines[1].ends_with("NaN"));
        assert!(lines[2].contains("322.41"));
    }

    #[test]
    fn test_empty_table_renders_header() {
        let table = DailyTable::from_series(&IndicatorSeries::default());
        assert!(table.is_empty());
        assert_eq!(table.render().lines().count(), 1);
    }
}
