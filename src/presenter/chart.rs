//! 圖表資料模型
//!
//! 只描述要畫什麼，實際繪圖交給外部工具。缺值以 `null` 輸出，繪圖端應留空而非畫成零。

use super::filter::YearFilter;
use super::labels::Labels;
use crate::domain_types::{ColumnName, IndicatorSeries};
use chrono::NaiveDate;
use serde::Serialize;

/// 移動平均線依序使用的顏色
pub const MOVING_AVERAGE_COLORS: [&str; 7] =
    ["orange", "green", "red", "purple", "brown", "pink", "cyan"];

const CLOSE_COLOR: &str = "blue";
const BAR_COLOR: &str = "lightblue";
const BAND_FILL_COLOR: &str = "lightgray";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    pub column: String,
    pub color: &'static str,
    pub style: LineStyle,
    pub width: f64,
    pub alpha: f64,
    pub values: Vec<Option<f64>>,
}

/// 上下軌之間的填色區域
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandFill {
    pub upper: String,
    pub lower: String,
    pub color: &'static str,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
    pub band: Option<BandFill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub label: String,
    pub color: &'static str,
    pub alpha: f64,
    pub values: Vec<f64>,
}

/// 折線圖與長條圖，共用同一組日期
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    pub dates: Vec<NaiveDate>,
    pub line: LineChart,
    pub bar: BarChart,
}

impl ChartModel {
    /// 建立圖表模型
    ///
    /// 折線圖包含收盤價與每一條移動平均（依窗口排序）；`include_bands` 為真且
    /// 序列含有布林通道欄位時一併加入上中下軌與填色。
    pub fn build(
        series: &IndicatorSeries,
        labels: &Labels,
        index_name: &str,
        year: YearFilter,
        include_bands: bool,
    ) -> Self {
        let dates: Vec<NaiveDate> = series.prices().dates().collect();
        let closes = series.prices().closes();

        let mut lines = vec![LineSeries {
            label: labels.close_price.to_string(),
            column: ColumnName::CLOSE.to_string(),
            color: CLOSE_COLOR,
            style: LineStyle::Solid,
            width: 1.0,
            alpha: 0.5,
            values: closes.iter().copied().map(Some).collect(),
        }];

        let mut averages: Vec<(usize, &str, &[Option<f64>])> = series
            .columns()
            .iter()
            .filter_map(|c| {
                ColumnName::parse_moving_average(&c.name)
                    .map(|w| (w, c.name.as_str(), c.values.as_slice()))
            })
            .collect();
        averages.sort_by_key(|(window, _, _)| *window);

        for (i, (window, name, values)) in averages.into_iter().enumerate() {
            lines.push(LineSeries {
                label: labels.moving_average(window),
                column: name.to_string(),
                color: MOVING_AVERAGE_COLORS[i % MOVING_AVERAGE_COLORS.len()],
                style: LineStyle::Solid,
                width: 2.0,
                alpha: 1.0,
                values: values.to_vec(),
            });
        }

        let mut band = None;
        if include_bands {
            let bands = [
                (ColumnName::MIDDLE_BAND, labels.middle_band, "orange", LineStyle::Solid),
                (ColumnName::UPPER_BAND, labels.upper_band, "green", LineStyle::Dashed),
                (ColumnName::LOWER_BAND, labels.lower_band, "red", LineStyle::Dashed),
            ];
            let present = bands.iter().all(|(name, ..)| series.column(name).is_some());
            if present {
                for (name, label, color, style) in bands {
                    if let Some(column) = series.column(name) {
                        lines.push(LineSeries {
                            label: label.to_string(),
                            column: name.to_string(),
                            color,
                            style,
                            width: if style == LineStyle::Solid { 2.0 } else { 1.0 },
                            alpha: 1.0,
                            values: column.values.clone(),
                        });
                    }
                }
                band = Some(BandFill {
                    upper: ColumnName::UPPER_BAND.to_string(),
                    lower: ColumnName::LOWER_BAND.to_string(),
                    color: BAND_FILL_COLOR,
                    alpha: 0.5,
                });
            }
        }

        Self {
            dates,
            line: LineChart {
                title: labels.line_chart_title(index_name, year),
                x_label: labels.date.to_string(),
                y_label: labels.price.to_string(),
                series: lines,
                band,
            },
            bar: BarChart {
                title: labels.bar_chart_title(index_name, year),
                x_label: labels.date.to_string(),
                y_label: labels.price.to_string(),
                label: labels.close_price.to_string(),
                color: BAR_COLOR,
                alpha: 0.5,
                values: closes,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
