//! 篩選與顯示模組
//!
//! 將指標序列依年份、月份篩選後，組成日資料表與圖表模型。
//! 實際的畫面與繪圖由外部負責，這裡只產生資料。

pub mod chart;
pub mod filter;
pub mod labels;
pub mod table;

pub use chart::{BandFill, BarChart, ChartModel, LineChart, LineSeries, LineStyle};
pub use filter::{
    available_months, available_years, select_window, FilterError, MonthFilter, YearFilter,
};
pub use labels::{Labels, Locale};
pub use table::{DailyTable, TableRow};

use crate::config::ApplicationConfig;
use crate::domain_types::IndicatorSeries;
use crate::indicators::{IndicatorEngine, IndicatorResult};
use tracing::info;

/// 一次篩選後的顯示內容
#[derive(Debug, Clone)]
pub struct DisplayView {
    pub locale: Locale,
    pub year: YearFilter,
    pub month: MonthFilter,
    pub year_options: Vec<YearFilter>,
    pub month_options: Vec<MonthFilter>,
    pub series: IndicatorSeries,
    pub table: DailyTable,
    pub chart: ChartModel,
}

impl DisplayView {
    pub fn labels(&self) -> &'static Labels {
        self.locale.labels()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// 顯示流程：重新計算指標後依選項產生畫面資料
pub struct Presenter {
    engine: IndicatorEngine,
    index_name: String,
}

impl Presenter {
    pub fn new(engine: IndicatorEngine, index_name: impl Into<String>) -> Self {
        Self {
            engine,
            index_name: index_name.into(),
        }
    }

    pub fn from_config(config: &ApplicationConfig) -> Self {
        Self::new(
            IndicatorEngine::from_config(&config.indicators),
            config.display.index_name.clone(),
        )
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// 在完整序列上計算顯示用指標，篩選之前呼叫
    pub fn prepare(&self, series: IndicatorSeries) -> IndicatorResult<IndicatorSeries> {
        self.engine.apply(series)
    }

    /// 依語系、年份與月份產生顯示內容
    pub fn view(
        &self,
        series: &IndicatorSeries,
        locale: Locale,
        year: YearFilter,
        month: MonthFilter,
    ) -> DisplayView {
        let selected = select_window(series, year, month);
        info!(%year, %month, rows = selected.len(), "已篩選顯示資料");

        let labels = locale.labels();
        let table = DailyTable::from_series(&selected);
        let chart = ChartModel::build(
            &selected,
            labels,
            &self.index_name,
            year,
            self.engine.bollinger().is_some(),
        );

        DisplayView {
            locale,
            year,
            month,
            year_options: available_years(series),
            month_options: available_months(series, year),
            series: selected,
            table,
            chart,
        }
    }
}
