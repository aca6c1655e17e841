//! 日線下載流程
//!
//! 取得資料 → 寫出原始快照 → 從磁碟重新載入 → 附加長週期均線 → 寫出第二份快照。

use super::error::FetchError;
use super::provider::MarketDataProvider;
use crate::config::ApplicationConfig;
use crate::domain_types::{ColumnName, IndicatorSeries};
use crate::indicators::{moving_average_column, IndicatorError};
use crate::storage::{SnapshotKind, SnapshotStore};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info};

/// 下載完成後顯示的尾端筆數
const TAIL_ROWS: usize = 5;

/// 下載結果
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub raw_path: PathBuf,
    pub enriched_path: PathBuf,
    /// 附加長週期均線後的序列
    pub series: IndicatorSeries,
}

impl FetchOutcome {
    pub fn row_count(&self) -> usize {
        self.series.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.series.prices().first_date()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.series.prices().last_date()
    }
}

/// 日線下載器
pub struct DailyPriceFetcher<P: MarketDataProvider> {
    provider: P,
    store: SnapshotStore,
    long_window: usize,
}

impl<P: MarketDataProvider> DailyPriceFetcher<P> {
    pub fn new(provider: P, store: SnapshotStore, long_window: usize) -> Self {
        Self {
            provider,
            store,
            long_window,
        }
    }

    pub fn from_config(provider: P, config: &ApplicationConfig) -> Self {
        Self::new(
            provider,
            SnapshotStore::from_config(&config.storage),
            config.fetch.long_window,
        )
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// 下載 `[start, end)` 的日線並寫出兩份快照
    pub async fn fetch_daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchOutcome, FetchError> {
        info!(symbol, %start, %end, "開始下載資料: {} 至 {}", start, end);

        let prices = match self.provider.daily_prices(symbol, start, end).await {
            Ok(prices) => prices,
            Err(e) => {
                error!(symbol, %start, %end, "資料下載失敗: {}", e);
                return Err(e.into());
            }
        };

        let raw_path = self.store.save_prices(start, end, &prices)?;

        let mut series = self.store.load(SnapshotKind::Raw, start, end)?;
        info!(rows = series.len(), "已重新載入原始快照");

        let column = moving_average_column(
            series.prices(),
            self.long_window,
            ColumnName::LONG_MOVING_AVERAGE,
        )?;
        series.upsert_column(column).map_err(IndicatorError::from)?;

        log_tail(&series);

        let enriched_path = self
            .store
            .save(SnapshotKind::LongMovingAverage, start, end, &series)?;

        let outcome = FetchOutcome {
            raw_path,
            enriched_path,
            series,
        };
        info!(
            rows = outcome.row_count(),
            first = ?outcome.first_date(),
            last = ?outcome.last_date(),
            "下載完成"
        );
        Ok(outcome)
    }
}

fn log_tail(series: &IndicatorSeries) {
    let skip = series.len().saturating_sub(TAIL_ROWS);
    for (row, record) in series.records().iter().enumerate().skip(skip) {
        info!(
            date = %record.date,
            close = record.close,
            long_ma = ?series.value(ColumnName::LONG_MOVING_AVERAGE, row),
            "{}",
            ColumnName::LONG_MOVING_AVERAGE
        );
    }
}
