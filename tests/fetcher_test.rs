mod common;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::NaiveDate;
use common::{date, weekday_series};
use index_analysis::config::ApplicationConfig;
use index_analysis::data_ingestion::CsvReader;
use index_analysis::data_provider::{
    DailyPriceFetcher, FetchError, MarketDataProvider, RetrievalError,
};
use index_analysis::domain_types::PriceSeries;
use index_analysis::storage::{SnapshotKind, SnapshotStore};
use tempfile::TempDir;

/// 回傳固定資料的供應商，只保留 `[start, end)` 內的交易日
struct StubProvider {
    series: PriceSeries,
}

impl StubProvider {
    fn new(series: PriceSeries) -> Self {
        Self { series }
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, RetrievalError> {
        if symbol != "SPY" {
            return Err(RetrievalError::InvalidSymbol {
                symbol: symbol.to_string(),
                message: "No data found, symbol may be delisted".to_string(),
            });
        }

        let records: Vec<_> = self
            .series
            .records()
            .iter()
            .filter(|r| r.date >= start && r.date < end)
            .cloned()
            .collect();

        if records.is_empty() {
            return Err(RetrievalError::EmptyResult {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(PriceSeries::new(records))
    }
}

fn config_for(dir: &TempDir) -> ApplicationConfig {
    let mut config = ApplicationConfig::default();
    config.storage.data_dir = dir.path().join("data").join("raw");
    config.storage.file_prefix = "spy_data".to_string();
    config
}

#[tokio::test]
async fn test_three_year_fetch_produces_long_average() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);
    let provider = StubProvider::new(weekday_series(date(2018, 1, 1), 800));

    let fetcher = DailyPriceFetcher::from_config(provider, &config);
    let (start, end) = (date(2018, 1, 1), date(2021, 1, 1));
    let outcome = fetcher.fetch_daily_prices("SPY", start, end).await.unwrap();

    assert_eq!(
        outcome.raw_path,
        config.storage.data_dir.join("spy_data_2018-01-01_2021-01-01.csv")
    );
    assert_eq!(
        outcome.enriched_path,
        config
            .storage
            .data_dir
            .join("spy_data_with_3Y_MA_2018-01-01_2021-01-01.csv")
    );

    // 2018-2020 共 784 個平日
    assert_eq!(outcome.row_count(), 784);
    let long_ma = outcome.series.column("3Y_MA").unwrap();
    assert_eq!(long_ma.defined_count(), 784 - 756 + 1);
    assert!(long_ma.values[754].is_none());
    assert!(long_ma.values[755].is_some());

    // 原始快照不含長週期均線，第二份快照含有
    let raw = CsvReader::default().read_file(&outcome.raw_path).unwrap();
    assert!(raw.column("3Y_MA").is_none());
    let enriched = fetcher
        .store()
        .load(SnapshotKind::LongMovingAverage, start, end)
        .unwrap();
    assert_eq!(enriched, outcome.series);
}

#[tokio::test]
async fn test_refetch_overwrites_snapshots() {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(dir.path(), "spy_data");
    let (start, end) = (date(2020, 1, 1), date(2020, 2, 1));

    let first = DailyPriceFetcher::new(
        StubProvider::new(weekday_series(date(2020, 1, 1), 10)),
        store.clone(),
        3,
    );
    first.fetch_daily_prices("SPY", start, end).await.unwrap();

    let second = DailyPriceFetcher::new(
        StubProvider::new(weekday_series(date(2020, 1, 1), 20)),
        store.clone(),
        3,
    );
    second.fetch_daily_prices("SPY", start, end).await.unwrap();

    let reloaded = store.load(SnapshotKind::Raw, start, end).unwrap();
    assert_eq!(reloaded.len(), 20);
}

#[tokio::test]
async fn test_invalid_symbol_propagates() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);
    let fetcher = DailyPriceFetcher::from_config(
        StubProvider::new(weekday_series(date(2018, 1, 1), 10)),
        &config,
    );

    let result = fetcher
        .fetch_daily_prices("NOPE", date(2018, 1, 1), date(2018, 2, 1))
        .await;

    assert_matches!(
        result,
        Err(FetchError::Retrieval(RetrievalError::InvalidSymbol { .. }))
    );
    assert!(!config.storage.data_dir.exists());
}

#[tokio::test]
async fn test_empty_range_is_retrieval_error() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);
    let provider = StubProvider::new(weekday_series(date(2018, 1, 1), 10));
    let fetcher = DailyPriceFetcher::from_config(provider, &config);

    let result = fetcher
        .fetch_daily_prices("SPY", date(2025, 1, 1), date(2025, 2, 1))
        .await;

    assert_matches!(
        result,
        Err(FetchError::Retrieval(RetrievalError::EmptyResult { .. }))
    );
}
