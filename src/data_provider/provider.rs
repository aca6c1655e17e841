use super::error::RetrievalError;
use crate::domain_types::PriceSeries;
use async_trait::async_trait;
use chrono::NaiveDate;

/// 行情供應商特性 - 下載流程依賴的外部接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 取得 `[start, end)` 區間的日線資料，依日期遞增排列
    async fn daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, RetrievalError>;
}
