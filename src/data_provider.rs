pub mod error;
pub mod fetcher;
pub mod provider;
pub mod yahoo;

pub use error::{FetchError, RetrievalError};
pub use fetcher::{DailyPriceFetcher, FetchOutcome};
pub use provider::MarketDataProvider;
pub use yahoo::{parse_chart_response, YahooChartProvider};

#[cfg(test)]
pub use provider::MockMarketDataProvider;
