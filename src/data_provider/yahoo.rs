//! Yahoo Finance 日線供應商
//!
//! 呼叫 v8 chart 端點，`period2` 為不含的結束時間。
//! 時間戳以交易所的 `gmtoffset` 換算為當地交易日。

use super::error::RetrievalError;
use super::provider::MarketDataProvider;
use crate::config::ProviderConfig;
use crate::domain_types::{PriceRecord, PriceSeries};
use crate::utils::{date_to_unix_seconds, unix_seconds_to_local_date};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    /// 區間內沒有交易日時欄位不存在
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    #[serde(default)]
    adjclose: Vec<AdjCloseData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// 解析 chart 端點的回應內容
///
/// 收盤價為 null 的列（停牌、盤中未收）會被略過，只保留 `[start, end)` 內的交易日。
/// `adjust` 為真時以 `adjclose / close` 的比例調整開高低收；
/// 個別交易日缺少調整後收盤價時略過該日，整段缺少時保留原始價格並記錄警告。
pub fn parse_chart_response(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    body: &str,
    adjust: bool,
) -> Result<PriceSeries, RetrievalError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| RetrievalError::Decode(e.to_string()))?;

    if let Some(error) = envelope.chart.error {
        return Err(if error.code.eq_ignore_ascii_case("Not Found") {
            RetrievalError::InvalidSymbol {
                symbol: symbol.to_string(),
                message: error.description,
            }
        } else {
            RetrievalError::Decode(format!("{}: {}", error.code, error.description))
        });
    }

    let empty = || RetrievalError::EmptyResult {
        symbol: symbol.to_string(),
        start,
        end,
    };

    let data = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(empty)?;

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = data
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let at = |values: &Vec<Option<f64>>, i: usize| values.get(i).copied().flatten();

    // 整段回應缺少調整後收盤價時全部保留原始價格，不混用
    if adjust && adjclose.is_empty() {
        warn!(symbol, "回應缺少調整後收盤價，改用未調整價格");
    }
    let adjust = adjust && !adjclose.is_empty();

    let mut records: Vec<PriceRecord> = Vec::with_capacity(data.timestamp.len());
    for (i, &ts) in data.timestamp.iter().enumerate() {
        let Some(close) = at(&quote.close, i) else {
            continue;
        };
        let Some(date) = unix_seconds_to_local_date(ts, data.meta.gmtoffset) else {
            warn!(timestamp = ts, "無法換算的時間戳，已略過");
            continue;
        };
        if date < start || date >= end {
            continue;
        }

        let factor = if adjust {
            match at(&adjclose, i) {
                Some(adj) if close != 0.0 => adj / close,
                _ => {
                    warn!(symbol, date = %date, "缺少調整後收盤價，已略過該交易日");
                    continue;
                }
            }
        } else {
            1.0
        };

        let record = PriceRecord {
            date,
            open: at(&quote.open, i).map(|v| v * factor),
            high: at(&quote.high, i).map(|v| v * factor),
            low: at(&quote.low, i).map(|v| v * factor),
            close: close * factor,
            volume: at(&quote.volume, i),
        };

        // 同一交易日重複出現時以較晚的資料為準
        match records.last().map(|last| last.date) {
            Some(previous) if previous == record.date => {
                records.pop();
                records.push(record);
            }
            Some(previous) if previous > record.date => {
                warn!(date = %record.date, "時間戳未遞增，已略過");
            }
            _ => records.push(record),
        }
    }

    if records.is_empty() {
        return Err(empty());
    }

    Ok(PriceSeries::new(records))
}

/// Yahoo Finance chart 端點供應商
pub struct YahooChartProvider {
    base_url: String,
    adjust_prices: bool,
    client: reqwest::Client,
}

impl YahooChartProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            adjust_prices: config.adjust_prices,
            client,
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn daily_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, RetrievalError> {
        if start >= end {
            return Err(RetrievalError::InvalidRange { start, end });
        }

        let url = self.chart_url(symbol);
        let period1 = date_to_unix_seconds(start).to_string();
        let period2 = date_to_unix_seconds(end).to_string();
        debug!(url = %url, period1 = %period1, period2 = %period2, "請求日線資料");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // 查無代號時供應商仍回傳 chart 錯誤結構
            if status == StatusCode::NOT_FOUND {
                if let Err(err @ RetrievalError::InvalidSymbol { .. }) =
                    parse_chart_response(symbol, start, end, &body, self.adjust_prices)
                {
                    return Err(err);
                }
            }
            return Err(RetrievalError::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let series = parse_chart_response(symbol, start, end, &body, self.adjust_prices)?;
        info!(symbol, rows = series.len(), "已取得 {} 筆日線資料", series.len());
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2020-01-02 與 2020-01-03 09:30 America/New_York
    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "SPY", "gmtoffset": -18000},
                "timestamp": [1577975400, 1578061800, 1578321000],
                "indicators": {
                    "quote": [{
                        "open": [323.54, 321.16, null],
                        "high": [324.89, 323.64, null],
                        "low": [322.53, 321.10, null],
                        "close": [324.87, 322.41, null],
                        "volume": [59151200, 77709700, null]
                    }],
                    "adjclose": [{"adjclose": [162.435, 161.205, null]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_unadjusted() {
        let series =
            parse_chart_response("SPY", date(2020, 1, 1), date(2020, 2, 1), BODY, false).unwrap();

        assert_eq!(series.len(), 2);
        let first = &series.records()[0];
        assert_eq!(first.date, date(2020, 1, 2));
        assert_eq!(first.close, 324.87);
        assert_eq!(first.volume, Some(59_151_200.0));
        assert_eq!(series.records()[1].date, date(2020, 1, 3));
    }

    #[test]
    fn test_parse_adjusted_halves_prices() {
        let series =
            parse_chart_response("SPY", date(2020, 1, 1), date(2020, 2, 1), BODY, true).unwrap();

        let first = &series.records()[0];
        assert!((first.close - 162.435).abs() < 1e-9);
        assert!((first.open.unwrap() - 323.54 * 0.5).abs() < 1e-9);
        // 成交量不調整
        assert_eq!(first.volume, Some(59_151_200.0));
    }

    #[test]
    fn test_row_without_adjclose_is_skipped_when_adjusting() {
        let body = BODY.replace("[162.435, 161.205, null]", "[162.435, null, null]");

        let adjusted =
            parse_chart_response("SPY", date(2020, 1, 1), date(2020, 2, 1), &body, true).unwrap();
        assert_eq!(adjusted.len(), 1);
        assert_eq!(adjusted.records()[0].date, date(2020, 1, 2));
        assert!((adjusted.records()[0].close - 162.435).abs() < 1e-9);

        let raw =
            parse_chart_response("SPY", date(2020, 1, 1), date(2020, 2, 1), &body, false).unwrap();
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_missing_adjclose_block_keeps_raw_prices() {
        let body = BODY.replace(
            r#""adjclose": [{"adjclose": [162.435, 161.205, null]}]"#,
            r#""adjclose": []"#,
        );
        assert!(!body.contains("162.435"));

        let series =
            parse_chart_response("SPY", date(2020, 1, 1), date(2020, 2, 1), &body, true).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.records()[0].close, 324.87);
    }

    #[test]
    fn test_end_date_is_exclusive() {
        let series =
            parse_chart_response("SPY", date(2020, 1, 1), date(2020, 1, 3), BODY, false).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_not_found_maps_to_invalid_symbol() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let result = parse_chart_response("NOPE", date(2020, 1, 1), date(2020, 2, 1), body, true);
        assert_matches!(result, Err(RetrievalError::InvalidSymbol { symbol, .. }) if symbol == "NOPE");
    }

    #[test]
    fn test_missing_timestamps_is_empty_result() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let result = parse_chart_response("SPY", date(2020, 1, 1), date(2020, 1, 2), body, true);
        assert_matches!(result, Err(RetrievalError::EmptyResult { .. }));
    }

    #[test]
    fn test_malformed_body() {
        let result = parse_chart_response("SPY", date(2020, 1, 1), date(2020, 2, 1), "<html>", true);
        assert_matches!(result, Err(RetrievalError::Decode(_)));
    }

    #[test]
    fn test_chart_url() {
        let provider = YahooChartProvider::new(&ProviderConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..ProviderConfig::default()
        })
        .unwrap();
        assert_eq!(
            provider.chart_url("SPY"),
            "http://localhost:8080/v8/finance/chart/SPY"
        );
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let provider = YahooChartProvider::new(&ProviderConfig::default()).unwrap();
        let result = provider
            .daily_prices("SPY", date(2021, 1, 1), date(2018, 1, 1))
            .await;
        assert_matches!(result, Err(RetrievalError::InvalidRange { .. }));
    }
}
