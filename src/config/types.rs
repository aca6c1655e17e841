use crate::config::validation::{ValidationError, ValidationUtils, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 應用程序配置結構
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub log: LogConfig,
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
    pub fetch: FetchConfig,
    pub indicators: IndicatorConfig,
    pub display: DisplayConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.log.validate()?;
        self.storage.validate()?;
        self.provider.validate()?;
        self.fetch.validate()?;
        self.indicators.validate()?;
        self.display.validate()?;

        Ok(())
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase().as_str(),
            &["trace", "debug", "info", "warn", "error"],
            "log.level",
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase().as_str(),
            &["pretty", "compact"],
            "log.format",
        )?;

        Ok(())
    }
}

/// 快照存放配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 快照目錄
    pub data_dir: PathBuf,
    /// 檔名前綴，例如 `spy_data`
    pub file_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/raw"),
            file_prefix: "spy_data".to_string(),
        }
    }
}

impl Validator for StorageConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.data_dir.to_string_lossy(), "storage.data_dir")?;
        ValidationUtils::not_empty(&self.file_prefix, "storage.file_prefix")?;

        if self.file_prefix.contains(['/', '\\']) {
            return Err(ValidationError::InvalidValue(format!(
                "storage.file_prefix 不可包含路徑分隔符: {}",
                self.file_prefix
            )));
        }

        Ok(())
    }
}

/// 行情供應商配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// 是否以調整後收盤價修正 OHLC
    pub adjust_prices: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; index_analysis)".to_string(),
            adjust_prices: true,
        }
    }
}

impl Validator for ProviderConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.base_url, "provider.base_url")?;
        ValidationUtils::not_empty(&self.user_agent, "provider.user_agent")?;
        ValidationUtils::in_range(self.timeout_secs, 1, 300, "provider.timeout_secs")?;

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidValue(format!(
                "provider.base_url 必須為 http(s) 位址: {}",
                self.base_url
            )));
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// 獲取請求超時持續時間
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 下載配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub symbol: String,
    pub start: NaiveDate,
    /// 結束日期（不含）
    pub end: NaiveDate,
    /// 長週期移動平均窗口（約三年的交易日）
    pub long_window: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            symbol: "SPY".to_string(),
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            long_window: 756,
        }
    }
}

impl Validator for FetchConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.symbol, "fetch.symbol")?;
        ValidationUtils::ordered(&self.start, &self.end)?;
        ValidationUtils::in_range(self.long_window, 1, 10_000, "fetch.long_window")?;

        Ok(())
    }
}

/// 指標配置
///
/// 移動平均窗口與布林通道窗口互不相關。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub moving_average_windows: Vec<usize>,
    pub bollinger_window: usize,
    pub bollinger_num_std: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            moving_average_windows: vec![50, 200, 300, 400, 500, 600, 700],
            bollinger_window: 20,
            bollinger_num_std: 2.0,
        }
    }
}

impl Validator for IndicatorConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for window in &self.moving_average_windows {
            ValidationUtils::in_range(*window, 1, 10_000, "indicators.moving_average_windows")?;
        }
        ValidationUtils::in_range(self.bollinger_window, 1, 10_000, "indicators.bollinger_window")?;
        ValidationUtils::in_range(
            self.bollinger_num_std,
            0.0,
            10.0,
            "indicators.bollinger_num_std",
        )?;

        Ok(())
    }
}

/// 顯示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 圖表標題使用的指數名稱
    pub index_name: String,
    /// 預設語系（english / japanese）
    pub locale: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            index_name: "S&P 500".to_string(),
            locale: "english".to_string(),
        }
    }
}

impl Validator for DisplayConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.index_name, "display.index_name")?;
        // 未知語系會退回英文，因此此處只檢查非空
        ValidationUtils::not_empty(&self.locale, "display.locale")?;

        Ok(())
    }
}
