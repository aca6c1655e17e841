use super::types::ApplicationConfig;
use super::validation::Validator;
use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 選擇環境的環境變數
pub const ENV_VAR: &str = "INDEX_ANALYSIS_ENV";

/// 環境變數覆寫的前綴，例如 `INDEX_ANALYSIS__FETCH__SYMBOL`
pub const ENV_PREFIX: &str = "INDEX_ANALYSIS";

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        Self::from_name(&env::var(ENV_VAR).unwrap_or_else(|_| "development".into()))
    }

    /// 由名稱解析環境，無法辨識時視為開發環境
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置目錄，可由 `CONFIG_DIR` 指定
    pub fn config_dir() -> PathBuf {
        PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into()))
    }

    /// 載入指定環境的配置
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        Self::load_from_dir(env, Self::config_dir())
    }

    /// 從指定目錄載入配置
    ///
    /// 優先順序由低到高：內建預設值、`<dir>/<env>.toml`（可不存在）、環境變數。
    pub fn load_from_dir<P: AsRef<Path>>(env: Environment, dir: P) -> Result<Config, ConfigError> {
        let config_path = dir.as_ref().join(env.as_filename());
        debug!(path = %config_path.display(), "載入配置文件");

        Config::builder()
            // 內建預設值
            .add_source(Config::try_from(&ApplicationConfig::default())?)
            // 加載環境特定配置
            .add_source(File::from(config_path).required(false))
            // 從環境變數加載配置（優先級高於文件配置）
            .add_source(
                ConfigEnvironment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("indicators.moving_average_windows"),
            )
            .build()
    }
}

/// ApplicationConfig 加載方法實現
impl ApplicationConfig {
    /// 從環境變數指定的環境加載配置
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        debug!("從環境加載配置: {:?}", env);
        Self::load(env)
    }

    /// 從指定環境加載配置
    pub fn load(env: Environment) -> Result<Self, ConfigError> {
        Self::from_config(ConfigLoader::load(env)?)
    }

    /// 反序列化並驗證，驗證失敗時中止
    pub fn from_config(source: Config) -> Result<Self, ConfigError> {
        let app_config: ApplicationConfig = source.try_deserialize()?;
        app_config
            .validate()
            .map_err(|err| ConfigError::Message(format!("配置驗證失敗: {}", err)))?;
        debug!("配置驗證通過");
        Ok(app_config)
    }
}
