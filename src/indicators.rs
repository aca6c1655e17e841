//! 技術指標計算
//!
//! 指標引擎是純函數：相同輸入必定得到相同輸出，不做任何 I/O。
//! 所有滾動指標都透過同一個通用的滑動窗口聚合函數計算。

pub mod engine;
pub mod error;
pub mod rolling;

pub use engine::{
    bollinger_bands, compute_indicators, moving_average_column, validate_input, BollingerParams,
    IndicatorEngine, DEFAULT_MOVING_AVERAGE_WINDOWS,
};
pub use error::{IndicatorError, IndicatorResult};
pub use rolling::{mean, population_std_dev, rolling, rolling_mean, rolling_population_std_dev};
