pub mod columns;
pub mod data_point;
pub mod series;

pub use columns::ColumnName;
pub use data_point::PriceRecord;
pub use series::{IndicatorColumn, IndicatorSeries, PriceSeries, SeriesError};
