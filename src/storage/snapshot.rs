//! 平面檔快照存放
//!
//! 每次下載以 `(開始日期, 結束日期)` 為鍵寫出兩個 CSV：
//! 原始資料 `<prefix>_<start>_<end>.csv` 與附加長週期均線的
//! `<prefix>_with_3Y_MA_<start>_<end>.csv`。同鍵的既有檔案直接覆寫。

use crate::config::StorageConfig;
use crate::data_ingestion::{CsvReader, CsvResult, CsvWriter};
use crate::domain_types::{ColumnName, IndicatorSeries, PriceSeries};
use crate::utils::format_date;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// 快照種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// 供應商原始日線
    Raw,
    /// 附加長週期移動平均
    LongMovingAverage,
}

impl SnapshotKind {
    fn infix(&self) -> Option<String> {
        match self {
            SnapshotKind::Raw => None,
            SnapshotKind::LongMovingAverage => {
                Some(format!("with_{}", ColumnName::LONG_MOVING_AVERAGE))
            }
        }
    }
}

/// 快照存放位置與命名規則
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
    file_prefix: String,
    reader: CsvReader,
    writer: CsvWriter,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_prefix: file_prefix.into(),
            reader: CsvReader::default(),
            writer: CsvWriter::default(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.data_dir.clone(), config.file_prefix.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 建立資料目錄（含上層目錄）
    pub fn ensure_dir(&self) -> CsvResult<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    pub fn path(&self, kind: SnapshotKind, start: NaiveDate, end: NaiveDate) -> PathBuf {
        let name = match kind.infix() {
            Some(infix) => format!(
                "{}_{}_{}_{}.csv",
                self.file_prefix,
                infix,
                format_date(start),
                format_date(end)
            ),
            None => format!(
                "{}_{}_{}.csv",
                self.file_prefix,
                format_date(start),
                format_date(end)
            ),
        };
        self.data_dir.join(name)
    }

    pub fn raw_path(&self, start: NaiveDate, end: NaiveDate) -> PathBuf {
        self.path(SnapshotKind::Raw, start, end)
    }

    pub fn enriched_path(&self, start: NaiveDate, end: NaiveDate) -> PathBuf {
        self.path(SnapshotKind::LongMovingAverage, start, end)
    }

    /// 寫出指標序列，回傳檔案路徑
    pub fn save(
        &self,
        kind: SnapshotKind,
        start: NaiveDate,
        end: NaiveDate,
        series: &IndicatorSeries,
    ) -> CsvResult<PathBuf> {
        self.ensure_dir()?;
        let path = self.path(kind, start, end);
        self.writer.write_file(&path, series)?;
        info!(path = %path.display(), rows = series.len(), "資料已保存");
        Ok(path)
    }

    /// 寫出原始價格序列，回傳檔案路徑
    pub fn save_prices(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        prices: &PriceSeries,
    ) -> CsvResult<PathBuf> {
        self.ensure_dir()?;
        let path = self.raw_path(start, end);
        self.writer.write_prices_file(&path, prices)?;
        info!(path = %path.display(), rows = prices.len(), "資料已保存");
        Ok(path)
    }

    pub fn load(
        &self,
        kind: SnapshotKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CsvResult<IndicatorSeries> {
        self.reader.read_file(self.path(kind, start, end))
    }
}

impl From<&StorageConfig> for SnapshotStore {
    fn from(config: &StorageConfig) -> Self {
        Self::from_config(config)
    }
}
