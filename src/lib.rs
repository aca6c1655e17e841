// 模組定義
pub mod config;
pub mod data_ingestion;
pub mod data_provider;
pub mod domain_types;
pub mod indicators;
pub mod presenter;
pub mod storage;
pub mod utils;
