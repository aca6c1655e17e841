pub mod processor;
pub mod validator;

pub use processor::{CsvError, CsvReader, CsvReaderConfig, CsvResult, CsvWriter};
