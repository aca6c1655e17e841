pub mod csv_io;

pub use csv_io::{CsvError, CsvReader, CsvReaderConfig, CsvResult, CsvWriter};
