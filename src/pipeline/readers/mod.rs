pub mod base_reader;
pub mod parquet_reader;

pub use base_reader::TableReader;
pub use parquet_reader::{ParquetRowReader, RowTableInputConfig};
