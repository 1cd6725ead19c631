pub mod base_writer;
pub mod parquet_writer;

pub use base_writer::TableWriter;
pub use parquet_writer::{RejectTableWriter, RowTableWriter};
