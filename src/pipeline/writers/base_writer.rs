use crate::error::Result;

/// Trait for writing batches of rows to an output sink (e.g. a file).
pub trait TableWriter<Row> {
    /// Write a batch of rows to the sink.
    fn write_batch(&mut self, rows: &[Row]) -> Result<()>;

    /// Finalize and close the output writer.
    fn close(self) -> Result<()>;
}
