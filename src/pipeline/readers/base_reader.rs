use crate::data_model::SourceRow;
use crate::error::Result;

/// Trait for loading a whole row table from an input source.
pub trait TableReader {
    fn read_rows(&self) -> Result<Vec<SourceRow>>;
}
