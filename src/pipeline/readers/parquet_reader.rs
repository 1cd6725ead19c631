use std::fs::File;
use std::path::PathBuf;

use arrow::array::{Array, Float32Array, Int32Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::data_model::SourceRow;
use crate::error::{PipelineError, Result};
use crate::pipeline::readers::base_reader::TableReader;

/// Column names of the raw source schema, in canonical column order.
const SOURCE_COLUMNS: [&str; 8] = [
    "max_stars_repo_name",
    "ext",
    "content",
    "size",
    "max_line_length",
    "avg_line_length",
    "alphanum_fraction",
    "lang",
];

/// Canonical column names, used by slim shards and by this crate's writers.
const SLIM_COLUMNS: [&str; 8] = [
    "repo_name",
    "file_ext",
    "content",
    "file_size",
    "max_line_length",
    "avg_line_length",
    "alphanum_fraction",
    "repo_lang",
];

#[derive(Debug, Clone)]
pub struct RowTableInputConfig {
    pub path: PathBuf,
    /// Shard is already in the canonical slim schema.
    pub slim: bool,
    /// Optional Arrow batch size for reading.
    pub batch_size: Option<usize>,
}

/// Reads SourceRows from a Parquet shard.
///
/// Non-slim shards carry the raw source schema; their columns are renamed to
/// the canonical names and downcast to 32-bit numeric types on the way in.
/// Slim shards are read as-is.
#[derive(Debug)]
pub struct ParquetRowReader {
    config: RowTableInputConfig,
}

impl ParquetRowReader {
    pub fn new(config: RowTableInputConfig) -> Self {
        ParquetRowReader { config }
    }

    fn schema_error(&self, message: String) -> PipelineError {
        PipelineError::SchemaError {
            path: self.config.path.display().to_string(),
            message,
        }
    }

    fn utf8_column(&self, batch: &RecordBatch, idx: usize, name: &str) -> Result<StringArray> {
        let array = cast(batch.column(idx), &DataType::Utf8)?;
        if array.null_count() > 0 {
            return Err(self.schema_error(format!("required column '{}' contains nulls", name)));
        }
        array
            .as_any()
            .downcast_ref::<StringArray>()
            .cloned()
            .ok_or_else(|| {
                PipelineError::Unexpected(format!(
                    "Column '{}' is not a valid Utf8 StringArray",
                    name
                ))
            })
    }

    fn int32_column(&self, batch: &RecordBatch, idx: usize, name: &str) -> Result<Int32Array> {
        let array = cast(batch.column(idx), &DataType::Int32)?;
        if array.null_count() > 0 {
            return Err(self.schema_error(format!(
                "required column '{}' contains nulls or values outside 32-bit range",
                name
            )));
        }
        array
            .as_any()
            .downcast_ref::<Int32Array>()
            .cloned()
            .ok_or_else(|| {
                PipelineError::Unexpected(format!("Column '{}' is not a valid Int32 array", name))
            })
    }

    fn float32_column(&self, batch: &RecordBatch, idx: usize, name: &str) -> Result<Float32Array> {
        let array = cast(batch.column(idx), &DataType::Float32)?;
        if array.null_count() > 0 {
            return Err(self.schema_error(format!("required column '{}' contains nulls", name)));
        }
        array
            .as_any()
            .downcast_ref::<Float32Array>()
            .cloned()
            .ok_or_else(|| {
                PipelineError::Unexpected(format!("Column '{}' is not a valid Float32 array", name))
            })
    }

    fn append_batch(
        &self,
        batch: &RecordBatch,
        indices: &[usize; 8],
        names: &[&str; 8],
        rows: &mut Vec<SourceRow>,
    ) -> Result<()> {
        let repo_name = self.utf8_column(batch, indices[0], names[0])?;
        let file_ext = self.utf8_column(batch, indices[1], names[1])?;
        let content = self.utf8_column(batch, indices[2], names[2])?;
        let file_size = self.int32_column(batch, indices[3], names[3])?;
        let max_line_length = self.int32_column(batch, indices[4], names[4])?;
        let avg_line_length = self.float32_column(batch, indices[5], names[5])?;
        let alphanum_fraction = self.float32_column(batch, indices[6], names[6])?;
        let repo_lang = self.utf8_column(batch, indices[7], names[7])?;

        rows.reserve(batch.num_rows());
        for i in 0..batch.num_rows() {
            rows.push(SourceRow {
                repo_name: repo_name.value(i).to_string(),
                file_ext: file_ext.value(i).to_string(),
                content: content.value(i).to_string(),
                file_size: file_size.value(i),
                max_line_length: max_line_length.value(i),
                avg_line_length: avg_line_length.value(i),
                alphanum_fraction: alphanum_fraction.value(i),
                repo_lang: repo_lang.value(i).to_string(),
            });
        }
        Ok(())
    }
}

impl TableReader for ParquetRowReader {
    /// Reads the whole shard into memory. Missing columns fail fast before any
    /// row is produced.
    fn read_rows(&self) -> Result<Vec<SourceRow>> {
        let file = File::open(&self.config.path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let builder = if let Some(batch_size) = self.config.batch_size {
            builder.with_batch_size(batch_size)
        } else {
            builder
        };
        let reader = builder.build()?;
        let schema = reader.schema();

        let names: &[&str; 8] = if self.config.slim {
            &SLIM_COLUMNS
        } else {
            &SOURCE_COLUMNS
        };
        let mut indices = [0usize; 8];
        for (slot, name) in indices.iter_mut().zip(names.iter()) {
            *slot = schema
                .index_of(name)
                .map_err(|_| self.schema_error(format!("required column '{}' not found", name)))?;
        }

        let mut rows = Vec::new();
        for batch_result in reader {
            let batch = batch_result?;
            self.append_batch(&batch, &indices, names, &mut rows)?;
        }
        Ok(rows)
    }
}
