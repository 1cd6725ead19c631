use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float32Builder, Int32Builder, Int64Builder, RecordBatch, StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::data_model::{IndexedRow, RejectedRow, SourceRow};
use crate::error::Result;
use crate::pipeline::writers::base_writer::TableWriter;

fn row_fields() -> Vec<Field> {
    vec![
        Field::new("repo_name", DataType::Utf8, false),
        Field::new("file_ext", DataType::Utf8, false),
        Field::new("content", DataType::Utf8, false),
        Field::new("file_size", DataType::Int32, false),
        Field::new("max_line_length", DataType::Int32, false),
        Field::new("avg_line_length", DataType::Float32, false),
        Field::new("alphanum_fraction", DataType::Float32, false),
        Field::new("repo_lang", DataType::Utf8, false),
    ]
}

fn create_schema(keep_index: bool, with_reason: bool) -> SchemaRef {
    let mut fields = Vec::new();
    if keep_index {
        fields.push(Field::new("orig_index", DataType::Int64, false));
    }
    fields.extend(row_fields());
    if with_reason {
        fields.push(Field::new("reason", DataType::Utf8, false));
    }
    Arc::new(Schema::new(fields))
}

/// Column builders for the canonical row columns, shared by both writers.
struct RowColumnBuilders {
    repo_name: StringBuilder,
    file_ext: StringBuilder,
    content: StringBuilder,
    file_size: Int32Builder,
    max_line_length: Int32Builder,
    avg_line_length: Float32Builder,
    alphanum_fraction: Float32Builder,
    repo_lang: StringBuilder,
}

impl RowColumnBuilders {
    fn new() -> Self {
        RowColumnBuilders {
            repo_name: StringBuilder::new(),
            file_ext: StringBuilder::new(),
            content: StringBuilder::new(),
            file_size: Int32Builder::new(),
            max_line_length: Int32Builder::new(),
            avg_line_length: Float32Builder::new(),
            alphanum_fraction: Float32Builder::new(),
            repo_lang: StringBuilder::new(),
        }
    }

    fn append(&mut self, row: &SourceRow) {
        self.repo_name.append_value(&row.repo_name);
        self.file_ext.append_value(&row.file_ext);
        self.content.append_value(&row.content);
        self.file_size.append_value(row.file_size);
        self.max_line_length.append_value(row.max_line_length);
        self.avg_line_length.append_value(row.avg_line_length);
        self.alphanum_fraction.append_value(row.alphanum_fraction);
        self.repo_lang.append_value(&row.repo_lang);
    }

    fn finish(mut self) -> Vec<ArrayRef> {
        vec![
            Arc::new(self.repo_name.finish()) as ArrayRef,
            Arc::new(self.file_ext.finish()) as ArrayRef,
            Arc::new(self.content.finish()) as ArrayRef,
            Arc::new(self.file_size.finish()) as ArrayRef,
            Arc::new(self.max_line_length.finish()) as ArrayRef,
            Arc::new(self.avg_line_length.finish()) as ArrayRef,
            Arc::new(self.alphanum_fraction.finish()) as ArrayRef,
            Arc::new(self.repo_lang.finish()) as ArrayRef,
        ]
    }
}

/// Writes the kept row table to a Parquet shard in the canonical slim schema.
pub struct RowTableWriter {
    schema: SchemaRef,
    writer: Option<ArrowWriter<File>>,
    keep_index: bool,
}

impl RowTableWriter {
    pub fn new(path: &Path, keep_index: bool) -> Result<Self> {
        let schema = create_schema(keep_index, false);
        let file = File::create(path)?;
        let props = WriterProperties::builder().build();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        Ok(RowTableWriter {
            schema,
            writer: Some(writer),
            keep_index,
        })
    }
}

impl TableWriter<IndexedRow> for RowTableWriter {
    fn write_batch(&mut self, rows: &[IndexedRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut builders = RowColumnBuilders::new();
        let mut index_builder = Int64Builder::new();
        for indexed in rows {
            if self.keep_index {
                index_builder.append_value(indexed.orig_index as i64);
            }
            builders.append(&indexed.row);
        }

        let mut arrays: Vec<ArrayRef> = Vec::new();
        if self.keep_index {
            arrays.push(Arc::new(index_builder.finish()) as ArrayRef);
        }
        arrays.extend(builders.finish());

        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        if let Some(writer) = self.writer.as_mut() {
            writer.write(&batch)?;
        }
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.close()?;
        }
        Ok(())
    }
}

/// Writes the reject ledger, one extra column carrying the rejection reason.
pub struct RejectTableWriter {
    schema: SchemaRef,
    writer: Option<ArrowWriter<File>>,
    keep_index: bool,
}

impl RejectTableWriter {
    pub fn new(path: &Path, keep_index: bool) -> Result<Self> {
        let schema = create_schema(keep_index, true);
        let file = File::create(path)?;
        let props = WriterProperties::builder().build();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        Ok(RejectTableWriter {
            schema,
            writer: Some(writer),
            keep_index,
        })
    }
}

impl TableWriter<RejectedRow> for RejectTableWriter {
    fn write_batch(&mut self, rows: &[RejectedRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut builders = RowColumnBuilders::new();
        let mut index_builder = Int64Builder::new();
        let mut reason_builder = StringBuilder::new();
        for rejected in rows {
            if self.keep_index {
                index_builder.append_value(rejected.orig_index as i64);
            }
            builders.append(&rejected.row);
            reason_builder.append_value(&rejected.reason);
        }

        let mut arrays: Vec<ArrayRef> = Vec::new();
        if self.keep_index {
            arrays.push(Arc::new(index_builder.finish()) as ArrayRef);
        }
        arrays.extend(builders.finish());
        arrays.push(Arc::new(reason_builder.finish()) as ArrayRef);

        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        if let Some(writer) = self.writer.as_mut() {
            writer.write(&batch)?;
        }
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.close()?;
        }
        Ok(())
    }
}
