use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::FilterConfig;
use crate::error::Result;
use crate::executor::FilterFunnel;
use crate::pipeline::filters::{build_stages, PythonSyntaxValidator};
use crate::pipeline::readers::{ParquetRowReader, RowTableInputConfig, TableReader};
use crate::pipeline::writers::{RejectTableWriter, RowTableWriter, TableWriter};
use crate::utils::paths::{derive_dest_path, rejects_path};

/// Filters one Parquet shard and writes the kept table plus its reject ledger.
///
/// The shard is read fully into memory before any output file is created, so a
/// shard that fails to load leaves nothing behind. Returns the destination
/// path of the kept table; the reject ledger lands at its `_rejects` sibling.
pub fn filter_parquet_file(
    pq_path: &Path,
    output_dir: &Path,
    config: &FilterConfig,
) -> Result<PathBuf> {
    let dest_path = derive_dest_path(pq_path, output_dir)?;
    let reject_path = rejects_path(&dest_path);

    let reader = ParquetRowReader::new(RowTableInputConfig {
        path: pq_path.to_path_buf(),
        slim: config.is_slim,
        batch_size: None,
    });
    let rows = reader.read_rows()?;
    let total = rows.len();

    let stages = build_stages(config, Arc::new(PythonSyntaxValidator));
    let outcome = FilterFunnel::new(stages).run(rows);

    for (reason, count) in outcome.rejects_by_reason() {
        debug!(reason, count, "Stage rejections");
    }
    info!(
        shard = %pq_path.display(),
        total,
        kept = outcome.kept.len(),
        rejected = outcome.rejected.len(),
        "Filtered shard"
    );

    if let Some(dest_dir) = dest_path.parent() {
        fs::create_dir_all(dest_dir)?;
    }

    let mut writer = RowTableWriter::new(&dest_path, config.keep_index)?;
    writer.write_batch(&outcome.kept)?;
    writer.close()?;

    let mut reject_writer = RejectTableWriter::new(&reject_path, config.keep_index)?;
    reject_writer.write_batch(&outcome.rejected)?;
    reject_writer.close()?;

    Ok(dest_path)
}
