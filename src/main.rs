use std::path::PathBuf;

use clap::Parser;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use stack_curator::catalog::{self, CurationRecord, BAD_LANGS};
use stack_curator::config::{ConfigStyle, FilterConfig};
use stack_curator::curation::filter_parquet_file;
use stack_curator::error::Result;

/// Curates per-language Parquet shards of a source-code corpus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the per-language Parquet shards.
    root_dir: PathBuf,

    /// Output directory for the curated shards.
    output_dir: PathBuf,

    /// Threshold preset to filter with.
    #[arg(long, value_enum, default_value = "permissive")]
    config_style: ConfigStyle,

    /// Keep only the top K languages by on-disk size.
    /// Takes precedence over --mb-size-thresh.
    #[arg(long)]
    top_k: Option<usize>,

    /// Minimum language size in megabytes.
    /// Takes precedence over --pq-file-cnt-thresh.
    #[arg(long)]
    mb_size_thresh: Option<f64>,

    /// Minimum number of Parquet shards per language.
    #[arg(long)]
    pq_file_cnt_thresh: Option<usize>,

    /// Shards are already in the canonical slim schema from a prior run.
    #[arg(long)]
    is_slim: bool,

    /// Carry the original row index into the output tables.
    #[arg(long)]
    keep_index: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    let mut config = FilterConfig::from_style(args.config_style);
    config.is_slim = args.is_slim;
    config.keep_index = args.keep_index;
    config.validate()?;

    info!(root = %args.root_dir.display(), style = ?args.config_style, "Scanning corpus root");
    let metas = catalog::scan_root(&args.root_dir)?;
    let metas = catalog::filter_languages(
        metas,
        args.top_k,
        args.mb_size_thresh,
        args.pq_file_cnt_thresh,
        BAD_LANGS,
    );
    info!(shards = metas.len(), "Curating shards");

    std::fs::create_dir_all(&args.output_dir)?;

    let bar = ProgressBar::new(metas.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    // Shards are disjoint in storage and own disjoint output paths, so they
    // fan out freely; a shard that fails is logged and skipped so the rest of
    // the run proceeds.
    let records: Vec<CurationRecord> = metas
        .par_iter()
        .progress_with(bar)
        .filter_map(
            |meta| match filter_parquet_file(&meta.pq_path, &args.output_dir, &config) {
                Ok(dest_path) => Some(CurationRecord {
                    pq_path: meta.pq_path.display().to_string(),
                    lang: meta.lang.clone(),
                    lang_size_mb: meta.lang_size_mb,
                    lang_file_cnt: meta.lang_file_cnt,
                    filtered_pq_path: dest_path.display().to_string(),
                }),
                Err(e) => {
                    error!(shard = %meta.pq_path.display(), error = %e, "Skipping shard after processing failure");
                    None
                }
            },
        )
        .collect();

    let meta_csv = args.output_dir.join("filtered_meta.csv");
    catalog::write_meta_csv(&meta_csv, &records)?;
    info!(curated = records.len(), meta = %meta_csv.display(), "Curation complete");

    Ok(())
}
