use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PipelineError, Result};

/// Language directory labels that are never real languages.
pub const BAD_LANGS: &[&str] = &[".csv"];

/// Metadata for one Parquet shard discovered under the corpus root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardMeta {
    pub pq_path: PathBuf,
    /// Parent directory name of the shard.
    pub lang: String,
    /// On-disk size of the shard's language directory, in megabytes.
    pub lang_size_mb: f64,
    /// Number of entries in the shard's language directory.
    pub lang_file_cnt: usize,
}

/// One summary row of `filtered_meta.csv`.
#[derive(Debug, Serialize)]
pub struct CurationRecord {
    pub pq_path: String,
    pub lang: String,
    pub lang_size_mb: f64,
    pub lang_file_cnt: usize,
    pub filtered_pq_path: String,
}

/// Collects every Parquet shard under the corpus root, sorted for a stable
/// processing order. An empty result is an error: a corpus root with no
/// shards is a mis-pointed path, not an empty run.
pub fn glob_parquet_paths(root_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root_dir) {
        let entry = entry.map_err(|e| {
            PipelineError::Unexpected(format!("Failed to walk '{}': {}", root_dir.display(), e))
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().map_or(false, |ext| ext == "parquet")
        {
            paths.push(entry.into_path());
        }
    }
    if paths.is_empty() {
        return Err(PipelineError::PathError(format!(
            "no Parquet shards found under '{}'",
            root_dir.display()
        )));
    }
    paths.sort();
    Ok(paths)
}

/// Total size in bytes of the regular files under a directory, symlinks
/// skipped.
pub fn dir_size_bytes(path: &Path) -> Result<u64> {
    let mut total = 0u64;
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| {
            PipelineError::Unexpected(format!("Failed to walk '{}': {}", path.display(), e))
        })?;
        if entry.file_type().is_file() && !entry.path_is_symlink() {
            let metadata = entry.metadata().map_err(|e| {
                PipelineError::Unexpected(format!(
                    "Failed to stat '{}': {}",
                    entry.path().display(),
                    e
                ))
            })?;
            total += metadata.len();
        }
    }
    Ok(total)
}

/// Scans the corpus root and computes per-language size/count metadata, one
/// entry per shard.
pub fn scan_root(root_dir: &Path) -> Result<Vec<ShardMeta>> {
    let paths = glob_parquet_paths(root_dir)?;

    // One size/count probe per language directory.
    let mut lang_stats: BTreeMap<PathBuf, (f64, usize)> = BTreeMap::new();
    let mut metas = Vec::with_capacity(paths.len());
    for pq_path in paths {
        let lang_dir = pq_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root_dir.to_path_buf());
        let lang = lang_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !lang_stats.contains_key(&lang_dir) {
            let size_mb = dir_size_bytes(&lang_dir)? as f64 / (1024.0 * 1024.0);
            let file_cnt = fs::read_dir(&lang_dir)?.count();
            debug!(lang = %lang, size_mb, file_cnt, "Scanned language directory");
            lang_stats.insert(lang_dir.clone(), (size_mb, file_cnt));
        }
        let (lang_size_mb, lang_file_cnt) = lang_stats[&lang_dir];

        metas.push(ShardMeta {
            pq_path,
            lang,
            lang_size_mb,
            lang_file_cnt,
        });
    }
    Ok(metas)
}

/// Applies the language-selection precedence: `top_k` beats `mb_size_thresh`
/// beats `pq_file_cnt_thresh`. Languages named in `bad_langs` are dropped
/// unconditionally.
pub fn filter_languages(
    metas: Vec<ShardMeta>,
    top_k: Option<usize>,
    mb_size_thresh: Option<f64>,
    pq_file_cnt_thresh: Option<usize>,
    bad_langs: &[&str],
) -> Vec<ShardMeta> {
    let selected: Vec<ShardMeta> = if let Some(k) = top_k {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for meta in &metas {
            *totals.entry(meta.lang.clone()).or_insert(0.0) += meta.lang_size_mb;
        }
        let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let keep: HashSet<String> = ranked.into_iter().take(k).map(|(lang, _)| lang).collect();
        metas
            .into_iter()
            .filter(|meta| keep.contains(&meta.lang))
            .collect()
    } else if let Some(thresh) = mb_size_thresh {
        metas
            .into_iter()
            .filter(|meta| meta.lang_size_mb > thresh)
            .collect()
    } else if let Some(thresh) = pq_file_cnt_thresh {
        metas
            .into_iter()
            .filter(|meta| meta.lang_file_cnt >= thresh)
            .collect()
    } else {
        metas
    };

    selected
        .into_iter()
        .filter(|meta| !bad_langs.contains(&meta.lang.as_str()))
        .collect()
}

/// Writes the per-shard curation summary.
pub fn write_meta_csv(path: &Path, records: &[CurationRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
