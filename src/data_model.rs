use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One candidate source file with its precomputed statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub repo_name: String,
    pub file_ext: String,
    pub content: String,
    /// File size in bytes.
    pub file_size: i32,
    pub max_line_length: i32,
    pub avg_line_length: f32,
    pub alphanum_fraction: f32,
    /// Language label derived from the shard's parent directory.
    pub repo_lang: String,
}

/// A row tagged with its position in the input table. The tag is what restores
/// the input's relative order in the reject table after the funnel has pulled
/// rows out stage by stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRow {
    pub orig_index: usize,
    pub row: SourceRow,
}

/// A rejected row plus the reason tag of the first stage it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub orig_index: usize,
    pub row: SourceRow,
    pub reason: String,
}

/// The two tables produced by one funnel run over one shard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub kept: Vec<IndexedRow>,
    pub rejected: Vec<RejectedRow>,
}

impl FilterOutcome {
    /// Rejection counts grouped by reason tag.
    pub fn rejects_by_reason(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for rejected in &self.rejected {
            *counts.entry(rejected.reason.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
