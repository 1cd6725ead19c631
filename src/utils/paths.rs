use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Derives the destination path for a curated shard.
///
/// An input laid out as `<root>/<origin_dir>/<lang>/<file>` maps to
/// `<root>/<output_name>/<lang>/<file>`, where `<output_name>` is the final
/// component of the supplied output directory.
pub fn derive_dest_path(pq_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = pq_path.file_name().ok_or_else(|| layout_error(pq_path))?;
    let lang_dir = pq_path.parent().ok_or_else(|| layout_error(pq_path))?;
    let lang = lang_dir.file_name().ok_or_else(|| layout_error(pq_path))?;
    let origin_dir = lang_dir.parent().ok_or_else(|| layout_error(pq_path))?;
    if origin_dir.file_name().is_none() {
        return Err(layout_error(pq_path));
    }
    let root = origin_dir.parent().unwrap_or_else(|| Path::new(""));

    let output_name = output_dir.file_name().ok_or_else(|| {
        PipelineError::PathError(format!(
            "output directory '{}' has no final component",
            output_dir.display()
        ))
    })?;

    Ok(root.join(output_name).join(lang).join(file_name))
}

fn layout_error(pq_path: &Path) -> PipelineError {
    PipelineError::PathError(format!(
        "shard path '{}' does not match the <root>/<origin>/<lang>/<file> layout",
        pq_path.display()
    ))
}

/// Sibling path of a curated shard holding its reject ledger:
/// `part.parquet` becomes `part_rejects.parquet`.
pub fn rejects_path(dest_path: &Path) -> PathBuf {
    match (dest_path.file_stem(), dest_path.extension()) {
        (Some(stem), Some(ext)) => {
            let mut name = stem.to_os_string();
            name.push("_rejects.");
            name.push(ext);
            dest_path.with_file_name(name)
        }
        _ => {
            let mut name = dest_path.as_os_str().to_os_string();
            name.push("_rejects");
            PathBuf::from(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dest_path_swaps_origin_dir_for_output_name() {
        let dest = derive_dest_path(
            Path::new("/data/the-stack/python/part-000.parquet"),
            Path::new("/data/curated"),
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("/data/curated/python/part-000.parquet"));
    }

    #[test]
    fn dest_path_keeps_relative_roots() {
        let dest = derive_dest_path(
            Path::new("raw/rust/shard.parquet"),
            Path::new("out"),
        )
        .unwrap();
        assert_eq!(dest, PathBuf::from("out/rust/shard.parquet"));
    }

    #[test]
    fn dest_path_rejects_too_shallow_layout() {
        let result = derive_dest_path(Path::new("python/part.parquet"), Path::new("out"));
        assert!(matches!(result, Err(PipelineError::PathError(_))));
    }

    #[test]
    fn rejects_path_inserts_suffix_before_extension() {
        assert_eq!(
            rejects_path(Path::new("/out/python/part-000.parquet")),
            PathBuf::from("/out/python/part-000_rejects.parquet")
        );
    }

    #[test]
    fn rejects_path_appends_when_no_extension() {
        assert_eq!(
            rejects_path(Path::new("/out/python/part")),
            PathBuf::from("/out/python/part_rejects")
        );
    }
}
