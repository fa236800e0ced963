use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip"];

/// Every file under `base_path` whose extension is one of `extensions`
/// (compared case-insensitively), in path order.
pub fn scan_archives(base_path: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(base_path)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .build();

    let mut archives = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable path under {}: {err}", base_path.display());
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if has_extension(path, extensions) {
            archives.push(path.to_path_buf());
        }
    }

    archives.sort();
    Ok(archives)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// `<parent>/<stem>_extracted` for `<parent>/<stem>.<ext>`.
pub fn extraction_dir(archive: &Path) -> PathBuf {
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "archive".to_string());
    let dir_name = format!("{stem}_extracted");

    match archive.parent() {
        Some(parent) => parent.join(dir_name),
        None => PathBuf::from(dir_name),
    }
}
