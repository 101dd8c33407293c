use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::foundation::error::SheetResult;

/// One vector source to place on the sheet.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceItem {
    /// Location of the source document.
    pub path: PathBuf,
    /// Name shown in [`LabelMode::FileName`](crate::LabelMode::FileName) cells.
    pub display_name: String,
}

impl SourceItem {
    /// Source whose display name is the file's base name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, display_name }
    }

    pub fn with_display_name(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
        }
    }
}

/// Recursively collect regular files under `root` whose extension equals `extension`
/// (case-insensitive, without the dot).
///
/// Results are sorted by path so grid positions do not depend on directory iteration order.
pub fn discover_sources(root: &Path, extension: &str) -> SheetResult<Vec<SourceItem>> {
    let wanted = extension.trim_start_matches('.').to_ascii_lowercase();
    let mut out = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            // Only an unreadable root is fatal; anything deeper is skipped.
            Err(e) if e.depth() > 0 => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("walk '{}'", root.display()))
                    .into());
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&wanted));
        if matches {
            out.push(SourceItem::from_path(entry.into_path()));
        }
    }

    tracing::debug!(root = %root.display(), found = out.len(), "discovered sources");
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
