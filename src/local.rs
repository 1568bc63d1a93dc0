//! Local staging directory: the handoff buffer between the two stages.
//!
//! The fetch stage writes attachments here; the sync stage reads them
//! back. The filename is the identity key (case-sensitive,
//! directory-scoped), so writes are strictly first-writer-wins.

use std::path::{Path, PathBuf};

use crate::error::{DropError, Result};

/// Outcome of a first-writer-wins write attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// The file did not exist and was written.
    Saved(PathBuf),
    /// A same-named file already existed; nothing was touched.
    SkippedExisting,
}

/// Create the staging directory (and parents) if absent.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| DropError::io(dir, e))
}

/// Write `data` to `dir/filename` unless the file already exists.
///
/// No content comparison, no overwrite, no rename-on-collision: an
/// existing file always wins, which is what makes re-runs idempotent.
pub fn write_new(dir: &Path, filename: &str, data: &[u8]) -> Result<WriteOutcome> {
    let path = dir.join(filename);
    if path.exists() {
        return Ok(WriteOutcome::SkippedExisting);
    }

    std::fs::write(&path, data).map_err(|e| DropError::io(&path, e))?;
    Ok(WriteOutcome::Saved(path))
}

/// List `.pdf` files in `dir` (case-insensitive extension), sorted by
/// file name for deterministic processing order. Regular files only.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| DropError::io(dir, e))?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DropError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            pdfs.push(path);
        }
    }

    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// Sanitize an attachment filename for filesystem use.
///
/// Attachment names are untrusted input. Path separators and other
/// hostile characters are replaced with `_`, and the result is truncated
/// to `150` characters.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(150)
        .collect();

    // A name of only dots would resolve to the directory itself
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "attachment.pdf".to_string()
    } else {
        sanitized
    }
}
