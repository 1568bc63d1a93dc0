//! Cloud Sync stage: reconcile the staging directory against a Drive folder.

use std::path::Path;

use crate::drive::CloudStore;
use crate::error::{DropError, Result};
use crate::local;
use crate::model::remote::RemoteFolder;
use crate::model::report::{SyncReport, UploadFailure};

/// Find the named folder, or create it when absent.
///
/// Returns the folder plus whether it was created this run.
pub fn resolve_folder(store: &dyn CloudStore, name: &str) -> Result<(RemoteFolder, bool)> {
    if let Some(folder) = store.find_folder(name)? {
        tracing::info!(name, id = %folder.id, "Found existing folder");
        return Ok((folder, false));
    }

    let folder = store.create_folder(name)?;
    tracing::info!(name, id = %folder.id, "Created folder");
    Ok((folder, true))
}

/// Upload every staged PDF not already present (by name) in the folder.
///
/// Folder resolution failure is fatal — nothing can proceed without a
/// parent. Per-file failures are not: each is captured in the report and
/// the loop continues with the next file. The progress callback receives
/// `(current, total)` in files.
pub fn sync_directory(
    store: &dyn CloudStore,
    dir: &Path,
    folder_name: &str,
    progress: Option<&dyn Fn(usize, usize)>,
) -> Result<SyncReport> {
    let (folder, created) = resolve_folder(store, folder_name)?;

    let files = local::list_pdfs(dir)?;
    let total = files.len();

    let mut report = SyncReport {
        folder_id: folder.id.clone(),
        folder_created: created,
        ..Default::default()
    };

    for (i, path) in files.iter().enumerate() {
        if let Some(cb) = progress {
            cb(i, total);
        }

        // list_pdfs only returns regular files, so a name is always present
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        match sync_one(store, path, name, &folder.id) {
            Ok(Some(bytes)) => {
                report.uploaded += 1;
                report.bytes_uploaded += bytes;
            }
            Ok(None) => {
                tracing::debug!(name, "Already in Drive, skipping");
                report.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "Sync failed for file, continuing");
                report.failed.push(UploadFailure {
                    filename: name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if let Some(cb) = progress {
        cb(total, total);
    }

    Ok(report)
}

/// Existence-check-then-upload for one file.
///
/// Returns `Some(bytes)` when uploaded, `None` when skipped as a
/// duplicate. The check happens immediately before the upload; a
/// concurrent writer in the remote store can still race it.
fn sync_one(store: &dyn CloudStore, path: &Path, name: &str, folder_id: &str) -> Result<Option<u64>> {
    if store.file_exists(name, folder_id)? {
        return Ok(None);
    }

    let data = std::fs::read(path).map_err(|e| DropError::io(path, e))?;
    let size = data.len() as u64;
    let file = store.upload_pdf(name, folder_id, &data)?;
    tracing::debug!(name, id = %file.id, "Uploaded");
    Ok(Some(size))
}
