//! Per-stage result structs.
//!
//! Each stage returns its counters instead of mutating shared state, so a
//! stage is a pure function of its inputs plus filesystem/network effects.

/// Outcome of the mailbox-scan stage.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FetchReport {
    /// Messages matched by the search query (including ones without PDFs).
    pub matched: usize,
    /// PDF attachments written to the staging directory.
    pub saved: usize,
    /// PDF attachments skipped because a same-named file already existed.
    pub skipped: usize,
    /// Total decoded bytes written.
    pub bytes_saved: u64,
}

/// Outcome of the cloud-sync stage.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SyncReport {
    /// ID of the remote folder everything was reconciled against.
    pub folder_id: String,
    /// `true` if the folder was created this run, `false` if found.
    pub folder_created: bool,
    /// Files uploaded because no same-named remote entry existed.
    pub uploaded: usize,
    /// Files skipped because a same-named remote entry existed.
    pub skipped: usize,
    /// Total bytes uploaded.
    pub bytes_uploaded: u64,
    /// Files whose existence check or upload failed. Failures do not
    /// abort the batch; later files are still processed.
    pub failed: Vec<UploadFailure>,
}

/// A single per-file sync failure.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UploadFailure {
    /// Local file name that failed.
    pub filename: String,
    /// Human-readable failure reason.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_report_json_shape() {
        let report = FetchReport {
            matched: 3,
            saved: 1,
            skipped: 1,
            bytes_saved: 1024,
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["matched"], 3);
        assert_eq!(json["saved"], 1);
        assert_eq!(json["skipped"], 1);
        assert_eq!(json["bytes_saved"], 1024);
    }

    #[test]
    fn test_sync_report_default_is_empty() {
        let report = SyncReport::default();
        assert_eq!(report.uploaded, 0);
        assert_eq!(report.skipped, 0);
        assert!(report.failed.is_empty());
        assert!(!report.folder_created);
    }
}
