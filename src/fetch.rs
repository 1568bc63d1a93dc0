//! Mailbox Scanner stage: search, fetch, extract, stage locally.

use std::path::Path;

use crate::error::Result;
use crate::local::{self, WriteOutcome};
use crate::mail::criteria::SearchCriteria;
use crate::mail::{extract, MailSource};
use crate::model::report::FetchReport;

/// Scan the mail store and stage matching PDF attachments under `dir`.
///
/// One search, then one fully serialized fetch-and-extract pass over the
/// matched ids. A failed fetch of a single message is logged and skipped;
/// it never aborts the scan. The progress callback receives
/// `(current, total)` in messages.
pub fn fetch_attachments(
    mail: &mut dyn MailSource,
    criteria: &SearchCriteria,
    dir: &Path,
    progress: Option<&dyn Fn(usize, usize)>,
) -> Result<FetchReport> {
    local::ensure_dir(dir)?;

    let ids = mail.search(criteria)?;
    let total = ids.len();
    tracing::info!(matched = total, query = %criteria.to_query(), "Mailbox search complete");

    let mut report = FetchReport {
        matched: total,
        ..Default::default()
    };

    for (i, id) in ids.iter().enumerate() {
        if let Some(cb) = progress {
            cb(i, total);
        }

        let raw = match mail.fetch(*id) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to fetch message, skipping");
                continue;
            }
        };

        let attachments = match extract::pdf_attachments(&raw) {
            Ok(atts) => atts,
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to parse message, skipping");
                continue;
            }
        };

        for att in attachments {
            match local::write_new(dir, &att.filename, &att.data)? {
                WriteOutcome::Saved(path) => {
                    tracing::debug!(path = %path.display(), "Saved attachment");
                    report.saved += 1;
                    report.bytes_saved += att.size();
                }
                WriteOutcome::SkippedExisting => {
                    tracing::debug!(filename = %att.filename, "Already staged, skipping");
                    report.skipped += 1;
                }
            }
        }
    }

    if let Some(cb) = progress {
        cb(total, total);
    }

    Ok(report)
}
