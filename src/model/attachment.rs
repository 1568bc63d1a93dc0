//! Decoded PDF attachment, ready to be staged on disk.

/// A PDF attachment extracted from a mail message.
///
/// Attachment content is decoded eagerly — each attachment is written out
/// (or skipped) immediately after extraction, so nothing is kept around
/// past the current message.
#[derive(Debug, Clone)]
pub struct PdfAttachment {
    /// Sanitized filename, safe for filesystem use. This is the dedup key
    /// at both the local and the remote stage.
    pub filename: String,

    /// Decoded payload.
    pub data: Vec<u8>,
}

impl PdfAttachment {
    /// Decoded size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
