//! PDF attachment extraction from raw RFC-822 messages.

use mail_parser::{MessageParser, MimeHeaders};

use crate::error::{DropError, Result};
use crate::local::sanitize_filename;
use crate::model::attachment::PdfAttachment;

/// Extract every PDF attachment from a raw message.
///
/// A part qualifies when its disposition is `attachment` and its filename
/// ends in `.pdf` (case-insensitive). Inline parts and non-PDF attachments
/// are ignored. Filenames are sanitized before use — the sanitized name is
/// the dedup key downstream.
pub fn pdf_attachments(raw_message: &[u8]) -> Result<Vec<PdfAttachment>> {
    let parser = MessageParser::default();
    let msg = parser
        .parse(raw_message)
        .ok_or_else(|| DropError::Mime("failed to parse message".into()))?;

    let mut result = Vec::new();

    for part in msg.attachments() {
        let is_attachment = part
            .content_disposition()
            .map(|d: &mail_parser::ContentType| d.ctype().eq_ignore_ascii_case("attachment"))
            .unwrap_or(false);
        if !is_attachment {
            continue;
        }

        let Some(name) = part.attachment_name() else {
            continue;
        };
        if !is_pdf_name(name) {
            continue;
        }

        result.push(PdfAttachment {
            filename: sanitize_filename(name),
            data: part.contents().to_vec(),
        });
    }

    Ok(result)
}

/// `true` when the filename carries a `.pdf` extension, case-insensitive.
pub fn is_pdf_name(name: &str) -> bool {
    // Byte comparison: names may end in multi-byte characters
    let bytes = name.as_bytes();
    bytes.len() > 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a multipart/mixed message with the given attachment parts.
    /// Each part is (filename, content_type, disposition, payload).
    fn message_with_parts(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
        use std::fmt::Write;

        let boundary = "test-boundary-0001";
        let mut msg = String::new();
        msg.push_str("From: sender@example.com\r\n");
        msg.push_str("To: billing@example.com\r\n");
        msg.push_str("Subject: Invoice June\r\n");
        msg.push_str("MIME-Version: 1.0\r\n");
        writeln!(
            msg,
            "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r"
        )
        .unwrap();
        msg.push_str("\r\n");

        msg.push_str(&format!("--{boundary}\r\n"));
        msg.push_str("Content-Type: text/plain\r\n\r\n");
        msg.push_str("Please find the invoice attached.\r\n");

        for (filename, content_type, disposition, payload) in parts {
            use base64::Engine as _;
            let encoded =
                base64::engine::general_purpose::STANDARD.encode(payload);
            msg.push_str(&format!("--{boundary}\r\n"));
            msg.push_str(&format!(
                "Content-Type: {content_type}; name=\"{filename}\"\r\n"
            ));
            msg.push_str("Content-Transfer-Encoding: base64\r\n");
            msg.push_str(&format!(
                "Content-Disposition: {disposition}; filename=\"{filename}\"\r\n"
            ));
            msg.push_str("\r\n");
            msg.push_str(&encoded);
            msg.push_str("\r\n");
        }

        msg.push_str(&format!("--{boundary}--\r\n"));
        msg.into_bytes()
    }

    #[test]
    fn test_extracts_pdf_attachment() {
        let raw = message_with_parts(&[(
            "invoice.pdf",
            "application/pdf",
            "attachment",
            b"%PDF-1.4 fake content",
        )]);
        let atts = pdf_attachments(&raw).unwrap();
        assert_eq!(atts.len(), 1);
        assert_eq!(atts[0].filename, "invoice.pdf");
        assert_eq!(atts[0].data, b"%PDF-1.4 fake content");
    }

    #[test]
    fn test_ignores_non_pdf_attachments() {
        let raw = message_with_parts(&[
            ("invoice.pdf", "application/pdf", "attachment", b"%PDF-1.4"),
            ("notes.txt", "text/plain", "attachment", b"plain text"),
        ]);
        let atts = pdf_attachments(&raw).unwrap();
        assert_eq!(atts.len(), 1);
        assert_eq!(atts[0].filename, "invoice.pdf");
    }

    #[test]
    fn test_ignores_inline_pdf() {
        let raw = message_with_parts(&[(
            "preview.pdf",
            "application/pdf",
            "inline",
            b"%PDF-1.4",
        )]);
        let atts = pdf_attachments(&raw).unwrap();
        assert!(atts.is_empty());
    }

    #[test]
    fn test_uppercase_extension_matches() {
        let raw = message_with_parts(&[(
            "INVOICE.PDF",
            "application/pdf",
            "attachment",
            b"%PDF-1.4",
        )]);
        let atts = pdf_attachments(&raw).unwrap();
        assert_eq!(atts.len(), 1);
    }

    #[test]
    fn test_message_without_attachments() {
        let raw = message_with_parts(&[]);
        let atts = pdf_attachments(&raw).unwrap();
        assert!(atts.is_empty());
    }

    #[test]
    fn test_is_pdf_name() {
        assert!(is_pdf_name("a.pdf"));
        assert!(is_pdf_name("A.PDF"));
        assert!(is_pdf_name("report.june.pdf"));
        assert!(!is_pdf_name("a.pdfx"));
        assert!(!is_pdf_name(".pdf"));
        assert!(!is_pdf_name("document.txt"));
    }
}
