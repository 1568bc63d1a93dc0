//! Google Drive v3 REST client (blocking).

use std::time::Duration;

use serde::Deserialize;

use crate::config::DriveConfig;
use crate::drive::CloudStore;
use crate::error::{DropError, Result};
use crate::model::remote::{RemoteFile, RemoteFolder};

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";
const PDF_MIME: &str = "application/pdf";

/// HTTP timeout per call. No retries — a failed call surfaces as an error
/// and the caller decides whether it is fatal.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated Drive v3 client.
pub struct DriveClient {
    http: reqwest::blocking::Client,
    token: String,
    api_base: String,
    upload_base: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    id: String,
    #[serde(default)]
    name: String,
}

impl DriveClient {
    /// Build a client from config plus a bearer token.
    pub fn new(config: &DriveConfig, token: String) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            token,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
        })
    }

    /// Run a `files.list` query and return the entries.
    fn list(&self, query: &str) -> Result<Vec<FileEntry>> {
        let url = format!("{}/files", self.api_base);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("q", query),
                ("spaces", "drive"),
                ("fields", "files(id, name)"),
            ])
            .send()?;

        let response = check_status(response)?;
        let list: FileList = response.json()?;
        Ok(list.files)
    }
}

impl CloudStore for DriveClient {
    fn find_folder(&self, name: &str) -> Result<Option<RemoteFolder>> {
        let query = format!(
            "name='{}' and mimeType='{FOLDER_MIME}' and trashed=false",
            escape_query_value(name)
        );
        let mut files = self.list(&query)?;

        if files.is_empty() {
            return Ok(None);
        }
        // First match wins; duplicate folders are not reconciled
        let first = files.remove(0);
        Ok(Some(RemoteFolder {
            id: first.id,
            name: first.name,
        }))
    }

    fn create_folder(&self, name: &str) -> Result<RemoteFolder> {
        let url = format!("{}/files", self.api_base);
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()?;

        let response = check_status(response)?;
        let entry: FileEntry = response.json()?;
        Ok(RemoteFolder {
            id: entry.id,
            name: name.to_string(),
        })
    }

    fn file_exists(&self, name: &str, folder_id: &str) -> Result<bool> {
        let query = format!(
            "name='{}' and '{}' in parents and trashed=false",
            escape_query_value(name),
            escape_query_value(folder_id)
        );
        Ok(!self.list(&query)?.is_empty())
    }

    fn upload_pdf(&self, name: &str, folder_id: &str, data: &[u8]) -> Result<RemoteFile> {
        let url = format!("{}/files", self.upload_base);
        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder_id],
        });

        let boundary = "invoicedrop_multipart_boundary";
        let body = multipart_related_body(boundary, &metadata.to_string(), PDF_MIME, data);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()?;

        let response = check_status(response)?;
        let entry: FileEntry = response.json()?;
        Ok(RemoteFile {
            id: entry.id,
            name: name.to_string(),
        })
    }
}

/// Turn a non-success response into `DropError::Api` with the body text.
fn check_status(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().unwrap_or_default();
    Err(DropError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Escape a value for embedding in a Drive `q` expression.
fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Assemble a `multipart/related` body: JSON metadata part, then the
/// binary content part.
fn multipart_related_body(
    boundary: &str,
    metadata_json: &str,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + metadata_json.len() + 256);
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(metadata_json.as_bytes());
    body.extend_from_slice(
        format!("\r\n--{boundary}\r\nContent-Type: {content_type}\r\n\r\n").as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_query_value() {
        assert_eq!(escape_query_value("Invoices"), "Invoices");
        assert_eq!(escape_query_value("it's"), "it\\'s");
        assert_eq!(escape_query_value("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_related_body("b0", "{\"name\":\"a.pdf\"}", PDF_MIME, b"DATA");
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--b0\r\n"));
        assert!(text.contains("Content-Type: application/json; charset=UTF-8"));
        assert!(text.contains("{\"name\":\"a.pdf\"}"));
        assert!(text.contains("Content-Type: application/pdf"));
        assert!(text.contains("DATA"));
        assert!(text.ends_with("--b0--\r\n"));
    }
}
