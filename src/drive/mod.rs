//! Remote storage access: the `CloudStore` capability set and the live
//! Google Drive client.

pub mod client;

use crate::error::Result;
use crate::model::remote::{RemoteFile, RemoteFolder};

/// Capability set the cloud-sync stage needs from a remote store.
///
/// The live implementation is [`client::DriveClient`]; tests use
/// in-memory fakes.
pub trait CloudStore {
    /// Find a non-trashed folder with exactly this name.
    ///
    /// When the store holds several same-named folders, the first one
    /// returned is canonical for the run.
    fn find_folder(&self, name: &str) -> Result<Option<RemoteFolder>>;

    /// Create a folder with this name and return its new entry.
    fn create_folder(&self, name: &str) -> Result<RemoteFolder>;

    /// Whether a non-trashed file with this exact name exists under the
    /// folder. Name equality alone is the dedup key.
    fn file_exists(&self, name: &str, folder_id: &str) -> Result<bool>;

    /// Upload PDF bytes as a new file parented under the folder.
    fn upload_pdf(&self, name: &str, folder_id: &str, data: &[u8]) -> Result<RemoteFile>;
}
