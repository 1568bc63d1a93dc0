//! Remote store entries, identified by the opaque IDs Drive assigns.

/// A folder in the remote store.
///
/// At most one folder per name is treated as canonical within a run —
/// the first listing hit wins, duplicates are not reconciled.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteFolder {
    /// Opaque ID assigned by the store.
    pub id: String,
    /// Folder display name.
    pub name: String,
}

/// A file entry in the remote store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteFile {
    /// Opaque ID assigned by the store.
    pub id: String,
    /// File display name.
    pub name: String,
}
