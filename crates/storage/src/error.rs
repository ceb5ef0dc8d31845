/// All errors that can be returned by a RegistryStorage implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O failure against the backing store (directory creation, file write).
    #[error("storage I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// A collection could not be serialized for persistence.
    #[error("storage serialization error: {0}")]
    Serialize(String),
}
