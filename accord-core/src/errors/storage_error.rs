//! Storage errors.

/// Errors from the durable validation store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    /// A persisted column could not be decoded back into its value type
    /// (corrupted label or signal list).
    #[error("Corrupt row for case {case_id}: {message}")]
    CorruptRow { case_id: String, message: String },
}
