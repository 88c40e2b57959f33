use thiserror::Error;

use guestbook_types::EntryId;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The database file could not be opened or its schema created.
    #[error("entry store unavailable: {0}")]
    Unavailable(String),

    #[error("entry could not be written: {0}")]
    WriteFailed(String),

    #[error("entry {0} not found")]
    NotFound(EntryId),

    #[error("connection lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
