//! Error types for opening, mapping, and validating weight files.

use std::io;
use std::path::PathBuf;

/// The weight file could not be opened or inspected.
#[derive(Debug, thiserror::Error)]
#[error("cannot open {}: {source}", path.display())]
pub struct FileError {
    /// Path that failed.
    pub path: PathBuf,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// The operating system refused to map the file.
#[derive(Debug, thiserror::Error)]
#[error("cannot map {len} bytes: {source}")]
pub struct MapError {
    /// Requested mapping length.
    pub len: u64,
    /// The underlying OS error.
    #[source]
    pub source: io::Error,
}

/// Either half of the open-then-map sequence failed.
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Errors from [`WeightStore::load`](crate::WeightStore::load).
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or mapped.
    #[error("weight file unreadable: {0}")]
    Unreadable(#[from] MapperError),

    /// The file size does not match the fixed network layout.
    #[error("weight file is {found} bytes, expected {expected}")]
    SizeMismatch {
        /// Size implied by the architecture constants.
        expected: u64,
        /// Size on disk.
        found: u64,
    },

    /// A header or section hash does not match the supported network.
    #[error("bad {field} in weight file: expected {expected:#010x}, found {found:#010x}")]
    BadHeader {
        /// Which header word was wrong.
        field: &'static str,
        /// The value the loader requires.
        expected: u32,
        /// The value read from the file.
        found: u32,
    },
}

impl From<FileError> for LoadError {
    fn from(err: FileError) -> Self {
        LoadError::Unreadable(MapperError::File(err))
    }
}

impl From<MapError> for LoadError {
    fn from(err: MapError) -> Self {
        LoadError::Unreadable(MapperError::Map(err))
    }
}
