//! Read-only memory mapping of weight files.
//!
//! [`NetFile`] opens a file and reports its size; [`NetFile::map`] turns it
//! into a [`Mapping`] whose bytes stay valid until the mapping is dropped.
//! The operating-system backend is chosen at build time:
//!
//! - **Unix**: `mmap(2)` / `munmap(2)` via `libc`
//! - **Windows**: `CreateFileMappingW` / `MapViewOfFile` via `windows-sys`
//!
//! Both backends expose identical bytes through the same public types.

use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FileError, MapError};

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use self::unix as sys;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use self::windows as sys;

/// An open, read-only weight file.
#[derive(Debug)]
pub struct NetFile {
    file: File,
    path: PathBuf,
    len: u64,
}

impl NetFile {
    /// Open `path` read-only and record its size.
    pub fn open(path: impl AsRef<Path>) -> Result<NetFile, FileError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| FileError {
            path: path.clone(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| FileError {
                path: path.clone(),
                source,
            })?
            .len();
        Ok(NetFile { file, path, len })
    }

    /// Size of the file in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.len
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Map the whole file read-only.
    ///
    /// The mapping outlives this handle; dropping the `NetFile` afterwards
    /// is fine.
    pub fn map(&self) -> Result<Mapping, MapError> {
        let len = usize::try_from(self.len).map_err(|_| MapError {
            len: self.len,
            source: io::Error::new(io::ErrorKind::InvalidInput, "file too large for address space"),
        })?;
        if len == 0 {
            return Err(MapError {
                len: 0,
                source: io::Error::new(io::ErrorKind::InvalidInput, "cannot map an empty file"),
            });
        }

        let raw = sys::RawMapping::new(&self.file, len).map_err(|source| MapError {
            len: self.len,
            source,
        })?;
        debug!(path = %self.path.display(), len, "mapped weight file");
        Ok(Mapping { raw })
    }
}

/// A read-only view of a mapped file. Unmapped on drop.
pub struct Mapping {
    raw: sys::RawMapping,
}

impl Mapping {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.raw.as_slice()
    }

    /// Release the mapping now rather than at end of scope.
    pub fn unmap(self) {
        drop(self);
    }
}

impl Deref for Mapping {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        debug!(len = self.raw.as_slice().len(), "unmapping weight file");
    }
}

impl std::fmt::Debug for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapping")
            .field("len", &self.as_bytes().len())
            .finish()
    }
}
