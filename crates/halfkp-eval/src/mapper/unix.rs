//! `mmap(2)` backend.

use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;
use std::ptr::{self, NonNull};

pub(super) struct RawMapping {
    ptr: NonNull<u8>,
    len: usize,
}

impl RawMapping {
    pub(super) fn new(file: &File, len: usize) -> io::Result<Self> {
        // SAFETY: a fresh read-only shared mapping of an open descriptor; the
        // kernel picks the address and we check for MAP_FAILED below.
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        let ptr = NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| io::Error::other("mmap returned a null address"))?;
        Ok(Self { ptr, len })
    }

    #[inline]
    pub(super) fn as_slice(&self) -> &[u8] {
        // SAFETY: ptr/len describe a live PROT_READ mapping owned by self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for RawMapping {
    fn drop(&mut self) {
        // SAFETY: unmapping exactly the region returned by mmap, once.
        unsafe {
            libc::munmap(self.ptr.as_ptr().cast::<libc::c_void>(), self.len);
        }
    }
}

// SAFETY: the region is read-only and never handed out mutably.
unsafe impl Send for RawMapping {}
unsafe impl Sync for RawMapping {}
