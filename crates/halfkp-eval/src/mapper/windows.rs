//! `CreateFileMappingW` / `MapViewOfFile` backend.

use std::fs::File;
use std::io;
use std::os::windows::io::AsRawHandle;
use std::ptr;

use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
use windows_sys::Win32::System::Memory::{
    CreateFileMappingW, FILE_MAP_READ, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile, PAGE_READONLY,
    UnmapViewOfFile,
};

pub(super) struct RawMapping {
    view: MEMORY_MAPPED_VIEW_ADDRESS,
    mapping: HANDLE,
    len: usize,
}

impl RawMapping {
    pub(super) fn new(file: &File, len: usize) -> io::Result<Self> {
        // SAFETY: the file handle is open for reading for the duration of the call.
        let mapping = unsafe {
            CreateFileMappingW(
                file.as_raw_handle() as HANDLE,
                ptr::null(),
                PAGE_READONLY,
                0,
                0,
                ptr::null(),
            )
        };
        if mapping.is_null() {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: mapping is a valid read-only section handle.
        let view = unsafe { MapViewOfFile(mapping, FILE_MAP_READ, 0, 0, len) };
        if view.Value.is_null() {
            let err = io::Error::last_os_error();
            // SAFETY: closing the handle we just created.
            unsafe {
                CloseHandle(mapping);
            }
            return Err(err);
        }

        Ok(Self { view, mapping, len })
    }

    #[inline]
    pub(super) fn as_slice(&self) -> &[u8] {
        // SAFETY: view/len describe a live read-only view owned by self.
        unsafe { std::slice::from_raw_parts(self.view.Value.cast::<u8>(), self.len) }
    }
}

impl Drop for RawMapping {
    fn drop(&mut self) {
        // SAFETY: releasing the view and section created in `new`, once.
        unsafe {
            UnmapViewOfFile(self.view);
            CloseHandle(self.mapping);
        }
    }
}

// SAFETY: the view is read-only and never handed out mutably.
unsafe impl Send for RawMapping {}
unsafe impl Sync for RawMapping {}
