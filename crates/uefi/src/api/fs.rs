use core::marker::PhantomData;

use crate::EfiStatus;
use crate::protocol::file::{
    FileAttributes, FileInfo, FileMode, FileProtocol, SimpleFileSystemProtocol,
};

use super::utf8_to_ucs2;

/// Safe wrapper around the UEFI Simple File System Protocol.
pub struct FileSystem<'st> {
    raw: *mut SimpleFileSystemProtocol,
    _lifetime: PhantomData<&'st ()>,
}

impl<'st> FileSystem<'st> {
    /// Create a `FileSystem` wrapper from a protocol reference obtained via
    /// `handle_protocol`.
    pub fn new(raw: &'st mut SimpleFileSystemProtocol) -> Self {
        Self {
            raw: core::ptr::from_mut(raw),
            _lifetime: PhantomData,
        }
    }

    /// Open the root directory of this file system volume.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the volume cannot be opened.
    pub fn open_volume(&self) -> Result<File<'st>, EfiStatus> {
        let mut root: *mut FileProtocol = core::ptr::null_mut();
        let status = unsafe { ((*self.raw).open_volume)(self.raw, &raw mut root) };
        status.to_result()?;
        Ok(File {
            raw: root,
            _lifetime: PhantomData,
        })
    }
}

/// Safe RAII wrapper around a UEFI file handle.
///
/// Calls `close` on drop. A handle opened on a directory enumerates its
/// entries through [`read_dir_entry`](File::read_dir_entry).
pub struct File<'st> {
    raw: *mut FileProtocol,
    _lifetime: PhantomData<&'st ()>,
}

impl<'st> File<'st> {
    /// Open a file or directory relative to this directory handle.
    ///
    /// `name` is a UTF-8 path, converted to UCS-2 internally (at most 255
    /// characters).
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the path cannot be opened.
    pub fn open(
        &self,
        name: &str,
        mode: FileMode,
        attributes: FileAttributes,
    ) -> Result<File<'st>, EfiStatus> {
        let mut name_buf = [0u16; 256];
        utf8_to_ucs2(name, &mut name_buf)?;

        let mut new_handle: *mut FileProtocol = core::ptr::null_mut();
        let status = unsafe {
            ((*self.raw).open)(
                self.raw,
                &raw mut new_handle,
                name_buf.as_ptr(),
                mode.bits(),
                attributes.bits(),
            )
        };
        status.to_result()?;
        Ok(File {
            raw: new_handle,
            _lifetime: PhantomData,
        })
    }

    /// Open a file or directory from an already null-terminated UCS-2 path.
    ///
    /// Used when the path comes straight from a device path node and never
    /// existed as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the path cannot be opened.
    pub fn open_ucs2(
        &self,
        name: &[u16],
        mode: FileMode,
        attributes: FileAttributes,
    ) -> Result<File<'st>, EfiStatus> {
        if !name.ends_with(&[0]) {
            return Err(EfiStatus::INVALID_PARAMETER);
        }
        let mut new_handle: *mut FileProtocol = core::ptr::null_mut();
        let status = unsafe {
            ((*self.raw).open)(
                self.raw,
                &raw mut new_handle,
                name.as_ptr(),
                mode.bits(),
                attributes.bits(),
            )
        };
        status.to_result()?;
        Ok(File {
            raw: new_handle,
            _lifetime: PhantomData,
        })
    }

    /// Read from the file into the buffer.
    ///
    /// Returns the number of bytes actually read; `0` means end-of-file.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the read fails.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, EfiStatus> {
        let mut size = buf.len();
        let status = unsafe { ((*self.raw).read)(self.raw, &raw mut size, buf.as_mut_ptr()) };
        status.to_result()?;
        Ok(size)
    }

    /// Read the next directory entry from a handle opened on a directory.
    ///
    /// Returns `Ok(None)` when the directory is exhausted. The caller's
    /// buffer receives a [`FileInfo`] record plus the variable-length name;
    /// it must be 8-byte aligned (pass a `[u64; N]` buffer reinterpreted as
    /// bytes) and large enough for the longest entry.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the read fails, including
    /// [`EfiStatus::BUFFER_TOO_SMALL`] for an undersized buffer.
    pub fn read_dir_entry<'buf>(
        &self,
        buf: &'buf mut [u8],
    ) -> Result<Option<&'buf FileInfo>, EfiStatus> {
        let read = self.read(buf)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(unsafe { &*buf.as_ptr().cast::<FileInfo>() }))
    }
}

impl Drop for File<'_> {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            unsafe { ((*self.raw).close)(self.raw) };
        }
    }
}
