//! UEFI Simple File System and File protocols.
//!
//! The Simple File System Protocol yields a handle to a FAT volume's root
//! directory; the File Protocol provides file and directory I/O on it.
//! Reading from a handle opened on a *directory* returns one [`FileInfo`]
//! record per call, which is how directory contents are enumerated.

use bitflags::bitflags;

use crate::table::EfiTime;
use crate::{EfiGuid, EfiStatus};

/// The Simple File System Protocol.
///
/// Installed on every handle backing a supported file system volume; used
/// to obtain the volume's root directory.
#[repr(C)]
pub struct SimpleFileSystemProtocol {
    /// The revision of this protocol.
    pub revision: u64,
    /// Opens the root directory of the volume.
    pub open_volume: unsafe extern "efiapi" fn(
        this: *mut SimpleFileSystemProtocol,
        root: *mut *mut FileProtocol,
    ) -> EfiStatus,
}

/// The File Protocol.
///
/// Obtained from [`SimpleFileSystemProtocol::open_volume`] or
/// [`FileProtocol::open`]; represents an open file or directory.
#[repr(C)]
pub struct FileProtocol {
    /// The revision of this protocol.
    pub revision: u64,
    /// Opens a new file relative to this handle's location.
    pub open: unsafe extern "efiapi" fn(
        this: *mut FileProtocol,
        new_handle: *mut *mut FileProtocol,
        file_name: *const u16,
        open_mode: u64,
        attributes: u64,
    ) -> EfiStatus,
    /// Closes the file handle.
    pub close: unsafe extern "efiapi" fn(this: *mut FileProtocol) -> EfiStatus,
    /// Closes and deletes the file.
    pub delete: unsafe extern "efiapi" fn(this: *mut FileProtocol) -> EfiStatus,
    /// Reads data from the file, or the next entry from a directory.
    pub read: unsafe extern "efiapi" fn(
        this: *mut FileProtocol,
        buffer_size: *mut usize,
        buffer: *mut u8,
    ) -> EfiStatus,
    /// Writes data to the file.
    pub write: unsafe extern "efiapi" fn(
        this: *mut FileProtocol,
        buffer_size: *mut usize,
        buffer: *const u8,
    ) -> EfiStatus,
    /// Returns the current file position.
    pub get_position:
        unsafe extern "efiapi" fn(this: *mut FileProtocol, position: *mut u64) -> EfiStatus,
    /// Sets the current file position.
    pub set_position:
        unsafe extern "efiapi" fn(this: *mut FileProtocol, position: u64) -> EfiStatus,
    /// Returns information about a file.
    pub get_info: unsafe extern "efiapi" fn(
        this: *mut FileProtocol,
        information_type: *const EfiGuid,
        buffer_size: *mut usize,
        buffer: *mut u8,
    ) -> EfiStatus,
    /// Sets information about a file.
    pub set_info: unsafe extern "efiapi" fn(
        this: *mut FileProtocol,
        information_type: *const EfiGuid,
        buffer_size: usize,
        buffer: *const u8,
    ) -> EfiStatus,
    /// Flushes all modified data associated with the file to the device.
    pub flush: unsafe extern "efiapi" fn(this: *mut FileProtocol) -> EfiStatus,
}

bitflags! {
    /// File open mode flags.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileMode: u64 {
        /// Open for reading.
        const READ = 0x0000_0000_0000_0001;
        /// Open for writing.
        const WRITE = 0x0000_0000_0000_0002;
        /// Create the file if it does not exist.
        const CREATE = 0x8000_0000_0000_0000;
    }
}

bitflags! {
    /// File attribute flags.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileAttributes: u64 {
        /// The file is read-only.
        const READ_ONLY = 0x0000_0000_0000_0001;
        /// The file is hidden.
        const HIDDEN = 0x0000_0000_0000_0002;
        /// The file is a system file.
        const SYSTEM = 0x0000_0000_0000_0004;
        /// Reserved (should not be used).
        const RESERVED = 0x0000_0000_0000_0008;
        /// The file is a directory.
        const DIRECTORY = 0x0000_0000_0000_0010;
        /// The file has been modified since last backup.
        const ARCHIVE = 0x0000_0000_0000_0020;
    }
}

/// File information record.
///
/// Variable-length: `file_name` is the first unit of a null-terminated
/// UCS-2 name that extends past the end of the struct. The `size` field
/// gives the total record size including the name.
#[repr(C)]
pub struct FileInfo {
    /// The size of this record including the variable-length file name.
    pub size: u64,
    /// The size of the file in bytes.
    pub file_size: u64,
    /// The amount of physical space the file consumes on the volume.
    pub physical_size: u64,
    /// The time the file was created.
    pub create_time: EfiTime,
    /// The time the file was last accessed.
    pub last_access_time: EfiTime,
    /// The time the file was last modified.
    pub modification_time: EfiTime,
    /// The file attributes.
    pub attribute: u64,
    /// The first unit of the null-terminated UCS-2 file name.
    pub file_name: [u16; 1],
}

impl FileInfo {
    /// Returns `true` if this record describes a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        FileAttributes::from_bits_truncate(self.attribute).contains(FileAttributes::DIRECTORY)
    }

    /// Returns a pointer to the start of the null-terminated UCS-2 name.
    #[must_use]
    pub fn file_name_ptr(&self) -> *const u16 {
        self.file_name.as_ptr()
    }
}

// ── Compile-time layout assertions ──────────────────────────────────

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(core::mem::size_of::<SimpleFileSystemProtocol>() == 16);
    assert!(core::mem::size_of::<FileProtocol>() == 88);
};

const _: () = {
    // Header through attribute: 3 × u64 + 3 × EfiTime (16) + u64 = 80 bytes.
    assert!(core::mem::offset_of!(FileInfo, attribute) == 72);
    assert!(core::mem::offset_of!(FileInfo, file_name) == 80);
};
