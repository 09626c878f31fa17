//! Safe, high-level wrappers for the UEFI services the patcher uses.

use core::ffi::c_void;

use crate::protocol::file::SimpleFileSystemProtocol;
use crate::protocol::loaded_image::LoadedImageProtocol;
use crate::protocol::simple_text::SimpleTextOutputProtocol;
use crate::table;
use crate::{EfiGuid, EfiHandle, EfiStatus};

/// Boot services wrapper.
pub mod boot;
/// Console output wrapper with `fmt::Write` support.
pub mod console;
/// File system and file RAII wrappers.
pub mod fs;

pub use boot::BootServices;
pub use console::Console;
pub use fs::{File, FileSystem};

// ---------------------------------------------------------------------------
// Protocol trait
// ---------------------------------------------------------------------------

/// Trait tying a protocol marker to its GUID and raw FFI type, for use with
/// [`BootServices::handle_protocol`].
///
/// # Safety
///
/// Implementors must provide the correct GUID and raw FFI type for the
/// protocol.
pub unsafe trait Protocol {
    /// The protocol GUID used to locate this protocol.
    const GUID: EfiGuid;
    /// The raw FFI struct type for this protocol.
    type Raw;
}

/// Marker for [`SimpleFileSystemProtocol`].
pub enum SimpleFileSystemId {}
unsafe impl Protocol for SimpleFileSystemId {
    const GUID: EfiGuid = EfiGuid::SIMPLE_FILE_SYSTEM_PROTOCOL;
    type Raw = SimpleFileSystemProtocol;
}

/// Marker for [`LoadedImageProtocol`].
pub enum LoadedImageId {}
unsafe impl Protocol for LoadedImageId {
    const GUID: EfiGuid = EfiGuid::LOADED_IMAGE_PROTOCOL;
    type Raw = LoadedImageProtocol;
}

// ---------------------------------------------------------------------------
// UTF-8 to UCS-2 helper
// ---------------------------------------------------------------------------

/// Convert a UTF-8 string to a null-terminated UCS-2 string in `buf`.
///
/// Returns the number of `u16` units written including the terminator.
/// Non-BMP characters are replaced with U+FFFD.
///
/// # Errors
///
/// Returns [`EfiStatus::BUFFER_TOO_SMALL`] when the converted string plus
/// terminator does not fit in `buf`.
pub fn utf8_to_ucs2(s: &str, buf: &mut [u16]) -> Result<usize, EfiStatus> {
    if buf.is_empty() {
        return Err(EfiStatus::BUFFER_TOO_SMALL);
    }
    let mut i = 0;
    for ch in s.chars() {
        let code = if (ch as u32) > 0xFFFF {
            0xFFFD
        } else {
            ch as u16
        };
        // Space for this character plus the terminator.
        if i + 1 >= buf.len() {
            return Err(EfiStatus::BUFFER_TOO_SMALL);
        }
        buf[i] = code;
        i += 1;
    }
    buf[i] = 0;
    Ok(i + 1)
}

// ---------------------------------------------------------------------------
// SystemTable
// ---------------------------------------------------------------------------

/// Safe wrapper around the UEFI System Table.
///
/// The patcher runs entirely inside the boot-services window and never
/// calls `ExitBootServices`, so a single wrapper covers its whole lifetime.
pub struct SystemTable {
    handle: EfiHandle,
    raw: *mut table::SystemTable,
}

impl SystemTable {
    /// Create a `SystemTable` from the raw pointers passed to `efi_main`.
    ///
    /// # Safety
    ///
    /// - `handle` must be a valid EFI image handle.
    /// - `raw` must point to a valid, firmware-owned UEFI System Table.
    /// - Boot services must still be active.
    #[must_use]
    pub unsafe fn from_raw(handle: EfiHandle, raw: *mut table::SystemTable) -> Self {
        Self { handle, raw }
    }

    /// Returns the image handle.
    #[must_use]
    pub fn image_handle(&self) -> EfiHandle {
        self.handle
    }

    /// Borrow the boot services table.
    #[must_use]
    pub fn boot_services(&self) -> BootServices<'_> {
        let bs = unsafe { &*(*self.raw).boot_services };
        BootServices::new(bs, self.handle)
    }

    /// Get a console wrapper for standard output.
    #[must_use]
    pub fn console_out(&self) -> Console<'_> {
        let raw = unsafe { (*self.raw).console_out.cast::<SimpleTextOutputProtocol>() };
        Console::new(raw)
    }

    /// Look up a configuration table entry by vendor GUID.
    ///
    /// Returns the `vendor_table` pointer of the first matching entry, or
    /// `None` when the registry has no entry with that GUID.
    #[must_use]
    pub fn find_configuration_table(&self, guid: &EfiGuid) -> Option<*mut c_void> {
        let tables = unsafe { (*self.raw).configuration_tables() };
        tables
            .iter()
            .find(|entry| entry.vendor_guid == *guid)
            .map(|entry| entry.vendor_table)
    }
}
