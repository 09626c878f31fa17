//! UEFI Loaded Image Protocol.
//!
//! Installed on every image handle; describes where the image came from.
//! The patcher uses `device_handle` (to reach the volume's file system) and
//! `file_path` (to find the directory the image sits in).

use core::ffi::c_void;

use crate::table::SystemTable;
use crate::{EfiHandle, EfiStatus, memory::EfiMemoryType};

use super::device_path::DevicePathProtocol;

/// The Loaded Image Protocol.
#[repr(C)]
pub struct LoadedImageProtocol {
    /// The revision of this protocol.
    pub revision: u32,
    /// The handle of the image that loaded this image.
    pub parent_handle: EfiHandle,
    /// Pointer to the System Table.
    pub system_table: *mut SystemTable,

    // ── Source location ──────────────────────────────────────────
    /// The device handle the image was loaded from.
    pub device_handle: EfiHandle,
    /// Device path of the file the image was loaded from, relative to
    /// `device_handle`.
    pub file_path: *mut DevicePathProtocol,
    /// Reserved field.
    pub reserved: *mut c_void,

    // ── Load options ─────────────────────────────────────────────
    /// The size in bytes of `load_options`.
    pub load_options_size: u32,
    /// Pointer to the image's load options.
    pub load_options: *mut c_void,

    // ── Location of the image in memory ──────────────────────────
    /// Base address of the loaded image in memory.
    pub image_base: *mut c_void,
    /// The size in bytes of the loaded image.
    pub image_size: u64,
    /// The memory type of the image's code sections.
    pub image_code_type: EfiMemoryType,
    /// The memory type of the image's data sections.
    pub image_data_type: EfiMemoryType,
    /// The `Unload` function for this image.
    pub unload: unsafe extern "efiapi" fn(image_handle: EfiHandle) -> EfiStatus,
}

// ── Compile-time layout assertions ──────────────────────────────────

#[cfg(target_pointer_width = "64")]
const _: () = {
    assert!(core::mem::size_of::<LoadedImageProtocol>() == 96);
    // Padding after revision (u32) before parent_handle (ptr)
    assert!(core::mem::offset_of!(LoadedImageProtocol, device_handle) == 24);
    assert!(core::mem::offset_of!(LoadedImageProtocol, file_path) == 32);
    assert!(core::mem::offset_of!(LoadedImageProtocol, image_base) == 64);
};
