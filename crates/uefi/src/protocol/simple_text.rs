//! UEFI Simple Text Output Protocol.
//!
//! Text-mode console output: the firmware-provided device takes
//! null-terminated UCS-2 strings.

use crate::EfiStatus;

/// The Simple Text Output Protocol.
#[repr(C)]
pub struct SimpleTextOutputProtocol {
    /// Resets the text output device hardware.
    pub reset: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        extended_verification: bool,
    ) -> EfiStatus,
    /// Writes a null-terminated UCS-2 string to the output device.
    pub output_string: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        string: *const u16,
    ) -> EfiStatus,
    /// Verifies that all characters in a UCS-2 string can be output.
    pub test_string: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        string: *const u16,
    ) -> EfiStatus,
    /// Returns information for an available text mode.
    pub query_mode: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        mode_number: usize,
        columns: *mut usize,
        rows: *mut usize,
    ) -> EfiStatus,
    /// Sets the output device to a specified mode.
    pub set_mode: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        mode_number: usize,
    ) -> EfiStatus,
    /// Sets the foreground and background colors.
    pub set_attribute: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        attribute: usize,
    ) -> EfiStatus,
    /// Clears the display to the currently selected background color.
    pub clear_screen:
        unsafe extern "efiapi" fn(this: *mut SimpleTextOutputProtocol) -> EfiStatus,
    /// Sets the current coordinates of the cursor position.
    pub set_cursor_position: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        column: usize,
        row: usize,
    ) -> EfiStatus,
    /// Makes the cursor visible or invisible.
    pub enable_cursor: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        visible: bool,
    ) -> EfiStatus,
    /// Pointer to the current mode data.
    pub mode: *mut SimpleTextOutputMode,
}

/// Current mode information for the text output device.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SimpleTextOutputMode {
    /// The number of modes supported by `query_mode` and `set_mode`.
    pub max_mode: i32,
    /// The text mode of the output device.
    pub mode: i32,
    /// The current character output attribute.
    pub attribute: i32,
    /// The cursor's column.
    pub cursor_column: i32,
    /// The cursor's row.
    pub cursor_row: i32,
    /// Whether the cursor is currently visible.
    pub cursor_visible: bool,
}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = assert!(core::mem::size_of::<SimpleTextOutputMode>() == 24);

#[cfg(target_pointer_width = "64")]
const _: () = assert!(core::mem::size_of::<SimpleTextOutputProtocol>() == 80);
