//! UEFI Device Path Protocol.
//!
//! A device path is a packed sequence of variable-length nodes, terminated
//! by an end node. The patcher walks the loaded image's file path looking
//! for media file-path nodes, whose payload is a null-terminated UCS-2 path
//! on the volume.

/// A single device path node header.
///
/// The payload (if any) follows immediately after these four bytes;
/// `length` covers the header plus payload.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DevicePathProtocol {
    /// The type of device path node.
    pub node_type: u8,
    /// The sub-type of the device path node.
    pub sub_type: u8,
    /// The length of this node in bytes, stored as two bytes (little-endian).
    pub length: [u8; 2],
}

impl DevicePathProtocol {
    /// Returns the total length of this node in bytes.
    #[must_use]
    pub const fn node_length(&self) -> u16 {
        u16::from_le_bytes(self.length)
    }

    /// Returns `true` if this node marks the end of the entire device path.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.node_type == node_type::END && self.sub_type == 0xFF
    }

    /// Returns `true` if this is a media file-path node (UCS-2 path payload).
    #[must_use]
    pub const fn is_file_path(&self) -> bool {
        self.node_type == node_type::MEDIA && self.sub_type == media_sub_type::FILE_PATH
    }
}

/// Device path node type constants.
pub mod node_type {
    /// Hardware Device Path.
    pub const HARDWARE: u8 = 0x01;
    /// ACPI Device Path.
    pub const ACPI: u8 = 0x02;
    /// Messaging Device Path.
    pub const MESSAGING: u8 = 0x03;
    /// Media Device Path.
    pub const MEDIA: u8 = 0x04;
    /// End of Hardware Device Path.
    pub const END: u8 = 0x7F;
}

/// Sub-type constants for media device path nodes.
pub mod media_sub_type {
    /// File path node: the payload is a null-terminated UCS-2 path.
    pub const FILE_PATH: u8 = 0x04;
}

// ── Compile-time layout assertions ──────────────────────────────────

const _: () = assert!(core::mem::size_of::<DevicePathProtocol>() == 4);
