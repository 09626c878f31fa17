//! Root System Description Pointer (RSDP) reading.
//!
//! The RSDP is the entry point into the ACPI table hierarchy. The patcher
//! obtains it from the UEFI configuration-table registry keyed by the
//! ACPI 2.0 GUID, so only the 36-byte ACPI 2.0+ layout is handled here.
//!
//! The structure is read without signature or checksum validation: the
//! registry entry is trusted. The RSDP itself is never mutated.

use amlpatch_binparse::FromBytes;

/// ACPI 2.0+ Root System Description Pointer --- 36 bytes.
#[derive(Debug, Clone, Copy)]
pub struct Rsdp {
    /// Should be `b"RSD PTR "` (8 bytes, note the trailing space).
    pub signature: [u8; 8],
    /// Checksum covering the first 20 bytes.
    pub checksum: u8,
    /// OEM identification string.
    pub oem_id: [u8; 6],
    /// ACPI revision: 2 for ACPI 2.0+.
    pub revision: u8,
    /// Physical address of the RSDT (32-bit, ACPI 1.0 compatibility).
    pub rsdt_address: u32,
    /// Total length of this structure (should be 36).
    pub length: u32,
    /// Physical address of the XSDT (64-bit).
    pub xsdt_address: u64,
}

impl Rsdp {
    /// Size of the ACPI 2.0 RSDP structure in bytes.
    pub const SIZE: usize = 36;

    /// Expected signature bytes.
    pub const SIGNATURE: &'static [u8; 8] = b"RSD PTR ";

    /// Byte offset of the 64-bit XSDT address.
    const XSDT_ADDRESS_OFFSET: usize = 24;

    /// Read an [`Rsdp`] from a byte slice.
    ///
    /// Returns `None` if the slice is shorter than [`Rsdp::SIZE`]. No
    /// signature or checksum validation is performed.
    #[must_use]
    pub fn read_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            signature: <[u8; 8]>::read_at(data, 0)?,
            checksum: u8::read_at(data, 8)?,
            oem_id: <[u8; 6]>::read_at(data, 9)?,
            revision: u8::read_at(data, 15)?,
            rsdt_address: u32::read_at(data, 16)?,
            length: u32::read_at(data, 20)?,
            xsdt_address: u64::read_at(data, Self::XSDT_ADDRESS_OFFSET)?,
        })
    }

    /// Returns the physical address of the XSDT.
    #[must_use]
    pub fn xsdt_address(&self) -> u64 {
        self.xsdt_address
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    fn synthetic_rsdp(xsdt_addr: u64) -> [u8; 36] {
        let mut data = [0u8; 36];
        data[..8].copy_from_slice(Rsdp::SIGNATURE);
        data[15] = 2; // revision
        data[16..20].copy_from_slice(&0xDEAD_0000u32.to_le_bytes());
        data[20..24].copy_from_slice(&36u32.to_le_bytes());
        data[24..32].copy_from_slice(&xsdt_addr.to_le_bytes());
        data
    }

    #[test]
    fn reads_xsdt_address() {
        let data = synthetic_rsdp(0x7FFE_1000);
        let rsdp = Rsdp::read_from_bytes(&data).unwrap();
        assert_eq!(rsdp.signature, *Rsdp::SIGNATURE);
        assert_eq!(rsdp.revision, 2);
        assert_eq!(rsdp.rsdt_address, 0xDEAD_0000);
        assert_eq!(rsdp.xsdt_address(), 0x7FFE_1000);
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert!(Rsdp::read_from_bytes(&[0u8; 20]).is_none());
    }
}
