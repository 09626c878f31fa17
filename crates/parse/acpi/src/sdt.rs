//! System Description Table (SDT) header and checksum engine.

use amlpatch_binparse::FromBytes;

/// Standard ACPI System Description Table header.
///
/// This 36-byte header is present at the start of every ACPI table. The
/// patcher only interprets the fields it needs; the OEM and creator fields
/// (bytes 10..36) participate in checksums but are never read individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdtHeader {
    /// 4-byte ASCII signature identifying the table type.
    pub signature: [u8; 4],
    /// Total length of the table, including the header, in bytes.
    pub length: u32,
    /// Revision of the table structure.
    pub revision: u8,
    /// Checksum byte. The entire table, including the header, must sum to
    /// zero mod 256.
    pub checksum: u8,
}

impl SdtHeader {
    /// The size of an SDT header in bytes.
    pub const SIZE: usize = 36;

    /// Byte offset of the `length` field.
    pub const LENGTH_OFFSET: usize = 4;

    /// Byte offset of the `checksum` field.
    pub const CHECKSUM_OFFSET: usize = 9;

    /// Read an [`SdtHeader`] from the start of a byte slice.
    ///
    /// Returns `None` if the slice is shorter than [`SdtHeader::SIZE`].
    #[must_use]
    pub fn read_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            signature: <[u8; 4]>::read_at(data, 0)?,
            length: u32::read_at(data, Self::LENGTH_OFFSET)?,
            revision: u8::read_at(data, 8)?,
            checksum: u8::read_at(data, Self::CHECKSUM_OFFSET)?,
        })
    }
}

/// Validate the checksum of a byte slice.
///
/// ACPI tables are designed so that the sum of all bytes in the table,
/// across the length declared in the table's own header, equals zero
/// (mod 256). The caller passes exactly that many bytes.
#[must_use]
pub fn validate_checksum(data: &[u8]) -> bool {
    let mut sum: u8 = 0;
    for &byte in data {
        sum = sum.wrapping_add(byte);
    }
    sum == 0
}

/// Recompute and store the checksum byte of a mutated structure.
///
/// Zeroes the checksum byte first, sums all bytes mod 256, then stores the
/// negated sum so the full-structure total becomes zero. Must be called once
/// per structure after all mutations to it are complete; the caller passes
/// exactly the structure's declared length of bytes. Returns the stored
/// checksum byte.
///
/// Slices shorter than the header checksum offset are left untouched and
/// yield `0`.
pub fn recompute_checksum(data: &mut [u8]) -> u8 {
    if data.len() <= SdtHeader::CHECKSUM_OFFSET {
        return 0;
    }
    data[SdtHeader::CHECKSUM_OFFSET] = 0;
    let mut sum: u8 = 0;
    for &byte in data.iter() {
        sum = sum.wrapping_add(byte);
    }
    let checksum = sum.wrapping_neg();
    data[SdtHeader::CHECKSUM_OFFSET] = checksum;
    checksum
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use super::*;

    /// Builds a minimal table: 36-byte header with the given signature and
    /// declared length, zero-filled body.
    fn synthetic_table(signature: &[u8; 4], length: u32) -> std::vec::Vec<u8> {
        let mut data = vec![0u8; length as usize];
        data[..4].copy_from_slice(signature);
        data[4..8].copy_from_slice(&length.to_le_bytes());
        data[8] = 1; // revision
        data
    }

    #[test]
    fn header_round_trip() {
        let data = synthetic_table(b"XSDT", 52);
        let header = SdtHeader::read_from_bytes(&data).unwrap();
        assert_eq!(header.signature, *b"XSDT");
        assert_eq!(header.length, 52);
        assert_eq!(header.revision, 1);
        assert_eq!(header.checksum, 0);
    }

    #[test]
    fn header_too_short() {
        assert_eq!(SdtHeader::read_from_bytes(&[0u8; 35]), None);
    }

    #[test]
    fn recompute_yields_zero_sum() {
        let mut data = synthetic_table(b"FACP", 148);
        data[40] = 0xAB; // arbitrary body content
        data[141] = 0x07;
        recompute_checksum(&mut data);
        assert!(validate_checksum(&data));
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut data = synthetic_table(b"XSDT", 44);
        data[36..44].copy_from_slice(&0x1000u64.to_le_bytes());
        let first = recompute_checksum(&mut data);
        let second = recompute_checksum(&mut data);
        assert_eq!(first, second);
        assert!(validate_checksum(&data));
    }

    #[test]
    fn recompute_overwrites_stale_checksum() {
        let mut data = synthetic_table(b"XSDT", 36);
        data[SdtHeader::CHECKSUM_OFFSET] = 0x5A; // stale garbage
        recompute_checksum(&mut data);
        assert!(validate_checksum(&data));
    }
}
