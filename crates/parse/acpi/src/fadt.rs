//! FADT view: the fixed-configuration table holding the DSDT references.
//!
//! The Fixed ACPI Description Table carries two references to the DSDT: a
//! legacy 32-bit physical address at byte offset 40 and a 64-bit extended
//! address at byte offset 140 (ACPI 2.0+). Substituting the DSDT means
//! overwriting both fields with the address of the replacement blob --- the
//! legacy field receives the truncated low 32 bits --- and recomputing the
//! table checksum afterwards.

use amlpatch_binparse::{FromBytes, IntoBytes};

use crate::PatchError;
use crate::sdt::{self, SdtHeader};

/// FADT table signature.
pub const FADT_SIGNATURE: &[u8; 4] = b"FACP";

/// Byte offset of the legacy 32-bit DSDT address within the FADT.
const DSDT_OFFSET: usize = 40;

/// Byte offset of the 64-bit `X_DSDT` address within the FADT (ACPI 2.0+).
const X_DSDT_OFFSET: usize = 140;

/// Minimum FADT length required to hold both DSDT reference fields.
const MIN_LENGTH: usize = X_DSDT_OFFSET + 8;

/// Mutable view over a mapped FADT.
pub struct FadtView<'a> {
    /// Byte slice covering the table's declared length.
    data: &'a mut [u8],
}

impl<'a> FadtView<'a> {
    /// Create a view over a mapped FADT.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::TruncatedTable`] if the slice is shorter than
    /// its declared length, or if the table predates ACPI 2.0 and cannot
    /// hold the extended DSDT field.
    pub fn new(data: &'a mut [u8]) -> Result<Self, PatchError> {
        let header = SdtHeader::read_from_bytes(data).ok_or(PatchError::TruncatedTable)?;
        let length = header.length as usize;
        if length < MIN_LENGTH || data.len() < length {
            return Err(PatchError::TruncatedTable);
        }
        Ok(Self { data })
    }

    /// Returns the table's declared total length in bytes.
    #[must_use]
    pub fn length(&self) -> u32 {
        u32::read_at(self.data, SdtHeader::LENGTH_OFFSET).unwrap_or(0)
    }

    /// Returns the legacy 32-bit DSDT address field.
    #[must_use]
    pub fn dsdt(&self) -> u32 {
        u32::read_at(self.data, DSDT_OFFSET).unwrap_or(0)
    }

    /// Returns the 64-bit `X_DSDT` address field.
    #[must_use]
    pub fn x_dsdt(&self) -> u64 {
        u64::read_at(self.data, X_DSDT_OFFSET).unwrap_or(0)
    }

    /// Point both DSDT reference fields at a replacement blob.
    ///
    /// The legacy field receives the truncated low 32 bits of `addr`, the
    /// extended field the full address. The XSDT is not involved in this
    /// operation.
    pub fn set_dsdt_address(&mut self, addr: u64) {
        // Both offsets are inside the view (checked in `new`).
        #[expect(clippy::cast_possible_truncation, reason = "legacy field is defined as the low 32 bits")]
        let _ = (addr as u32).write_at(self.data, DSDT_OFFSET);
        let _ = addr.write_at(self.data, X_DSDT_OFFSET);
    }

    /// Recompute the table checksum over the declared length.
    pub fn recompute_checksum(&mut self) -> u8 {
        let length = self.length() as usize;
        sdt::recompute_checksum(&mut self.data[..length])
    }

    /// Returns the table bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.data
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::sdt::validate_checksum;

    fn synthetic_fadt() -> Vec<u8> {
        let mut data = vec![0u8; MIN_LENGTH];
        data[..4].copy_from_slice(FADT_SIGNATURE);
        data[4..8].copy_from_slice(&(MIN_LENGTH as u32).to_le_bytes());
        data[8] = 4;
        data
    }

    #[test]
    fn dsdt_substitution_writes_both_fields() {
        let mut data = synthetic_fadt();
        let mut fadt = FadtView::new(&mut data).unwrap();
        fadt.set_dsdt_address(0x0001_2345_6789_A000);
        assert_eq!(fadt.dsdt(), 0x6789_A000);
        assert_eq!(fadt.x_dsdt(), 0x0001_2345_6789_A000);
    }

    #[test]
    fn checksum_valid_after_substitution() {
        let mut data = synthetic_fadt();
        let mut fadt = FadtView::new(&mut data).unwrap();
        fadt.set_dsdt_address(0xFFFF_FFFF_FFFF_FFFF);
        fadt.recompute_checksum();
        assert!(validate_checksum(fadt.as_bytes()));
    }

    #[test]
    fn pre_acpi2_table_is_rejected() {
        // Declared length 116: no room for the extended DSDT field.
        let mut data = vec![0u8; 116];
        data[..4].copy_from_slice(FADT_SIGNATURE);
        data[4..8].copy_from_slice(&116u32.to_le_bytes());
        assert!(matches!(
            FadtView::new(&mut data),
            Err(PatchError::TruncatedTable)
        ));
    }
}
