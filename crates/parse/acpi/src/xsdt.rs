//! XSDT view: the extensible pointer table the patcher grows.
//!
//! The Extended System Description Table is an SDT header immediately
//! followed by a tightly packed array of 8-byte little-endian absolute
//! addresses, each pointing to another description table. Appending a new
//! table writes one address at offset `length` from the table base and then
//! grows the `length` field by 8; the next append derives its end offset
//! from the updated length.
//!
//! The view spans the current table *plus* the growth capacity reserved
//! after it, so every append is bounds-checked instead of writing into
//! whatever happens to follow the table in memory. The table's own checksum
//! is not validated before mutation; it is recomputed at the end of a
//! successful run.

use amlpatch_binparse::{FromBytes, IntoBytes};

use crate::PatchError;
use crate::sdt::{self, SdtHeader};

/// Size in bytes of a single table-pointer entry in the XSDT.
pub const ENTRY_SIZE: usize = 8;

/// Mutable view over a mapped XSDT and its reserved growth capacity.
pub struct XsdtView<'a> {
    /// Byte slice covering the table and the growth slack after it.
    data: &'a mut [u8],
    /// Physical address of the table base (what appended entries are
    /// relative to in the platform's address space).
    base: u64,
}

impl<'a> XsdtView<'a> {
    /// Create a view over a mapped XSDT.
    ///
    /// `data` must start at the table base and extend to the end of the
    /// reserved growth capacity; `base` is the table's physical address.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::TruncatedTable`] if `data` cannot hold an SDT
    /// header or is shorter than the table's declared length.
    pub fn new(data: &'a mut [u8], base: u64) -> Result<Self, PatchError> {
        let header = SdtHeader::read_from_bytes(data).ok_or(PatchError::TruncatedTable)?;
        if (header.length as usize) < SdtHeader::SIZE || data.len() < header.length as usize {
            return Err(PatchError::TruncatedTable);
        }
        Ok(Self { data, base })
    }

    /// Returns the table's physical base address.
    #[must_use]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Returns the table's declared total length in bytes (header included).
    #[must_use]
    pub fn length(&self) -> u32 {
        // The length field was bounds-checked in `new` and only ever grows
        // within the view, so the read cannot fail.
        u32::read_at(self.data, SdtHeader::LENGTH_OFFSET).unwrap_or(0)
    }

    /// Returns the number of 8-byte pointer entries currently in the table.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        (self.length() as usize - SdtHeader::SIZE) / ENTRY_SIZE
    }

    /// Returns the total capacity of the view in bytes, table plus slack.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns an iterator over the entry physical addresses, in table order.
    pub fn entries(&self) -> EntryIter<'_> {
        EntryIter {
            data: &self.data[SdtHeader::SIZE..self.length() as usize],
            offset: 0,
        }
    }

    /// Append a table address to the end of the entry array.
    ///
    /// Writes the 8-byte little-endian address at the current end offset
    /// (`base + length`) and grows the length field by 8, so the next append
    /// sees the updated end.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::PointerTableFull`] when the write would extend
    /// past the reserved capacity. The table is left unchanged in that case.
    pub fn append(&mut self, table_addr: u64) -> Result<(), PatchError> {
        let end = self.length() as usize;
        if table_addr
            .write_at(self.data, end)
            .is_none()
        {
            return Err(PatchError::PointerTableFull);
        }
        let new_length = self.length() + ENTRY_SIZE as u32;
        // Offset 4 is always inside the view (checked in `new`).
        let _ = new_length.write_at(self.data, SdtHeader::LENGTH_OFFSET);
        Ok(())
    }

    /// Recompute the table checksum over the declared length.
    ///
    /// Called once, after all appends for the run are complete.
    pub fn recompute_checksum(&mut self) -> u8 {
        let length = self.length() as usize;
        sdt::recompute_checksum(&mut self.data[..length])
    }

    /// Returns the table bytes (declared length only, no slack).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.length() as usize]
    }
}

/// Iterator over XSDT entry physical addresses.
pub struct EntryIter<'a> {
    /// Byte slice covering all entries.
    data: &'a [u8],
    /// Current offset (in bytes) from the start of `data`.
    offset: usize,
}

impl Iterator for EntryIter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let addr = u64::read_at(self.data, self.offset)?;
        self.offset += ENTRY_SIZE;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().saturating_sub(self.offset) / ENTRY_SIZE;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EntryIter<'_> {}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::sdt::validate_checksum;

    /// Header-only XSDT (0 entries) with `slack` bytes of growth capacity.
    fn synthetic_xsdt(slack: usize) -> Vec<u8> {
        let mut data = vec![0u8; SdtHeader::SIZE + slack];
        data[..4].copy_from_slice(b"XSDT");
        data[4..8].copy_from_slice(&(SdtHeader::SIZE as u32).to_le_bytes());
        data[8] = 1;
        data
    }

    #[test]
    fn append_grows_length_and_stores_address() {
        let mut data = synthetic_xsdt(64);
        let mut xsdt = XsdtView::new(&mut data, 0x7000_0000).unwrap();
        assert_eq!(xsdt.length(), 36);
        assert_eq!(xsdt.entry_count(), 0);

        xsdt.append(0x1000).unwrap();
        xsdt.append(0x2000).unwrap();

        assert_eq!(xsdt.length(), 52);
        assert_eq!(xsdt.entry_count(), 2);
        let entries: Vec<u64> = xsdt.entries().collect();
        assert_eq!(entries, [0x1000, 0x2000]);

        // Bit-exact placement: offsets 36 and 44 from the base.
        assert_eq!(&xsdt.as_bytes()[36..44], &0x1000u64.to_le_bytes());
        assert_eq!(&xsdt.as_bytes()[44..52], &0x2000u64.to_le_bytes());
    }

    #[test]
    fn append_checksum_scenario() {
        // Header length 36, two blobs at 0x1000 and 0x2000: final length 52,
        // checksum byte makes the whole structure sum to zero.
        let mut data = synthetic_xsdt(16);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        xsdt.append(0x1000).unwrap();
        xsdt.append(0x2000).unwrap();
        xsdt.recompute_checksum();
        assert_eq!(xsdt.length(), 52);
        assert!(validate_checksum(xsdt.as_bytes()));
    }

    #[test]
    fn append_past_capacity_fails_cleanly() {
        let mut data = synthetic_xsdt(8);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        xsdt.append(0xAAAA).unwrap();
        assert_eq!(xsdt.append(0xBBBB), Err(PatchError::PointerTableFull));
        // Length unchanged by the failed append.
        assert_eq!(xsdt.length(), 44);
        assert_eq!(xsdt.entries().collect::<Vec<_>>(), [0xAAAA]);
    }

    #[test]
    fn view_shorter_than_declared_length_is_rejected() {
        let mut data = synthetic_xsdt(0);
        data[4..8].copy_from_slice(&100u32.to_le_bytes());
        assert!(matches!(
            XsdtView::new(&mut data, 0),
            Err(PatchError::TruncatedTable)
        ));
    }

    #[test]
    fn entry_iterator_reads_existing_entries() {
        let mut data = synthetic_xsdt(24);
        data[4..8].copy_from_slice(&52u32.to_le_bytes());
        data[36..44].copy_from_slice(&0xDEAD_BEEFu64.to_le_bytes());
        data[44..52].copy_from_slice(&0xCAFE_F00Du64.to_le_bytes());
        let xsdt = XsdtView::new(&mut data, 0).unwrap();
        let entries: Vec<u64> = xsdt.entries().collect();
        assert_eq!(entries, [0xDEAD_BEEF, 0xCAFE_F00D]);
        assert_eq!(xsdt.entries().len(), 2);
    }
}
