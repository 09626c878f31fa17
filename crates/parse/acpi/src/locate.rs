//! Locating the FADT among the XSDT entries.

use crate::AcpiHandler;
use crate::fadt::FADT_SIGNATURE;
use crate::sdt::SdtHeader;
use crate::xsdt::XsdtView;

/// Scan the XSDT entry array for the FADT and return its physical address.
///
/// Each entry is dereferenced as an SDT header and its signature compared
/// against `FACP`. The scan does not stop at the first hit: when multiple
/// entries carry the FADT signature, the **last** one in array order wins.
///
/// Returns `None` when no entry matches; callers degrade DSDT substitution
/// rather than failing the run.
pub fn find_fadt<H: AcpiHandler>(handler: &H, xsdt: &XsdtView<'_>) -> Option<u64> {
    let mut found = None;
    for entry_phys in xsdt.entries() {
        // SAFETY: entry_phys comes from the XSDT entry array, which the
        // firmware populated with valid table addresses.
        let candidate_data = unsafe { handler.map_physical_region(entry_phys, SdtHeader::SIZE) };
        if let Some(candidate) = SdtHeader::read_from_bytes(candidate_data) {
            if &candidate.signature == FADT_SIGNATURE {
                found = Some(entry_phys);
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::boxed::Box;
    use std::collections::BTreeMap;
    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::sdt::SdtHeader;

    /// Test handler backed by a map of leaked synthetic tables.
    struct MapHandler {
        regions: BTreeMap<u64, &'static [u8]>,
    }

    unsafe impl AcpiHandler for MapHandler {
        unsafe fn map_physical_region(&self, phys: u64, _size: usize) -> &'static [u8] {
            self.regions.get(&phys).copied().unwrap_or(&[0u8; 36])
        }
    }

    fn leak_table(signature: &[u8; 4]) -> &'static [u8] {
        let mut data = vec![0u8; SdtHeader::SIZE];
        data[..4].copy_from_slice(signature);
        data[4..8].copy_from_slice(&(SdtHeader::SIZE as u32).to_le_bytes());
        Box::leak(data.into_boxed_slice())
    }

    fn xsdt_with_entries(entries: &[u64]) -> Vec<u8> {
        let length = SdtHeader::SIZE + 8 * entries.len();
        let mut data = vec![0u8; length];
        data[..4].copy_from_slice(b"XSDT");
        data[4..8].copy_from_slice(&(length as u32).to_le_bytes());
        for (i, addr) in entries.iter().enumerate() {
            let off = SdtHeader::SIZE + 8 * i;
            data[off..off + 8].copy_from_slice(&addr.to_le_bytes());
        }
        data
    }

    #[test]
    fn finds_single_fadt() {
        let mut regions = BTreeMap::new();
        regions.insert(0x1000, leak_table(b"APIC"));
        regions.insert(0x2000, leak_table(b"FACP"));
        regions.insert(0x3000, leak_table(b"HPET"));
        let handler = MapHandler { regions };

        let mut data = xsdt_with_entries(&[0x1000, 0x2000, 0x3000]);
        let xsdt = XsdtView::new(&mut data, 0).unwrap();
        assert_eq!(find_fadt(&handler, &xsdt), Some(0x2000));
    }

    #[test]
    fn last_fadt_wins_when_duplicated() {
        let mut regions = BTreeMap::new();
        regions.insert(0x1000, leak_table(b"FACP"));
        regions.insert(0x2000, leak_table(b"APIC"));
        regions.insert(0x3000, leak_table(b"FACP"));
        let handler = MapHandler { regions };

        let mut data = xsdt_with_entries(&[0x1000, 0x2000, 0x3000]);
        let xsdt = XsdtView::new(&mut data, 0).unwrap();
        assert_eq!(find_fadt(&handler, &xsdt), Some(0x3000));
    }

    #[test]
    fn absent_fadt_yields_none() {
        let mut regions = BTreeMap::new();
        regions.insert(0x1000, leak_table(b"APIC"));
        let handler = MapHandler { regions };

        let mut data = xsdt_with_entries(&[0x1000]);
        let xsdt = XsdtView::new(&mut data, 0).unwrap();
        assert_eq!(find_fadt(&handler, &xsdt), None);
    }

    #[test]
    fn empty_xsdt_yields_none() {
        let handler = MapHandler {
            regions: BTreeMap::new(),
        };
        let mut data = xsdt_with_entries(&[]);
        let xsdt = XsdtView::new(&mut data, 0).unwrap();
        assert_eq!(find_fadt(&handler, &xsdt), None);
    }
}
