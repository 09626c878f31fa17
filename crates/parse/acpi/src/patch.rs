//! The patch engine: consumes candidate blobs and mutates the tables.
//!
//! The engine drives a [`BlobSource`] (the environment-specific collaborator
//! that enumerates and loads candidate files), classifies each candidate by
//! name, and applies the result: DSDT substitution through the FADT view,
//! or an XSDT append. Checksums for both mutated tables are recomputed once
//! the blob stream is exhausted.
//!
//! Two failure policies coexist here by design and must not be unified: an
//! enumeration or load failure aborts the whole run fail-fast (later table
//! consistency depends on not continuing past a corrupt read), while a
//! missing FADT merely degrades DSDT substitution and never fails the run.

use planck_noalloc::vec::ArrayVec;

use crate::PatchError;
use crate::classify::{Classification, classify};
use crate::fadt::FadtView;
use crate::xsdt::XsdtView;

/// Maximum candidate name length in bytes.
///
/// FAT long names carry at most 255 UCS-2 characters, each of which can
/// encode to three UTF-8 bytes, so any legal directory entry fits.
const NAME_CAPACITY: usize = 765;

/// Error returned when a candidate name exceeds [`BlobName`] capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTooLong;

/// Fixed-capacity, UTF-8 candidate file name.
///
/// Built up character by character while decoding the environment's native
/// name encoding (UCS-2 for UEFI directory entries); no allocation.
#[derive(Default)]
pub struct BlobName {
    bytes: ArrayVec<u8, NAME_CAPACITY>,
}

impl BlobName {
    /// Creates an empty name.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: ArrayVec::new(),
        }
    }

    /// Append one character.
    ///
    /// # Errors
    ///
    /// Returns [`NameTooLong`] if the encoded character does not fit; the
    /// name is left unchanged in that case.
    pub fn try_push(&mut self, ch: char) -> Result<(), NameTooLong> {
        let mut utf8 = [0u8; 4];
        let encoded = ch.encode_utf8(&mut utf8);
        if self.bytes.len() + encoded.len() > NAME_CAPACITY {
            return Err(NameTooLong);
        }
        for &byte in encoded.as_bytes() {
            self.bytes.push(byte);
        }
        Ok(())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Bytes only ever enter through `try_push`, which appends whole
        // UTF-8 encoded characters, so this cannot fail.
        core::str::from_utf8(self.bytes.as_slice()).unwrap_or("")
    }
}

impl From<&str> for BlobName {
    /// Builds a name from a string, truncating at capacity on whole-character
    /// boundaries.
    fn from(s: &str) -> Self {
        let mut name = Self::new();
        for ch in s.chars() {
            if name.try_push(ch).is_err() {
                break;
            }
        }
        name
    }
}

impl core::fmt::Display for BlobName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate blob as yielded by enumeration: name plus declared size.
pub struct BlobInfo {
    /// The candidate's file name.
    pub name: BlobName,
    /// The file's declared size in bytes (the load allocation size).
    pub size: u64,
}

impl BlobInfo {
    /// Returns the candidate's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A loaded blob: a permanently allocated buffer described by address.
///
/// The referencing pointer written into the XSDT or FADT outlives the
/// enumeration loop, so the buffer behind `addr` must never be freed for
/// the remainder of the boot session.
#[derive(Debug, Clone, Copy)]
pub struct LoadedBlob {
    /// Physical address of the buffer holding the blob.
    pub addr: u64,
    /// Length of the blob in bytes.
    pub len: u64,
}

/// Collaborator contract: enumerate and load candidate blobs.
///
/// Enumeration is finite and not restartable; the engine calls
/// [`next_entry`] until it yields `None`. [`load`] is only invoked for
/// candidates that classification did not skip.
///
/// [`next_entry`]: BlobSource::next_entry
/// [`load`]: BlobSource::load
pub trait BlobSource {
    /// Advance to the next candidate, or `None` when exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Io`] when the underlying enumeration fails.
    fn next_entry(&mut self) -> Result<Option<BlobInfo>, PatchError>;

    /// Load a candidate into a permanently owned buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Io`] when the file cannot be opened or read.
    fn load(&mut self, info: &BlobInfo) -> Result<LoadedBlob, PatchError>;
}

/// Outcome of a patch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchResult {
    /// Number of pointer-table entries appended.
    pub inserted: usize,
    /// Whether the DSDT references in the FADT were substituted.
    pub dsdt_replaced: bool,
    /// The error that aborted the run, if any. Fail-fast semantics mean at
    /// most one error is ever recorded; when set, already-applied mutations
    /// remain in place and checksums have **not** been recomputed.
    pub error: Option<PatchError>,
}

impl PatchResult {
    /// Returns `true` when the run completed without aborting.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn abort(mut self, error: PatchError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Run the patch engine over a blob stream.
///
/// For each candidate yielded by `source`: classify by name; skip without
/// loading, substitute the DSDT (when a FADT is present --- otherwise the
/// candidate is loaded but the substitution is silently skipped), or append
/// to the XSDT. After the stream is exhausted, checksums are recomputed for
/// the FADT (if present) and unconditionally for the XSDT.
///
/// An empty stream is legal: nothing is inserted and the checksum recompute
/// still runs (idempotent on an untouched table). Any enumeration or load
/// failure aborts the run immediately; the returned [`PatchResult`] then
/// reflects the mutations applied up to that point, with stale checksums.
pub fn patch_tables<S: BlobSource>(
    xsdt: &mut XsdtView<'_>,
    mut fadt: Option<&mut FadtView<'_>>,
    source: &mut S,
) -> PatchResult {
    let mut result = PatchResult::default();

    loop {
        let info = match source.next_entry() {
            Ok(Some(info)) => info,
            Ok(None) => break,
            Err(error) => return result.abort(error),
        };

        match classify(info.name()) {
            Classification::Skip => {}
            Classification::ReplaceDsdt => {
                let blob = match source.load(&info) {
                    Ok(blob) => blob,
                    Err(error) => return result.abort(error),
                };
                // Without a FADT there is nothing to point at the new DSDT;
                // degrade this one feature instead of failing the run.
                if let Some(fadt) = fadt.as_deref_mut() {
                    fadt.set_dsdt_address(blob.addr);
                    result.dsdt_replaced = true;
                }
            }
            Classification::Append => {
                let blob = match source.load(&info) {
                    Ok(blob) => blob,
                    Err(error) => return result.abort(error),
                };
                if let Err(error) = xsdt.append(blob.addr) {
                    return result.abort(error);
                }
                result.inserted += 1;
            }
        }
    }

    if let Some(fadt) = fadt.as_deref_mut() {
        fadt.recompute_checksum();
    }
    xsdt.recompute_checksum();

    result
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::String;
    use std::string::ToString;
    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::sdt::{SdtHeader, validate_checksum};

    /// Scripted blob source: a list of (name, address) pairs, an optional
    /// load to fail on, and a record of every load performed.
    struct MockSource {
        entries: Vec<(&'static str, u64)>,
        next: usize,
        fail_load: Option<usize>,
        loads: Vec<String>,
    }

    impl MockSource {
        fn new(entries: &[(&'static str, u64)]) -> Self {
            Self {
                entries: entries.to_vec(),
                next: 0,
                fail_load: None,
                loads: Vec::new(),
            }
        }

        fn failing_on_load(entries: &[(&'static str, u64)], nth: usize) -> Self {
            let mut source = Self::new(entries);
            source.fail_load = Some(nth);
            source
        }
    }

    impl BlobSource for MockSource {
        fn next_entry(&mut self) -> Result<Option<BlobInfo>, PatchError> {
            let Some(&(name, _)) = self.entries.get(self.next) else {
                return Ok(None);
            };
            self.next += 1;
            Ok(Some(BlobInfo {
                name: BlobName::from(name),
                size: 64,
            }))
        }

        fn load(&mut self, info: &BlobInfo) -> Result<LoadedBlob, PatchError> {
            self.loads.push(info.name().to_string());
            if self.fail_load == Some(self.loads.len()) {
                return Err(PatchError::Io);
            }
            let addr = self
                .entries
                .iter()
                .find(|(name, _)| *name == info.name())
                .map_or(0, |&(_, addr)| addr);
            Ok(LoadedBlob {
                addr,
                len: info.size,
            })
        }
    }

    /// Enumeration that fails outright on the first entry.
    struct BrokenEnumeration;

    impl BlobSource for BrokenEnumeration {
        fn next_entry(&mut self) -> Result<Option<BlobInfo>, PatchError> {
            Err(PatchError::Io)
        }

        fn load(&mut self, _info: &BlobInfo) -> Result<LoadedBlob, PatchError> {
            unreachable!("load must not be called when enumeration fails")
        }
    }

    fn synthetic_xsdt(slack: usize) -> Vec<u8> {
        let mut data = vec![0u8; SdtHeader::SIZE + slack];
        data[..4].copy_from_slice(b"XSDT");
        data[4..8].copy_from_slice(&(SdtHeader::SIZE as u32).to_le_bytes());
        data[8] = 1;
        crate::sdt::recompute_checksum(&mut data[..SdtHeader::SIZE]);
        data
    }

    fn synthetic_fadt() -> Vec<u8> {
        let mut data = vec![0u8; 148];
        data[..4].copy_from_slice(b"FACP");
        data[4..8].copy_from_slice(&148u32.to_le_bytes());
        data[8] = 4;
        crate::sdt::recompute_checksum(&mut data);
        data
    }

    #[test]
    fn appends_in_enumeration_order() {
        let mut data = synthetic_xsdt(64);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        let mut source = MockSource::new(&[
            ("SSDT1.aml", 0x1000),
            ("SSDT2.aml", 0x2000),
            ("SSDT3.aml", 0x3000),
        ]);

        let result = patch_tables(&mut xsdt, None, &mut source);

        assert!(result.is_ok());
        assert_eq!(result.inserted, 3);
        assert!(!result.dsdt_replaced);
        assert_eq!(xsdt.length(), 36 + 8 * 3);
        assert_eq!(
            xsdt.entries().collect::<Vec<_>>(),
            [0x1000, 0x2000, 0x3000]
        );
        assert!(validate_checksum(xsdt.as_bytes()));
    }

    #[test]
    fn two_appends_hit_expected_offsets() {
        // Header length 36, blobs at 0x1000/0x2000: final length 52 with
        // the addresses at offsets 36 and 44 and a zero byte sum.
        let mut data = synthetic_xsdt(16);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        let mut source = MockSource::new(&[("a.aml", 0x1000), ("b.aml", 0x2000)]);

        let result = patch_tables(&mut xsdt, None, &mut source);

        assert_eq!(result.inserted, 2);
        assert_eq!(xsdt.length(), 52);
        assert_eq!(&xsdt.as_bytes()[36..44], &0x1000u64.to_le_bytes());
        assert_eq!(&xsdt.as_bytes()[44..52], &0x2000u64.to_le_bytes());
        assert!(validate_checksum(xsdt.as_bytes()));
    }

    #[test]
    fn dsdt_blob_substitutes_without_touching_xsdt() {
        let mut xsdt_data = synthetic_xsdt(64);
        let mut fadt_data = synthetic_fadt();
        let mut xsdt = XsdtView::new(&mut xsdt_data, 0).unwrap();
        let mut fadt = FadtView::new(&mut fadt_data).unwrap();
        let mut source = MockSource::new(&[("DSDT.aml", 0x0001_2345_6000_0000)]);

        let result = patch_tables(&mut xsdt, Some(&mut fadt), &mut source);

        assert!(result.is_ok());
        assert!(result.dsdt_replaced);
        assert_eq!(result.inserted, 0);
        assert_eq!(xsdt.length(), 36);
        assert_eq!(fadt.dsdt(), 0x6000_0000);
        assert_eq!(fadt.x_dsdt(), 0x0001_2345_6000_0000);
        assert!(validate_checksum(fadt.as_bytes()));
        assert!(validate_checksum(xsdt.as_bytes()));
    }

    #[test]
    fn missing_fadt_degrades_dsdt_replacement_only() {
        let mut data = synthetic_xsdt(64);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        let mut source = MockSource::new(&[("DSDT.aml", 0x5000), ("SSDT1.aml", 0x6000)]);

        let result = patch_tables(&mut xsdt, None, &mut source);

        assert!(result.is_ok());
        assert!(!result.dsdt_replaced);
        assert_eq!(result.inserted, 1);
        assert_eq!(xsdt.entries().collect::<Vec<_>>(), [0x6000]);
        // The DSDT blob was still loaded; only the substitution was skipped.
        assert_eq!(source.loads, ["DSDT.aml", "SSDT1.aml"]);
    }

    #[test]
    fn skipped_names_are_never_loaded() {
        let mut data = synthetic_xsdt(64);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        let mut source = MockSource::new(&[
            (".hidden.aml", 0x1000),
            ("_backup.aml", 0x2000),
            ("README.txt", 0x3000),
        ]);

        let result = patch_tables(&mut xsdt, None, &mut source);

        assert!(result.is_ok());
        assert_eq!(result.inserted, 0);
        assert!(source.loads.is_empty());
        assert!(validate_checksum(xsdt.as_bytes()));
    }

    #[test]
    fn load_failure_aborts_fail_fast() {
        let mut data = synthetic_xsdt(64);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        // Five appendable blobs; the third load fails.
        let mut source = MockSource::failing_on_load(
            &[
                ("SSDT1.aml", 0x1000),
                ("SSDT2.aml", 0x2000),
                ("SSDT3.aml", 0x3000),
                ("SSDT4.aml", 0x4000),
                ("SSDT5.aml", 0x5000),
            ],
            3,
        );

        let result = patch_tables(&mut xsdt, None, &mut source);

        assert_eq!(result.error, Some(PatchError::Io));
        assert_eq!(result.inserted, 2);
        assert_eq!(xsdt.entries().collect::<Vec<_>>(), [0x1000, 0x2000]);
        // Nothing past the failing blob was touched.
        assert_eq!(source.loads.len(), 3);
        // Checksum recompute is skipped on abort: the table is left with
        // extra valid entries but a stale checksum.
        assert!(!validate_checksum(xsdt.as_bytes()));
    }

    #[test]
    fn enumeration_failure_aborts_before_any_load() {
        let mut data = synthetic_xsdt(64);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();

        let result = patch_tables(&mut xsdt, None, &mut BrokenEnumeration);

        assert_eq!(result.error, Some(PatchError::Io));
        assert_eq!(result.inserted, 0);
    }

    #[test]
    fn pointer_table_full_aborts() {
        // Room for exactly one appended entry.
        let mut data = synthetic_xsdt(8);
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        let mut source = MockSource::new(&[("a.aml", 0x1000), ("b.aml", 0x2000)]);

        let result = patch_tables(&mut xsdt, None, &mut source);

        assert_eq!(result.error, Some(PatchError::PointerTableFull));
        assert_eq!(result.inserted, 1);
        assert_eq!(xsdt.entries().collect::<Vec<_>>(), [0x1000]);
    }

    #[test]
    fn empty_stream_is_legal_and_recomputes_checksum() {
        let mut data = synthetic_xsdt(0);
        // Spoil the checksum so the recompute is observable.
        data[SdtHeader::CHECKSUM_OFFSET] = 0x5A;
        let mut xsdt = XsdtView::new(&mut data, 0).unwrap();
        let mut source = MockSource::new(&[]);

        let result = patch_tables(&mut xsdt, None, &mut source);

        assert!(result.is_ok());
        assert_eq!(result.inserted, 0);
        assert!(!result.dsdt_replaced);
        assert!(validate_checksum(xsdt.as_bytes()));
    }

    #[test]
    fn blob_name_round_trips_and_bounds() {
        let mut name = BlobName::new();
        for ch in "SSDT1.aml".chars() {
            name.try_push(ch).unwrap();
        }
        assert_eq!(name.as_str(), "SSDT1.aml");

        let long = "x".repeat(800);
        let truncated = BlobName::from(long.as_str());
        assert_eq!(truncated.as_str().len(), 765);

        let mut full = BlobName::from(long.as_str());
        assert_eq!(full.try_push('y'), Err(NameTooLong));
        assert_eq!(full.as_str().len(), 765);
    }

    #[test]
    fn blob_name_holds_max_length_fat_names() {
        // A FAT long name maxes out at 255 UCS-2 characters; even when each
        // one needs three UTF-8 bytes, the name must fit without truncation.
        let mut name = BlobName::new();
        for _ in 0..255 {
            name.try_push('\u{20AC}').unwrap();
        }
        assert_eq!(name.as_str().chars().count(), 255);
        assert_eq!(name.as_str().len(), 765);
    }
}
