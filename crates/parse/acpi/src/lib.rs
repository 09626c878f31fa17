//! `amlpatch-acpi` --- the ACPI table-patching core.
//!
//! This crate implements the engine that augments a firmware-provided ACPI
//! table set at boot time: appending externally supplied table blobs to the
//! XSDT and substituting the DSDT reference held by the FADT. It operates
//! on mutable byte-slice views of the mapped tables rather than raw
//! pointers, so every table access is bounds-checked against the mapping,
//! and the whole engine is testable on the host against synthetic tables.
//!
//! The crate does **not** depend on `alloc`; candidate names are carried in
//! fixed-capacity buffers and loaded blobs are described by their permanent
//! physical address. Environment-specific concerns (directory enumeration,
//! file loading, console output) reach the engine through the
//! [`BlobSource`] trait.
//!
//! # Usage
//!
//! ```ignore
//! let mut xsdt = XsdtView::new(xsdt_bytes, xsdt_phys)?;
//! let fadt_phys = locate::find_fadt(&handler, &xsdt);
//! let result = patch::patch_tables(&mut xsdt, fadt.as_mut(), &mut source);
//! ```

#![no_std]
#![warn(missing_docs)]

pub mod classify;
pub mod fadt;
pub mod locate;
pub mod patch;
pub mod rsdp;
pub mod sdt;
pub mod xsdt;

// Re-export key types at crate root for convenience.
pub use classify::{Classification, classify};
pub use fadt::FadtView;
pub use patch::{BlobInfo, BlobName, BlobSource, LoadedBlob, PatchResult};
pub use rsdp::Rsdp;
pub use sdt::SdtHeader;
pub use xsdt::XsdtView;

/// Errors that can abort a patch run.
///
/// The taxonomy distinguishes failures by the stage they occur in, because
/// that determines what state the tables are left in: [`RsdpMissing`] and
/// [`DirectoryResolution`] fire before any mutation, while [`Io`] and
/// [`PointerTableFull`] abort mid-run and leave already-applied mutations
/// in place with checksums *not* recomputed.
///
/// A missing FADT is deliberately **not** represented here: it only
/// degrades DSDT replacement and never fails a run.
///
/// [`RsdpMissing`]: PatchError::RsdpMissing
/// [`DirectoryResolution`]: PatchError::DirectoryResolution
/// [`Io`]: PatchError::Io
/// [`PointerTableFull`]: PatchError::PointerTableFull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    /// The configuration-table registry holds no ACPI 2.0 root pointer.
    /// Fatal; nothing can be located without it.
    RsdpMissing,
    /// The directory holding candidate blobs could not be resolved or
    /// opened. Fatal; fires before any table is touched.
    DirectoryResolution,
    /// Enumerating or loading a candidate blob failed. Fatal; the run is
    /// aborted without rolling back mutations already applied.
    Io,
    /// An append would write past the capacity reserved after the XSDT.
    PointerTableFull,
    /// A mapped table was shorter than its own header claims (or too short
    /// to hold a header at all).
    TruncatedTable,
}

impl PatchError {
    /// Human-readable name of the stage this error belongs to.
    #[must_use]
    pub const fn stage(self) -> &'static str {
        match self {
            Self::RsdpMissing => "root pointer lookup",
            Self::DirectoryResolution => "directory resolution",
            Self::Io => "file enumeration/load",
            Self::PointerTableFull => "pointer table append",
            Self::TruncatedTable => "table mapping",
        }
    }
}

impl core::fmt::Display for PatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RsdpMissing => f.write_str("no ACPI 2.0 root pointer in the configuration tables"),
            Self::DirectoryResolution => f.write_str("could not resolve the candidate blob directory"),
            Self::Io => f.write_str("file enumeration or load failed"),
            Self::PointerTableFull => f.write_str("no capacity left after the pointer table"),
            Self::TruncatedTable => f.write_str("mapped table shorter than its declared length"),
        }
    }
}

/// Trait for mapping physical memory regions so table headers can be read.
///
/// The locator dereferences XSDT entries, which are absolute physical
/// addresses. An implementation must return a byte slice covering at least
/// `size` bytes starting at physical address `phys`; in a UEFI boot-services
/// environment this is an identity mapping.
///
/// # Safety
///
/// Implementors must ensure that the returned slice is valid and readable
/// for the requested `size` bytes and remains valid for `'static`.
pub unsafe trait AcpiHandler {
    /// Map a physical memory region and return a byte slice over it.
    ///
    /// # Safety
    ///
    /// The caller guarantees that `phys` is a valid table physical address
    /// and `size` does not extend beyond the actual structure.
    unsafe fn map_physical_region(&self, phys: u64, size: usize) -> &'static [u8];
}
