//! UEFI memory allocation types.

/// Specifies the type of allocation to perform in `AllocatePages`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfiAllocateType {
    /// Allocate any available range of pages that satisfies the request.
    AllocateAnyPages = 0,
    /// Allocate any range whose uppermost address is at or below the given
    /// address.
    AllocateMaxAddress = 1,
    /// Allocate pages at the specified address.
    AllocateAddress = 2,
}

/// The type of a memory region, as used by the allocation services and the
/// memory map.
///
/// Loaded table blobs are placed in [`AcpiReclaimMemory`] so the operating
/// system treats them like the firmware's own ACPI tables.
///
/// [`AcpiReclaimMemory`]: EfiMemoryType::AcpiReclaimMemory
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfiMemoryType {
    /// Not usable.
    ReservedMemoryType = 0,
    /// The code portions of a loaded UEFI application.
    LoaderCode = 1,
    /// The data portions of a loaded UEFI application.
    LoaderData = 2,
    /// The code portions of a loaded UEFI Boot Services Driver.
    BootServicesCode = 3,
    /// The data portions of a loaded UEFI Boot Services Driver.
    BootServicesData = 4,
    /// The code portions of a loaded UEFI Runtime Services Driver.
    RuntimeServicesCode = 5,
    /// The data portions of a loaded UEFI Runtime Services Driver.
    RuntimeServicesData = 6,
    /// Free (unallocated) memory.
    ConventionalMemory = 7,
    /// Memory in which errors have been detected.
    UnusableMemory = 8,
    /// Memory that holds the ACPI tables; reclaimable by the OS once it has
    /// consumed them.
    AcpiReclaimMemory = 9,
    /// Address space reserved for use by the firmware.
    AcpiMemoryNvs = 10,
    /// Memory-mapped I/O region.
    MemoryMappedIO = 11,
    /// Memory-mapped I/O port space.
    MemoryMappedIOPortSpace = 12,
    /// Address space reserved by the firmware for processor code.
    PalCode = 13,
    /// Byte-addressable non-volatile memory.
    PersistentMemory = 14,
    /// Memory not yet accepted from the isolation architecture.
    UnacceptedMemoryType = 15,
}
