//! `amlpatch` UEFI application.
//!
//! Augments the firmware's ACPI table set at boot: appends `.aml` table
//! blobs from an `ACPI` directory next to the image to the XSDT, and
//! substitutes the DSDT when a blob named `DSDT.aml` is present. Run it
//! from the EFI shell (or a boot entry) before the OS loader.

#![no_std]
#![no_main]

#[macro_use]
mod log;
mod source;

use amlpatch_acpi::{
    AcpiHandler, FadtView, PatchError, Rsdp, SdtHeader, XsdtView, locate, patch,
};
use amlpatch_uefi::api::SystemTable;
use amlpatch_uefi::{EfiGuid, EfiHandle, EfiStatus, table};

use source::DirBlobSource;

/// Growth capacity reserved after the XSDT's current end, in bytes.
///
/// Appends are bounds-checked against this; 4 KiB holds 512 additional
/// table pointers, far beyond any realistic blob directory.
const XSDT_GROWTH_CAPACITY: usize = 4096;

/// Identity mapping: during boot services, physical addresses are directly
/// dereferenceable.
struct IdentityHandler;

unsafe impl AcpiHandler for IdentityHandler {
    unsafe fn map_physical_region(&self, phys: u64, size: usize) -> &'static [u8] {
        // SAFETY: the caller passes addresses taken from firmware-owned
        // tables, valid for the requested size under the boot-time
        // identity mapping.
        unsafe { core::slice::from_raw_parts(phys as usize as *const u8, size) }
    }
}

/// UEFI entry point.
#[unsafe(no_mangle)]
pub extern "efiapi" fn efi_main(
    image_handle: EfiHandle,
    system_table: *mut table::SystemTable,
) -> EfiStatus {
    // SAFETY: the firmware passes a valid image handle and system table,
    // and this is the only call site.
    let st = unsafe { SystemTable::from_raw(image_handle, system_table) };
    log::init(st.console_out().as_ptr());

    // A slow file system must not trip the firmware watchdog mid-patch.
    let _ = st.boot_services().set_watchdog_timer(0, 0);

    uprintln!("amlpatch: ACPI table patcher");

    match run(&st) {
        Ok(()) => {
            uprintln!("amlpatch: done");
            EfiStatus::SUCCESS
        }
        Err(error) => {
            uprintln!("amlpatch: failed during {}: {}", error.stage(), error);
            exit_status(error)
        }
    }
}

/// Locate the tables, resolve the blob directory, and run the patch engine.
fn run(st: &SystemTable) -> Result<(), PatchError> {
    // Root pointer from the configuration-table registry. Nothing can be
    // located without it.
    let rsdp_ptr = st
        .find_configuration_table(&EfiGuid::ACPI_20_TABLE)
        .ok_or(PatchError::RsdpMissing)?;
    // SAFETY: the registry entry points at the firmware's RSDP, valid for
    // its fixed 36-byte layout.
    let rsdp_bytes = unsafe { core::slice::from_raw_parts(rsdp_ptr.cast::<u8>(), Rsdp::SIZE) };
    let rsdp = Rsdp::read_from_bytes(rsdp_bytes).ok_or(PatchError::TruncatedTable)?;
    let xsdt_addr = rsdp.xsdt_address();

    let handler = IdentityHandler;

    // Map the XSDT plus the reserved growth capacity behind it.
    // SAFETY: xsdt_addr comes from the RSDP; the header is readable there.
    let header_bytes = unsafe { handler.map_physical_region(xsdt_addr, SdtHeader::SIZE) };
    let header = SdtHeader::read_from_bytes(header_bytes).ok_or(PatchError::TruncatedTable)?;
    let view_len = header.length as usize + XSDT_GROWTH_CAPACITY;
    // SAFETY: the table is firmware-owned writable memory and the patcher
    // is the only agent mutating it during boot.
    let xsdt_data =
        unsafe { core::slice::from_raw_parts_mut(xsdt_addr as usize as *mut u8, view_len) };
    let mut xsdt = XsdtView::new(xsdt_data, xsdt_addr)?;
    uprintln!(
        "amlpatch: XSDT at {xsdt_addr:#x}, {} bytes, {} entries",
        xsdt.length(),
        xsdt.entry_count()
    );

    // The FADT is optional: without it only DSDT replacement degrades.
    let mut fadt = map_fadt(&handler, &xsdt);

    let mut source = DirBlobSource::open(st)?;
    let result = patch::patch_tables(&mut xsdt, fadt.as_mut(), &mut source);

    if result.dsdt_replaced {
        if let Some(fadt) = fadt.as_ref() {
            uprintln!(
                "amlpatch: DSDT replaced (dsdt {:#x}, x_dsdt {:#x})",
                fadt.dsdt(),
                fadt.x_dsdt()
            );
        }
    }
    uprintln!("amlpatch: {} table(s) appended", result.inserted);

    match result.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Locate and map the FADT, or explain why DSDT replacement is disabled.
fn map_fadt<'a>(handler: &IdentityHandler, xsdt: &XsdtView<'_>) -> Option<FadtView<'a>> {
    let Some(fadt_addr) = locate::find_fadt(handler, xsdt) else {
        uprintln!("amlpatch: no FADT found, DSDT replacement disabled");
        return None;
    };
    // SAFETY: fadt_addr came from the XSDT entry array and carries a
    // readable SDT header.
    let header_bytes = unsafe { handler.map_physical_region(fadt_addr, SdtHeader::SIZE) };
    let header = SdtHeader::read_from_bytes(header_bytes)?;
    // SAFETY: the table is firmware-owned writable memory covering its
    // declared length.
    let data = unsafe {
        core::slice::from_raw_parts_mut(fadt_addr as usize as *mut u8, header.length as usize)
    };
    match FadtView::new(data) {
        Ok(view) => {
            uprintln!("amlpatch: FADT at {fadt_addr:#x}");
            Some(view)
        }
        Err(_) => {
            uprintln!("amlpatch: FADT predates ACPI 2.0, DSDT replacement disabled");
            None
        }
    }
}

/// Map a patch failure to the status returned to the firmware.
fn exit_status(error: PatchError) -> EfiStatus {
    match error {
        PatchError::RsdpMissing | PatchError::DirectoryResolution => EfiStatus::NOT_FOUND,
        PatchError::Io => EfiStatus::LOAD_ERROR,
        PatchError::PointerTableFull => EfiStatus::OUT_OF_RESOURCES,
        PatchError::TruncatedTable => EfiStatus::VOLUME_CORRUPTED,
    }
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo<'_>) -> ! {
    uprintln!("amlpatch: panic: {info}");
    loop {
        core::hint::spin_loop();
    }
}
