use core::ffi::c_void;

use crate::memory::EfiMemoryType;
use crate::table;
use crate::{EfiGuid, EfiHandle, EfiStatus};

use super::Protocol;

/// Safe wrapper around UEFI Boot Services.
pub struct BootServices<'st> {
    raw: &'st table::BootServices,
    image_handle: EfiHandle,
}

impl<'st> BootServices<'st> {
    pub(crate) fn new(raw: &'st table::BootServices, image_handle: EfiHandle) -> Self {
        Self { raw, image_handle }
    }

    /// Obtain a protocol interface installed on a specific handle.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the handle does not carry the
    /// protocol.
    pub fn handle_protocol<P: Protocol>(
        &self,
        handle: EfiHandle,
    ) -> Result<&'st mut P::Raw, EfiStatus> {
        let mut interface: *mut c_void = core::ptr::null_mut();
        let status = unsafe {
            (self.raw.handle_protocol)(handle, &P::GUID as *const EfiGuid, &raw mut interface)
        };
        status.to_result()?;
        if interface.is_null() {
            return Err(EfiStatus::NOT_FOUND);
        }
        Ok(unsafe { &mut *interface.cast::<P::Raw>() })
    }

    /// Allocate `size` bytes of pool memory of the given type.
    ///
    /// The returned buffer is uninitialized. Pool memory stays allocated
    /// until `free_pool`; the patcher deliberately never frees blob buffers.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the allocation fails.
    pub fn allocate_pool(
        &self,
        memory_type: EfiMemoryType,
        size: usize,
    ) -> Result<*mut u8, EfiStatus> {
        let mut buffer: *mut c_void = core::ptr::null_mut();
        let status = unsafe { (self.raw.allocate_pool)(memory_type, size, &raw mut buffer) };
        status.to_result()?;
        if buffer.is_null() {
            return Err(EfiStatus::OUT_OF_RESOURCES);
        }
        Ok(buffer.cast::<u8>())
    }

    /// Set the system watchdog timer; a timeout of 0 disables it.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the watchdog cannot be set.
    pub fn set_watchdog_timer(&self, timeout: usize, watchdog_code: u64) -> Result<(), EfiStatus> {
        let status =
            unsafe { (self.raw.set_watchdog_timer)(timeout, watchdog_code, 0, core::ptr::null()) };
        status.to_result()
    }

    /// Returns the image handle.
    #[must_use]
    pub fn image_handle(&self) -> EfiHandle {
        self.image_handle
    }
}
