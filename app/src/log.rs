//! Console logging for the boot application.
//!
//! Provides [`uprint!`] / [`uprintln!`] macros backed by the firmware
//! console. Before [`init`] is called, output is silently discarded, so a
//! quiet build only needs to skip the sink registration.

use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

use amlpatch_uefi::api::Console;
use amlpatch_uefi::protocol::simple_text::SimpleTextOutputProtocol;

static CONSOLE: AtomicPtr<SimpleTextOutputProtocol> = AtomicPtr::new(core::ptr::null_mut());

/// Registers the firmware console as the print sink.
///
/// Uses `Release` ordering so subsequent loads see the new pointer.
pub fn init(console: *mut SimpleTextOutputProtocol) {
    CONSOLE.store(console, Ordering::Release);
}

/// Implementation detail for [`uprint!`] / [`uprintln!`]. Not public API.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    use fmt::Write;

    let ptr = CONSOLE.load(Ordering::Acquire);
    if ptr.is_null() {
        return;
    }
    // SAFETY: only valid console pointers are ever stored, and boot
    // services stay active for the application's whole lifetime.
    let mut console = unsafe { Console::from_raw(ptr) };
    let _ = console.write_fmt(args);
}

/// Prints to the firmware console (no trailing newline).
#[macro_export]
macro_rules! uprint {
    ($($arg:tt)*) => { $crate::log::_print(format_args!($($arg)*)) };
}

/// Prints to the firmware console with a trailing newline.
#[macro_export]
macro_rules! uprintln {
    () => { $crate::uprint!("\n") };
    ($($arg:tt)*) => { $crate::uprint!("{}\n", format_args!($($arg)*)) };
}
