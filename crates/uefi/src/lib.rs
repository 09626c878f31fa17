//! UEFI bindings for the `amlpatch` boot application.
//!
//! Raw `#[repr(C)]` FFI types matching the UEFI specification layout, plus
//! safe wrapper types for the handful of services the patcher needs: console
//! output, the configuration-table registry, protocol lookup, pool
//! allocation, and FAT file system access.
//!
//! # Calling Convention
//!
//! All UEFI function pointers use the `extern "efiapi"` calling convention
//! (MS x64 on x86-64).
//!
//! # Safety
//!
//! The raw types in [`table`] and [`protocol`] mirror firmware-owned
//! structures; calling through their function pointers is `unsafe` and
//! requires boot services to still be active. The [`api`] module wraps the
//! operations the application actually performs. UEFI's `BOOLEAN` is a
//! `UINT8` constrained to 0 or 1, so Rust's `bool` is used directly in FFI
//! signatures.

#![no_std]

/// Safe wrappers for the UEFI services the patcher uses.
pub mod api;
pub mod guid;
pub mod memory;
pub mod protocol;
pub mod status;
pub mod table;

use core::ffi::c_void;

pub use guid::EfiGuid;
pub use status::EfiStatus;

/// An opaque handle to a UEFI object (protocol, image, device, etc.).
pub type EfiHandle = *mut c_void;

/// An opaque handle to a UEFI event.
pub type EfiEvent = *mut c_void;

/// A physical memory address.
pub type EfiPhysicalAddress = u64;

/// A task priority level.
pub type EfiTpl = usize;
