//! UEFI protocol definitions.
//!
//! Protocols are GUID-identified function tables installed on firmware
//! handles. The patcher uses four of them:
//! - [`device_path`] — Device Path Protocol, to find the image's directory
//! - [`file`] — Simple File System and File protocols, for blob loading
//! - [`loaded_image`] — Loaded Image Protocol, for the image's own location
//! - [`simple_text`] — Simple Text Output Protocol, for console logging

pub mod device_path;
pub mod file;
pub mod loaded_image;
pub mod simple_text;
