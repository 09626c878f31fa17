//! UEFI status codes.
//!
//! [`EfiStatus`] is a transparent wrapper around `usize` matching the UEFI
//! `EFI_STATUS` type. The high bit distinguishes errors from warnings: zero
//! is success, values with the high bit clear are warnings, values with the
//! high bit set are errors.
//!
//! Only the codes the patcher can actually receive from (or hand back to)
//! the firmware are named here; unknown codes still round-trip through the
//! wrapper and print as raw hex.

use core::fmt;

/// The high bit of `usize`, set on all error codes.
const ERROR_BIT: usize = 1 << (usize::BITS - 1);

/// A UEFI status code.
///
/// Use [`is_error`](EfiStatus::is_error) to classify, or
/// [`to_result`](EfiStatus::to_result) to fold into a `Result` at call
/// sites.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EfiStatus(pub usize);

impl EfiStatus {
    /// The operation completed successfully.
    pub const SUCCESS: Self = Self(0);

    // ── Error codes ──────────────────────────────────────────────────

    /// The image failed to load.
    pub const LOAD_ERROR: Self = Self(ERROR_BIT | 1);
    /// A parameter was incorrect.
    pub const INVALID_PARAMETER: Self = Self(ERROR_BIT | 2);
    /// The operation is not supported.
    pub const UNSUPPORTED: Self = Self(ERROR_BIT | 3);
    /// The buffer was not the proper size for the request.
    pub const BAD_BUFFER_SIZE: Self = Self(ERROR_BIT | 4);
    /// The buffer is not large enough to hold the requested data.
    pub const BUFFER_TOO_SMALL: Self = Self(ERROR_BIT | 5);
    /// There is no data pending upon return.
    pub const NOT_READY: Self = Self(ERROR_BIT | 6);
    /// The physical device reported an error while attempting the operation.
    pub const DEVICE_ERROR: Self = Self(ERROR_BIT | 7);
    /// The device cannot be written to.
    pub const WRITE_PROTECTED: Self = Self(ERROR_BIT | 8);
    /// A resource has run out.
    pub const OUT_OF_RESOURCES: Self = Self(ERROR_BIT | 9);
    /// An inconsistency was detected on the file system.
    pub const VOLUME_CORRUPTED: Self = Self(ERROR_BIT | 0x0a);
    /// There is no more space on the file system.
    pub const VOLUME_FULL: Self = Self(ERROR_BIT | 0x0b);
    /// The device does not contain any medium to perform the operation.
    pub const NO_MEDIA: Self = Self(ERROR_BIT | 0x0c);
    /// The medium in the device has changed since the last access.
    pub const MEDIA_CHANGED: Self = Self(ERROR_BIT | 0x0d);
    /// The item was not found.
    pub const NOT_FOUND: Self = Self(ERROR_BIT | 0x0e);
    /// Access was denied.
    pub const ACCESS_DENIED: Self = Self(ERROR_BIT | 0x0f);
    /// The timeout time expired.
    pub const TIMEOUT: Self = Self(ERROR_BIT | 0x12);
    /// The operation was aborted.
    pub const ABORTED: Self = Self(ERROR_BIT | 0x15);
    /// A CRC error was detected.
    pub const CRC_ERROR: Self = Self(ERROR_BIT | 0x1b);
    /// Beginning or end of media was reached.
    pub const END_OF_MEDIA: Self = Self(ERROR_BIT | 0x1c);
    /// The end of the file was reached.
    pub const END_OF_FILE: Self = Self(ERROR_BIT | 0x1f);

    /// Returns `true` if this status code indicates success.
    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this status code indicates an error (high bit set).
    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        self.0 & ERROR_BIT != 0
    }

    /// Converts this status code to a `Result`.
    ///
    /// Success and warnings map to `Ok(())`.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` if the status code indicates an error.
    #[inline]
    pub const fn to_result(self) -> Result<(), Self> {
        if self.is_error() { Err(self) } else { Ok(()) }
    }

    /// Returns a human-readable name for the status code, if known.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::SUCCESS => Some("EFI_SUCCESS"),
            Self::LOAD_ERROR => Some("EFI_LOAD_ERROR"),
            Self::INVALID_PARAMETER => Some("EFI_INVALID_PARAMETER"),
            Self::UNSUPPORTED => Some("EFI_UNSUPPORTED"),
            Self::BAD_BUFFER_SIZE => Some("EFI_BAD_BUFFER_SIZE"),
            Self::BUFFER_TOO_SMALL => Some("EFI_BUFFER_TOO_SMALL"),
            Self::NOT_READY => Some("EFI_NOT_READY"),
            Self::DEVICE_ERROR => Some("EFI_DEVICE_ERROR"),
            Self::WRITE_PROTECTED => Some("EFI_WRITE_PROTECTED"),
            Self::OUT_OF_RESOURCES => Some("EFI_OUT_OF_RESOURCES"),
            Self::VOLUME_CORRUPTED => Some("EFI_VOLUME_CORRUPTED"),
            Self::VOLUME_FULL => Some("EFI_VOLUME_FULL"),
            Self::NO_MEDIA => Some("EFI_NO_MEDIA"),
            Self::MEDIA_CHANGED => Some("EFI_MEDIA_CHANGED"),
            Self::NOT_FOUND => Some("EFI_NOT_FOUND"),
            Self::ACCESS_DENIED => Some("EFI_ACCESS_DENIED"),
            Self::TIMEOUT => Some("EFI_TIMEOUT"),
            Self::ABORTED => Some("EFI_ABORTED"),
            Self::CRC_ERROR => Some("EFI_CRC_ERROR"),
            Self::END_OF_MEDIA => Some("EFI_END_OF_MEDIA"),
            Self::END_OF_FILE => Some("EFI_END_OF_FILE"),
            _ => None,
        }
    }
}

impl fmt::Debug for EfiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "EfiStatus({name})"),
            None => write!(f, "EfiStatus({:#x})", self.0),
        }
    }
}

impl fmt::Display for EfiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.is_error() => {
                write!(f, "unknown error ({:#x})", self.0 & !ERROR_BIT)
            }
            None => write!(f, "unknown warning ({})", self.0),
        }
    }
}

// ── Compile-time layout assertions ──────────────────────────────────

#[cfg(target_pointer_width = "64")]
const _: () = assert!(core::mem::size_of::<EfiStatus>() == 8);

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn error_classification() {
        assert!(EfiStatus::SUCCESS.is_success());
        assert!(!EfiStatus::SUCCESS.is_error());
        assert!(EfiStatus::NOT_FOUND.is_error());
        assert_eq!(EfiStatus::SUCCESS.to_result(), Ok(()));
        assert_eq!(
            EfiStatus::NOT_FOUND.to_result(),
            Err(EfiStatus::NOT_FOUND)
        );
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(EfiStatus::NOT_FOUND.name(), Some("EFI_NOT_FOUND"));
        assert_eq!(EfiStatus(ERROR_BIT | 0x7777).name(), None);
    }
}
