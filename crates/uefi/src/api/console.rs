use core::fmt;
use core::marker::PhantomData;

use crate::EfiStatus;
use crate::protocol::simple_text::SimpleTextOutputProtocol;

/// Safe wrapper around a UEFI Simple Text Output Protocol (console).
///
/// All methods use `&self`; mutation happens through the firmware pointer.
pub struct Console<'st> {
    raw: *mut SimpleTextOutputProtocol,
    _lifetime: PhantomData<&'st ()>,
}

impl Console<'_> {
    pub(crate) fn new(raw: *mut SimpleTextOutputProtocol) -> Self {
        Self {
            raw,
            _lifetime: PhantomData,
        }
    }

    /// Rebuild a console wrapper from a raw protocol pointer previously
    /// obtained through [`as_ptr`](Console::as_ptr).
    ///
    /// # Safety
    ///
    /// `raw` must point to a live Simple Text Output Protocol instance and
    /// boot services must still be active.
    #[must_use]
    pub unsafe fn from_raw(raw: *mut SimpleTextOutputProtocol) -> Self {
        Self::new(raw)
    }

    /// Output a UTF-8 string to the console.
    ///
    /// Converted to UCS-2 in stack-allocated chunks; `\n` is translated to
    /// `\r\n` for the firmware console.
    ///
    /// # Errors
    ///
    /// Returns the firmware status when the device rejects the output.
    pub fn output_string(&self, s: &str) -> Result<(), EfiStatus> {
        const CHUNK: usize = 128;
        let mut buf = [0u16; CHUNK];
        let mut i = 0;

        for ch in s.chars() {
            if ch == '\n' {
                // Space for \r\n plus the terminator.
                if i + 2 >= CHUNK {
                    buf[i] = 0;
                    let status = unsafe { ((*self.raw).output_string)(self.raw, buf.as_ptr()) };
                    status.to_result()?;
                    i = 0;
                }
                buf[i] = u16::from(b'\r');
                i += 1;
                buf[i] = u16::from(b'\n');
                i += 1;
            } else {
                let code = if (ch as u32) > 0xFFFF {
                    0xFFFD
                } else {
                    ch as u16
                };
                if i + 1 >= CHUNK {
                    buf[i] = 0;
                    let status = unsafe { ((*self.raw).output_string)(self.raw, buf.as_ptr()) };
                    status.to_result()?;
                    i = 0;
                }
                buf[i] = code;
                i += 1;
            }
        }

        if i > 0 {
            buf[i] = 0;
            let status = unsafe { ((*self.raw).output_string)(self.raw, buf.as_ptr()) };
            status.to_result()?;
        }

        Ok(())
    }

    /// Returns the raw protocol pointer (for registering a log sink).
    #[must_use]
    pub fn as_ptr(&self) -> *mut SimpleTextOutputProtocol {
        self.raw
    }
}

impl fmt::Write for Console<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output_string(s).map_err(|_| fmt::Error)
    }
}
