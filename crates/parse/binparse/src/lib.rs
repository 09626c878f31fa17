//! `amlpatch-binparse` --- little-endian field access over byte slices.
//!
//! ACPI structures are packed little-endian records at fixed byte offsets.
//! Rather than casting raw pointers to `#[repr(C, packed)]` structs, the
//! patcher reads and writes individual fields through bounds-checked slice
//! accessors. [`FromBytes`] covers the read side, [`IntoBytes`] the write
//! side; both are implemented for the unsigned integer widths that appear
//! in ACPI table layouts.

#![no_std]
#![warn(missing_docs)]

/// Types that can be read from a little-endian byte slice.
pub trait FromBytes: Sized {
    /// Number of bytes this type occupies in serialized form.
    const SIZE: usize;

    /// Read a value from the start of `data`.
    ///
    /// Returns `None` if `data` is shorter than [`Self::SIZE`].
    #[must_use]
    fn read_from(data: &[u8]) -> Option<Self>;

    /// Read a value from `data` starting at byte `offset`.
    ///
    /// Returns `None` if `data[offset..]` is shorter than [`Self::SIZE`].
    #[must_use]
    fn read_at(data: &[u8], offset: usize) -> Option<Self> {
        Self::read_from(data.get(offset..)?)
    }
}

/// Types that can be written into a little-endian byte slice.
pub trait IntoBytes: FromBytes {
    /// Write `self` into `data` starting at byte `offset`.
    ///
    /// Returns `None` (writing nothing) if `data[offset..]` is shorter than
    /// [`FromBytes::SIZE`], `Some(())` on success.
    #[must_use]
    fn write_at(self, data: &mut [u8], offset: usize) -> Option<()>;
}

macro_rules! impl_le_int {
    ($($ty:ty),*) => {
        $(
            impl FromBytes for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn read_from(data: &[u8]) -> Option<Self> {
                    let bytes = data.get(..Self::SIZE)?;
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    Some(<$ty>::from_le_bytes(raw))
                }
            }

            impl IntoBytes for $ty {
                fn write_at(self, data: &mut [u8], offset: usize) -> Option<()> {
                    let end = offset.checked_add(Self::SIZE)?;
                    let slot = data.get_mut(offset..end)?;
                    slot.copy_from_slice(&self.to_le_bytes());
                    Some(())
                }
            }
        )*
    };
}

impl_le_int!(u8, u16, u32, u64);

impl<const N: usize> FromBytes for [u8; N] {
    const SIZE: usize = N;

    fn read_from(data: &[u8]) -> Option<Self> {
        let bytes = data.get(..N)?;
        let mut raw = [0u8; N];
        raw.copy_from_slice(bytes);
        Some(raw)
    }
}

impl<const N: usize> IntoBytes for [u8; N] {
    fn write_at(self, data: &mut [u8], offset: usize) -> Option<()> {
        let end = offset.checked_add(N)?;
        let slot = data.get_mut(offset..end)?;
        slot.copy_from_slice(&self);
        Some(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn read_primitives_little_endian() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xEF, 0xCD, 0xAB, 0x89];
        assert_eq!(u8::read_from(&data), Some(0x78));
        assert_eq!(u16::read_from(&data), Some(0x5678));
        assert_eq!(u32::read_from(&data), Some(0x1234_5678));
        assert_eq!(u64::read_from(&data), Some(0x89AB_CDEF_1234_5678));
    }

    #[test]
    fn read_at_offset() {
        let data = [0x00, 0x00, 0x0D, 0xF0];
        assert_eq!(u16::read_at(&data, 2), Some(0xF00D));
        assert_eq!(u32::read_at(&data, 2), None);
        assert_eq!(u8::read_at(&data, 4), None);
    }

    #[test]
    fn write_at_round_trips() {
        let mut data = [0u8; 12];
        assert_eq!(0x1122_3344_5566_7788u64.write_at(&mut data, 2), Some(()));
        assert_eq!(u64::read_at(&data, 2), Some(0x1122_3344_5566_7788));
        // Untouched bytes stay zero.
        assert_eq!(data[0], 0);
        assert_eq!(data[1], 0);
        assert_eq!(data[10], 0);
    }

    #[test]
    fn write_past_end_is_rejected() {
        let mut data = [0u8; 4];
        assert_eq!(0xAABB_CCDDu32.write_at(&mut data, 1), None);
        assert_eq!(data, [0u8; 4]);
    }

    #[test]
    fn byte_array_fields() {
        let data = *b"XSDT\x24\x00\x00\x00";
        assert_eq!(<[u8; 4]>::read_at(&data, 0), Some(*b"XSDT"));
        assert_eq!(u32::read_at(&data, 4), Some(36));

        let mut out = [0u8; 8];
        assert_eq!((*b"FACP").write_at(&mut out, 2), Some(()));
        assert_eq!(&out[2..6], b"FACP");
    }
}
