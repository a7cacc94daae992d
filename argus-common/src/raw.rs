// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Native-endian field access over a possibly truncated structure image.
//!
//! Reads past the end of the fetched bytes yield zeroes, the same as a
//! structure the kernel zero-extends when user space hands it a shorter
//! version. Decoders still check [`RawStruct::has`] before rendering a field.

#[derive(Clone, Copy, Debug)]
pub struct RawStruct<'a> {
    bytes: &'a [u8],
}

macro_rules! read_ne {
    ($name:ident, $ty:ty) => {
        pub fn $name(&self, offset: usize) -> $ty {
            <$ty>::from_ne_bytes(self.array(offset))
        }
    };
}

impl<'a> RawStruct<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        RawStruct { bytes }
    }

    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Whether a field starting at `offset` made it into the fetched image.
    pub const fn has(&self, offset: usize) -> bool {
        self.bytes.len() > offset
    }

    /// Whether the whole `offset..offset + size` span was fetched.
    pub fn covers(&self, offset: usize, size: usize) -> bool {
        offset
            .checked_add(size)
            .is_some_and(|end| end <= self.bytes.len())
    }

    /// The fetched part of `offset..offset + len`, possibly shorter or empty.
    pub fn bytes(&self, offset: usize, len: usize) -> &'a [u8] {
        let start = offset.min(self.bytes.len());
        let end = offset.saturating_add(len).min(self.bytes.len());
        &self.bytes[start..end]
    }

    /// A view of the embedded structure at `offset`.
    pub fn sub(&self, offset: usize, len: usize) -> RawStruct<'a> {
        RawStruct::new(self.bytes(offset, len))
    }

    pub fn array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        let available = self.bytes(offset, N);
        out[..available.len()].copy_from_slice(available);
        out
    }

    read_ne!(u8, u8);
    read_ne!(u16, u16);
    read_ne!(u32, u32);
    read_ne!(u64, u64);
    read_ne!(i16, i16);
    read_ne!(i32, i32);
    read_ne!(i64, i64);

    pub fn be16(&self, offset: usize) -> u16 {
        u16::from_be_bytes(self.array(offset))
    }

    pub fn be32(&self, offset: usize) -> u32 {
        u32::from_be_bytes(self.array(offset))
    }

    /// Whether any byte of `offset..offset + len` that was fetched is non-zero.
    pub fn any_nonzero(&self, offset: usize, len: usize) -> bool {
        self.bytes(offset, len).iter().any(|&b| b != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_zero_padded() {
        let data = 0x1122_3344u32.to_ne_bytes();
        let raw = RawStruct::new(&data[..3]);

        assert!(raw.has(2));
        assert!(!raw.has(3));
        assert!(!raw.covers(0, 4));
        assert_eq!(raw.u32(4), 0);
        assert_eq!(raw.bytes(1, 10).len(), 2);

        let mut expected = data;
        expected[3] = 0;
        assert_eq!(raw.u32(0), u32::from_ne_bytes(expected));
    }

    #[test]
    fn offsets_never_overflow() {
        let data = [1u8; 8];
        let raw = RawStruct::new(&data);

        assert!(!raw.covers(usize::MAX, 2));
        assert!(raw.bytes(usize::MAX, usize::MAX).is_empty());
        assert_eq!(raw.u64(usize::MAX - 1), 0);
    }
}
