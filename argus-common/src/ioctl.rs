// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! The generic `_IOC` request encoding shared by x86_64 and aarch64.

pub const IOC_NRBITS: u32 = 8;
pub const IOC_TYPEBITS: u32 = 8;
pub const IOC_SIZEBITS: u32 = 14;
pub const IOC_DIRBITS: u32 = 2;

pub const IOC_NRSHIFT: u32 = 0;
pub const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
pub const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
pub const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

pub const IOC_NONE: u32 = 0;
pub const IOC_WRITE: u32 = 1;
pub const IOC_READ: u32 = 2;

pub const IOC_SIZEMASK: u32 = (1 << IOC_SIZEBITS) - 1;

pub const fn ioc(dir: u32, ty: u8, nr: u8, size: usize) -> u32 {
    (dir << IOC_DIRSHIFT)
        | ((ty as u32) << IOC_TYPESHIFT)
        | ((nr as u32) << IOC_NRSHIFT)
        | (((size as u32) & IOC_SIZEMASK) << IOC_SIZESHIFT)
}

pub const fn io(ty: u8, nr: u8) -> u32 {
    ioc(IOC_NONE, ty, nr, 0)
}

pub const fn ior(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(IOC_READ, ty, nr, size)
}

pub const fn iow(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(IOC_WRITE, ty, nr, size)
}

pub const fn iowr(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(IOC_READ | IOC_WRITE, ty, nr, size)
}

pub const fn ioc_dir(code: u32) -> u32 {
    (code >> IOC_DIRSHIFT) & ((1 << IOC_DIRBITS) - 1)
}

pub const fn ioc_type(code: u32) -> u8 {
    (code >> IOC_TYPESHIFT) as u8
}

pub const fn ioc_nr(code: u32) -> u8 {
    (code >> IOC_NRSHIFT) as u8
}

pub const fn ioc_size(code: u32) -> usize {
    ((code >> IOC_SIZESHIFT) & IOC_SIZEMASK) as usize
}

/// The request with its size bits cleared, used to match variable-length
/// requests such as `EVIOCGNAME(len)`.
pub const fn ioc_without_size(code: u32) -> u32 {
    code & !(IOC_SIZEMASK << IOC_SIZESHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_the_kernel() {
        // DRM_IOCTL_VERSION is _IOWR('d', 0x00, struct drm_version), 64 bytes on LP64.
        assert_eq!(iowr(b'd', 0x00, 64), 0xc040_6400);
        // EVIOCGVERSION is _IOR('E', 0x01, int).
        assert_eq!(ior(b'E', 0x01, 4), 0x8004_4501);
        // BTRFS_IOC_SYNC is _IO(0x94, 8).
        assert_eq!(io(0x94, 8), 0x9408);
    }

    #[test]
    fn splits_request_fields() {
        let code = iowr(b'd', 0xb2, 32);
        assert_eq!(ioc_dir(code), IOC_READ | IOC_WRITE);
        assert_eq!(ioc_type(code), b'd');
        assert_eq!(ioc_nr(code), 0xb2);
        assert_eq!(ioc_size(code), 32);
        assert_eq!(ioc_without_size(code), iowr(b'd', 0xb2, 0));
    }
}
