// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Kernel structures as laid out on LP64 targets. Padding the compiler
//! would otherwise insert is spelled out so every byte of a value is
//! initialized.

pub mod bpf;
pub mod btrfs;
pub mod drm;
pub mod evdev;
pub mod net;
pub mod prctl;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct Timespec {
    pub seconds: i64,
    pub nanos: i64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct Timeval {
    pub seconds: i64,
    pub micros: i64,
}

#[cfg(test)]
mod tests {
    use core::mem::{offset_of, size_of};

    use super::{bpf::*, btrfs::*, drm::*, evdev::*, net::*, prctl::*};

    #[test]
    fn bpf_layouts() {
        assert_eq!(size_of::<BpfMapCreateAttr>(), 80);
        assert_eq!(offset_of!(BpfMapCreateAttr, map_extra), 64);
        assert_eq!(size_of::<BpfProgLoadAttr>(), 152);
        assert_eq!(offset_of!(BpfProgLoadAttr, fd_array), 120);
        assert_eq!(offset_of!(BpfProgLoadAttr, log_true_size), 140);
        assert_eq!(size_of::<BpfProgTestRunAttr>(), 80);
        assert_eq!(size_of::<BpfProgQueryAttr>(), 64);
        assert_eq!(size_of::<BpfTaskFdQueryAttr>(), 48);
        assert_eq!(size_of::<BpfBatchAttr>(), 56);
        assert_eq!(size_of::<BpfLinkCreateAttr>(), 64);
        assert_eq!(size_of::<BpfProgInfo>(), 104);
        assert_eq!(size_of::<BpfMapInfo>(), 88);
        assert_eq!(size_of::<BpfInsn>(), 8);
    }

    #[test]
    fn btrfs_layouts() {
        assert_eq!(size_of::<BtrfsVolArgs>(), 4096);
        assert_eq!(size_of::<BtrfsVolArgsV2>(), 4096);
        assert_eq!(offset_of!(BtrfsVolArgsV2, name), 56);
        assert_eq!(size_of::<BtrfsQgroupInherit>(), 72);
        assert_eq!(size_of::<BtrfsScrubArgs>(), 1024);
        assert_eq!(size_of::<BtrfsDevInfoArgs>(), 4096);
        assert_eq!(offset_of!(BtrfsDevInfoArgs, path), 3072);
        assert_eq!(size_of::<BtrfsFsInfoArgs>(), 1024);
        assert_eq!(size_of::<BtrfsBalanceArgs>(), 136);
        assert_eq!(size_of::<BtrfsIoctlBalanceArgs>(), 1024);
        assert_eq!(offset_of!(BtrfsIoctlBalanceArgs, stat), 424);
        assert_eq!(size_of::<BtrfsSendArgs>(), 72);
        assert_eq!(size_of::<BtrfsGetDevStats>(), 1032);
        assert_eq!(size_of::<BtrfsDevReplaceArgs>(), 2600);
        assert_eq!(size_of::<BtrfsSearchKey>(), 104);
        assert_eq!(size_of::<BtrfsSearchArgs>(), 4096);
        assert_eq!(size_of::<BtrfsReceivedSubvolArgs>(), 200);
        assert_eq!(size_of::<BtrfsGetSubvolInfoArgs>(), 504);
    }

    #[test]
    fn drm_layouts() {
        assert_eq!(size_of::<DrmVersion>(), 64);
        assert_eq!(size_of::<DrmStats>(), 248);
        assert_eq!(size_of::<DrmModeModeinfo>(), 68);
        assert_eq!(size_of::<DrmModeCrtc>(), 104);
        assert_eq!(size_of::<DrmModeGetConnector>(), 80);
        assert_eq!(size_of::<DrmModeGetProperty>(), 64);
        assert_eq!(size_of::<DrmModeFbCmd2>(), 104);
        assert_eq!(offset_of!(DrmModeFbCmd2, modifier), 72);
    }

    #[test]
    fn evdev_layouts() {
        assert_eq!(size_of::<InputKeymapEntry>(), 40);
        assert_eq!(size_of::<InputAbsinfo>(), 24);
        assert_eq!(size_of::<FfEffect>(), 48);
        assert_eq!(offset_of!(FfEffect, u), 16);
        assert_eq!(size_of::<FfPeriodicEffect>(), 32);
        assert_eq!(offset_of!(FfPeriodicEffect, custom_data), 24);
    }

    #[test]
    fn net_layouts() {
        assert_eq!(size_of::<Ifreq>(), 40);
        assert_eq!(size_of::<Ifconf>(), 16);
        assert_eq!(size_of::<SockaddrIn6>(), 28);
        assert_eq!(size_of::<SockaddrLl>(), 20);
        assert_eq!(size_of::<SockaddrAlg>(), 88);
    }

    #[test]
    fn prctl_layouts() {
        assert_eq!(size_of::<PrctlMmMap>(), 104);
        assert_eq!(size_of::<KcmpEpollSlot>(), 12);
    }
}
