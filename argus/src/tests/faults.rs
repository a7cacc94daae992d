// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Memory that goes away in the middle of a decode, one fetch at a time.

use argus_common::{
    kernel_types::{
        bpf::{BpfInfoByFdAttr, BpfMapInfo, BPF_OBJ_GET_INFO_BY_FD},
        btrfs::{BtrfsSpaceArgs, BtrfsSpaceInfo, BTRFS_IOC_SPACE_INFO},
        drm::{DrmModeCardRes, DRM_IOCTL_MODE_GETRESOURCES},
        net::{SockaddrIn, AF_INET},
    },
    syscalls::{SYS_accept, SYS_bpf, SYS_ioctl},
};

use crate::{
    mem::MemoryImage,
    tests::{bytes_of, decode_one, ARG, TID},
};

/// Runs the call once cleanly to count its fetches, then once per fetch with
/// that fetch failing, and once per fetch with everything from it on
/// failing. Every run must still produce one well-formed line that shows
/// where the data could not be read.
fn assert_degrades(image: impl Fn() -> MemoryImage, nr: i64, args: [u64; 6], retval: i64) {
    let clean = image();
    let expected = decode_one(&clean, nr, args, Some(retval));
    let fetches = clean.fetch_count();
    assert!(fetches > 1, "{expected}");

    for n in 1..=fetches {
        for (mode, mem) in [
            ("only", image().fail_on_fetch(n)),
            ("from", image().fail_from_fetch(n)),
        ] {
            let output = decode_one(&mem, nr, args, Some(retval));

            assert!(output.starts_with(&format!("{TID} ")), "{mode} {n}: {output}");
            assert_eq!(output.matches('\n').count(), 1, "{mode} {n}: {output}");
            assert!(output.ends_with(&format!(" = {retval}\n")) || output.ends_with(" (fd)\n"), "{mode} {n}: {output}");
            assert_eq!(output.matches('{').count(), output.matches('}').count(), "{mode} {n}: {output}");
            assert_eq!(output.matches('[').count(), output.matches(']').count(), "{mode} {n}: {output}");
            assert!(
                output.contains("0x") || output.contains("<unavailable>"),
                "{mode} {n}: {output}"
            );
            assert_ne!(output, expected, "{mode} {n}");
        }
    }
}

#[test]
fn card_resources() {
    let res = DrmModeCardRes {
        fb_id_ptr: 0x20_000,
        crtc_id_ptr: 0x20_100,
        connector_id_ptr: 0x20_200,
        encoder_id_ptr: 0x20_300,
        count_fbs: 2,
        count_crtcs: 1,
        count_connectors: 1,
        count_encoders: 1,
        ..Default::default()
    };
    let ids = |ids: &[u32]| -> Vec<u8> { ids.iter().flat_map(|id| id.to_ne_bytes()).collect() };

    assert_degrades(
        || {
            MemoryImage::new()
                .map(ARG, bytes_of(&res))
                .map(0x20_000, ids(&[31, 32]))
                .map(0x20_100, ids(&[41]))
                .map(0x20_200, ids(&[51]))
                .map(0x20_300, ids(&[61]))
        },
        SYS_ioctl,
        [3, DRM_IOCTL_MODE_GETRESOURCES as u64, ARG, 0, 0, 0],
        0,
    );
}

#[test]
fn space_info() {
    assert_degrades(
        || {
            let mut bytes = bytes_of(&BtrfsSpaceArgs {
                space_slots: 3,
                total_spaces: 3,
            });
            for n in 1..=3 {
                bytes.extend(bytes_of(&BtrfsSpaceInfo {
                    flags: 1,
                    total_bytes: n << 20,
                    used_bytes: n,
                }));
            }
            MemoryImage::new().map(ARG, bytes)
        },
        SYS_ioctl,
        [3, BTRFS_IOC_SPACE_INFO as u64, ARG, 0, 0, 0],
        0,
    );
}

#[test]
fn map_info() {
    const INFO: u64 = 0x30_000;

    let attr = BpfInfoByFdAttr {
        bpf_fd: 4,
        info_len: 24,
        info: INFO,
    };
    let info = BpfMapInfo {
        map_type: 1,
        id: 9,
        ..Default::default()
    };

    assert_degrades(
        || {
            MemoryImage::new()
                .map(ARG, bytes_of(&attr))
                .map(INFO, bytes_of(&info))
                .with_fd(4, "anon_inode:bpf-map")
        },
        SYS_bpf,
        [BPF_OBJ_GET_INFO_BY_FD as u64, ARG, 16, 0, 0, 0],
        0,
    );
}

#[test]
fn accepted_address() {
    const LENP: u64 = 0x20_000;

    let addr = SockaddrIn {
        sin_family: AF_INET,
        sin_port: 443u16.to_be_bytes(),
        sin_addr: [192, 168, 0, 1],
        sin_zero: [0; 8],
    };

    assert_degrades(
        || {
            MemoryImage::new()
                .map(ARG, bytes_of(&addr))
                .map(LENP, 16u32.to_ne_bytes().to_vec())
        },
        SYS_accept,
        [3, ARG, LENP, 0, 0, 0],
        5,
    );
}
