// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argus_common::{
    ioctl::iowr,
    kernel_types::drm::{
        DrmGemClose, DrmGetCap, DrmModeCardRes, DRM_IOCTL_GEM_CLOSE, DRM_IOCTL_GET_CAP,
        DRM_IOCTL_MODE_GETRESOURCES,
    },
    syscalls::SYS_ioctl,
};
use indoc::indoc;

use crate::{
    config::{DecodeConfig, XlatStyle},
    decode_test,
    formatting::FormattingStyle,
    mem::MemoryImage,
    tests::{bytes_of, decode_call, decode_one, ARG, BAD_ADDR},
};

fn cap_image(value: u64) -> MemoryImage {
    let cap = DrmGetCap {
        capability: 1,
        value,
    };
    MemoryImage::new().map(ARG, bytes_of(&cap))
}

decode_test!(
    get_cap,
    {
        (
            cap_image(1),
            SYS_ioctl,
            [3, DRM_IOCTL_GET_CAP as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 3, request: DRM_IOCTL_GET_CAP, arg: { capability: DRM_CAP_DUMB_BUFFER, value: 1 }) = 0\n"
);

decode_test!(
    get_cap_verbose_constants,
    config: DecodeConfig::default().with_xlat_style(XlatStyle::Verbose),
    {
        (
            cap_image(1),
            SYS_ioctl,
            [3, DRM_IOCTL_GET_CAP as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 3, request: DRM_IOCTL_GET_CAP, arg: { capability: 1 /* DRM_CAP_DUMB_BUFFER */, value: 1 }) = 0\n"
);

decode_test!(
    get_cap_failed,
    {
        (
            cap_image(0),
            SYS_ioctl,
            [3, DRM_IOCTL_GET_CAP as u64, ARG, 0, 0, 0],
            Some(-22),
        )
    },
    "1000 ioctl(fd: 3, request: DRM_IOCTL_GET_CAP, arg: { capability: DRM_CAP_DUMB_BUFFER }) = -1 EINVAL (Invalid argument)\n"
);

decode_test!(
    get_cap_entry_only,
    {
        (
            cap_image(0),
            SYS_ioctl,
            [3, DRM_IOCTL_GET_CAP as u64, ARG, 0, 0, 0],
            None,
        )
    },
    "1000 ioctl(fd: 3, request: DRM_IOCTL_GET_CAP, arg: { capability: DRM_CAP_DUMB_BUFFER <unfinished ...>\n"
);

#[test]
fn bad_pointer_is_shown_bare_and_never_revisited() {
    let mem = MemoryImage::new();

    let output = decode_one(
        &mem,
        SYS_ioctl,
        [3, DRM_IOCTL_GET_CAP as u64, BAD_ADDR, 0, 0, 0],
        Some(0),
    );

    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: DRM_IOCTL_GET_CAP, arg: 0xdead0000) = 0\n"
    );
    // The failed entry fetch, and no refetch at exit.
    assert_eq!(mem.fetch_count(), 1);
}

decode_test!(
    null_argument,
    {
        (
            MemoryImage::new(),
            SYS_ioctl,
            [3, DRM_IOCTL_GET_CAP as u64, 0, 0, 0, 0],
            Some(-14),
        )
    },
    "1000 ioctl(fd: 3, request: DRM_IOCTL_GET_CAP, arg: NULL) = -1 EFAULT (Bad address)\n"
);

decode_test!(
    gem_close_with_fd_path,
    {
        let close = DrmGemClose { handle: 7, _pad: 0 };
        (
            MemoryImage::new()
                .map(ARG, bytes_of(&close))
                .with_fd(3, "/dev/dri/card0"),
            SYS_ioctl,
            [3, DRM_IOCTL_GEM_CLOSE as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 3</dev/dri/card0>, request: DRM_IOCTL_GEM_CLOSE, arg: { handle: 7 }) = 0\n"
);

decode_test!(
    gem_close_multi_line,
    config: DecodeConfig::default().with_style(FormattingStyle::MultiLine),
    {
        let close = DrmGemClose { handle: 7, _pad: 0 };
        (
            MemoryImage::new().map(ARG, bytes_of(&close)),
            SYS_ioctl,
            [3, DRM_IOCTL_GEM_CLOSE as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    indoc! {"
        1000
        \tioctl(
        \t    fd: 3,
        \t    request: DRM_IOCTL_GEM_CLOSE,
        \t    arg: {
        \t        handle: 7
        \t    }
        \t) = 0
    "}
);

decode_test!(
    driver_private_request_is_generic,
    {
        (
            MemoryImage::new(),
            SYS_ioctl,
            [3, iowr(b'd', 0x44, 16) as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 3, request: _IOC(_IOC_READ|_IOC_WRITE, 'd', 0x44, 0x10), arg: 0x10000) = 0\n"
);

const FBS: u64 = 0x20_000;
const CRTCS: u64 = 0x20_100;
const CONNECTORS: u64 = 0x20_200;
const ENCODERS: u64 = 0x20_300;

fn id_list(ids: &[u32]) -> Vec<u8> {
    ids.iter().flat_map(|id| id.to_ne_bytes()).collect()
}

fn card_res_image(res: &DrmModeCardRes) -> MemoryImage {
    MemoryImage::new()
        .map(ARG, bytes_of(res))
        .map(FBS, id_list(&[31, 32]))
        .map(CRTCS, id_list(&[41]))
        .map(CONNECTORS, id_list(&[51, 52, 53]))
        .map(ENCODERS, id_list(&[61]))
}

fn offered_card_res() -> DrmModeCardRes {
    DrmModeCardRes {
        fb_id_ptr: FBS,
        crtc_id_ptr: CRTCS,
        connector_id_ptr: CONNECTORS,
        encoder_id_ptr: ENCODERS,
        count_fbs: 2,
        count_crtcs: 1,
        count_connectors: 1,
        count_encoders: 1,
        ..Default::default()
    }
}

#[test]
fn card_resources_show_what_changed() {
    let offered = offered_card_res();
    let returned = DrmModeCardRes {
        count_connectors: 3,
        max_width: 8192,
        max_height: 8192,
        ..offered
    };

    let output = decode_call(
        &card_res_image(&offered),
        &card_res_image(&returned),
        DecodeConfig::default(),
        SYS_ioctl,
        [3, DRM_IOCTL_MODE_GETRESOURCES as u64, ARG, 0, 0, 0],
        Some(0),
    );

    // Only room for one connector was offered, so only one is read back.
    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: DRM_IOCTL_MODE_GETRESOURCES, arg: { \
         count_fbs: 2, count_crtcs: 1, count_connectors: 1 => 3, count_encoders: 1, \
         min_width: 0, max_width: 8192, min_height: 0, max_height: 8192, \
         fb_id_ptr: [ 31, 32 ], crtc_id_ptr: [ 41 ], connector_id_ptr: [ 51 ], \
         encoder_id_ptr: [ 61 ] }) = 0\n"
    );
}

#[test]
fn card_resources_after_failure_keep_the_offered_counts() {
    let offered = offered_card_res();
    let mem = card_res_image(&offered);

    let output = decode_one(
        &mem,
        SYS_ioctl,
        [3, DRM_IOCTL_MODE_GETRESOURCES as u64, ARG, 0, 0, 0],
        Some(-13),
    );

    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: DRM_IOCTL_MODE_GETRESOURCES, arg: { \
         count_fbs: 2, count_crtcs: 1, count_connectors: 1, count_encoders: 1 }) = \
         -1 EACCES (Permission denied)\n"
    );
}

#[test]
fn card_resources_count_is_capped() {
    let offered = DrmModeCardRes {
        fb_id_ptr: FBS,
        count_fbs: u32::MAX,
        ..Default::default()
    };
    let ids: Vec<u32> = (0..64).collect();
    let mem = MemoryImage::new()
        .map(ARG, bytes_of(&offered))
        .map(FBS, id_list(&ids));

    let output = decode_one(
        &mem,
        SYS_ioctl,
        [3, DRM_IOCTL_MODE_GETRESOURCES as u64, ARG, 0, 0, 0],
        Some(0),
    );

    let expected: Vec<String> = (0..32).map(|id| id.to_string()).collect();
    assert!(
        output.contains(&format!("fb_id_ptr: [ {}, ... ]", expected.join(", "))),
        "{output}"
    );
    // Entry fetch, exit refetch and the 32 elements shown.
    assert_eq!(mem.fetch_count(), 34);
}
