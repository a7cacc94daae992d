// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argus_common::{
    ioctl::ior,
    kernel_types::evdev::{
        InputId, EVDEV_IOCTL_BASE, EVIOCGBIT_NR, EVIOCGID, EVIOCGNAME_NR, EVIOCGVERSION,
    },
    syscalls::SYS_ioctl,
};

use crate::{
    config::DecodeConfig,
    decode_test,
    mem::MemoryImage,
    tests::{bytes_of, decode_call, ARG},
};

decode_test!(
    get_version,
    {
        (
            MemoryImage::new().map(ARG, 0x10001u32.to_ne_bytes().to_vec()),
            SYS_ioctl,
            [4, EVIOCGVERSION as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 4, request: EVIOCGVERSION, arg: [0x10001]) = 0\n"
);

decode_test!(
    get_version_is_not_read_before_the_call,
    {
        (
            MemoryImage::new(),
            SYS_ioctl,
            [4, EVIOCGVERSION as u64, ARG, 0, 0, 0],
            None,
        )
    },
    "1000 ioctl(fd: 4, request: EVIOCGVERSION <unfinished ...>\n"
);

decode_test!(
    get_version_failed,
    {
        (
            MemoryImage::new(),
            SYS_ioctl,
            [4, EVIOCGVERSION as u64, ARG, 0, 0, 0],
            Some(-25),
        )
    },
    "1000 ioctl(fd: 4, request: EVIOCGVERSION, arg: 0x10000) = -1 ENOTTY (Not a typewriter)\n"
);

decode_test!(
    get_id,
    {
        let id = InputId {
            bustype: 3,
            vendor: 0x046d,
            product: 0xc52b,
            version: 0x111,
        };
        (
            MemoryImage::new().map(ARG, bytes_of(&id)),
            SYS_ioctl,
            [4, EVIOCGID as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 4, request: EVIOCGID, arg: { bustype: BUS_USB, vendor: 0x046d, product: 0xc52b, version: 0x0111 }) = 0\n"
);

#[test]
fn get_id_is_only_read_after_the_call() {
    let garbage = MemoryImage::new().map(ARG, vec![0xffu8; 8]);
    let id = InputId {
        bustype: 5,
        ..Default::default()
    };
    let filled = MemoryImage::new().map(ARG, bytes_of(&id));

    let output = decode_call(
        &garbage,
        &filled,
        DecodeConfig::default(),
        SYS_ioctl,
        [4, EVIOCGID as u64, ARG, 0, 0, 0],
        Some(0),
    );

    assert!(output.contains("arg: { bustype: BUS_BLUETOOTH, vendor: 0x0000"), "{output}");
    assert_eq!(garbage.fetch_count(), 0);
}

fn get_name(size: usize) -> u64 {
    u64::from(ior(EVDEV_IOCTL_BASE, EVIOCGNAME_NR, size))
}

decode_test!(
    get_name_uses_the_returned_length,
    {
        let mut name = b"Logitech USB Receiver\0".to_vec();
        name.resize(256, b'x');
        (
            MemoryImage::new().map(ARG, name),
            SYS_ioctl,
            [4, get_name(256), ARG, 0, 0, 0],
            Some(22),
        )
    },
    "1000 ioctl(fd: 4, request: EVIOCGNAME(256), arg: \"Logitech USB Receiver\") = 22\n"
);

#[test]
fn get_name_never_reads_past_the_buffer() {
    // The kernel claims more than the caller's 8 bytes of room.
    let mem = MemoryImage::new().map(ARG, b"Logitech".to_vec());

    let output = decode_call(
        &mem,
        &mem,
        DecodeConfig::default(),
        SYS_ioctl,
        [4, get_name(8), ARG, 0, 0, 0],
        Some(22),
    );

    assert_eq!(
        output,
        "1000 ioctl(fd: 4, request: EVIOCGNAME(8), arg: \"Logitech\"...) = 22\n"
    );
}

decode_test!(
    event_types,
    {
        let bits = (1u32 << 0) | (1 << 1) | (1 << 3);
        (
            MemoryImage::new().map(ARG, bits.to_ne_bytes().to_vec()),
            SYS_ioctl,
            [4, u64::from(ior(EVDEV_IOCTL_BASE, EVIOCGBIT_NR, 4)), ARG, 0, 0, 0],
            Some(4),
        )
    },
    "1000 ioctl(fd: 4, request: EVIOCGBIT(EV_SYN, 4), arg: [ EV_SYN, EV_KEY, EV_ABS ]) = 4\n"
);

decode_test!(
    event_types_none_set,
    {
        (
            MemoryImage::new().map(ARG, vec![0u8; 4]),
            SYS_ioctl,
            [4, u64::from(ior(EVDEV_IOCTL_BASE, EVIOCGBIT_NR, 4)), ARG, 0, 0, 0],
            Some(4),
        )
    },
    "1000 ioctl(fd: 4, request: EVIOCGBIT(EV_SYN, 4), arg: []) = 4\n"
);

#[test]
fn bit_list_is_abbreviated() {
    let mem = MemoryImage::new().map(ARG, vec![0xffu8; 4]);

    let output = decode_call(
        &mem,
        &mem,
        DecodeConfig::default().with_array_limit(Some(2)),
        SYS_ioctl,
        [4, u64::from(ior(EVDEV_IOCTL_BASE, EVIOCGBIT_NR, 4)), ARG, 0, 0, 0],
        Some(4),
    );

    assert!(output.contains("arg: [ EV_SYN, EV_KEY, ... ]"), "{output}");
}
