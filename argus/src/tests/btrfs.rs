// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argus_common::{
    kernel_types::btrfs::{
        BtrfsSpaceArgs, BtrfsSpaceInfo, BTRFS_IOC_DEFAULT_SUBVOL, BTRFS_IOC_SPACE_INFO,
        BTRFS_IOC_SYNC,
    },
    syscalls::SYS_ioctl,
};

use crate::{
    config::DecodeConfig,
    decode_test,
    mem::MemoryImage,
    tests::{bytes_of, decode_call, decode_one, ARG},
};

decode_test!(
    sync,
    {
        (
            MemoryImage::new(),
            SYS_ioctl,
            [3, BTRFS_IOC_SYNC as u64, 0, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 3, request: BTRFS_IOC_SYNC) = 0\n"
);

decode_test!(
    default_subvol,
    {
        (
            MemoryImage::new().map(ARG, 256u64.to_ne_bytes().to_vec()),
            SYS_ioctl,
            [3, BTRFS_IOC_DEFAULT_SUBVOL as u64, ARG, 0, 0, 0],
            Some(0),
        )
    },
    "1000 ioctl(fd: 3, request: BTRFS_IOC_DEFAULT_SUBVOL, arg: [256]) = 0\n"
);

/// The argument header followed by `spaces`, in one mapping.
fn space_image(slots: u64, total: u64, spaces: &[BtrfsSpaceInfo]) -> MemoryImage {
    let mut bytes = bytes_of(&BtrfsSpaceArgs {
        space_slots: slots,
        total_spaces: total,
    });
    for space in spaces {
        bytes.extend(bytes_of(space));
    }
    MemoryImage::new().map(ARG, bytes)
}

fn space(flags: u64, total_bytes: u64, used_bytes: u64) -> BtrfsSpaceInfo {
    BtrfsSpaceInfo {
        flags,
        total_bytes,
        used_bytes,
    }
}

#[test]
fn space_info_lists_the_filled_slots() {
    let spaces = [space(1, 1 << 30, 4096), space(4, 1 << 28, 8192)];
    let entry = space_image(2, 0, &spaces);
    let exit = space_image(2, 2, &spaces);

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_ioctl,
        [3, BTRFS_IOC_SPACE_INFO as u64, ARG, 0, 0, 0],
        Some(0),
    );

    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: BTRFS_IOC_SPACE_INFO, arg: { space_slots: 2, total_spaces: 2, \
         spaces: [ \
         btrfs_ioctl_space_info { flags: BTRFS_BLOCK_GROUP_DATA, total_bytes: 1073741824, used_bytes: 4096 }, \
         btrfs_ioctl_space_info { flags: BTRFS_BLOCK_GROUP_METADATA, total_bytes: 268435456, used_bytes: 8192 } \
         ] }) = 0\n"
    );
}

#[test]
fn space_info_only_counting() {
    let entry = space_image(0, 0, &[]);
    let exit = space_image(0, 3, &[]);

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_ioctl,
        [3, BTRFS_IOC_SPACE_INFO as u64, ARG, 0, 0, 0],
        Some(0),
    );

    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: BTRFS_IOC_SPACE_INFO, arg: { space_slots: 0, total_spaces: 3 }) = 0\n"
    );
}

#[test]
fn space_info_never_reads_past_the_offered_slots() {
    let spaces = [space(1, 10, 1), space(2, 20, 2), space(4, 30, 3)];
    let entry = space_image(1, 0, &spaces);
    let exit = space_image(1, 3, &spaces);

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_ioctl,
        [3, BTRFS_IOC_SPACE_INFO as u64, ARG, 0, 0, 0],
        Some(0),
    );

    assert!(output.contains("total_spaces: 3, spaces: [ btrfs_ioctl_space_info { flags: BTRFS_BLOCK_GROUP_DATA, total_bytes: 10, used_bytes: 1 } ] }"), "{output}");
    // Header at entry, header at exit, one element.
    assert_eq!(exit.fetch_count(), 2);
    assert_eq!(entry.fetch_count(), 1);
}

#[test]
fn space_info_hostile_counts_stop_at_the_ceiling() {
    let spaces: Vec<BtrfsSpaceInfo> = (0..1100).map(|n| space(1, n, 0)).collect();
    let mem = space_image(u64::from(u32::MAX), u64::from(u32::MAX), &spaces);

    let output = decode_call(
        &mem,
        &mem,
        DecodeConfig::default().verbose(),
        SYS_ioctl,
        [3, BTRFS_IOC_SPACE_INFO as u64, ARG, 0, 0, 0],
        Some(0),
    );

    assert_eq!(output.matches("btrfs_ioctl_space_info {").count(), 1024);
    assert!(
        output.contains("total_bytes: 1023, used_bytes: 0 }, ... ] }) = 0\n"),
        "{}",
        &output[output.len().saturating_sub(200)..]
    );
    assert!(mem.fetch_count() <= 1026, "{}", mem.fetch_count());
}

#[test]
fn space_info_failure_shows_the_offered_slots() {
    let mem = space_image(8, 0, &[]);

    let output = decode_one(
        &mem,
        SYS_ioctl,
        [3, BTRFS_IOC_SPACE_INFO as u64, ARG, 0, 0, 0],
        Some(-25),
    );

    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: BTRFS_IOC_SPACE_INFO, arg: { space_slots: 8 }) = -1 ENOTTY (Not a typewriter)\n"
    );
}
