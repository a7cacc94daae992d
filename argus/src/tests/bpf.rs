// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::mem::size_of;

use argus_common::{
    kernel_types::bpf::{
        BpfInfoByFdAttr, BpfLinkCreateAttr, BpfMapCreateAttr, BpfMapInfo, BPF_LINK_CREATE,
        BPF_MAP_CREATE, BPF_OBJ_GET_INFO_BY_FD,
    },
    syscalls::SYS_bpf,
};

use crate::{
    config::DecodeConfig,
    decode_test,
    mem::MemoryImage,
    session::Session,
    state::RawCall,
    tests::{bytes_of, decode_call, decode_one, ARG},
};

fn hash_map() -> BpfMapCreateAttr {
    let mut map_name = [0u8; 16];
    map_name[..8].copy_from_slice(b"counters");

    BpfMapCreateAttr {
        map_type: 1,
        key_size: 4,
        value_size: 8,
        max_entries: 16,
        map_flags: 1,
        map_name,
        ..Default::default()
    }
}

decode_test!(
    map_create_from_an_older_abi,
    {
        // Only the first four fields existed in the caller's headers.
        let attr = bytes_of(&hash_map());
        (
            MemoryImage::new().map(ARG, attr[..16].to_vec()),
            SYS_bpf,
            [BPF_MAP_CREATE as u64, ARG, 16, 0, 0, 0],
            Some(3),
        )
    },
    "1000 bpf(cmd: BPF_MAP_CREATE, attr: { map_type: BPF_MAP_TYPE_HASH, key_size: 4, value_size: 8, max_entries: 16 }, size: 16) = 3 (fd)\n"
);

#[test]
fn more_bytes_never_show_fewer_fields() {
    let attr = bytes_of(&hash_map());
    let mut previous = 0;

    for size in [4usize, 12, 20, 24, 28, 44, 80] {
        let mem = MemoryImage::new().map(ARG, attr[..size].to_vec());
        let output = decode_one(&mem, SYS_bpf, [BPF_MAP_CREATE as u64, ARG, size as u64, 0, 0, 0], Some(3));

        let fields = output.matches(": ").count();
        assert!(fields > previous, "{size}: {output}");
        previous = fields;
    }
}

#[test]
fn map_create_in_full() {
    let mem = MemoryImage::new().map(ARG, bytes_of(&hash_map()));
    let size = size_of::<BpfMapCreateAttr>() as u64;

    let output = decode_one(&mem, SYS_bpf, [BPF_MAP_CREATE as u64, ARG, size, 0, 0, 0], Some(3));

    assert!(output.contains("map_flags: BPF_F_NO_PREALLOC"), "{output}");
    assert!(output.contains("map_name: \"counters\""), "{output}");
    assert!(
        output.ends_with(&format!("map_token_fd: 0 }}, size: {size}) = 3 (fd)\n")),
        "{output}"
    );
}

#[test]
fn map_create_from_a_newer_abi() {
    let mut attr = bytes_of(&hash_map());
    attr.extend_from_slice(&[0, 0, 0, 0, 1, 0, 0, 0]);
    let size = attr.len() as u64;
    let mem = MemoryImage::new().map(ARG, attr);

    let output = decode_one(&mem, SYS_bpf, [BPF_MAP_CREATE as u64, ARG, size, 0, 0, 0], Some(3));

    assert!(
        output.contains(
            "map_token_fd: 0, /* bytes 80..87 */ \"\\x00\\x00\\x00\\x00\\x01\\x00\\x00\\x00\" }, size: 88)"
        ),
        "{output}"
    );
}

decode_test!(
    unknown_command_shows_raw_attr,
    {
        (
            MemoryImage::new().map(ARG, vec![1u8, 0, 0, 0, 0, 0, 0, 0]),
            SYS_bpf,
            [0xffff, ARG, 8, 0, 0, 0],
            Some(-22),
        )
    },
    "1000 bpf(cmd: 0xffff, attr: \"\\x01\\x00\\x00\\x00\\x00\\x00\\x00\\x00\", size: 8) = -1 EINVAL (Invalid argument)\n"
);

decode_test!(
    oversized_attr_is_not_read,
    {
        (
            MemoryImage::new(),
            SYS_bpf,
            [BPF_MAP_CREATE as u64, ARG, 1 << 20, 0, 0, 0],
            Some(-7),
        )
    },
    "1000 bpf(cmd: BPF_MAP_CREATE, attr: 0x10000, size: 1048576) = -1 E2BIG (Argument list too long)\n"
);

#[test]
fn link_create_with_unknown_attach_type() {
    let attr = BpfLinkCreateAttr {
        prog_fd: 5,
        target_fd: 6,
        attach_type: 999,
        flags: 0,
        u: [1, 0, 0, 0, 0, 0],
    };
    // Exactly the structure, so any read past it faults.
    let mem = MemoryImage::new().map(ARG, bytes_of(&attr));
    let size = size_of::<BpfLinkCreateAttr>() as u64;

    let output = decode_one(&mem, SYS_bpf, [BPF_LINK_CREATE as u64, ARG, size, 0, 0, 0], Some(7));

    let payload = format!("\\x01{}", "\\x00".repeat(31));
    assert_eq!(
        output,
        format!(
            "1000 bpf(cmd: BPF_LINK_CREATE, attr: {{ prog_fd: 5, target_fd: 6, attach_type: 999, \
             flags: 0x0, link_create: \"{payload}\"... }}, size: 64) = 7 (fd)\n"
        )
    );
}

fn info_request(bpf_fd: u32, info_len: u32, info: u64) -> Vec<u8> {
    bytes_of(&BpfInfoByFdAttr {
        bpf_fd,
        info_len,
        info,
    })
}

#[test]
fn info_length_is_shown_changed() {
    let entry = MemoryImage::new().map(ARG, info_request(3, 80, 0x30_000));
    let exit = MemoryImage::new().map(ARG, info_request(3, 40, 0x30_000));

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_bpf,
        [BPF_OBJ_GET_INFO_BY_FD as u64, ARG, 16, 0, 0, 0],
        Some(0),
    );

    assert_eq!(
        output,
        "1000 bpf(cmd: BPF_OBJ_GET_INFO_BY_FD, attr: { bpf_fd: 3, info_len: 80 => 40, info: 0x30000 }, size: 16) = 0\n"
    );
}

#[test]
fn info_length_unchanged_is_shown_once() {
    let mem = MemoryImage::new().map(ARG, info_request(3, 80, 0x30_000));

    let output = decode_one(
        &mem,
        SYS_bpf,
        [BPF_OBJ_GET_INFO_BY_FD as u64, ARG, 16, 0, 0, 0],
        Some(0),
    );

    assert!(output.contains("info_len: 80, "), "{output}");
    assert!(!output.contains("=>"), "{output}");
}

#[test]
fn map_info_is_typed_by_the_fd() {
    const INFO: u64 = 0x30_000;

    let info = BpfMapInfo {
        map_type: 2,
        id: 7,
        key_size: 4,
        value_size: 8,
        max_entries: 16,
        ..Default::default()
    };
    let offered = size_of::<BpfMapInfo>() as u32;
    let entry = MemoryImage::new().map(ARG, info_request(4, offered, INFO));
    let exit = MemoryImage::new()
        .map(ARG, info_request(4, 24, INFO))
        .map(INFO, bytes_of(&info))
        .with_fd(4, "anon_inode:bpf-map");

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_bpf,
        [BPF_OBJ_GET_INFO_BY_FD as u64, ARG, 16, 0, 0, 0],
        Some(0),
    );

    // The kernel filled in 24 bytes, so nothing past map_flags is shown.
    assert_eq!(
        output,
        format!(
            "1000 bpf(cmd: BPF_OBJ_GET_INFO_BY_FD, attr: {{ bpf_fd: 4, info_len: {offered} => 24, \
             info: {{ map_type: BPF_MAP_TYPE_ARRAY, id: 7, key_size: 4, value_size: 8, \
             max_entries: 16, map_flags: 0 }} }}, size: 16) = 0\n"
        )
    );
}

#[test]
fn failed_info_query_shows_what_was_offered() {
    let mem = MemoryImage::new().map(ARG, info_request(3, 80, 0x30_000));

    let output = decode_one(
        &mem,
        SYS_bpf,
        [BPF_OBJ_GET_INFO_BY_FD as u64, ARG, 16, 0, 0, 0],
        Some(-9),
    );

    assert_eq!(
        output,
        "1000 bpf(cmd: BPF_OBJ_GET_INFO_BY_FD, attr: { bpf_fd: 3, info_len: 80 }, size: 16) = -1 EBADF (Bad file number)\n"
    );
}

#[test]
fn concurrent_calls_diff_against_their_own_entry() {
    const OTHER: u64 = ARG + 0x100;

    let entry = MemoryImage::new()
        .map(ARG, info_request(3, 80, 0x30_000))
        .map(OTHER, info_request(4, 16, 0x30_100));
    let exit = MemoryImage::new()
        .map(ARG, info_request(3, 40, 0x30_000))
        .map(OTHER, info_request(4, 16, 0x30_100));

    let mut session = Session::new(DecodeConfig::default());
    let mut output: Vec<u8> = vec![];
    let cmd = BPF_OBJ_GET_INFO_BY_FD as u64;

    session
        .on_entry(&entry, &mut output, 1, RawCall::new(SYS_bpf, [cmd, ARG, 16, 0, 0, 0]))
        .unwrap();
    session
        .on_entry(&entry, &mut output, 2, RawCall::new(SYS_bpf, [cmd, OTHER, 16, 0, 0, 0]))
        .unwrap();
    session.on_exit(&exit, &mut output, 2, 0).unwrap();
    session.on_exit(&exit, &mut output, 1, 0).unwrap();

    assert_eq!(
        String::from_utf8_lossy(&output),
        "1 bpf(cmd: BPF_OBJ_GET_INFO_BY_FD, attr: { bpf_fd: 3 <unfinished ...>\n\
         2 bpf(cmd: BPF_OBJ_GET_INFO_BY_FD, attr: { bpf_fd: 4, info_len: 16, info: 0x30100 }, size: 16) = 0\n\
         1 <... bpf resumed>, info_len: 80 => 40, info: 0x30000 }, size: 16) = 0\n"
    );
}
