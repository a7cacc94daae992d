// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use argus_common::{
    kernel_types::prctl::{KcmpEpollSlot, KCMP_EPOLL_TFD, KCMP_FILE, KCMP_VM},
    syscalls::{SYS_kcmp, SYS_prctl},
};

use crate::{
    config::{DecodeConfig, XlatStyle},
    decode_test,
    mem::MemoryImage,
    tests::{bytes_of, ARG, BAD_ADDR},
};

fn comm(name: &str) -> Vec<u8> {
    let mut bytes = name.as_bytes().to_vec();
    bytes.resize(16, 0);
    bytes
}

decode_test!(
    set_name,
    {
        (
            MemoryImage::new().map(ARG, comm("argus")),
            SYS_prctl,
            [libc::PR_SET_NAME as u64, ARG, 0, 0, 0, 0],
            Some(0),
        )
    },
    "1000 prctl(option: PR_SET_NAME, name: \"argus\") = 0\n"
);

decode_test!(
    set_name_unreadable,
    {
        (
            MemoryImage::new(),
            SYS_prctl,
            [libc::PR_SET_NAME as u64, BAD_ADDR, 0, 0, 0, 0],
            Some(-14),
        )
    },
    "1000 prctl(option: PR_SET_NAME, name: 0xdead0000) = -1 EFAULT (Bad address)\n"
);

decode_test!(
    get_name,
    {
        (
            MemoryImage::new().map(ARG, comm("kworker")),
            SYS_prctl,
            [libc::PR_GET_NAME as u64, ARG, 0, 0, 0, 0],
            Some(0),
        )
    },
    "1000 prctl(option: PR_GET_NAME, name: [\"kworker\"]) = 0\n"
);

decode_test!(
    get_name_failed,
    {
        (
            MemoryImage::new(),
            SYS_prctl,
            [libc::PR_GET_NAME as u64, ARG, 0, 0, 0, 0],
            Some(-14),
        )
    },
    "1000 prctl(option: PR_GET_NAME, name: 0x10000) = -1 EFAULT (Bad address)\n"
);

decode_test!(
    get_name_entry_only,
    {
        (
            MemoryImage::new(),
            SYS_prctl,
            [libc::PR_GET_NAME as u64, ARG, 0, 0, 0, 0],
            None,
        )
    },
    "1000 prctl(option: PR_GET_NAME <unfinished ...>\n"
);

decode_test!(
    get_name_null,
    {
        (
            MemoryImage::new(),
            SYS_prctl,
            [libc::PR_GET_NAME as u64, 0, 0, 0, 0, 0],
            Some(-14),
        )
    },
    "1000 prctl(option: PR_GET_NAME, name: NULL) = -1 EFAULT (Bad address)\n"
);

decode_test!(
    death_signal,
    {
        (
            MemoryImage::new(),
            SYS_prctl,
            [libc::PR_SET_PDEATHSIG as u64, libc::SIGKILL as u64, 0, 0, 0, 0],
            Some(0),
        )
    },
    "1000 prctl(option: PR_SET_PDEATHSIG, signal: SIGKILL) = 0\n"
);

decode_test!(
    death_signal_returned,
    {
        (
            MemoryImage::new().map(ARG, libc::SIGTERM.to_ne_bytes().to_vec()),
            SYS_prctl,
            [libc::PR_GET_PDEATHSIG as u64, ARG, 0, 0, 0, 0],
            Some(0),
        )
    },
    "1000 prctl(option: PR_GET_PDEATHSIG, signal: [SIGTERM]) = 0\n"
);

decode_test!(
    unknown_option,
    {
        (MemoryImage::new(), SYS_prctl, [0x7777, 1, 2, 3, 4, 0], Some(-22))
    },
    "1000 prctl(option: 0x7777 /* PR_??? */, arg2: 0x1, arg3: 0x2, arg4: 0x3, arg5: 0x4) = -1 EINVAL (Invalid argument)\n"
);

decode_test!(
    kcmp_files,
    {
        (MemoryImage::new(), SYS_kcmp, [100, 200, KCMP_FILE, 3, 4, 0], Some(0))
    },
    "1000 kcmp(pid1: 100, pid2: 200, type: KCMP_FILE, idx1: 3, idx2: 4) = 0\n"
);

decode_test!(
    kcmp_whole_resource,
    config: DecodeConfig::default().with_xlat_style(XlatStyle::Verbose),
    {
        (MemoryImage::new(), SYS_kcmp, [100, 200, KCMP_VM, 0, 0, 0], Some(1))
    },
    "1000 kcmp(pid1: 100, pid2: 200, type: 0x1 /* KCMP_VM */, idx1: 0, idx2: 0) = 1\n"
);

decode_test!(
    kcmp_epoll_target,
    {
        let slot = KcmpEpollSlot {
            efd: 4,
            tfd: 5,
            toff: 0,
        };
        (
            MemoryImage::new().map(ARG, bytes_of(&slot)),
            SYS_kcmp,
            [100, 200, KCMP_EPOLL_TFD, 3, ARG, 0],
            Some(0),
        )
    },
    "1000 kcmp(pid1: 100, pid2: 200, type: KCMP_EPOLL_TFD, idx1: 3, idx2: { efd: 4, tfd: 5, toff: 0 }) = 0\n"
);

decode_test!(
    kcmp_epoll_target_unreadable,
    {
        (
            MemoryImage::new(),
            SYS_kcmp,
            [100, 200, KCMP_EPOLL_TFD, 3, BAD_ADDR, 0],
            Some(-14),
        )
    },
    "1000 kcmp(pid1: 100, pid2: 200, type: KCMP_EPOLL_TFD, idx1: 3, idx2: 0xdead0000) = -1 EFAULT (Bad address)\n"
);

decode_test!(
    kcmp_unknown_type,
    {
        (MemoryImage::new(), SYS_kcmp, [100, 200, 99, 3, 4, 0], Some(-22))
    },
    "1000 kcmp(pid1: 100, pid2: 200, type: 0x63, idx1: 0x3, idx2: 0x4) = -1 EINVAL (Invalid argument)\n"
);
