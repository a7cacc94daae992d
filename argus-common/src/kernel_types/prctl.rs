// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Structures passed by pointer to prctl(2) and kcmp(2).

pub const TASK_COMM_LEN: usize = 16;

pub const PR_SET_MM_START_CODE: u64 = 1;
pub const PR_SET_MM_END_CODE: u64 = 2;
pub const PR_SET_MM_START_DATA: u64 = 3;
pub const PR_SET_MM_END_DATA: u64 = 4;
pub const PR_SET_MM_START_STACK: u64 = 5;
pub const PR_SET_MM_START_BRK: u64 = 6;
pub const PR_SET_MM_BRK: u64 = 7;
pub const PR_SET_MM_ARG_START: u64 = 8;
pub const PR_SET_MM_ARG_END: u64 = 9;
pub const PR_SET_MM_ENV_START: u64 = 10;
pub const PR_SET_MM_ENV_END: u64 = 11;
pub const PR_SET_MM_AUXV: u64 = 12;
pub const PR_SET_MM_EXE_FILE: u64 = 13;
pub const PR_SET_MM_MAP: u64 = 14;
pub const PR_SET_MM_MAP_SIZE: u64 = 15;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct PrctlMmMap {
    pub start_code: u64,
    pub end_code: u64,
    pub start_data: u64,
    pub end_data: u64,
    pub start_brk: u64,
    pub brk: u64,
    pub start_stack: u64,
    pub arg_start: u64,
    pub arg_end: u64,
    pub env_start: u64,
    pub env_end: u64,
    pub auxv: u64,
    pub auxv_size: u32,
    pub exe_fd: u32,
}

pub const KCMP_FILE: u64 = 0;
pub const KCMP_VM: u64 = 1;
pub const KCMP_FILES: u64 = 2;
pub const KCMP_FS: u64 = 3;
pub const KCMP_SIGHAND: u64 = 4;
pub const KCMP_IO: u64 = 5;
pub const KCMP_SYSVSEM: u64 = 6;
pub const KCMP_EPOLL_TFD: u64 = 7;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct KcmpEpollSlot {
    pub efd: u32,
    pub tfd: u32,
    pub toff: u32,
}
