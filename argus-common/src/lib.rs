// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Kernel ABI shared by the argus decoders: structure layouts as the kernel
//! lays them out, ioctl request encoding and syscall numbers.

#![no_std]

pub mod ioctl;
pub mod kernel_types;
pub mod raw;
pub mod syscalls;

/// Largest single structure or attribute blob the decoders will copy in one go.
pub const PAGE_SIZE: usize = 4096;

/// Largest socket address the kernel accepts (`sizeof(struct sockaddr_storage)`).
pub const SOCKADDR_MAX: usize = 128;
