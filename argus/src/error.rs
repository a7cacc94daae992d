// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use nix::errno::Errno;
use thiserror::Error;

/// Why a read from the traced process did not produce the requested bytes.
///
/// Decoders never propagate a `Fault`: every one of them ends up rendered as
/// a placeholder in the output.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("address 0x{addr:x} is not mapped")]
    Unmapped { addr: u64 },
    #[error("short read at 0x{addr:x}: got {got} of {wanted} bytes")]
    Partial { addr: u64, wanted: usize, got: usize },
    #[error("refusing to fetch {len} bytes at 0x{addr:x}")]
    TooLarge { addr: u64, len: usize },
    #[error("process {pid} is gone")]
    ProcessGone { pid: i32 },
    #[error("reading 0x{addr:x} failed: {errno}")]
    Os { addr: u64, errno: Errno },
}
