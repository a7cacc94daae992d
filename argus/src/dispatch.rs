// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Routes a call occurrence to the decoder for its syscall and, for
//! multiplexing syscalls, for its command.

use anyhow::Result;
use argus_common::syscalls::{
    ALL_SYSCALLS, SYS_accept, SYS_accept4, SYS_bind, SYS_bpf, SYS_connect, SYS_getpeername,
    SYS_getsockname, SYS_ioctl, SYS_kcmp, SYS_prctl, SYS_recvfrom, SYS_sendto,
};
use clap::ValueEnum;
use log::{debug, trace};

use crate::{
    argf,
    config::DecodeConfig,
    decoders::{bpf, btrfs, drm, evdev, ioctl, kcmp, prctl, sock, sockaddr, socket},
    format_helpers::{format_cstr, format_hex_string, format_quoted},
    formatting::SyscallFormatter,
    mem::ReadMemory,
    scratch::ScratchBuffers,
    state::Occurrence,
    xlat::{format_flags, format_xval, format_xval_hex, Xlat},
};

/// Everything a decoder may consult while rendering one phase of a call.
pub struct DecodeContext<'a> {
    pub mem: &'a dyn ReadMemory,
    pub config: &'a DecodeConfig,
    pub scratch: &'a mut ScratchBuffers,
}

impl<'a> DecodeContext<'a> {
    pub fn new(
        mem: &'a dyn ReadMemory,
        config: &'a DecodeConfig,
        scratch: &'a mut ScratchBuffers,
    ) -> Self {
        DecodeContext {
            mem,
            config,
            scratch,
        }
    }

    pub fn xval(&self, value: u64, table: Xlat) -> String {
        format_xval(value, table, self.config.xlat_style)
    }

    pub fn xval_hex(&self, value: u64, table: Xlat) -> String {
        format_xval_hex(value, table, self.config.xlat_style)
    }

    pub fn flags(&self, value: u64, table: Xlat) -> String {
        format_flags(value, table, self.config.xlat_style)
    }

    pub fn quoted(&self, bytes: &[u8]) -> String {
        format_quoted(bytes, self.config.max_string_len)
    }

    pub fn cstr(&self, bytes: &[u8]) -> String {
        format_cstr(bytes, self.config.max_string_len)
    }

    pub fn hex(&self, bytes: &[u8]) -> String {
        format_hex_string(bytes, self.config.max_string_len)
    }

    /// Renders the NUL-terminated string at `addr`: `NULL`, the quoted
    /// string, or the bare address when it can't be read.
    pub fn string_at(&self, addr: u64) -> String {
        if addr == 0 {
            return "NULL".to_string();
        }

        // One byte more than we print, so that a cut string shows `...`.
        match self.mem.fetch_cstring(addr, self.config.max_string_len + 1) {
            Ok(bytes) => self.cstr(&bytes),
            Err(fault) => {
                debug!("string at 0x{addr:x}: {fault}");
                format!("0x{addr:x}")
            }
        }
    }

    /// Renders `len` raw bytes at `addr` as a quoted string.
    pub fn buffer_at(&self, addr: u64, len: u64) -> String {
        if addr == 0 {
            return "NULL".to_string();
        }

        let shown = len.min(self.config.max_string_len as u64) as usize;
        match self.mem.fetch_exact(addr, shown) {
            Ok(bytes) => {
                let mut out = self.quoted(&bytes);
                if len > shown as u64 {
                    out.push_str("...");
                }
                out
            }
            Err(fault) => {
                debug!("buffer at 0x{addr:x}: {fault}");
                format!("0x{addr:x}")
            }
        }
    }

    /// Renders an fd, with what it points at when that is known.
    pub fn fd(&self, fd: i32) -> String {
        match self.mem.fd_path(fd) {
            Some(path) => format!("{fd}<{path}>"),
            None => fd.to_string(),
        }
    }
}

/// What a decoder still needs after the entry phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The rendering is complete as far as arguments go.
    Complete,
    /// The exit phase has more to print.
    NeedsExit,
}

/// Declares a closed set of command codes, plus an `Unknown` variant so that
/// every code maps to something.
macro_rules! command_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $code_ty:ty {
            $($variant:ident = $code:expr => $label:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        $vis enum $name {
            $($variant,)*
            Unknown($code_ty),
        }

        #[allow(dead_code)]
        impl $name {
            pub const KNOWN: &'static [($code_ty, &'static str)] = &[$(($code, $label),)*];

            pub fn from_code(code: $code_ty) -> Self {
                $(
                    if code == $code {
                        return $name::$variant;
                    }
                )*
                $name::Unknown(code)
            }

            pub fn code(self) -> $code_ty {
                match self {
                    $($name::$variant => $code,)*
                    $name::Unknown(code) => code,
                }
            }

            pub fn name(self) -> Option<&'static str> {
                match self {
                    $($name::$variant => Some($label),)*
                    $name::Unknown(_) => None,
                }
            }

            pub fn is_known(self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }
    };
}
pub(crate) use command_enum;

/// Entry phase: prints the arguments known before the call runs.
pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<DecodeStatus> {
    trace!("entry of syscall {} for {}", occ.nr(), occ.tid());

    match occ.nr() {
        SYS_ioctl => ioctl::decode_entry(cx, occ, sf),
        SYS_bpf => bpf::decode_entry(cx, occ, sf),
        SYS_prctl => prctl::decode_entry(cx, occ, sf),
        SYS_kcmp => kcmp::decode_entry(cx, occ, sf),
        SYS_bind | SYS_connect | SYS_accept | SYS_accept4 | SYS_getsockname | SYS_getpeername
        | SYS_sendto | SYS_recvfrom => socket::decode_entry(cx, occ, sf),
        _ => {
            print_raw_args(occ, sf)?;
            Ok(DecodeStatus::Complete)
        }
    }
}

/// Exit phase: only called for occurrences whose entry asked for it.
pub fn decode_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    trace!(
        "exit of syscall {} for {} ({:?})",
        occ.nr(),
        occ.tid(),
        occ.retval()
    );

    match occ.nr() {
        SYS_ioctl => ioctl::decode_exit(cx, occ, sf),
        SYS_bpf => bpf::decode_exit(cx, occ, sf),
        SYS_prctl => prctl::decode_exit(cx, occ, sf),
        SYS_bind | SYS_connect | SYS_accept | SYS_accept4 | SYS_getsockname | SYS_getpeername
        | SYS_sendto | SYS_recvfrom => socket::decode_exit(cx, occ, sf),
        _ => Ok(()),
    }
}

fn print_raw_args(occ: &Occurrence, sf: &mut SyscallFormatter<'_>) -> Result<()> {
    for arg in occ.call().args {
        argf!(sf, "0x{arg:x}");
    }
    Ok(())
}

/// Groups of command codes sharing a numbering scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Namespace {
    Syscalls,
    Bpf,
    Btrfs,
    Drm,
    Evdev,
    Sock,
    AddressFamilies,
    Prctl,
    Kcmp,
}

/// Every code of `namespace` that has a name.
pub fn known_commands(namespace: Namespace) -> Vec<(u64, &'static str)> {
    fn widen<T: Copy + Into<u64>>(table: &[(T, &'static str)]) -> Vec<(u64, &'static str)> {
        table.iter().map(|&(code, name)| (code.into(), name)).collect()
    }

    match namespace {
        Namespace::Syscalls => ALL_SYSCALLS
            .iter()
            .map(|&(nr, name)| (nr as u64, name))
            .collect(),
        Namespace::Bpf => widen(bpf::BpfCommand::KNOWN),
        Namespace::Btrfs => widen(btrfs::BtrfsIoctl::KNOWN),
        Namespace::Drm => widen(drm::DrmIoctl::KNOWN),
        Namespace::Evdev => evdev::known_requests(),
        Namespace::Sock => widen(sock::SockIoctl::KNOWN),
        Namespace::AddressFamilies => sockaddr::known_families(),
        Namespace::Prctl => prctl::known_options(),
        Namespace::Kcmp => widen(kcmp::KcmpType::KNOWN),
    }
}
