// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! The socket calls that carry a socket address, either supplied by the
//! caller with its length or filled in by the kernel through a value-result
//! length.

use anyhow::Result;
use argus_common::{
    raw::RawStruct,
    syscalls::{
        SYS_accept, SYS_accept4, SYS_bind, SYS_connect, SYS_getpeername, SYS_getsockname,
        SYS_recvfrom, SYS_sendto,
    },
};
use log::debug;

use crate::{
    argf,
    decoders::sockaddr::print_sockaddr,
    dispatch::{DecodeContext, DecodeStatus},
    format_helpers::{format_addr, ReturnKind},
    formatting::SyscallFormatter,
    state::Occurrence,
    xlat::net::{MSG_FLAGS, SOCK_FLAGS},
};

/// What the caller said the address buffer could hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AddrLen {
    ptr: u64,
    entry: Option<i32>,
}

fn read_addrlen(cx: &DecodeContext<'_>, ptr: u64) -> Option<i32> {
    if ptr == 0 {
        return None;
    }
    match cx.mem.fetch_exact(ptr, 4) {
        Ok(bytes) => Some(RawStruct::new(&bytes).i32(0)),
        Err(fault) => {
            debug!("addrlen at 0x{ptr:x}: {fault}");
            None
        }
    }
}

fn format_len_change(entry: Option<i32>, exit: Option<i32>) -> String {
    match (entry, exit) {
        (Some(a), Some(b)) if a != b => format!("[{a} => {b}]"),
        (Some(a), _) => format!("[{a}]"),
        (None, Some(b)) => format!("[{b}]"),
        (None, None) => "?".to_string(),
    }
}

/// Address and length when the caller passes both by value.
fn print_supplied_addr(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    len: u64,
) -> Result<()> {
    let len = len as u32 as i32;
    if addr == 0 {
        argf!(sf, "{label}: NULL");
    } else {
        print_sockaddr(cx, sf, label, addr, i64::from(len))?;
    }
    argf!(sf, "addrlen: {len}");
    Ok(())
}

/// Entry half of a value-result address: remembers the offered length.
fn stash_addrlen(cx: &DecodeContext<'_>, occ: &mut Occurrence, ptr: u64) -> DecodeStatus {
    occ.set_private(AddrLen {
        ptr,
        entry: read_addrlen(cx, ptr),
    });
    DecodeStatus::NeedsExit
}

/// Exit half: the kernel writes at most the offered length but reports the
/// full size of the address, so only the smaller of the two is valid.
fn print_returned_addr(
    cx: &DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
) -> Result<()> {
    let Some(len) = occ.take_private::<AddrLen>() else {
        argf!(sf, "{label}: {}", format_addr(addr));
        return Ok(());
    };

    if len.ptr == 0 {
        argf!(sf, "{label}: {}", format_addr(addr));
        argf!(sf, "addrlen: NULL");
        return Ok(());
    }

    if occ.failed() {
        argf!(sf, "{label}: {}", format_addr(addr));
        argf!(sf, "addrlen: {}", format_len_change(len.entry, None));
        return Ok(());
    }

    let exit = read_addrlen(cx, len.ptr);
    match (addr, len.entry, exit) {
        (0, _, _) => argf!(sf, "{label}: NULL"),
        (_, Some(entry), Some(exit)) => {
            print_sockaddr(cx, sf, label, addr, i64::from(entry.min(exit)))?;
        }
        _ => argf!(sf, "{label}: 0x{addr:x}"),
    }
    argf!(sf, "addrlen: {}", format_len_change(len.entry, exit));
    Ok(())
}

fn print_data(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    buf: u64,
    len: u64,
) -> Result<()> {
    argf!(sf, "buf: {}", cx.buffer_at(buf, len));
    Ok(())
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<DecodeStatus> {
    let fd = occ.arg(0) as i32;
    argf!(sf, "sockfd: {}", cx.fd(fd));

    let status = match occ.nr() {
        SYS_bind | SYS_connect => {
            print_supplied_addr(cx, sf, "addr", occ.arg(1), occ.arg(2))?;
            DecodeStatus::Complete
        }
        SYS_accept | SYS_accept4 => {
            sf.set_return_kind(ReturnKind::Fd);
            let ptr = occ.arg(2);
            stash_addrlen(cx, occ, ptr)
        }
        SYS_getsockname | SYS_getpeername => {
            let ptr = occ.arg(2);
            stash_addrlen(cx, occ, ptr)
        }
        SYS_sendto => {
            sf.set_return_kind(ReturnKind::Bytes);
            print_data(cx, sf, occ.arg(1), occ.arg(2))?;
            argf!(sf, "len: {}", occ.arg(2));
            argf!(sf, "flags: {}", cx.flags(occ.arg(3) & 0xffff_ffff, MSG_FLAGS));
            print_supplied_addr(cx, sf, "dest_addr", occ.arg(4), occ.arg(5))?;
            DecodeStatus::Complete
        }
        SYS_recvfrom => {
            sf.set_return_kind(ReturnKind::Bytes);
            let ptr = occ.arg(5);
            stash_addrlen(cx, occ, ptr)
        }
        nr => {
            debug!("socket decoder called for syscall {nr}");
            DecodeStatus::Complete
        }
    };

    Ok(status)
}

pub fn decode_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    let addr = occ.arg(1);
    match occ.nr() {
        SYS_accept | SYS_getsockname | SYS_getpeername => {
            print_returned_addr(cx, occ, sf, "addr", addr)
        }
        SYS_accept4 => {
            print_returned_addr(cx, occ, sf, "addr", addr)?;
            argf!(sf, "flags: {}", cx.flags(occ.arg(3) & 0xffff_ffff, SOCK_FLAGS));
            Ok(())
        }
        SYS_recvfrom => {
            if occ.failed() {
                argf!(sf, "buf: {}", format_addr(addr));
            } else {
                let received = occ.retval().unwrap_or(0).max(0) as u64;
                print_data(cx, sf, addr, received.min(occ.arg(2)))?;
            }
            argf!(sf, "len: {}", occ.arg(2));
            argf!(sf, "flags: {}", cx.flags(occ.arg(3) & 0xffff_ffff, MSG_FLAGS));
            let src = occ.arg(4);
            print_returned_addr(cx, occ, sf, "src_addr", src)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_result_lengths() {
        assert_eq!(format_len_change(Some(128), Some(16)), "[128 => 16]");
        assert_eq!(format_len_change(Some(16), Some(16)), "[16]");
        assert_eq!(format_len_change(Some(16), None), "[16]");
        assert_eq!(format_len_change(None, None), "?");
    }
}
