// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! `ioctl(fd, request, arg)`: routes the request to a namespace decoder by
//! its type byte, or renders it generically.

use anyhow::Result;
use argus_common::{
    ioctl::{ioc_dir, ioc_nr, ioc_size, ioc_type, IOC_NONE, IOC_READ, IOC_WRITE},
    kernel_types::btrfs::BTRFS_IOCTL_MAGIC,
    raw::RawStruct,
};
use log::trace;

use crate::{
    argf,
    decoders::{btrfs, drm, evdev, sock},
    dispatch::{DecodeContext, DecodeStatus},
    format_helpers::format_addr,
    formatting::SyscallFormatter,
    layout::{fetch_or_print, RenderFn},
    state::Occurrence,
};

/// Which decoder owns a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    Btrfs,
    Drm,
    Evdev,
    Sock,
    Generic,
}

fn route(request: u32) -> Route {
    match ioc_type(request) {
        BTRFS_IOCTL_MAGIC => Route::Btrfs,
        b'd' => Route::Drm,
        b'E' => Route::Evdev,
        // The socket ioctls predate _IOC and carry neither size nor direction.
        sock::SOCK_IOC_TYPE if request >> 16 == 0 => Route::Sock,
        _ => Route::Generic,
    }
}

fn format_ioc_dir(dir: u32) -> &'static str {
    match dir {
        IOC_NONE => "_IOC_NONE",
        IOC_READ => "_IOC_READ",
        IOC_WRITE => "_IOC_WRITE",
        _ => "_IOC_READ|_IOC_WRITE",
    }
}

/// `_IOC(_IOC_READ|_IOC_WRITE, 'd', 0x42, 0x10)`
pub fn format_ioc(request: u32) -> String {
    let ty = ioc_type(request);
    let ty = if ty.is_ascii_graphic() {
        format!("'{}'", ty as char)
    } else {
        format!("{ty:#x}")
    };

    format!(
        "_IOC({}, {ty}, {:#x}, {:#x})",
        format_ioc_dir(ioc_dir(request)),
        ioc_nr(request),
        ioc_size(request)
    )
}

fn print_generic(sf: &mut SyscallFormatter<'_>, request: u32, arg: u64) -> Result<()> {
    argf!(sf, "request: {}", format_ioc(request));
    if ioc_dir(request) == IOC_NONE {
        argf!(sf, "arg: {arg}");
    } else {
        argf!(sf, "arg: {}", format_addr(arg));
    }
    Ok(())
}

/// `arg: [value]` for requests whose argument points at a single scalar.
pub(crate) fn print_pointee(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
    size: usize,
    render: RenderFn,
) -> Result<()> {
    if let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size)? {
        argf!(sf, "arg: [{}]", render(&RawStruct::new(&bytes), cx));
    }
    Ok(())
}

/// Entry half for a scalar only the kernel writes.
pub(crate) fn defer_pointee(sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<DecodeStatus> {
    if addr == 0 {
        argf!(sf, "arg: NULL");
        return Ok(DecodeStatus::Complete);
    }
    Ok(DecodeStatus::NeedsExit)
}

pub(crate) fn print_pointee_exit(
    cx: &DecodeContext<'_>,
    occ: &Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
    size: usize,
    render: RenderFn,
) -> Result<()> {
    if occ.failed() {
        argf!(sf, "arg: {}", format_addr(addr));
        return Ok(());
    }
    print_pointee(cx, sf, addr, size, render)
}

pub(crate) fn render_int(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    raw.i32(0).to_string()
}

pub(crate) fn render_u32(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    raw.u32(0).to_string()
}

pub(crate) fn render_u64(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    raw.u64(0).to_string()
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<DecodeStatus> {
    let fd = occ.arg(0) as i32;
    let request = occ.arg(1) as u32;
    let arg = occ.arg(2);

    argf!(sf, "fd: {}", cx.fd(fd));

    let route = route(request);
    trace!("ioctl {request:#x} routed to {route:?}");

    let handled = match route {
        Route::Btrfs => btrfs::decode_entry(cx, occ, sf, request, arg)?,
        Route::Drm => drm::decode_entry(cx, occ, sf, request, arg)?,
        Route::Evdev => evdev::decode_entry(cx, occ, sf, request, arg)?,
        Route::Sock => sock::decode_entry(cx, occ, sf, request, arg)?,
        Route::Generic => None,
    };

    match handled {
        Some(status) => Ok(status),
        None => {
            print_generic(sf, request, arg)?;
            Ok(DecodeStatus::Complete)
        }
    }
}

pub fn decode_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    let request = occ.arg(1) as u32;
    let arg = occ.arg(2);

    match route(request) {
        Route::Btrfs => btrfs::decode_exit(cx, occ, sf, request, arg),
        Route::Drm => drm::decode_exit(cx, occ, sf, request, arg),
        Route::Evdev => evdev::decode_exit(cx, occ, sf, request, arg),
        Route::Sock => sock::decode_exit(cx, occ, sf, request, arg),
        Route::Generic => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use argus_common::ioctl::{io, iowr};

    use super::*;

    #[test]
    fn generic_requests() {
        assert_eq!(
            format_ioc(iowr(b'd', 0x42, 16)),
            "_IOC(_IOC_READ|_IOC_WRITE, 'd', 0x42, 0x10)"
        );
        assert_eq!(format_ioc(io(0x94, 0xff)), "_IOC(_IOC_NONE, 0x94, 0xff, 0x0)");
    }

    #[test]
    fn routing_by_type() {
        assert_eq!(route(io(0x94, 8)), Route::Btrfs);
        assert_eq!(route(iowr(b'd', 0, 64)), Route::Drm);
        assert_eq!(route(0x8901), Route::Sock);
        assert_eq!(route(iowr(0x89, 1, 4)), Route::Generic);
        assert_eq!(route(0x5401), Route::Generic);
    }
}
