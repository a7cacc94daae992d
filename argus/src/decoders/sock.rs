// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! The legacy `0x89xx` socket ioctls, most of which pass a `struct ifreq`
//! whose union member depends on the request.

use std::mem::{offset_of, size_of};

use anyhow::Result;
use argus_common::{
    kernel_types::{net::*, Timespec, Timeval},
    raw::RawStruct,
};

use crate::{
    arg, argf,
    decoders::{
        ioctl::{defer_pointee, print_pointee, print_pointee_exit, render_int},
        render_timespec, render_timeval,
        sockaddr::{format_hwaddr, print_sockaddr_bytes, SOCKADDR_SIZE},
    },
    dispatch::{command_enum, DecodeContext, DecodeStatus},
    field,
    formatting::SyscallFormatter,
    layout::{
        enter_struct, exit_struct, fetch_or_print, print_all_fields, refetch, FieldKind, Layout,
        Snapshot,
    },
    state::Occurrence,
    walker::print_array,
    with_struct,
    xlat::net::{ARPHRD_TYPES, IFF_FLAGS},
};

/// The type byte of every request handled here.
pub const SOCK_IOC_TYPE: u8 = 0x89;

command_enum! {
    pub enum SockIoctl: u32 {
        FioSetOwn = FIOSETOWN => "FIOSETOWN",
        SetPgrp = SIOCSPGRP => "SIOCSPGRP",
        FioGetOwn = FIOGETOWN => "FIOGETOWN",
        GetPgrp = SIOCGPGRP => "SIOCGPGRP",
        AtMark = SIOCATMARK => "SIOCATMARK",
        GetStamp = SIOCGSTAMP => "SIOCGSTAMP",
        GetStampNs = SIOCGSTAMPNS => "SIOCGSTAMPNS",
        GetIfName = SIOCGIFNAME => "SIOCGIFNAME",
        GetIfConf = SIOCGIFCONF => "SIOCGIFCONF",
        GetIfFlags = SIOCGIFFLAGS => "SIOCGIFFLAGS",
        SetIfFlags = SIOCSIFFLAGS => "SIOCSIFFLAGS",
        GetIfAddr = SIOCGIFADDR => "SIOCGIFADDR",
        SetIfAddr = SIOCSIFADDR => "SIOCSIFADDR",
        GetIfDstAddr = SIOCGIFDSTADDR => "SIOCGIFDSTADDR",
        SetIfDstAddr = SIOCSIFDSTADDR => "SIOCSIFDSTADDR",
        GetIfBrdAddr = SIOCGIFBRDADDR => "SIOCGIFBRDADDR",
        SetIfBrdAddr = SIOCSIFBRDADDR => "SIOCSIFBRDADDR",
        GetIfNetmask = SIOCGIFNETMASK => "SIOCGIFNETMASK",
        SetIfNetmask = SIOCSIFNETMASK => "SIOCSIFNETMASK",
        GetIfMetric = SIOCGIFMETRIC => "SIOCGIFMETRIC",
        SetIfMetric = SIOCSIFMETRIC => "SIOCSIFMETRIC",
        GetIfMtu = SIOCGIFMTU => "SIOCGIFMTU",
        SetIfMtu = SIOCSIFMTU => "SIOCSIFMTU",
        SetIfName = SIOCSIFNAME => "SIOCSIFNAME",
        SetIfHwAddr = SIOCSIFHWADDR => "SIOCSIFHWADDR",
        GetIfHwAddr = SIOCGIFHWADDR => "SIOCGIFHWADDR",
        GetIfSlave = SIOCGIFSLAVE => "SIOCGIFSLAVE",
        SetIfSlave = SIOCSIFSLAVE => "SIOCSIFSLAVE",
        GetIfIndex = SIOCGIFINDEX => "SIOCGIFINDEX",
        GetIfTxQLen = SIOCGIFTXQLEN => "SIOCGIFTXQLEN",
        SetIfTxQLen = SIOCSIFTXQLEN => "SIOCSIFTXQLEN",
        GetIfMap = SIOCGIFMAP => "SIOCGIFMAP",
        SetIfMap = SIOCSIFMAP => "SIOCSIFMAP",
        BrAddBr = SIOCBRADDBR => "SIOCBRADDBR",
        BrDelBr = SIOCBRDELBR => "SIOCBRDELBR",
        BrAddIf = SIOCBRADDIF => "SIOCBRADDIF",
        BrDelIf = SIOCBRDELIF => "SIOCBRDELIF",
    }
}

/// Which member of the `ifreq` union a request uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IfrMember {
    Index,
    Flags,
    Addr(&'static str),
    Metric,
    Mtu,
    NewName,
    HwAddr,
    Slave,
    QLen,
    Map,
}

/// The union member and whether the kernel fills it in.
fn ifreq_member(cmd: SockIoctl) -> Option<(IfrMember, bool)> {
    use IfrMember::*;
    use SockIoctl::*;

    let member = match cmd {
        GetIfName => (Index, false),
        GetIfIndex => (Index, true),
        BrAddIf | BrDelIf => (Index, false),
        GetIfFlags => (Flags, true),
        SetIfFlags => (Flags, false),
        GetIfAddr => (Addr("ifr_addr"), true),
        SetIfAddr => (Addr("ifr_addr"), false),
        GetIfDstAddr => (Addr("ifr_dstaddr"), true),
        SetIfDstAddr => (Addr("ifr_dstaddr"), false),
        GetIfBrdAddr => (Addr("ifr_broadaddr"), true),
        SetIfBrdAddr => (Addr("ifr_broadaddr"), false),
        GetIfNetmask => (Addr("ifr_netmask"), true),
        SetIfNetmask => (Addr("ifr_netmask"), false),
        GetIfMetric => (Metric, true),
        SetIfMetric => (Metric, false),
        GetIfMtu => (Mtu, true),
        SetIfMtu => (Mtu, false),
        SetIfName => (NewName, false),
        GetIfHwAddr => (HwAddr, true),
        SetIfHwAddr => (HwAddr, false),
        GetIfSlave => (Slave, true),
        SetIfSlave => (Slave, false),
        GetIfTxQLen => (QLen, true),
        SetIfTxQLen => (QLen, false),
        GetIfMap => (Map, true),
        SetIfMap => (Map, false),
        _ => return None,
    };
    Some(member)
}

pub static IFMAP: Layout = Layout {
    name: "ifmap",
    size: size_of::<Ifmap>(),
    fields: &[
        field!(Ifmap, mem_start, In, FieldKind::X64),
        field!(Ifmap, mem_end, In, FieldKind::X64),
        field!(Ifmap, base_addr, In, FieldKind::U16),
        field!(Ifmap, irq, In, FieldKind::U8),
        field!(Ifmap, dma, In, FieldKind::U8),
        field!(Ifmap, port, In, FieldKind::U8),
    ],
};

/// `ifc_len` is the room offered going in and the bytes used coming out.
pub static IFCONF: Layout = Layout {
    name: "ifconf",
    size: size_of::<Ifconf>(),
    fields: &[
        field!(Ifconf, ifc_len, InOut, FieldKind::I32),
        field!(Ifconf, ifc_buf, In, FieldKind::Addr),
    ],
};

pub static LAYOUTS: &[&Layout] = &[&IFMAP, &IFCONF];

const IFREQ_SIZE: usize = size_of::<Ifreq>();

fn print_ifr_name(cx: &DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, ifreq: &RawStruct<'_>) -> Result<()> {
    argf!(sf, "ifr_name: {}", cx.cstr(ifreq.bytes(offset_of!(Ifreq, ifr_name), IFNAMSIZ)));
    Ok(())
}

fn print_ifr_member(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    member: IfrMember,
    ifreq: &RawStruct<'_>,
) -> Result<()> {
    let u = ifreq.sub(IFREQ_UNION_OFFSET, IFREQ_SIZE - IFREQ_UNION_OFFSET);

    match member {
        IfrMember::Index => argf!(sf, "ifr_ifindex: {}", u.i32(0)),
        IfrMember::Flags => argf!(sf, "ifr_flags: {}", cx.flags(u64::from(u.u16(0)), IFF_FLAGS)),
        IfrMember::Addr(label) => {
            print_sockaddr_bytes(cx, sf, label, u.bytes(0, SOCKADDR_SIZE))?;
        }
        IfrMember::Metric => argf!(sf, "ifr_metric: {}", u.i32(0)),
        IfrMember::Mtu => argf!(sf, "ifr_mtu: {}", u.i32(0)),
        IfrMember::NewName => argf!(sf, "ifr_newname: {}", cx.cstr(u.bytes(0, IFNAMSIZ))),
        IfrMember::Slave => argf!(sf, "ifr_slave: {}", cx.cstr(u.bytes(0, IFNAMSIZ))),
        IfrMember::QLen => argf!(sf, "ifr_qlen: {}", u.i32(0)),
        IfrMember::HwAddr => {
            // A sockaddr whose family is the ARPHRD type.
            arg!(sf, "ifr_hwaddr:");
            with_struct!(sf,
                argf!(sf, "sa_family: {}", cx.xval(u64::from(u.u16(0)), ARPHRD_TYPES));
                argf!(sf, "sa_data: {}", format_hwaddr(u.bytes(2, 6)));
            );
        }
        IfrMember::Map => {
            arg!(sf, "ifr_map:");
            with_struct!(sf, print_all_fields(sf, cx, &IFMAP, &u)?;);
        }
    }
    Ok(())
}

/// Entry half of a query: the interface is named (or, for
/// `SIOCGIFNAME`, numbered) going in, the answer comes back in the union.
fn print_ifreq_query_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    cmd: SockIoctl,
    addr: u64,
) -> Result<DecodeStatus> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, IFREQ_SIZE)? else {
        return Ok(DecodeStatus::Complete);
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    sf.push_depth(b"{")?;
    if cmd == SockIoctl::GetIfName {
        print_ifr_member(cx, sf, IfrMember::Index, &raw)?;
    } else {
        print_ifr_name(cx, sf, &raw)?;
    }
    occ.set_private(Snapshot { addr, bytes });
    Ok(DecodeStatus::NeedsExit)
}

fn print_ifreq_query_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    cmd: SockIoctl,
    member: IfrMember,
) -> Result<()> {
    let Some(snapshot) = occ.take_private::<Snapshot>() else {
        return Ok(());
    };

    if !occ.failed() {
        if let Some(bytes) = refetch(cx, sf, &snapshot)? {
            let raw = RawStruct::new(&bytes);
            if cmd == SockIoctl::GetIfName {
                print_ifr_name(cx, sf, &raw)?;
            } else {
                print_ifr_member(cx, sf, member, &raw)?;
            }
        }
    }

    sf.pop_depth(b"}")
}

fn print_ifreq_set(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    member: IfrMember,
    addr: u64,
) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, IFREQ_SIZE)? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    with_struct!(sf,
        print_ifr_name(cx, sf, &raw)?;
        print_ifr_member(cx, sf, member, &raw)?;
    );
    Ok(())
}

/// The kernel reports how much of the buffer it used; only what both the
/// caller offered and the kernel claims to have written is shown.
fn print_ifconf_buffer(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let buf = old.u64(offset_of!(Ifconf, ifc_buf));
    if buf == 0 {
        return Ok(());
    }

    let len_at = offset_of!(Ifconf, ifc_len);
    let used = old.i32(len_at).min(new.i32(len_at)).max(0) as u64;
    print_array(
        cx,
        sf,
        "ifc_req",
        buf,
        used / IFREQ_SIZE as u64,
        IFREQ_SIZE,
        |cx, sf, elem, _| {
            let raw = RawStruct::new(elem);
            with_struct!(sf,
                print_ifr_name(cx, sf, &raw)?;
                print_ifr_member(cx, sf, IfrMember::Addr("ifr_addr"), &raw)?;
            );
            Ok(true)
        },
    )?;
    Ok(())
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    request: u32,
    arg: u64,
) -> Result<Option<DecodeStatus>> {
    let cmd = SockIoctl::from_code(request);
    let Some(name) = cmd.name() else {
        return Ok(None);
    };

    argf!(sf, "request: {name}");

    if let Some((member, filled_in)) = ifreq_member(cmd) {
        if filled_in || cmd == SockIoctl::GetIfName {
            return print_ifreq_query_entry(cx, occ, sf, cmd, arg).map(Some);
        }
        print_ifreq_set(cx, sf, member, arg)?;
        return Ok(Some(DecodeStatus::Complete));
    }

    use SockIoctl::*;
    let status = match cmd {
        FioSetOwn | SetPgrp => {
            print_pointee(cx, sf, arg, size_of::<i32>(), render_int)?;
            DecodeStatus::Complete
        }
        FioGetOwn | GetPgrp | AtMark | GetStamp | GetStampNs => defer_pointee(sf, arg)?,
        GetIfConf => enter_struct(cx, occ, sf, "arg", arg, &IFCONF)?,
        BrAddBr | BrDelBr => {
            argf!(sf, "arg: {}", cx.string_at(arg));
            DecodeStatus::Complete
        }
        _ => {
            argf!(sf, "arg: 0x{arg:x}");
            DecodeStatus::Complete
        }
    };

    Ok(Some(status))
}

pub fn decode_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    request: u32,
    arg: u64,
) -> Result<()> {
    let cmd = SockIoctl::from_code(request);

    if let Some((member, _)) = ifreq_member(cmd) {
        return print_ifreq_query_exit(cx, occ, sf, cmd, member);
    }

    use SockIoctl::*;
    match cmd {
        FioGetOwn | GetPgrp | AtMark => {
            print_pointee_exit(cx, occ, sf, arg, size_of::<i32>(), render_int)
        }
        GetStamp => print_pointee_exit(cx, occ, sf, arg, size_of::<Timeval>(), render_timeval),
        GetStampNs => print_pointee_exit(cx, occ, sf, arg, size_of::<Timespec>(), render_timespec),
        GetIfConf => exit_struct(cx, occ, sf, &IFCONF, print_ifconf_buffer),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_members() {
        assert_eq!(
            ifreq_member(SockIoctl::GetIfMtu),
            Some((IfrMember::Mtu, true))
        );
        assert_eq!(
            ifreq_member(SockIoctl::SetIfNetmask),
            Some((IfrMember::Addr("ifr_netmask"), false))
        );
        assert_eq!(ifreq_member(SockIoctl::GetIfConf), None);
        assert_eq!(ifreq_member(SockIoctl::BrAddBr), None);
    }

    #[test]
    fn ifreq_is_forty_bytes() {
        assert_eq!(IFREQ_SIZE, 40);
        assert_eq!(SOCK_IOC_TYPE, (SIOCGIFCONF >> 8) as u8);
    }
}
