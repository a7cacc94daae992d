// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Socket addresses, decoded by family from however many bytes the caller
//! or the kernel said are valid.

use std::{
    mem::{offset_of, size_of},
    net::{Ipv4Addr, Ipv6Addr},
};

use anyhow::Result;
use argus_common::{kernel_types::net::*, raw::RawStruct, SOCKADDR_MAX};
use log::debug;

use crate::{
    arg, argf,
    dispatch::DecodeContext,
    field,
    formatting::SyscallFormatter,
    layout::{fetch_or_print, print_all_fields, FieldKind, Layout},
    with_struct,
    xlat::net::*,
};

/// `struct sockaddr` as embedded in `ifreq`.
pub const SOCKADDR_SIZE: usize = 16;

pub fn known_families() -> Vec<(u64, &'static str)> {
    ADDRESS_FAMILIES.to_vec()
}

fn render_be16(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    raw.be16(0).to_string()
}

fn render_be32(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    raw.be32(0).to_string()
}

fn render_le16(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    u16::from_le_bytes(raw.array::<2>(0)).to_string()
}

fn render_ipv4(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    Ipv4Addr::from(raw.array::<4>(0)).to_string()
}

fn render_ipv6(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    Ipv6Addr::from(raw.array::<16>(0)).to_string()
}

/// Bluetooth addresses are stored least significant byte first.
fn render_bdaddr(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    let bytes = raw.array::<6>(0);
    bytes
        .iter()
        .rev()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn render_ethertype(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.xval_hex(u64::from(raw.be16(0)), ETHERNET_PROTOCOLS)
}

fn render_vsock_flags(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.flags(u64::from(raw.u8(0)), VSOCK_FLAGS)
}

pub fn format_hwaddr(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

pub static SOCKADDR_IN: Layout = Layout {
    name: "sockaddr_in",
    size: size_of::<SockaddrIn>(),
    fields: &[
        field!("family", SockaddrIn, sin_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrIn, sin_port, In, FieldKind::Custom(2, render_be16)),
        field!(SockaddrIn, sin_addr, In, FieldKind::Custom(4, render_ipv4)),
    ],
};

pub static SOCKADDR_IN6: Layout = Layout {
    name: "sockaddr_in6",
    size: size_of::<SockaddrIn6>(),
    fields: &[
        field!("family", SockaddrIn6, sin6_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrIn6, sin6_port, In, FieldKind::Custom(2, render_be16)),
        field!(SockaddrIn6, sin6_flowinfo, In, FieldKind::Custom(4, render_be32)),
        field!(SockaddrIn6, sin6_addr, In, FieldKind::Custom(16, render_ipv6)),
        field!(SockaddrIn6, sin6_scope_id, In, FieldKind::U32),
    ],
};

pub static SOCKADDR_NL: Layout = Layout {
    name: "sockaddr_nl",
    size: size_of::<SockaddrNl>(),
    fields: &[
        field!("family", SockaddrNl, nl_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrNl, nl_pid, In, FieldKind::U32),
        field!(SockaddrNl, nl_groups, In, FieldKind::X32),
    ],
};

/// `sll_addr` is printed separately, cut to `sll_halen`.
pub static SOCKADDR_LL: Layout = Layout {
    name: "sockaddr_ll",
    size: size_of::<SockaddrLl>(),
    fields: &[
        field!("family", SockaddrLl, sll_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrLl, sll_protocol, In, FieldKind::Custom(2, render_ethertype)),
        field!(SockaddrLl, sll_ifindex, In, FieldKind::I32),
        field!(SockaddrLl, sll_hatype, In, FieldKind::Xval16(ARPHRD_TYPES)),
        field!(SockaddrLl, sll_pkttype, In, FieldKind::Xval8(PACKET_TYPES)),
        field!(SockaddrLl, sll_halen, In, FieldKind::U8),
    ],
};

pub static SOCKADDR_HCI: Layout = Layout {
    name: "sockaddr_hci",
    size: size_of::<SockaddrHci>(),
    fields: &[
        field!("family", SockaddrHci, hci_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrHci, hci_dev, In, FieldKind::U16),
        field!(SockaddrHci, hci_channel, In, FieldKind::Xval16(HCI_CHANNELS)),
    ],
};

pub static SOCKADDR_SCO: Layout = Layout {
    name: "sockaddr_sco",
    size: size_of::<SockaddrSco>(),
    fields: &[
        field!("family", SockaddrSco, sco_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrSco, sco_bdaddr, In, FieldKind::Custom(6, render_bdaddr)),
    ],
};

pub static SOCKADDR_RC: Layout = Layout {
    name: "sockaddr_rc",
    size: size_of::<SockaddrRc>(),
    fields: &[
        field!("family", SockaddrRc, rc_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrRc, rc_bdaddr, In, FieldKind::Custom(6, render_bdaddr)),
        field!(SockaddrRc, rc_channel, In, FieldKind::U8),
    ],
};

pub static SOCKADDR_L2: Layout = Layout {
    name: "sockaddr_l2",
    size: size_of::<SockaddrL2>(),
    fields: &[
        field!("family", SockaddrL2, l2_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrL2, l2_psm, In, FieldKind::Custom(2, render_le16)),
        field!(SockaddrL2, l2_bdaddr, In, FieldKind::Custom(6, render_bdaddr)),
        field!(SockaddrL2, l2_cid, In, FieldKind::Custom(2, render_le16)),
        field!(SockaddrL2, l2_bdaddr_type, In, FieldKind::Xval8(BDADDR_TYPES)),
    ],
};

pub static SOCKADDR_ALG: Layout = Layout {
    name: "sockaddr_alg",
    size: size_of::<SockaddrAlg>(),
    fields: &[
        field!("family", SockaddrAlg, salg_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrAlg, salg_type, In, FieldKind::CStr(14)),
        field!(SockaddrAlg, salg_feat, In, FieldKind::X32),
        field!(SockaddrAlg, salg_mask, In, FieldKind::X32),
        field!(SockaddrAlg, salg_name, In, FieldKind::CStr(64)),
    ],
};

pub static SOCKADDR_VM: Layout = Layout {
    name: "sockaddr_vm",
    size: size_of::<SockaddrVm>(),
    fields: &[
        field!("family", SockaddrVm, svm_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrVm, svm_port, In, FieldKind::U32),
        field!(SockaddrVm, svm_cid, In, FieldKind::Xval32(VSOCK_CIDS)),
        field!(SockaddrVm, svm_flags, In, FieldKind::Custom(1, render_vsock_flags)),
    ],
};

pub static SOCKADDR_XDP: Layout = Layout {
    name: "sockaddr_xdp",
    size: size_of::<SockaddrXdp>(),
    fields: &[
        field!("family", SockaddrXdp, sxdp_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrXdp, sxdp_flags, In, FieldKind::Flags16(XDP_FLAGS)),
        field!(SockaddrXdp, sxdp_ifindex, In, FieldKind::U32),
        field!(SockaddrXdp, sxdp_queue_id, In, FieldKind::U32),
        field!(SockaddrXdp, sxdp_shared_umem_fd, In, FieldKind::U32),
    ],
};

pub static SOCKADDR_QRTR: Layout = Layout {
    name: "sockaddr_qrtr",
    size: size_of::<SockaddrQrtr>(),
    fields: &[
        field!("family", SockaddrQrtr, sq_family, In, FieldKind::Xval16(ADDRESS_FAMILIES)),
        field!(SockaddrQrtr, sq_node, In, FieldKind::U32),
        field!(SockaddrQrtr, sq_port, In, FieldKind::U32),
    ],
};

pub static LAYOUTS: &[&Layout] = &[
    &SOCKADDR_IN,
    &SOCKADDR_IN6,
    &SOCKADDR_NL,
    &SOCKADDR_LL,
    &SOCKADDR_HCI,
    &SOCKADDR_SCO,
    &SOCKADDR_RC,
    &SOCKADDR_L2,
    &SOCKADDR_ALG,
    &SOCKADDR_VM,
    &SOCKADDR_XDP,
    &SOCKADDR_QRTR,
];

/// The Bluetooth protocols share a family and are told apart by length.
fn bluetooth_layout(len: usize) -> Option<&'static Layout> {
    match len {
        6 => Some(&SOCKADDR_HCI),
        8 => Some(&SOCKADDR_SCO),
        10 => Some(&SOCKADDR_RC),
        14 => Some(&SOCKADDR_L2),
        _ => None,
    }
}

fn family_layout(family: u16, len: usize) -> Option<&'static Layout> {
    match family {
        AF_INET => Some(&SOCKADDR_IN),
        // Shorter than the RFC 2133 layout means not an IPv6 address at all.
        AF_INET6 if len >= SIN6_MIN_LEN => Some(&SOCKADDR_IN6),
        AF_NETLINK => Some(&SOCKADDR_NL),
        AF_PACKET => Some(&SOCKADDR_LL),
        AF_BLUETOOTH => bluetooth_layout(len),
        AF_ALG => Some(&SOCKADDR_ALG),
        AF_VSOCK => Some(&SOCKADDR_VM),
        AF_XDP => Some(&SOCKADDR_XDP),
        AF_QIPCRTR => Some(&SOCKADDR_QRTR),
        _ => None,
    }
}

fn print_family(cx: &DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, family: u16) -> Result<()> {
    argf!(sf, "family: {}", cx.xval(u64::from(family), ADDRESS_FAMILIES));
    Ok(())
}

/// `sun_path` comes in three flavours: empty (unnamed), starting with a NUL
/// (abstract, shown with a leading `@`) or a filesystem path.
fn print_unix(cx: &DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, raw: &RawStruct<'_>) -> Result<()> {
    print_family(cx, sf, AF_UNIX)?;

    let path_at = offset_of!(SockaddrUn, sun_path);
    let path = raw.bytes(path_at, raw.len().saturating_sub(path_at).min(UNIX_PATH_MAX));
    match path.first() {
        None => arg!(sf, "sun_path: <unnamed>"),
        Some(0) => argf!(sf, "sun_path: @{}", cx.quoted(&path[1..])),
        Some(_) => argf!(sf, "sun_path: {}", cx.cstr(path)),
    }
    Ok(())
}

/// Prints the fields of the socket address in `bytes`, without braces.
pub fn print_sockaddr_fields(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    bytes: &[u8],
) -> Result<()> {
    let raw = RawStruct::new(bytes);
    if raw.len() < size_of::<u16>() {
        argf!(sf, "sa_data: {}", cx.hex(bytes));
        return Ok(());
    }

    let family = raw.u16(0);
    if family == AF_UNIX {
        return print_unix(cx, sf, &raw);
    }

    let Some(layout) = family_layout(family, raw.len()) else {
        debug!("no decoder for a {}-byte address of family {family}", raw.len());
        print_family(cx, sf, family)?;
        let data = raw.bytes(size_of::<u16>(), raw.len());
        if family != AF_UNSPEC || data.iter().any(|&b| b != 0) {
            argf!(sf, "sa_data: {}", cx.hex(data));
        }
        return Ok(());
    };

    let raw = raw.sub(0, layout.size);
    print_all_fields(sf, cx, layout, &raw)?;

    if family == AF_PACKET && raw.has(offset_of!(SockaddrLl, sll_addr)) {
        let halen = usize::from(raw.u8(offset_of!(SockaddrLl, sll_halen))).min(8);
        let addr = raw.bytes(offset_of!(SockaddrLl, sll_addr), halen);
        argf!(sf, "sll_addr: {}", format_hwaddr(addr));
    }
    Ok(())
}

/// `label: { ... }` for an address already in hand.
pub fn print_sockaddr_bytes(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    bytes: &[u8],
) -> Result<()> {
    if bytes.is_empty() {
        argf!(sf, "{label}: {{}}");
        return Ok(());
    }

    argf!(sf, "{label}:");
    with_struct!(sf, print_sockaddr_fields(cx, sf, bytes)?;);
    Ok(())
}

/// Fetches and prints the `len`-byte address at `addr`. Lengths past
/// `sockaddr_storage` are cut, and a negative or absurd length only shows
/// the address.
pub fn print_sockaddr(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    len: i64,
) -> Result<()> {
    let Ok(len) = usize::try_from(len) else {
        argf!(sf, "{label}: 0x{addr:x}");
        return Ok(());
    };
    if len == 0 {
        return print_sockaddr_bytes(cx, sf, label, &[]);
    }

    let Some(bytes) = fetch_or_print(cx, sf, label, addr, len.min(SOCKADDR_MAX))? else {
        return Ok(());
    };
    print_sockaddr_bytes(cx, sf, label, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bluetooth_variant_follows_length() {
        assert_eq!(bluetooth_layout(6).map(|l| l.name), Some("sockaddr_hci"));
        assert_eq!(bluetooth_layout(8).map(|l| l.name), Some("sockaddr_sco"));
        assert_eq!(bluetooth_layout(10).map(|l| l.name), Some("sockaddr_rc"));
        assert_eq!(bluetooth_layout(14).map(|l| l.name), Some("sockaddr_l2"));
        assert!(bluetooth_layout(12).is_none());
    }

    #[test]
    fn short_inet6_has_no_layout() {
        assert!(family_layout(AF_INET6, 20).is_none());
        assert_eq!(
            family_layout(AF_INET6, SIN6_MIN_LEN).map(|l| l.name),
            Some("sockaddr_in6")
        );
    }

    #[test]
    fn hardware_addresses() {
        assert_eq!(format_hwaddr(&[0x52, 0x54, 0, 0x12, 0x34, 0x56]), "52:54:00:12:34:56");
        assert_eq!(format_hwaddr(&[]), "");
    }
}
