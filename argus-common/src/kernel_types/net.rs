// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Socket addresses and the legacy `0x89xx` socket ioctls.

pub const IFNAMSIZ: usize = 16;
pub const UNIX_PATH_MAX: usize = 108;

pub const AF_UNSPEC: u16 = 0;
pub const AF_UNIX: u16 = 1;
pub const AF_INET: u16 = 2;
pub const AF_INET6: u16 = 10;
pub const AF_NETLINK: u16 = 16;
pub const AF_PACKET: u16 = 17;
pub const AF_BLUETOOTH: u16 = 31;
pub const AF_ALG: u16 = 38;
pub const AF_VSOCK: u16 = 40;
pub const AF_QIPCRTR: u16 = 42;
pub const AF_XDP: u16 = 44;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct SockaddrUn {
    pub sun_family: u16,
    pub sun_path: [u8; UNIX_PATH_MAX],
}

/// Port and address are in network byte order.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrIn {
    pub sin_family: u16,
    pub sin_port: [u8; 2],
    pub sin_addr: [u8; 4],
    pub sin_zero: [u8; 8],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrIn6 {
    pub sin6_family: u16,
    pub sin6_port: [u8; 2],
    pub sin6_flowinfo: [u8; 4],
    pub sin6_addr: [u8; 16],
    pub sin6_scope_id: u32,
}

/// RFC 2133 layout, without `sin6_scope_id`.
pub const SIN6_MIN_LEN: usize = 24;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrNl {
    pub nl_family: u16,
    pub nl_pad: u16,
    pub nl_pid: u32,
    pub nl_groups: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrLl {
    pub sll_family: u16,
    pub sll_protocol: [u8; 2],
    pub sll_ifindex: i32,
    pub sll_hatype: u16,
    pub sll_pkttype: u8,
    pub sll_halen: u8,
    pub sll_addr: [u8; 8],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrHci {
    pub hci_family: u16,
    pub hci_dev: u16,
    pub hci_channel: u16,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrSco {
    pub sco_family: u16,
    pub sco_bdaddr: [u8; 6],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrRc {
    pub rc_family: u16,
    pub rc_bdaddr: [u8; 6],
    pub rc_channel: u8,
    pub _pad: u8,
}

/// `psm` and `cid` are little endian on the wire.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrL2 {
    pub l2_family: u16,
    pub l2_psm: [u8; 2],
    pub l2_bdaddr: [u8; 6],
    pub l2_cid: [u8; 2],
    pub l2_bdaddr_type: u8,
    pub _pad: u8,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct SockaddrAlg {
    pub salg_family: u16,
    pub salg_type: [u8; 14],
    pub salg_feat: u32,
    pub salg_mask: u32,
    pub salg_name: [u8; 64],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrVm {
    pub svm_family: u16,
    pub svm_reserved1: u16,
    pub svm_port: u32,
    pub svm_cid: u32,
    pub svm_flags: u8,
    pub svm_zero: [u8; 3],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrXdp {
    pub sxdp_family: u16,
    pub sxdp_flags: u16,
    pub sxdp_ifindex: u32,
    pub sxdp_queue_id: u32,
    pub sxdp_shared_umem_fd: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct SockaddrQrtr {
    pub sq_family: u16,
    pub _pad: u16,
    pub sq_node: u32,
    pub sq_port: u32,
}

/// `struct ifreq`: the interface name followed by a 24 byte union.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct Ifreq {
    pub ifr_name: [u8; IFNAMSIZ],
    pub ifr_ifru: [u64; 3],
}

pub const IFREQ_UNION_OFFSET: usize = IFNAMSIZ;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct Ifmap {
    pub mem_start: u64,
    pub mem_end: u64,
    pub base_addr: u16,
    pub irq: u8,
    pub dma: u8,
    pub port: u8,
    pub _pad: [u8; 3],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct Ifconf {
    pub ifc_len: i32,
    pub _pad: i32,
    pub ifc_buf: u64,
}

pub const FIOSETOWN: u32 = 0x8901;
pub const SIOCSPGRP: u32 = 0x8902;
pub const FIOGETOWN: u32 = 0x8903;
pub const SIOCGPGRP: u32 = 0x8904;
pub const SIOCATMARK: u32 = 0x8905;
pub const SIOCGSTAMP: u32 = 0x8906;
pub const SIOCGSTAMPNS: u32 = 0x8907;
pub const SIOCGIFNAME: u32 = 0x8910;
pub const SIOCGIFCONF: u32 = 0x8912;
pub const SIOCGIFFLAGS: u32 = 0x8913;
pub const SIOCSIFFLAGS: u32 = 0x8914;
pub const SIOCGIFADDR: u32 = 0x8915;
pub const SIOCSIFADDR: u32 = 0x8916;
pub const SIOCGIFDSTADDR: u32 = 0x8917;
pub const SIOCSIFDSTADDR: u32 = 0x8918;
pub const SIOCGIFBRDADDR: u32 = 0x8919;
pub const SIOCSIFBRDADDR: u32 = 0x891a;
pub const SIOCGIFNETMASK: u32 = 0x891b;
pub const SIOCSIFNETMASK: u32 = 0x891c;
pub const SIOCGIFMETRIC: u32 = 0x891d;
pub const SIOCSIFMETRIC: u32 = 0x891e;
pub const SIOCGIFMTU: u32 = 0x8921;
pub const SIOCSIFMTU: u32 = 0x8922;
pub const SIOCSIFNAME: u32 = 0x8923;
pub const SIOCSIFHWADDR: u32 = 0x8924;
pub const SIOCGIFHWADDR: u32 = 0x8927;
pub const SIOCGIFSLAVE: u32 = 0x8929;
pub const SIOCSIFSLAVE: u32 = 0x8930;
pub const SIOCGIFINDEX: u32 = 0x8933;
pub const SIOCGIFTXQLEN: u32 = 0x8942;
pub const SIOCSIFTXQLEN: u32 = 0x8943;
pub const SIOCGIFMAP: u32 = 0x8970;
pub const SIOCSIFMAP: u32 = 0x8971;
pub const SIOCBRADDBR: u32 = 0x89a0;
pub const SIOCBRDELBR: u32 = 0x89a1;
pub const SIOCBRADDIF: u32 = 0x89a2;
pub const SIOCBRDELIF: u32 = 0x89a3;
