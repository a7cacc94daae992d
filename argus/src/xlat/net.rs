// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use super::Xlat;

pub const ADDRESS_FAMILIES: Xlat = &[
    (0, "AF_UNSPEC"),
    (1, "AF_UNIX"),
    (2, "AF_INET"),
    (3, "AF_AX25"),
    (4, "AF_IPX"),
    (5, "AF_APPLETALK"),
    (6, "AF_NETROM"),
    (7, "AF_BRIDGE"),
    (8, "AF_ATMPVC"),
    (9, "AF_X25"),
    (10, "AF_INET6"),
    (11, "AF_ROSE"),
    (12, "AF_DECnet"),
    (13, "AF_NETBEUI"),
    (14, "AF_SECURITY"),
    (15, "AF_KEY"),
    (16, "AF_NETLINK"),
    (17, "AF_PACKET"),
    (18, "AF_ASH"),
    (19, "AF_ECONET"),
    (20, "AF_ATMSVC"),
    (21, "AF_RDS"),
    (22, "AF_SNA"),
    (23, "AF_IRDA"),
    (24, "AF_PPPOX"),
    (25, "AF_WANPIPE"),
    (26, "AF_LLC"),
    (27, "AF_IB"),
    (28, "AF_MPLS"),
    (29, "AF_CAN"),
    (30, "AF_TIPC"),
    (31, "AF_BLUETOOTH"),
    (32, "AF_IUCV"),
    (33, "AF_RXRPC"),
    (34, "AF_ISDN"),
    (35, "AF_PHONET"),
    (36, "AF_IEEE802154"),
    (37, "AF_CAIF"),
    (38, "AF_ALG"),
    (39, "AF_NFC"),
    (40, "AF_VSOCK"),
    (41, "AF_KCM"),
    (42, "AF_QIPCRTR"),
    (43, "AF_SMC"),
    (44, "AF_XDP"),
    (45, "AF_MCTP"),
];

pub const IFF_FLAGS: Xlat = &[
    (1 << 0, "IFF_UP"),
    (1 << 1, "IFF_BROADCAST"),
    (1 << 2, "IFF_DEBUG"),
    (1 << 3, "IFF_LOOPBACK"),
    (1 << 4, "IFF_POINTOPOINT"),
    (1 << 5, "IFF_NOTRAILERS"),
    (1 << 6, "IFF_RUNNING"),
    (1 << 7, "IFF_NOARP"),
    (1 << 8, "IFF_PROMISC"),
    (1 << 9, "IFF_ALLMULTI"),
    (1 << 10, "IFF_MASTER"),
    (1 << 11, "IFF_SLAVE"),
    (1 << 12, "IFF_MULTICAST"),
    (1 << 13, "IFF_PORTSEL"),
    (1 << 14, "IFF_AUTOMEDIA"),
    (1 << 15, "IFF_DYNAMIC"),
];

pub const ARPHRD_TYPES: Xlat = &[
    (0, "ARPHRD_NETROM"),
    (1, "ARPHRD_ETHER"),
    (2, "ARPHRD_EETHER"),
    (3, "ARPHRD_AX25"),
    (6, "ARPHRD_IEEE802"),
    (19, "ARPHRD_ATM"),
    (24, "ARPHRD_IEEE1394"),
    (32, "ARPHRD_INFINIBAND"),
    (256, "ARPHRD_SLIP"),
    (512, "ARPHRD_PPP"),
    (768, "ARPHRD_TUNNEL"),
    (769, "ARPHRD_TUNNEL6"),
    (772, "ARPHRD_LOOPBACK"),
    (776, "ARPHRD_SIT"),
    (778, "ARPHRD_IPGRE"),
    (801, "ARPHRD_IEEE80211"),
    (803, "ARPHRD_IEEE80211_RADIOTAP"),
    (823, "ARPHRD_IP6GRE"),
    (824, "ARPHRD_NETLINK"),
    (0xfffe, "ARPHRD_NONE"),
    (0xffff, "ARPHRD_VOID"),
];

pub const PACKET_TYPES: Xlat = &[
    (0, "PACKET_HOST"),
    (1, "PACKET_BROADCAST"),
    (2, "PACKET_MULTICAST"),
    (3, "PACKET_OTHERHOST"),
    (4, "PACKET_OUTGOING"),
    (5, "PACKET_LOOPBACK"),
    (6, "PACKET_USER"),
    (7, "PACKET_KERNEL"),
];

pub const ETHERNET_PROTOCOLS: Xlat = &[
    (0x0003, "ETH_P_ALL"),
    (0x0800, "ETH_P_IP"),
    (0x0806, "ETH_P_ARP"),
    (0x8100, "ETH_P_8021Q"),
    (0x86dd, "ETH_P_IPV6"),
    (0x88cc, "ETH_P_LLDP"),
    (0x88a8, "ETH_P_8021AD"),
];

pub const HCI_CHANNELS: Xlat = &[
    (0, "HCI_CHANNEL_RAW"),
    (1, "HCI_CHANNEL_USER"),
    (2, "HCI_CHANNEL_MONITOR"),
    (3, "HCI_CHANNEL_CONTROL"),
    (4, "HCI_CHANNEL_LOGGING"),
];

pub const BDADDR_TYPES: Xlat = &[
    (0, "BDADDR_BREDR"),
    (1, "BDADDR_LE_PUBLIC"),
    (2, "BDADDR_LE_RANDOM"),
];

pub const VSOCK_CIDS: Xlat = &[
    (u32::MAX as u64, "VMADDR_CID_ANY"),
    (0, "VMADDR_CID_HYPERVISOR"),
    (1, "VMADDR_CID_LOCAL"),
    (2, "VMADDR_CID_HOST"),
];

pub const VSOCK_FLAGS: Xlat = &[(1 << 0, "VMADDR_FLAG_TO_HOST")];

pub const XDP_FLAGS: Xlat = &[
    (1 << 0, "XDP_SHARED_UMEM"),
    (1 << 1, "XDP_COPY"),
    (1 << 2, "XDP_ZEROCOPY"),
    (1 << 3, "XDP_USE_NEED_WAKEUP"),
    (1 << 4, "XDP_USE_SG"),
];

pub const MSG_FLAGS: Xlat = &[
    (0x1, "MSG_OOB"),
    (0x2, "MSG_PEEK"),
    (0x4, "MSG_DONTROUTE"),
    (0x8, "MSG_CTRUNC"),
    (0x10, "MSG_PROXY"),
    (0x20, "MSG_TRUNC"),
    (0x40, "MSG_DONTWAIT"),
    (0x80, "MSG_EOR"),
    (0x100, "MSG_WAITALL"),
    (0x200, "MSG_FIN"),
    (0x400, "MSG_SYN"),
    (0x800, "MSG_CONFIRM"),
    (0x1000, "MSG_RST"),
    (0x2000, "MSG_ERRQUEUE"),
    (0x4000, "MSG_NOSIGNAL"),
    (0x8000, "MSG_MORE"),
    (0x10000, "MSG_WAITFORONE"),
    (0x20000, "MSG_BATCH"),
    (0x4000000, "MSG_ZEROCOPY"),
    (0x20000000, "MSG_FASTOPEN"),
    (0x40000000, "MSG_CMSG_CLOEXEC"),
];

/// `accept4` flags.
pub const SOCK_FLAGS: Xlat = &[(0o4000, "SOCK_NONBLOCK"), (0o2000000, "SOCK_CLOEXEC")];
