// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::mem::size_of;

use argus_common::{
    kernel_types::net::{
        Ifreq, SockaddrIn, AF_INET, AF_INET6, AF_UNIX, IFNAMSIZ, SIOCGIFADDR, SIOCGIFMTU,
    },
    syscalls::{SYS_accept, SYS_connect, SYS_ioctl, SYS_sendto},
};

use crate::{
    config::DecodeConfig,
    decode_test,
    mem::MemoryImage,
    tests::{bytes_of, decode_call, decode_one, ARG, BAD_ADDR},
};

const LENP: u64 = 0x20_000;

fn loopback(port: u16) -> SockaddrIn {
    SockaddrIn {
        sin_family: AF_INET,
        sin_port: port.to_be_bytes(),
        sin_addr: [127, 0, 0, 1],
        sin_zero: [0; 8],
    }
}

/// A socket address of `family` followed by `data`, as the caller would
/// lay it out.
fn raw_sockaddr(family: u16, data: &[u8]) -> Vec<u8> {
    let mut bytes = family.to_ne_bytes().to_vec();
    bytes.extend_from_slice(data);
    bytes
}

decode_test!(
    connect_inet,
    {
        (
            MemoryImage::new().map(ARG, bytes_of(&loopback(8080))),
            SYS_connect,
            [3, ARG, 16, 0, 0, 0],
            Some(0),
        )
    },
    "1000 connect(sockfd: 3, addr: { family: AF_INET, sin_port: 8080, sin_addr: 127.0.0.1 }, addrlen: 16) = 0\n"
);

decode_test!(
    connect_unix_path,
    {
        let addr = raw_sockaddr(AF_UNIX, b"/run/argus.sock\0");
        let len = addr.len() as u64;
        (MemoryImage::new().map(ARG, addr), SYS_connect, [3, ARG, len, 0, 0, 0], Some(0))
    },
    "1000 connect(sockfd: 3, addr: { family: AF_UNIX, sun_path: \"/run/argus.sock\" }, addrlen: 18) = 0\n"
);

decode_test!(
    connect_unix_abstract,
    {
        let addr = raw_sockaddr(AF_UNIX, b"\0argus");
        let len = addr.len() as u64;
        (MemoryImage::new().map(ARG, addr), SYS_connect, [3, ARG, len, 0, 0, 0], Some(0))
    },
    "1000 connect(sockfd: 3, addr: { family: AF_UNIX, sun_path: @\"argus\" }, addrlen: 8) = 0\n"
);

decode_test!(
    connect_unknown_family,
    {
        let addr = raw_sockaddr(200, &[1, 2, 3, 4]);
        (MemoryImage::new().map(ARG, addr), SYS_connect, [3, ARG, 6, 0, 0, 0], Some(-97))
    },
    "1000 connect(sockfd: 3, addr: { family: 200, sa_data: \"\\x01\\x02\\x03\\x04\" }, addrlen: 6) = -1 EAFNOSUPPORT (Address family not supported by protocol)\n"
);

#[test]
fn short_inet6_address_is_shown_raw() {
    let addr = raw_sockaddr(AF_INET6, &[0u8; 18]);
    let mem = MemoryImage::new().map(ARG, addr);

    let output = decode_one(&mem, SYS_connect, [3, ARG, 20, 0, 0, 0], Some(-22));

    assert!(
        output.contains(&format!("addr: {{ family: AF_INET6, sa_data: \"{}\" }}", "\\x00".repeat(18))),
        "{output}"
    );
}

decode_test!(
    connect_bad_address,
    {
        (MemoryImage::new(), SYS_connect, [3, BAD_ADDR, 16, 0, 0, 0], Some(-14))
    },
    "1000 connect(sockfd: 3, addr: 0xdead0000, addrlen: 16) = -1 EFAULT (Bad address)\n"
);

#[test]
fn connect_length_is_capped_at_sockaddr_storage() {
    let mut addr = bytes_of(&loopback(53));
    addr.resize(4096, 0);
    let mem = MemoryImage::new().map(ARG, addr);

    let output = decode_one(&mem, SYS_connect, [3, ARG, 4096, 0, 0, 0], Some(0));

    assert!(output.contains("sin_port: 53, sin_addr: 127.0.0.1 }, addrlen: 4096"), "{output}");
}

#[test]
fn accept_shows_the_length_exchange() {
    let offered = 128u32;
    let entry = MemoryImage::new().map(LENP, offered.to_ne_bytes().to_vec());
    let exit = MemoryImage::new()
        .map(ARG, bytes_of(&loopback(40000)))
        .map(LENP, (size_of::<SockaddrIn>() as u32).to_ne_bytes().to_vec());

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_accept,
        [3, ARG, LENP, 0, 0, 0],
        Some(5),
    );

    assert_eq!(
        output,
        "1000 accept(sockfd: 3, addr: { family: AF_INET, sin_port: 40000, sin_addr: 127.0.0.1 }, addrlen: [128 => 16]) = 5 (fd)\n"
    );
}

#[test]
fn accept_reads_no_more_than_was_offered() {
    // Room for the family only; the kernel reports the full size.
    let entry = MemoryImage::new().map(LENP, 2u32.to_ne_bytes().to_vec());
    let exit = MemoryImage::new()
        .map(ARG, bytes_of(&loopback(40000)))
        .map(LENP, 16u32.to_ne_bytes().to_vec());

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_accept,
        [3, ARG, LENP, 0, 0, 0],
        Some(5),
    );

    assert_eq!(
        output,
        "1000 accept(sockfd: 3, addr: { family: AF_INET }, addrlen: [2 => 16]) = 5 (fd)\n"
    );
}

decode_test!(
    accept_without_address,
    {
        (MemoryImage::new(), SYS_accept, [3, 0, 0, 0, 0, 0], Some(5))
    },
    "1000 accept(sockfd: 3, addr: NULL, addrlen: NULL) = 5 (fd)\n"
);

decode_test!(
    accept_failed,
    {
        (
            MemoryImage::new().map(LENP, 128u32.to_ne_bytes().to_vec()),
            SYS_accept,
            [3, ARG, LENP, 0, 0, 0],
            Some(-22),
        )
    },
    "1000 accept(sockfd: 3, addr: 0x10000, addrlen: [128]) = -1 EINVAL (Invalid argument)\n"
);

decode_test!(
    accept_entry_only,
    {
        (
            MemoryImage::new().map(LENP, 128u32.to_ne_bytes().to_vec()),
            SYS_accept,
            [3, ARG, LENP, 0, 0, 0],
            None,
        )
    },
    "1000 accept(sockfd: 3 <unfinished ...>\n"
);

#[test]
fn sendto_shows_the_payload() {
    let mem = MemoryImage::new().map(ARG, b"hello".to_vec());

    let output = decode_one(&mem, SYS_sendto, [3, ARG, 5, 0, 0, 0], Some(5));

    assert!(output.starts_with("1000 sendto(sockfd: 3, buf: \"hello\", len: 5, "), "{output}");
    assert!(output.ends_with("dest_addr: NULL, addrlen: 0) = 5 (bytes)\n"), "{output}");
}

fn ifreq(name: &str, union: [u64; 3]) -> Vec<u8> {
    let mut ifr_name = [0u8; IFNAMSIZ];
    ifr_name[..name.len()].copy_from_slice(name.as_bytes());
    bytes_of(&Ifreq {
        ifr_name,
        ifr_ifru: union,
    })
}

#[test]
fn interface_mtu() {
    let entry = MemoryImage::new().map(ARG, ifreq("eth0", [0; 3]));
    let exit = MemoryImage::new().map(ARG, ifreq("eth0", [1500, 0, 0]));

    let output = decode_call(
        &entry,
        &exit,
        DecodeConfig::default(),
        SYS_ioctl,
        [3, SIOCGIFMTU as u64, ARG, 0, 0, 0],
        Some(0),
    );

    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: SIOCGIFMTU, arg: { ifr_name: \"eth0\", ifr_mtu: 1500 }) = 0\n"
    );
}

decode_test!(
    interface_mtu_unknown_device,
    {
        (
            MemoryImage::new().map(ARG, ifreq("nope0", [0; 3])),
            SYS_ioctl,
            [3, SIOCGIFMTU as u64, ARG, 0, 0, 0],
            Some(-19),
        )
    },
    "1000 ioctl(fd: 3, request: SIOCGIFMTU, arg: { ifr_name: \"nope0\" }) = -1 ENODEV (No such device)\n"
);

#[test]
fn interface_address() {
    let mut addr = [0u64; 3];
    let sockaddr = SockaddrIn {
        sin_addr: [10, 0, 0, 1],
        ..loopback(0)
    };
    // The union starts with a struct sockaddr.
    let raw = bytes_of(&sockaddr);
    for (word, chunk) in addr.iter_mut().zip(raw.chunks_exact(8)) {
        *word = u64::from_ne_bytes(chunk.try_into().unwrap());
    }
    let mem = MemoryImage::new().map(ARG, ifreq("wlan0", addr));

    let output = decode_one(&mem, SYS_ioctl, [3, SIOCGIFADDR as u64, ARG, 0, 0, 0], Some(0));

    assert_eq!(
        output,
        "1000 ioctl(fd: 3, request: SIOCGIFADDR, arg: { ifr_name: \"wlan0\", ifr_addr: { family: AF_INET, sin_port: 0, sin_addr: 10.0.0.1 } }) = 0\n"
    );
}
