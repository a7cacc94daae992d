// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

mod bpf;
mod btrfs;
mod drm;
mod evdev;
mod faults;
mod network;
mod process;

use argus_common::syscalls::{SYS_bpf, SYS_connect, SYS_ioctl, SYS_kcmp, SYS_prctl};

use crate::{
    config::DecodeConfig,
    decoders,
    dispatch::{known_commands, Namespace},
    layout::Layout,
    mem::MemoryImage,
    session::Session,
    state::RawCall,
};

/// Thread id every single-call test runs under.
pub(crate) const TID: u32 = 1000;

/// Where tests map the structures arguments point to.
pub(crate) const ARG: u64 = 0x10_000;

/// Nothing is ever mapped here.
pub(crate) const BAD_ADDR: u64 = 0xdead_0000;

/// The in-memory image of a kernel structure.
pub(crate) fn bytes_of<T: Copy>(value: &T) -> Vec<u8> {
    let ptr = value as *const T as *const u8;
    unsafe { std::slice::from_raw_parts(ptr, std::mem::size_of::<T>()) }.to_vec()
}

/// Runs one call through a session: entry against `entry`, then exit
/// against `exit` when `retval` is given. Without a return value the line is
/// left unfinished.
pub(crate) fn decode_call(
    entry: &MemoryImage,
    exit: &MemoryImage,
    config: DecodeConfig,
    nr: i64,
    args: [u64; 6],
    retval: Option<i64>,
) -> String {
    let mut session = Session::new(config);
    let mut output: Vec<u8> = vec![];

    session
        .on_entry(entry, &mut output, TID, RawCall::new(nr, args))
        .unwrap();
    match retval {
        Some(retval) => session.on_exit(exit, &mut output, TID, retval).unwrap(),
        None => session.interrupt_open_line(&mut output).unwrap(),
    }
    assert_eq!(session.pending(), usize::from(retval.is_none()));

    String::from_utf8_lossy(&output).into_owned()
}

pub(crate) fn decode_one(mem: &MemoryImage, nr: i64, args: [u64; 6], retval: Option<i64>) -> String {
    decode_call(mem, mem, DecodeConfig::default(), nr, args, retval)
}

#[macro_export]
macro_rules! decode_test {
    ($name:ident, $init:block, $expected:expr) => {
        $crate::decode_test!(
            $name,
            config: $crate::config::DecodeConfig::default(),
            $init,
            $expected
        );
    };
    ($name:ident, config: $config:expr, $init:block, $expected:expr) => {
        #[test]
        fn $name() {
            let (mem, nr, args, retval): ($crate::mem::MemoryImage, i64, [u64; 6], Option<i64>) =
                $init;

            let output = $crate::tests::decode_call(&mem, &mem, $config, nr, args, retval);

            assert_eq!(output.as_str(), $expected);
        }
    };
}

/// Every command a namespace knows, plus codes it doesn't.
fn codes_to_try(namespace: Namespace) -> Vec<u64> {
    let mut codes: Vec<u64> = known_commands(namespace)
        .into_iter()
        .map(|(code, _)| code)
        .collect();
    codes.extend([0, 0x7fff, 0xffff_ffff, u64::MAX]);
    codes
}

/// The call that exercises `code` in `namespace`, with `arg` as the
/// structure pointer.
fn call_for(namespace: Namespace, code: u64, arg: u64) -> (i64, [u64; 6]) {
    match namespace {
        Namespace::Syscalls => (code as i64, [arg, arg, 16, 0, 0, 0]),
        Namespace::Bpf => (SYS_bpf, [code, arg, 64, 0, 0, 0]),
        Namespace::Btrfs | Namespace::Drm | Namespace::Evdev | Namespace::Sock => {
            (SYS_ioctl, [3, code, arg, 0, 0, 0])
        }
        Namespace::AddressFamilies => (SYS_connect, [3, arg, 128, 0, 0, 0]),
        Namespace::Prctl => (SYS_prctl, [code, arg, arg, 0, 0, 0]),
        Namespace::Kcmp => (SYS_kcmp, [1, 2, code, 3, arg, 0]),
    }
}

#[test]
fn every_code_in_every_namespace_renders() {
    let zeroes = MemoryImage::new().map(ARG, vec![0u8; 0x10000]);
    let unmapped = MemoryImage::new();

    for &namespace in <Namespace as clap::ValueEnum>::value_variants() {
        for code in codes_to_try(namespace) {
            for (mem, arg) in [(&zeroes, ARG), (&unmapped, BAD_ADDR), (&unmapped, 0)] {
                let (nr, args) = call_for(namespace, code, arg);

                for retval in [None, Some(0), Some(-22)] {
                    let output = decode_one(mem, nr, args, retval);
                    assert!(
                        output.starts_with(&format!("{TID} ")) && output.ends_with('\n'),
                        "{namespace:?} 0x{code:x} at 0x{arg:x}: {output:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn address_families_render_with_their_family_set() {
    for code in codes_to_try(Namespace::AddressFamilies) {
        let mut sockaddr = vec![0u8; 128];
        sockaddr[..2].copy_from_slice(&(code as u16).to_ne_bytes());
        let mem = MemoryImage::new().map(ARG, sockaddr);

        let output = decode_one(&mem, SYS_connect, [3, ARG, 128, 0, 0, 0], Some(0));
        assert!(output.contains("addr: {"), "family {code}: {output}");
    }
}

fn all_layouts() -> impl Iterator<Item = &'static Layout> {
    [
        decoders::bpf::LAYOUTS,
        decoders::btrfs::LAYOUTS,
        decoders::drm::LAYOUTS,
        decoders::evdev::LAYOUTS,
        decoders::sock::LAYOUTS,
        decoders::sockaddr::LAYOUTS,
        decoders::prctl::LAYOUTS,
    ]
    .into_iter()
    .flatten()
    .copied()
    .chain(std::iter::once(&decoders::kcmp::EPOLL_SLOT))
}

#[test]
fn layouts_are_ordered_and_fit() {
    for layout in all_layouts() {
        for pair in layout.fields.windows(2) {
            assert!(
                pair[0].offset < pair[1].offset,
                "{}: {} is not before {}",
                layout.name,
                pair[0].name,
                pair[1].name
            );
        }
        for field in layout.fields {
            assert!(
                field.end() <= layout.size,
                "{}: {} ends at {} past {}",
                layout.name,
                field.name,
                field.end(),
                layout.size
            );
        }
    }
}

#[test]
fn truncation_only_drops_trailing_fields() {
    use argus_common::raw::RawStruct;

    for layout in all_layouts() {
        let full = vec![0u8; layout.size];
        let mut previous = 0;

        for len in 0..=layout.size {
            let raw = RawStruct::new(&full[..len]);
            let present: Vec<_> = layout.present(&raw).collect();

            assert!(present.len() >= previous, "{} at {len}", layout.name);
            assert!(present.iter().all(|f| f.offset < len), "{} at {len}", layout.name);
            previous = present.len();
        }
        assert_eq!(previous, layout.fields.len(), "{}", layout.name);
    }
}
