// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! A process for `argus decode` to look into: lays out sample argument
//! structures, prints where they live, and waits until stdin is closed.

use std::{
    ffi::CString,
    io::{self, BufRead as _, Write as _},
    mem::size_of,
};

use anyhow::bail;
use argus_common::kernel_types::{net::SockaddrIn, prctl::KcmpEpollSlot};

const PR_SET_PTRACER_ANY: libc::c_ulong = libc::c_ulong::MAX;

fn allow_any_tracer() -> anyhow::Result<()> {
    // Yama would otherwise only let our parent read our memory.
    let result = unsafe { libc::prctl(libc::PR_SET_PTRACER, PR_SET_PTRACER_ANY, 0, 0, 0) };
    if result != 0 {
        let err = io::Error::last_os_error();
        // EINVAL means Yama isn't there to ask.
        if err.raw_os_error() != Some(libc::EINVAL) {
            bail!("PR_SET_PTRACER failed: {err}");
        }
    }
    Ok(())
}

fn wait_for_eof() -> anyhow::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        line?;
    }
    Ok(())
}

fn publish(entries: &[(&str, usize)]) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (name, addr) in entries {
        writeln!(out, "{name}=0x{addr:x}")?;
    }
    writeln!(out, "ready")?;
    out.flush()?;
    Ok(())
}

fn structures() -> anyhow::Result<()> {
    let name = CString::new("argus_helper")?;

    let sockaddr = SockaddrIn {
        sin_family: libc::AF_INET as u16,
        sin_port: 8080u16.to_be_bytes(),
        sin_addr: [127, 0, 0, 1],
        sin_zero: [0; 8],
    };
    let addrlen = size_of::<SockaddrIn>() as u32;

    let slot = KcmpEpollSlot {
        efd: 4,
        tfd: 5,
        toff: 0,
    };

    allow_any_tracer()?;
    publish(&[
        ("name", name.as_ptr() as usize),
        ("sockaddr", &sockaddr as *const SockaddrIn as usize),
        ("addrlen", &addrlen as *const u32 as usize),
        ("slot", &slot as *const KcmpEpollSlot as usize),
    ])?;
    wait_for_eof()?;

    // Keep everything alive, and where it was published, until the reader is done.
    std::hint::black_box((&name, &sockaddr, &addrlen, &slot));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args();

    // Ignore the binary name
    let _ = args.next();

    match args.next().as_deref() {
        Some("structures") => structures(),
        Some(name) => bail!("Unknown test name: {name}"),
        None => bail!("Need a test name as the first argument"),
    }
}
