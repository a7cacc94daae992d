// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! prctl(2): the option picks how the remaining four arguments are read.

use std::mem::size_of;

use anyhow::Result;
use argus_common::{
    kernel_types::prctl::{
        PrctlMmMap, PR_SET_MM_AUXV, PR_SET_MM_EXE_FILE, PR_SET_MM_MAP, PR_SET_MM_MAP_SIZE,
        TASK_COMM_LEN,
    },
    raw::RawStruct,
};
use log::trace;

use crate::{
    argf,
    dispatch::{DecodeContext, DecodeStatus},
    field,
    format_helpers::{
        format_addr, format_capability, format_prctl_op, format_signal_number, known_prctl_ops,
        prctl_op_arg_count, ReturnKind, PR_GET_SPECULATION_CTRL, PR_SCHED_CORE, PR_SET_MDWE,
        PR_SET_SPECULATION_CTRL, PR_SET_SYSCALL_USER_DISPATCH, PR_SET_TAGGED_ADDR_CTRL,
        PR_SET_VMA, PR_SVE_SET_VL, PR_SME_SET_VL, PR_PAC_RESET_KEYS, PR_PAC_SET_ENABLED_KEYS,
    },
    formatting::SyscallFormatter,
    layout::{decode_struct_entry_sized, fetch_or_print, FieldKind, Layout, RenderFn},
    state::Occurrence,
    xlat::prctl::{
        PR_CAP_AMBIENT_OPS, PR_DUMPABLE, PR_ENDIAN_MODES, PR_FP_MODES, PR_MCE_KILL_OPS,
        PR_MCE_KILL_POLICIES, PR_MDWE_FLAGS, PR_PAC_KEYS, PR_SCHED_CORE_CMDS,
        PR_SCHED_CORE_SCOPES, PR_SET_MM_OPTIONS, PR_SET_VMA_OPTIONS, PR_SPEC_MISFEATURES,
        PR_SPEC_STATES, PR_SVE_VL_FLAGS, PR_SYS_DISPATCH_MODES, PR_TAGGED_ADDR_FLAGS,
        PR_TIMING_MODES, PR_TSC_MODES, PR_UNALIGN_FLAGS, SECCOMP_MODES, SECUREBITS,
    },
};

const PR_CAP_AMBIENT_CLEAR_ALL: u64 = 4;
const PR_MCE_KILL_SET: u64 = 1;
const SECCOMP_MODE_FILTER: u64 = 2;
const PR_SYS_DISPATCH_ON: u64 = 1;
const PR_SET_VMA_ANON_NAME: u64 = 0;
const SVE_VL_LEN_MASK: u64 = 0xffff;

pub static MM_MAP: Layout = Layout {
    name: "prctl_mm_map",
    size: size_of::<PrctlMmMap>(),
    fields: &[
        field!(PrctlMmMap, start_code, In, FieldKind::Addr),
        field!(PrctlMmMap, end_code, In, FieldKind::Addr),
        field!(PrctlMmMap, start_data, In, FieldKind::Addr),
        field!(PrctlMmMap, end_data, In, FieldKind::Addr),
        field!(PrctlMmMap, start_brk, In, FieldKind::Addr),
        field!(PrctlMmMap, brk, In, FieldKind::Addr),
        field!(PrctlMmMap, start_stack, In, FieldKind::Addr),
        field!(PrctlMmMap, arg_start, In, FieldKind::Addr),
        field!(PrctlMmMap, arg_end, In, FieldKind::Addr),
        field!(PrctlMmMap, env_start, In, FieldKind::Addr),
        field!(PrctlMmMap, env_end, In, FieldKind::Addr),
        field!(PrctlMmMap, auxv, In, FieldKind::Addr),
        field!(PrctlMmMap, auxv_size, In, FieldKind::U32),
        field!(PrctlMmMap, exe_fd, In, FieldKind::Fd),
    ],
};

pub static LAYOUTS: &[&Layout] = &[&MM_MAP];

/// Every option with a name, for `argus list prctl`.
pub fn known_options() -> Vec<(u64, &'static str)> {
    known_prctl_ops()
        .map(|(op, name)| (op as u32 as u64, name))
        .collect()
}

/// Options whose argument is an address the kernel writes through.
fn returns_through_pointer(op: i32) -> bool {
    matches!(
        op,
        libc::PR_GET_NAME
            | libc::PR_GET_PDEATHSIG
            | libc::PR_GET_TID_ADDRESS
            | libc::PR_GET_UNALIGN
            | libc::PR_GET_FPEMU
            | libc::PR_GET_FPEXC
            | libc::PR_GET_ENDIAN
            | libc::PR_GET_TSC
            | libc::PR_GET_CHILD_SUBREAPER
    )
}

fn render_signal(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    format_signal_number(raw.i32(0)).into_owned()
}

fn render_tid_address(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    format_addr(raw.u64(0))
}

fn render_comm(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.cstr(raw.as_bytes())
}

fn render_unalign(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.flags(u64::from(raw.u32(0)), PR_UNALIGN_FLAGS)
}

fn render_endian(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.xval(u64::from(raw.u32(0)), PR_ENDIAN_MODES)
}

fn render_tsc(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.xval(u64::from(raw.u32(0)), PR_TSC_MODES)
}

fn render_uint(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    raw.u32(0).to_string()
}

fn render_int(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    raw.i32(0).to_string()
}

/// How to read what the kernel stored for a pointer-returning option.
fn returned_value(op: i32) -> (&'static str, usize, RenderFn) {
    match op {
        libc::PR_GET_NAME => ("name", TASK_COMM_LEN, render_comm),
        libc::PR_GET_PDEATHSIG => ("signal", 4, render_signal),
        libc::PR_GET_TID_ADDRESS => ("tid_address", 8, render_tid_address),
        libc::PR_GET_UNALIGN => ("value", 4, render_unalign),
        libc::PR_GET_ENDIAN => ("value", 4, render_endian),
        libc::PR_GET_TSC => ("value", 4, render_tsc),
        libc::PR_GET_FPEMU | libc::PR_GET_FPEXC => ("value", 4, render_uint),
        _ => ("value", 4, render_int),
    }
}

fn print_returned(
    cx: &DecodeContext<'_>,
    occ: &Occurrence,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    size: usize,
    render: RenderFn,
) -> Result<()> {
    if occ.failed() {
        argf!(sf, "{label}: {}", format_addr(addr));
        return Ok(());
    }
    if let Some(bytes) = fetch_or_print(cx, sf, label, addr, size)? {
        argf!(sf, "{label}: [{}]", render(&RawStruct::new(&bytes), cx));
    }
    Ok(())
}

/// The remaining arguments of an option without a dedicated rendering.
fn print_plain_args(occ: &Occurrence, sf: &mut SyscallFormatter<'_>, op: i32) -> Result<()> {
    let count = prctl_op_arg_count(op);
    for n in 1..count.min(5) {
        argf!(sf, "arg{}: 0x{:x}", n + 1, occ.arg(n));
    }
    Ok(())
}

fn print_set_mm(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<DecodeStatus> {
    let sub = occ.arg(1);
    let addr = occ.arg(2);
    argf!(sf, "sub_option: {}", cx.xval(sub, PR_SET_MM_OPTIONS));

    match sub {
        PR_SET_MM_MAP => {
            let size = occ.arg(3) as u32;
            let len = (size as usize).min(MM_MAP.size);
            let status = decode_struct_entry_sized(cx, occ, sf, "map", addr, &MM_MAP, len)?;
            argf!(sf, "size: {size}");
            Ok(status)
        }
        PR_SET_MM_MAP_SIZE => {
            if addr == 0 {
                argf!(sf, "size: NULL");
                return Ok(DecodeStatus::Complete);
            }
            Ok(DecodeStatus::NeedsExit)
        }
        PR_SET_MM_EXE_FILE => {
            argf!(sf, "fd: {}", cx.fd(addr as i32));
            Ok(DecodeStatus::Complete)
        }
        PR_SET_MM_AUXV => {
            argf!(sf, "addr: {}", format_addr(addr));
            argf!(sf, "size: {}", occ.arg(3));
            Ok(DecodeStatus::Complete)
        }
        _ => {
            argf!(sf, "addr: {}", format_addr(addr));
            Ok(DecodeStatus::Complete)
        }
    }
}

fn print_vl(cx: &DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, arg: u64) -> Result<()> {
    let flags = arg & !SVE_VL_LEN_MASK;
    if flags == 0 {
        argf!(sf, "vl: {}", arg & SVE_VL_LEN_MASK);
    } else {
        argf!(
            sf,
            "vl: {}|{}",
            cx.flags(flags, PR_SVE_VL_FLAGS),
            arg & SVE_VL_LEN_MASK
        );
    }
    Ok(())
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<DecodeStatus> {
    let op = occ.arg(0) as i32;
    argf!(sf, "option: {}", format_prctl_op(op));

    if returns_through_pointer(op) {
        let addr = occ.arg(1);
        if addr == 0 {
            argf!(sf, "{}: NULL", returned_value(op).0);
            return Ok(DecodeStatus::Complete);
        }
        return Ok(DecodeStatus::NeedsExit);
    }

    match op {
        libc::PR_SET_NAME => argf!(sf, "name: {}", cx.string_at(occ.arg(1))),
        libc::PR_SET_PDEATHSIG => {
            argf!(sf, "signal: {}", format_signal_number(occ.arg(1) as i32))
        }
        libc::PR_CAPBSET_READ | libc::PR_CAPBSET_DROP => {
            argf!(sf, "cap: {}", format_capability(occ.arg(1)))
        }
        libc::PR_CAP_AMBIENT => {
            let sub = occ.arg(1);
            argf!(sf, "op: {}", cx.xval(sub, PR_CAP_AMBIENT_OPS));
            if sub != PR_CAP_AMBIENT_CLEAR_ALL {
                argf!(sf, "cap: {}", format_capability(occ.arg(2)));
            }
        }
        libc::PR_SET_DUMPABLE => argf!(sf, "value: {}", cx.xval(occ.arg(1), PR_DUMPABLE)),
        libc::PR_SET_UNALIGN => argf!(sf, "value: {}", cx.flags(occ.arg(1), PR_UNALIGN_FLAGS)),
        libc::PR_SET_ENDIAN => argf!(sf, "value: {}", cx.xval(occ.arg(1), PR_ENDIAN_MODES)),
        libc::PR_SET_TSC => argf!(sf, "value: {}", cx.xval(occ.arg(1), PR_TSC_MODES)),
        libc::PR_SET_TIMING => argf!(sf, "value: {}", cx.xval(occ.arg(1), PR_TIMING_MODES)),
        libc::PR_SET_FP_MODE => argf!(sf, "mode: {}", cx.flags(occ.arg(1), PR_FP_MODES)),
        libc::PR_SET_SECUREBITS => argf!(sf, "bits: {}", cx.flags(occ.arg(1), SECUREBITS)),
        libc::PR_GET_SECUREBITS => sf.set_return_kind(ReturnKind::Hex),
        libc::PR_SET_SECCOMP => {
            let mode = occ.arg(1);
            argf!(sf, "mode: {}", cx.xval(mode, SECCOMP_MODES));
            if mode == SECCOMP_MODE_FILTER {
                argf!(sf, "filter: {}", format_addr(occ.arg(2)));
            }
        }
        libc::PR_MCE_KILL => {
            let sub = occ.arg(1);
            argf!(sf, "op: {}", cx.xval(sub, PR_MCE_KILL_OPS));
            if sub == PR_MCE_KILL_SET {
                argf!(sf, "policy: {}", cx.xval(occ.arg(2), PR_MCE_KILL_POLICIES));
            }
        }
        libc::PR_SET_TIMERSLACK => argf!(sf, "slack_ns: {}", occ.arg(1)),
        libc::PR_SET_MM => return print_set_mm(cx, occ, sf),
        PR_SET_SPECULATION_CTRL => {
            argf!(sf, "misfeature: {}", cx.xval(occ.arg(1), PR_SPEC_MISFEATURES));
            argf!(sf, "state: {}", cx.flags(occ.arg(2), PR_SPEC_STATES));
        }
        PR_GET_SPECULATION_CTRL => {
            argf!(sf, "misfeature: {}", cx.xval(occ.arg(1), PR_SPEC_MISFEATURES));
            sf.set_return_kind(ReturnKind::Hex);
        }
        PR_SVE_SET_VL | PR_SME_SET_VL => print_vl(cx, sf, occ.arg(1))?,
        PR_SET_TAGGED_ADDR_CTRL => {
            argf!(sf, "ctrl: {}", cx.flags(occ.arg(1), PR_TAGGED_ADDR_FLAGS))
        }
        PR_SET_MDWE => argf!(sf, "bits: {}", cx.flags(occ.arg(1), PR_MDWE_FLAGS)),
        PR_PAC_RESET_KEYS => argf!(sf, "keys: {}", cx.flags(occ.arg(1), PR_PAC_KEYS)),
        PR_PAC_SET_ENABLED_KEYS => {
            argf!(sf, "keys: {}", cx.flags(occ.arg(1), PR_PAC_KEYS));
            argf!(sf, "enabled: {}", cx.flags(occ.arg(2), PR_PAC_KEYS));
        }
        PR_SCHED_CORE => {
            argf!(sf, "cmd: {}", cx.xval(occ.arg(1), PR_SCHED_CORE_CMDS));
            argf!(sf, "pid: {}", occ.arg(2) as i32);
            argf!(sf, "type: {}", cx.xval(occ.arg(3), PR_SCHED_CORE_SCOPES));
            argf!(sf, "cookie: {}", format_addr(occ.arg(4)));
        }
        PR_SET_SYSCALL_USER_DISPATCH => {
            let mode = occ.arg(1);
            argf!(sf, "mode: {}", cx.xval(mode, PR_SYS_DISPATCH_MODES));
            if mode == PR_SYS_DISPATCH_ON {
                argf!(sf, "offset: 0x{:x}", occ.arg(2));
                argf!(sf, "len: {}", occ.arg(3));
                argf!(sf, "selector: {}", format_addr(occ.arg(4)));
            }
        }
        PR_SET_VMA => {
            let attr = occ.arg(1);
            argf!(sf, "attr: {}", cx.xval(attr, PR_SET_VMA_OPTIONS));
            argf!(sf, "addr: {}", format_addr(occ.arg(2)));
            argf!(sf, "size: {}", occ.arg(3));
            if attr == PR_SET_VMA_ANON_NAME {
                argf!(sf, "name: {}", cx.string_at(occ.arg(4)));
            } else {
                argf!(sf, "arg5: 0x{:x}", occ.arg(4));
            }
        }
        _ => {
            trace!("prctl option {op} printed raw");
            print_plain_args(occ, sf, op)?;
        }
    }

    Ok(DecodeStatus::Complete)
}

pub fn decode_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    let op = occ.arg(0) as i32;

    if op == libc::PR_SET_MM {
        if occ.arg(1) == PR_SET_MM_MAP_SIZE {
            return print_returned(cx, occ, sf, "size", occ.arg(2), 4, render_uint);
        }
        // The map itself was closed at entry; only its size is left.
        return Ok(());
    }

    if returns_through_pointer(op) {
        let (label, size, render) = returned_value(op);
        return print_returned(cx, occ, sf, label, occ.arg(1), size, render);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_options() {
        assert!(returns_through_pointer(libc::PR_GET_NAME));
        assert!(returns_through_pointer(libc::PR_GET_TID_ADDRESS));
        assert!(!returns_through_pointer(libc::PR_SET_NAME));
        assert_eq!(returned_value(libc::PR_GET_NAME).1, TASK_COMM_LEN);
        assert_eq!(returned_value(libc::PR_GET_TID_ADDRESS).0, "tid_address");
    }

    #[test]
    fn option_listing() {
        let known = known_options();
        assert!(known.contains(&(libc::PR_SET_NAME as u64, "PR_SET_NAME")));
        assert!(known.contains(&(0x53564d41, "PR_SET_VMA")));
    }
}
