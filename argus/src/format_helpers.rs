// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{borrow::Cow, fmt::Write as _};

use nix::errno::Errno;

/// Largest magnitude the kernel uses for an error return.
pub const MAX_ERRNO: i64 = 4095;

/// Whether a raw syscall return value reports a failure.
pub fn is_error_return(return_value: i64) -> bool {
    (-MAX_ERRNO..=-1).contains(&return_value)
}

/// How a successful return value is annotated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReturnKind {
    #[default]
    Plain,
    Fd,
    Bytes,
    Hex,
}

pub fn format_return_value(kind: ReturnKind, return_value: i64) -> Cow<'static, str> {
    if is_error_return(return_value) {
        let errno = Errno::from_raw(-return_value as i32);
        return match errno {
            Errno::UnknownErrno => Cow::Owned(format!("-1 (errno {})", -return_value)),
            errno => Cow::Owned(format!("-1 {errno:?} ({})", errno.desc())),
        };
    }

    match kind {
        ReturnKind::Plain => Cow::Owned(return_value.to_string()),
        ReturnKind::Fd => Cow::Owned(format!("{return_value} (fd)")),
        ReturnKind::Bytes => Cow::Owned(format!("{return_value} (bytes)")),
        ReturnKind::Hex => Cow::Owned(format!("0x{:x}", return_value as u64)),
    }
}

pub fn format_addr(addr: u64) -> String {
    if addr == 0 {
        "NULL".to_string()
    } else {
        format!("0x{addr:x}")
    }
}

fn push_escaped(out: &mut String, b: u8) {
    match b {
        b'"' => out.push_str("\\\""),
        b'\\' => out.push_str("\\\\"),
        b'\n' => out.push_str("\\n"),
        b'\t' => out.push_str("\\t"),
        b'\r' => out.push_str("\\r"),
        0x20..=0x7e => out.push(b as char),
        _ => {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
}

/// Quotes `bytes`, escaping anything that isn't printable ASCII. Payloads
/// longer than `limit` are cut and followed by `...`.
pub fn format_quoted(bytes: &[u8], limit: usize) -> String {
    let shown = &bytes[..bytes.len().min(limit)];

    let mut out = String::with_capacity(shown.len() + 2);
    out.push('"');
    for &b in shown {
        push_escaped(&mut out, b);
    }
    out.push('"');

    if bytes.len() > limit {
        out.push_str("...");
    }
    out
}

/// Formats a C string held in a fixed-size buffer. A buffer without NUL is
/// shown with a trailing `...`.
pub fn format_cstr(bytes: &[u8], limit: usize) -> String {
    match bytes.iter().position(|&b| b == 0) {
        Some(nul) => format_quoted(&bytes[..nul], limit),
        None => {
            let mut quoted = format_quoted(bytes, limit);
            if bytes.len() <= limit {
                quoted.push_str("...");
            }
            quoted
        }
    }
}

/// Every byte as `\xNN`, for payloads without a known shape.
pub fn format_hex_string(bytes: &[u8], limit: usize) -> String {
    let shown = &bytes[..bytes.len().min(limit)];

    let mut out = String::with_capacity(shown.len() * 4 + 2);
    out.push('"');
    for b in shown {
        let _ = write!(out, "\\x{b:02x}");
    }
    out.push('"');

    if bytes.len() > limit {
        out.push_str("...");
    }
    out
}

pub fn format_uuid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(36);
    for (i, b) in bytes.iter().take(16).enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        let _ = write!(out, "{b:02x}");
    }
    out
}

pub fn format_dev(dev: u64) -> String {
    if dev == 0 {
        return "0".to_string();
    }
    // glibc's gnu_dev_major/gnu_dev_minor split
    let major = (dev >> 8) & 0xfff | ((dev >> 32) & !0xfff);
    let minor = (dev & 0xff) | ((dev >> 12) & !0xff);
    format!("makedev({major:#x}, {minor:#x})")
}

/// DRM pixel formats are four ASCII characters packed little-endian.
pub fn format_fourcc(code: u32) -> String {
    let bytes = code.to_le_bytes();
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        let text: String = bytes.iter().map(|&b| b as char).collect();
        format!("fourcc_code('{}', '{}', '{}', '{}')", &text[0..1], &text[1..2], &text[2..3], &text[3..4])
    } else {
        format!("0x{code:x}")
    }
}

pub fn format_signal_number(signum: i32) -> Cow<'static, str> {
    match signum {
        0 => Cow::Borrowed("0"),
        libc::SIGHUP => Cow::Borrowed("SIGHUP"),
        libc::SIGINT => Cow::Borrowed("SIGINT"),
        libc::SIGQUIT => Cow::Borrowed("SIGQUIT"),
        libc::SIGILL => Cow::Borrowed("SIGILL"),
        libc::SIGTRAP => Cow::Borrowed("SIGTRAP"),
        libc::SIGABRT => Cow::Borrowed("SIGABRT"),
        libc::SIGBUS => Cow::Borrowed("SIGBUS"),
        libc::SIGFPE => Cow::Borrowed("SIGFPE"),
        libc::SIGKILL => Cow::Borrowed("SIGKILL"),
        libc::SIGUSR1 => Cow::Borrowed("SIGUSR1"),
        libc::SIGSEGV => Cow::Borrowed("SIGSEGV"),
        libc::SIGUSR2 => Cow::Borrowed("SIGUSR2"),
        libc::SIGPIPE => Cow::Borrowed("SIGPIPE"),
        libc::SIGALRM => Cow::Borrowed("SIGALRM"),
        libc::SIGTERM => Cow::Borrowed("SIGTERM"),
        libc::SIGSTKFLT => Cow::Borrowed("SIGSTKFLT"),
        libc::SIGCHLD => Cow::Borrowed("SIGCHLD"),
        libc::SIGCONT => Cow::Borrowed("SIGCONT"),
        libc::SIGSTOP => Cow::Borrowed("SIGSTOP"),
        libc::SIGTSTP => Cow::Borrowed("SIGTSTP"),
        libc::SIGTTIN => Cow::Borrowed("SIGTTIN"),
        libc::SIGTTOU => Cow::Borrowed("SIGTTOU"),
        libc::SIGURG => Cow::Borrowed("SIGURG"),
        libc::SIGXCPU => Cow::Borrowed("SIGXCPU"),
        libc::SIGXFSZ => Cow::Borrowed("SIGXFSZ"),
        libc::SIGVTALRM => Cow::Borrowed("SIGVTALRM"),
        libc::SIGPROF => Cow::Borrowed("SIGPROF"),
        libc::SIGWINCH => Cow::Borrowed("SIGWINCH"),
        libc::SIGIO => Cow::Borrowed("SIGIO"),
        libc::SIGPWR => Cow::Borrowed("SIGPWR"),
        libc::SIGSYS => Cow::Borrowed("SIGSYS"),
        _ => {
            if (34..=64).contains(&signum) {
                Cow::Owned(format!("SIGRT{}", signum - 34))
            } else {
                Cow::Owned(format!("{signum}"))
            }
        }
    }
}

/// List of capabilities, see /usr/include/linux/capability.h
const CAP_NAMES: [&str; 41] = [
    "CAP_CHOWN",
    "CAP_DAC_OVERRIDE",
    "CAP_DAC_READ_SEARCH",
    "CAP_FOWNER",
    "CAP_FSETID",
    "CAP_KILL",
    "CAP_SETGID",
    "CAP_SETUID",
    "CAP_SETPCAP",
    "CAP_LINUX_IMMUTABLE",
    "CAP_NET_BIND_SERVICE",
    "CAP_NET_BROADCAST",
    "CAP_NET_ADMIN",
    "CAP_NET_RAW",
    "CAP_IPC_LOCK",
    "CAP_IPC_OWNER",
    "CAP_SYS_MODULE",
    "CAP_SYS_RAWIO",
    "CAP_SYS_CHROOT",
    "CAP_SYS_PTRACE",
    "CAP_SYS_PACCT",
    "CAP_SYS_ADMIN",
    "CAP_SYS_BOOT",
    "CAP_SYS_NICE",
    "CAP_SYS_RESOURCE",
    "CAP_SYS_TIME",
    "CAP_SYS_TTY_CONFIG",
    "CAP_MKNOD",
    "CAP_LEASE",
    "CAP_AUDIT_WRITE",
    "CAP_AUDIT_CONTROL",
    "CAP_SETFCAP",
    "CAP_MAC_OVERRIDE",
    "CAP_MAC_ADMIN",
    "CAP_SYSLOG",
    "CAP_WAKE_ALARM",
    "CAP_BLOCK_SUSPEND",
    "CAP_AUDIT_READ",
    "CAP_PERFMON",
    "CAP_BPF",
    "CAP_CHECKPOINT_RESTORE",
];

pub fn format_capability(cap: u64) -> Cow<'static, str> {
    match usize::try_from(cap).ok().and_then(|i| CAP_NAMES.get(i)) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(cap.to_string()),
    }
}

// prctl options newer than the libc crate knows about
pub(crate) const PR_SET_SPECULATION_CTRL: i32 = 53;
pub(crate) const PR_GET_SPECULATION_CTRL: i32 = 52;
pub(crate) const PR_SVE_SET_VL: i32 = 50;
pub(crate) const PR_SVE_GET_VL: i32 = 51;
pub(crate) const PR_SET_TAGGED_ADDR_CTRL: i32 = 55;
pub(crate) const PR_GET_TAGGED_ADDR_CTRL: i32 = 56;
pub(crate) const PR_SET_IO_FLUSHER: i32 = 57;
pub(crate) const PR_GET_IO_FLUSHER: i32 = 58;
pub(crate) const PR_SET_SYSCALL_USER_DISPATCH: i32 = 59;
pub(crate) const PR_PAC_SET_ENABLED_KEYS: i32 = 60;
pub(crate) const PR_PAC_GET_ENABLED_KEYS: i32 = 61;
pub(crate) const PR_SCHED_CORE: i32 = 62;
pub(crate) const PR_SME_SET_VL: i32 = 63;
pub(crate) const PR_SME_GET_VL: i32 = 64;
pub(crate) const PR_SET_MDWE: i32 = 65;
pub(crate) const PR_GET_MDWE: i32 = 66;
pub(crate) const PR_SET_VMA: i32 = 0x53564d41;
pub(crate) const PR_GET_AUXV: i32 = 0x41555856;
pub(crate) const PR_PAC_RESET_KEYS: i32 = 54;
pub(crate) const PR_SET_MEMORY_MERGE: i32 = 67;
pub(crate) const PR_GET_MEMORY_MERGE: i32 = 68;
pub(crate) const PR_RISCV_V_SET_CONTROL: i32 = 69;
pub(crate) const PR_RISCV_V_GET_CONTROL: i32 = 70;

/// The option's name, or its number flagged as unknown.
pub fn format_prctl_op(op: i32) -> Cow<'static, str> {
    let name = match op {
        libc::PR_SET_PDEATHSIG => "PR_SET_PDEATHSIG",
        libc::PR_GET_PDEATHSIG => "PR_GET_PDEATHSIG",
        libc::PR_GET_DUMPABLE => "PR_GET_DUMPABLE",
        libc::PR_SET_DUMPABLE => "PR_SET_DUMPABLE",
        libc::PR_GET_UNALIGN => "PR_GET_UNALIGN",
        libc::PR_SET_UNALIGN => "PR_SET_UNALIGN",
        libc::PR_GET_KEEPCAPS => "PR_GET_KEEPCAPS",
        libc::PR_SET_KEEPCAPS => "PR_SET_KEEPCAPS",
        libc::PR_GET_FPEMU => "PR_GET_FPEMU",
        libc::PR_SET_FPEMU => "PR_SET_FPEMU",
        libc::PR_GET_FPEXC => "PR_GET_FPEXC",
        libc::PR_SET_FPEXC => "PR_SET_FPEXC",
        libc::PR_GET_TIMING => "PR_GET_TIMING",
        libc::PR_SET_TIMING => "PR_SET_TIMING",
        libc::PR_SET_NAME => "PR_SET_NAME",
        libc::PR_GET_NAME => "PR_GET_NAME",
        libc::PR_GET_ENDIAN => "PR_GET_ENDIAN",
        libc::PR_SET_ENDIAN => "PR_SET_ENDIAN",
        libc::PR_GET_SECCOMP => "PR_GET_SECCOMP",
        libc::PR_SET_SECCOMP => "PR_SET_SECCOMP",
        libc::PR_CAPBSET_READ => "PR_CAPBSET_READ",
        libc::PR_CAPBSET_DROP => "PR_CAPBSET_DROP",
        libc::PR_GET_TSC => "PR_GET_TSC",
        libc::PR_SET_TSC => "PR_SET_TSC",
        libc::PR_GET_SECUREBITS => "PR_GET_SECUREBITS",
        libc::PR_SET_SECUREBITS => "PR_SET_SECUREBITS",
        libc::PR_SET_TIMERSLACK => "PR_SET_TIMERSLACK",
        libc::PR_GET_TIMERSLACK => "PR_GET_TIMERSLACK",
        libc::PR_TASK_PERF_EVENTS_DISABLE => "PR_TASK_PERF_EVENTS_DISABLE",
        libc::PR_TASK_PERF_EVENTS_ENABLE => "PR_TASK_PERF_EVENTS_ENABLE",
        libc::PR_MCE_KILL => "PR_MCE_KILL",
        libc::PR_MCE_KILL_GET => "PR_MCE_KILL_GET",
        libc::PR_SET_MM => "PR_SET_MM",
        libc::PR_GET_TID_ADDRESS => "PR_GET_TID_ADDRESS",
        libc::PR_SET_CHILD_SUBREAPER => "PR_SET_CHILD_SUBREAPER",
        libc::PR_GET_CHILD_SUBREAPER => "PR_GET_CHILD_SUBREAPER",
        libc::PR_SET_NO_NEW_PRIVS => "PR_SET_NO_NEW_PRIVS",
        libc::PR_GET_NO_NEW_PRIVS => "PR_GET_NO_NEW_PRIVS",
        libc::PR_GET_THP_DISABLE => "PR_GET_THP_DISABLE",
        libc::PR_SET_THP_DISABLE => "PR_SET_THP_DISABLE",
        libc::PR_MPX_ENABLE_MANAGEMENT => "PR_MPX_ENABLE_MANAGEMENT",
        libc::PR_MPX_DISABLE_MANAGEMENT => "PR_MPX_DISABLE_MANAGEMENT",
        libc::PR_SET_FP_MODE => "PR_SET_FP_MODE",
        libc::PR_GET_FP_MODE => "PR_GET_FP_MODE",
        libc::PR_CAP_AMBIENT => "PR_CAP_AMBIENT",
        PR_SVE_SET_VL => "PR_SVE_SET_VL",
        PR_SVE_GET_VL => "PR_SVE_GET_VL",
        PR_GET_SPECULATION_CTRL => "PR_GET_SPECULATION_CTRL",
        PR_SET_SPECULATION_CTRL => "PR_SET_SPECULATION_CTRL",
        PR_PAC_RESET_KEYS => "PR_PAC_RESET_KEYS",
        PR_SET_TAGGED_ADDR_CTRL => "PR_SET_TAGGED_ADDR_CTRL",
        PR_GET_TAGGED_ADDR_CTRL => "PR_GET_TAGGED_ADDR_CTRL",
        PR_SET_IO_FLUSHER => "PR_SET_IO_FLUSHER",
        PR_GET_IO_FLUSHER => "PR_GET_IO_FLUSHER",
        PR_SET_SYSCALL_USER_DISPATCH => "PR_SET_SYSCALL_USER_DISPATCH",
        PR_PAC_SET_ENABLED_KEYS => "PR_PAC_SET_ENABLED_KEYS",
        PR_PAC_GET_ENABLED_KEYS => "PR_PAC_GET_ENABLED_KEYS",
        PR_SCHED_CORE => "PR_SCHED_CORE",
        PR_SME_SET_VL => "PR_SME_SET_VL",
        PR_SME_GET_VL => "PR_SME_GET_VL",
        PR_SET_MDWE => "PR_SET_MDWE",
        PR_GET_MDWE => "PR_GET_MDWE",
        PR_SET_MEMORY_MERGE => "PR_SET_MEMORY_MERGE",
        PR_GET_MEMORY_MERGE => "PR_GET_MEMORY_MERGE",
        PR_RISCV_V_SET_CONTROL => "PR_RISCV_V_SET_CONTROL",
        PR_RISCV_V_GET_CONTROL => "PR_RISCV_V_GET_CONTROL",
        PR_SET_VMA => "PR_SET_VMA",
        PR_GET_AUXV => "PR_GET_AUXV",
        _ => return Cow::Owned(format!("0x{op:x} /* PR_??? */")),
    };
    Cow::Borrowed(name)
}

/// Every prctl option [`format_prctl_op`] knows by name.
pub fn known_prctl_ops() -> impl Iterator<Item = (i32, &'static str)> {
    (0..=PR_RISCV_V_GET_CONTROL)
        .chain([PR_SET_VMA, PR_GET_AUXV])
        .filter_map(|op| match format_prctl_op(op) {
            Cow::Borrowed(name) => Some((op, name)),
            Cow::Owned(_) => None,
        })
}

/// How many of prctl's five arguments an option reads, counting the option
/// itself. Options without a dedicated decoder show this many as raw words.
pub fn prctl_op_arg_count(op: i32) -> usize {
    match op {
        // Result in the return value.
        PR_PAC_GET_ENABLED_KEYS
        | libc::PR_GET_DUMPABLE
        | libc::PR_GET_KEEPCAPS
        | libc::PR_GET_TIMING
        | libc::PR_GET_SECCOMP
        | libc::PR_GET_SECUREBITS
        | libc::PR_GET_TIMERSLACK
        | libc::PR_GET_CHILD_SUBREAPER
        | libc::PR_GET_NO_NEW_PRIVS
        | libc::PR_GET_THP_DISABLE
        | libc::PR_GET_FP_MODE
        | PR_SVE_GET_VL
        | PR_SME_GET_VL
        | PR_GET_MDWE
        | PR_GET_MEMORY_MERGE
        | PR_GET_IO_FLUSHER
        | PR_GET_TAGGED_ADDR_CTRL
        | PR_RISCV_V_GET_CONTROL => 1,

        // Result written through arg2.
        libc::PR_GET_NAME
        | libc::PR_GET_TID_ADDRESS
        | libc::PR_GET_PDEATHSIG
        | libc::PR_GET_UNALIGN
        | libc::PR_GET_FPEMU
        | libc::PR_GET_FPEXC
        | libc::PR_GET_ENDIAN
        | libc::PR_GET_TSC
        | PR_GET_SPECULATION_CTRL => 2,

        libc::PR_CAPBSET_READ | libc::PR_CAPBSET_DROP => 2,
        libc::PR_TASK_PERF_EVENTS_DISABLE | libc::PR_TASK_PERF_EVENTS_ENABLE => 1,

        // sub-option, value, and a size for PR_SET_MM_MAP
        libc::PR_SET_MM => 4,

        PR_GET_AUXV => 3,
        PR_SET_VMA => 5,

        PR_PAC_SET_ENABLED_KEYS => 3,
        PR_PAC_RESET_KEYS => 2,

        libc::PR_SET_PDEATHSIG
        | libc::PR_SET_DUMPABLE
        | libc::PR_SET_UNALIGN
        | libc::PR_SET_KEEPCAPS
        | libc::PR_SET_FPEMU
        | libc::PR_SET_FPEXC
        | libc::PR_SET_TIMING
        | libc::PR_SET_NAME
        | libc::PR_SET_ENDIAN
        | libc::PR_SET_TSC
        | libc::PR_SET_SECUREBITS
        | libc::PR_SET_TIMERSLACK
        | libc::PR_SET_CHILD_SUBREAPER
        | libc::PR_SET_THP_DISABLE
        | libc::PR_SET_FP_MODE
        | PR_SVE_SET_VL
        | PR_SET_TAGGED_ADDR_CTRL
        | PR_SME_SET_VL
        | PR_SET_MDWE
        | PR_SET_MEMORY_MERGE
        | PR_RISCV_V_SET_CONTROL
        | libc::PR_MPX_ENABLE_MANAGEMENT
        | libc::PR_MPX_DISABLE_MANAGEMENT => 2,

        libc::PR_SET_NO_NEW_PRIVS => 2,
        PR_SET_IO_FLUSHER => 2,

        // arg3 is only read in filter mode
        libc::PR_SET_SECCOMP => 3,

        PR_SET_SPECULATION_CTRL => 3,

        PR_SET_SYSCALL_USER_DISPATCH | PR_SCHED_CORE => 5,
        libc::PR_CAP_AMBIENT | libc::PR_MCE_KILL => 3,
        libc::PR_MCE_KILL_GET => 1,

        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_values() {
        assert_eq!(format_return_value(ReturnKind::Plain, 0), "0");
        assert_eq!(format_return_value(ReturnKind::Fd, 5), "5 (fd)");
        assert_eq!(format_return_value(ReturnKind::Bytes, 64), "64 (bytes)");
        assert_eq!(
            format_return_value(ReturnKind::Fd, -9),
            "-1 EBADF (Bad file number)"
        );
        assert_eq!(format_return_value(ReturnKind::Plain, -4096), "-4096");
    }

    #[test]
    fn quoting() {
        assert_eq!(format_quoted(b"a\"b\n\x01", 32), "\"a\\\"b\\n\\x01\"");
        assert_eq!(format_quoted(b"abcdef", 3), "\"abc\"...");
        assert_eq!(format_cstr(b"card0\0junk", 32), "\"card0\"");
        assert_eq!(format_cstr(b"card", 32), "\"card\"...");
        assert_eq!(format_hex_string(&[0xde, 0xad], 1), "\"\\xde\"...");
    }

    #[test]
    fn uuid_and_dev() {
        let uuid: Vec<u8> = (0u8..16).collect();
        assert_eq!(format_uuid(&uuid), "00010203-0405-0607-0809-0a0b0c0d0e0f");
        assert_eq!(format_dev(0), "0");
        assert_eq!(format_dev((8 << 8) | 1), "makedev(0x8, 0x1)");
    }

    #[test]
    fn fourcc() {
        assert_eq!(
            format_fourcc(u32::from_le_bytes(*b"XR24")),
            "fourcc_code('X', 'R', '2', '4')"
        );
        assert_eq!(format_fourcc(0x0102), "0x102");
    }

    #[test]
    fn prctl_names() {
        assert_eq!(format_prctl_op(libc::PR_SET_NAME), "PR_SET_NAME");
        assert_eq!(format_prctl_op(PR_SET_VMA), "PR_SET_VMA");
        assert_eq!(format_prctl_op(0x7777), "0x7777 /* PR_??? */");
        assert_eq!(prctl_op_arg_count(libc::PR_GET_DUMPABLE), 1);
        assert_eq!(prctl_op_arg_count(libc::PR_SET_MM), 4);
        assert!(known_prctl_ops().any(|(op, _)| op == libc::PR_CAP_AMBIENT));
    }

    #[test]
    fn capabilities() {
        assert_eq!(format_capability(21), "CAP_SYS_ADMIN");
        assert_eq!(format_capability(99), "99");
    }
}
