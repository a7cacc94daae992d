// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

pub mod bpf;
pub mod btrfs;
pub mod drm;
pub mod evdev;
pub mod ioctl;
pub mod kcmp;
pub mod prctl;
pub mod sock;
pub mod sockaddr;
pub mod socket;

use argus_common::raw::RawStruct;

use crate::dispatch::DecodeContext;

/// Renders a pointer field as the NUL-terminated string it points to.
pub(crate) fn render_string_ptr(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.string_at(raw.u64(0))
}

/// Renders a timespec-like pair of signed 64-bit seconds and fraction.
pub(crate) fn render_timespec(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    format!("{{ tv_sec: {}, tv_nsec: {} }}", raw.i64(0), raw.i64(8))
}

pub(crate) fn render_timeval(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    format!("{{ tv_sec: {}, tv_usec: {} }}", raw.i64(0), raw.i64(8))
}
