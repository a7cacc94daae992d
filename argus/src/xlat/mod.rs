// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Symbolic names for constants, and the three ways of showing them.

use std::fmt::Write as _;

use crate::config::XlatStyle;

pub mod bpf;
pub mod btrfs;
pub mod drm;
pub mod evdev;
pub mod net;
pub mod prctl;

/// Value-to-name pairs. Flag tables list single bits, value tables list
/// whole values.
pub type Xlat = &'static [(u64, &'static str)];

pub fn lookup(table: Xlat, value: u64) -> Option<&'static str> {
    table
        .iter()
        .find_map(|&(v, name)| (v == value).then_some(name))
}

fn render_value(value: u64, name: Option<&str>, style: XlatStyle, hex: bool) -> String {
    let number = if hex {
        format!("0x{value:x}")
    } else {
        value.to_string()
    };

    match (style, name) {
        (XlatStyle::Raw, _) | (_, None) => number,
        (XlatStyle::Abbrev, Some(name)) => name.to_string(),
        (XlatStyle::Verbose, Some(name)) => format!("{number} /* {name} */"),
    }
}

/// An enumerated value, shown in decimal when it has no name.
pub fn format_xval(value: u64, table: Xlat, style: XlatStyle) -> String {
    render_value(value, lookup(table, value), style, false)
}

/// Same as [`format_xval`], for values conventionally written in hex.
pub fn format_xval_hex(value: u64, table: Xlat, style: XlatStyle) -> String {
    render_value(value, lookup(table, value), style, true)
}

/// A command code whose name comes from somewhere other than a table.
pub fn format_named(value: u64, name: Option<&str>, style: XlatStyle) -> String {
    render_value(value, name, style, true)
}

fn flag_names(value: u64, table: Xlat) -> String {
    let mut parts = Vec::new();
    let mut rest = value;

    for &(bits, name) in table {
        if bits != 0 && value & bits == bits && rest & bits != 0 {
            parts.push(name.to_string());
            rest &= !bits;
        }
    }

    if rest != 0 {
        parts.push(format!("0x{rest:x}"));
    }

    parts.join("|")
}

/// A bit mask: `A|B|0x40`, with unknown bits left over in hex.
pub fn format_flags(value: u64, table: Xlat, style: XlatStyle) -> String {
    if value == 0 {
        return match (style, lookup(table, 0)) {
            (XlatStyle::Abbrev, Some(name)) => name.to_string(),
            (XlatStyle::Verbose, Some(name)) => format!("0 /* {name} */"),
            _ => "0".to_string(),
        };
    }

    match style {
        XlatStyle::Raw => format!("0x{value:x}"),
        XlatStyle::Abbrev => flag_names(value, table),
        XlatStyle::Verbose => format!("0x{value:x} ({})", flag_names(value, table)),
    }
}

/// The set bits of a little-endian bit array, by name where one is known.
/// At most `limit` bits are listed before `...`.
pub fn format_bit_list(bits: &[u8], table: Xlat, style: XlatStyle, limit: Option<usize>) -> String {
    let mut out = String::from("[");
    let mut shown = 0;

    for (byte_idx, &byte) in bits.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        for bit in 0..8 {
            if byte & (1 << bit) == 0 {
                continue;
            }

            out.push_str(if shown == 0 { " " } else { ", " });
            if limit.is_some_and(|limit| shown >= limit) {
                out.push_str("...");
                out.push_str(" ]");
                return out;
            }

            let nr = (byte_idx * 8 + bit) as u64;
            let _ = write!(out, "{}", format_xval(nr, table, style));
            shown += 1;
        }
    }

    if shown == 0 {
        out.push(']');
    } else {
        out.push_str(" ]");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: Xlat = &[(0, "NONE"), (1, "RED"), (2, "GREEN"), (4, "BLUE")];

    #[test]
    fn values() {
        assert_eq!(format_xval(2, COLORS, XlatStyle::Abbrev), "GREEN");
        assert_eq!(format_xval(2, COLORS, XlatStyle::Raw), "2");
        assert_eq!(format_xval(2, COLORS, XlatStyle::Verbose), "2 /* GREEN */");
        assert_eq!(format_xval(9, COLORS, XlatStyle::Verbose), "9");
        assert_eq!(format_xval_hex(16, COLORS, XlatStyle::Abbrev), "0x10");
    }

    #[test]
    fn flags() {
        assert_eq!(format_flags(0, COLORS, XlatStyle::Abbrev), "NONE");
        assert_eq!(format_flags(5, COLORS, XlatStyle::Abbrev), "RED|BLUE");
        assert_eq!(format_flags(0x45, COLORS, XlatStyle::Abbrev), "RED|BLUE|0x40");
        assert_eq!(format_flags(3, COLORS, XlatStyle::Raw), "0x3");
        assert_eq!(format_flags(3, COLORS, XlatStyle::Verbose), "0x3 (RED|GREEN)");
    }

    #[test]
    fn bit_lists() {
        assert_eq!(format_bit_list(&[0, 0], COLORS, XlatStyle::Abbrev, None), "[]");
        assert_eq!(
            format_bit_list(&[0b0110, 0x01], COLORS, XlatStyle::Abbrev, None),
            "[ RED, GREEN, 8 ]"
        );
        assert_eq!(
            format_bit_list(&[0xff], COLORS, XlatStyle::Abbrev, Some(2)),
            "[ NONE, RED, ... ]"
        );
    }
}
