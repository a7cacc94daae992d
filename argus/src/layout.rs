// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Structure layouts as data: the ordered fields of a kernel structure, and
//! the one loop that prints as many of them as the fetched bytes allow.

use anyhow::Result;
use argus_common::raw::RawStruct;
use bytes::Bytes;
use log::debug;

use crate::{
    arg, argf,
    dispatch::{DecodeContext, DecodeStatus},
    format_helpers::{format_addr, format_cstr, format_dev, format_hex_string, format_uuid},
    formatting::SyscallFormatter,
    state::Occurrence,
    xlat::{format_flags, format_xval, format_xval_hex, Xlat},
};

/// Who fills a field in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    /// Supplied by the caller, printed at entry.
    In,
    /// Supplied by the caller and possibly rewritten by the kernel; printed at
    /// exit, as `old => new` when it changed.
    InOut,
    /// Filled in by the kernel, printed at exit.
    Out,
}

/// Renders the bytes of one field.
pub type RenderFn = fn(&RawStruct<'_>, &DecodeContext<'_>) -> String;

#[derive(Clone, Copy)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    I16,
    I32,
    I64,
    X32,
    X64,
    Flags16(Xlat),
    Flags32(Xlat),
    Flags64(Xlat),
    Xval8(Xlat),
    Xval16(Xlat),
    Xval32(Xlat),
    Xval64(Xlat),
    /// A u32 code conventionally written in hex.
    XvalHex32(Xlat),
    Fd,
    Addr,
    CStr(usize),
    Uuid,
    Hex(usize),
    Dev,
    Struct(&'static Layout),
    Custom(usize, RenderFn),
}

impl FieldKind {
    pub const fn size(&self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Xval8(_) => 1,
            FieldKind::U16 | FieldKind::I16 | FieldKind::Flags16(_) | FieldKind::Xval16(_) => 2,
            FieldKind::U32
            | FieldKind::I32
            | FieldKind::X32
            | FieldKind::Flags32(_)
            | FieldKind::Xval32(_)
            | FieldKind::XvalHex32(_)
            | FieldKind::Fd => 4,
            FieldKind::U64
            | FieldKind::I64
            | FieldKind::X64
            | FieldKind::Flags64(_)
            | FieldKind::Xval64(_)
            | FieldKind::Addr
            | FieldKind::Dev => 8,
            FieldKind::Uuid => 16,
            FieldKind::CStr(len) | FieldKind::Hex(len) | FieldKind::Custom(len, _) => *len,
            FieldKind::Struct(layout) => layout.size,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub dir: Dir,
    pub kind: FieldKind,
}

impl Field {
    pub const fn size(&self) -> usize {
        self.kind.size()
    }

    pub const fn end(&self) -> usize {
        self.offset + self.size()
    }
}

/// The fields of one kernel structure, in increasing offset order.
pub struct Layout {
    pub name: &'static str,
    pub size: usize,
    pub fields: &'static [Field],
}

impl Layout {
    /// Fields that made it into `raw`, stopping at the first one that didn't.
    pub fn present<'l>(&'l self, raw: &RawStruct<'_>) -> impl Iterator<Item = &'l Field> {
        let len = raw.len();
        self.fields.iter().take_while(move |field| len > field.offset)
    }

    pub fn has_exit_fields(&self) -> bool {
        self.fields.iter().any(|f| f.dir != Dir::In)
    }

    /// Nothing in it is read by the kernel, so nothing is worth fetching
    /// before the call.
    pub fn is_output_only(&self) -> bool {
        self.fields.iter().all(|f| f.dir == Dir::Out)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builds a [`Field`] from a struct member, naming it after the member.
#[macro_export]
macro_rules! field {
    ($name:literal, $ty:ty, $member:ident, $dir:ident, $kind:expr) => {
        $crate::layout::Field {
            name: $name,
            offset: core::mem::offset_of!($ty, $member),
            dir: $crate::layout::Dir::$dir,
            kind: $kind,
        }
    };
    ($ty:ty, $member:ident, $dir:ident, $kind:expr) => {
        $crate::layout::Field {
            name: stringify!($member),
            offset: core::mem::offset_of!($ty, $member),
            dir: $crate::layout::Dir::$dir,
            kind: $kind,
        }
    };
}

pub fn render_value(cx: &DecodeContext<'_>, raw: &RawStruct<'_>, field: &Field) -> String {
    let at = field.offset;
    let style = cx.config.xlat_style;

    match field.kind {
        FieldKind::U8 => raw.u8(at).to_string(),
        FieldKind::U16 => raw.u16(at).to_string(),
        FieldKind::U32 => raw.u32(at).to_string(),
        FieldKind::U64 => raw.u64(at).to_string(),
        FieldKind::I16 => raw.i16(at).to_string(),
        FieldKind::I32 | FieldKind::Fd => raw.i32(at).to_string(),
        FieldKind::I64 => raw.i64(at).to_string(),
        FieldKind::X32 => format!("0x{:x}", raw.u32(at)),
        FieldKind::X64 => format!("0x{:x}", raw.u64(at)),
        FieldKind::Flags16(table) => format_flags(raw.u16(at) as u64, table, style),
        FieldKind::Flags32(table) => format_flags(raw.u32(at) as u64, table, style),
        FieldKind::Flags64(table) => format_flags(raw.u64(at), table, style),
        FieldKind::Xval8(table) => format_xval(raw.u8(at) as u64, table, style),
        FieldKind::Xval16(table) => format_xval(raw.u16(at) as u64, table, style),
        FieldKind::Xval32(table) => format_xval(raw.u32(at) as u64, table, style),
        FieldKind::Xval64(table) => format_xval(raw.u64(at), table, style),
        FieldKind::XvalHex32(table) => format_xval_hex(raw.u32(at) as u64, table, style),
        FieldKind::Addr => format_addr(raw.u64(at)),
        FieldKind::CStr(len) => format_cstr(raw.bytes(at, len), cx.config.max_string_len),
        FieldKind::Uuid => format_uuid(&raw.array::<16>(at)),
        FieldKind::Hex(len) => format_hex_string(raw.bytes(at, len), cx.config.max_string_len),
        FieldKind::Dev => format_dev(raw.u64(at)),
        FieldKind::Struct(layout) => {
            // Only reached for one-line renderings such as diffs of nested
            // structures inside arrays.
            let sub = raw.sub(at, layout.size);
            let parts: Vec<String> = layout
                .present(&sub)
                .map(|f| format!("{}: {}", f.name, render_value(cx, &sub, f)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        FieldKind::Custom(len, render) => render(&raw.sub(at, len), cx),
    }
}

/// Prints one field as `name: value`, recursing into nested structures.
pub fn print_field(
    sf: &mut SyscallFormatter<'_>,
    cx: &DecodeContext<'_>,
    raw: &RawStruct<'_>,
    field: &Field,
) -> Result<()> {
    if let FieldKind::Struct(layout) = field.kind {
        let sub = raw.sub(field.offset, layout.size);
        argf!(sf, "{}:", field.name);
        sf.push_depth(b"{")?;
        for inner in layout.present(&sub) {
            print_field(sf, cx, &sub, inner)?;
        }
        sf.pop_depth(b"}")?;
        return Ok(());
    }

    argf!(sf, "{}: {}", field.name, render_value(cx, raw, field));
    Ok(())
}

/// Prints a field that was also present at entry, flagging a change.
pub fn print_field_diff(
    sf: &mut SyscallFormatter<'_>,
    cx: &DecodeContext<'_>,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
    field: &Field,
) -> Result<()> {
    let size = field.size();
    if !old.has(field.offset) || old.bytes(field.offset, size) == new.bytes(field.offset, size) {
        return print_field(sf, cx, new, field);
    }

    if let FieldKind::Struct(layout) = field.kind {
        let old_sub = old.sub(field.offset, layout.size);
        let new_sub = new.sub(field.offset, layout.size);
        argf!(sf, "{}:", field.name);
        sf.push_depth(b"{")?;
        for inner in layout.present(&new_sub) {
            print_field_diff(sf, cx, &old_sub, &new_sub, inner)?;
        }
        sf.pop_depth(b"}")?;
        return Ok(());
    }

    argf!(
        sf,
        "{}: {} => {}",
        field.name,
        render_value(cx, old, field),
        render_value(cx, new, field)
    );
    Ok(())
}

/// Every present field, whatever its direction.
pub fn print_all_fields(
    sf: &mut SyscallFormatter<'_>,
    cx: &DecodeContext<'_>,
    layout: &Layout,
    raw: &RawStruct<'_>,
) -> Result<()> {
    for field in layout.present(raw) {
        print_field(sf, cx, raw, field)?;
    }
    Ok(())
}

pub fn print_entry_fields(
    sf: &mut SyscallFormatter<'_>,
    cx: &DecodeContext<'_>,
    layout: &Layout,
    raw: &RawStruct<'_>,
) -> Result<()> {
    for field in layout.present(raw).filter(|f| f.dir == Dir::In) {
        print_field(sf, cx, raw, field)?;
    }
    Ok(())
}

/// Fields the kernel may have written, compared against the entry image.
pub fn print_exit_fields(
    sf: &mut SyscallFormatter<'_>,
    cx: &DecodeContext<'_>,
    layout: &Layout,
    old: Option<&RawStruct<'_>>,
    new: &RawStruct<'_>,
) -> Result<()> {
    for field in layout.present(new) {
        match (field.dir, old) {
            (Dir::In, _) => {}
            (Dir::InOut, Some(old)) => print_field_diff(sf, cx, old, new, field)?,
            (Dir::InOut, None) | (Dir::Out, _) => print_field(sf, cx, new, field)?,
        }
    }
    Ok(())
}

/// After a failed call only what the caller supplied is meaningful.
pub fn print_saved_fields(
    sf: &mut SyscallFormatter<'_>,
    cx: &DecodeContext<'_>,
    layout: &Layout,
    old: &RawStruct<'_>,
) -> Result<()> {
    for field in layout.present(old).filter(|f| f.dir == Dir::InOut) {
        print_field(sf, cx, old, field)?;
    }
    Ok(())
}

/// An array element: `name { ... }`.
pub fn print_element(
    sf: &mut SyscallFormatter<'_>,
    cx: &DecodeContext<'_>,
    layout: &Layout,
    raw: &RawStruct<'_>,
) -> Result<()> {
    arg!(sf, layout.name);
    sf.push_depth(b"{")?;
    print_all_fields(sf, cx, layout, raw)?;
    sf.pop_depth(b"}")?;
    Ok(())
}

/// The entry-time image of a structure, kept for the exit phase.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub addr: u64,
    pub bytes: Bytes,
}

impl Snapshot {
    pub fn raw(&self) -> RawStruct<'_> {
        RawStruct::new(&self.bytes)
    }
}

/// A structure only the kernel fills in: where to read it after the call.
#[derive(Clone, Debug)]
pub struct PendingFetch {
    pub label: String,
    pub addr: u64,
    pub len: usize,
}

/// Fetches `len` bytes at `addr`, or prints `label: NULL` / `label: 0x...`
/// and returns `None` when there is nothing to decode.
pub fn fetch_or_print(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    len: usize,
) -> Result<Option<Bytes>> {
    if addr == 0 {
        argf!(sf, "{label}: NULL");
        return Ok(None);
    }

    match cx.mem.fetch_exact(addr, len) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(fault) => {
            debug!("{label}: {fault}");
            argf!(sf, "{label}: 0x{addr:x}");
            Ok(None)
        }
    }
}

/// Entry half of the generic structure decoder: prints the caller-supplied
/// fields and, when the kernel fills in anything, keeps the image and leaves
/// the structure open for the exit half.
pub fn decode_struct_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    layout: &Layout,
) -> Result<DecodeStatus> {
    decode_struct_entry_sized(cx, occ, sf, label, addr, layout, layout.size)
}

/// Like [`decode_struct_entry`], for structures whose size the caller
/// knows better than the layout (size bits of a request, a size argument).
pub fn decode_struct_entry_sized(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    layout: &Layout,
    len: usize,
) -> Result<DecodeStatus> {
    if layout.is_output_only() {
        if addr == 0 {
            argf!(sf, "{label}: NULL");
            return Ok(DecodeStatus::Complete);
        }
        occ.set_private(PendingFetch {
            label: label.to_string(),
            addr,
            len,
        });
        return Ok(DecodeStatus::NeedsExit);
    }

    let Some(bytes) = fetch_or_print(cx, sf, label, addr, len)? else {
        return Ok(DecodeStatus::Complete);
    };

    let raw = RawStruct::new(&bytes);
    argf!(sf, "{label}:");
    sf.push_depth(b"{")?;
    print_entry_fields(sf, cx, layout, &raw)?;

    if layout.has_exit_fields() {
        occ.set_private(Snapshot { addr, bytes });
        return Ok(DecodeStatus::NeedsExit);
    }

    sf.pop_depth(b"}")?;
    Ok(DecodeStatus::Complete)
}

/// Refetches the structure after the call, or returns `None` after printing
/// `<unavailable>` when that is not possible.
pub fn refetch(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    snapshot: &Snapshot,
) -> Result<Option<Bytes>> {
    match cx.mem.fetch_exact(snapshot.addr, snapshot.bytes.len()) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(fault) => {
            debug!("refetch of 0x{:x} failed: {fault}", snapshot.addr);
            arg!(sf, "<unavailable>");
            Ok(None)
        }
    }
}

/// Exit half of the generic structure decoder.
pub fn decode_struct_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    layout: &Layout,
) -> Result<()> {
    if let Some(pending) = occ.take_private::<PendingFetch>() {
        return print_pending(cx, occ, sf, layout, &pending);
    }

    let Some(snapshot) = occ.take_private::<Snapshot>() else {
        return Ok(());
    };
    let old = snapshot.raw();

    if occ.failed() {
        print_saved_fields(sf, cx, layout, &old)?;
    } else if let Some(bytes) = refetch(cx, sf, &snapshot)? {
        print_exit_fields(sf, cx, layout, Some(&old), &RawStruct::new(&bytes))?;
    }

    sf.pop_depth(b"}")?;
    Ok(())
}

/// Exit half for output-only structures.
pub fn print_pending(
    cx: &DecodeContext<'_>,
    occ: &Occurrence,
    sf: &mut SyscallFormatter<'_>,
    layout: &Layout,
    pending: &PendingFetch,
) -> Result<()> {
    if occ.failed() {
        argf!(sf, "{}: 0x{:x}", pending.label, pending.addr);
        return Ok(());
    }

    let Some(bytes) = fetch_or_print(cx, sf, &pending.label, pending.addr, pending.len)? else {
        return Ok(());
    };

    argf!(sf, "{}:", pending.label);
    sf.push_depth(b"{")?;
    print_all_fields(sf, cx, layout, &RawStruct::new(&bytes))?;
    sf.pop_depth(b"}")?;
    Ok(())
}

/// Entry half for structures whose exit needs more than the generic loop:
/// prints the caller's fields and keeps the image.
pub fn enter_struct(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    layout: &Layout,
) -> Result<DecodeStatus> {
    let Some(bytes) = fetch_or_print(cx, sf, label, addr, layout.size)? else {
        return Ok(DecodeStatus::Complete);
    };

    argf!(sf, "{label}:");
    sf.push_depth(b"{")?;
    print_entry_fields(sf, cx, layout, &RawStruct::new(&bytes))?;
    occ.set_private(Snapshot { addr, bytes });
    Ok(DecodeStatus::NeedsExit)
}

/// Renders what follows the fixed fields once the call succeeded: gets the
/// structure address, the entry image and the exit image.
pub type ExitTail = fn(
    &mut DecodeContext<'_>,
    &mut SyscallFormatter<'_>,
    u64,
    &RawStruct<'_>,
    &RawStruct<'_>,
) -> Result<()>;

/// For structures whose exit has nothing past the fixed fields.
pub fn no_tail(
    _cx: &mut DecodeContext<'_>,
    _sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    _old: &RawStruct<'_>,
    _new: &RawStruct<'_>,
) -> Result<()> {
    Ok(())
}

pub fn exit_struct(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    layout: &Layout,
    tail: ExitTail,
) -> Result<()> {
    let Some(snapshot) = occ.take_private::<Snapshot>() else {
        return Ok(());
    };
    let old = snapshot.raw();

    if occ.failed() {
        print_saved_fields(sf, cx, layout, &old)?;
    } else if let Some(bytes) = refetch(cx, sf, &snapshot)? {
        let new = RawStruct::new(&bytes);
        print_exit_fields(sf, cx, layout, Some(&old), &new)?;
        tail(cx, sf, snapshot.addr, &old, &new)?;
    }

    sf.pop_depth(b"}")
}
