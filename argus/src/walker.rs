// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! The one loop every array in a tracee's memory goes through.

use anyhow::Result;
use argus_common::raw::RawStruct;
use log::debug;

use crate::{arg, argf, dispatch::DecodeContext, formatting::SyscallFormatter};

/// Absolute number of elements ever fetched for one array, whatever the
/// configured abbreviation cap says.
pub const ARRAY_CEILING: usize = 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub printed: usize,
    pub truncated: bool,
    pub faulted: bool,
}

/// Elements to print before `...`.
pub fn element_cap(cx: &DecodeContext<'_>) -> usize {
    cx.config
        .max_array_elems
        .map_or(ARRAY_CEILING, |cap| cap.min(ARRAY_CEILING))
}

/// Renders `count` elements of `elem_size` bytes at `base` as
/// `label: [ a, b, ... ]`. The callback renders one element and returns
/// whether to keep going.
///
/// `count` is whatever the tracee or the kernel claimed and is never trusted:
/// at most [`element_cap`] elements are fetched, one at a time, and a fault
/// ends the walk with the address of the element that could not be read.
pub fn print_array<F>(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    base: u64,
    count: u64,
    elem_size: usize,
    mut render: F,
) -> Result<WalkSummary>
where
    F: FnMut(&mut DecodeContext<'_>, &mut SyscallFormatter<'_>, &[u8], usize) -> Result<bool>,
{
    let mut summary = WalkSummary::default();

    if base == 0 {
        argf!(sf, "{label}: NULL");
        return Ok(summary);
    }
    if count == 0 {
        argf!(sf, "{label}: []");
        return Ok(summary);
    }
    if elem_size == 0 {
        argf!(sf, "{label}: 0x{base:x}");
        return Ok(summary);
    }

    let cap = element_cap(cx);

    argf!(sf, "{label}:");
    sf.push_depth(b"[")?;

    for idx in 0..count {
        if idx >= cap as u64 {
            arg!(sf, "...");
            summary.truncated = true;
            break;
        }

        let Some(addr) = idx
            .checked_mul(elem_size as u64)
            .and_then(|offset| base.checked_add(offset))
        else {
            debug!("{label}: element {idx} lies past the end of the address space");
            arg!(sf, "...");
            summary.truncated = true;
            break;
        };

        match cx.mem.fetch_exact(addr, elem_size) {
            Ok(bytes) => {
                summary.printed += 1;
                if !render(cx, sf, &bytes, idx as usize)? {
                    break;
                }
            }
            Err(fault) => {
                debug!("{label}[{idx}]: {fault}");
                argf!(sf, "0x{addr:x}");
                summary.faulted = true;
                break;
            }
        }
    }

    sf.pop_depth(b"]")?;
    Ok(summary)
}

/// Same as [`print_array`] for elements that were already fetched as part of
/// an enclosing structure. Running out of bytes before `count` elements
/// counts as truncation.
pub fn print_local_array<F>(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    bytes: &[u8],
    count: u64,
    elem_size: usize,
    mut render: F,
) -> Result<WalkSummary>
where
    F: FnMut(&mut DecodeContext<'_>, &mut SyscallFormatter<'_>, &[u8], usize) -> Result<bool>,
{
    let mut summary = WalkSummary::default();

    if count == 0 || elem_size == 0 {
        argf!(sf, "{label}: []");
        return Ok(summary);
    }

    let cap = element_cap(cx);

    argf!(sf, "{label}:");
    sf.push_depth(b"[")?;

    let mut chunks = bytes.chunks_exact(elem_size);
    for idx in 0..count {
        if idx >= cap as u64 {
            arg!(sf, "...");
            summary.truncated = true;
            break;
        }

        let Some(elem) = chunks.next() else {
            arg!(sf, "...");
            summary.truncated = true;
            break;
        };

        summary.printed += 1;
        if !render(cx, sf, elem, idx as usize)? {
            break;
        }
    }

    sf.pop_depth(b"]")?;
    Ok(summary)
}

/// Element renderers for arrays of plain integers.
pub fn print_u32_elem(
    _cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    elem: &[u8],
    _idx: usize,
) -> Result<bool> {
    argf!(sf, "{}", RawStruct::new(elem).u32(0));
    Ok(true)
}

pub fn print_u64_elem(
    _cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    elem: &[u8],
    _idx: usize,
) -> Result<bool> {
    argf!(sf, "{}", RawStruct::new(elem).u64(0));
    Ok(true)
}

pub fn print_x64_elem(
    _cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    elem: &[u8],
    _idx: usize,
) -> Result<bool> {
    argf!(sf, "0x{:x}", RawStruct::new(elem).u64(0));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DecodeConfig,
        formatting::{Formatter, FormattingStyle},
        mem::MemoryImage,
        scratch::ScratchBuffers,
    };

    fn walk(
        mem: &MemoryImage,
        config: &DecodeConfig,
        base: u64,
        count: u64,
        elem_size: usize,
    ) -> (String, WalkSummary) {
        let mut output = Vec::new();
        let mut scratch = ScratchBuffers::new();
        let mut cx = DecodeContext::new(mem, config, &mut scratch);

        let formatter = Formatter::new(&mut output, FormattingStyle::OneLine);
        let mut sf = formatter.push_syscall(1, -1).unwrap();
        let summary = print_array(&mut cx, &mut sf, "ids", base, count, elem_size, |_, sf, elem, _| {
            argf!(sf, "{}", elem[0]);
            Ok(true)
        })
        .unwrap();
        sf.finish(0, None).unwrap();

        (String::from_utf8(output).unwrap(), summary)
    }

    #[test]
    fn null_and_empty_arrays_differ() {
        let mem = MemoryImage::new();
        let config = DecodeConfig::default();

        let (out, _) = walk(&mem, &config, 0, 4, 4);
        assert_eq!(out, "1 syscall_-1(ids: NULL) = 0\n");

        let (out, _) = walk(&mem, &config, 0x1000, 0, 4);
        assert_eq!(out, "1 syscall_-1(ids: []) = 0\n");
        assert_eq!(mem.fetch_count(), 0);
    }

    #[test]
    fn hostile_counts_stop_at_the_ceiling() {
        let mem = MemoryImage::new().map(0x10000, vec![7u8; 8 * 2048]);
        let config = DecodeConfig::default().verbose();

        let (out, summary) = walk(&mem, &config, 0x10000, u32::MAX as u64, 8);
        assert!(out.ends_with(", 7, ... ]) = 0\n"));
        assert_eq!(summary.printed, ARRAY_CEILING);
        assert!(summary.truncated);
        assert_eq!(mem.fetch_count(), ARRAY_CEILING);
    }

    #[test]
    fn abbreviation_cap_applies_first() {
        let mem = MemoryImage::new().map(0x10000, vec![1, 2, 3, 4]);
        let config = DecodeConfig::default().with_array_limit(Some(2));

        let (out, summary) = walk(&mem, &config, 0x10000, 4, 1);
        assert_eq!(out, "1 syscall_-1(ids: [ 1, 2, ... ]) = 0\n");
        assert_eq!(summary.printed, 2);
        assert_eq!(mem.fetch_count(), 2);
    }

    #[test]
    fn a_hole_ends_the_walk() {
        let mem = MemoryImage::new().map(0x10000, vec![5u8; 8]);
        let config = DecodeConfig::default();

        let (out, summary) = walk(&mem, &config, 0x10000, 3, 4);
        assert_eq!(out, "1 syscall_-1(ids: [ 5, 5, 0x10008 ]) = 0\n");
        assert!(summary.faulted);
    }

    #[test]
    fn wrapping_addresses_are_not_fetched() {
        let mem = MemoryImage::new();
        let config = DecodeConfig::default();

        let (out, summary) = walk(&mem, &config, u64::MAX - 3, 4, 1 << 20);
        assert_eq!(out, "1 syscall_-1(ids: [ 0xfffffffffffffffc ]) = 0\n");
        assert!(summary.faulted);

        let mem = MemoryImage::new().map(u64::MAX - 0xf, vec![9u8; 0x10]);
        let (out, summary) = walk(&mem, &config, u64::MAX - 0xf, 3, 0x10);
        assert_eq!(out, "1 syscall_-1(ids: [ 9, ... ]) = 0\n");
        assert!(summary.truncated);
    }
}
