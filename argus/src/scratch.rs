// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::collections::HashMap;

use argus_common::PAGE_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScratchPurpose {
    /// `union bpf_attr` images.
    BpfAttr,
    /// evdev key/LED/switch/event-type bit arrays.
    Bitset,
}

/// Page-sized buffers reused across decodes, one per purpose.
///
/// A checked-out buffer is always zeroed before the new contents are copied
/// in, so nothing from an earlier call can show through.
#[derive(Debug, Default)]
pub struct ScratchBuffers {
    buffers: HashMap<ScratchPurpose, Vec<u8>>,
}

impl ScratchBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page of zeroes with `contents` copied to its start. Bytes beyond a
    /// page are dropped.
    pub fn checkout(&mut self, purpose: ScratchPurpose, contents: &[u8]) -> Vec<u8> {
        let mut buf = self.buffers.remove(&purpose).unwrap_or_default();

        buf.clear();
        buf.resize(PAGE_SIZE, 0);

        let len = contents.len().min(PAGE_SIZE);
        buf[..len].copy_from_slice(&contents[..len]);
        buf
    }

    pub fn restore(&mut self, purpose: ScratchPurpose, buf: Vec<u8>) {
        self.buffers.insert(purpose, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_never_shows_stale_bytes() {
        let mut scratch = ScratchBuffers::new();

        let buf = scratch.checkout(ScratchPurpose::BpfAttr, &[0xaa; 64]);
        assert_eq!(buf.len(), PAGE_SIZE);
        scratch.restore(ScratchPurpose::BpfAttr, buf);

        let buf = scratch.checkout(ScratchPurpose::BpfAttr, &[1, 2]);
        assert_eq!(&buf[..4], &[1, 2, 0, 0]);
        assert!(buf[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn oversized_contents_are_cut_to_a_page() {
        let mut scratch = ScratchBuffers::new();
        let big = vec![7u8; PAGE_SIZE + 10];

        let buf = scratch.checkout(ScratchPurpose::Bitset, &big);
        assert_eq!(buf.len(), PAGE_SIZE);
        assert!(buf.iter().all(|&b| b == 7));
    }
}
