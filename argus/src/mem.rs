// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Read-only access to a traced process's address space.

use std::{
    collections::{BTreeMap, HashMap},
    io::IoSliceMut,
    sync::atomic::{AtomicUsize, Ordering},
};

use argus_common::PAGE_SIZE;
use bytes::{Bytes, BytesMut};
use log::trace;
use nix::{
    errno::Errno,
    sys::uio::{process_vm_readv, RemoteIoVec},
    unistd::Pid,
};

use crate::error::Fault;

/// Largest single read we are willing to allocate for.
pub const MAX_FETCH: usize = 1 << 20;

/// Source of tracee memory. Any address and any length must be accepted;
/// failure is reported, never panicked on.
pub trait ReadMemory {
    /// Reads exactly `len` bytes, or fails without handing out a partial buffer.
    fn fetch_exact(&self, addr: u64, len: usize) -> Result<Bytes, Fault>;

    /// Reads up to and including the first NUL, or `max_len` bytes when no
    /// NUL shows up first. A chunk that faults is retried at half the size,
    /// so the string ends where readable memory does rather than a chunk
    /// earlier.
    fn fetch_cstring(&self, addr: u64, max_len: usize) -> Result<Bytes, Fault> {
        let mut out = BytesMut::new();
        let mut cur = addr;

        while out.len() < max_len {
            let to_page_end = PAGE_SIZE - (cur % PAGE_SIZE as u64) as usize;
            let mut chunk_len = to_page_end.min(max_len - out.len());

            let chunk = loop {
                match self.fetch_exact(cur, chunk_len) {
                    Ok(chunk) => break Some(chunk),
                    Err(Fault::Unmapped { .. } | Fault::Partial { .. } | Fault::Os { .. })
                        if chunk_len > 1 =>
                    {
                        chunk_len /= 2;
                    }
                    Err(fault) if out.is_empty() => return Err(fault),
                    Err(fault) => {
                        trace!("string at 0x{addr:x} ends early: {fault}");
                        break None;
                    }
                }
            };
            let Some(chunk) = chunk else {
                break;
            };

            if let Some(nul) = chunk.iter().position(|&b| b == 0) {
                out.extend_from_slice(&chunk[..=nul]);
                return Ok(out.freeze());
            }
            out.extend_from_slice(&chunk);

            match cur.checked_add(chunk_len as u64) {
                Some(next) => cur = next,
                None => break,
            }
        }

        Ok(out.freeze())
    }

    /// What `/proc/<pid>/fd/<fd>` points at, when it can be known.
    fn fd_path(&self, _fd: i32) -> Option<String> {
        None
    }
}

/// Memory of a live process, read with `process_vm_readv(2)`.
pub struct ProcessMemory {
    pid: Pid,
}

impl ProcessMemory {
    pub fn new(pid: i32) -> Self {
        ProcessMemory {
            pid: Pid::from_raw(pid),
        }
    }
}

impl ReadMemory for ProcessMemory {
    fn fetch_exact(&self, addr: u64, len: usize) -> Result<Bytes, Fault> {
        if len == 0 {
            return Ok(Bytes::new());
        }

        if len > MAX_FETCH {
            return Err(Fault::TooLarge { addr, len });
        }

        if addr.checked_add(len as u64).is_none() {
            return Err(Fault::Unmapped { addr });
        }

        let base = usize::try_from(addr).map_err(|_| Fault::Unmapped { addr })?;

        let mut buf = vec![0u8; len];
        let got = process_vm_readv(
            self.pid,
            &mut [IoSliceMut::new(&mut buf)],
            &[RemoteIoVec { base, len }],
        )
        .map_err(|errno| match errno {
            Errno::ESRCH => Fault::ProcessGone {
                pid: self.pid.as_raw(),
            },
            Errno::EFAULT => Fault::Unmapped { addr },
            errno => Fault::Os { addr, errno },
        })?;

        if got != len {
            trace!("short read from {} at 0x{addr:x}: {got}/{len}", self.pid);
            return Err(Fault::Partial {
                addr,
                wanted: len,
                got,
            });
        }

        Ok(Bytes::from(buf))
    }

    fn fd_path(&self, fd: i32) -> Option<String> {
        std::fs::read_link(format!("/proc/{}/fd/{fd}", self.pid))
            .ok()
            .map(|path| path.to_string_lossy().into_owned())
    }
}

/// A sparse, in-process address space. Used to render calls offline and to
/// drive the decoders in tests, including injected faults.
#[derive(Default)]
pub struct MemoryImage {
    regions: BTreeMap<u64, Bytes>,
    fds: HashMap<i32, String>,
    fail_on: Option<usize>,
    fail_from: Option<usize>,
    fetches: AtomicUsize,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `bytes` at `addr`. Regions must not overlap.
    pub fn map(mut self, addr: u64, bytes: impl Into<Bytes>) -> Self {
        self.regions.insert(addr, bytes.into());
        self
    }

    pub fn with_fd(mut self, fd: i32, path: &str) -> Self {
        self.fds.insert(fd, path.to_string());
        self
    }

    /// Makes the `n`th fetch (counting from 1) fail, and only that one.
    pub fn fail_on_fetch(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    /// Makes the `n`th fetch and every later one fail, as when the process
    /// exits in the middle of a decode.
    pub fn fail_from_fetch(mut self, n: usize) -> Self {
        self.fail_from = Some(n);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn count_fetch(&self, addr: u64) -> Result<(), Fault> {
        let n = self.fetches.fetch_add(1, Ordering::Relaxed) + 1;

        if self.fail_on == Some(n) {
            return Err(Fault::Unmapped { addr });
        }

        if self.fail_from.is_some_and(|from| n >= from) {
            return Err(Fault::ProcessGone { pid: 0 });
        }

        Ok(())
    }

    /// The region holding `addr` and the offset of `addr` inside it.
    fn region(&self, addr: u64) -> Option<(&Bytes, usize)> {
        let (start, bytes) = self.regions.range(..=addr).next_back()?;
        let offset = usize::try_from(addr - start).ok()?;
        (offset < bytes.len()).then_some((bytes, offset))
    }
}

impl ReadMemory for MemoryImage {
    fn fetch_exact(&self, addr: u64, len: usize) -> Result<Bytes, Fault> {
        self.count_fetch(addr)?;

        if len == 0 {
            return Ok(Bytes::new());
        }

        if len > MAX_FETCH {
            return Err(Fault::TooLarge { addr, len });
        }

        let (bytes, offset) = self.region(addr).ok_or(Fault::Unmapped { addr })?;
        let available = bytes.len() - offset;

        if available < len {
            return Err(Fault::Partial {
                addr,
                wanted: len,
                got: available,
            });
        }

        Ok(bytes.slice(offset..offset + len))
    }

    fn fetch_cstring(&self, addr: u64, max_len: usize) -> Result<Bytes, Fault> {
        self.count_fetch(addr)?;

        let (bytes, offset) = self.region(addr).ok_or(Fault::Unmapped { addr })?;
        let end = bytes.len().min(offset.saturating_add(max_len));
        let span = bytes.slice(offset..end);

        match span.iter().position(|&b| b == 0) {
            Some(nul) => Ok(span.slice(..=nul)),
            None => Ok(span),
        }
    }

    fn fd_path(&self, fd: i32) -> Option<String> {
        self.fds.get(&fd).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_reads_inside_regions_only() {
        let mem = MemoryImage::new().map(0x1000, vec![1u8, 2, 3, 4]);

        assert_eq!(&mem.fetch_exact(0x1001, 2).unwrap()[..], &[2, 3]);
        assert_eq!(
            mem.fetch_exact(0x1002, 4),
            Err(Fault::Partial {
                addr: 0x1002,
                wanted: 4,
                got: 2
            })
        );
        assert_eq!(
            mem.fetch_exact(0x2000, 1),
            Err(Fault::Unmapped { addr: 0x2000 })
        );
        assert_eq!(mem.fetch_exact(0, 4), Err(Fault::Unmapped { addr: 0 }));
        assert_eq!(mem.fetch_count(), 4);
    }

    #[test]
    fn huge_lengths_are_refused_before_allocating() {
        let mem = MemoryImage::new().map(0x1000, vec![0u8; 16]);
        assert_eq!(
            mem.fetch_exact(0x1000, usize::MAX),
            Err(Fault::TooLarge {
                addr: 0x1000,
                len: usize::MAX
            })
        );
    }

    #[test]
    fn cstring_stops_at_nul_or_limit() {
        let mem = MemoryImage::new().map(0x1000, b"hello\0world".to_vec());

        assert_eq!(&mem.fetch_cstring(0x1000, 64).unwrap()[..], b"hello\0");
        assert_eq!(&mem.fetch_cstring(0x1000, 3).unwrap()[..], b"hel");
        assert_eq!(&mem.fetch_cstring(0x1006, 64).unwrap()[..], b"world");
    }

    #[test]
    fn injected_faults() {
        let mem = MemoryImage::new()
            .map(0x1000, vec![0u8; 8])
            .fail_on_fetch(2);

        assert!(mem.fetch_exact(0x1000, 8).is_ok());
        assert!(mem.fetch_exact(0x1000, 8).is_err());
        assert!(mem.fetch_exact(0x1000, 8).is_ok());

        let gone = MemoryImage::new()
            .map(0x1000, vec![0u8; 8])
            .fail_from_fetch(1);
        assert_eq!(
            gone.fetch_cstring(0x1000, 8),
            Err(Fault::ProcessGone { pid: 0 })
        );
    }

    #[test]
    fn default_cstring_reader_crosses_pages() {
        struct Flat(Vec<u8>);

        impl ReadMemory for Flat {
            fn fetch_exact(&self, addr: u64, len: usize) -> Result<Bytes, Fault> {
                let start = addr as usize;
                self.0
                    .get(start..start + len)
                    .map(Bytes::copy_from_slice)
                    .ok_or(Fault::Unmapped { addr })
            }
        }

        let mut data = vec![b'a'; PAGE_SIZE + 8];
        data[PAGE_SIZE + 2] = 0;
        let flat = Flat(data);

        let s = flat.fetch_cstring((PAGE_SIZE - 4) as u64, 64).unwrap();
        assert_eq!(s.len(), 7);
        assert_eq!(s.last(), Some(&0));

        let capped = flat.fetch_cstring(0, 10).unwrap();
        assert_eq!(&capped[..], b"aaaaaaaaaa");
    }

    #[test]
    fn default_cstring_reader_stops_where_memory_ends() {
        struct Flat(Vec<u8>);

        impl ReadMemory for Flat {
            fn fetch_exact(&self, addr: u64, len: usize) -> Result<Bytes, Fault> {
                let start = addr as usize;
                self.0
                    .get(start..start + len)
                    .map(Bytes::copy_from_slice)
                    .ok_or(Fault::Unmapped { addr })
            }
        }

        // A NUL five bytes into a mapping that ends three bytes later.
        let mut data = vec![b'x'; 8];
        data[4] = 0;
        let flat = Flat(data);
        assert_eq!(&flat.fetch_cstring(0, 64).unwrap()[..], b"xxxx\0");

        // No NUL at all: everything readable, and nothing past it.
        let flat = Flat(vec![b'y'; 8]);
        assert_eq!(&flat.fetch_cstring(0, 64).unwrap()[..], b"yyyyyyyy");

        // Nothing readable at all is still a fault.
        let flat = Flat(Vec::new());
        assert_eq!(flat.fetch_cstring(0, 64), Err(Fault::Unmapped { addr: 0 }));
    }
}
