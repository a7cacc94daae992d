// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Drives the two phases of every traced call: opens the output line at
//! entry, keeps it and the decoder's state with the thread until the exit,
//! and closes it with the result.

use std::io::Write;

use anyhow::Result;
use log::{debug, warn};

use crate::{
    config::DecodeConfig,
    dispatch::{self, DecodeContext, DecodeStatus},
    formatting::Formatter,
    mem::ReadMemory,
    scratch::ScratchBuffers,
    state::{CallSites, Occurrence, RawCall},
};

#[derive(Debug, Default)]
pub struct Session {
    config: DecodeConfig,
    sites: CallSites,
    scratch: ScratchBuffers,
    /// Thread whose line is the last thing written and not yet terminated.
    open_line: Option<u32>,
}

impl Session {
    pub fn new(config: DecodeConfig) -> Self {
        Session {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Calls that have entered but not exited.
    pub fn pending(&self) -> usize {
        self.sites.len()
    }

    /// Terminates whatever line is open with `<unfinished ...>` so that
    /// other output can follow.
    pub fn interrupt_open_line(&mut self, out: &mut dyn Write) -> Result<()> {
        let Some(tid) = self.open_line.take() else {
            return Ok(());
        };

        if let Some(state) = self.sites.get_mut(tid).and_then(|o| o.format_mut()) {
            Formatter::new(out, self.config.style).interrupt(state)?;
        }
        Ok(())
    }

    pub fn on_entry(
        &mut self,
        mem: &dyn ReadMemory,
        out: &mut dyn Write,
        tid: u32,
        call: RawCall,
    ) -> Result<()> {
        if self.open_line.is_some_and(|open| open != tid) {
            self.interrupt_open_line(out)?;
        }
        if let Some(stale) = self.sites.finish(tid) {
            self.close_abandoned(out, stale)?;
        }

        self.sites.begin(Occurrence::new(tid, call));
        let Some(occ) = self.sites.get_mut(tid) else {
            return Ok(());
        };

        let mut sf = Formatter::new(out, self.config.style).push_syscall(tid, call.nr)?;
        let mut cx = DecodeContext::new(mem, &self.config, &mut self.scratch);
        let status = dispatch::decode_entry(&mut cx, occ, &mut sf)?;

        occ.enter(status == DecodeStatus::NeedsExit);
        occ.park_format(sf.suspend());
        self.open_line = Some(tid);
        Ok(())
    }

    pub fn on_exit(
        &mut self,
        mem: &dyn ReadMemory,
        out: &mut dyn Write,
        tid: u32,
        retval: i64,
    ) -> Result<()> {
        if self.open_line.is_some_and(|open| open != tid) {
            self.interrupt_open_line(out)?;
        }

        let Some(mut occ) = self.sites.finish(tid) else {
            warn!("exit of tid {tid} without a matching entry");
            return Ok(());
        };
        occ.set_retval(retval);

        let Some(state) = occ.take_format() else {
            warn!("tid {tid}: no output line to finish");
            return Ok(());
        };

        let mut sf = Formatter::new(out, self.config.style).resume(state)?;
        if occ.needs_exit() {
            let mut cx = DecodeContext::new(mem, &self.config, &mut self.scratch);
            dispatch::decode_exit(&mut cx, &mut occ, &mut sf)?;
        }
        sf.finish(retval, None)?;

        occ.retire();
        self.open_line = None;
        Ok(())
    }

    /// The thread exited or was detached mid-call: the call will never
    /// report a result, so its line is closed with `= ?`.
    pub fn on_tracee_gone(&mut self, out: &mut dyn Write, tid: u32) -> Result<()> {
        if self.open_line.is_some_and(|open| open != tid) {
            self.interrupt_open_line(out)?;
        }

        match self.sites.finish(tid) {
            Some(occ) => self.close_abandoned(out, occ),
            None => {
                debug!("tid {tid} gone with no call in flight");
                Ok(())
            }
        }
    }

    fn close_abandoned(&mut self, out: &mut dyn Write, mut occ: Occurrence) -> Result<()> {
        if let Some(state) = occ.take_format() {
            Formatter::new(out, self.config.style)
                .resume(state)?
                .abandon()?;
        }

        if self.open_line == Some(occ.tid()) {
            self.open_line = None;
        }
        occ.clear_private();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use argus_common::syscalls::SYS_ioctl;

    use super::*;
    use crate::mem::MemoryImage;

    // Not in the syscall table, so decoded as raw words.
    const UNTRACKED_NR: i64 = 999;

    fn render(f: impl FnOnce(&mut Session, &MemoryImage, &mut Vec<u8>)) -> String {
        let mut session = Session::new(DecodeConfig::default());
        let mem = MemoryImage::new();
        let mut out = Vec::new();
        f(&mut session, &mem, &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn unknown_syscall_prints_raw_arguments() {
        let output = render(|session, mem, out| {
            session
                .on_entry(mem, out, 5, RawCall::new(UNTRACKED_NR, [1, 2, 0, 0, 0, 0]))
                .unwrap();
            session.on_exit(mem, out, 5, 5).unwrap();
            assert_eq!(session.pending(), 0);
        });

        assert_eq!(
            output,
            "5 syscall_999(0x1, 0x2, 0x0, 0x0, 0x0, 0x0) = 5\n"
        );
    }

    #[test]
    fn interleaved_threads_are_resumed() {
        let output = render(|session, mem, out| {
            session
                .on_entry(mem, out, 1, RawCall::new(UNTRACKED_NR, [0; 6]))
                .unwrap();
            session
                .on_entry(mem, out, 2, RawCall::new(UNTRACKED_NR, [0; 6]))
                .unwrap();
            session.on_exit(mem, out, 1, 1).unwrap();
            session.on_exit(mem, out, 2, 2).unwrap();
        });

        assert_eq!(
            output,
            "1 syscall_999(0x0, 0x0, 0x0, 0x0, 0x0, 0x0 <unfinished ...>\n\
             2 syscall_999(0x0, 0x0, 0x0, 0x0, 0x0, 0x0 <unfinished ...>\n\
             1 <... syscall_999 resumed>) = 1\n\
             2 <... syscall_999 resumed>) = 2\n"
        );
    }

    #[test]
    fn vanished_thread_closes_its_line() {
        let output = render(|session, mem, out| {
            session
                .on_entry(mem, out, 9, RawCall::new(SYS_ioctl, [3, 0x5401, 0, 0, 0, 0]))
                .unwrap();
            session.on_tracee_gone(out, 9).unwrap();
            assert_eq!(session.pending(), 0);
        });

        assert!(output.starts_with("9 ioctl(fd: 3"));
        assert!(output.ends_with(") = ?\n"));
    }

    #[test]
    fn exit_without_entry_is_ignored() {
        let output = render(|session, mem, out| {
            session.on_exit(mem, out, 4, 0).unwrap();
        });
        assert!(output.is_empty());
    }
}
