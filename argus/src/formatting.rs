// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::io::Write;

use anyhow::Result;
use argus_common::syscalls::syscall_name_from_nr;
use clap::ValueEnum;
use log::warn;

use crate::format_helpers::{format_return_value, ReturnKind};

/// Push formatted argument to the formatter
#[macro_export]
macro_rules! argf {
    ($sf:expr, $($arg:tt)*) => {
        $sf.push_arg(format!($($arg)*).as_bytes())?
    };
}

/// Push argument to the formatter
#[macro_export]
macro_rules! arg {
    ($sf:expr, $arg:expr) => {
        $sf.push_arg($arg.as_bytes())?
    };
}

/// Push raw bytes to the formatter
#[macro_export]
macro_rules! raw {
    ($sf:expr, $arg:expr) => {
        $sf.push_raw($arg.as_bytes())?
    };
}

/// Finish formatting with a return value
#[macro_export]
macro_rules! finish {
    ($sf:expr, $retval:expr) => {
        $sf.finish($retval, None)?
    };
    ($sf:expr, $retval:expr, $extra:expr) => {
        $sf.finish($retval, Some($extra))?
    };
}

/// Create a section with indented content
#[macro_export]
macro_rules! with_struct {
    ($sf:expr, $($body:tt)*) => {
        $sf.push_depth(b"{")?;
        $($body)*
        $sf.pop_depth(b"}")?;
    };
}

#[macro_export]
macro_rules! with_array {
    ($sf:expr, $($body:tt)*) => {
        $sf.push_depth(b"[")?;
        $($body)*
        $sf.pop_depth(b"]")?;
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FormattingStyle {
    #[default]
    OneLine,
    MultiLine,
}

/// Where a partially written line stands: kept in the call occurrence
/// between its entry and exit so the exit phase can pick the line up again.
#[derive(Clone, Debug)]
pub struct FormatState {
    pid: u32,
    syscall_nr: i64,
    args: Vec<usize>,
    closers: Vec<&'static [u8]>,
    return_kind: ReturnKind,
    interrupted: bool,
}

impl FormatState {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn syscall_nr(&self) -> i64 {
        self.syscall_nr
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }
}

pub fn syscall_label(syscall_nr: i64) -> String {
    match syscall_name_from_nr(syscall_nr) {
        Some(name) => name.to_string(),
        None => format!("syscall_{syscall_nr}"),
    }
}

pub struct Formatter<'f> {
    style: FormattingStyle,
    output: &'f mut dyn Write,
}

impl<'f> Formatter<'f> {
    pub fn new(output: &'f mut dyn Write, style: FormattingStyle) -> Self {
        Formatter { style, output }
    }

    fn write_pid(&mut self, pid: u32) -> Result<()> {
        self.output.write_all(pid.to_string().as_bytes())?;

        match self.style {
            FormattingStyle::OneLine => self.output.write_all(b" ")?,
            FormattingStyle::MultiLine => self.output.write_all(b"\n\t")?,
        };

        Ok(())
    }

    pub fn push_syscall(mut self, pid: u32, syscall_nr: i64) -> Result<SyscallFormatter<'f>> {
        self.write_pid(pid)?;
        self.output.write_all(syscall_label(syscall_nr).as_bytes())?;
        self.output.write_all(b"(")?;

        Ok(SyscallFormatter {
            formatter: self,
            state: FormatState {
                pid,
                syscall_nr,
                args: vec![0],
                closers: vec![],
                return_kind: ReturnKind::default(),
                interrupted: false,
            },
        })
    }

    /// Continues a line left off by [`SyscallFormatter::suspend`]. If another
    /// line was written in between, a `<... name resumed>` header starts a
    /// fresh one.
    pub fn resume(mut self, mut state: FormatState) -> Result<SyscallFormatter<'f>> {
        if state.interrupted {
            self.write_pid(state.pid)?;
            self.output.write_all(b"<... ")?;
            self.output
                .write_all(syscall_label(state.syscall_nr).as_bytes())?;
            self.output.write_all(b" resumed>")?;
            state.interrupted = false;
        }

        Ok(SyscallFormatter {
            formatter: self,
            state,
        })
    }

    /// Ends a suspended line so that another call's output can start.
    pub fn interrupt(&mut self, state: &mut FormatState) -> Result<()> {
        if !state.interrupted {
            self.output.write_all(b" <unfinished ...>\n")?;
            state.interrupted = true;
        }
        Ok(())
    }
}

pub struct SyscallFormatter<'f> {
    formatter: Formatter<'f>,
    state: FormatState,
}

const INDENT_STEP: &[u8] = &[b' '; 4];
impl<'f> SyscallFormatter<'f> {
    fn argc(&self) -> usize {
        self.state.args.last().copied().unwrap_or(0)
    }

    fn inc_argc(&mut self) {
        if let Some(argc) = self.state.args.last_mut() {
            *argc += 1;
        }
    }

    pub fn style(&self) -> FormattingStyle {
        self.formatter.style
    }

    pub fn set_return_kind(&mut self, kind: ReturnKind) {
        self.state.return_kind = kind;
    }

    pub fn push_depth(&mut self, bracket: &[u8]) -> Result<()> {
        let output = &mut self.formatter.output;

        match self.formatter.style {
            FormattingStyle::OneLine => {
                output.write_all(b" ")?;
                output.write_all(bracket)?;
                output.write_all(b" ")?;
            }
            FormattingStyle::MultiLine => {
                output.write_all(b" ")?;
                output.write_all(bracket)?;
            }
        }

        self.state.args.push(0);
        self.state.closers.push(match bracket {
            b"[" => b"]",
            b"(" => b")",
            _ => b"}",
        });

        Ok(())
    }

    pub fn pop_depth(&mut self, bracket: &[u8]) -> Result<()> {
        if self.get_depth() <= 1 {
            anyhow::bail!("unbalanced {:?}", String::from_utf8_lossy(bracket));
        }

        self.state.args.pop();
        self.state.closers.pop();

        let depth = self.get_depth();
        let output = &mut self.formatter.output;
        match self.formatter.style {
            FormattingStyle::OneLine => output.write_all(b" ")?,
            FormattingStyle::MultiLine => {
                output.write_all(b"\n\t")?;
                for _ in 0..depth {
                    output.write_all(INDENT_STEP)?;
                }
            }
        }

        output.write_all(bracket)?;

        Ok(())
    }

    pub fn get_depth(&self) -> usize {
        self.state.args.len()
    }

    fn close_open_depths(&mut self) -> Result<()> {
        while let Some(closer) = self.state.closers.last().copied() {
            self.pop_depth(closer)?;
        }
        Ok(())
    }

    pub fn push_arg(&mut self, arg: &[u8]) -> Result<()> {
        let argc = self.argc();
        let depth = self.get_depth();

        let output = &mut self.formatter.output;

        // Always add a comma after a previous argument, if any.
        if argc > 0 {
            output.write_all(b",")?;
        }
        match self.formatter.style {
            FormattingStyle::OneLine => {
                if argc > 0 {
                    output.write_all(b" ")?;
                }
                output.write_all(arg)?;
            }
            FormattingStyle::MultiLine => {
                output.write_all(b"\n\t")?;
                for _ in 0..depth {
                    output.write_all(INDENT_STEP)?;
                }
                output.write_all(arg)?;
            }
        }

        self.inc_argc();

        Ok(())
    }

    pub fn push_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.formatter.output.write_all(bytes)?;
        Ok(())
    }

    /// Parks the line between the entry and exit phases.
    pub fn suspend(self) -> FormatState {
        self.state
    }

    pub fn finish(mut self, return_value: i64, suffix: Option<&[u8]>) -> Result<Formatter<'f>> {
        if self.get_depth() != 1 {
            warn!(
                "closing {} unbalanced bracket(s) in {}",
                self.get_depth() - 1,
                syscall_label(self.state.syscall_nr)
            );
            self.close_open_depths()?;
        }

        let formatted = format_return_value(self.state.return_kind, return_value);

        let output = &mut self.formatter.output;

        if let FormattingStyle::MultiLine = self.formatter.style {
            output.write_all(b"\n\t")?;
        }

        output.write_all(b") = ")?;
        output.write_all(formatted.as_bytes())?;

        if let Some(suffix) = suffix {
            output.write_all(suffix)?;
        }

        output.write_all(b"\n")?;

        Ok(self.formatter)
    }

    /// Closes the line of a call that will never report a result.
    pub fn abandon(mut self) -> Result<Formatter<'f>> {
        self.close_open_depths()?;

        let output = &mut self.formatter.output;
        if let FormattingStyle::MultiLine = self.formatter.style {
            output.write_all(b"\n\t")?;
        }
        output.write_all(b") = ?\n")?;

        Ok(self.formatter)
    }
}

#[cfg(test)]
mod test {
    use argus_common::syscalls::SYS_ioctl;
    use indoc::indoc;

    use super::*;

    #[test]
    fn simple() {
        let mut output: Vec<u8> = vec![];

        let formatter = Formatter::new(&mut output, FormattingStyle::MultiLine);

        let mut sysformatter = formatter.push_syscall(1, SYS_ioctl).unwrap();
        sysformatter.push_arg(b"fd: 1").unwrap();

        let _ = sysformatter.finish(0, Some(b" <STUB>")).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            indoc! {"
                1
                \tioctl(
                \t    fd: 1
                \t) = 0 <STUB>
            "}
            .to_string()
        );
    }

    #[test]
    fn depth() {
        let mut output: Vec<u8> = vec![];

        let formatter = Formatter::new(&mut output, FormattingStyle::MultiLine);

        let mut sf = formatter.push_syscall(1, SYS_ioctl).unwrap();
        sf.push_arg(b"fd: 1").unwrap();

        sf.push_arg(b"arg:").unwrap();

        sf.push_depth(b"{").unwrap();

        sf.push_arg(b"handle: 2").unwrap();
        sf.push_arg(b"pitch: 200").unwrap();

        sf.pop_depth(b"}").unwrap();

        let _ = sf.finish(0, None).unwrap();
        assert_eq!(
            String::from_utf8_lossy(&output),
            indoc! {"
                1
                \tioctl(
                \t    fd: 1,
                \t    arg: {
                \t        handle: 2,
                \t        pitch: 200
                \t    }
                \t) = 0
            "}
        );
    }

    #[test]
    fn suspend_and_resume_continue_the_same_line() {
        let mut output: Vec<u8> = vec![];

        let state = {
            let formatter = Formatter::new(&mut output, FormattingStyle::OneLine);
            let mut sf = formatter.push_syscall(7, SYS_ioctl).unwrap();
            sf.push_arg(b"fd: 3").unwrap();
            sf.push_arg(b"arg:").unwrap();
            sf.push_depth(b"{").unwrap();
            sf.push_arg(b"a: 1").unwrap();
            sf.suspend()
        };

        let formatter = Formatter::new(&mut output, FormattingStyle::OneLine);
        let mut sf = formatter.resume(state).unwrap();
        sf.push_arg(b"b: 2").unwrap();
        sf.pop_depth(b"}").unwrap();
        let _ = sf.finish(0, None).unwrap();

        assert_eq!(
            String::from_utf8_lossy(&output),
            "7 ioctl(fd: 3, arg: { a: 1, b: 2 }) = 0\n"
        );
    }

    #[test]
    fn interrupted_lines_are_resumed() {
        let mut output: Vec<u8> = vec![];

        let mut state = {
            let formatter = Formatter::new(&mut output, FormattingStyle::OneLine);
            let mut sf = formatter.push_syscall(7, SYS_ioctl).unwrap();
            sf.push_arg(b"fd: 3").unwrap();
            sf.suspend()
        };

        let mut formatter = Formatter::new(&mut output, FormattingStyle::OneLine);
        formatter.interrupt(&mut state).unwrap();
        assert!(state.is_interrupted());

        let mut sf = formatter.resume(state).unwrap();
        sf.push_arg(b"arg: 0x10").unwrap();
        let _ = sf.finish(-25, None).unwrap();

        assert_eq!(
            String::from_utf8_lossy(&output),
            "7 ioctl(fd: 3 <unfinished ...>\n7 <... ioctl resumed>, arg: 0x10) = -1 ENOTTY (Not a typewriter)\n"
        );
    }

    #[test]
    fn abandon_closes_open_brackets() {
        let mut output: Vec<u8> = vec![];

        let formatter = Formatter::new(&mut output, FormattingStyle::OneLine);
        let mut sf = formatter.push_syscall(7, SYS_ioctl).unwrap();
        sf.push_arg(b"arg:").unwrap();
        sf.push_depth(b"{").unwrap();
        sf.push_arg(b"ids:").unwrap();
        sf.push_depth(b"[").unwrap();
        sf.push_arg(b"1").unwrap();
        let _ = sf.abandon().unwrap();

        assert_eq!(
            String::from_utf8_lossy(&output),
            "7 ioctl(arg: { ids: [ 1 ] }) = ?\n"
        );
    }
}
