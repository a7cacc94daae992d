// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{io::Write as _, path::Path};

use anyhow::{bail, Result};
use argus::{
    config::{DecodeConfig, XlatStyle, DEFAULT_STRING_LEN},
    dispatch::{known_commands, Namespace},
    formatting::FormattingStyle,
    mem::ProcessMemory,
    session::Session,
    state::RawCall,
};
use argus_common::syscalls::syscall_nr_from_name;
use clap::{Parser, Subcommand, ValueEnum as _};
use log::debug;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one call against the memory of a running process
    Decode(DecodeArgs),
    /// Print the known commands of a namespace, or the namespaces themselves
    List {
        #[arg(value_enum)]
        namespace: Option<Namespace>,
    },
}

#[derive(clap::Args, Debug)]
struct DecodeArgs {
    /// Process whose memory the arguments point into
    #[arg(short = 'p', long)]
    pid: i32,

    /// Syscall name or number
    #[arg(short = 's', long)]
    syscall: String,

    /// Raw argument words, decimal or 0x-prefixed hex (up to six)
    #[arg(short = 'a', long, value_delimiter = ',', allow_hyphen_values = true, value_parser = parse_word)]
    args: Vec<u64>,

    /// Return value; renders the exit phase as well
    #[arg(short = 'r', long, allow_hyphen_values = true)]
    retval: Option<i64>,

    // Formatting style, `one-line` or `multi-line`
    #[arg(long = "format", value_enum, default_value_t = FormattingStyle::default())]
    style: FormattingStyle,

    /// Print every array element, up to the hard ceiling
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Array elements printed before `...`
    #[arg(long, conflicts_with = "verbose")]
    array_limit: Option<usize>,

    /// String bytes printed before `...`
    #[arg(long, default_value_t = DEFAULT_STRING_LEN)]
    string_limit: usize,

    /// How symbolic constants are shown
    #[arg(long, value_enum, default_value_t = XlatStyle::default())]
    xlat: XlatStyle,
}

fn parse_word(s: &str) -> Result<u64, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else if s.starts_with('-') {
        s.parse::<i64>().map(|v| v as u64).map_err(|e| e.to_string())
    } else {
        s.parse::<u64>().map_err(|e| e.to_string())
    };
    parsed.map_err(|e| format!("invalid argument word '{s}': {e}"))
}

fn parse_syscall(name: &str) -> Result<i64> {
    if let Some(nr) = syscall_nr_from_name(name) {
        return Ok(nr);
    }
    match name.parse::<i64>() {
        Ok(nr) => Ok(nr),
        Err(_) => bail!("Unknown syscall name: {name}"),
    }
}

fn decode(args: DecodeArgs) -> Result<()> {
    if !Path::new(&format!("/proc/{}", args.pid)).exists() {
        bail!("No process with pid {}", args.pid);
    }
    if args.args.len() > 6 {
        bail!("A syscall takes at most 6 arguments, got {}", args.args.len());
    }

    let nr = parse_syscall(&args.syscall)?;
    let mut words = [0u64; 6];
    words[..args.args.len()].copy_from_slice(&args.args);

    let mut config = DecodeConfig::default()
        .with_style(args.style)
        .with_xlat_style(args.xlat)
        .with_string_limit(args.string_limit);
    if args.verbose {
        config = config.verbose();
    } else if let Some(limit) = args.array_limit {
        config = config.with_array_limit(Some(limit));
    }
    debug!("decoding syscall {nr} for {} with {config:?}", args.pid);

    let mem = ProcessMemory::new(args.pid);
    let mut session = Session::new(config);
    let tid = args.pid as u32;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    session.on_entry(&mem, &mut out, tid, RawCall::new(nr, words))?;
    match args.retval {
        Some(retval) => session.on_exit(&mem, &mut out, tid, retval)?,
        None => session.interrupt_open_line(&mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn list(namespace: Option<Namespace>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let Some(namespace) = namespace else {
        for namespace in Namespace::value_variants() {
            if let Some(value) = namespace.to_possible_value() {
                writeln!(out, "{}", value.get_name())?;
            }
        }
        return Ok(());
    };

    let hex = matches!(
        namespace,
        Namespace::Btrfs | Namespace::Drm | Namespace::Evdev | Namespace::Sock
    );
    for (code, name) in known_commands(namespace) {
        if hex {
            writeln!(out, "0x{code:x}\t{name}")?;
        } else {
            writeln!(out, "{code}\t{name}")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Command::Decode(args) => decode(args),
        Command::List { namespace } => list(namespace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_words() {
        assert_eq!(parse_word("0x10"), Ok(16));
        assert_eq!(parse_word("42"), Ok(42));
        assert_eq!(parse_word("-1"), Ok(u64::MAX));
        assert!(parse_word("banana").is_err());
    }
}
