// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use clap::ValueEnum;

use crate::formatting::FormattingStyle;

/// How symbolic constants are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum XlatStyle {
    /// `BPF_MAP_CREATE`
    #[default]
    Abbrev,
    /// `0`
    Raw,
    /// `0 /* BPF_MAP_CREATE */`
    Verbose,
}

#[derive(Clone, Debug)]
pub struct DecodeConfig {
    pub style: FormattingStyle,
    /// Elements printed per array before `...`. `None` leaves only the
    /// walker's own ceiling in place.
    pub max_array_elems: Option<usize>,
    /// Bytes printed per string or raw payload before `...`.
    pub max_string_len: usize,
    pub xlat_style: XlatStyle,
}

pub const DEFAULT_ARRAY_ELEMS: usize = 32;
pub const DEFAULT_STRING_LEN: usize = 32;

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            style: FormattingStyle::OneLine,
            max_array_elems: Some(DEFAULT_ARRAY_ELEMS),
            max_string_len: DEFAULT_STRING_LEN,
            xlat_style: XlatStyle::Abbrev,
        }
    }
}

impl DecodeConfig {
    pub fn with_style(mut self, style: FormattingStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_xlat_style(mut self, xlat_style: XlatStyle) -> Self {
        self.xlat_style = xlat_style;
        self
    }

    pub fn with_array_limit(mut self, limit: Option<usize>) -> Self {
        self.max_array_elems = limit;
        self
    }

    pub fn with_string_limit(mut self, limit: usize) -> Self {
        self.max_string_len = limit;
        self
    }

    /// Print every element an array claims to have, up to the walker ceiling.
    pub fn verbose(self) -> Self {
        self.with_array_limit(None)
    }
}
