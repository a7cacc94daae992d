// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

#![allow(non_snake_case, non_upper_case_globals)]

pub mod config;
pub mod decoders;
pub mod dispatch;
pub mod error;
pub mod format_helpers;
pub mod formatting;
pub mod layout;
pub mod mem;
pub mod scratch;
pub mod session;
pub mod state;
pub mod walker;
pub mod xlat;

#[cfg(test)]
mod tests;
