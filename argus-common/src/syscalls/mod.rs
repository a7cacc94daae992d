// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

macro_rules! syscall_table {
    ($($name:ident = $nr:expr => $label:literal;)*) => {
        $(
            #[allow(non_upper_case_globals)]
            pub const $name: i64 = $nr;
        )*

        /// Every syscall the decoders know by name, in table order.
        pub const ALL_SYSCALLS: &[(i64, &str)] = &[
            $(($nr, $label),)*
        ];
    };
}

#[cfg(aarch64)]
mod aarch64;
#[cfg(aarch64)]
pub use aarch64::*;

#[cfg(x86_64)]
mod x86_64;
#[cfg(x86_64)]
pub use x86_64::*;

#[cfg(not(any(aarch64, x86_64)))]
compile_error!("Unsupported architecture. Currently only aarch64 and x86_64 are supported.");

pub fn syscall_name_from_nr(nr: i64) -> Option<&'static str> {
    ALL_SYSCALLS
        .iter()
        .find(|(known, _)| *known == nr)
        .map(|(_, name)| *name)
}

pub fn syscall_nr_from_name(name: &str) -> Option<i64> {
    ALL_SYSCALLS
        .iter()
        .find(|(_, known)| *known == name)
        .map(|(nr, _)| *nr)
}
