// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

fn main() {
    println!("cargo::rustc-check-cfg=cfg(aarch64)");
    println!("cargo::rustc-check-cfg=cfg(x86_64)");
    println!("cargo::rerun-if-changed=build.rs");

    // Syscall numbers follow the target, not the machine running the build.
    match std::env::var("CARGO_CFG_TARGET_ARCH").as_deref() {
        Ok("aarch64") => println!("cargo::rustc-cfg=aarch64"),
        Ok("x86_64") => println!("cargo::rustc-cfg=x86_64"),
        Ok(other) => panic!("Unsupported target architecture {other}. Only aarch64 and x86_64 are supported."),
        Err(e) => panic!("CARGO_CFG_TARGET_ARCH is not set: {e}"),
    }
}
