// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{
    collections::HashMap,
    io::{BufRead as _, BufReader},
    process::{Child, Command, Stdio},
};

use assert_cmd::{assert::Assert, cargo::cargo_bin};
use predicates::prelude::*;

fn argus(args: &[&str]) -> Assert {
    let output = Command::new(cargo_bin("argus"))
        .args(args)
        .output()
        .unwrap();
    Assert::new(output)
}

#[test]
fn list_namespaces() {
    argus(&["list"])
        .success()
        .stdout(predicate::str::contains("bpf\n"))
        .stdout(predicate::str::contains("address-families\n"))
        .stdout(predicate::str::contains("kcmp\n"));
}

#[test]
fn list_prctl_options() {
    argus(&["list", "prctl"])
        .success()
        .stdout(predicate::str::contains("15\tPR_SET_NAME\n"))
        .stdout(predicate::str::contains("16\tPR_GET_NAME\n"));
}

#[test]
fn list_drm_requests_in_hex() {
    argus(&["list", "drm"])
        .success()
        .stdout(predicate::str::contains("\tDRM_IOCTL_VERSION\n"))
        .stdout(predicate::str::starts_with("0x"));
}

#[test]
fn list_unknown_namespace() {
    argus(&["list", "ioctls"]).failure();
}

#[test]
fn decode_needs_a_live_process() {
    argus(&["decode", "-p", "2147483647", "-s", "kcmp", "-a", "1,2,0,3,4"])
        .failure()
        .stderr(predicate::str::contains("No process with pid 2147483647"));
}

#[test]
fn decode_unknown_syscall_name() {
    let pid = std::process::id().to_string();
    argus(&["decode", "-p", &pid, "-s", "frobnicate"])
        .failure()
        .stderr(predicate::str::contains("Unknown syscall name: frobnicate"));
}

#[test]
fn decode_too_many_arguments() {
    let pid = std::process::id().to_string();
    argus(&["decode", "-p", &pid, "-s", "kcmp", "-a", "1,2,3,4,5,6,7"])
        .failure()
        .stderr(predicate::str::contains("at most 6 arguments"));
}

#[test]
fn decode_scalar_arguments() {
    // Nothing to read from memory, so any process will do.
    let pid = std::process::id();
    argus(&[
        "decode",
        "-p",
        &pid.to_string(),
        "-s",
        "kcmp",
        "-a",
        "100,200,0,3,4",
        "-r",
        "0",
    ])
    .success()
    .stdout(format!(
        "{pid} kcmp(pid1: 100, pid2: 200, type: KCMP_FILE, idx1: 3, idx2: 4) = 0\n"
    ));
}

#[test]
fn decode_without_return_value_is_unfinished() {
    let pid = std::process::id();
    argus(&[
        "decode",
        "-p",
        &pid.to_string(),
        "-s",
        "kcmp",
        "-a",
        "100,200,0,3,4",
    ])
    .success()
    .stdout(predicate::str::ends_with("idx2: 4 <unfinished ...>\n"));
}

/// A running test-helper and the addresses of the structures it laid out.
struct Helper {
    child: Child,
    addrs: HashMap<String, String>,
}

impl Helper {
    fn spawn(test_name: &str) -> Self {
        let mut child = Command::new(cargo_bin("test-helper"))
            .arg(test_name)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();

        let stdout = child.stdout.take().unwrap();
        let mut addrs = HashMap::new();
        for line in BufReader::new(stdout).lines() {
            let line = line.unwrap();
            if line == "ready" {
                break;
            }
            let (name, addr) = line.split_once('=').unwrap();
            addrs.insert(name.to_string(), addr.to_string());
        }

        Helper { child, addrs }
    }

    fn pid(&self) -> String {
        self.child.id().to_string()
    }

    fn addr(&self, name: &str) -> &str {
        &self.addrs[name]
    }
}

impl Drop for Helper {
    fn drop(&mut self) {
        // Closing stdin lets it exit.
        drop(self.child.stdin.take());
        let _ = self.child.wait();
    }
}

#[test]
#[ignore = "needs permission to read another process's memory"]
fn decode_live_structures() {
    let helper = Helper::spawn("structures");
    let pid = helper.pid();

    argus(&[
        "decode",
        "-p",
        &pid,
        "-s",
        "connect",
        "-a",
        &format!("3,{},16", helper.addr("sockaddr")),
        "-r",
        "0",
    ])
    .success()
    .stdout(predicate::str::contains(
        "addr: { family: AF_INET, sin_port: 8080, sin_addr: 127.0.0.1 }, addrlen: 16) = 0",
    ));

    argus(&[
        "decode",
        "-p",
        &pid,
        "-s",
        "prctl",
        "-a",
        &format!("15,{}", helper.addr("name")),
        "-r",
        "0",
    ])
    .success()
    .stdout(predicate::str::contains(
        "prctl(option: PR_SET_NAME, name: \"argus_helper\") = 0",
    ));

    argus(&[
        "decode",
        "-p",
        &pid,
        "-s",
        "kcmp",
        "-a",
        &format!("{pid},{pid},7,3,{}", helper.addr("slot")),
        "-r",
        "0",
    ])
    .success()
    .stdout(predicate::str::contains(
        "idx2: { efd: 4, tfd: 5, toff: 0 }) = 0",
    ));

    argus(&[
        "decode",
        "-p",
        &pid,
        "-s",
        "accept",
        "-a",
        &format!("3,{},{}", helper.addr("sockaddr"), helper.addr("addrlen")),
        "-r",
        "5",
    ])
    .success()
    .stdout(predicate::str::contains("addrlen: [16]) = 5 (fd)"));
}
