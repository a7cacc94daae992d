// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

syscall_table! {
    SYS_ioctl = 16 => "ioctl";
    SYS_connect = 42 => "connect";
    SYS_accept = 43 => "accept";
    SYS_sendto = 44 => "sendto";
    SYS_recvfrom = 45 => "recvfrom";
    SYS_bind = 49 => "bind";
    SYS_getsockname = 51 => "getsockname";
    SYS_getpeername = 52 => "getpeername";
    SYS_prctl = 157 => "prctl";
    SYS_accept4 = 288 => "accept4";
    SYS_kcmp = 312 => "kcmp";
    SYS_bpf = 321 => "bpf";
}
