// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

syscall_table! {
    SYS_ioctl = 29 => "ioctl";
    SYS_prctl = 167 => "prctl";
    SYS_bind = 200 => "bind";
    SYS_accept = 202 => "accept";
    SYS_connect = 203 => "connect";
    SYS_getsockname = 204 => "getsockname";
    SYS_getpeername = 205 => "getpeername";
    SYS_sendto = 206 => "sendto";
    SYS_recvfrom = 207 => "recvfrom";
    SYS_accept4 = 242 => "accept4";
    SYS_kcmp = 272 => "kcmp";
    SYS_bpf = 280 => "bpf";
}
