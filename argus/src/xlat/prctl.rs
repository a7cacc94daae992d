// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use super::Xlat;

pub const PR_SET_MM_OPTIONS: Xlat = &[
    (1, "PR_SET_MM_START_CODE"),
    (2, "PR_SET_MM_END_CODE"),
    (3, "PR_SET_MM_START_DATA"),
    (4, "PR_SET_MM_END_DATA"),
    (5, "PR_SET_MM_START_STACK"),
    (6, "PR_SET_MM_START_BRK"),
    (7, "PR_SET_MM_BRK"),
    (8, "PR_SET_MM_ARG_START"),
    (9, "PR_SET_MM_ARG_END"),
    (10, "PR_SET_MM_ENV_START"),
    (11, "PR_SET_MM_ENV_END"),
    (12, "PR_SET_MM_AUXV"),
    (13, "PR_SET_MM_EXE_FILE"),
    (14, "PR_SET_MM_MAP"),
    (15, "PR_SET_MM_MAP_SIZE"),
];

pub const PR_CAP_AMBIENT_OPS: Xlat = &[
    (1, "PR_CAP_AMBIENT_IS_SET"),
    (2, "PR_CAP_AMBIENT_RAISE"),
    (3, "PR_CAP_AMBIENT_LOWER"),
    (4, "PR_CAP_AMBIENT_CLEAR_ALL"),
];

pub const PR_SPEC_MISFEATURES: Xlat = &[
    (0, "PR_SPEC_STORE_BYPASS"),
    (1, "PR_SPEC_INDIRECT_BRANCH"),
    (2, "PR_SPEC_L1D_FLUSH"),
];

pub const PR_SPEC_STATES: Xlat = &[
    (1 << 0, "PR_SPEC_PRCTL"),
    (1 << 1, "PR_SPEC_ENABLE"),
    (1 << 2, "PR_SPEC_DISABLE"),
    (1 << 3, "PR_SPEC_FORCE_DISABLE"),
    (1 << 4, "PR_SPEC_DISABLE_NOEXEC"),
];

pub const PR_MCE_KILL_OPS: Xlat = &[(0, "PR_MCE_KILL_CLEAR"), (1, "PR_MCE_KILL_SET")];

pub const PR_MCE_KILL_POLICIES: Xlat = &[
    (0, "PR_MCE_KILL_LATE"),
    (1, "PR_MCE_KILL_EARLY"),
    (2, "PR_MCE_KILL_DEFAULT"),
];

pub const SECCOMP_MODES: Xlat = &[
    (0, "SECCOMP_MODE_DISABLED"),
    (1, "SECCOMP_MODE_STRICT"),
    (2, "SECCOMP_MODE_FILTER"),
];

pub const PR_DUMPABLE: Xlat = &[
    (0, "SUID_DUMP_DISABLE"),
    (1, "SUID_DUMP_USER"),
    (2, "SUID_DUMP_ROOT"),
];

pub const PR_TSC_MODES: Xlat = &[(1, "PR_TSC_ENABLE"), (2, "PR_TSC_SIGSEGV")];

pub const PR_UNALIGN_FLAGS: Xlat = &[(1, "PR_UNALIGN_NOPRINT"), (2, "PR_UNALIGN_SIGBUS")];

pub const PR_FP_MODES: Xlat = &[(1 << 0, "PR_FP_MODE_FR"), (1 << 1, "PR_FP_MODE_FRE")];

pub const PR_ENDIAN_MODES: Xlat = &[
    (0, "PR_ENDIAN_BIG"),
    (1, "PR_ENDIAN_LITTLE"),
    (2, "PR_ENDIAN_PPC_LITTLE"),
];

pub const PR_TIMING_MODES: Xlat = &[(0, "PR_TIMING_STATISTICAL"), (1, "PR_TIMING_TIMESTAMP")];

pub const SECUREBITS: Xlat = &[
    (1 << 0, "SECBIT_NOROOT"),
    (1 << 1, "SECBIT_NOROOT_LOCKED"),
    (1 << 2, "SECBIT_NO_SETUID_FIXUP"),
    (1 << 3, "SECBIT_NO_SETUID_FIXUP_LOCKED"),
    (1 << 4, "SECBIT_KEEP_CAPS"),
    (1 << 5, "SECBIT_KEEP_CAPS_LOCKED"),
    (1 << 6, "SECBIT_NO_CAP_AMBIENT_RAISE"),
    (1 << 7, "SECBIT_NO_CAP_AMBIENT_RAISE_LOCKED"),
    (1 << 8, "SECBIT_EXEC_RESTRICT_FILE"),
    (1 << 9, "SECBIT_EXEC_RESTRICT_FILE_LOCKED"),
    (1 << 10, "SECBIT_EXEC_DENY_INTERACTIVE"),
    (1 << 11, "SECBIT_EXEC_DENY_INTERACTIVE_LOCKED"),
];

pub const PR_SCHED_CORE_CMDS: Xlat = &[
    (0, "PR_SCHED_CORE_GET"),
    (1, "PR_SCHED_CORE_CREATE"),
    (2, "PR_SCHED_CORE_SHARE_TO"),
    (3, "PR_SCHED_CORE_SHARE_FROM"),
];

pub const PR_SCHED_CORE_SCOPES: Xlat = &[
    (0, "PR_SCHED_CORE_SCOPE_THREAD"),
    (1, "PR_SCHED_CORE_SCOPE_THREAD_GROUP"),
    (2, "PR_SCHED_CORE_SCOPE_PROCESS_GROUP"),
];

pub const PR_MDWE_FLAGS: Xlat = &[(1 << 0, "PR_MDWE_REFUSE_EXEC_GAIN"), (1 << 1, "PR_MDWE_NO_INHERIT")];

pub const PR_SYS_DISPATCH_MODES: Xlat = &[(0, "PR_SYS_DISPATCH_OFF"), (1, "PR_SYS_DISPATCH_ON")];

pub const PR_SET_VMA_OPTIONS: Xlat = &[(0, "PR_SET_VMA_ANON_NAME")];

pub const PR_TAGGED_ADDR_FLAGS: Xlat = &[(1 << 0, "PR_TAGGED_ADDR_ENABLE")];

pub const PR_SVE_VL_FLAGS: Xlat = &[
    (1 << 17, "PR_SVE_SET_VL_ONEXEC"),
    (1 << 18, "PR_SVE_VL_INHERIT"),
];

pub const PR_PAC_KEYS: Xlat = &[
    (1 << 0, "PR_PAC_APIAKEY"),
    (1 << 1, "PR_PAC_APIBKEY"),
    (1 << 2, "PR_PAC_APDAKEY"),
    (1 << 3, "PR_PAC_APDBKEY"),
    (1 << 4, "PR_PAC_APGAKEY"),
];
