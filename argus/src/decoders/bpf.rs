// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! `bpf(cmd, attr, size)`: one view of `union bpf_attr` per command.

use std::mem::{offset_of, size_of};

use anyhow::Result;
use argus_common::{kernel_types::bpf::*, raw::RawStruct, PAGE_SIZE};
use bytes::Bytes;
use log::trace;

use crate::{
    arg, argf,
    config::XlatStyle,
    decoders::render_string_ptr,
    dispatch::{command_enum, DecodeContext, DecodeStatus},
    field,
    format_helpers::{format_addr, ReturnKind},
    formatting::SyscallFormatter,
    layout::{
        fetch_or_print, print_all_fields, print_entry_fields, print_exit_fields, print_field,
        print_field_diff, print_saved_fields, refetch, Dir, Field, FieldKind, Layout, Snapshot,
    },
    scratch::ScratchPurpose,
    state::Occurrence,
    walker::{print_array, print_u32_elem, print_x64_elem},
    with_struct,
    xlat::{bpf::*, format_named, lookup},
};

command_enum! {
    pub enum BpfCommand: u32 {
        MapCreate = BPF_MAP_CREATE => "BPF_MAP_CREATE",
        MapLookupElem = BPF_MAP_LOOKUP_ELEM => "BPF_MAP_LOOKUP_ELEM",
        MapUpdateElem = BPF_MAP_UPDATE_ELEM => "BPF_MAP_UPDATE_ELEM",
        MapDeleteElem = BPF_MAP_DELETE_ELEM => "BPF_MAP_DELETE_ELEM",
        MapGetNextKey = BPF_MAP_GET_NEXT_KEY => "BPF_MAP_GET_NEXT_KEY",
        ProgLoad = BPF_PROG_LOAD => "BPF_PROG_LOAD",
        ObjPin = BPF_OBJ_PIN => "BPF_OBJ_PIN",
        ObjGet = BPF_OBJ_GET => "BPF_OBJ_GET",
        ProgAttach = BPF_PROG_ATTACH => "BPF_PROG_ATTACH",
        ProgDetach = BPF_PROG_DETACH => "BPF_PROG_DETACH",
        ProgTestRun = BPF_PROG_TEST_RUN => "BPF_PROG_TEST_RUN",
        ProgGetNextId = BPF_PROG_GET_NEXT_ID => "BPF_PROG_GET_NEXT_ID",
        MapGetNextId = BPF_MAP_GET_NEXT_ID => "BPF_MAP_GET_NEXT_ID",
        ProgGetFdById = BPF_PROG_GET_FD_BY_ID => "BPF_PROG_GET_FD_BY_ID",
        MapGetFdById = BPF_MAP_GET_FD_BY_ID => "BPF_MAP_GET_FD_BY_ID",
        ObjGetInfoByFd = BPF_OBJ_GET_INFO_BY_FD => "BPF_OBJ_GET_INFO_BY_FD",
        ProgQuery = BPF_PROG_QUERY => "BPF_PROG_QUERY",
        RawTracepointOpen = BPF_RAW_TRACEPOINT_OPEN => "BPF_RAW_TRACEPOINT_OPEN",
        BtfLoad = BPF_BTF_LOAD => "BPF_BTF_LOAD",
        BtfGetFdById = BPF_BTF_GET_FD_BY_ID => "BPF_BTF_GET_FD_BY_ID",
        TaskFdQuery = BPF_TASK_FD_QUERY => "BPF_TASK_FD_QUERY",
        MapLookupAndDeleteElem = BPF_MAP_LOOKUP_AND_DELETE_ELEM => "BPF_MAP_LOOKUP_AND_DELETE_ELEM",
        MapFreeze = BPF_MAP_FREEZE => "BPF_MAP_FREEZE",
        BtfGetNextId = BPF_BTF_GET_NEXT_ID => "BPF_BTF_GET_NEXT_ID",
        MapLookupBatch = BPF_MAP_LOOKUP_BATCH => "BPF_MAP_LOOKUP_BATCH",
        MapLookupAndDeleteBatch = BPF_MAP_LOOKUP_AND_DELETE_BATCH => "BPF_MAP_LOOKUP_AND_DELETE_BATCH",
        MapUpdateBatch = BPF_MAP_UPDATE_BATCH => "BPF_MAP_UPDATE_BATCH",
        MapDeleteBatch = BPF_MAP_DELETE_BATCH => "BPF_MAP_DELETE_BATCH",
        LinkCreate = BPF_LINK_CREATE => "BPF_LINK_CREATE",
        LinkUpdate = BPF_LINK_UPDATE => "BPF_LINK_UPDATE",
        LinkGetFdById = BPF_LINK_GET_FD_BY_ID => "BPF_LINK_GET_FD_BY_ID",
        LinkGetNextId = BPF_LINK_GET_NEXT_ID => "BPF_LINK_GET_NEXT_ID",
        EnableStats = BPF_ENABLE_STATS => "BPF_ENABLE_STATS",
        IterCreate = BPF_ITER_CREATE => "BPF_ITER_CREATE",
        LinkDetach = BPF_LINK_DETACH => "BPF_LINK_DETACH",
        ProgBindMap = BPF_PROG_BIND_MAP => "BPF_PROG_BIND_MAP",
    }
}

fn render_kern_version(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    let version = raw.u32(0);
    if version == 0 {
        return "0".to_string();
    }
    format!(
        "KERNEL_VERSION({}, {}, {})",
        version >> 16,
        (version >> 8) & 0xff,
        version & 0xff
    )
}

const STRING_PTR: FieldKind = FieldKind::Custom(8, render_string_ptr);

pub static MAP_CREATE: Layout = Layout {
    name: "bpf_map_create_attr",
    size: size_of::<BpfMapCreateAttr>(),
    fields: &[
        field!(BpfMapCreateAttr, map_type, In, FieldKind::Xval32(BPF_MAP_TYPES)),
        field!(BpfMapCreateAttr, key_size, In, FieldKind::U32),
        field!(BpfMapCreateAttr, value_size, In, FieldKind::U32),
        field!(BpfMapCreateAttr, max_entries, In, FieldKind::U32),
        field!(BpfMapCreateAttr, map_flags, In, FieldKind::Flags32(BPF_MAP_CREATE_FLAGS)),
        field!(BpfMapCreateAttr, inner_map_fd, In, FieldKind::Fd),
        field!(BpfMapCreateAttr, numa_node, In, FieldKind::I32),
        field!(BpfMapCreateAttr, map_name, In, FieldKind::CStr(BPF_OBJ_NAME_LEN)),
        field!(BpfMapCreateAttr, map_ifindex, In, FieldKind::U32),
        field!(BpfMapCreateAttr, btf_fd, In, FieldKind::Fd),
        field!(BpfMapCreateAttr, btf_key_type_id, In, FieldKind::U32),
        field!(BpfMapCreateAttr, btf_value_type_id, In, FieldKind::U32),
        field!(BpfMapCreateAttr, btf_vmlinux_value_type_id, In, FieldKind::U32),
        field!(BpfMapCreateAttr, map_extra, In, FieldKind::X64),
        field!(BpfMapCreateAttr, value_type_btf_obj_fd, In, FieldKind::Fd),
        field!(BpfMapCreateAttr, map_token_fd, In, FieldKind::Fd),
    ],
};

pub static MAP_ELEM: Layout = Layout {
    name: "bpf_map_elem_attr",
    size: size_of::<BpfMapElemAttr>(),
    fields: &[
        field!(BpfMapElemAttr, map_fd, In, FieldKind::Fd),
        field!(BpfMapElemAttr, key, In, FieldKind::Addr),
        field!(BpfMapElemAttr, value, In, FieldKind::Addr),
        field!(BpfMapElemAttr, flags, In, FieldKind::Flags64(BPF_MAP_UPDATE_FLAGS)),
    ],
};

pub static MAP_DELETE_ELEM: Layout = Layout {
    name: "bpf_map_delete_elem_attr",
    size: size_of::<BpfMapElemAttr>(),
    fields: &[
        field!(BpfMapElemAttr, map_fd, In, FieldKind::Fd),
        field!(BpfMapElemAttr, key, In, FieldKind::Addr),
        field!(BpfMapElemAttr, flags, In, FieldKind::Flags64(BPF_MAP_UPDATE_FLAGS)),
    ],
};

pub static MAP_NEXT_KEY: Layout = Layout {
    name: "bpf_map_next_key_attr",
    size: size_of::<BpfMapElemAttr>(),
    fields: &[
        field!(BpfMapElemAttr, map_fd, In, FieldKind::Fd),
        field!(BpfMapElemAttr, key, In, FieldKind::Addr),
        field!("next_key", BpfMapElemAttr, value, In, FieldKind::Addr),
    ],
};

pub static MAP_FD_ONLY: Layout = Layout {
    name: "bpf_map_freeze_attr",
    size: 4,
    fields: &[field!(BpfMapElemAttr, map_fd, In, FieldKind::Fd)],
};

pub static PROG_LOAD_HEAD: Layout = Layout {
    name: "bpf_prog_load_attr",
    size: size_of::<BpfProgLoadAttr>(),
    fields: &[
        field!(BpfProgLoadAttr, prog_type, In, FieldKind::Xval32(BPF_PROG_TYPES)),
        field!(BpfProgLoadAttr, insn_cnt, In, FieldKind::U32),
    ],
};

pub static PROG_LOAD_TAIL: Layout = Layout {
    name: "bpf_prog_load_attr",
    size: size_of::<BpfProgLoadAttr>(),
    fields: &[
        field!(BpfProgLoadAttr, log_level, In, FieldKind::U32),
        field!(BpfProgLoadAttr, log_size, In, FieldKind::U32),
        field!(BpfProgLoadAttr, log_buf, In, FieldKind::Addr),
        field!(BpfProgLoadAttr, kern_version, In, FieldKind::Custom(4, render_kern_version)),
        field!(BpfProgLoadAttr, prog_flags, In, FieldKind::Flags32(BPF_PROG_LOAD_FLAGS)),
        field!(BpfProgLoadAttr, prog_name, In, FieldKind::CStr(BPF_OBJ_NAME_LEN)),
        field!(BpfProgLoadAttr, prog_ifindex, In, FieldKind::U32),
        field!(BpfProgLoadAttr, expected_attach_type, In, FieldKind::Xval32(BPF_ATTACH_TYPES)),
        field!(BpfProgLoadAttr, prog_btf_fd, In, FieldKind::Fd),
        field!(BpfProgLoadAttr, func_info_rec_size, In, FieldKind::U32),
        field!(BpfProgLoadAttr, func_info, In, FieldKind::Addr),
        field!(BpfProgLoadAttr, func_info_cnt, In, FieldKind::U32),
        field!(BpfProgLoadAttr, line_info_rec_size, In, FieldKind::U32),
        field!(BpfProgLoadAttr, line_info, In, FieldKind::Addr),
        field!(BpfProgLoadAttr, line_info_cnt, In, FieldKind::U32),
        field!(BpfProgLoadAttr, attach_btf_id, In, FieldKind::U32),
        field!(BpfProgLoadAttr, attach_prog_fd, In, FieldKind::Fd),
        field!(BpfProgLoadAttr, core_relo_cnt, In, FieldKind::U32),
        field!(BpfProgLoadAttr, fd_array, In, FieldKind::Addr),
        field!(BpfProgLoadAttr, core_relos, In, FieldKind::Addr),
        field!(BpfProgLoadAttr, core_relo_rec_size, In, FieldKind::U32),
        field!(BpfProgLoadAttr, log_true_size, InOut, FieldKind::U32),
        field!(BpfProgLoadAttr, prog_token_fd, In, FieldKind::Fd),
        field!(BpfProgLoadAttr, fd_array_cnt, In, FieldKind::U32),
    ],
};

pub static OBJ: Layout = Layout {
    name: "bpf_obj_attr",
    size: size_of::<BpfObjAttr>(),
    fields: &[
        field!(BpfObjAttr, pathname, In, STRING_PTR),
        field!(BpfObjAttr, bpf_fd, In, FieldKind::Fd),
        field!(BpfObjAttr, file_flags, In, FieldKind::Flags32(BPF_FILE_FLAGS)),
        field!(BpfObjAttr, path_fd, In, FieldKind::Fd),
    ],
};

pub static PROG_ATTACH: Layout = Layout {
    name: "bpf_prog_attach_attr",
    size: size_of::<BpfProgAttachAttr>(),
    fields: &[
        field!(BpfProgAttachAttr, target_fd, In, FieldKind::Fd),
        field!(BpfProgAttachAttr, attach_bpf_fd, In, FieldKind::Fd),
        field!(BpfProgAttachAttr, attach_type, In, FieldKind::Xval32(BPF_ATTACH_TYPES)),
        field!(BpfProgAttachAttr, attach_flags, In, FieldKind::Flags32(BPF_ATTACH_FLAGS)),
        field!(BpfProgAttachAttr, replace_bpf_fd, In, FieldKind::Fd),
        field!(BpfProgAttachAttr, relative_fd, In, FieldKind::Fd),
        field!(BpfProgAttachAttr, expected_revision, In, FieldKind::U64),
    ],
};

pub static PROG_TEST_RUN: Layout = Layout {
    name: "bpf_prog_test_run_attr",
    size: size_of::<BpfProgTestRunAttr>(),
    fields: &[
        field!(BpfProgTestRunAttr, prog_fd, In, FieldKind::Fd),
        field!(BpfProgTestRunAttr, retval, Out, FieldKind::U32),
        field!(BpfProgTestRunAttr, data_size_in, In, FieldKind::U32),
        field!(BpfProgTestRunAttr, data_size_out, InOut, FieldKind::U32),
        field!(BpfProgTestRunAttr, data_in, In, FieldKind::Addr),
        field!(BpfProgTestRunAttr, data_out, In, FieldKind::Addr),
        field!(BpfProgTestRunAttr, repeat, In, FieldKind::U32),
        field!(BpfProgTestRunAttr, duration, Out, FieldKind::U32),
        field!(BpfProgTestRunAttr, ctx_size_in, In, FieldKind::U32),
        field!(BpfProgTestRunAttr, ctx_size_out, InOut, FieldKind::U32),
        field!(BpfProgTestRunAttr, ctx_in, In, FieldKind::Addr),
        field!(BpfProgTestRunAttr, ctx_out, In, FieldKind::Addr),
        field!(BpfProgTestRunAttr, flags, In, FieldKind::Flags32(BPF_TEST_RUN_FLAGS)),
        field!(BpfProgTestRunAttr, cpu, In, FieldKind::U32),
        field!(BpfProgTestRunAttr, batch_size, In, FieldKind::U32),
    ],
};

pub static GET_NEXT_ID: Layout = Layout {
    name: "bpf_get_next_id_attr",
    size: 8,
    fields: &[
        field!("start_id", BpfIdAttr, id, In, FieldKind::U32),
        field!(BpfIdAttr, next_id, Out, FieldKind::U32),
    ],
};

macro_rules! fd_by_id_layout {
    ($static:ident, $id:literal) => {
        pub static $static: Layout = Layout {
            name: "bpf_get_fd_by_id_attr",
            size: size_of::<BpfIdAttr>(),
            fields: &[
                field!($id, BpfIdAttr, id, In, FieldKind::U32),
                field!(BpfIdAttr, open_flags, In, FieldKind::Flags32(BPF_FILE_FLAGS)),
            ],
        };
    };
}

fd_by_id_layout!(PROG_GET_FD_BY_ID, "prog_id");
fd_by_id_layout!(MAP_GET_FD_BY_ID, "map_id");
fd_by_id_layout!(BTF_GET_FD_BY_ID, "btf_id");
fd_by_id_layout!(LINK_GET_FD_BY_ID, "link_id");

pub static INFO_BY_FD: Layout = Layout {
    name: "bpf_obj_get_info_by_fd_attr",
    size: size_of::<BpfInfoByFdAttr>(),
    fields: &[
        field!(BpfInfoByFdAttr, bpf_fd, In, FieldKind::Fd),
        field!(BpfInfoByFdAttr, info_len, InOut, FieldKind::U32),
    ],
};

pub static PROG_QUERY_HEAD: Layout = Layout {
    name: "bpf_prog_query_attr",
    size: size_of::<BpfProgQueryAttr>(),
    fields: &[
        field!(BpfProgQueryAttr, target_fd, In, FieldKind::Fd),
        field!(BpfProgQueryAttr, attach_type, In, FieldKind::Xval32(BPF_ATTACH_TYPES)),
        field!(BpfProgQueryAttr, query_flags, In, FieldKind::Flags32(BPF_QUERY_FLAGS)),
        field!(BpfProgQueryAttr, attach_flags, Out, FieldKind::Flags32(BPF_ATTACH_FLAGS)),
    ],
};

static PROG_CNT: Field = field!(BpfProgQueryAttr, prog_cnt, InOut, FieldKind::U32);

pub static PROG_QUERY_TAIL: Layout = Layout {
    name: "bpf_prog_query_attr",
    size: size_of::<BpfProgQueryAttr>(),
    fields: &[
        field!(BpfProgQueryAttr, prog_attach_flags, Out, FieldKind::Addr),
        field!(BpfProgQueryAttr, link_ids, Out, FieldKind::Addr),
        field!(BpfProgQueryAttr, link_attach_flags, Out, FieldKind::Addr),
        field!(BpfProgQueryAttr, revision, Out, FieldKind::U64),
    ],
};

pub static RAW_TRACEPOINT_OPEN: Layout = Layout {
    name: "bpf_raw_tracepoint_open_attr",
    size: size_of::<BpfRawTracepointAttr>(),
    fields: &[
        field!(BpfRawTracepointAttr, name, In, STRING_PTR),
        field!(BpfRawTracepointAttr, prog_fd, In, FieldKind::Fd),
        field!(BpfRawTracepointAttr, cookie, In, FieldKind::X64),
    ],
};

pub static BTF_LOAD: Layout = Layout {
    name: "bpf_btf_load_attr",
    size: size_of::<BpfBtfLoadAttr>(),
    fields: &[
        field!(BpfBtfLoadAttr, btf, In, FieldKind::Addr),
        field!(BpfBtfLoadAttr, btf_log_buf, In, FieldKind::Addr),
        field!(BpfBtfLoadAttr, btf_size, In, FieldKind::U32),
        field!(BpfBtfLoadAttr, btf_log_size, In, FieldKind::U32),
        field!(BpfBtfLoadAttr, btf_log_level, In, FieldKind::U32),
        field!(BpfBtfLoadAttr, btf_log_true_size, InOut, FieldKind::U32),
        field!(BpfBtfLoadAttr, btf_flags, In, FieldKind::X32),
        field!(BpfBtfLoadAttr, btf_token_fd, In, FieldKind::Fd),
    ],
};

pub static TASK_FD_QUERY: Layout = Layout {
    name: "bpf_task_fd_query_attr",
    size: size_of::<BpfTaskFdQueryAttr>(),
    fields: &[
        field!(BpfTaskFdQueryAttr, pid, In, FieldKind::U32),
        field!(BpfTaskFdQueryAttr, fd, In, FieldKind::Fd),
        field!(BpfTaskFdQueryAttr, flags, In, FieldKind::X32),
        field!(BpfTaskFdQueryAttr, buf_len, InOut, FieldKind::U32),
        field!(BpfTaskFdQueryAttr, buf, Out, STRING_PTR),
        field!(BpfTaskFdQueryAttr, prog_id, Out, FieldKind::U32),
        field!(BpfTaskFdQueryAttr, fd_type, Out, FieldKind::Xval32(BPF_TASK_FD_TYPES)),
        field!(BpfTaskFdQueryAttr, probe_offset, Out, FieldKind::X64),
        field!(BpfTaskFdQueryAttr, probe_addr, Out, FieldKind::X64),
    ],
};

pub static MAP_BATCH: Layout = Layout {
    name: "bpf_map_batch_attr",
    size: size_of::<BpfBatchAttr>(),
    fields: &[
        field!(BpfBatchAttr, in_batch, In, FieldKind::Addr),
        field!(BpfBatchAttr, out_batch, In, FieldKind::Addr),
        field!(BpfBatchAttr, keys, In, FieldKind::Addr),
        field!(BpfBatchAttr, values, In, FieldKind::Addr),
        field!(BpfBatchAttr, count, InOut, FieldKind::U32),
        field!(BpfBatchAttr, map_fd, In, FieldKind::Fd),
        field!(BpfBatchAttr, elem_flags, In, FieldKind::Flags64(BPF_MAP_UPDATE_FLAGS)),
        field!(BpfBatchAttr, flags, In, FieldKind::X64),
    ],
};

pub static LINK_CREATE_HEAD: Layout = Layout {
    name: "bpf_link_create_attr",
    size: size_of::<BpfLinkCreateAttr>(),
    fields: &[
        field!(BpfLinkCreateAttr, prog_fd, In, FieldKind::Fd),
        field!(BpfLinkCreateAttr, target_fd, In, FieldKind::Fd),
        field!(BpfLinkCreateAttr, attach_type, In, FieldKind::Xval32(BPF_ATTACH_TYPES)),
        field!(BpfLinkCreateAttr, flags, In, FieldKind::X32),
    ],
};

// The tail union of BPF_LINK_CREATE, one layout per attach type family.
// Offsets are relative to the union.

pub static LINK_ITER: Layout = Layout {
    name: "iter",
    size: size_of::<BpfLinkIter>(),
    fields: &[
        field!(BpfLinkIter, iter_info, In, FieldKind::Addr),
        field!(BpfLinkIter, iter_info_len, In, FieldKind::U32),
    ],
};

pub static LINK_PERF_EVENT: Layout = Layout {
    name: "perf_event",
    size: 8,
    fields: &[Field {
        name: "bpf_cookie",
        offset: 0,
        dir: Dir::In,
        kind: FieldKind::X64,
    }],
};

pub static LINK_TRACING: Layout = Layout {
    name: "tracing",
    size: 16,
    fields: &[
        Field {
            name: "target_btf_id",
            offset: 0,
            dir: Dir::In,
            kind: FieldKind::U32,
        },
        Field {
            name: "cookie",
            offset: 8,
            dir: Dir::In,
            kind: FieldKind::X64,
        },
    ],
};

pub static LINK_KPROBE_MULTI: Layout = Layout {
    name: "kprobe_multi",
    size: size_of::<BpfLinkKprobeMulti>(),
    fields: &[
        field!(BpfLinkKprobeMulti, flags, In, FieldKind::Flags32(BPF_KPROBE_MULTI_FLAGS)),
        field!(BpfLinkKprobeMulti, cnt, In, FieldKind::U32),
        field!(BpfLinkKprobeMulti, syms, In, FieldKind::Addr),
    ],
};

pub static LINK_UPDATE: Layout = Layout {
    name: "bpf_link_update_attr",
    size: size_of::<BpfLinkUpdateAttr>(),
    fields: &[
        field!(BpfLinkUpdateAttr, link_fd, In, FieldKind::Fd),
        field!(BpfLinkUpdateAttr, new_prog_fd, In, FieldKind::Fd),
        field!(BpfLinkUpdateAttr, flags, In, FieldKind::Flags32(BPF_ATTACH_FLAGS)),
        field!(BpfLinkUpdateAttr, old_prog_fd, In, FieldKind::Fd),
    ],
};

pub static ENABLE_STATS: Layout = Layout {
    name: "bpf_enable_stats_attr",
    size: 4,
    fields: &[Field {
        name: "type",
        offset: 0,
        dir: Dir::In,
        kind: FieldKind::Xval32(BPF_STATS_TYPES),
    }],
};

pub static ITER_CREATE: Layout = Layout {
    name: "bpf_iter_create_attr",
    size: size_of::<BpfIterCreateAttr>(),
    fields: &[
        field!(BpfIterCreateAttr, link_fd, In, FieldKind::Fd),
        field!(BpfIterCreateAttr, flags, In, FieldKind::X32),
    ],
};

pub static LINK_DETACH: Layout = Layout {
    name: "bpf_link_detach_attr",
    size: 4,
    fields: &[field!(BpfIterCreateAttr, link_fd, In, FieldKind::Fd)],
};

pub static PROG_BIND_MAP: Layout = Layout {
    name: "bpf_prog_bind_map_attr",
    size: size_of::<BpfProgBindMapAttr>(),
    fields: &[
        field!(BpfProgBindMapAttr, prog_fd, In, FieldKind::Fd),
        field!(BpfProgBindMapAttr, map_fd, In, FieldKind::Fd),
        field!(BpfProgBindMapAttr, flags, In, FieldKind::X32),
    ],
};

pub static PROG_INFO_HEAD: Layout = Layout {
    name: "bpf_prog_info",
    size: size_of::<BpfProgInfo>(),
    fields: &[
        field!(BpfProgInfo, prog_type, Out, FieldKind::Xval32(BPF_PROG_TYPES)),
        field!(BpfProgInfo, id, Out, FieldKind::U32),
        field!(BpfProgInfo, tag, Out, FieldKind::Hex(BPF_TAG_SIZE)),
        field!(BpfProgInfo, jited_prog_len, Out, FieldKind::U32),
        field!(BpfProgInfo, xlated_prog_len, Out, FieldKind::U32),
        field!(BpfProgInfo, jited_prog_insns, Out, FieldKind::Addr),
        field!(BpfProgInfo, xlated_prog_insns, Out, FieldKind::Addr),
        field!(BpfProgInfo, load_time, Out, FieldKind::U64),
        field!(BpfProgInfo, created_by_uid, Out, FieldKind::U32),
        field!(BpfProgInfo, nr_map_ids, Out, FieldKind::U32),
    ],
};

pub static PROG_INFO_TAIL: Layout = Layout {
    name: "bpf_prog_info",
    size: size_of::<BpfProgInfo>(),
    fields: &[
        field!(BpfProgInfo, name, Out, FieldKind::CStr(BPF_OBJ_NAME_LEN)),
        field!(BpfProgInfo, ifindex, Out, FieldKind::U32),
        field!(BpfProgInfo, gpl_compatible, Out, FieldKind::U32),
        field!(BpfProgInfo, netns_dev, Out, FieldKind::Dev),
        field!(BpfProgInfo, netns_ino, Out, FieldKind::U64),
    ],
};

pub static MAP_INFO: Layout = Layout {
    name: "bpf_map_info",
    size: size_of::<BpfMapInfo>(),
    fields: &[
        field!(BpfMapInfo, map_type, Out, FieldKind::Xval32(BPF_MAP_TYPES)),
        field!(BpfMapInfo, id, Out, FieldKind::U32),
        field!(BpfMapInfo, key_size, Out, FieldKind::U32),
        field!(BpfMapInfo, value_size, Out, FieldKind::U32),
        field!(BpfMapInfo, max_entries, Out, FieldKind::U32),
        field!(BpfMapInfo, map_flags, Out, FieldKind::Flags32(BPF_MAP_CREATE_FLAGS)),
        field!(BpfMapInfo, name, Out, FieldKind::CStr(BPF_OBJ_NAME_LEN)),
        field!(BpfMapInfo, ifindex, Out, FieldKind::U32),
        field!(BpfMapInfo, btf_vmlinux_value_type_id, Out, FieldKind::U32),
        field!(BpfMapInfo, netns_dev, Out, FieldKind::Dev),
        field!(BpfMapInfo, netns_ino, Out, FieldKind::U64),
        field!(BpfMapInfo, btf_id, Out, FieldKind::U32),
        field!(BpfMapInfo, btf_key_type_id, Out, FieldKind::U32),
        field!(BpfMapInfo, btf_value_type_id, Out, FieldKind::U32),
        field!(BpfMapInfo, btf_vmlinux_id, Out, FieldKind::U32),
        field!(BpfMapInfo, map_extra, Out, FieldKind::X64),
    ],
};

/// Every layout above, for consistency checks.
pub static LAYOUTS: &[&Layout] = &[
    &MAP_CREATE,
    &MAP_ELEM,
    &MAP_DELETE_ELEM,
    &MAP_NEXT_KEY,
    &MAP_FD_ONLY,
    &PROG_LOAD_HEAD,
    &PROG_LOAD_TAIL,
    &OBJ,
    &PROG_ATTACH,
    &PROG_TEST_RUN,
    &GET_NEXT_ID,
    &PROG_GET_FD_BY_ID,
    &MAP_GET_FD_BY_ID,
    &BTF_GET_FD_BY_ID,
    &LINK_GET_FD_BY_ID,
    &INFO_BY_FD,
    &PROG_QUERY_HEAD,
    &PROG_QUERY_TAIL,
    &RAW_TRACEPOINT_OPEN,
    &BTF_LOAD,
    &TASK_FD_QUERY,
    &MAP_BATCH,
    &LINK_CREATE_HEAD,
    &LINK_ITER,
    &LINK_PERF_EVENT,
    &LINK_TRACING,
    &LINK_KPROBE_MULTI,
    &LINK_UPDATE,
    &ENABLE_STATS,
    &ITER_CREATE,
    &LINK_DETACH,
    &PROG_BIND_MAP,
    &PROG_INFO_HEAD,
    &PROG_INFO_TAIL,
    &MAP_INFO,
];

/// Commands whose whole attribute is described by one layout.
fn plain_layout(cmd: BpfCommand) -> Option<&'static Layout> {
    use BpfCommand::*;

    Some(match cmd {
        MapCreate => &MAP_CREATE,
        MapLookupElem | MapUpdateElem | MapLookupAndDeleteElem => &MAP_ELEM,
        MapDeleteElem => &MAP_DELETE_ELEM,
        MapGetNextKey => &MAP_NEXT_KEY,
        MapFreeze => &MAP_FD_ONLY,
        ObjPin | ObjGet => &OBJ,
        ProgAttach | ProgDetach => &PROG_ATTACH,
        ProgTestRun => &PROG_TEST_RUN,
        ProgGetNextId | MapGetNextId | BtfGetNextId | LinkGetNextId => &GET_NEXT_ID,
        ProgGetFdById => &PROG_GET_FD_BY_ID,
        MapGetFdById => &MAP_GET_FD_BY_ID,
        BtfGetFdById => &BTF_GET_FD_BY_ID,
        LinkGetFdById => &LINK_GET_FD_BY_ID,
        RawTracepointOpen => &RAW_TRACEPOINT_OPEN,
        BtfLoad => &BTF_LOAD,
        TaskFdQuery => &TASK_FD_QUERY,
        MapLookupBatch | MapLookupAndDeleteBatch | MapUpdateBatch | MapDeleteBatch => &MAP_BATCH,
        LinkUpdate => &LINK_UPDATE,
        EnableStats => &ENABLE_STATS,
        IterCreate => &ITER_CREATE,
        LinkDetach => &LINK_DETACH,
        ProgBindMap => &PROG_BIND_MAP,
        ProgLoad | ObjGetInfoByFd | ProgQuery | LinkCreate | Unknown(_) => return None,
    })
}

/// How many leading bytes of the attribute the decoder understands.
fn decoded_size(cmd: BpfCommand) -> usize {
    match cmd {
        BpfCommand::ProgLoad => size_of::<BpfProgLoadAttr>(),
        BpfCommand::ObjGetInfoByFd => size_of::<BpfInfoByFdAttr>(),
        BpfCommand::ProgQuery => size_of::<BpfProgQueryAttr>(),
        BpfCommand::LinkCreate => size_of::<BpfLinkCreateAttr>(),
        cmd => plain_layout(cmd).map_or(0, |layout| layout.size),
    }
}

fn return_kind(cmd: BpfCommand) -> ReturnKind {
    use BpfCommand::*;

    match cmd {
        MapCreate | ProgLoad | ObjGet | ProgGetFdById | MapGetFdById | RawTracepointOpen
        | BtfLoad | BtfGetFdById | LinkCreate | LinkGetFdById | EnableStats | IterCreate => {
            ReturnKind::Fd
        }
        _ => ReturnKind::Plain,
    }
}

/// `BPF_ALU64|BPF_K|BPF_MOV` and friends.
pub fn format_insn_code(code: u8, style: XlatStyle) -> String {
    let class = u64::from(code & 0x07);
    let (second, third) = match class {
        // BPF_LD, BPF_LDX, BPF_ST, BPF_STX
        0..=3 => (
            lookup(BPF_SIZES, u64::from(code & 0x18)),
            lookup(BPF_MODES, u64::from(code & 0xe0)),
        ),
        // BPF_ALU, BPF_ALU64
        4 | 7 => (
            lookup(BPF_SRC, u64::from(code & 0x08)),
            lookup(BPF_ALU_OPS, u64::from(code & 0xf0)),
        ),
        _ => (
            lookup(BPF_SRC, u64::from(code & 0x08)),
            lookup(BPF_JMP_OPS, u64::from(code & 0xf0)),
        ),
    };

    let symbolic = match (lookup(BPF_INSN_CLASSES, class), second, third) {
        (Some(a), Some(b), Some(c)) => Some(format!("{a}|{b}|{c}")),
        _ => None,
    };

    match (symbolic, style) {
        (Some(symbolic), XlatStyle::Abbrev) => symbolic,
        (Some(symbolic), XlatStyle::Verbose) => format!("{code:#04x} /* {symbolic} */"),
        _ => format!("{code:#04x}"),
    }
}

fn print_insn(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    elem: &[u8],
) -> Result<()> {
    let insn = RawStruct::new(elem);
    let regs = insn.u8(offset_of!(BpfInsn, regs));

    arg!(sf, "bpf_insn");
    with_struct!(sf,
        argf!(sf, "code: {}", format_insn_code(insn.u8(0), cx.config.xlat_style));
        argf!(sf, "dst_reg: BPF_REG_{}", regs & 0x0f);
        argf!(sf, "src_reg: BPF_REG_{}", regs >> 4);
        argf!(sf, "off: {}", insn.i16(offset_of!(BpfInsn, off)));
        argf!(sf, "imm: {}", insn.i32(offset_of!(BpfInsn, imm)));
    );
    Ok(())
}

fn print_prog_load(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    attr: &RawStruct<'_>,
) -> Result<DecodeStatus> {
    print_entry_fields(sf, cx, &PROG_LOAD_HEAD, attr)?;

    let insns = offset_of!(BpfProgLoadAttr, insns);
    if attr.has(insns) {
        let count = attr.u32(offset_of!(BpfProgLoadAttr, insn_cnt));
        print_array(
            cx,
            sf,
            "insns",
            attr.u64(insns),
            u64::from(count),
            size_of::<BpfInsn>(),
            |cx, sf, elem, _| {
                print_insn(cx, sf, elem)?;
                Ok(true)
            },
        )?;
    }

    let license = offset_of!(BpfProgLoadAttr, license);
    if attr.has(license) {
        argf!(sf, "license: {}", cx.string_at(attr.u64(license)));
    }

    print_entry_fields(sf, cx, &PROG_LOAD_TAIL, attr)?;

    Ok(if attr.has(offset_of!(BpfProgLoadAttr, log_true_size)) {
        DecodeStatus::NeedsExit
    } else {
        DecodeStatus::Complete
    })
}

fn print_kprobe_multi(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    union: &RawStruct<'_>,
) -> Result<()> {
    print_all_fields(sf, cx, &LINK_KPROBE_MULTI, union)?;

    let count = u64::from(union.u32(offset_of!(BpfLinkKprobeMulti, cnt)));
    for (label, offset) in [
        ("addrs", offset_of!(BpfLinkKprobeMulti, addrs)),
        ("cookies", offset_of!(BpfLinkKprobeMulti, cookies)),
    ] {
        if !union.has(offset) {
            break;
        }
        print_array(cx, sf, label, union.u64(offset), count, 8, print_x64_elem)?;
    }
    Ok(())
}

fn print_link_create(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    attr: &RawStruct<'_>,
) -> Result<()> {
    print_entry_fields(sf, cx, &LINK_CREATE_HEAD, attr)?;

    if !attr.has(LINK_CREATE_UNION_OFFSET) {
        return Ok(());
    }

    let union = attr.sub(LINK_CREATE_UNION_OFFSET, LINK_CREATE_UNION_SIZE);
    match attr.u32(offset_of!(BpfLinkCreateAttr, attach_type)) {
        BPF_TRACE_ITER => print_all_fields(sf, cx, &LINK_ITER, &union)?,
        BPF_PERF_EVENT => print_all_fields(sf, cx, &LINK_PERF_EVENT, &union)?,
        BPF_TRACE_KPROBE_MULTI => print_kprobe_multi(cx, sf, &union)?,
        BPF_TRACE_FENTRY | BPF_TRACE_FEXIT | BPF_MODIFY_RETURN | BPF_LSM_MAC => {
            print_all_fields(sf, cx, &LINK_TRACING, &union)?
        }
        attach_type if union.any_nonzero(0, union.len()) => {
            trace!("no typed view of the link_create union for attach type {attach_type}");
            argf!(sf, "link_create: {}", cx.hex(union.as_bytes()));
        }
        _ => {}
    }
    Ok(())
}

/// Entry-phase fields of a known command.
fn print_attr_entry(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    cmd: BpfCommand,
    attr: &RawStruct<'_>,
) -> Result<DecodeStatus> {
    if let Some(layout) = plain_layout(cmd) {
        print_entry_fields(sf, cx, layout, attr)?;
        let needs_exit = layout
            .present(attr)
            .any(|field| field.dir != Dir::In);
        return Ok(if needs_exit {
            DecodeStatus::NeedsExit
        } else {
            DecodeStatus::Complete
        });
    }

    match cmd {
        BpfCommand::ProgLoad => print_prog_load(cx, sf, attr),
        BpfCommand::LinkCreate => {
            print_link_create(cx, sf, attr)?;
            Ok(DecodeStatus::Complete)
        }
        BpfCommand::ObjGetInfoByFd => {
            print_entry_fields(sf, cx, &INFO_BY_FD, attr)?;
            Ok(DecodeStatus::NeedsExit)
        }
        BpfCommand::ProgQuery => {
            print_entry_fields(sf, cx, &PROG_QUERY_HEAD, attr)?;
            Ok(DecodeStatus::NeedsExit)
        }
        _ => Ok(DecodeStatus::Complete),
    }
}

/// Non-zero bytes past what the decoder understands, as user space passed a
/// newer attribute than this table knows about.
fn print_unknown_tail(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    known: usize,
    attr: &RawStruct<'_>,
) -> Result<()> {
    let len = attr.len();
    if len > known && attr.any_nonzero(known, len - known) {
        argf!(
            sf,
            "/* bytes {known}..{} */ {}",
            len - 1,
            cx.hex(attr.bytes(known, len - known))
        );
    }
    Ok(())
}

fn fetch_attr(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
    size: u32,
) -> Result<Option<Bytes>> {
    if addr != 0 && (size == 0 || size as usize > PAGE_SIZE) {
        argf!(sf, "attr: 0x{addr:x}");
        return Ok(None);
    }
    fetch_or_print(cx, sf, "attr", addr, size as usize)
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<DecodeStatus> {
    let cmd = BpfCommand::from_code(occ.arg(0) as u32);
    let addr = occ.arg(1);
    let size = occ.arg(2) as u32;

    argf!(
        sf,
        "cmd: {}",
        format_named(u64::from(cmd.code()), cmd.name(), cx.config.xlat_style)
    );
    sf.set_return_kind(return_kind(cmd));

    let Some(attr) = fetch_attr(cx, sf, addr, size)? else {
        argf!(sf, "size: {size}");
        return Ok(DecodeStatus::Complete);
    };

    if !cmd.is_known() {
        argf!(sf, "attr: {}", cx.hex(&attr));
        argf!(sf, "size: {size}");
        return Ok(DecodeStatus::Complete);
    }

    let buf = cx.scratch.checkout(ScratchPurpose::BpfAttr, &attr);
    let raw = RawStruct::new(&buf[..attr.len()]);

    arg!(sf, "attr:");
    sf.push_depth(b"{")?;
    let status = print_attr_entry(cx, sf, cmd, &raw)?;
    print_unknown_tail(cx, sf, decoded_size(cmd), &raw)?;
    cx.scratch.restore(ScratchPurpose::BpfAttr, buf);

    match status {
        DecodeStatus::NeedsExit => occ.set_private(Snapshot { addr, bytes: attr }),
        DecodeStatus::Complete => {
            sf.pop_depth(b"}")?;
            argf!(sf, "size: {size}");
        }
    }

    Ok(status)
}

/// `info` of `BPF_OBJ_GET_INFO_BY_FD`, typed after the kind of object the fd
/// refers to.
fn print_obj_info(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let info_offset = offset_of!(BpfInfoByFdAttr, info);
    if !new.has(info_offset) {
        return Ok(());
    }

    let addr = new.u64(info_offset);
    let fd = old.i32(offset_of!(BpfInfoByFdAttr, bpf_fd));

    // The kernel reports the length it filled in; it never writes more than
    // the caller offered, and neither do we read more.
    let len_offset = offset_of!(BpfInfoByFdAttr, info_len);
    let len = old.u32(len_offset).min(new.u32(len_offset)) as usize;

    let layouts: Option<(&Layout, Option<&Layout>)> = match cx.mem.fd_path(fd).as_deref() {
        Some("anon_inode:bpf-prog") => Some((&PROG_INFO_HEAD, Some(&PROG_INFO_TAIL))),
        Some("anon_inode:bpf-map") => Some((&MAP_INFO, None)),
        _ => None,
    };

    let Some((head, tail)) = layouts.filter(|_| len > 0) else {
        argf!(sf, "info: {}", format_addr(addr));
        return Ok(());
    };

    let Some(bytes) = fetch_or_print(cx, sf, "info", addr, len.min(PAGE_SIZE))? else {
        return Ok(());
    };
    let info = RawStruct::new(&bytes);

    arg!(sf, "info:");
    sf.push_depth(b"{")?;
    print_all_fields(sf, cx, head, &info)?;

    if let Some(tail) = tail {
        let map_ids = offset_of!(BpfProgInfo, map_ids);
        if info.has(map_ids) {
            let count = info.u32(offset_of!(BpfProgInfo, nr_map_ids));
            print_array(
                cx,
                sf,
                "map_ids",
                info.u64(map_ids),
                u64::from(count),
                4,
                print_u32_elem,
            )?;
        }
        print_all_fields(sf, cx, tail, &info)?;
    }
    sf.pop_depth(b"}")?;

    Ok(())
}

fn print_prog_query_exit(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    print_exit_fields(sf, cx, &PROG_QUERY_HEAD, Some(old), new)?;

    let prog_ids = offset_of!(BpfProgQueryAttr, prog_ids);
    if new.has(prog_ids) {
        // The exit-time count is the kernel's claim of how many ids exist,
        // which may exceed what the caller made room for.
        let count = old.u32(PROG_CNT.offset).min(new.u32(PROG_CNT.offset));
        print_array(
            cx,
            sf,
            "prog_ids",
            new.u64(prog_ids),
            u64::from(count),
            4,
            print_u32_elem,
        )?;
    }

    if new.has(PROG_CNT.offset) {
        print_field_diff(sf, cx, old, new, &PROG_CNT)?;
    }

    print_all_fields(sf, cx, &PROG_QUERY_TAIL, new)
}

fn print_attr_exit(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    cmd: BpfCommand,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    match cmd {
        BpfCommand::ProgLoad => print_exit_fields(sf, cx, &PROG_LOAD_TAIL, Some(old), new),
        BpfCommand::ObjGetInfoByFd => {
            print_exit_fields(sf, cx, &INFO_BY_FD, Some(old), new)?;
            print_obj_info(cx, sf, old, new)
        }
        BpfCommand::ProgQuery => print_prog_query_exit(cx, sf, old, new),
        cmd => match plain_layout(cmd) {
            Some(layout) => print_exit_fields(sf, cx, layout, Some(old), new),
            None => Ok(()),
        },
    }
}

fn print_attr_saved(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    cmd: BpfCommand,
    old: &RawStruct<'_>,
) -> Result<()> {
    match cmd {
        BpfCommand::ProgLoad => print_saved_fields(sf, cx, &PROG_LOAD_TAIL, old),
        BpfCommand::ObjGetInfoByFd => print_saved_fields(sf, cx, &INFO_BY_FD, old),
        BpfCommand::ProgQuery => {
            if old.has(PROG_CNT.offset) {
                print_field(sf, cx, old, &PROG_CNT)?;
            }
            Ok(())
        }
        cmd => match plain_layout(cmd) {
            Some(layout) => print_saved_fields(sf, cx, layout, old),
            None => Ok(()),
        },
    }
}

pub fn decode_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    let cmd = BpfCommand::from_code(occ.arg(0) as u32);
    let size = occ.arg(2) as u32;

    if let Some(snapshot) = occ.take_private::<Snapshot>() {
        let old = snapshot.raw();

        if occ.failed() {
            print_attr_saved(cx, sf, cmd, &old)?;
        } else if let Some(bytes) = refetch(cx, sf, &snapshot)? {
            print_attr_exit(cx, sf, cmd, &old, &RawStruct::new(&bytes))?;
        }

        sf.pop_depth(b"}")?;
    }

    argf!(sf, "size: {size}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_codes() {
        // BPF_ALU64 | BPF_K | BPF_MOV
        assert_eq!(format_insn_code(0xb7, XlatStyle::Abbrev), "BPF_ALU64|BPF_K|BPF_MOV");
        // BPF_JMP | BPF_K | BPF_EXIT
        assert_eq!(format_insn_code(0x95, XlatStyle::Abbrev), "BPF_JMP|BPF_K|BPF_EXIT");
        // BPF_LDX | BPF_W | BPF_MEM
        assert_eq!(format_insn_code(0x61, XlatStyle::Abbrev), "BPF_LDX|BPF_W|BPF_MEM");
        assert_eq!(format_insn_code(0x95, XlatStyle::Raw), "0x95");
        assert_eq!(
            format_insn_code(0x95, XlatStyle::Verbose),
            "0x95 /* BPF_JMP|BPF_K|BPF_EXIT */"
        );
        // BPF_ALU | BPF_X with an opcode nobody defined
        assert_eq!(format_insn_code(0xfc, XlatStyle::Abbrev), "0xfc");
    }

    #[test]
    fn every_command_code_maps() {
        for code in 0..=64 {
            let cmd = BpfCommand::from_code(code);
            assert_eq!(cmd.code(), code);
            assert_eq!(cmd.is_known(), code <= BPF_PROG_BIND_MAP);
        }
        assert_eq!(BpfCommand::KNOWN.len(), 36);
    }
}
