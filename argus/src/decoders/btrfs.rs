// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! btrfs ioctls (type byte 0x94).

use std::mem::{offset_of, size_of};

use anyhow::Result;
use argus_common::{kernel_types::btrfs::*, raw::RawStruct};
use log::trace;

use crate::{
    arg, argf,
    decoders::ioctl::{defer_pointee, print_pointee, print_pointee_exit, render_u64},
    dispatch::{command_enum, DecodeContext, DecodeStatus},
    field,
    format_helpers::format_addr,
    formatting::SyscallFormatter,
    layout::{
        decode_struct_entry, decode_struct_exit, enter_struct, exit_struct, fetch_or_print,
        print_all_fields, print_element, print_entry_fields, print_field, print_field_diff,
        print_saved_fields, refetch, Dir, Field, FieldKind, Layout, Snapshot,
    },
    state::Occurrence,
    walker::{element_cap, print_array, print_u64_elem},
    with_array, with_struct,
    xlat::btrfs::*,
};

command_enum! {
    pub enum BtrfsIoctl: u32 {
        SnapCreate = BTRFS_IOC_SNAP_CREATE => "BTRFS_IOC_SNAP_CREATE",
        Defrag = BTRFS_IOC_DEFRAG => "BTRFS_IOC_DEFRAG",
        Resize = BTRFS_IOC_RESIZE => "BTRFS_IOC_RESIZE",
        ScanDev = BTRFS_IOC_SCAN_DEV => "BTRFS_IOC_SCAN_DEV",
        ForgetDev = BTRFS_IOC_FORGET_DEV => "BTRFS_IOC_FORGET_DEV",
        TransStart = BTRFS_IOC_TRANS_START => "BTRFS_IOC_TRANS_START",
        TransEnd = BTRFS_IOC_TRANS_END => "BTRFS_IOC_TRANS_END",
        Sync = BTRFS_IOC_SYNC => "BTRFS_IOC_SYNC",
        Clone = BTRFS_IOC_CLONE => "BTRFS_IOC_CLONE",
        AddDev = BTRFS_IOC_ADD_DEV => "BTRFS_IOC_ADD_DEV",
        RmDev = BTRFS_IOC_RM_DEV => "BTRFS_IOC_RM_DEV",
        Balance = BTRFS_IOC_BALANCE => "BTRFS_IOC_BALANCE",
        CloneRange = BTRFS_IOC_CLONE_RANGE => "BTRFS_IOC_CLONE_RANGE",
        SubvolCreate = BTRFS_IOC_SUBVOL_CREATE => "BTRFS_IOC_SUBVOL_CREATE",
        SnapDestroy = BTRFS_IOC_SNAP_DESTROY => "BTRFS_IOC_SNAP_DESTROY",
        DefragRange = BTRFS_IOC_DEFRAG_RANGE => "BTRFS_IOC_DEFRAG_RANGE",
        TreeSearch = BTRFS_IOC_TREE_SEARCH => "BTRFS_IOC_TREE_SEARCH",
        TreeSearchV2 = BTRFS_IOC_TREE_SEARCH_V2 => "BTRFS_IOC_TREE_SEARCH_V2",
        InoLookup = BTRFS_IOC_INO_LOOKUP => "BTRFS_IOC_INO_LOOKUP",
        DefaultSubvol = BTRFS_IOC_DEFAULT_SUBVOL => "BTRFS_IOC_DEFAULT_SUBVOL",
        SpaceInfo = BTRFS_IOC_SPACE_INFO => "BTRFS_IOC_SPACE_INFO",
        WaitSync = BTRFS_IOC_WAIT_SYNC => "BTRFS_IOC_WAIT_SYNC",
        SnapCreateV2 = BTRFS_IOC_SNAP_CREATE_V2 => "BTRFS_IOC_SNAP_CREATE_V2",
        StartSync = BTRFS_IOC_START_SYNC => "BTRFS_IOC_START_SYNC",
        SubvolCreateV2 = BTRFS_IOC_SUBVOL_CREATE_V2 => "BTRFS_IOC_SUBVOL_CREATE_V2",
        SubvolGetflags = BTRFS_IOC_SUBVOL_GETFLAGS => "BTRFS_IOC_SUBVOL_GETFLAGS",
        SubvolSetflags = BTRFS_IOC_SUBVOL_SETFLAGS => "BTRFS_IOC_SUBVOL_SETFLAGS",
        Scrub = BTRFS_IOC_SCRUB => "BTRFS_IOC_SCRUB",
        ScrubCancel = BTRFS_IOC_SCRUB_CANCEL => "BTRFS_IOC_SCRUB_CANCEL",
        ScrubProgress = BTRFS_IOC_SCRUB_PROGRESS => "BTRFS_IOC_SCRUB_PROGRESS",
        DevInfo = BTRFS_IOC_DEV_INFO => "BTRFS_IOC_DEV_INFO",
        FsInfo = BTRFS_IOC_FS_INFO => "BTRFS_IOC_FS_INFO",
        BalanceV2 = BTRFS_IOC_BALANCE_V2 => "BTRFS_IOC_BALANCE_V2",
        BalanceCtl = BTRFS_IOC_BALANCE_CTL => "BTRFS_IOC_BALANCE_CTL",
        BalanceProgress = BTRFS_IOC_BALANCE_PROGRESS => "BTRFS_IOC_BALANCE_PROGRESS",
        InoPaths = BTRFS_IOC_INO_PATHS => "BTRFS_IOC_INO_PATHS",
        LogicalIno = BTRFS_IOC_LOGICAL_INO => "BTRFS_IOC_LOGICAL_INO",
        SetReceivedSubvol = BTRFS_IOC_SET_RECEIVED_SUBVOL => "BTRFS_IOC_SET_RECEIVED_SUBVOL",
        Send = BTRFS_IOC_SEND => "BTRFS_IOC_SEND",
        DevicesReady = BTRFS_IOC_DEVICES_READY => "BTRFS_IOC_DEVICES_READY",
        QuotaCtl = BTRFS_IOC_QUOTA_CTL => "BTRFS_IOC_QUOTA_CTL",
        QgroupAssign = BTRFS_IOC_QGROUP_ASSIGN => "BTRFS_IOC_QGROUP_ASSIGN",
        QgroupCreate = BTRFS_IOC_QGROUP_CREATE => "BTRFS_IOC_QGROUP_CREATE",
        QgroupLimit = BTRFS_IOC_QGROUP_LIMIT => "BTRFS_IOC_QGROUP_LIMIT",
        QuotaRescan = BTRFS_IOC_QUOTA_RESCAN => "BTRFS_IOC_QUOTA_RESCAN",
        QuotaRescanStatus = BTRFS_IOC_QUOTA_RESCAN_STATUS => "BTRFS_IOC_QUOTA_RESCAN_STATUS",
        QuotaRescanWait = BTRFS_IOC_QUOTA_RESCAN_WAIT => "BTRFS_IOC_QUOTA_RESCAN_WAIT",
        GetFslabel = BTRFS_IOC_GET_FSLABEL => "BTRFS_IOC_GET_FSLABEL",
        SetFslabel = BTRFS_IOC_SET_FSLABEL => "BTRFS_IOC_SET_FSLABEL",
        GetDevStats = BTRFS_IOC_GET_DEV_STATS => "BTRFS_IOC_GET_DEV_STATS",
        DevReplace = BTRFS_IOC_DEV_REPLACE => "BTRFS_IOC_DEV_REPLACE",
        FileExtentSame = BTRFS_IOC_FILE_EXTENT_SAME => "BTRFS_IOC_FILE_EXTENT_SAME",
        GetFeatures = BTRFS_IOC_GET_FEATURES => "BTRFS_IOC_GET_FEATURES",
        SetFeatures = BTRFS_IOC_SET_FEATURES => "BTRFS_IOC_SET_FEATURES",
        GetSupportedFeatures = BTRFS_IOC_GET_SUPPORTED_FEATURES => "BTRFS_IOC_GET_SUPPORTED_FEATURES",
        RmDevV2 = BTRFS_IOC_RM_DEV_V2 => "BTRFS_IOC_RM_DEV_V2",
        LogicalInoV2 = BTRFS_IOC_LOGICAL_INO_V2 => "BTRFS_IOC_LOGICAL_INO_V2",
        GetSubvolInfo = BTRFS_IOC_GET_SUBVOL_INFO => "BTRFS_IOC_GET_SUBVOL_INFO",
        SnapDestroyV2 = BTRFS_IOC_SNAP_DESTROY_V2 => "BTRFS_IOC_SNAP_DESTROY_V2",
    }
}

fn render_fd64(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.fd(raw.i64(0) as i32)
}

fn render_subvol_flags(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.flags(raw.u64(0), BTRFS_SUBVOL_FLAGS)
}

/// Parts per thousand, with the percentage alongside.
fn render_progress_1000(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    let value = raw.u64(0);
    format!("{value} /* {}.{}% */", value / 10, value % 10)
}

const FD64: FieldKind = FieldKind::Custom(8, render_fd64);
const TREE_ID: FieldKind = FieldKind::Xval64(BTRFS_TREE_OBJECTIDS);

pub static VOL_ARGS: Layout = Layout {
    name: "btrfs_ioctl_vol_args",
    size: size_of::<BtrfsVolArgs>(),
    fields: &[
        field!(BtrfsVolArgs, fd, In, FD64),
        field!(BtrfsVolArgs, name, In, FieldKind::CStr(BTRFS_PATH_NAME_MAX + 1)),
    ],
};

pub static VOL_ARGS_V2_HEAD: Layout = Layout {
    name: "btrfs_ioctl_vol_args_v2",
    size: size_of::<BtrfsVolArgsV2>(),
    fields: &[
        field!(BtrfsVolArgsV2, fd, In, FD64),
        field!(BtrfsVolArgsV2, transid, In, FieldKind::U64),
        field!(BtrfsVolArgsV2, flags, In, FieldKind::Flags64(BTRFS_SUBVOL_FLAGS)),
    ],
};

pub static QGROUP_LIMIT: Layout = Layout {
    name: "btrfs_qgroup_limit",
    size: size_of::<BtrfsQgroupLimit>(),
    fields: &[
        field!(BtrfsQgroupLimit, flags, In, FieldKind::Flags64(BTRFS_QGROUP_LIMIT_FLAGS)),
        field!(BtrfsQgroupLimit, max_rfer, In, FieldKind::U64),
        field!(BtrfsQgroupLimit, max_excl, In, FieldKind::U64),
        field!(BtrfsQgroupLimit, rsv_rfer, In, FieldKind::U64),
        field!(BtrfsQgroupLimit, rsv_excl, In, FieldKind::U64),
    ],
};

pub static QGROUP_INHERIT: Layout = Layout {
    name: "btrfs_qgroup_inherit",
    size: size_of::<BtrfsQgroupInherit>(),
    fields: &[
        field!(BtrfsQgroupInherit, flags, In, FieldKind::Flags64(BTRFS_QGROUP_INHERIT_FLAGS)),
        field!(BtrfsQgroupInherit, num_qgroups, In, FieldKind::U64),
        field!(BtrfsQgroupInherit, num_ref_copies, In, FieldKind::U64),
        field!(BtrfsQgroupInherit, num_excl_copies, In, FieldKind::U64),
        field!(BtrfsQgroupInherit, lim, In, FieldKind::Struct(&QGROUP_LIMIT)),
    ],
};

pub static CLONE_RANGE: Layout = Layout {
    name: "btrfs_ioctl_clone_range_args",
    size: size_of::<BtrfsCloneRangeArgs>(),
    fields: &[
        field!(BtrfsCloneRangeArgs, src_fd, In, FD64),
        field!(BtrfsCloneRangeArgs, src_offset, In, FieldKind::U64),
        field!(BtrfsCloneRangeArgs, src_length, In, FieldKind::U64),
        field!(BtrfsCloneRangeArgs, dest_offset, In, FieldKind::U64),
    ],
};

pub static SPACE_ARGS: Layout = Layout {
    name: "btrfs_ioctl_space_args",
    size: size_of::<BtrfsSpaceArgs>(),
    fields: &[
        field!(BtrfsSpaceArgs, space_slots, In, FieldKind::U64),
        field!(BtrfsSpaceArgs, total_spaces, Out, FieldKind::U64),
    ],
};

pub static SPACE_INFO: Layout = Layout {
    name: "btrfs_ioctl_space_info",
    size: size_of::<BtrfsSpaceInfo>(),
    fields: &[
        field!(BtrfsSpaceInfo, flags, Out, FieldKind::Flags64(BTRFS_BLOCK_GROUP_FLAGS)),
        field!(BtrfsSpaceInfo, total_bytes, Out, FieldKind::U64),
        field!(BtrfsSpaceInfo, used_bytes, Out, FieldKind::U64),
    ],
};

pub static SCRUB_PROGRESS: Layout = Layout {
    name: "btrfs_scrub_progress",
    size: size_of::<BtrfsScrubProgress>(),
    fields: &[
        field!(BtrfsScrubProgress, data_extents_scrubbed, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, tree_extents_scrubbed, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, data_bytes_scrubbed, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, tree_bytes_scrubbed, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, read_errors, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, csum_errors, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, verify_errors, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, no_csum, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, csum_discards, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, super_errors, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, malloc_errors, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, uncorrectable_errors, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, corrected_errors, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, last_physical, Out, FieldKind::U64),
        field!(BtrfsScrubProgress, unverified_errors, Out, FieldKind::U64),
    ],
};

pub static SCRUB: Layout = Layout {
    name: "btrfs_ioctl_scrub_args",
    size: size_of::<BtrfsScrubArgs>(),
    fields: &[
        field!(BtrfsScrubArgs, devid, In, FieldKind::U64),
        field!(BtrfsScrubArgs, start, In, FieldKind::U64),
        field!(BtrfsScrubArgs, end, In, FieldKind::U64),
        field!(BtrfsScrubArgs, flags, In, FieldKind::Flags64(BTRFS_SCRUB_FLAGS)),
        field!(BtrfsScrubArgs, progress, Out, FieldKind::Struct(&SCRUB_PROGRESS)),
    ],
};

/// `BTRFS_IOC_SCRUB_PROGRESS` only looks at the device id.
pub static SCRUB_STATUS: Layout = Layout {
    name: "btrfs_ioctl_scrub_args",
    size: size_of::<BtrfsScrubArgs>(),
    fields: &[
        field!(BtrfsScrubArgs, devid, In, FieldKind::U64),
        field!(BtrfsScrubArgs, progress, Out, FieldKind::Struct(&SCRUB_PROGRESS)),
    ],
};

pub static DEV_INFO: Layout = Layout {
    name: "btrfs_ioctl_dev_info_args",
    size: size_of::<BtrfsDevInfoArgs>(),
    fields: &[
        field!(BtrfsDevInfoArgs, devid, InOut, FieldKind::U64),
        field!(BtrfsDevInfoArgs, uuid, InOut, FieldKind::Uuid),
        field!(BtrfsDevInfoArgs, bytes_used, Out, FieldKind::U64),
        field!(BtrfsDevInfoArgs, total_bytes, Out, FieldKind::U64),
        field!(BtrfsDevInfoArgs, fsid, Out, FieldKind::Uuid),
        field!(BtrfsDevInfoArgs, path, Out, FieldKind::CStr(BTRFS_DEVICE_PATH_NAME_MAX)),
    ],
};

pub static FS_INFO: Layout = Layout {
    name: "btrfs_ioctl_fs_info_args",
    size: size_of::<BtrfsFsInfoArgs>(),
    fields: &[
        field!(BtrfsFsInfoArgs, max_id, Out, FieldKind::U64),
        field!(BtrfsFsInfoArgs, num_devices, Out, FieldKind::U64),
        field!(BtrfsFsInfoArgs, fsid, Out, FieldKind::Uuid),
        field!(BtrfsFsInfoArgs, nodesize, Out, FieldKind::U32),
        field!(BtrfsFsInfoArgs, sectorsize, Out, FieldKind::U32),
        field!(BtrfsFsInfoArgs, clone_alignment, Out, FieldKind::U32),
        field!(BtrfsFsInfoArgs, csum_type, Out, FieldKind::Xval16(BTRFS_CSUM_TYPES)),
        field!(BtrfsFsInfoArgs, csum_size, Out, FieldKind::U16),
        field!(BtrfsFsInfoArgs, flags, InOut, FieldKind::Flags64(BTRFS_FS_INFO_FLAGS)),
        field!(BtrfsFsInfoArgs, generation, Out, FieldKind::U64),
        field!(BtrfsFsInfoArgs, metadata_uuid, Out, FieldKind::Uuid),
    ],
};

pub static BALANCE_ARGS: Layout = Layout {
    name: "btrfs_balance_args",
    size: size_of::<BtrfsBalanceArgs>(),
    fields: &[
        field!(BtrfsBalanceArgs, profiles, In, FieldKind::Flags64(BTRFS_BLOCK_GROUP_FLAGS)),
        field!(BtrfsBalanceArgs, usage, In, FieldKind::U64),
        field!(BtrfsBalanceArgs, devid, In, FieldKind::U64),
        field!(BtrfsBalanceArgs, pstart, In, FieldKind::U64),
        field!(BtrfsBalanceArgs, pend, In, FieldKind::U64),
        field!(BtrfsBalanceArgs, vstart, In, FieldKind::U64),
        field!(BtrfsBalanceArgs, vend, In, FieldKind::U64),
        field!(BtrfsBalanceArgs, target, In, FieldKind::Flags64(BTRFS_BLOCK_GROUP_FLAGS)),
        field!(BtrfsBalanceArgs, flags, In, FieldKind::Flags64(BTRFS_BALANCE_ARGS_FLAGS)),
        field!(BtrfsBalanceArgs, limit, In, FieldKind::U64),
        field!(BtrfsBalanceArgs, stripes_min, In, FieldKind::U32),
        field!(BtrfsBalanceArgs, stripes_max, In, FieldKind::U32),
    ],
};

pub static BALANCE_PROGRESS: Layout = Layout {
    name: "btrfs_balance_progress",
    size: size_of::<BtrfsBalanceProgress>(),
    fields: &[
        field!(BtrfsBalanceProgress, expected, Out, FieldKind::U64),
        field!(BtrfsBalanceProgress, considered, Out, FieldKind::U64),
        field!(BtrfsBalanceProgress, completed, Out, FieldKind::U64),
    ],
};

pub static BALANCE: Layout = Layout {
    name: "btrfs_ioctl_balance_args",
    size: size_of::<BtrfsIoctlBalanceArgs>(),
    fields: &[
        field!(BtrfsIoctlBalanceArgs, flags, In, FieldKind::Flags64(BTRFS_BALANCE_FLAGS)),
        field!(BtrfsIoctlBalanceArgs, state, Out, FieldKind::Flags64(BTRFS_BALANCE_STATE)),
        field!(BtrfsIoctlBalanceArgs, data, In, FieldKind::Struct(&BALANCE_ARGS)),
        field!(BtrfsIoctlBalanceArgs, meta, In, FieldKind::Struct(&BALANCE_ARGS)),
        field!(BtrfsIoctlBalanceArgs, sys, In, FieldKind::Struct(&BALANCE_ARGS)),
        field!(BtrfsIoctlBalanceArgs, stat, Out, FieldKind::Struct(&BALANCE_PROGRESS)),
    ],
};

/// `BTRFS_IOC_BALANCE_PROGRESS` reports the whole structure.
pub static BALANCE_STATUS: Layout = Layout {
    name: "btrfs_ioctl_balance_args",
    size: size_of::<BtrfsIoctlBalanceArgs>(),
    fields: &[
        field!(BtrfsIoctlBalanceArgs, flags, Out, FieldKind::Flags64(BTRFS_BALANCE_FLAGS)),
        field!(BtrfsIoctlBalanceArgs, state, Out, FieldKind::Flags64(BTRFS_BALANCE_STATE)),
        field!(BtrfsIoctlBalanceArgs, data, Out, FieldKind::Struct(&BALANCE_ARGS)),
        field!(BtrfsIoctlBalanceArgs, meta, Out, FieldKind::Struct(&BALANCE_ARGS)),
        field!(BtrfsIoctlBalanceArgs, sys, Out, FieldKind::Struct(&BALANCE_ARGS)),
        field!(BtrfsIoctlBalanceArgs, stat, Out, FieldKind::Struct(&BALANCE_PROGRESS)),
    ],
};

pub static INO_LOOKUP: Layout = Layout {
    name: "btrfs_ioctl_ino_lookup_args",
    size: size_of::<BtrfsInoLookupArgs>(),
    fields: &[
        field!(BtrfsInoLookupArgs, treeid, InOut, TREE_ID),
        field!(BtrfsInoLookupArgs, objectid, In, FieldKind::U64),
        field!(BtrfsInoLookupArgs, name, Out, FieldKind::CStr(BTRFS_INO_LOOKUP_PATH_MAX)),
    ],
};

pub static INO_PATH: Layout = Layout {
    name: "btrfs_ioctl_ino_path_args",
    size: size_of::<BtrfsInoPathArgs>(),
    fields: &[
        field!(BtrfsInoPathArgs, inum, In, FieldKind::U64),
        field!(BtrfsInoPathArgs, size, In, FieldKind::U64),
        field!(BtrfsInoPathArgs, fspath, In, FieldKind::Addr),
    ],
};

pub static LOGICAL_INO: Layout = Layout {
    name: "btrfs_ioctl_logical_ino_args",
    size: size_of::<BtrfsLogicalInoArgs>(),
    fields: &[
        field!(BtrfsLogicalInoArgs, logical, In, FieldKind::U64),
        field!(BtrfsLogicalInoArgs, size, In, FieldKind::U64),
        field!(BtrfsLogicalInoArgs, flags, In, FieldKind::Flags64(BTRFS_LOGICAL_INO_FLAGS)),
        field!(BtrfsLogicalInoArgs, inodes, In, FieldKind::Addr),
    ],
};

pub static DATA_CONTAINER: Layout = Layout {
    name: "btrfs_data_container",
    size: size_of::<BtrfsDataContainer>(),
    fields: &[
        field!(BtrfsDataContainer, bytes_left, Out, FieldKind::U32),
        field!(BtrfsDataContainer, bytes_missing, Out, FieldKind::U32),
        field!(BtrfsDataContainer, elem_cnt, Out, FieldKind::U32),
        field!(BtrfsDataContainer, elem_missed, Out, FieldKind::U32),
    ],
};

/// One `(inum, offset, root)` triple of a `LOGICAL_INO` result.
pub static LOGICAL_INO_ITEM: Layout = Layout {
    name: "inode",
    size: 24,
    fields: &[
        Field {
            name: "inum",
            offset: 0,
            dir: Dir::Out,
            kind: FieldKind::U64,
        },
        Field {
            name: "offset",
            offset: 8,
            dir: Dir::Out,
            kind: FieldKind::U64,
        },
        Field {
            name: "root",
            offset: 16,
            dir: Dir::Out,
            kind: TREE_ID,
        },
    ],
};

pub static SEND_HEAD: Layout = Layout {
    name: "btrfs_ioctl_send_args",
    size: size_of::<BtrfsSendArgs>(),
    fields: &[
        field!(BtrfsSendArgs, send_fd, In, FD64),
        field!(BtrfsSendArgs, clone_sources_count, In, FieldKind::U64),
    ],
};

pub static SEND_TAIL: Layout = Layout {
    name: "btrfs_ioctl_send_args",
    size: size_of::<BtrfsSendArgs>(),
    fields: &[
        field!(BtrfsSendArgs, parent_root, In, TREE_ID),
        field!(BtrfsSendArgs, flags, In, FieldKind::Flags64(BTRFS_SEND_FLAGS)),
        field!(BtrfsSendArgs, version, In, FieldKind::U32),
    ],
};

pub static QUOTA_CTL: Layout = Layout {
    name: "btrfs_ioctl_quota_ctl_args",
    size: size_of::<BtrfsQuotaCtlArgs>(),
    fields: &[
        field!(BtrfsQuotaCtlArgs, cmd, In, FieldKind::Xval64(BTRFS_QUOTA_CTL_CMDS)),
        field!(BtrfsQuotaCtlArgs, status, In, FieldKind::U64),
    ],
};

pub static QGROUP_ASSIGN: Layout = Layout {
    name: "btrfs_ioctl_qgroup_assign_args",
    size: size_of::<BtrfsQgroupAssignArgs>(),
    fields: &[
        field!(BtrfsQgroupAssignArgs, assign, In, FieldKind::U64),
        field!(BtrfsQgroupAssignArgs, src, In, FieldKind::U64),
        field!(BtrfsQgroupAssignArgs, dst, In, FieldKind::U64),
    ],
};

pub static QGROUP_CREATE: Layout = Layout {
    name: "btrfs_ioctl_qgroup_create_args",
    size: size_of::<BtrfsQgroupCreateArgs>(),
    fields: &[
        field!(BtrfsQgroupCreateArgs, create, In, FieldKind::U64),
        field!(BtrfsQgroupCreateArgs, qgroupid, In, FieldKind::U64),
    ],
};

/// Declared `_IOR`, but the kernel only ever reads it.
pub static QGROUP_LIMIT_ARGS: Layout = Layout {
    name: "btrfs_ioctl_qgroup_limit_args",
    size: size_of::<BtrfsQgroupLimitArgs>(),
    fields: &[
        field!(BtrfsQgroupLimitArgs, qgroupid, In, FieldKind::U64),
        field!(BtrfsQgroupLimitArgs, lim, In, FieldKind::Struct(&QGROUP_LIMIT)),
    ],
};

pub static QUOTA_RESCAN: Layout = Layout {
    name: "btrfs_ioctl_quota_rescan_args",
    size: size_of::<BtrfsQuotaRescanArgs>(),
    fields: &[
        field!(BtrfsQuotaRescanArgs, flags, In, FieldKind::U64),
        field!(BtrfsQuotaRescanArgs, progress, In, FieldKind::U64),
    ],
};

pub static QUOTA_RESCAN_STATUS: Layout = Layout {
    name: "btrfs_ioctl_quota_rescan_args",
    size: size_of::<BtrfsQuotaRescanArgs>(),
    fields: &[
        field!(BtrfsQuotaRescanArgs, flags, Out, FieldKind::U64),
        field!(BtrfsQuotaRescanArgs, progress, Out, FieldKind::U64),
    ],
};

pub static DEV_STATS: Layout = Layout {
    name: "btrfs_ioctl_get_dev_stats",
    size: size_of::<BtrfsGetDevStats>(),
    fields: &[
        field!(BtrfsGetDevStats, devid, In, FieldKind::U64),
        field!(BtrfsGetDevStats, nr_items, InOut, FieldKind::U64),
        field!(BtrfsGetDevStats, flags, In, FieldKind::Flags64(BTRFS_DEV_STATS_FLAGS)),
    ],
};

pub static DEV_REPLACE_START: Layout = Layout {
    name: "btrfs_ioctl_dev_replace_start_params",
    size: size_of::<BtrfsDevReplaceStartParams>(),
    fields: &[
        field!(BtrfsDevReplaceStartParams, srcdevid, In, FieldKind::U64),
        field!(
            BtrfsDevReplaceStartParams,
            cont_reading_from_srcdev_mode,
            In,
            FieldKind::Xval64(BTRFS_CONT_READING_MODES)
        ),
        field!(
            BtrfsDevReplaceStartParams,
            srcdev_name,
            In,
            FieldKind::CStr(BTRFS_DEVICE_PATH_NAME_MAX + 1)
        ),
        field!(
            BtrfsDevReplaceStartParams,
            tgtdev_name,
            In,
            FieldKind::CStr(BTRFS_DEVICE_PATH_NAME_MAX + 1)
        ),
    ],
};

pub static DEV_REPLACE_STATUS: Layout = Layout {
    name: "btrfs_ioctl_dev_replace_status_params",
    size: size_of::<BtrfsDevReplaceStatusParams>(),
    fields: &[
        field!(
            BtrfsDevReplaceStatusParams,
            replace_state,
            Out,
            FieldKind::Xval64(BTRFS_DEV_REPLACE_STATES)
        ),
        field!(
            BtrfsDevReplaceStatusParams,
            progress_1000,
            Out,
            FieldKind::Custom(8, render_progress_1000)
        ),
        field!(BtrfsDevReplaceStatusParams, time_started, Out, FieldKind::U64),
        field!(BtrfsDevReplaceStatusParams, time_stopped, Out, FieldKind::U64),
        field!(BtrfsDevReplaceStatusParams, num_write_errors, Out, FieldKind::U64),
        field!(
            BtrfsDevReplaceStatusParams,
            num_uncorrectable_read_errors,
            Out,
            FieldKind::U64
        ),
    ],
};

pub static SAME_ARGS: Layout = Layout {
    name: "btrfs_ioctl_same_args",
    size: size_of::<BtrfsSameArgs>(),
    fields: &[
        field!(BtrfsSameArgs, logical_offset, In, FieldKind::U64),
        field!(BtrfsSameArgs, length, In, FieldKind::U64),
        field!(BtrfsSameArgs, dest_count, In, FieldKind::U16),
    ],
};

pub static SAME_EXTENT_INFO: Layout = Layout {
    name: "btrfs_ioctl_same_extent_info",
    size: size_of::<BtrfsSameExtentInfo>(),
    fields: &[
        field!(BtrfsSameExtentInfo, fd, In, FD64),
        field!(BtrfsSameExtentInfo, logical_offset, In, FieldKind::U64),
        field!(BtrfsSameExtentInfo, bytes_deduped, Out, FieldKind::U64),
        field!(BtrfsSameExtentInfo, status, Out, FieldKind::Xval32(BTRFS_SAME_STATUS)),
    ],
};

pub static FEATURE_FLAGS: Layout = Layout {
    name: "btrfs_ioctl_feature_flags",
    size: size_of::<BtrfsFeatureFlags>(),
    fields: &[
        field!(BtrfsFeatureFlags, compat_flags, In, FieldKind::X64),
        field!(
            BtrfsFeatureFlags,
            compat_ro_flags,
            In,
            FieldKind::Flags64(BTRFS_FEATURES_COMPAT_RO)
        ),
        field!(
            BtrfsFeatureFlags,
            incompat_flags,
            In,
            FieldKind::Flags64(BTRFS_FEATURES_INCOMPAT)
        ),
    ],
};

const FEATURE_FLAGS_SIZE: usize = size_of::<BtrfsFeatureFlags>();

pub static GET_FEATURES: Layout = Layout {
    name: "btrfs_ioctl_feature_flags",
    size: FEATURE_FLAGS_SIZE,
    fields: &[Field {
        name: "features",
        offset: 0,
        dir: Dir::Out,
        kind: FieldKind::Struct(&FEATURE_FLAGS),
    }],
};

/// `flags[2]`: the new values and the mask of what to change.
pub static SET_FEATURES: Layout = Layout {
    name: "btrfs_ioctl_feature_flags[2]",
    size: 2 * FEATURE_FLAGS_SIZE,
    fields: &[
        Field {
            name: "flags",
            offset: 0,
            dir: Dir::In,
            kind: FieldKind::Struct(&FEATURE_FLAGS),
        },
        Field {
            name: "mask",
            offset: FEATURE_FLAGS_SIZE,
            dir: Dir::In,
            kind: FieldKind::Struct(&FEATURE_FLAGS),
        },
    ],
};

pub static GET_SUPPORTED_FEATURES: Layout = Layout {
    name: "btrfs_ioctl_feature_flags[3]",
    size: 3 * FEATURE_FLAGS_SIZE,
    fields: &[
        Field {
            name: "supported",
            offset: 0,
            dir: Dir::Out,
            kind: FieldKind::Struct(&FEATURE_FLAGS),
        },
        Field {
            name: "safe_set",
            offset: FEATURE_FLAGS_SIZE,
            dir: Dir::Out,
            kind: FieldKind::Struct(&FEATURE_FLAGS),
        },
        Field {
            name: "safe_clear",
            offset: 2 * FEATURE_FLAGS_SIZE,
            dir: Dir::Out,
            kind: FieldKind::Struct(&FEATURE_FLAGS),
        },
    ],
};

pub static SEARCH_KEY: Layout = Layout {
    name: "btrfs_ioctl_search_key",
    size: size_of::<BtrfsSearchKey>(),
    fields: &[
        field!(BtrfsSearchKey, tree_id, In, TREE_ID),
        field!(BtrfsSearchKey, min_objectid, In, FieldKind::U64),
        field!(BtrfsSearchKey, max_objectid, In, FieldKind::U64),
        field!(BtrfsSearchKey, min_offset, In, FieldKind::U64),
        field!(BtrfsSearchKey, max_offset, In, FieldKind::U64),
        field!(BtrfsSearchKey, min_transid, In, FieldKind::U64),
        field!(BtrfsSearchKey, max_transid, In, FieldKind::U64),
        field!(BtrfsSearchKey, min_type, In, FieldKind::Xval32(BTRFS_KEY_TYPES)),
        field!(BtrfsSearchKey, max_type, In, FieldKind::Xval32(BTRFS_KEY_TYPES)),
        field!(BtrfsSearchKey, nr_items, In, FieldKind::U32),
    ],
};

pub static SEARCH_HEADER: Layout = Layout {
    name: "btrfs_ioctl_search_header",
    size: size_of::<BtrfsSearchHeader>(),
    fields: &[
        field!(BtrfsSearchHeader, transid, Out, FieldKind::U64),
        field!(BtrfsSearchHeader, objectid, Out, FieldKind::U64),
        field!(BtrfsSearchHeader, offset, Out, FieldKind::U64),
        field!("type", BtrfsSearchHeader, item_type, Out, FieldKind::Xval32(BTRFS_KEY_TYPES)),
        field!(BtrfsSearchHeader, len, Out, FieldKind::U32),
    ],
};

/// The kernel moves the key forward for the next search and reports how
/// many items it found in `nr_items`.
pub static SEARCH: Layout = Layout {
    name: "btrfs_ioctl_search_args",
    size: size_of::<BtrfsSearchArgs>(),
    fields: &[field!(BtrfsSearchArgs, key, InOut, FieldKind::Struct(&SEARCH_KEY))],
};

pub static SEARCH_V2: Layout = Layout {
    name: "btrfs_ioctl_search_args_v2",
    size: size_of::<BtrfsSearchArgsV2>(),
    fields: &[
        field!(BtrfsSearchArgsV2, key, InOut, FieldKind::Struct(&SEARCH_KEY)),
        field!(BtrfsSearchArgsV2, buf_size, InOut, FieldKind::U64),
    ],
};

pub static TIMESPEC: Layout = Layout {
    name: "btrfs_ioctl_timespec",
    size: size_of::<BtrfsTimespec>(),
    fields: &[
        field!(BtrfsTimespec, sec, In, FieldKind::U64),
        field!(BtrfsTimespec, nsec, In, FieldKind::U32),
    ],
};

pub static RECEIVED_SUBVOL: Layout = Layout {
    name: "btrfs_ioctl_received_subvol_args",
    size: size_of::<BtrfsReceivedSubvolArgs>(),
    fields: &[
        field!(BtrfsReceivedSubvolArgs, uuid, In, FieldKind::Uuid),
        field!(BtrfsReceivedSubvolArgs, stransid, In, FieldKind::U64),
        field!(BtrfsReceivedSubvolArgs, rtransid, Out, FieldKind::U64),
        field!(BtrfsReceivedSubvolArgs, stime, In, FieldKind::Struct(&TIMESPEC)),
        field!(BtrfsReceivedSubvolArgs, rtime, Out, FieldKind::Struct(&TIMESPEC)),
        field!(BtrfsReceivedSubvolArgs, flags, In, FieldKind::U64),
    ],
};

pub static SUBVOL_INFO: Layout = Layout {
    name: "btrfs_ioctl_get_subvol_info_args",
    size: size_of::<BtrfsGetSubvolInfoArgs>(),
    fields: &[
        field!(BtrfsGetSubvolInfoArgs, treeid, Out, TREE_ID),
        field!(BtrfsGetSubvolInfoArgs, name, Out, FieldKind::CStr(BTRFS_VOL_NAME_MAX + 1)),
        field!(BtrfsGetSubvolInfoArgs, parent_id, Out, TREE_ID),
        field!(BtrfsGetSubvolInfoArgs, dirid, Out, FieldKind::U64),
        field!(BtrfsGetSubvolInfoArgs, generation, Out, FieldKind::U64),
        field!(BtrfsGetSubvolInfoArgs, flags, Out, FieldKind::Flags64(BTRFS_SUBVOL_FLAGS)),
        field!(BtrfsGetSubvolInfoArgs, uuid, Out, FieldKind::Uuid),
        field!(BtrfsGetSubvolInfoArgs, parent_uuid, Out, FieldKind::Uuid),
        field!(BtrfsGetSubvolInfoArgs, received_uuid, Out, FieldKind::Uuid),
        field!(BtrfsGetSubvolInfoArgs, ctransid, Out, FieldKind::U64),
        field!(BtrfsGetSubvolInfoArgs, otransid, Out, FieldKind::U64),
        field!(BtrfsGetSubvolInfoArgs, stransid, Out, FieldKind::U64),
        field!(BtrfsGetSubvolInfoArgs, rtransid, Out, FieldKind::U64),
        field!(BtrfsGetSubvolInfoArgs, ctime, Out, FieldKind::Struct(&TIMESPEC)),
        field!(BtrfsGetSubvolInfoArgs, otime, Out, FieldKind::Struct(&TIMESPEC)),
        field!(BtrfsGetSubvolInfoArgs, stime, Out, FieldKind::Struct(&TIMESPEC)),
        field!(BtrfsGetSubvolInfoArgs, rtime, Out, FieldKind::Struct(&TIMESPEC)),
    ],
};

pub static DEFRAG_RANGE: Layout = Layout {
    name: "btrfs_ioctl_defrag_range_args",
    size: size_of::<BtrfsDefragRangeArgs>(),
    fields: &[
        field!(BtrfsDefragRangeArgs, start, In, FieldKind::U64),
        field!(BtrfsDefragRangeArgs, len, In, FieldKind::U64),
        field!(BtrfsDefragRangeArgs, flags, In, FieldKind::Flags64(BTRFS_DEFRAG_FLAGS)),
        field!(BtrfsDefragRangeArgs, extent_thresh, In, FieldKind::U32),
        field!(
            BtrfsDefragRangeArgs,
            compress_type,
            In,
            FieldKind::Xval32(BTRFS_COMPRESS_TYPES)
        ),
    ],
};

pub static LAYOUTS: &[&Layout] = &[
    &VOL_ARGS,
    &VOL_ARGS_V2_HEAD,
    &QGROUP_LIMIT,
    &QGROUP_INHERIT,
    &CLONE_RANGE,
    &SPACE_ARGS,
    &SPACE_INFO,
    &SCRUB_PROGRESS,
    &SCRUB,
    &SCRUB_STATUS,
    &DEV_INFO,
    &FS_INFO,
    &BALANCE_ARGS,
    &BALANCE_PROGRESS,
    &BALANCE,
    &BALANCE_STATUS,
    &INO_LOOKUP,
    &INO_PATH,
    &LOGICAL_INO,
    &DATA_CONTAINER,
    &LOGICAL_INO_ITEM,
    &SEND_HEAD,
    &SEND_TAIL,
    &QUOTA_CTL,
    &QGROUP_ASSIGN,
    &QGROUP_CREATE,
    &QGROUP_LIMIT_ARGS,
    &QUOTA_RESCAN,
    &QUOTA_RESCAN_STATUS,
    &DEV_STATS,
    &DEV_REPLACE_START,
    &DEV_REPLACE_STATUS,
    &SAME_ARGS,
    &SAME_EXTENT_INFO,
    &FEATURE_FLAGS,
    &GET_FEATURES,
    &SET_FEATURES,
    &GET_SUPPORTED_FEATURES,
    &SEARCH_KEY,
    &SEARCH_HEADER,
    &SEARCH,
    &SEARCH_V2,
    &TIMESPEC,
    &RECEIVED_SUBVOL,
    &SUBVOL_INFO,
    &DEFRAG_RANGE,
];

/// Requests fully described by one layout.
fn plain_layout(cmd: BtrfsIoctl) -> Option<&'static Layout> {
    use BtrfsIoctl::*;

    let layout = match cmd {
        SnapCreate | Defrag | Resize | ScanDev | ForgetDev | AddDev | RmDev | Balance
        | SubvolCreate | SnapDestroy | DevicesReady => &VOL_ARGS,
        CloneRange => &CLONE_RANGE,
        DefragRange => &DEFRAG_RANGE,
        InoLookup => &INO_LOOKUP,
        Scrub => &SCRUB,
        ScrubProgress => &SCRUB_STATUS,
        DevInfo => &DEV_INFO,
        BalanceV2 => &BALANCE,
        BalanceProgress => &BALANCE_STATUS,
        SetReceivedSubvol => &RECEIVED_SUBVOL,
        QuotaCtl => &QUOTA_CTL,
        QgroupAssign => &QGROUP_ASSIGN,
        QgroupCreate => &QGROUP_CREATE,
        QgroupLimit => &QGROUP_LIMIT_ARGS,
        QuotaRescan => &QUOTA_RESCAN,
        QuotaRescanStatus => &QUOTA_RESCAN_STATUS,
        GetFeatures => &GET_FEATURES,
        SetFeatures => &SET_FEATURES,
        GetSupportedFeatures => &GET_SUPPORTED_FEATURES,
        GetSubvolInfo => &SUBVOL_INFO,
        _ => return None,
    };
    Some(layout)
}

/// The union after `cmd` and `result` in `btrfs_ioctl_dev_replace_args`.
enum ReplaceParams<'a> {
    Start(RawStruct<'a>),
    Status(RawStruct<'a>),
    Cancel,
    Unknown(&'a [u8]),
}

impl<'a> ReplaceParams<'a> {
    fn decode(raw: &RawStruct<'a>) -> Self {
        let union = raw.sub(DEV_REPLACE_UNION_OFFSET, DEV_REPLACE_UNION_SIZE);
        match raw.u64(offset_of!(BtrfsDevReplaceArgs, cmd)) {
            BTRFS_IOCTL_DEV_REPLACE_CMD_START => ReplaceParams::Start(union),
            BTRFS_IOCTL_DEV_REPLACE_CMD_STATUS => ReplaceParams::Status(union),
            BTRFS_IOCTL_DEV_REPLACE_CMD_CANCEL => ReplaceParams::Cancel,
            _ => ReplaceParams::Unknown(union.as_bytes()),
        }
    }
}

fn print_dev_replace_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<DecodeStatus> {
    let len = size_of::<BtrfsDevReplaceArgs>();
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, len)? else {
        return Ok(DecodeStatus::Complete);
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    sf.push_depth(b"{")?;
    argf!(
        sf,
        "cmd: {}",
        cx.xval(raw.u64(offset_of!(BtrfsDevReplaceArgs, cmd)), BTRFS_DEV_REPLACE_CMDS)
    );

    match ReplaceParams::decode(&raw) {
        ReplaceParams::Start(params) => {
            arg!(sf, "start:");
            with_struct!(sf, print_all_fields(sf, cx, &DEV_REPLACE_START, &params)?;);
        }
        ReplaceParams::Status(_) | ReplaceParams::Cancel => {}
        ReplaceParams::Unknown(bytes) => argf!(sf, "params: {}", cx.hex(bytes)),
    }

    occ.set_private(Snapshot { addr, bytes });
    Ok(DecodeStatus::NeedsExit)
}

fn print_dev_replace_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    let Some(snapshot) = occ.take_private::<Snapshot>() else {
        return Ok(());
    };

    if !occ.failed() {
        if let Some(bytes) = refetch(cx, sf, &snapshot)? {
            let raw = RawStruct::new(&bytes);
            argf!(
                sf,
                "result: {}",
                cx.xval(
                    raw.u64(offset_of!(BtrfsDevReplaceArgs, result)),
                    BTRFS_DEV_REPLACE_RESULTS
                )
            );
            // The command is the caller's; the kernel never rewrites it.
            if let ReplaceParams::Status(params) = ReplaceParams::decode(&snapshot.raw()) {
                let params = raw.sub(DEV_REPLACE_UNION_OFFSET, params.len());
                arg!(sf, "status:");
                with_struct!(sf, print_all_fields(sf, cx, &DEV_REPLACE_STATUS, &params)?;);
            }
        }
    }

    sf.pop_depth(b"}")
}

/// `qgroup_inherit` of the v2 volume arguments, with its trailing id array.
fn print_qgroup_inherit(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<()> {
    let size = size_of::<BtrfsQgroupInherit>();
    let Some(bytes) = fetch_or_print(cx, sf, "qgroup_inherit", addr, size)? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "qgroup_inherit:");
    with_struct!(sf,
        print_all_fields(sf, cx, &QGROUP_INHERIT, &raw)?;
        let count = raw.u64(offset_of!(BtrfsQgroupInherit, num_qgroups));
        print_array(
            cx,
            sf,
            "qgroups",
            addr.saturating_add(size as u64),
            count,
            8,
            print_u64_elem,
        )?;
    );
    Ok(())
}

fn print_vol_args_v2(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<BtrfsVolArgsV2>())? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);
    let flags = raw.u64(offset_of!(BtrfsVolArgsV2, flags));
    let name = offset_of!(BtrfsVolArgsV2, name);

    arg!(sf, "arg:");
    with_struct!(sf,
        print_entry_fields(sf, cx, &VOL_ARGS_V2_HEAD, &raw)?;

        if flags & BTRFS_SUBVOL_QGROUP_INHERIT != 0 {
            argf!(sf, "size: {}", raw.u64(offset_of!(BtrfsVolArgsV2, size)));
            print_qgroup_inherit(cx, sf, raw.u64(offset_of!(BtrfsVolArgsV2, qgroup_inherit)))?;
        }

        // The name slot doubles as a device or subvolume id.
        if flags & BTRFS_DEVICE_SPEC_BY_ID != 0 {
            argf!(sf, "devid: {}", raw.u64(name));
        } else if flags & BTRFS_SUBVOL_SPEC_BY_ID != 0 {
            argf!(sf, "subvolid: {}", raw.u64(name));
        } else {
            argf!(sf, "name: {}", cx.cstr(raw.bytes(name, BTRFS_SUBVOL_NAME_MAX + 1)));
        }
    );
    Ok(())
}

fn print_space_info(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let slots = old.u64(offset_of!(BtrfsSpaceArgs, space_slots));
    if slots == 0 {
        // Only asking how many there are.
        return Ok(());
    }

    // total_spaces is how many the kernel has; it only fills the slots the
    // caller made room for.
    let count = slots.min(new.u64(offset_of!(BtrfsSpaceArgs, total_spaces)));
    print_array(
        cx,
        sf,
        "spaces",
        addr.saturating_add(size_of::<BtrfsSpaceArgs>() as u64),
        count,
        size_of::<BtrfsSpaceInfo>(),
        |cx, sf, elem, _| {
            print_element(sf, cx, &SPACE_INFO, &RawStruct::new(elem))?;
            Ok(true)
        },
    )?;
    Ok(())
}

#[derive(Clone, Copy)]
enum Container {
    Paths,
    Inodes,
}

fn print_data_container(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    kind: Container,
) -> Result<()> {
    let header = size_of::<BtrfsDataContainer>();
    let Some(bytes) = fetch_or_print(cx, sf, label, addr, header)? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);
    let count = u64::from(raw.u32(offset_of!(BtrfsDataContainer, elem_cnt)));
    let val = addr.saturating_add(header as u64);

    argf!(sf, "{label}:");
    with_struct!(sf,
        print_all_fields(sf, cx, &DATA_CONTAINER, &raw)?;
        match kind {
            // Each entry is the offset of a path from the start of `val`.
            Container::Paths => print_array(cx, sf, "val", val, count, 8, |cx, sf, elem, _| {
                let offset = RawStruct::new(elem).u64(0);
                match val.checked_add(offset) {
                    Some(path) => argf!(sf, "{}", cx.string_at(path)),
                    None => argf!(sf, "0x{offset:x}"),
                }
                Ok(true)
            })?,
            Container::Inodes => print_array(cx, sf, "val", val, count / 3, 24, |cx, sf, elem, _| {
                print_element(sf, cx, &LOGICAL_INO_ITEM, &RawStruct::new(elem))?;
                Ok(true)
            })?,
        };
    );
    Ok(())
}

fn print_ino_paths(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    _new: &RawStruct<'_>,
) -> Result<()> {
    let fspath = old.u64(offset_of!(BtrfsInoPathArgs, fspath));
    print_data_container(cx, sf, "fspath", fspath, Container::Paths)
}

fn print_logical_ino(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    _new: &RawStruct<'_>,
) -> Result<()> {
    let inodes = old.u64(offset_of!(BtrfsLogicalInoArgs, inodes));
    print_data_container(cx, sf, "inodes", inodes, Container::Inodes)
}

fn print_dev_stats(
    _cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let nr_items = offset_of!(BtrfsGetDevStats, nr_items);
    let values = offset_of!(BtrfsGetDevStats, values);
    let count = old
        .u64(nr_items)
        .min(new.u64(nr_items))
        .min(BTRFS_DEV_STAT_VALUES_MAX as u64) as usize;

    arg!(sf, "values:");
    with_struct!(sf,
        for (idx, name) in BTRFS_DEV_STAT_NAMES.iter().enumerate().take(count) {
            argf!(sf, "{name}: {}", new.u64(values + idx * 8));
        }
    );
    Ok(())
}

fn print_same_info(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
    old: &RawStruct<'_>,
    _new: &RawStruct<'_>,
) -> Result<()> {
    let count = old.u16(offset_of!(BtrfsSameArgs, dest_count));
    print_array(
        cx,
        sf,
        "info",
        addr.saturating_add(size_of::<BtrfsSameArgs>() as u64),
        u64::from(count),
        size_of::<BtrfsSameExtentInfo>(),
        |cx, sf, elem, _| {
            print_element(sf, cx, &SAME_EXTENT_INFO, &RawStruct::new(elem))?;
            Ok(true)
        },
    )?;
    Ok(())
}

/// `btrfs_ioctl_search_header`s, each followed by `len` bytes of item data.
fn print_search_results(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    buf: &RawStruct<'_>,
    count: u32,
) -> Result<()> {
    if count == 0 {
        arg!(sf, "buf: []");
        return Ok(());
    }

    let header = size_of::<BtrfsSearchHeader>();
    let len_offset = offset_of!(BtrfsSearchHeader, len);
    let cap = element_cap(cx);
    let mut pos = 0usize;

    arg!(sf, "buf:");
    with_array!(sf,
        for idx in 0..count as usize {
            // `count` comes from the kernel; the records must also fit.
            if idx >= cap || !buf.covers(pos, header) {
                arg!(sf, "...");
                break;
            }
            let item = buf.sub(pos, header);
            print_element(sf, cx, &SEARCH_HEADER, &item)?;
            pos = pos
                .saturating_add(header)
                .saturating_add(item.u32(len_offset) as usize);
        }
    );
    Ok(())
}

fn print_tree_search(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    _old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let nr_items = new.u32(offset_of!(BtrfsSearchKey, nr_items));
    let buf = new.sub(offset_of!(BtrfsSearchArgs, buf), BTRFS_SEARCH_ARGS_BUFSIZE);
    print_search_results(cx, sf, &buf, nr_items)
}

/// Largest v2 result buffer read back.
const SEARCH_V2_MAX_BUF: u64 = 64 * 1024;

fn print_tree_search_v2(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let nr_items = new.u32(offset_of!(BtrfsSearchKey, nr_items));
    let buf_size = offset_of!(BtrfsSearchArgsV2, buf_size);
    let len = old
        .u64(buf_size)
        .min(new.u64(buf_size))
        .min(SEARCH_V2_MAX_BUF) as usize;

    let base = addr.saturating_add(size_of::<BtrfsSearchArgsV2>() as u64);
    let Some(bytes) = fetch_or_print(cx, sf, "buf", base, len)? else {
        return Ok(());
    };
    print_search_results(cx, sf, &RawStruct::new(&bytes), nr_items)
}

fn print_fs_info(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    let Some(snapshot) = occ.take_private::<Snapshot>() else {
        return Ok(());
    };
    let old = snapshot.raw();

    if occ.failed() {
        print_saved_fields(sf, cx, &FS_INFO, &old)?;
    } else if let Some(bytes) = refetch(cx, sf, &snapshot)? {
        let new = RawStruct::new(&bytes);
        // The kernel acknowledges in `flags` which optional parts it filled.
        let flags = new.u64(offset_of!(BtrfsFsInfoArgs, flags));

        for field in FS_INFO.present(&new) {
            let gate = match field.name {
                "csum_type" | "csum_size" => BTRFS_FS_INFO_FLAG_CSUM_INFO,
                "generation" => BTRFS_FS_INFO_FLAG_GENERATION,
                "metadata_uuid" => BTRFS_FS_INFO_FLAG_METADATA_UUID,
                _ => 0,
            };
            if flags & gate != gate {
                continue;
            }

            match field.dir {
                Dir::InOut => print_field_diff(sf, cx, &old, &new, field)?,
                _ => print_field(sf, cx, &new, field)?,
            }
        }
    }

    sf.pop_depth(b"}")
}

fn print_send(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<BtrfsSendArgs>())? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    with_struct!(sf,
        print_all_fields(sf, cx, &SEND_HEAD, &raw)?;
        print_array(
            cx,
            sf,
            "clone_sources",
            raw.u64(offset_of!(BtrfsSendArgs, clone_sources)),
            raw.u64(offset_of!(BtrfsSendArgs, clone_sources_count)),
            8,
            print_u64_elem,
        )?;
        print_all_fields(sf, cx, &SEND_TAIL, &raw)?;
    );
    Ok(())
}

fn print_label(cx: &DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<()> {
    if let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, BTRFS_LABEL_SIZE)? {
        argf!(sf, "arg: {}", cx.cstr(&bytes));
    }
    Ok(())
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    request: u32,
    arg: u64,
) -> Result<Option<DecodeStatus>> {
    let cmd = BtrfsIoctl::from_code(request);
    let Some(name) = cmd.name() else {
        return Ok(None);
    };
    trace!("btrfs {name}");

    argf!(sf, "request: {name}");

    if let Some(layout) = plain_layout(cmd) {
        return decode_struct_entry(cx, occ, sf, "arg", arg, layout).map(Some);
    }

    use BtrfsIoctl::*;
    let status = match cmd {
        TransStart | TransEnd | Sync | ScrubCancel | QuotaRescanWait => DecodeStatus::Complete,
        Clone => {
            argf!(sf, "arg: {}", cx.fd(arg as i32));
            DecodeStatus::Complete
        }
        BalanceCtl => {
            argf!(sf, "arg: {}", cx.xval(arg, BTRFS_BALANCE_CTL_CMDS));
            DecodeStatus::Complete
        }
        DefaultSubvol | WaitSync => {
            print_pointee(cx, sf, arg, 8, render_u64)?;
            DecodeStatus::Complete
        }
        SubvolSetflags => {
            print_pointee(cx, sf, arg, 8, render_subvol_flags)?;
            DecodeStatus::Complete
        }
        StartSync | SubvolGetflags | GetFslabel => defer_pointee(sf, arg)?,
        SetFslabel => {
            print_label(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        SnapCreateV2 | SubvolCreateV2 | RmDevV2 | SnapDestroyV2 => {
            print_vol_args_v2(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        Send => {
            print_send(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        SpaceInfo => enter_struct(cx, occ, sf, "arg", arg, &SPACE_ARGS)?,
        FsInfo => enter_struct(cx, occ, sf, "arg", arg, &FS_INFO)?,
        InoPaths => enter_struct(cx, occ, sf, "arg", arg, &INO_PATH)?,
        LogicalIno | LogicalInoV2 => enter_struct(cx, occ, sf, "arg", arg, &LOGICAL_INO)?,
        GetDevStats => enter_struct(cx, occ, sf, "arg", arg, &DEV_STATS)?,
        FileExtentSame => enter_struct(cx, occ, sf, "arg", arg, &SAME_ARGS)?,
        TreeSearch => enter_struct(cx, occ, sf, "arg", arg, &SEARCH)?,
        TreeSearchV2 => enter_struct(cx, occ, sf, "arg", arg, &SEARCH_V2)?,
        DevReplace => print_dev_replace_entry(cx, occ, sf, arg)?,
        _ => {
            argf!(sf, "arg: {}", format_addr(arg));
            DecodeStatus::Complete
        }
    };

    Ok(Some(status))
}

pub fn decode_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    request: u32,
    arg: u64,
) -> Result<()> {
    let cmd = BtrfsIoctl::from_code(request);

    if let Some(layout) = plain_layout(cmd) {
        return decode_struct_exit(cx, occ, sf, layout);
    }

    use BtrfsIoctl::*;
    match cmd {
        StartSync => print_pointee_exit(cx, occ, sf, arg, 8, render_u64),
        SubvolGetflags => print_pointee_exit(cx, occ, sf, arg, 8, render_subvol_flags),
        GetFslabel if occ.failed() => {
            argf!(sf, "arg: {}", format_addr(arg));
            Ok(())
        }
        GetFslabel => print_label(cx, sf, arg),
        SpaceInfo => exit_struct(cx, occ, sf, &SPACE_ARGS, print_space_info),
        FsInfo => print_fs_info(cx, occ, sf),
        InoPaths => exit_struct(cx, occ, sf, &INO_PATH, print_ino_paths),
        LogicalIno | LogicalInoV2 => exit_struct(cx, occ, sf, &LOGICAL_INO, print_logical_ino),
        GetDevStats => exit_struct(cx, occ, sf, &DEV_STATS, print_dev_stats),
        FileExtentSame => exit_struct(cx, occ, sf, &SAME_ARGS, print_same_info),
        TreeSearch => exit_struct(cx, occ, sf, &SEARCH, print_tree_search),
        TreeSearchV2 => exit_struct(cx, occ, sf, &SEARCH_V2, print_tree_search_v2),
        DevReplace => print_dev_replace_exit(cx, occ, sf),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_codes_are_distinct() {
        for (idx, &(code, name)) in BtrfsIoctl::KNOWN.iter().enumerate() {
            assert_eq!(BtrfsIoctl::from_code(code).name(), Some(name));
            assert!(
                BtrfsIoctl::KNOWN[idx + 1..].iter().all(|&(other, _)| other != code),
                "{name} shares its code"
            );
        }
    }

    #[test]
    fn output_only_requests_wait_for_exit() {
        assert!(QUOTA_RESCAN_STATUS.is_output_only());
        assert!(GET_FEATURES.is_output_only());
        assert!(SUBVOL_INFO.is_output_only());
        assert!(!QGROUP_LIMIT_ARGS.has_exit_fields());
        assert!(!FS_INFO.is_output_only());
    }
}
