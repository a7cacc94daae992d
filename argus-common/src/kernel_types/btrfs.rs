// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use crate::ioctl::{io, ior, iow, iowr};

pub const BTRFS_IOCTL_MAGIC: u8 = 0x94;

pub const BTRFS_PATH_NAME_MAX: usize = 4087;
pub const BTRFS_SUBVOL_NAME_MAX: usize = 4039;
pub const BTRFS_VOL_NAME_MAX: usize = 255;
pub const BTRFS_LABEL_SIZE: usize = 256;
pub const BTRFS_UUID_SIZE: usize = 16;
pub const BTRFS_FSID_SIZE: usize = 16;
pub const BTRFS_DEVICE_PATH_NAME_MAX: usize = 1024;
pub const BTRFS_INO_LOOKUP_PATH_MAX: usize = 4080;
pub const BTRFS_SEARCH_ARGS_BUFSIZE: usize = 4096 - 104;
pub const BTRFS_DEV_STAT_VALUES_MAX: usize = 5;

pub const BTRFS_SUBVOL_RDONLY: u64 = 1 << 1;
pub const BTRFS_SUBVOL_QGROUP_INHERIT: u64 = 1 << 2;
pub const BTRFS_DEVICE_SPEC_BY_ID: u64 = 1 << 3;
pub const BTRFS_SUBVOL_SPEC_BY_ID: u64 = 1 << 4;

pub const BTRFS_FS_INFO_FLAG_CSUM_INFO: u64 = 1 << 0;
pub const BTRFS_FS_INFO_FLAG_GENERATION: u64 = 1 << 1;
pub const BTRFS_FS_INFO_FLAG_METADATA_UUID: u64 = 1 << 2;

pub const BTRFS_IOCTL_DEV_REPLACE_CMD_START: u64 = 0;
pub const BTRFS_IOCTL_DEV_REPLACE_CMD_STATUS: u64 = 1;
pub const BTRFS_IOCTL_DEV_REPLACE_CMD_CANCEL: u64 = 2;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsVolArgs {
    pub fd: i64,
    pub name: [u8; BTRFS_PATH_NAME_MAX + 1],
}

/// The first union holds `size` and `qgroup_inherit` when
/// `BTRFS_SUBVOL_QGROUP_INHERIT` is set; the second one is either a name or,
/// with one of the `*_SPEC_BY_ID` flags, a device or subvolume id.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsVolArgsV2 {
    pub fd: i64,
    pub transid: u64,
    pub flags: u64,
    pub size: u64,
    pub qgroup_inherit: u64,
    pub _unused: [u64; 2],
    pub name: [u8; BTRFS_SUBVOL_NAME_MAX + 1],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsQgroupLimit {
    pub flags: u64,
    pub max_rfer: u64,
    pub max_excl: u64,
    pub rsv_rfer: u64,
    pub rsv_excl: u64,
}

/// Followed in memory by `num_qgroups + 2 * (num_ref_copies + num_excl_copies)`
/// qgroup ids.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsQgroupInherit {
    pub flags: u64,
    pub num_qgroups: u64,
    pub num_ref_copies: u64,
    pub num_excl_copies: u64,
    pub lim: BtrfsQgroupLimit,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsCloneRangeArgs {
    pub src_fd: i64,
    pub src_offset: u64,
    pub src_length: u64,
    pub dest_offset: u64,
}

/// Followed inline by `total_spaces` [`BtrfsSpaceInfo`] records.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSpaceArgs {
    pub space_slots: u64,
    pub total_spaces: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSpaceInfo {
    pub flags: u64,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsScrubProgress {
    pub data_extents_scrubbed: u64,
    pub tree_extents_scrubbed: u64,
    pub data_bytes_scrubbed: u64,
    pub tree_bytes_scrubbed: u64,
    pub read_errors: u64,
    pub csum_errors: u64,
    pub verify_errors: u64,
    pub no_csum: u64,
    pub csum_discards: u64,
    pub super_errors: u64,
    pub malloc_errors: u64,
    pub uncorrectable_errors: u64,
    pub corrected_errors: u64,
    pub last_physical: u64,
    pub unverified_errors: u64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsScrubArgs {
    pub devid: u64,
    pub start: u64,
    pub end: u64,
    pub flags: u64,
    pub progress: BtrfsScrubProgress,
    pub _unused: [u64; 109],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsDevInfoArgs {
    pub devid: u64,
    pub uuid: [u8; BTRFS_UUID_SIZE],
    pub bytes_used: u64,
    pub total_bytes: u64,
    pub fsid: [u8; BTRFS_UUID_SIZE],
    pub _unused: [u64; 377],
    pub path: [u8; BTRFS_DEVICE_PATH_NAME_MAX],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsFsInfoArgs {
    pub max_id: u64,
    pub num_devices: u64,
    pub fsid: [u8; BTRFS_FSID_SIZE],
    pub nodesize: u32,
    pub sectorsize: u32,
    pub clone_alignment: u32,
    pub csum_type: u16,
    pub csum_size: u16,
    pub flags: u64,
    pub generation: u64,
    pub metadata_uuid: [u8; BTRFS_FSID_SIZE],
    pub _reserved: [u8; 944],
}

/// `usage` and `limit` are unions with `{min, max}` u32 pairs selected by the
/// `*_RANGE` filter flags.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsBalanceArgs {
    pub profiles: u64,
    pub usage: u64,
    pub devid: u64,
    pub pstart: u64,
    pub pend: u64,
    pub vstart: u64,
    pub vend: u64,
    pub target: u64,
    pub flags: u64,
    pub limit: u64,
    pub stripes_min: u32,
    pub stripes_max: u32,
    pub _unused: [u64; 6],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsBalanceProgress {
    pub expected: u64,
    pub considered: u64,
    pub completed: u64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsIoctlBalanceArgs {
    pub flags: u64,
    pub state: u64,
    pub data: BtrfsBalanceArgs,
    pub meta: BtrfsBalanceArgs,
    pub sys: BtrfsBalanceArgs,
    pub stat: BtrfsBalanceProgress,
    pub _unused: [u64; 72],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsInoLookupArgs {
    pub treeid: u64,
    pub objectid: u64,
    pub name: [u8; BTRFS_INO_LOOKUP_PATH_MAX],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsInoPathArgs {
    pub inum: u64,
    pub size: u64,
    pub _reserved: [u64; 4],
    pub fspath: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsLogicalInoArgs {
    pub logical: u64,
    pub size: u64,
    pub _reserved: [u64; 3],
    pub flags: u64,
    pub inodes: u64,
}

/// Header of the result buffer of `INO_PATHS` and `LOGICAL_INO`; `elem_cnt`
/// u64 values follow.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsDataContainer {
    pub bytes_left: u32,
    pub bytes_missing: u32,
    pub elem_cnt: u32,
    pub elem_missed: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSendArgs {
    pub send_fd: i64,
    pub clone_sources_count: u64,
    pub clone_sources: u64,
    pub parent_root: u64,
    pub flags: u64,
    pub version: u32,
    pub _reserved: [u8; 28],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsQuotaCtlArgs {
    pub cmd: u64,
    pub status: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsQgroupAssignArgs {
    pub assign: u64,
    pub src: u64,
    pub dst: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsQgroupCreateArgs {
    pub create: u64,
    pub qgroupid: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsQgroupLimitArgs {
    pub qgroupid: u64,
    pub lim: BtrfsQgroupLimit,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsQuotaRescanArgs {
    pub flags: u64,
    pub progress: u64,
    pub _reserved: [u64; 6],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsGetDevStats {
    pub devid: u64,
    pub nr_items: u64,
    pub flags: u64,
    pub values: [u64; BTRFS_DEV_STAT_VALUES_MAX],
    pub _unused: [u64; 128 - 2 - BTRFS_DEV_STAT_VALUES_MAX],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsDevReplaceStartParams {
    pub srcdevid: u64,
    pub cont_reading_from_srcdev_mode: u64,
    pub srcdev_name: [u8; BTRFS_DEVICE_PATH_NAME_MAX + 1],
    pub tgtdev_name: [u8; BTRFS_DEVICE_PATH_NAME_MAX + 1],
    pub _pad: [u8; 6],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsDevReplaceStatusParams {
    pub replace_state: u64,
    pub progress_1000: u64,
    pub time_started: u64,
    pub time_stopped: u64,
    pub num_write_errors: u64,
    pub num_uncorrectable_read_errors: u64,
}

/// `start` and `status` overlap; `cmd` selects which one is meaningful.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsDevReplaceArgs {
    pub cmd: u64,
    pub result: u64,
    pub start: BtrfsDevReplaceStartParams,
    pub _spare: [u64; 64],
}

pub const DEV_REPLACE_UNION_OFFSET: usize = 16;
pub const DEV_REPLACE_UNION_SIZE: usize = core::mem::size_of::<BtrfsDevReplaceStartParams>();

/// Followed by `dest_count` [`BtrfsSameExtentInfo`] records.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSameArgs {
    pub logical_offset: u64,
    pub length: u64,
    pub dest_count: u16,
    pub _reserved1: u16,
    pub _reserved2: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSameExtentInfo {
    pub fd: i64,
    pub logical_offset: u64,
    pub bytes_deduped: u64,
    pub status: i32,
    pub _reserved: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsFeatureFlags {
    pub compat_flags: u64,
    pub compat_ro_flags: u64,
    pub incompat_flags: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSearchKey {
    pub tree_id: u64,
    pub min_objectid: u64,
    pub max_objectid: u64,
    pub min_offset: u64,
    pub max_offset: u64,
    pub min_transid: u64,
    pub max_transid: u64,
    pub min_type: u32,
    pub max_type: u32,
    pub nr_items: u32,
    pub _unused: u32,
    pub _unused1: u64,
    pub _unused2: u64,
    pub _unused3: u64,
    pub _unused4: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSearchHeader {
    pub transid: u64,
    pub objectid: u64,
    pub offset: u64,
    pub item_type: u32,
    pub len: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsSearchArgs {
    pub key: BtrfsSearchKey,
    pub buf: [u8; BTRFS_SEARCH_ARGS_BUFSIZE],
}

/// Followed by `buf_size` bytes of result records.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsSearchArgsV2 {
    pub key: BtrfsSearchKey,
    pub buf_size: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsTimespec {
    pub sec: u64,
    pub nsec: u32,
    pub _pad: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsReceivedSubvolArgs {
    pub uuid: [u8; BTRFS_UUID_SIZE],
    pub stransid: u64,
    pub rtransid: u64,
    pub stime: BtrfsTimespec,
    pub rtime: BtrfsTimespec,
    pub flags: u64,
    pub _reserved: [u64; 16],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct BtrfsGetSubvolInfoArgs {
    pub treeid: u64,
    pub name: [u8; BTRFS_VOL_NAME_MAX + 1],
    pub parent_id: u64,
    pub dirid: u64,
    pub generation: u64,
    pub flags: u64,
    pub uuid: [u8; BTRFS_UUID_SIZE],
    pub parent_uuid: [u8; BTRFS_UUID_SIZE],
    pub received_uuid: [u8; BTRFS_UUID_SIZE],
    pub ctransid: u64,
    pub otransid: u64,
    pub stransid: u64,
    pub rtransid: u64,
    pub ctime: BtrfsTimespec,
    pub otime: BtrfsTimespec,
    pub stime: BtrfsTimespec,
    pub rtime: BtrfsTimespec,
    pub _reserved: [u64; 8],
}

/// `struct btrfs_ioctl_defrag_range_args`; kept so `BTRFS_IOC_DEFRAG_RANGE`
/// is recognized as btrfs even though it has no dedicated renderer.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct BtrfsDefragRangeArgs {
    pub start: u64,
    pub len: u64,
    pub flags: u64,
    pub extent_thresh: u32,
    pub compress_type: u32,
    pub _unused: [u32; 4],
}

const M: u8 = BTRFS_IOCTL_MAGIC;
const VOL: usize = core::mem::size_of::<BtrfsVolArgs>();
const VOL2: usize = core::mem::size_of::<BtrfsVolArgsV2>();
const U64: usize = core::mem::size_of::<u64>();
const INT: usize = core::mem::size_of::<i32>();

pub const BTRFS_IOC_SNAP_CREATE: u32 = iow(M, 1, VOL);
pub const BTRFS_IOC_DEFRAG: u32 = iow(M, 2, VOL);
pub const BTRFS_IOC_RESIZE: u32 = iow(M, 3, VOL);
pub const BTRFS_IOC_SCAN_DEV: u32 = iow(M, 4, VOL);
pub const BTRFS_IOC_FORGET_DEV: u32 = iow(M, 5, VOL);
pub const BTRFS_IOC_TRANS_START: u32 = io(M, 6);
pub const BTRFS_IOC_TRANS_END: u32 = io(M, 7);
pub const BTRFS_IOC_SYNC: u32 = io(M, 8);
pub const BTRFS_IOC_CLONE: u32 = iow(M, 9, INT);
pub const BTRFS_IOC_ADD_DEV: u32 = iow(M, 10, VOL);
pub const BTRFS_IOC_RM_DEV: u32 = iow(M, 11, VOL);
pub const BTRFS_IOC_BALANCE: u32 = iow(M, 12, VOL);
pub const BTRFS_IOC_CLONE_RANGE: u32 = iow(M, 13, core::mem::size_of::<BtrfsCloneRangeArgs>());
pub const BTRFS_IOC_SUBVOL_CREATE: u32 = iow(M, 14, VOL);
pub const BTRFS_IOC_SNAP_DESTROY: u32 = iow(M, 15, VOL);
pub const BTRFS_IOC_DEFRAG_RANGE: u32 = iow(M, 16, core::mem::size_of::<BtrfsDefragRangeArgs>());
pub const BTRFS_IOC_TREE_SEARCH: u32 = iowr(M, 17, core::mem::size_of::<BtrfsSearchArgs>());
pub const BTRFS_IOC_TREE_SEARCH_V2: u32 = iowr(M, 17, core::mem::size_of::<BtrfsSearchArgsV2>());
pub const BTRFS_IOC_INO_LOOKUP: u32 = iowr(M, 18, core::mem::size_of::<BtrfsInoLookupArgs>());
pub const BTRFS_IOC_DEFAULT_SUBVOL: u32 = iow(M, 19, U64);
pub const BTRFS_IOC_SPACE_INFO: u32 = iowr(M, 20, core::mem::size_of::<BtrfsSpaceArgs>());
pub const BTRFS_IOC_WAIT_SYNC: u32 = iow(M, 22, U64);
pub const BTRFS_IOC_SNAP_CREATE_V2: u32 = iow(M, 23, VOL2);
pub const BTRFS_IOC_START_SYNC: u32 = ior(M, 24, U64);
pub const BTRFS_IOC_SUBVOL_CREATE_V2: u32 = iow(M, 24, VOL2);
pub const BTRFS_IOC_SUBVOL_GETFLAGS: u32 = ior(M, 25, U64);
pub const BTRFS_IOC_SUBVOL_SETFLAGS: u32 = iow(M, 26, U64);
pub const BTRFS_IOC_SCRUB: u32 = iowr(M, 27, core::mem::size_of::<BtrfsScrubArgs>());
pub const BTRFS_IOC_SCRUB_CANCEL: u32 = io(M, 28);
pub const BTRFS_IOC_SCRUB_PROGRESS: u32 = iowr(M, 29, core::mem::size_of::<BtrfsScrubArgs>());
pub const BTRFS_IOC_DEV_INFO: u32 = iowr(M, 30, core::mem::size_of::<BtrfsDevInfoArgs>());
pub const BTRFS_IOC_FS_INFO: u32 = ior(M, 31, core::mem::size_of::<BtrfsFsInfoArgs>());
pub const BTRFS_IOC_BALANCE_V2: u32 = iowr(M, 32, core::mem::size_of::<BtrfsIoctlBalanceArgs>());
pub const BTRFS_IOC_BALANCE_CTL: u32 = iow(M, 33, INT);
pub const BTRFS_IOC_BALANCE_PROGRESS: u32 = ior(M, 34, core::mem::size_of::<BtrfsIoctlBalanceArgs>());
pub const BTRFS_IOC_INO_PATHS: u32 = iowr(M, 35, core::mem::size_of::<BtrfsInoPathArgs>());
pub const BTRFS_IOC_LOGICAL_INO: u32 = iowr(M, 36, core::mem::size_of::<BtrfsLogicalInoArgs>());
pub const BTRFS_IOC_SET_RECEIVED_SUBVOL: u32 =
    iowr(M, 37, core::mem::size_of::<BtrfsReceivedSubvolArgs>());
pub const BTRFS_IOC_SEND: u32 = iow(M, 38, core::mem::size_of::<BtrfsSendArgs>());
pub const BTRFS_IOC_DEVICES_READY: u32 = ior(M, 39, VOL);
pub const BTRFS_IOC_QUOTA_CTL: u32 = iowr(M, 40, core::mem::size_of::<BtrfsQuotaCtlArgs>());
pub const BTRFS_IOC_QGROUP_ASSIGN: u32 = iow(M, 41, core::mem::size_of::<BtrfsQgroupAssignArgs>());
pub const BTRFS_IOC_QGROUP_CREATE: u32 = iow(M, 42, core::mem::size_of::<BtrfsQgroupCreateArgs>());
pub const BTRFS_IOC_QGROUP_LIMIT: u32 = ior(M, 43, core::mem::size_of::<BtrfsQgroupLimitArgs>());
pub const BTRFS_IOC_QUOTA_RESCAN: u32 = iow(M, 44, core::mem::size_of::<BtrfsQuotaRescanArgs>());
pub const BTRFS_IOC_QUOTA_RESCAN_STATUS: u32 =
    ior(M, 45, core::mem::size_of::<BtrfsQuotaRescanArgs>());
pub const BTRFS_IOC_QUOTA_RESCAN_WAIT: u32 = io(M, 46);
pub const BTRFS_IOC_GET_FSLABEL: u32 = ior(M, 49, BTRFS_LABEL_SIZE);
pub const BTRFS_IOC_SET_FSLABEL: u32 = iow(M, 50, BTRFS_LABEL_SIZE);
pub const BTRFS_IOC_GET_DEV_STATS: u32 = iowr(M, 52, core::mem::size_of::<BtrfsGetDevStats>());
pub const BTRFS_IOC_DEV_REPLACE: u32 = iowr(M, 53, core::mem::size_of::<BtrfsDevReplaceArgs>());
pub const BTRFS_IOC_FILE_EXTENT_SAME: u32 = iowr(M, 54, core::mem::size_of::<BtrfsSameArgs>());
pub const BTRFS_IOC_GET_FEATURES: u32 = ior(M, 57, core::mem::size_of::<BtrfsFeatureFlags>());
pub const BTRFS_IOC_SET_FEATURES: u32 = iow(M, 57, 2 * core::mem::size_of::<BtrfsFeatureFlags>());
pub const BTRFS_IOC_GET_SUPPORTED_FEATURES: u32 =
    ior(M, 57, 3 * core::mem::size_of::<BtrfsFeatureFlags>());
pub const BTRFS_IOC_RM_DEV_V2: u32 = iow(M, 58, VOL2);
pub const BTRFS_IOC_LOGICAL_INO_V2: u32 = iowr(M, 59, core::mem::size_of::<BtrfsLogicalInoArgs>());
pub const BTRFS_IOC_GET_SUBVOL_INFO: u32 = ior(M, 60, core::mem::size_of::<BtrfsGetSubvolInfoArgs>());
pub const BTRFS_IOC_SNAP_DESTROY_V2: u32 = iow(M, 63, VOL2);
