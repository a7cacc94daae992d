// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use super::Xlat;

pub const BTRFS_SUBVOL_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_SUBVOL_CREATE_ASYNC"),
    (1 << 1, "BTRFS_SUBVOL_RDONLY"),
    (1 << 2, "BTRFS_SUBVOL_QGROUP_INHERIT"),
    (1 << 3, "BTRFS_DEVICE_SPEC_BY_ID"),
    (1 << 4, "BTRFS_SUBVOL_SPEC_BY_ID"),
];

pub const BTRFS_QGROUP_INHERIT_FLAGS: Xlat = &[(1 << 0, "BTRFS_QGROUP_INHERIT_SET_LIMITS")];

pub const BTRFS_QGROUP_LIMIT_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_QGROUP_LIMIT_MAX_RFER"),
    (1 << 1, "BTRFS_QGROUP_LIMIT_MAX_EXCL"),
    (1 << 2, "BTRFS_QGROUP_LIMIT_RSV_RFER"),
    (1 << 3, "BTRFS_QGROUP_LIMIT_RSV_EXCL"),
    (1 << 4, "BTRFS_QGROUP_LIMIT_RFER_CMPR"),
    (1 << 5, "BTRFS_QGROUP_LIMIT_EXCL_CMPR"),
];

/// Block group type and profile bits, as found in space info and balance
/// filters.
pub const BTRFS_BLOCK_GROUP_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_BLOCK_GROUP_DATA"),
    (1 << 1, "BTRFS_BLOCK_GROUP_SYSTEM"),
    (1 << 2, "BTRFS_BLOCK_GROUP_METADATA"),
    (1 << 3, "BTRFS_BLOCK_GROUP_RAID0"),
    (1 << 4, "BTRFS_BLOCK_GROUP_RAID1"),
    (1 << 5, "BTRFS_BLOCK_GROUP_DUP"),
    (1 << 6, "BTRFS_BLOCK_GROUP_RAID10"),
    (1 << 7, "BTRFS_BLOCK_GROUP_RAID5"),
    (1 << 8, "BTRFS_BLOCK_GROUP_RAID6"),
    (1 << 9, "BTRFS_BLOCK_GROUP_RAID1C3"),
    (1 << 10, "BTRFS_BLOCK_GROUP_RAID1C4"),
    (1 << 48, "BTRFS_AVAIL_ALLOC_BIT_SINGLE"),
    (1 << 49, "BTRFS_SPACE_INFO_GLOBAL_RSV"),
];

pub const BTRFS_SCRUB_FLAGS: Xlat = &[(1 << 0, "BTRFS_SCRUB_READONLY")];

pub const BTRFS_FS_INFO_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_FS_INFO_FLAG_CSUM_INFO"),
    (1 << 1, "BTRFS_FS_INFO_FLAG_GENERATION"),
    (1 << 2, "BTRFS_FS_INFO_FLAG_METADATA_UUID"),
];

pub const BTRFS_CSUM_TYPES: Xlat = &[
    (0, "BTRFS_CSUM_TYPE_CRC32"),
    (1, "BTRFS_CSUM_TYPE_XXHASH"),
    (2, "BTRFS_CSUM_TYPE_SHA256"),
    (3, "BTRFS_CSUM_TYPE_BLAKE2"),
];

pub const BTRFS_BALANCE_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_BALANCE_DATA"),
    (1 << 1, "BTRFS_BALANCE_SYSTEM"),
    (1 << 2, "BTRFS_BALANCE_METADATA"),
    (1 << 3, "BTRFS_BALANCE_FORCE"),
    (1 << 4, "BTRFS_BALANCE_RESUME"),
];

pub const BTRFS_BALANCE_ARGS_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_BALANCE_ARGS_PROFILES"),
    (1 << 1, "BTRFS_BALANCE_ARGS_USAGE"),
    (1 << 2, "BTRFS_BALANCE_ARGS_DEVID"),
    (1 << 3, "BTRFS_BALANCE_ARGS_DRANGE"),
    (1 << 4, "BTRFS_BALANCE_ARGS_VRANGE"),
    (1 << 5, "BTRFS_BALANCE_ARGS_LIMIT"),
    (1 << 6, "BTRFS_BALANCE_ARGS_LIMIT_RANGE"),
    (1 << 7, "BTRFS_BALANCE_ARGS_STRIPES_RANGE"),
    (1 << 10, "BTRFS_BALANCE_ARGS_USAGE_RANGE"),
    (1 << 8, "BTRFS_BALANCE_ARGS_CONVERT"),
    (1 << 9, "BTRFS_BALANCE_ARGS_SOFT"),
];

pub const BTRFS_BALANCE_STATE: Xlat = &[
    (1 << 0, "BTRFS_BALANCE_STATE_RUNNING"),
    (1 << 1, "BTRFS_BALANCE_STATE_PAUSE_REQ"),
    (1 << 2, "BTRFS_BALANCE_STATE_CANCEL_REQ"),
];

pub const BTRFS_BALANCE_CTL_CMDS: Xlat = &[
    (1, "BTRFS_BALANCE_CTL_PAUSE"),
    (2, "BTRFS_BALANCE_CTL_CANCEL"),
];

pub const BTRFS_LOGICAL_INO_FLAGS: Xlat = &[(1 << 0, "BTRFS_LOGICAL_INO_ARGS_IGNORE_OFFSET")];

pub const BTRFS_SEND_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_SEND_FLAG_NO_FILE_DATA"),
    (1 << 1, "BTRFS_SEND_FLAG_OMIT_STREAM_HEADER"),
    (1 << 2, "BTRFS_SEND_FLAG_OMIT_END_CMD"),
    (1 << 3, "BTRFS_SEND_FLAG_VERSION"),
    (1 << 4, "BTRFS_SEND_FLAG_COMPRESSED"),
];

pub const BTRFS_QUOTA_CTL_CMDS: Xlat = &[
    (1, "BTRFS_QUOTA_CTL_ENABLE"),
    (2, "BTRFS_QUOTA_CTL_DISABLE"),
    (3, "BTRFS_QUOTA_CTL_RESCAN__NOTUSED"),
    (4, "BTRFS_QUOTA_CTL_ENABLE_SIMPLE_QUOTA"),
];

pub const BTRFS_DEV_STATS_FLAGS: Xlat = &[(1 << 0, "BTRFS_DEV_STATS_RESET")];

pub const BTRFS_DEV_STAT_NAMES: [&str; 5] = [
    "write_errs",
    "read_errs",
    "flush_errs",
    "corruption_errs",
    "generation_errs",
];

pub const BTRFS_DEV_REPLACE_CMDS: Xlat = &[
    (0, "BTRFS_IOCTL_DEV_REPLACE_CMD_START"),
    (1, "BTRFS_IOCTL_DEV_REPLACE_CMD_STATUS"),
    (2, "BTRFS_IOCTL_DEV_REPLACE_CMD_CANCEL"),
];

pub const BTRFS_DEV_REPLACE_RESULTS: Xlat = &[
    (0, "BTRFS_IOCTL_DEV_REPLACE_RESULT_NO_ERROR"),
    (1, "BTRFS_IOCTL_DEV_REPLACE_RESULT_NOT_STARTED"),
    (2, "BTRFS_IOCTL_DEV_REPLACE_RESULT_ALREADY_STARTED"),
    (3, "BTRFS_IOCTL_DEV_REPLACE_RESULT_SCRUB_INPROGRESS"),
];

pub const BTRFS_DEV_REPLACE_STATES: Xlat = &[
    (0, "BTRFS_IOCTL_DEV_REPLACE_STATE_NEVER_STARTED"),
    (1, "BTRFS_IOCTL_DEV_REPLACE_STATE_STARTED"),
    (2, "BTRFS_IOCTL_DEV_REPLACE_STATE_FINISHED"),
    (3, "BTRFS_IOCTL_DEV_REPLACE_STATE_CANCELED"),
    (4, "BTRFS_IOCTL_DEV_REPLACE_STATE_SUSPENDED"),
];

pub const BTRFS_CONT_READING_MODES: Xlat = &[
    (0, "BTRFS_IOCTL_DEV_REPLACE_CONT_READING_FROM_SRCDEV_MODE_ALWAYS"),
    (1, "BTRFS_IOCTL_DEV_REPLACE_CONT_READING_FROM_SRCDEV_MODE_AVOID"),
];

pub const BTRFS_SAME_STATUS: Xlat = &[(0, "BTRFS_SAME_DATA_OK"), (1, "BTRFS_SAME_DATA_DIFFERS")];

pub const BTRFS_FEATURES_COMPAT_RO: Xlat = &[
    (1 << 0, "BTRFS_FEATURE_COMPAT_RO_FREE_SPACE_TREE"),
    (1 << 1, "BTRFS_FEATURE_COMPAT_RO_FREE_SPACE_TREE_VALID"),
    (1 << 2, "BTRFS_FEATURE_COMPAT_RO_VERITY"),
    (1 << 3, "BTRFS_FEATURE_COMPAT_RO_BLOCK_GROUP_TREE"),
];

pub const BTRFS_FEATURES_INCOMPAT: Xlat = &[
    (1 << 0, "BTRFS_FEATURE_INCOMPAT_MIXED_BACKREF"),
    (1 << 1, "BTRFS_FEATURE_INCOMPAT_DEFAULT_SUBVOL"),
    (1 << 2, "BTRFS_FEATURE_INCOMPAT_MIXED_GROUPS"),
    (1 << 3, "BTRFS_FEATURE_INCOMPAT_COMPRESS_LZO"),
    (1 << 4, "BTRFS_FEATURE_INCOMPAT_COMPRESS_ZSTD"),
    (1 << 5, "BTRFS_FEATURE_INCOMPAT_BIG_METADATA"),
    (1 << 6, "BTRFS_FEATURE_INCOMPAT_EXTENDED_IREF"),
    (1 << 7, "BTRFS_FEATURE_INCOMPAT_RAID56"),
    (1 << 8, "BTRFS_FEATURE_INCOMPAT_SKINNY_METADATA"),
    (1 << 9, "BTRFS_FEATURE_INCOMPAT_NO_HOLES"),
    (1 << 10, "BTRFS_FEATURE_INCOMPAT_METADATA_UUID"),
    (1 << 11, "BTRFS_FEATURE_INCOMPAT_RAID1C34"),
    (1 << 12, "BTRFS_FEATURE_INCOMPAT_ZONED"),
    (1 << 13, "BTRFS_FEATURE_INCOMPAT_EXTENT_TREE_V2"),
    (1 << 14, "BTRFS_FEATURE_INCOMPAT_RAID_STRIPE_TREE"),
    (1 << 16, "BTRFS_FEATURE_INCOMPAT_SIMPLE_QUOTA"),
];

pub const BTRFS_DEFRAG_FLAGS: Xlat = &[
    (1 << 0, "BTRFS_DEFRAG_RANGE_COMPRESS"),
    (1 << 1, "BTRFS_DEFRAG_RANGE_START_IO"),
    (1 << 2, "BTRFS_DEFRAG_RANGE_COMPRESS_LEVEL"),
];

pub const BTRFS_COMPRESS_TYPES: Xlat = &[
    (0, "BTRFS_COMPRESS_NONE"),
    (1, "BTRFS_COMPRESS_ZLIB"),
    (2, "BTRFS_COMPRESS_LZO"),
    (3, "BTRFS_COMPRESS_ZSTD"),
];

/// Well-known tree ids, shown where an objectid names a tree.
pub const BTRFS_TREE_OBJECTIDS: Xlat = &[
    (1, "BTRFS_ROOT_TREE_OBJECTID"),
    (2, "BTRFS_EXTENT_TREE_OBJECTID"),
    (3, "BTRFS_CHUNK_TREE_OBJECTID"),
    (4, "BTRFS_DEV_TREE_OBJECTID"),
    (5, "BTRFS_FS_TREE_OBJECTID"),
    (6, "BTRFS_ROOT_TREE_DIR_OBJECTID"),
    (7, "BTRFS_CSUM_TREE_OBJECTID"),
    (8, "BTRFS_QUOTA_TREE_OBJECTID"),
    (9, "BTRFS_UUID_TREE_OBJECTID"),
    (10, "BTRFS_FREE_SPACE_TREE_OBJECTID"),
    (11, "BTRFS_BLOCK_GROUP_TREE_OBJECTID"),
    (12, "BTRFS_RAID_STRIPE_TREE_OBJECTID"),
    (256, "BTRFS_FIRST_FREE_OBJECTID"),
    (u64::MAX - 255, "BTRFS_LAST_FREE_OBJECTID"),
];

pub const BTRFS_KEY_TYPES: Xlat = &[
    (1, "BTRFS_INODE_ITEM_KEY"),
    (12, "BTRFS_INODE_REF_KEY"),
    (13, "BTRFS_INODE_EXTREF_KEY"),
    (24, "BTRFS_XATTR_ITEM_KEY"),
    (36, "BTRFS_VERITY_DESC_ITEM_KEY"),
    (37, "BTRFS_VERITY_MERKLE_ITEM_KEY"),
    (48, "BTRFS_ORPHAN_ITEM_KEY"),
    (60, "BTRFS_DIR_LOG_ITEM_KEY"),
    (72, "BTRFS_DIR_LOG_INDEX_KEY"),
    (84, "BTRFS_DIR_ITEM_KEY"),
    (96, "BTRFS_DIR_INDEX_KEY"),
    (108, "BTRFS_EXTENT_DATA_KEY"),
    (128, "BTRFS_EXTENT_CSUM_KEY"),
    (132, "BTRFS_ROOT_ITEM_KEY"),
    (144, "BTRFS_ROOT_BACKREF_KEY"),
    (156, "BTRFS_ROOT_REF_KEY"),
    (168, "BTRFS_EXTENT_ITEM_KEY"),
    (169, "BTRFS_METADATA_ITEM_KEY"),
    (176, "BTRFS_TREE_BLOCK_REF_KEY"),
    (178, "BTRFS_EXTENT_DATA_REF_KEY"),
    (182, "BTRFS_SHARED_BLOCK_REF_KEY"),
    (184, "BTRFS_SHARED_DATA_REF_KEY"),
    (192, "BTRFS_BLOCK_GROUP_ITEM_KEY"),
    (198, "BTRFS_FREE_SPACE_INFO_KEY"),
    (199, "BTRFS_FREE_SPACE_EXTENT_KEY"),
    (200, "BTRFS_FREE_SPACE_BITMAP_KEY"),
    (204, "BTRFS_DEV_EXTENT_KEY"),
    (216, "BTRFS_DEV_ITEM_KEY"),
    (228, "BTRFS_CHUNK_ITEM_KEY"),
    (240, "BTRFS_QGROUP_STATUS_KEY"),
    (242, "BTRFS_QGROUP_INFO_KEY"),
    (244, "BTRFS_QGROUP_LIMIT_KEY"),
    (246, "BTRFS_QGROUP_RELATION_KEY"),
    (248, "BTRFS_TEMPORARY_ITEM_KEY"),
    (249, "BTRFS_PERSISTENT_ITEM_KEY"),
    (250, "BTRFS_DEV_REPLACE_KEY"),
    (251, "BTRFS_UUID_KEY_SUBVOL"),
    (252, "BTRFS_UUID_KEY_RECEIVED_SUBVOL"),
    (253, "BTRFS_STRING_ITEM_KEY"),
];
