// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use super::Xlat;

pub const DRM_CAPS: Xlat = &[
    (0x1, "DRM_CAP_DUMB_BUFFER"),
    (0x2, "DRM_CAP_VBLANK_HIGH_CRTC"),
    (0x3, "DRM_CAP_DUMB_PREFERRED_DEPTH"),
    (0x4, "DRM_CAP_DUMB_PREFER_SHADOW"),
    (0x5, "DRM_CAP_PRIME"),
    (0x6, "DRM_CAP_TIMESTAMP_MONOTONIC"),
    (0x7, "DRM_CAP_ASYNC_PAGE_FLIP"),
    (0x8, "DRM_CAP_CURSOR_WIDTH"),
    (0x9, "DRM_CAP_CURSOR_HEIGHT"),
    (0x10, "DRM_CAP_ADDFB2_MODIFIERS"),
    (0x11, "DRM_CAP_PAGE_FLIP_TARGET"),
    (0x12, "DRM_CAP_CRTC_IN_VBLANK_EVENT"),
    (0x13, "DRM_CAP_SYNCOBJ"),
    (0x14, "DRM_CAP_SYNCOBJ_TIMELINE"),
    (0x15, "DRM_CAP_ATOMIC_ASYNC_PAGE_FLIP"),
];

pub const DRM_CLIENT_CAPS: Xlat = &[
    (1, "DRM_CLIENT_CAP_STEREO_3D"),
    (2, "DRM_CLIENT_CAP_UNIVERSAL_PLANES"),
    (3, "DRM_CLIENT_CAP_ATOMIC"),
    (4, "DRM_CLIENT_CAP_ASPECT_RATIO"),
    (5, "DRM_CLIENT_CAP_WRITEBACK_CONNECTORS"),
    (6, "DRM_CLIENT_CAP_CURSOR_PLANE_HOTSPOT"),
];

pub const DRM_PRIME_FLAGS: Xlat = &[(0x80000, "DRM_CLOEXEC"), (0x2, "DRM_RDWR")];

pub const DRM_MAP_TYPES: Xlat = &[
    (0, "_DRM_FRAME_BUFFER"),
    (1, "_DRM_REGISTERS"),
    (2, "_DRM_SHM"),
    (3, "_DRM_AGP"),
    (4, "_DRM_SCATTER_GATHER"),
    (5, "_DRM_CONSISTENT"),
];

pub const DRM_MAP_FLAGS: Xlat = &[
    (0x01, "_DRM_RESTRICTED"),
    (0x02, "_DRM_READ_ONLY"),
    (0x04, "_DRM_LOCKED"),
    (0x08, "_DRM_KERNEL"),
    (0x10, "_DRM_WRITE_COMBINING"),
    (0x20, "_DRM_CONTAINS_LOCK"),
    (0x40, "_DRM_REMOVABLE"),
    (0x80, "_DRM_DRIVER"),
];

pub const DRM_STAT_TYPES: Xlat = &[
    (0, "_DRM_STAT_LOCK"),
    (1, "_DRM_STAT_OPENS"),
    (2, "_DRM_STAT_CLOSES"),
    (3, "_DRM_STAT_IOCTLS"),
    (4, "_DRM_STAT_LOCKS"),
    (5, "_DRM_STAT_UNLOCKS"),
    (6, "_DRM_STAT_VALUE"),
    (7, "_DRM_STAT_BYTE"),
    (8, "_DRM_STAT_COUNT"),
    (9, "_DRM_STAT_IRQ"),
    (10, "_DRM_STAT_PRIMARY"),
    (11, "_DRM_STAT_SECONDARY"),
    (12, "_DRM_STAT_DMA"),
    (13, "_DRM_STAT_SPECIAL"),
    (14, "_DRM_STAT_MISSED"),
];

pub const DRM_MODESET_CMDS: Xlat = &[(1, "_DRM_PRE_MODESET"), (2, "_DRM_POST_MODESET")];

/// The low bits of `drm_wait_vblank_request.type`.
pub const DRM_VBLANK_SEQ_TYPES: Xlat = &[
    (0x0, "_DRM_VBLANK_ABSOLUTE"),
    (0x1, "_DRM_VBLANK_RELATIVE"),
];

pub const DRM_VBLANK_FLAGS: Xlat = &[
    (0x02, "_DRM_VBLANK_HIGH_CRTC_MASK"),
    (0x04000000, "_DRM_VBLANK_EVENT"),
    (0x08000000, "_DRM_VBLANK_FLIP"),
    (0x10000000, "_DRM_VBLANK_NEXTONMISS"),
    (0x20000000, "_DRM_VBLANK_SECONDARY"),
    (0x40000000, "_DRM_VBLANK_SIGNAL"),
];

pub const DRM_CRTC_SEQUENCE_FLAGS: Xlat = &[
    (0x1, "DRM_CRTC_SEQUENCE_RELATIVE"),
    (0x2, "DRM_CRTC_SEQUENCE_NEXT_ON_MISS"),
];

pub const DRM_MODE_FLAGS: Xlat = &[
    (1 << 0, "DRM_MODE_FLAG_PHSYNC"),
    (1 << 1, "DRM_MODE_FLAG_NHSYNC"),
    (1 << 2, "DRM_MODE_FLAG_PVSYNC"),
    (1 << 3, "DRM_MODE_FLAG_NVSYNC"),
    (1 << 4, "DRM_MODE_FLAG_INTERLACE"),
    (1 << 5, "DRM_MODE_FLAG_DBLSCAN"),
    (1 << 6, "DRM_MODE_FLAG_CSYNC"),
    (1 << 7, "DRM_MODE_FLAG_PCSYNC"),
    (1 << 8, "DRM_MODE_FLAG_NCSYNC"),
    (1 << 9, "DRM_MODE_FLAG_HSKEW"),
    (1 << 10, "DRM_MODE_FLAG_BCAST"),
    (1 << 11, "DRM_MODE_FLAG_PIXMUX"),
    (1 << 12, "DRM_MODE_FLAG_DBLCLK"),
    (1 << 13, "DRM_MODE_FLAG_CLKDIV2"),
];

pub const DRM_MODE_TYPES: Xlat = &[
    (1 << 0, "DRM_MODE_TYPE_BUILTIN"),
    (1 << 1, "DRM_MODE_TYPE_CLOCK_C"),
    (1 << 2, "DRM_MODE_TYPE_CRTC_C"),
    (1 << 3, "DRM_MODE_TYPE_PREFERRED"),
    (1 << 4, "DRM_MODE_TYPE_DEFAULT"),
    (1 << 5, "DRM_MODE_TYPE_USERDEF"),
    (1 << 6, "DRM_MODE_TYPE_DRIVER"),
];

pub const DRM_CURSOR_FLAGS: Xlat = &[(0x01, "DRM_MODE_CURSOR_BO"), (0x02, "DRM_MODE_CURSOR_MOVE")];

pub const DRM_ENCODER_TYPES: Xlat = &[
    (0, "DRM_MODE_ENCODER_NONE"),
    (1, "DRM_MODE_ENCODER_DAC"),
    (2, "DRM_MODE_ENCODER_TMDS"),
    (3, "DRM_MODE_ENCODER_LVDS"),
    (4, "DRM_MODE_ENCODER_TVDAC"),
    (5, "DRM_MODE_ENCODER_VIRTUAL"),
    (6, "DRM_MODE_ENCODER_DSI"),
    (7, "DRM_MODE_ENCODER_DPMST"),
    (8, "DRM_MODE_ENCODER_DPI"),
];

pub const DRM_CONNECTOR_TYPES: Xlat = &[
    (0, "DRM_MODE_CONNECTOR_Unknown"),
    (1, "DRM_MODE_CONNECTOR_VGA"),
    (2, "DRM_MODE_CONNECTOR_DVII"),
    (3, "DRM_MODE_CONNECTOR_DVID"),
    (4, "DRM_MODE_CONNECTOR_DVIA"),
    (5, "DRM_MODE_CONNECTOR_Composite"),
    (6, "DRM_MODE_CONNECTOR_SVIDEO"),
    (7, "DRM_MODE_CONNECTOR_LVDS"),
    (8, "DRM_MODE_CONNECTOR_Component"),
    (9, "DRM_MODE_CONNECTOR_9PinDIN"),
    (10, "DRM_MODE_CONNECTOR_DisplayPort"),
    (11, "DRM_MODE_CONNECTOR_HDMIA"),
    (12, "DRM_MODE_CONNECTOR_HDMIB"),
    (13, "DRM_MODE_CONNECTOR_TV"),
    (14, "DRM_MODE_CONNECTOR_eDP"),
    (15, "DRM_MODE_CONNECTOR_VIRTUAL"),
    (16, "DRM_MODE_CONNECTOR_DSI"),
    (17, "DRM_MODE_CONNECTOR_DPI"),
    (18, "DRM_MODE_CONNECTOR_WRITEBACK"),
    (19, "DRM_MODE_CONNECTOR_SPI"),
    (20, "DRM_MODE_CONNECTOR_USB"),
];

pub const DRM_CONNECTION_STATES: Xlat = &[
    (1, "connector_status_connected"),
    (2, "connector_status_disconnected"),
    (3, "connector_status_unknown"),
];

pub const DRM_SUBPIXEL_ORDERS: Xlat = &[
    (1, "SubPixelUnknown"),
    (2, "SubPixelHorizontalRGB"),
    (3, "SubPixelHorizontalBGR"),
    (4, "SubPixelVerticalRGB"),
    (5, "SubPixelVerticalBGR"),
    (6, "SubPixelNone"),
];

pub const DRM_PROPERTY_FLAGS: Xlat = &[
    (1 << 0, "DRM_MODE_PROP_PENDING"),
    (1 << 1, "DRM_MODE_PROP_RANGE"),
    (1 << 2, "DRM_MODE_PROP_IMMUTABLE"),
    (1 << 3, "DRM_MODE_PROP_ENUM"),
    (1 << 4, "DRM_MODE_PROP_BLOB"),
    (1 << 5, "DRM_MODE_PROP_BITMASK"),
    (1 << 6, "DRM_MODE_PROP_OBJECT"),
    (2 << 6, "DRM_MODE_PROP_SIGNED_RANGE"),
    (1 << 31, "DRM_MODE_PROP_ATOMIC"),
];

pub const DRM_PAGE_FLIP_FLAGS: Xlat = &[
    (0x01, "DRM_MODE_PAGE_FLIP_EVENT"),
    (0x02, "DRM_MODE_PAGE_FLIP_ASYNC"),
    (0x04, "DRM_MODE_PAGE_FLIP_TARGET_ABSOLUTE"),
    (0x08, "DRM_MODE_PAGE_FLIP_TARGET_RELATIVE"),
];

pub const DRM_DIRTY_FLAGS: Xlat = &[
    (0x01, "DRM_MODE_FB_DIRTY_ANNOTATE_COPY"),
    (0x02, "DRM_MODE_FB_DIRTY_ANNOTATE_FILL"),
];

pub const DRM_FB_FLAGS: Xlat = &[
    (1 << 0, "DRM_MODE_FB_INTERLACED"),
    (1 << 1, "DRM_MODE_FB_MODIFIERS"),
];

pub const DRM_FORMAT_MODIFIERS: Xlat = &[
    (0, "DRM_FORMAT_MOD_LINEAR"),
    (0x00ff_ffff_ffff_ffff, "DRM_FORMAT_MOD_INVALID"),
    (0x0100_0000_0000_0001, "I915_FORMAT_MOD_X_TILED"),
    (0x0100_0000_0000_0002, "I915_FORMAT_MOD_Y_TILED"),
];
