// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! DRM core and KMS ioctls (type byte `'d'`). Driver-private numbers are
//! left to the generic rendering.

use std::mem::{offset_of, size_of};

use anyhow::Result;
use argus_common::{ioctl::ioc_nr, kernel_types::drm::*, raw::RawStruct};
use log::trace;

use crate::{
    arg, argf,
    config::XlatStyle,
    decoders::ioctl::{defer_pointee, print_pointee, render_u32},
    dispatch::{command_enum, DecodeContext, DecodeStatus},
    field,
    format_helpers::{format_addr, format_fourcc},
    formatting::SyscallFormatter,
    layout::{
        decode_struct_entry, decode_struct_exit, enter_struct, exit_struct, fetch_or_print, no_tail,
        print_all_fields, print_element, print_entry_fields, print_field, refetch, Dir, Field,
        FieldKind, Layout, Snapshot,
    },
    state::Occurrence,
    walker::{print_array, print_local_array, print_u32_elem, print_u64_elem},
    with_struct,
    xlat::drm::*,
};

command_enum! {
    pub enum DrmIoctl: u32 {
        Version = DRM_IOCTL_VERSION => "DRM_IOCTL_VERSION",
        GetUnique = DRM_IOCTL_GET_UNIQUE => "DRM_IOCTL_GET_UNIQUE",
        GetMagic = DRM_IOCTL_GET_MAGIC => "DRM_IOCTL_GET_MAGIC",
        IrqBusid = DRM_IOCTL_IRQ_BUSID => "DRM_IOCTL_IRQ_BUSID",
        GetMap = DRM_IOCTL_GET_MAP => "DRM_IOCTL_GET_MAP",
        GetClient = DRM_IOCTL_GET_CLIENT => "DRM_IOCTL_GET_CLIENT",
        GetStats = DRM_IOCTL_GET_STATS => "DRM_IOCTL_GET_STATS",
        SetVersion = DRM_IOCTL_SET_VERSION => "DRM_IOCTL_SET_VERSION",
        ModesetCtl = DRM_IOCTL_MODESET_CTL => "DRM_IOCTL_MODESET_CTL",
        GemClose = DRM_IOCTL_GEM_CLOSE => "DRM_IOCTL_GEM_CLOSE",
        GemFlink = DRM_IOCTL_GEM_FLINK => "DRM_IOCTL_GEM_FLINK",
        GemOpen = DRM_IOCTL_GEM_OPEN => "DRM_IOCTL_GEM_OPEN",
        GetCap = DRM_IOCTL_GET_CAP => "DRM_IOCTL_GET_CAP",
        SetClientCap = DRM_IOCTL_SET_CLIENT_CAP => "DRM_IOCTL_SET_CLIENT_CAP",
        AuthMagic = DRM_IOCTL_AUTH_MAGIC => "DRM_IOCTL_AUTH_MAGIC",
        SetMaster = DRM_IOCTL_SET_MASTER => "DRM_IOCTL_SET_MASTER",
        DropMaster = DRM_IOCTL_DROP_MASTER => "DRM_IOCTL_DROP_MASTER",
        PrimeHandleToFd = DRM_IOCTL_PRIME_HANDLE_TO_FD => "DRM_IOCTL_PRIME_HANDLE_TO_FD",
        PrimeFdToHandle = DRM_IOCTL_PRIME_FD_TO_HANDLE => "DRM_IOCTL_PRIME_FD_TO_HANDLE",
        WaitVblank = DRM_IOCTL_WAIT_VBLANK => "DRM_IOCTL_WAIT_VBLANK",
        CrtcGetSequence = DRM_IOCTL_CRTC_GET_SEQUENCE => "DRM_IOCTL_CRTC_GET_SEQUENCE",
        CrtcQueueSequence = DRM_IOCTL_CRTC_QUEUE_SEQUENCE => "DRM_IOCTL_CRTC_QUEUE_SEQUENCE",
        ModeGetResources = DRM_IOCTL_MODE_GETRESOURCES => "DRM_IOCTL_MODE_GETRESOURCES",
        ModeGetCrtc = DRM_IOCTL_MODE_GETCRTC => "DRM_IOCTL_MODE_GETCRTC",
        ModeSetCrtc = DRM_IOCTL_MODE_SETCRTC => "DRM_IOCTL_MODE_SETCRTC",
        ModeCursor = DRM_IOCTL_MODE_CURSOR => "DRM_IOCTL_MODE_CURSOR",
        ModeGetGamma = DRM_IOCTL_MODE_GETGAMMA => "DRM_IOCTL_MODE_GETGAMMA",
        ModeSetGamma = DRM_IOCTL_MODE_SETGAMMA => "DRM_IOCTL_MODE_SETGAMMA",
        ModeGetEncoder = DRM_IOCTL_MODE_GETENCODER => "DRM_IOCTL_MODE_GETENCODER",
        ModeGetConnector = DRM_IOCTL_MODE_GETCONNECTOR => "DRM_IOCTL_MODE_GETCONNECTOR",
        ModeGetProperty = DRM_IOCTL_MODE_GETPROPERTY => "DRM_IOCTL_MODE_GETPROPERTY",
        ModeSetProperty = DRM_IOCTL_MODE_SETPROPERTY => "DRM_IOCTL_MODE_SETPROPERTY",
        ModeGetPropBlob = DRM_IOCTL_MODE_GETPROPBLOB => "DRM_IOCTL_MODE_GETPROPBLOB",
        ModeGetFb = DRM_IOCTL_MODE_GETFB => "DRM_IOCTL_MODE_GETFB",
        ModeAddFb = DRM_IOCTL_MODE_ADDFB => "DRM_IOCTL_MODE_ADDFB",
        ModeRmFb = DRM_IOCTL_MODE_RMFB => "DRM_IOCTL_MODE_RMFB",
        ModePageFlip = DRM_IOCTL_MODE_PAGE_FLIP => "DRM_IOCTL_MODE_PAGE_FLIP",
        ModeDirtyFb = DRM_IOCTL_MODE_DIRTYFB => "DRM_IOCTL_MODE_DIRTYFB",
        ModeCreateDumb = DRM_IOCTL_MODE_CREATE_DUMB => "DRM_IOCTL_MODE_CREATE_DUMB",
        ModeMapDumb = DRM_IOCTL_MODE_MAP_DUMB => "DRM_IOCTL_MODE_MAP_DUMB",
        ModeDestroyDumb = DRM_IOCTL_MODE_DESTROY_DUMB => "DRM_IOCTL_MODE_DESTROY_DUMB",
        ModeAddFb2 = DRM_IOCTL_MODE_ADDFB2 => "DRM_IOCTL_MODE_ADDFB2",
        ModeCreatePropBlob = DRM_IOCTL_MODE_CREATEPROPBLOB => "DRM_IOCTL_MODE_CREATEPROPBLOB",
        ModeDestroyPropBlob = DRM_IOCTL_MODE_DESTROYPROPBLOB => "DRM_IOCTL_MODE_DESTROYPROPBLOB",
    }
}

const VBLANK_TYPES_MASK: u64 = 0x1;
const VBLANK_HIGH_CRTC_MASK: u64 = 0x3e;
const VBLANK_HIGH_CRTC_SHIFT: u32 = 1;
const MODE_FB_MODIFIERS: u32 = 1 << 1;

/// `_DRM_VBLANK_RELATIVE|_DRM_VBLANK_EVENT|2<<_DRM_VBLANK_HIGH_CRTC_SHIFT`
fn render_vblank_type(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    let value = u64::from(raw.u32(0));
    if cx.config.xlat_style == XlatStyle::Raw {
        return format!("0x{value:x}");
    }

    let mut parts = vec![cx.xval(value & VBLANK_TYPES_MASK, DRM_VBLANK_SEQ_TYPES)];
    let flags = value & !(VBLANK_TYPES_MASK | VBLANK_HIGH_CRTC_MASK);
    if flags != 0 {
        parts.push(cx.flags(flags, DRM_VBLANK_FLAGS));
    }
    let crtc = (value & VBLANK_HIGH_CRTC_MASK) >> VBLANK_HIGH_CRTC_SHIFT;
    if crtc != 0 {
        parts.push(format!("{crtc}<<_DRM_VBLANK_HIGH_CRTC_SHIFT"));
    }
    parts.join("|")
}

fn render_fourcc(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    format_fourcc(raw.u32(0))
}

fn render_u32x4(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    let values: Vec<String> = (0..4).map(|i| raw.u32(i * 4).to_string()).collect();
    format!("[{}]", values.join(", "))
}

fn render_modifiers(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    let values: Vec<String> = (0..4)
        .map(|i| cx.xval_hex(raw.u64(i * 8), DRM_FORMAT_MODIFIERS))
        .collect();
    format!("[{}]", values.join(", "))
}

pub static VERSION: Layout = Layout {
    name: "drm_version",
    size: size_of::<DrmVersion>(),
    fields: &[
        field!(DrmVersion, version_major, Out, FieldKind::I32),
        field!(DrmVersion, version_minor, Out, FieldKind::I32),
        field!(DrmVersion, version_patchlevel, Out, FieldKind::I32),
        field!(DrmVersion, name_len, InOut, FieldKind::U64),
        field!(DrmVersion, date_len, InOut, FieldKind::U64),
        field!(DrmVersion, desc_len, InOut, FieldKind::U64),
    ],
};

pub static UNIQUE: Layout = Layout {
    name: "drm_unique",
    size: size_of::<DrmUnique>(),
    fields: &[field!(DrmUnique, unique_len, InOut, FieldKind::U64)],
};

pub static GET_MAGIC: Layout = Layout {
    name: "drm_auth",
    size: size_of::<DrmAuth>(),
    fields: &[field!(DrmAuth, magic, Out, FieldKind::X32)],
};

pub static AUTH_MAGIC: Layout = Layout {
    name: "drm_auth",
    size: size_of::<DrmAuth>(),
    fields: &[field!(DrmAuth, magic, In, FieldKind::X32)],
};

pub static IRQ_BUSID: Layout = Layout {
    name: "drm_irq_busid",
    size: size_of::<DrmIrqBusid>(),
    fields: &[
        field!(DrmIrqBusid, irq, Out, FieldKind::I32),
        field!(DrmIrqBusid, busnum, In, FieldKind::I32),
        field!(DrmIrqBusid, devnum, In, FieldKind::I32),
        field!(DrmIrqBusid, funcnum, In, FieldKind::I32),
    ],
};

/// `offset` carries the map index in and the map offset out.
pub static GET_MAP: Layout = Layout {
    name: "drm_map",
    size: size_of::<DrmMap>(),
    fields: &[
        field!(DrmMap, offset, InOut, FieldKind::X64),
        field!(DrmMap, size, Out, FieldKind::U64),
        field!("type", DrmMap, map_type, Out, FieldKind::Xval32(DRM_MAP_TYPES)),
        field!(DrmMap, flags, Out, FieldKind::Flags32(DRM_MAP_FLAGS)),
        field!(DrmMap, handle, Out, FieldKind::Addr),
        field!(DrmMap, mtrr, Out, FieldKind::I32),
    ],
};

pub static GET_CLIENT: Layout = Layout {
    name: "drm_client",
    size: size_of::<DrmClient>(),
    fields: &[
        field!(DrmClient, idx, In, FieldKind::I32),
        field!(DrmClient, auth, Out, FieldKind::I32),
        field!(DrmClient, pid, Out, FieldKind::U64),
        field!(DrmClient, uid, Out, FieldKind::U64),
        field!(DrmClient, magic, Out, FieldKind::X64),
        field!(DrmClient, iocs, Out, FieldKind::U64),
    ],
};

pub static STATS_ENTRY: Layout = Layout {
    name: "drm_stats_entry",
    size: size_of::<DrmStatsEntry>(),
    fields: &[
        field!(DrmStatsEntry, value, Out, FieldKind::U64),
        field!("type", DrmStatsEntry, stat_type, Out, FieldKind::Xval32(DRM_STAT_TYPES)),
    ],
};

/// The kernel answers with what it is willing to report.
pub static SET_VERSION: Layout = Layout {
    name: "drm_set_version",
    size: size_of::<DrmSetVersion>(),
    fields: &[
        field!(DrmSetVersion, drm_di_major, InOut, FieldKind::I32),
        field!(DrmSetVersion, drm_di_minor, InOut, FieldKind::I32),
        field!(DrmSetVersion, drm_dd_major, InOut, FieldKind::I32),
        field!(DrmSetVersion, drm_dd_minor, InOut, FieldKind::I32),
    ],
};

pub static MODESET_CTL: Layout = Layout {
    name: "drm_modeset_ctl",
    size: size_of::<DrmModesetCtl>(),
    fields: &[
        field!(DrmModesetCtl, crtc, In, FieldKind::U32),
        field!(DrmModesetCtl, cmd, In, FieldKind::Xval32(DRM_MODESET_CMDS)),
    ],
};

pub static GEM_CLOSE: Layout = Layout {
    name: "drm_gem_close",
    size: size_of::<DrmGemClose>(),
    fields: &[field!(DrmGemClose, handle, In, FieldKind::U32)],
};

pub static GEM_FLINK: Layout = Layout {
    name: "drm_gem_flink",
    size: size_of::<DrmGemFlink>(),
    fields: &[
        field!(DrmGemFlink, handle, In, FieldKind::U32),
        field!(DrmGemFlink, name, Out, FieldKind::U32),
    ],
};

pub static GEM_OPEN: Layout = Layout {
    name: "drm_gem_open",
    size: size_of::<DrmGemOpen>(),
    fields: &[
        field!(DrmGemOpen, name, In, FieldKind::U32),
        field!(DrmGemOpen, handle, Out, FieldKind::U32),
        field!(DrmGemOpen, size, Out, FieldKind::U64),
    ],
};

pub static GET_CAP: Layout = Layout {
    name: "drm_get_cap",
    size: size_of::<DrmGetCap>(),
    fields: &[
        field!(DrmGetCap, capability, In, FieldKind::Xval64(DRM_CAPS)),
        field!(DrmGetCap, value, Out, FieldKind::U64),
    ],
};

pub static SET_CLIENT_CAP: Layout = Layout {
    name: "drm_set_client_cap",
    size: size_of::<DrmGetCap>(),
    fields: &[
        field!(DrmGetCap, capability, In, FieldKind::Xval64(DRM_CLIENT_CAPS)),
        field!(DrmGetCap, value, In, FieldKind::U64),
    ],
};

pub static PRIME_HANDLE_TO_FD: Layout = Layout {
    name: "drm_prime_handle",
    size: size_of::<DrmPrimeHandle>(),
    fields: &[
        field!(DrmPrimeHandle, handle, In, FieldKind::U32),
        field!(DrmPrimeHandle, flags, In, FieldKind::Flags32(DRM_PRIME_FLAGS)),
        field!(DrmPrimeHandle, fd, Out, FieldKind::Fd),
    ],
};

pub static PRIME_FD_TO_HANDLE: Layout = Layout {
    name: "drm_prime_handle",
    size: size_of::<DrmPrimeHandle>(),
    fields: &[
        field!(DrmPrimeHandle, handle, Out, FieldKind::U32),
        field!(DrmPrimeHandle, fd, In, FieldKind::Fd),
    ],
};

pub static VBLANK_REQUEST: Layout = Layout {
    name: "drm_wait_vblank_request",
    size: size_of::<DrmWaitVblank>(),
    fields: &[
        field!("type", DrmWaitVblank, vbl_type, In, FieldKind::Custom(4, render_vblank_type)),
        field!(DrmWaitVblank, sequence, In, FieldKind::U32),
        Field {
            name: "signal",
            offset: WAIT_VBLANK_REQUEST_SIGNAL,
            dir: Dir::In,
            kind: FieldKind::X64,
        },
    ],
};

pub static VBLANK_REPLY: Layout = Layout {
    name: "drm_wait_vblank_reply",
    size: size_of::<DrmWaitVblank>(),
    fields: &[
        field!("type", DrmWaitVblank, vbl_type, Out, FieldKind::Custom(4, render_vblank_type)),
        field!(DrmWaitVblank, sequence, Out, FieldKind::U32),
        field!(DrmWaitVblank, tval_sec, Out, FieldKind::I64),
        field!(DrmWaitVblank, tval_usec, Out, FieldKind::I64),
    ],
};

pub static CRTC_GET_SEQUENCE: Layout = Layout {
    name: "drm_crtc_get_sequence",
    size: size_of::<DrmCrtcGetSequence>(),
    fields: &[
        field!(DrmCrtcGetSequence, crtc_id, In, FieldKind::U32),
        field!(DrmCrtcGetSequence, active, Out, FieldKind::U32),
        field!(DrmCrtcGetSequence, sequence, Out, FieldKind::U64),
        field!(DrmCrtcGetSequence, sequence_ns, Out, FieldKind::I64),
    ],
};

pub static CRTC_QUEUE_SEQUENCE: Layout = Layout {
    name: "drm_crtc_queue_sequence",
    size: size_of::<DrmCrtcQueueSequence>(),
    fields: &[
        field!(DrmCrtcQueueSequence, crtc_id, In, FieldKind::U32),
        field!(DrmCrtcQueueSequence, flags, In, FieldKind::Flags32(DRM_CRTC_SEQUENCE_FLAGS)),
        field!(DrmCrtcQueueSequence, sequence, InOut, FieldKind::U64),
        field!(DrmCrtcQueueSequence, user_data, In, FieldKind::X64),
    ],
};

/// Counts go in as the room the caller made and come back as what exists.
pub static CARD_RES: Layout = Layout {
    name: "drm_mode_card_res",
    size: size_of::<DrmModeCardRes>(),
    fields: &[
        field!(DrmModeCardRes, count_fbs, InOut, FieldKind::U32),
        field!(DrmModeCardRes, count_crtcs, InOut, FieldKind::U32),
        field!(DrmModeCardRes, count_connectors, InOut, FieldKind::U32),
        field!(DrmModeCardRes, count_encoders, InOut, FieldKind::U32),
        field!(DrmModeCardRes, min_width, Out, FieldKind::U32),
        field!(DrmModeCardRes, max_width, Out, FieldKind::U32),
        field!(DrmModeCardRes, min_height, Out, FieldKind::U32),
        field!(DrmModeCardRes, max_height, Out, FieldKind::U32),
    ],
};

pub static MODEINFO: Layout = Layout {
    name: "drm_mode_modeinfo",
    size: size_of::<DrmModeModeinfo>(),
    fields: &[
        field!(DrmModeModeinfo, clock, In, FieldKind::U32),
        field!(DrmModeModeinfo, hdisplay, In, FieldKind::U16),
        field!(DrmModeModeinfo, hsync_start, In, FieldKind::U16),
        field!(DrmModeModeinfo, hsync_end, In, FieldKind::U16),
        field!(DrmModeModeinfo, htotal, In, FieldKind::U16),
        field!(DrmModeModeinfo, hskew, In, FieldKind::U16),
        field!(DrmModeModeinfo, vdisplay, In, FieldKind::U16),
        field!(DrmModeModeinfo, vsync_start, In, FieldKind::U16),
        field!(DrmModeModeinfo, vsync_end, In, FieldKind::U16),
        field!(DrmModeModeinfo, vtotal, In, FieldKind::U16),
        field!(DrmModeModeinfo, vscan, In, FieldKind::U16),
        field!(DrmModeModeinfo, vrefresh, In, FieldKind::U32),
        field!(DrmModeModeinfo, flags, In, FieldKind::Flags32(DRM_MODE_FLAGS)),
        field!("type", DrmModeModeinfo, mode_type, In, FieldKind::Flags32(DRM_MODE_TYPES)),
        field!(DrmModeModeinfo, name, In, FieldKind::CStr(DRM_DISPLAY_MODE_LEN)),
    ],
};

pub static GET_CRTC: Layout = Layout {
    name: "drm_mode_crtc",
    size: size_of::<DrmModeCrtc>(),
    fields: &[
        field!(DrmModeCrtc, crtc_id, In, FieldKind::U32),
        field!(DrmModeCrtc, fb_id, Out, FieldKind::U32),
        field!(DrmModeCrtc, x, Out, FieldKind::U32),
        field!(DrmModeCrtc, y, Out, FieldKind::U32),
        field!(DrmModeCrtc, gamma_size, Out, FieldKind::U32),
        field!(DrmModeCrtc, mode_valid, Out, FieldKind::U32),
        field!(DrmModeCrtc, mode, Out, FieldKind::Struct(&MODEINFO)),
    ],
};

pub static SET_CRTC: Layout = Layout {
    name: "drm_mode_crtc",
    size: size_of::<DrmModeCrtc>(),
    fields: &[
        field!(DrmModeCrtc, count_connectors, In, FieldKind::U32),
        field!(DrmModeCrtc, crtc_id, In, FieldKind::U32),
        field!(DrmModeCrtc, fb_id, In, FieldKind::U32),
        field!(DrmModeCrtc, x, In, FieldKind::U32),
        field!(DrmModeCrtc, y, In, FieldKind::U32),
        field!(DrmModeCrtc, mode_valid, In, FieldKind::U32),
    ],
};

static CRTC_MODE: Field = field!(DrmModeCrtc, mode, In, FieldKind::Struct(&MODEINFO));

pub static CURSOR: Layout = Layout {
    name: "drm_mode_cursor",
    size: size_of::<DrmModeCursor>(),
    fields: &[
        field!(DrmModeCursor, flags, In, FieldKind::Flags32(DRM_CURSOR_FLAGS)),
        field!(DrmModeCursor, crtc_id, In, FieldKind::U32),
        field!(DrmModeCursor, x, In, FieldKind::I32),
        field!(DrmModeCursor, y, In, FieldKind::I32),
        field!(DrmModeCursor, width, In, FieldKind::U32),
        field!(DrmModeCursor, height, In, FieldKind::U32),
        field!(DrmModeCursor, handle, In, FieldKind::U32),
    ],
};

pub static CRTC_LUT: Layout = Layout {
    name: "drm_mode_crtc_lut",
    size: size_of::<DrmModeCrtcLut>(),
    fields: &[
        field!(DrmModeCrtcLut, crtc_id, In, FieldKind::U32),
        field!(DrmModeCrtcLut, gamma_size, In, FieldKind::U32),
        field!(DrmModeCrtcLut, red, In, FieldKind::Addr),
        field!(DrmModeCrtcLut, green, In, FieldKind::Addr),
        field!(DrmModeCrtcLut, blue, In, FieldKind::Addr),
    ],
};

pub static CRTC_LUT_HEAD: Layout = Layout {
    name: "drm_mode_crtc_lut",
    size: size_of::<DrmModeCrtcLut>(),
    fields: &[
        field!(DrmModeCrtcLut, crtc_id, In, FieldKind::U32),
        field!(DrmModeCrtcLut, gamma_size, In, FieldKind::U32),
    ],
};

pub static GET_ENCODER: Layout = Layout {
    name: "drm_mode_get_encoder",
    size: size_of::<DrmModeGetEncoder>(),
    fields: &[
        field!(DrmModeGetEncoder, encoder_id, In, FieldKind::U32),
        field!(
            DrmModeGetEncoder,
            encoder_type,
            Out,
            FieldKind::Xval32(DRM_ENCODER_TYPES)
        ),
        field!(DrmModeGetEncoder, crtc_id, Out, FieldKind::U32),
        field!(DrmModeGetEncoder, possible_crtcs, Out, FieldKind::X32),
        field!(DrmModeGetEncoder, possible_clones, Out, FieldKind::X32),
    ],
};

pub static GET_CONNECTOR: Layout = Layout {
    name: "drm_mode_get_connector",
    size: size_of::<DrmModeGetConnector>(),
    fields: &[
        field!(DrmModeGetConnector, count_modes, InOut, FieldKind::U32),
        field!(DrmModeGetConnector, count_props, InOut, FieldKind::U32),
        field!(DrmModeGetConnector, count_encoders, InOut, FieldKind::U32),
        field!(DrmModeGetConnector, encoder_id, Out, FieldKind::U32),
        field!(DrmModeGetConnector, connector_id, In, FieldKind::U32),
        field!(
            DrmModeGetConnector,
            connector_type,
            Out,
            FieldKind::Xval32(DRM_CONNECTOR_TYPES)
        ),
        field!(DrmModeGetConnector, connector_type_id, Out, FieldKind::U32),
        field!(
            DrmModeGetConnector,
            connection,
            Out,
            FieldKind::Xval32(DRM_CONNECTION_STATES)
        ),
        field!(DrmModeGetConnector, mm_width, Out, FieldKind::U32),
        field!(DrmModeGetConnector, mm_height, Out, FieldKind::U32),
        field!(
            DrmModeGetConnector,
            subpixel,
            Out,
            FieldKind::Xval32(DRM_SUBPIXEL_ORDERS)
        ),
    ],
};

pub static GET_PROPERTY: Layout = Layout {
    name: "drm_mode_get_property",
    size: size_of::<DrmModeGetProperty>(),
    fields: &[
        field!(DrmModeGetProperty, prop_id, In, FieldKind::U32),
        field!(DrmModeGetProperty, flags, Out, FieldKind::Flags32(DRM_PROPERTY_FLAGS)),
        field!(DrmModeGetProperty, name, Out, FieldKind::CStr(DRM_PROP_NAME_LEN)),
        field!(DrmModeGetProperty, count_values, InOut, FieldKind::U32),
        field!(DrmModeGetProperty, count_enum_blobs, InOut, FieldKind::U32),
    ],
};

pub static SET_PROPERTY: Layout = Layout {
    name: "drm_mode_connector_set_property",
    size: size_of::<DrmModeConnectorSetProperty>(),
    fields: &[
        field!(DrmModeConnectorSetProperty, value, In, FieldKind::U64),
        field!(DrmModeConnectorSetProperty, prop_id, In, FieldKind::U32),
        field!(DrmModeConnectorSetProperty, connector_id, In, FieldKind::U32),
    ],
};

pub static GET_BLOB: Layout = Layout {
    name: "drm_mode_get_blob",
    size: size_of::<DrmModeGetBlob>(),
    fields: &[
        field!(DrmModeGetBlob, blob_id, In, FieldKind::U32),
        field!(DrmModeGetBlob, length, InOut, FieldKind::U32),
    ],
};

pub static GET_FB: Layout = Layout {
    name: "drm_mode_fb_cmd",
    size: size_of::<DrmModeFbCmd>(),
    fields: &[
        field!(DrmModeFbCmd, fb_id, In, FieldKind::U32),
        field!(DrmModeFbCmd, width, Out, FieldKind::U32),
        field!(DrmModeFbCmd, height, Out, FieldKind::U32),
        field!(DrmModeFbCmd, pitch, Out, FieldKind::U32),
        field!(DrmModeFbCmd, bpp, Out, FieldKind::U32),
        field!(DrmModeFbCmd, depth, Out, FieldKind::U32),
        field!(DrmModeFbCmd, handle, Out, FieldKind::U32),
    ],
};

pub static ADD_FB: Layout = Layout {
    name: "drm_mode_fb_cmd",
    size: size_of::<DrmModeFbCmd>(),
    fields: &[
        field!(DrmModeFbCmd, fb_id, Out, FieldKind::U32),
        field!(DrmModeFbCmd, width, In, FieldKind::U32),
        field!(DrmModeFbCmd, height, In, FieldKind::U32),
        field!(DrmModeFbCmd, pitch, In, FieldKind::U32),
        field!(DrmModeFbCmd, bpp, In, FieldKind::U32),
        field!(DrmModeFbCmd, depth, In, FieldKind::U32),
        field!(DrmModeFbCmd, handle, In, FieldKind::U32),
    ],
};

pub static PAGE_FLIP: Layout = Layout {
    name: "drm_mode_crtc_page_flip",
    size: size_of::<DrmModeCrtcPageFlip>(),
    fields: &[
        field!(DrmModeCrtcPageFlip, crtc_id, In, FieldKind::U32),
        field!(DrmModeCrtcPageFlip, fb_id, In, FieldKind::U32),
        field!(DrmModeCrtcPageFlip, flags, In, FieldKind::Flags32(DRM_PAGE_FLIP_FLAGS)),
        field!(DrmModeCrtcPageFlip, reserved, In, FieldKind::U32),
        field!(DrmModeCrtcPageFlip, user_data, In, FieldKind::X64),
    ],
};

pub static DIRTY_FB: Layout = Layout {
    name: "drm_mode_fb_dirty_cmd",
    size: size_of::<DrmModeFbDirtyCmd>(),
    fields: &[
        field!(DrmModeFbDirtyCmd, fb_id, In, FieldKind::U32),
        field!(DrmModeFbDirtyCmd, flags, In, FieldKind::Flags32(DRM_DIRTY_FLAGS)),
        field!(DrmModeFbDirtyCmd, color, In, FieldKind::X32),
        field!(DrmModeFbDirtyCmd, num_clips, In, FieldKind::U32),
    ],
};

pub static CLIP_RECT: Layout = Layout {
    name: "drm_clip_rect",
    size: size_of::<DrmClipRect>(),
    fields: &[
        field!(DrmClipRect, x1, In, FieldKind::U16),
        field!(DrmClipRect, y1, In, FieldKind::U16),
        field!(DrmClipRect, x2, In, FieldKind::U16),
        field!(DrmClipRect, y2, In, FieldKind::U16),
    ],
};

pub static CREATE_DUMB: Layout = Layout {
    name: "drm_mode_create_dumb",
    size: size_of::<DrmModeCreateDumb>(),
    fields: &[
        field!(DrmModeCreateDumb, height, In, FieldKind::U32),
        field!(DrmModeCreateDumb, width, In, FieldKind::U32),
        field!(DrmModeCreateDumb, bpp, In, FieldKind::U32),
        field!(DrmModeCreateDumb, flags, In, FieldKind::X32),
        field!(DrmModeCreateDumb, handle, Out, FieldKind::U32),
        field!(DrmModeCreateDumb, pitch, Out, FieldKind::U32),
        field!(DrmModeCreateDumb, size, Out, FieldKind::U64),
    ],
};

pub static MAP_DUMB: Layout = Layout {
    name: "drm_mode_map_dumb",
    size: size_of::<DrmModeMapDumb>(),
    fields: &[
        field!(DrmModeMapDumb, handle, In, FieldKind::U32),
        field!(DrmModeMapDumb, offset, Out, FieldKind::X64),
    ],
};

pub static DESTROY_DUMB: Layout = Layout {
    name: "drm_mode_destroy_dumb",
    size: size_of::<DrmModeDestroyDumb>(),
    fields: &[field!(DrmModeDestroyDumb, handle, In, FieldKind::U32)],
};

pub static ADD_FB2: Layout = Layout {
    name: "drm_mode_fb_cmd2",
    size: size_of::<DrmModeFbCmd2>(),
    fields: &[
        field!(DrmModeFbCmd2, fb_id, Out, FieldKind::U32),
        field!(DrmModeFbCmd2, width, In, FieldKind::U32),
        field!(DrmModeFbCmd2, height, In, FieldKind::U32),
        field!(DrmModeFbCmd2, pixel_format, In, FieldKind::Custom(4, render_fourcc)),
        field!(DrmModeFbCmd2, flags, In, FieldKind::Flags32(DRM_FB_FLAGS)),
        field!(DrmModeFbCmd2, handles, In, FieldKind::Custom(16, render_u32x4)),
        field!(DrmModeFbCmd2, pitches, In, FieldKind::Custom(16, render_u32x4)),
        field!(DrmModeFbCmd2, offsets, In, FieldKind::Custom(16, render_u32x4)),
    ],
};

/// Only meaningful with `DRM_MODE_FB_MODIFIERS` set.
static FB_MODIFIER: Field =
    field!(DrmModeFbCmd2, modifier, In, FieldKind::Custom(32, render_modifiers));

pub static CREATE_BLOB: Layout = Layout {
    name: "drm_mode_create_blob",
    size: size_of::<DrmModeCreateBlob>(),
    fields: &[
        field!(DrmModeCreateBlob, data, In, FieldKind::Addr),
        field!(DrmModeCreateBlob, length, In, FieldKind::U32),
        field!(DrmModeCreateBlob, blob_id, Out, FieldKind::U32),
    ],
};

pub static DESTROY_BLOB: Layout = Layout {
    name: "drm_mode_destroy_blob",
    size: size_of::<DrmModeDestroyBlob>(),
    fields: &[field!(DrmModeDestroyBlob, blob_id, In, FieldKind::U32)],
};

pub static LAYOUTS: &[&Layout] = &[
    &VERSION,
    &UNIQUE,
    &GET_MAGIC,
    &AUTH_MAGIC,
    &IRQ_BUSID,
    &GET_MAP,
    &GET_CLIENT,
    &STATS_ENTRY,
    &SET_VERSION,
    &MODESET_CTL,
    &GEM_CLOSE,
    &GEM_FLINK,
    &GEM_OPEN,
    &GET_CAP,
    &SET_CLIENT_CAP,
    &PRIME_HANDLE_TO_FD,
    &PRIME_FD_TO_HANDLE,
    &VBLANK_REQUEST,
    &VBLANK_REPLY,
    &CRTC_GET_SEQUENCE,
    &CRTC_QUEUE_SEQUENCE,
    &CARD_RES,
    &MODEINFO,
    &GET_CRTC,
    &SET_CRTC,
    &CURSOR,
    &CRTC_LUT,
    &CRTC_LUT_HEAD,
    &GET_ENCODER,
    &GET_CONNECTOR,
    &GET_PROPERTY,
    &SET_PROPERTY,
    &GET_BLOB,
    &GET_FB,
    &ADD_FB,
    &PAGE_FLIP,
    &DIRTY_FB,
    &CLIP_RECT,
    &CREATE_DUMB,
    &MAP_DUMB,
    &DESTROY_DUMB,
    &ADD_FB2,
    &CREATE_BLOB,
    &DESTROY_BLOB,
];

fn plain_layout(cmd: DrmIoctl) -> Option<&'static Layout> {
    use DrmIoctl::*;

    let layout = match cmd {
        GetMagic => &GET_MAGIC,
        AuthMagic => &AUTH_MAGIC,
        IrqBusid => &IRQ_BUSID,
        GetMap => &GET_MAP,
        GetClient => &GET_CLIENT,
        SetVersion => &SET_VERSION,
        ModesetCtl => &MODESET_CTL,
        GemClose => &GEM_CLOSE,
        GemFlink => &GEM_FLINK,
        GemOpen => &GEM_OPEN,
        GetCap => &GET_CAP,
        SetClientCap => &SET_CLIENT_CAP,
        PrimeHandleToFd => &PRIME_HANDLE_TO_FD,
        PrimeFdToHandle => &PRIME_FD_TO_HANDLE,
        CrtcGetSequence => &CRTC_GET_SEQUENCE,
        CrtcQueueSequence => &CRTC_QUEUE_SEQUENCE,
        ModeGetCrtc => &GET_CRTC,
        ModeCursor => &CURSOR,
        ModeGetGamma => &CRTC_LUT,
        ModeGetEncoder => &GET_ENCODER,
        ModeSetProperty => &SET_PROPERTY,
        ModeGetFb => &GET_FB,
        ModeAddFb => &ADD_FB,
        ModePageFlip => &PAGE_FLIP,
        ModeCreateDumb => &CREATE_DUMB,
        ModeMapDumb => &MAP_DUMB,
        ModeDestroyDumb => &DESTROY_DUMB,
        ModeCreatePropBlob => &CREATE_BLOB,
        ModeDestroyPropBlob => &DESTROY_BLOB,
        _ => return None,
    };
    Some(layout)
}

/// A string the kernel copied into a caller buffer, reporting its full
/// length: at most the smaller of the two lengths is valid.
fn print_returned_string(
    cx: &DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    room: u64,
    len: u64,
) -> Result<()> {
    if room == 0 {
        argf!(sf, "{label}: {}", format_addr(addr));
        return Ok(());
    }
    argf!(sf, "{label}: {}", cx.buffer_at(addr, room.min(len)));
    Ok(())
}

fn print_version(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let strings = [
        ("name", offset_of!(DrmVersion, name_len), offset_of!(DrmVersion, name)),
        ("date", offset_of!(DrmVersion, date_len), offset_of!(DrmVersion, date)),
        ("desc", offset_of!(DrmVersion, desc_len), offset_of!(DrmVersion, desc)),
    ];

    for (label, len, ptr) in strings {
        if new.has(ptr) {
            print_returned_string(cx, sf, label, old.u64(ptr), old.u64(len), new.u64(len))?;
        }
    }
    Ok(())
}

fn print_unique(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let len = offset_of!(DrmUnique, unique_len);
    let ptr = offset_of!(DrmUnique, unique);
    if new.has(ptr) {
        print_returned_string(cx, sf, "unique", old.u64(ptr), old.u64(len), new.u64(len))?;
    }
    Ok(())
}

fn print_prop_blob(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let len = offset_of!(DrmModeGetBlob, length);
    let data = offset_of!(DrmModeGetBlob, data);
    if new.has(data) {
        let room = u64::from(old.u32(len));
        print_returned_string(cx, sf, "data", old.u64(data), room, u64::from(new.u32(len)))?;
    }
    Ok(())
}

/// An id array the kernel filled up to `min(room, count)`; with no room
/// the caller was only asking for the count.
fn print_id_array(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    room: u32,
    count: u32,
    elem_size: usize,
) -> Result<()> {
    if room == 0 {
        return Ok(());
    }
    let render = if elem_size == 8 {
        print_u64_elem
    } else {
        print_u32_elem
    };
    print_array(cx, sf, label, addr, u64::from(room.min(count)), elem_size, render)?;
    Ok(())
}

fn print_card_res(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let arrays = [
        (
            "fb_id_ptr",
            offset_of!(DrmModeCardRes, fb_id_ptr),
            offset_of!(DrmModeCardRes, count_fbs),
        ),
        (
            "crtc_id_ptr",
            offset_of!(DrmModeCardRes, crtc_id_ptr),
            offset_of!(DrmModeCardRes, count_crtcs),
        ),
        (
            "connector_id_ptr",
            offset_of!(DrmModeCardRes, connector_id_ptr),
            offset_of!(DrmModeCardRes, count_connectors),
        ),
        (
            "encoder_id_ptr",
            offset_of!(DrmModeCardRes, encoder_id_ptr),
            offset_of!(DrmModeCardRes, count_encoders),
        ),
    ];

    for (label, ptr, count) in arrays {
        print_id_array(cx, sf, label, old.u64(ptr), old.u32(count), new.u32(count), 4)?;
    }
    Ok(())
}

fn print_connector(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let count_modes = offset_of!(DrmModeGetConnector, count_modes);
    let count_props = offset_of!(DrmModeGetConnector, count_props);
    let count_encoders = offset_of!(DrmModeGetConnector, count_encoders);

    print_id_array(
        cx,
        sf,
        "encoders_ptr",
        old.u64(offset_of!(DrmModeGetConnector, encoders_ptr)),
        old.u32(count_encoders),
        new.u32(count_encoders),
        4,
    )?;

    let modes_room = old.u32(count_modes);
    if modes_room != 0 {
        print_array(
            cx,
            sf,
            "modes_ptr",
            old.u64(offset_of!(DrmModeGetConnector, modes_ptr)),
            u64::from(modes_room.min(new.u32(count_modes))),
            size_of::<DrmModeModeinfo>(),
            |cx, sf, elem, _| {
                print_element(sf, cx, &MODEINFO, &RawStruct::new(elem))?;
                Ok(true)
            },
        )?;
    }

    let (props_room, props) = (old.u32(count_props), new.u32(count_props));
    print_id_array(
        cx,
        sf,
        "props_ptr",
        old.u64(offset_of!(DrmModeGetConnector, props_ptr)),
        props_room,
        props,
        4,
    )?;
    print_id_array(
        cx,
        sf,
        "prop_values_ptr",
        old.u64(offset_of!(DrmModeGetConnector, prop_values_ptr)),
        props_room,
        props,
        8,
    )
}

fn print_property(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    new: &RawStruct<'_>,
) -> Result<()> {
    let count = offset_of!(DrmModeGetProperty, count_values);
    print_id_array(
        cx,
        sf,
        "values_ptr",
        old.u64(offset_of!(DrmModeGetProperty, values_ptr)),
        old.u32(count),
        new.u32(count),
        8,
    )
}

fn print_set_crtc(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<DrmModeCrtc>())? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    with_struct!(sf,
        print_entry_fields(sf, cx, &SET_CRTC, &raw)?;
        if raw.u32(offset_of!(DrmModeCrtc, mode_valid)) != 0 {
            print_field(sf, cx, &raw, &CRTC_MODE)?;
        }
        print_array(
            cx,
            sf,
            "set_connectors_ptr",
            raw.u64(offset_of!(DrmModeCrtc, set_connectors_ptr)),
            u64::from(raw.u32(offset_of!(DrmModeCrtc, count_connectors))),
            4,
            print_u32_elem,
        )?;
    );
    Ok(())
}

fn print_set_gamma(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<DrmModeCrtcLut>())? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);
    let size = u64::from(raw.u32(offset_of!(DrmModeCrtcLut, gamma_size)));
    let channels = [
        ("red", offset_of!(DrmModeCrtcLut, red)),
        ("green", offset_of!(DrmModeCrtcLut, green)),
        ("blue", offset_of!(DrmModeCrtcLut, blue)),
    ];

    arg!(sf, "arg:");
    with_struct!(sf,
        print_entry_fields(sf, cx, &CRTC_LUT_HEAD, &raw)?;
        for (label, ptr) in channels {
            print_array(cx, sf, label, raw.u64(ptr), size, 2, |_, sf, elem, _| {
                argf!(sf, "{}", RawStruct::new(elem).u16(0));
                Ok(true)
            })?;
        }
    );
    Ok(())
}

fn print_dirty_fb(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<DrmModeFbDirtyCmd>())? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    with_struct!(sf,
        print_entry_fields(sf, cx, &DIRTY_FB, &raw)?;
        print_array(
            cx,
            sf,
            "clips_ptr",
            raw.u64(offset_of!(DrmModeFbDirtyCmd, clips_ptr)),
            u64::from(raw.u32(offset_of!(DrmModeFbDirtyCmd, num_clips))),
            size_of::<DrmClipRect>(),
            |cx, sf, elem, _| {
                print_element(sf, cx, &CLIP_RECT, &RawStruct::new(elem))?;
                Ok(true)
            },
        )?;
    );
    Ok(())
}

fn print_add_fb2_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<DecodeStatus> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, ADD_FB2.size)? else {
        return Ok(DecodeStatus::Complete);
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    sf.push_depth(b"{")?;
    print_entry_fields(sf, cx, &ADD_FB2, &raw)?;
    if raw.u32(offset_of!(DrmModeFbCmd2, flags)) & MODE_FB_MODIFIERS != 0 {
        print_field(sf, cx, &raw, &FB_MODIFIER)?;
    }
    occ.set_private(Snapshot { addr, bytes });
    Ok(DecodeStatus::NeedsExit)
}

fn print_wait_vblank_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<DecodeStatus> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<DrmWaitVblank>())? else {
        return Ok(DecodeStatus::Complete);
    };

    arg!(sf, "arg:");
    sf.push_depth(b"{")?;
    arg!(sf, "request:");
    with_struct!(sf, print_all_fields(sf, cx, &VBLANK_REQUEST, &RawStruct::new(&bytes))?;);
    occ.set_private(Snapshot { addr, bytes });
    Ok(DecodeStatus::NeedsExit)
}

/// The same bytes, read back as the reply half of the union.
fn print_wait_vblank_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<()> {
    let Some(snapshot) = occ.take_private::<Snapshot>() else {
        return Ok(());
    };

    if !occ.failed() {
        if let Some(bytes) = refetch(cx, sf, &snapshot)? {
            arg!(sf, "reply:");
            with_struct!(sf, print_all_fields(sf, cx, &VBLANK_REPLY, &RawStruct::new(&bytes))?;);
        }
    }

    sf.pop_depth(b"}")
}

fn print_stats(
    cx: &mut DecodeContext<'_>,
    occ: &Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<()> {
    if occ.failed() {
        argf!(sf, "arg: {}", format_addr(addr));
        return Ok(());
    }

    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<DrmStats>())? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);
    let count = raw.u64(offset_of!(DrmStats, count));
    let data = offset_of!(DrmStats, data);

    arg!(sf, "arg:");
    with_struct!(sf,
        argf!(sf, "count: {count}");
        // The inline array has room for 15 entries whatever count says.
        print_local_array(
            cx,
            sf,
            "data",
            raw.bytes(data, bytes.len()),
            count,
            size_of::<DrmStatsEntry>(),
            |cx, sf, elem, _| {
                print_element(sf, cx, &STATS_ENTRY, &RawStruct::new(elem))?;
                Ok(true)
            },
        )?;
    );
    Ok(())
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    request: u32,
    arg: u64,
) -> Result<Option<DecodeStatus>> {
    let nr = ioc_nr(request);
    if (DRM_COMMAND_BASE..DRM_COMMAND_END).contains(&nr) {
        trace!("driver-private drm request {nr:#x}");
        return Ok(None);
    }

    let cmd = DrmIoctl::from_code(request);
    let Some(name) = cmd.name() else {
        return Ok(None);
    };

    argf!(sf, "request: {name}");

    if let Some(layout) = plain_layout(cmd) {
        return decode_struct_entry(cx, occ, sf, "arg", arg, layout).map(Some);
    }

    use DrmIoctl::*;
    let status = match cmd {
        SetMaster | DropMaster => DecodeStatus::Complete,
        Version => enter_struct(cx, occ, sf, "arg", arg, &VERSION)?,
        GetUnique => enter_struct(cx, occ, sf, "arg", arg, &UNIQUE)?,
        ModeGetResources => enter_struct(cx, occ, sf, "arg", arg, &CARD_RES)?,
        ModeGetConnector => enter_struct(cx, occ, sf, "arg", arg, &GET_CONNECTOR)?,
        ModeGetProperty => enter_struct(cx, occ, sf, "arg", arg, &GET_PROPERTY)?,
        ModeGetPropBlob => enter_struct(cx, occ, sf, "arg", arg, &GET_BLOB)?,
        GetStats => defer_pointee(sf, arg)?,
        WaitVblank => print_wait_vblank_entry(cx, occ, sf, arg)?,
        ModeAddFb2 => print_add_fb2_entry(cx, occ, sf, arg)?,
        ModeSetCrtc => {
            print_set_crtc(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        ModeSetGamma => {
            print_set_gamma(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        ModeDirtyFb => {
            print_dirty_fb(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        ModeRmFb => {
            print_pointee(cx, sf, arg, 4, render_u32)?;
            DecodeStatus::Complete
        }
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
    let cmd = DrmIoctl::from_code(request);

    if let Some(layout) = plain_layout(cmd) {
        return decode_struct_exit(cx, occ, sf, layout);
    }

    use DrmIoctl::*;
    match cmd {
        Version => exit_struct(cx, occ, sf, &VERSION, print_version),
        GetUnique => exit_struct(cx, occ, sf, &UNIQUE, print_unique),
        ModeGetResources => exit_struct(cx, occ, sf, &CARD_RES, print_card_res),
        ModeGetConnector => exit_struct(cx, occ, sf, &GET_CONNECTOR, print_connector),
        ModeGetProperty => exit_struct(cx, occ, sf, &GET_PROPERTY, print_property),
        ModeGetPropBlob => exit_struct(cx, occ, sf, &GET_BLOB, print_prop_blob),
        ModeAddFb2 => exit_struct(cx, occ, sf, &ADD_FB2, no_tail),
        GetStats => print_stats(cx, occ, sf, arg),
        WaitVblank => print_wait_vblank_exit(cx, occ, sf),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use argus_common::ioctl::iowr;

    use super::*;
    use crate::config::DecodeConfig;
    use crate::mem::MemoryImage;
    use crate::scratch::ScratchBuffers;

    #[test]
    fn vblank_type_words() {
        let mem = MemoryImage::new();
        let config = DecodeConfig::default();
        let mut scratch = ScratchBuffers::new();
        let cx = DecodeContext::new(&mem, &config, &mut scratch);

        let word = (1u32 | 0x0400_0000 | (2 << 1)).to_ne_bytes();
        assert_eq!(
            render_vblank_type(&RawStruct::new(&word), &cx),
            "_DRM_VBLANK_RELATIVE|_DRM_VBLANK_EVENT|2<<_DRM_VBLANK_HIGH_CRTC_SHIFT"
        );

        let word = 0u32.to_ne_bytes();
        assert_eq!(
            render_vblank_type(&RawStruct::new(&word), &cx),
            "_DRM_VBLANK_ABSOLUTE"
        );
    }

    #[test]
    fn driver_range_is_not_claimed() {
        let mem = MemoryImage::new();
        let config = DecodeConfig::default();
        let mut scratch = ScratchBuffers::new();
        let mut cx = DecodeContext::new(&mem, &config, &mut scratch);
        let mut occ = Occurrence::new(1, Default::default());

        let mut output = Vec::new();
        let formatter = crate::formatting::Formatter::new(
            &mut output,
            crate::formatting::FormattingStyle::OneLine,
        );
        let mut sf = formatter.push_syscall(1, 16).expect("formatter");

        let request = iowr(b'd', 0x44, 16);
        let handled = decode_entry(&mut cx, &mut occ, &mut sf, request, 0x1000).expect("decode");
        assert!(handled.is_none());
    }
}
