// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use core::mem::size_of;

use crate::ioctl::{io, ior, iow, iowr};

pub const DRM_IOCTL_BASE: u8 = b'd';
/// Request numbers in `DRM_COMMAND_BASE..DRM_COMMAND_END` belong to the driver.
pub const DRM_COMMAND_BASE: u8 = 0x40;
pub const DRM_COMMAND_END: u8 = 0xa0;
pub const DRM_DISPLAY_MODE_LEN: usize = 32;
pub const DRM_PROP_NAME_LEN: usize = 32;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmVersion {
    pub version_major: i32,
    pub version_minor: i32,
    pub version_patchlevel: i32,
    pub _pad: i32,
    pub name_len: u64,
    pub name: u64,
    pub date_len: u64,
    pub date: u64,
    pub desc_len: u64,
    pub desc: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmUnique {
    pub unique_len: u64,
    pub unique: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmAuth {
    pub magic: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmIrqBusid {
    pub irq: i32,
    pub busnum: i32,
    pub devnum: i32,
    pub funcnum: i32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmMap {
    pub offset: u64,
    pub size: u64,
    pub map_type: u32,
    pub flags: u32,
    pub handle: u64,
    pub mtrr: i32,
    pub _pad: i32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmClient {
    pub idx: i32,
    pub auth: i32,
    pub pid: u64,
    pub uid: u64,
    pub magic: u64,
    pub iocs: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmStatsEntry {
    pub value: u64,
    pub stat_type: u32,
    pub _pad: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmStats {
    pub count: u64,
    pub data: [DrmStatsEntry; 15],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmSetVersion {
    pub drm_di_major: i32,
    pub drm_di_minor: i32,
    pub drm_dd_major: i32,
    pub drm_dd_minor: i32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModesetCtl {
    pub crtc: u32,
    pub cmd: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmGemClose {
    pub handle: u32,
    pub _pad: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmGemFlink {
    pub handle: u32,
    pub name: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmGemOpen {
    pub name: u32,
    pub handle: u32,
    pub size: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmGetCap {
    pub capability: u64,
    pub value: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmPrimeHandle {
    pub handle: u32,
    pub flags: u32,
    pub fd: i32,
}

/// `union drm_wait_vblank`: the request view on entry, the reply on exit.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmWaitVblank {
    pub vbl_type: u32,
    pub sequence: u32,
    pub tval_sec: i64,
    pub tval_usec: i64,
}

pub const WAIT_VBLANK_REQUEST_SIGNAL: usize = 8;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmCrtcGetSequence {
    pub crtc_id: u32,
    pub active: u32,
    pub sequence: u64,
    pub sequence_ns: i64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmCrtcQueueSequence {
    pub crtc_id: u32,
    pub flags: u32,
    pub sequence: u64,
    pub user_data: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeCardRes {
    pub fb_id_ptr: u64,
    pub crtc_id_ptr: u64,
    pub connector_id_ptr: u64,
    pub encoder_id_ptr: u64,
    pub count_fbs: u32,
    pub count_crtcs: u32,
    pub count_connectors: u32,
    pub count_encoders: u32,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeModeinfo {
    pub clock: u32,
    pub hdisplay: u16,
    pub hsync_start: u16,
    pub hsync_end: u16,
    pub htotal: u16,
    pub hskew: u16,
    pub vdisplay: u16,
    pub vsync_start: u16,
    pub vsync_end: u16,
    pub vtotal: u16,
    pub vscan: u16,
    pub vrefresh: u32,
    pub flags: u32,
    pub mode_type: u32,
    pub name: [u8; DRM_DISPLAY_MODE_LEN],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeCrtc {
    pub set_connectors_ptr: u64,
    pub count_connectors: u32,
    pub crtc_id: u32,
    pub fb_id: u32,
    pub x: u32,
    pub y: u32,
    pub gamma_size: u32,
    pub mode_valid: u32,
    pub mode: DrmModeModeinfo,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeCursor {
    pub flags: u32,
    pub crtc_id: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub handle: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeCrtcLut {
    pub crtc_id: u32,
    pub gamma_size: u32,
    pub red: u64,
    pub green: u64,
    pub blue: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeGetEncoder {
    pub encoder_id: u32,
    pub encoder_type: u32,
    pub crtc_id: u32,
    pub possible_crtcs: u32,
    pub possible_clones: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeGetConnector {
    pub encoders_ptr: u64,
    pub modes_ptr: u64,
    pub props_ptr: u64,
    pub prop_values_ptr: u64,
    pub count_modes: u32,
    pub count_props: u32,
    pub count_encoders: u32,
    pub encoder_id: u32,
    pub connector_id: u32,
    pub connector_type: u32,
    pub connector_type_id: u32,
    pub connection: u32,
    pub mm_width: u32,
    pub mm_height: u32,
    pub subpixel: u32,
    pub _pad: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeGetProperty {
    pub values_ptr: u64,
    pub enum_blob_ptr: u64,
    pub prop_id: u32,
    pub flags: u32,
    pub name: [u8; DRM_PROP_NAME_LEN],
    pub count_values: u32,
    pub count_enum_blobs: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeConnectorSetProperty {
    pub value: u64,
    pub prop_id: u32,
    pub connector_id: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeGetBlob {
    pub blob_id: u32,
    pub length: u32,
    pub data: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeFbCmd {
    pub fb_id: u32,
    pub width: u32,
    pub height: u32,
    pub pitch: u32,
    pub bpp: u32,
    pub depth: u32,
    pub handle: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeCrtcPageFlip {
    pub crtc_id: u32,
    pub fb_id: u32,
    pub flags: u32,
    pub reserved: u32,
    pub user_data: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeFbDirtyCmd {
    pub fb_id: u32,
    pub flags: u32,
    pub color: u32,
    pub num_clips: u32,
    pub clips_ptr: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmClipRect {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeCreateDumb {
    pub height: u32,
    pub width: u32,
    pub bpp: u32,
    pub flags: u32,
    pub handle: u32,
    pub pitch: u32,
    pub size: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeMapDumb {
    pub handle: u32,
    pub _pad: u32,
    pub offset: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeDestroyDumb {
    pub handle: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeFbCmd2 {
    pub fb_id: u32,
    pub width: u32,
    pub height: u32,
    pub pixel_format: u32,
    pub flags: u32,
    pub handles: [u32; 4],
    pub pitches: [u32; 4],
    pub offsets: [u32; 4],
    pub _pad: u32,
    pub modifier: [u64; 4],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeCreateBlob {
    pub data: u64,
    pub length: u32,
    pub blob_id: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct DrmModeDestroyBlob {
    pub blob_id: u32,
}

const D: u8 = DRM_IOCTL_BASE;

pub const DRM_IOCTL_VERSION: u32 = iowr(D, 0x00, size_of::<DrmVersion>());
pub const DRM_IOCTL_GET_UNIQUE: u32 = iowr(D, 0x01, size_of::<DrmUnique>());
pub const DRM_IOCTL_GET_MAGIC: u32 = ior(D, 0x02, size_of::<DrmAuth>());
pub const DRM_IOCTL_IRQ_BUSID: u32 = iowr(D, 0x03, size_of::<DrmIrqBusid>());
pub const DRM_IOCTL_GET_MAP: u32 = iowr(D, 0x04, size_of::<DrmMap>());
pub const DRM_IOCTL_GET_CLIENT: u32 = iowr(D, 0x05, size_of::<DrmClient>());
pub const DRM_IOCTL_GET_STATS: u32 = ior(D, 0x06, size_of::<DrmStats>());
pub const DRM_IOCTL_SET_VERSION: u32 = iowr(D, 0x07, size_of::<DrmSetVersion>());
pub const DRM_IOCTL_MODESET_CTL: u32 = iow(D, 0x08, size_of::<DrmModesetCtl>());
pub const DRM_IOCTL_GEM_CLOSE: u32 = iow(D, 0x09, size_of::<DrmGemClose>());
pub const DRM_IOCTL_GEM_FLINK: u32 = iowr(D, 0x0a, size_of::<DrmGemFlink>());
pub const DRM_IOCTL_GEM_OPEN: u32 = iowr(D, 0x0b, size_of::<DrmGemOpen>());
pub const DRM_IOCTL_GET_CAP: u32 = iowr(D, 0x0c, size_of::<DrmGetCap>());
pub const DRM_IOCTL_SET_CLIENT_CAP: u32 = iow(D, 0x0d, size_of::<DrmGetCap>());
pub const DRM_IOCTL_AUTH_MAGIC: u32 = iow(D, 0x11, size_of::<DrmAuth>());
pub const DRM_IOCTL_SET_MASTER: u32 = io(D, 0x1e);
pub const DRM_IOCTL_DROP_MASTER: u32 = io(D, 0x1f);
pub const DRM_IOCTL_PRIME_HANDLE_TO_FD: u32 = iowr(D, 0x2d, size_of::<DrmPrimeHandle>());
pub const DRM_IOCTL_PRIME_FD_TO_HANDLE: u32 = iowr(D, 0x2e, size_of::<DrmPrimeHandle>());
pub const DRM_IOCTL_WAIT_VBLANK: u32 = iowr(D, 0x3a, size_of::<DrmWaitVblank>());
pub const DRM_IOCTL_CRTC_GET_SEQUENCE: u32 = iowr(D, 0x3b, size_of::<DrmCrtcGetSequence>());
pub const DRM_IOCTL_CRTC_QUEUE_SEQUENCE: u32 = iowr(D, 0x3c, size_of::<DrmCrtcQueueSequence>());
pub const DRM_IOCTL_MODE_GETRESOURCES: u32 = iowr(D, 0xa0, size_of::<DrmModeCardRes>());
pub const DRM_IOCTL_MODE_GETCRTC: u32 = iowr(D, 0xa1, size_of::<DrmModeCrtc>());
pub const DRM_IOCTL_MODE_SETCRTC: u32 = iowr(D, 0xa2, size_of::<DrmModeCrtc>());
pub const DRM_IOCTL_MODE_CURSOR: u32 = iowr(D, 0xa3, size_of::<DrmModeCursor>());
pub const DRM_IOCTL_MODE_GETGAMMA: u32 = iowr(D, 0xa4, size_of::<DrmModeCrtcLut>());
pub const DRM_IOCTL_MODE_SETGAMMA: u32 = iowr(D, 0xa5, size_of::<DrmModeCrtcLut>());
pub const DRM_IOCTL_MODE_GETENCODER: u32 = iowr(D, 0xa6, size_of::<DrmModeGetEncoder>());
pub const DRM_IOCTL_MODE_GETCONNECTOR: u32 = iowr(D, 0xa7, size_of::<DrmModeGetConnector>());
pub const DRM_IOCTL_MODE_GETPROPERTY: u32 = iowr(D, 0xaa, size_of::<DrmModeGetProperty>());
pub const DRM_IOCTL_MODE_SETPROPERTY: u32 =
    iowr(D, 0xab, size_of::<DrmModeConnectorSetProperty>());
pub const DRM_IOCTL_MODE_GETPROPBLOB: u32 = iowr(D, 0xac, size_of::<DrmModeGetBlob>());
pub const DRM_IOCTL_MODE_GETFB: u32 = iowr(D, 0xad, size_of::<DrmModeFbCmd>());
pub const DRM_IOCTL_MODE_ADDFB: u32 = iowr(D, 0xae, size_of::<DrmModeFbCmd>());
pub const DRM_IOCTL_MODE_RMFB: u32 = iowr(D, 0xaf, size_of::<u32>());
pub const DRM_IOCTL_MODE_PAGE_FLIP: u32 = iowr(D, 0xb0, size_of::<DrmModeCrtcPageFlip>());
pub const DRM_IOCTL_MODE_DIRTYFB: u32 = iowr(D, 0xb1, size_of::<DrmModeFbDirtyCmd>());
pub const DRM_IOCTL_MODE_CREATE_DUMB: u32 = iowr(D, 0xb2, size_of::<DrmModeCreateDumb>());
pub const DRM_IOCTL_MODE_MAP_DUMB: u32 = iowr(D, 0xb3, size_of::<DrmModeMapDumb>());
pub const DRM_IOCTL_MODE_DESTROY_DUMB: u32 = iowr(D, 0xb4, size_of::<DrmModeDestroyDumb>());
pub const DRM_IOCTL_MODE_ADDFB2: u32 = iowr(D, 0xb8, size_of::<DrmModeFbCmd2>());
pub const DRM_IOCTL_MODE_CREATEPROPBLOB: u32 = iowr(D, 0xbd, size_of::<DrmModeCreateBlob>());
pub const DRM_IOCTL_MODE_DESTROYPROPBLOB: u32 = iowr(D, 0xbe, size_of::<DrmModeDestroyBlob>());
