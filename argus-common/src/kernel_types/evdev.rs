// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use core::mem::size_of;

use crate::ioctl::{ior, iow};

pub const EVDEV_IOCTL_BASE: u8 = b'E';

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;
pub const EV_MSC: u16 = 0x04;
pub const EV_SW: u16 = 0x05;
pub const EV_LED: u16 = 0x11;
pub const EV_SND: u16 = 0x12;
pub const EV_REP: u16 = 0x14;
pub const EV_FF: u16 = 0x15;
pub const EV_PWR: u16 = 0x16;
pub const EV_FF_STATUS: u16 = 0x17;

pub const FF_RUMBLE: u16 = 0x50;
pub const FF_PERIODIC: u16 = 0x51;
pub const FF_CONSTANT: u16 = 0x52;
pub const FF_SPRING: u16 = 0x53;
pub const FF_FRICTION: u16 = 0x54;
pub const FF_DAMPER: u16 = 0x55;
pub const FF_INERTIA: u16 = 0x56;
pub const FF_RAMP: u16 = 0x57;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct InputId {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct InputAbsinfo {
    pub value: i32,
    pub minimum: i32,
    pub maximum: i32,
    pub fuzz: i32,
    pub flat: i32,
    pub resolution: i32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct InputKeymapEntry {
    pub flags: u8,
    pub len: u8,
    pub index: u16,
    pub keycode: u32,
    pub scancode: [u8; 32],
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct InputMask {
    pub mask_type: u32,
    pub codes_size: u32,
    pub codes_ptr: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct FfEnvelope {
    pub attack_length: u16,
    pub attack_level: u16,
    pub fade_length: u16,
    pub fade_level: u16,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct FfConstantEffect {
    pub level: i16,
    pub envelope: FfEnvelope,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct FfRampEffect {
    pub start_level: i16,
    pub end_level: i16,
    pub envelope: FfEnvelope,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct FfConditionEffect {
    pub right_saturation: u16,
    pub left_saturation: u16,
    pub right_coeff: i16,
    pub left_coeff: i16,
    pub deadband: u16,
    pub center: i16,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct FfPeriodicEffect {
    pub waveform: u16,
    pub period: u16,
    pub magnitude: i16,
    pub offset: i16,
    pub phase: u16,
    pub envelope: FfEnvelope,
    pub _pad: u16,
    pub custom_len: u32,
    pub custom_data: u64,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct FfRumbleEffect {
    pub strong_magnitude: u16,
    pub weak_magnitude: u16,
}

/// `struct ff_effect`; `u` is the union selected by `effect_type`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct FfEffect {
    pub effect_type: u16,
    pub id: i16,
    pub direction: u16,
    pub trigger_button: u16,
    pub trigger_interval: u16,
    pub replay_length: u16,
    pub replay_delay: u16,
    pub _pad: u16,
    pub u: [u64; 4],
}

pub const FF_EFFECT_UNION_SIZE: usize = 32;

const E: u8 = EVDEV_IOCTL_BASE;

pub const EVIOCGVERSION: u32 = ior(E, 0x01, size_of::<i32>());
pub const EVIOCGID: u32 = ior(E, 0x02, size_of::<InputId>());
pub const EVIOCGREP: u32 = ior(E, 0x03, 2 * size_of::<u32>());
pub const EVIOCSREP: u32 = iow(E, 0x03, 2 * size_of::<u32>());
pub const EVIOCGKEYCODE: u32 = ior(E, 0x04, 2 * size_of::<u32>());
pub const EVIOCGKEYCODE_V2: u32 = ior(E, 0x04, size_of::<InputKeymapEntry>());
pub const EVIOCSKEYCODE: u32 = iow(E, 0x04, 2 * size_of::<u32>());
pub const EVIOCSKEYCODE_V2: u32 = iow(E, 0x04, size_of::<InputKeymapEntry>());
pub const EVIOCSFF: u32 = iow(E, 0x80, size_of::<FfEffect>());
pub const EVIOCRMFF: u32 = iow(E, 0x81, size_of::<i32>());
pub const EVIOCGEFFECTS: u32 = ior(E, 0x84, size_of::<i32>());
pub const EVIOCGRAB: u32 = iow(E, 0x90, size_of::<i32>());
pub const EVIOCREVOKE: u32 = iow(E, 0x91, size_of::<i32>());
pub const EVIOCGMASK: u32 = ior(E, 0x92, size_of::<InputMask>());
pub const EVIOCSMASK: u32 = iow(E, 0x93, size_of::<InputMask>());
pub const EVIOCSCLOCKID: u32 = iow(E, 0xa0, size_of::<i32>());

/// Variable-length read requests carry the buffer size in the size bits.
pub const EVIOCGNAME_NR: u8 = 0x06;
pub const EVIOCGPHYS_NR: u8 = 0x07;
pub const EVIOCGUNIQ_NR: u8 = 0x08;
pub const EVIOCGPROP_NR: u8 = 0x09;
pub const EVIOCGMTSLOTS_NR: u8 = 0x0a;
pub const EVIOCGKEY_NR: u8 = 0x18;
pub const EVIOCGLED_NR: u8 = 0x19;
pub const EVIOCGSND_NR: u8 = 0x1a;
pub const EVIOCGSW_NR: u8 = 0x1b;
/// `EVIOCGBIT(ev, len)` is `0x20 + ev`.
pub const EVIOCGBIT_NR: u8 = 0x20;
/// `EVIOCGABS(abs)` is `0x40 + abs`, `EVIOCSABS(abs)` is `0xc0 + abs`.
pub const EVIOCGABS_NR: u8 = 0x40;
pub const EVIOCSABS_NR: u8 = 0xc0;
pub const ABS_CNT: u8 = 0x40;
