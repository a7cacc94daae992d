// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

//! Input device ioctls (type byte `'E'`). Several requests encode an index
//! or a buffer length in their number and size bits, so they are matched by
//! shape rather than by exact code.

use std::mem::{offset_of, size_of};

use anyhow::Result;
use argus_common::{
    ioctl::{ioc, ioc_dir, ioc_nr, ioc_size, IOC_READ, IOC_WRITE},
    kernel_types::evdev::*,
    raw::RawStruct,
    PAGE_SIZE,
};
use log::debug;

use crate::{
    arg, argf,
    decoders::ioctl::{defer_pointee, print_pointee, print_pointee_exit, render_int},
    dispatch::{command_enum, DecodeContext, DecodeStatus},
    field,
    format_helpers::format_addr,
    formatting::SyscallFormatter,
    layout::{
        decode_struct_entry, decode_struct_entry_sized, decode_struct_exit, enter_struct,
        exit_struct, fetch_or_print, no_tail, print_all_fields, print_element, print_entry_fields,
        Dir, Field, FieldKind, Layout, Snapshot,
    },
    scratch::ScratchPurpose,
    state::Occurrence,
    walker::{print_array, print_local_array},
    with_struct,
    xlat::{evdev::*, format_bit_list, Xlat},
};

command_enum! {
    pub enum EvdevIoctl: u32 {
        GetVersion = EVIOCGVERSION => "EVIOCGVERSION",
        GetId = EVIOCGID => "EVIOCGID",
        GetRep = EVIOCGREP => "EVIOCGREP",
        SetRep = EVIOCSREP => "EVIOCSREP",
        GetKeycode = EVIOCGKEYCODE => "EVIOCGKEYCODE",
        GetKeycodeV2 = EVIOCGKEYCODE_V2 => "EVIOCGKEYCODE_V2",
        SetKeycode = EVIOCSKEYCODE => "EVIOCSKEYCODE",
        SetKeycodeV2 = EVIOCSKEYCODE_V2 => "EVIOCSKEYCODE_V2",
        SetFf = EVIOCSFF => "EVIOCSFF",
        RemoveFf = EVIOCRMFF => "EVIOCRMFF",
        GetEffects = EVIOCGEFFECTS => "EVIOCGEFFECTS",
        Grab = EVIOCGRAB => "EVIOCGRAB",
        Revoke = EVIOCREVOKE => "EVIOCREVOKE",
        GetMask = EVIOCGMASK => "EVIOCGMASK",
        SetMask = EVIOCSMASK => "EVIOCSMASK",
        SetClockId = EVIOCSCLOCKID => "EVIOCSCLOCKID",
    }
}

/// Requests whose number or size bits are parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shaped {
    String(&'static str),
    Bits(&'static str, Xlat),
    EventBits(u8),
    MtSlots,
    GetAbs(u8),
    SetAbs(u8),
}

fn classify(request: u32) -> Option<Shaped> {
    let nr = ioc_nr(request);

    if ioc_dir(request) == IOC_WRITE {
        return (nr >= EVIOCSABS_NR).then(|| Shaped::SetAbs(nr - EVIOCSABS_NR));
    }
    if ioc_dir(request) != IOC_READ {
        return None;
    }

    let shaped = match nr {
        EVIOCGNAME_NR => Shaped::String("EVIOCGNAME"),
        EVIOCGPHYS_NR => Shaped::String("EVIOCGPHYS"),
        EVIOCGUNIQ_NR => Shaped::String("EVIOCGUNIQ"),
        EVIOCGPROP_NR => Shaped::Bits("EVIOCGPROP", INPUT_PROPS),
        EVIOCGMTSLOTS_NR => Shaped::MtSlots,
        EVIOCGKEY_NR => Shaped::Bits("EVIOCGKEY", KEY_CODES),
        EVIOCGLED_NR => Shaped::Bits("EVIOCGLED", LED_CODES),
        EVIOCGSND_NR => Shaped::Bits("EVIOCGSND", SND_CODES),
        EVIOCGSW_NR => Shaped::Bits("EVIOCGSW", SW_CODES),
        nr if (EVIOCGBIT_NR..EVIOCGABS_NR).contains(&nr) => Shaped::EventBits(nr - EVIOCGBIT_NR),
        nr if (EVIOCGABS_NR..EVIOCGABS_NR + ABS_CNT).contains(&nr) => {
            Shaped::GetAbs(nr - EVIOCGABS_NR)
        }
        _ => return None,
    };
    Some(shaped)
}

/// Everything `argus list evdev` shows: the fixed requests, then the
/// parameterised ones with zero in their size bits.
pub fn known_requests() -> Vec<(u64, &'static str)> {
    let shaped = [
        (EVIOCGNAME_NR, "EVIOCGNAME"),
        (EVIOCGPHYS_NR, "EVIOCGPHYS"),
        (EVIOCGUNIQ_NR, "EVIOCGUNIQ"),
        (EVIOCGPROP_NR, "EVIOCGPROP"),
        (EVIOCGMTSLOTS_NR, "EVIOCGMTSLOTS"),
        (EVIOCGKEY_NR, "EVIOCGKEY"),
        (EVIOCGLED_NR, "EVIOCGLED"),
        (EVIOCGSND_NR, "EVIOCGSND"),
        (EVIOCGSW_NR, "EVIOCGSW"),
        (EVIOCGBIT_NR, "EVIOCGBIT"),
        (EVIOCGABS_NR, "EVIOCGABS"),
    ];

    let mut known: Vec<(u64, &'static str)> = EvdevIoctl::KNOWN
        .iter()
        .map(|&(code, name)| (u64::from(code), name))
        .collect();
    known.extend(
        shaped
            .iter()
            .map(|&(nr, name)| (u64::from(ioc(IOC_READ, EVDEV_IOCTL_BASE, nr, 0)), name)),
    );
    known.push((
        u64::from(ioc(IOC_WRITE, EVDEV_IOCTL_BASE, EVIOCSABS_NR, 0)),
        "EVIOCSABS",
    ));
    known
}

fn shaped_name(cx: &DecodeContext<'_>, shaped: Shaped, size: usize) -> String {
    match shaped {
        Shaped::String(name) | Shaped::Bits(name, _) => format!("{name}({size})"),
        Shaped::EventBits(ev) => format!("EVIOCGBIT({}, {size})", cx.xval(u64::from(ev), EV_TYPES)),
        Shaped::MtSlots => format!("EVIOCGMTSLOTS({size})"),
        Shaped::GetAbs(abs) => format!("EVIOCGABS({})", cx.xval(u64::from(abs), ABS_CODES)),
        Shaped::SetAbs(abs) => format!("EVIOCSABS({})", cx.xval(u64::from(abs), ABS_CODES)),
    }
}

fn render_version(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    format!("0x{:x}", raw.u32(0))
}

fn render_x16(raw: &RawStruct<'_>, _cx: &DecodeContext<'_>) -> String {
    format!("0x{:04x}", raw.u16(0))
}

fn render_keymap_flags(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.flags(u64::from(raw.u8(0)), KEYMAP_FLAGS)
}

fn render_clock_id(raw: &RawStruct<'_>, cx: &DecodeContext<'_>) -> String {
    cx.xval(u64::from(raw.u32(0)), CLOCK_IDS)
}

pub static INPUT_ID: Layout = Layout {
    name: "input_id",
    size: size_of::<InputId>(),
    fields: &[
        field!(InputId, bustype, Out, FieldKind::Xval16(BUS_TYPES)),
        field!(InputId, vendor, Out, FieldKind::Custom(2, render_x16)),
        field!(InputId, product, Out, FieldKind::Custom(2, render_x16)),
        field!(InputId, version, Out, FieldKind::Custom(2, render_x16)),
    ],
};

/// `unsigned int[2]`: delay and period in milliseconds.
pub static REP_GET: Layout = Layout {
    name: "rep",
    size: 8,
    fields: &[
        Field {
            name: "delay",
            offset: 0,
            dir: Dir::Out,
            kind: FieldKind::U32,
        },
        Field {
            name: "period",
            offset: 4,
            dir: Dir::Out,
            kind: FieldKind::U32,
        },
    ],
};

pub static REP_SET: Layout = Layout {
    name: "rep",
    size: 8,
    fields: &[
        Field {
            name: "delay",
            offset: 0,
            dir: Dir::In,
            kind: FieldKind::U32,
        },
        Field {
            name: "period",
            offset: 4,
            dir: Dir::In,
            kind: FieldKind::U32,
        },
    ],
};

/// `unsigned int[2]`: scancode, keycode.
pub static KEYCODE_GET: Layout = Layout {
    name: "keycode",
    size: 8,
    fields: &[
        Field {
            name: "scancode",
            offset: 0,
            dir: Dir::In,
            kind: FieldKind::X32,
        },
        Field {
            name: "keycode",
            offset: 4,
            dir: Dir::Out,
            kind: FieldKind::Xval32(KEY_CODES),
        },
    ],
};

pub static KEYCODE_SET: Layout = Layout {
    name: "keycode",
    size: 8,
    fields: &[
        Field {
            name: "scancode",
            offset: 0,
            dir: Dir::In,
            kind: FieldKind::X32,
        },
        Field {
            name: "keycode",
            offset: 4,
            dir: Dir::In,
            kind: FieldKind::Xval32(KEY_CODES),
        },
    ],
};

pub static KEYMAP_GET: Layout = Layout {
    name: "input_keymap_entry",
    size: size_of::<InputKeymapEntry>(),
    fields: &[
        field!(InputKeymapEntry, flags, In, FieldKind::Custom(1, render_keymap_flags)),
        field!(InputKeymapEntry, len, In, FieldKind::U8),
        field!(InputKeymapEntry, index, In, FieldKind::U16),
        field!(InputKeymapEntry, keycode, Out, FieldKind::Xval32(KEY_CODES)),
    ],
};

pub static KEYMAP_SET: Layout = Layout {
    name: "input_keymap_entry",
    size: size_of::<InputKeymapEntry>(),
    fields: &[
        field!(InputKeymapEntry, flags, In, FieldKind::Custom(1, render_keymap_flags)),
        field!(InputKeymapEntry, len, In, FieldKind::U8),
        field!(InputKeymapEntry, index, In, FieldKind::U16),
        field!(InputKeymapEntry, keycode, In, FieldKind::Xval32(KEY_CODES)),
    ],
};

pub static ABSINFO_GET: Layout = Layout {
    name: "input_absinfo",
    size: size_of::<InputAbsinfo>(),
    fields: &[
        field!(InputAbsinfo, value, Out, FieldKind::I32),
        field!(InputAbsinfo, minimum, Out, FieldKind::I32),
        field!(InputAbsinfo, maximum, Out, FieldKind::I32),
        field!(InputAbsinfo, fuzz, Out, FieldKind::I32),
        field!(InputAbsinfo, flat, Out, FieldKind::I32),
        field!(InputAbsinfo, resolution, Out, FieldKind::I32),
    ],
};

pub static ABSINFO_SET: Layout = Layout {
    name: "input_absinfo",
    size: size_of::<InputAbsinfo>(),
    fields: &[
        field!(InputAbsinfo, value, In, FieldKind::I32),
        field!(InputAbsinfo, minimum, In, FieldKind::I32),
        field!(InputAbsinfo, maximum, In, FieldKind::I32),
        field!(InputAbsinfo, fuzz, In, FieldKind::I32),
        field!(InputAbsinfo, flat, In, FieldKind::I32),
        field!(InputAbsinfo, resolution, In, FieldKind::I32),
    ],
};

pub static MASK: Layout = Layout {
    name: "input_mask",
    size: size_of::<InputMask>(),
    fields: &[
        field!("type", InputMask, mask_type, In, FieldKind::Xval32(EV_TYPES)),
        field!(InputMask, codes_size, In, FieldKind::U32),
        field!(InputMask, codes_ptr, In, FieldKind::Addr),
    ],
};

pub static FF_TRIGGER: Layout = Layout {
    name: "ff_trigger",
    size: 4,
    fields: &[
        Field {
            name: "button",
            offset: 0,
            dir: Dir::In,
            kind: FieldKind::U16,
        },
        Field {
            name: "interval",
            offset: 2,
            dir: Dir::In,
            kind: FieldKind::U16,
        },
    ],
};

pub static FF_REPLAY: Layout = Layout {
    name: "ff_replay",
    size: 4,
    fields: &[
        Field {
            name: "length",
            offset: 0,
            dir: Dir::In,
            kind: FieldKind::U16,
        },
        Field {
            name: "delay",
            offset: 2,
            dir: Dir::In,
            kind: FieldKind::U16,
        },
    ],
};

/// The kernel hands back the id it allocated when the caller passed -1.
pub static FF_EFFECT: Layout = Layout {
    name: "ff_effect",
    size: size_of::<FfEffect>(),
    fields: &[
        field!("type", FfEffect, effect_type, In, FieldKind::Xval16(FF_CODES)),
        field!(FfEffect, id, InOut, FieldKind::I16),
        field!(FfEffect, direction, In, FieldKind::U16),
        field!("trigger", FfEffect, trigger_button, In, FieldKind::Struct(&FF_TRIGGER)),
        field!("replay", FfEffect, replay_length, In, FieldKind::Struct(&FF_REPLAY)),
    ],
};

pub static FF_ENVELOPE: Layout = Layout {
    name: "ff_envelope",
    size: size_of::<FfEnvelope>(),
    fields: &[
        field!(FfEnvelope, attack_length, In, FieldKind::U16),
        field!(FfEnvelope, attack_level, In, FieldKind::U16),
        field!(FfEnvelope, fade_length, In, FieldKind::U16),
        field!(FfEnvelope, fade_level, In, FieldKind::U16),
    ],
};

pub static FF_CONSTANT_EFFECT: Layout = Layout {
    name: "ff_constant_effect",
    size: size_of::<FfConstantEffect>(),
    fields: &[
        field!(FfConstantEffect, level, In, FieldKind::I16),
        field!(FfConstantEffect, envelope, In, FieldKind::Struct(&FF_ENVELOPE)),
    ],
};

pub static FF_RAMP_EFFECT: Layout = Layout {
    name: "ff_ramp_effect",
    size: size_of::<FfRampEffect>(),
    fields: &[
        field!(FfRampEffect, start_level, In, FieldKind::I16),
        field!(FfRampEffect, end_level, In, FieldKind::I16),
        field!(FfRampEffect, envelope, In, FieldKind::Struct(&FF_ENVELOPE)),
    ],
};

pub static FF_CONDITION_EFFECT: Layout = Layout {
    name: "ff_condition_effect",
    size: size_of::<FfConditionEffect>(),
    fields: &[
        field!(FfConditionEffect, right_saturation, In, FieldKind::U16),
        field!(FfConditionEffect, left_saturation, In, FieldKind::U16),
        field!(FfConditionEffect, right_coeff, In, FieldKind::I16),
        field!(FfConditionEffect, left_coeff, In, FieldKind::I16),
        field!(FfConditionEffect, deadband, In, FieldKind::U16),
        field!(FfConditionEffect, center, In, FieldKind::I16),
    ],
};

pub static FF_PERIODIC_EFFECT: Layout = Layout {
    name: "ff_periodic_effect",
    size: size_of::<FfPeriodicEffect>(),
    fields: &[
        field!(FfPeriodicEffect, waveform, In, FieldKind::Xval16(FF_CODES)),
        field!(FfPeriodicEffect, period, In, FieldKind::U16),
        field!(FfPeriodicEffect, magnitude, In, FieldKind::I16),
        field!(FfPeriodicEffect, offset, In, FieldKind::I16),
        field!(FfPeriodicEffect, phase, In, FieldKind::U16),
        field!(FfPeriodicEffect, envelope, In, FieldKind::Struct(&FF_ENVELOPE)),
        field!(FfPeriodicEffect, custom_len, In, FieldKind::U32),
        field!(FfPeriodicEffect, custom_data, In, FieldKind::Addr),
    ],
};

pub static FF_RUMBLE_EFFECT: Layout = Layout {
    name: "ff_rumble_effect",
    size: size_of::<FfRumbleEffect>(),
    fields: &[
        field!(FfRumbleEffect, strong_magnitude, In, FieldKind::U16),
        field!(FfRumbleEffect, weak_magnitude, In, FieldKind::U16),
    ],
};

pub static LAYOUTS: &[&Layout] = &[
    &INPUT_ID,
    &REP_GET,
    &REP_SET,
    &KEYCODE_GET,
    &KEYCODE_SET,
    &KEYMAP_GET,
    &KEYMAP_SET,
    &ABSINFO_GET,
    &ABSINFO_SET,
    &MASK,
    &FF_TRIGGER,
    &FF_REPLAY,
    &FF_EFFECT,
    &FF_ENVELOPE,
    &FF_CONSTANT_EFFECT,
    &FF_RAMP_EFFECT,
    &FF_CONDITION_EFFECT,
    &FF_PERIODIC_EFFECT,
    &FF_RUMBLE_EFFECT,
];

/// Renders `len` bytes of bit array at `addr` as the names of its set bits.
fn print_bitset(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    label: &str,
    addr: u64,
    len: usize,
    table: Xlat,
) -> Result<()> {
    if len == 0 {
        argf!(sf, "{label}: []");
        return Ok(());
    }

    let len = len.min(PAGE_SIZE);
    let Some(bytes) = fetch_or_print(cx, sf, label, addr, len)? else {
        return Ok(());
    };

    let buf = cx.scratch.checkout(ScratchPurpose::Bitset, &bytes);
    let list = format_bit_list(
        &buf[..len],
        table,
        cx.config.xlat_style,
        cx.config.max_array_elems,
    );
    cx.scratch.restore(ScratchPurpose::Bitset, buf);

    argf!(sf, "{label}: {list}");
    Ok(())
}

/// How many bytes of a variable-length buffer the kernel reports filling.
fn filled(occ: &Occurrence, size: usize) -> usize {
    match occ.retval() {
        Some(ret) if ret > 0 => (ret as usize).min(size),
        _ => 0,
    }
}

fn print_scancode(cx: &DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, raw: &RawStruct<'_>) -> Result<()> {
    let len = usize::from(raw.u8(offset_of!(InputKeymapEntry, len)));
    let scancode = raw.bytes(offset_of!(InputKeymapEntry, scancode), len.min(32));
    argf!(sf, "scancode: {}", cx.hex(scancode));
    Ok(())
}

fn print_set_keymap(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, KEYMAP_SET.size)? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    with_struct!(sf,
        print_entry_fields(sf, cx, &KEYMAP_SET, &raw)?;
        print_scancode(cx, sf, &raw)?;
    );
    Ok(())
}

fn print_get_keymap_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<DecodeStatus> {
    let status = enter_struct(cx, occ, sf, "arg", addr, &KEYMAP_GET)?;
    if let Some(snapshot) = occ.private::<Snapshot>() {
        print_scancode(cx, sf, &snapshot.raw())?;
    }
    Ok(status)
}

/// The effect parameters, selected by the effect type.
fn print_ff_union(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, effect: &RawStruct<'_>) -> Result<()> {
    let u = effect.sub(offset_of!(FfEffect, u), FF_EFFECT_UNION_SIZE);

    let (label, layout) = match effect.u16(offset_of!(FfEffect, effect_type)) {
        FF_CONSTANT => ("constant", &FF_CONSTANT_EFFECT),
        FF_RAMP => ("ramp", &FF_RAMP_EFFECT),
        FF_PERIODIC => ("periodic", &FF_PERIODIC_EFFECT),
        FF_RUMBLE => ("rumble", &FF_RUMBLE_EFFECT),
        FF_SPRING | FF_FRICTION | FF_DAMPER | FF_INERTIA => {
            // One condition per axis.
            print_local_array(
                cx,
                sf,
                "condition",
                u.as_bytes(),
                2,
                size_of::<FfConditionEffect>(),
                |cx, sf, elem, _| {
                    print_element(sf, cx, &FF_CONDITION_EFFECT, &RawStruct::new(elem))?;
                    Ok(true)
                },
            )?;
            return Ok(());
        }
        other => {
            debug!("ff_effect of unknown type {other:#x}");
            argf!(sf, "u: {}", cx.hex(u.as_bytes()));
            return Ok(());
        }
    };

    argf!(sf, "{label}:");
    with_struct!(sf, print_all_fields(sf, cx, layout, &u)?;);
    Ok(())
}

fn print_set_ff_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<DecodeStatus> {
    let status = enter_struct(cx, occ, sf, "arg", addr, &FF_EFFECT)?;
    if let Some(snapshot) = occ.private::<Snapshot>() {
        print_ff_union(cx, sf, &snapshot.raw())?;
    }
    Ok(status)
}

fn print_set_mask(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, addr: u64) -> Result<()> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, MASK.size)? else {
        return Ok(());
    };
    let raw = RawStruct::new(&bytes);

    arg!(sf, "arg:");
    with_struct!(sf,
        print_entry_fields(sf, cx, &MASK, &raw)?;
        print_mask_codes(cx, sf, &raw)?;
    );
    Ok(())
}

fn print_mask_codes(cx: &mut DecodeContext<'_>, sf: &mut SyscallFormatter<'_>, mask: &RawStruct<'_>) -> Result<()> {
    let table = codes_for_event_type(u64::from(mask.u32(offset_of!(InputMask, mask_type))));
    let addr = mask.u64(offset_of!(InputMask, codes_ptr));
    let len = mask.u32(offset_of!(InputMask, codes_size)) as usize;
    print_bitset(cx, sf, "codes", addr, len, table)
}

fn print_get_mask_codes(
    cx: &mut DecodeContext<'_>,
    sf: &mut SyscallFormatter<'_>,
    _addr: u64,
    old: &RawStruct<'_>,
    _new: &RawStruct<'_>,
) -> Result<()> {
    print_mask_codes(cx, sf, old)
}

/// Entry half of the MT slot query: the axis code goes in, one value per
/// slot comes back after it.
fn print_mt_slots_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    addr: u64,
) -> Result<DecodeStatus> {
    let Some(bytes) = fetch_or_print(cx, sf, "arg", addr, size_of::<u32>())? else {
        return Ok(DecodeStatus::Complete);
    };

    let code = RawStruct::new(&bytes).u32(0);
    arg!(sf, "arg:");
    sf.push_depth(b"{")?;
    argf!(sf, "code: {}", cx.xval(u64::from(code), ABS_CODES));
    occ.set_private(Snapshot { addr, bytes });
    Ok(DecodeStatus::NeedsExit)
}

fn print_mt_slots_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    size: usize,
) -> Result<()> {
    let Some(snapshot) = occ.take_private::<Snapshot>() else {
        return Ok(());
    };

    if !occ.failed() {
        let slots = (size / size_of::<i32>()).saturating_sub(1) as u64;
        let base = snapshot.addr + size_of::<u32>() as u64;
        print_array(cx, sf, "values", base, slots, size_of::<i32>(), |_, sf, elem, _| {
            argf!(sf, "{}", RawStruct::new(elem).i32(0));
            Ok(true)
        })?;
    }

    sf.pop_depth(b"}")
}

fn decode_shaped_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    shaped: Shaped,
    size: usize,
    arg: u64,
) -> Result<DecodeStatus> {
    match shaped {
        Shaped::String(_) | Shaped::Bits(..) | Shaped::EventBits(_) => defer_pointee(sf, arg),
        Shaped::MtSlots => print_mt_slots_entry(cx, occ, sf, arg),
        Shaped::GetAbs(_) => {
            decode_struct_entry_sized(cx, occ, sf, "arg", arg, &ABSINFO_GET, size.min(ABSINFO_GET.size))
        }
        Shaped::SetAbs(_) => {
            decode_struct_entry_sized(cx, occ, sf, "arg", arg, &ABSINFO_SET, size.min(ABSINFO_SET.size))
        }
    }
}

fn decode_shaped_exit(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    shaped: Shaped,
    size: usize,
    arg: u64,
) -> Result<()> {
    let bits = match shaped {
        Shaped::MtSlots => return print_mt_slots_exit(cx, occ, sf, size),
        Shaped::GetAbs(_) => return decode_struct_exit(cx, occ, sf, &ABSINFO_GET),
        Shaped::SetAbs(_) => return Ok(()),
        Shaped::String(_) => None,
        Shaped::Bits(_, table) => Some(table),
        Shaped::EventBits(ev) => Some(codes_for_event_type(u64::from(ev))),
    };

    if occ.failed() {
        argf!(sf, "arg: {}", format_addr(arg));
        return Ok(());
    }

    let len = filled(occ, size);
    match bits {
        Some(table) => print_bitset(cx, sf, "arg", arg, len, table),
        None => {
            if len == 0 {
                argf!(sf, "arg: \"\"");
            } else if let Some(bytes) = fetch_or_print(cx, sf, "arg", arg, len)? {
                argf!(sf, "arg: {}", cx.cstr(&bytes));
            }
            Ok(())
        }
    }
}

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
    request: u32,
    arg: u64,
) -> Result<Option<DecodeStatus>> {
    let cmd = EvdevIoctl::from_code(request);

    if let Some(name) = cmd.name() {
        argf!(sf, "request: {name}");
    } else if let Some(shaped) = classify(request) {
        let size = ioc_size(request);
        argf!(sf, "request: {}", shaped_name(cx, shaped, size));
        return decode_shaped_entry(cx, occ, sf, shaped, size, arg).map(Some);
    } else {
        return Ok(None);
    }

    use EvdevIoctl::*;
    let status = match cmd {
        GetVersion | GetEffects => defer_pointee(sf, arg)?,
        GetId => decode_struct_entry(cx, occ, sf, "arg", arg, &INPUT_ID)?,
        GetRep => decode_struct_entry(cx, occ, sf, "arg", arg, &REP_GET)?,
        SetRep => decode_struct_entry(cx, occ, sf, "arg", arg, &REP_SET)?,
        GetKeycode => decode_struct_entry(cx, occ, sf, "arg", arg, &KEYCODE_GET)?,
        SetKeycode => decode_struct_entry(cx, occ, sf, "arg", arg, &KEYCODE_SET)?,
        GetKeycodeV2 => print_get_keymap_entry(cx, occ, sf, arg)?,
        SetKeycodeV2 => {
            print_set_keymap(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        SetFf => print_set_ff_entry(cx, occ, sf, arg)?,
        RemoveFf => {
            argf!(sf, "arg: {}", arg as i32);
            DecodeStatus::Complete
        }
        Grab | Revoke => {
            argf!(sf, "arg: {arg}");
            DecodeStatus::Complete
        }
        GetMask => enter_struct(cx, occ, sf, "arg", arg, &MASK)?,
        SetMask => {
            print_set_mask(cx, sf, arg)?;
            DecodeStatus::Complete
        }
        SetClockId => {
            print_pointee(cx, sf, arg, size_of::<i32>(), render_clock_id)?;
            DecodeStatus::Complete
        }
        Unknown(_) => DecodeStatus::Complete,
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
    let cmd = EvdevIoctl::from_code(request);
    if !cmd.is_known() {
        return match classify(request) {
            Some(shaped) => decode_shaped_exit(cx, occ, sf, shaped, ioc_size(request), arg),
            None => Ok(()),
        };
    }

    use EvdevIoctl::*;
    match cmd {
        GetVersion => print_pointee_exit(cx, occ, sf, arg, size_of::<i32>(), render_version),
        GetEffects => print_pointee_exit(cx, occ, sf, arg, size_of::<i32>(), render_int),
        GetId => decode_struct_exit(cx, occ, sf, &INPUT_ID),
        GetRep => decode_struct_exit(cx, occ, sf, &REP_GET),
        GetKeycode => decode_struct_exit(cx, occ, sf, &KEYCODE_GET),
        GetKeycodeV2 => exit_struct(cx, occ, sf, &KEYMAP_GET, no_tail),
        SetFf => exit_struct(cx, occ, sf, &FF_EFFECT, no_tail),
        GetMask => exit_struct(cx, occ, sf, &MASK, print_get_mask_codes),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use argus_common::ioctl::{ior, iow};

    use super::*;

    #[test]
    fn shaped_requests() {
        assert_eq!(
            classify(ior(b'E', 0x06, 256)),
            Some(Shaped::String("EVIOCGNAME"))
        );
        assert_eq!(classify(ior(b'E', 0x21, 96)), Some(Shaped::EventBits(1)));
        assert_eq!(classify(ior(b'E', 0x40, 24)), Some(Shaped::GetAbs(0)));
        assert_eq!(classify(ior(b'E', 0x7f, 24)), Some(Shaped::GetAbs(0x3f)));
        assert_eq!(classify(iow(b'E', 0xc1, 24)), Some(Shaped::SetAbs(1)));
        assert_eq!(classify(iow(b'E', 0x90, 4)), None);
        assert_eq!(classify(ior(b'E', 0x84, 4)), None);
    }

    #[test]
    fn fixed_requests_are_listed_first() {
        let known = known_requests();
        assert_eq!(known[0], (u64::from(EVIOCGVERSION), "EVIOCGVERSION"));
        assert!(known.iter().any(|&(_, name)| name == "EVIOCSABS"));
    }
}
