// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use super::Xlat;

pub const EV_TYPES: Xlat = &[
    (0x00, "EV_SYN"),
    (0x01, "EV_KEY"),
    (0x02, "EV_REL"),
    (0x03, "EV_ABS"),
    (0x04, "EV_MSC"),
    (0x05, "EV_SW"),
    (0x11, "EV_LED"),
    (0x12, "EV_SND"),
    (0x14, "EV_REP"),
    (0x15, "EV_FF"),
    (0x16, "EV_PWR"),
    (0x17, "EV_FF_STATUS"),
];

pub const KEY_CODES: Xlat = &[
    (0, "KEY_RESERVED"),
    (1, "KEY_ESC"),
    (2, "KEY_1"),
    (3, "KEY_2"),
    (4, "KEY_3"),
    (5, "KEY_4"),
    (6, "KEY_5"),
    (7, "KEY_6"),
    (8, "KEY_7"),
    (9, "KEY_8"),
    (10, "KEY_9"),
    (11, "KEY_0"),
    (12, "KEY_MINUS"),
    (13, "KEY_EQUAL"),
    (14, "KEY_BACKSPACE"),
    (15, "KEY_TAB"),
    (16, "KEY_Q"),
    (17, "KEY_W"),
    (18, "KEY_E"),
    (19, "KEY_R"),
    (20, "KEY_T"),
    (21, "KEY_Y"),
    (22, "KEY_U"),
    (23, "KEY_I"),
    (24, "KEY_O"),
    (25, "KEY_P"),
    (26, "KEY_LEFTBRACE"),
    (27, "KEY_RIGHTBRACE"),
    (28, "KEY_ENTER"),
    (29, "KEY_LEFTCTRL"),
    (30, "KEY_A"),
    (31, "KEY_S"),
    (32, "KEY_D"),
    (33, "KEY_F"),
    (34, "KEY_G"),
    (35, "KEY_H"),
    (36, "KEY_J"),
    (37, "KEY_K"),
    (38, "KEY_L"),
    (39, "KEY_SEMICOLON"),
    (40, "KEY_APOSTROPHE"),
    (41, "KEY_GRAVE"),
    (42, "KEY_LEFTSHIFT"),
    (43, "KEY_BACKSLASH"),
    (44, "KEY_Z"),
    (45, "KEY_X"),
    (46, "KEY_C"),
    (47, "KEY_V"),
    (48, "KEY_B"),
    (49, "KEY_N"),
    (50, "KEY_M"),
    (51, "KEY_COMMA"),
    (52, "KEY_DOT"),
    (53, "KEY_SLASH"),
    (54, "KEY_RIGHTSHIFT"),
    (55, "KEY_KPASTERISK"),
    (56, "KEY_LEFTALT"),
    (57, "KEY_SPACE"),
    (58, "KEY_CAPSLOCK"),
    (59, "KEY_F1"),
    (60, "KEY_F2"),
    (61, "KEY_F3"),
    (62, "KEY_F4"),
    (63, "KEY_F5"),
    (64, "KEY_F6"),
    (65, "KEY_F7"),
    (66, "KEY_F8"),
    (67, "KEY_F9"),
    (68, "KEY_F10"),
    (69, "KEY_NUMLOCK"),
    (70, "KEY_SCROLLLOCK"),
    (71, "KEY_KP7"),
    (72, "KEY_KP8"),
    (73, "KEY_KP9"),
    (74, "KEY_KPMINUS"),
    (75, "KEY_KP4"),
    (76, "KEY_KP5"),
    (77, "KEY_KP6"),
    (78, "KEY_KPPLUS"),
    (79, "KEY_KP1"),
    (80, "KEY_KP2"),
    (81, "KEY_KP3"),
    (82, "KEY_KP0"),
    (83, "KEY_KPDOT"),
    (85, "KEY_ZENKAKUHANKAKU"),
    (86, "KEY_102ND"),
    (87, "KEY_F11"),
    (88, "KEY_F12"),
    (96, "KEY_KPENTER"),
    (97, "KEY_RIGHTCTRL"),
    (98, "KEY_KPSLASH"),
    (99, "KEY_SYSRQ"),
    (100, "KEY_RIGHTALT"),
    (101, "KEY_LINEFEED"),
    (102, "KEY_HOME"),
    (103, "KEY_UP"),
    (104, "KEY_PAGEUP"),
    (105, "KEY_LEFT"),
    (106, "KEY_RIGHT"),
    (107, "KEY_END"),
    (108, "KEY_DOWN"),
    (109, "KEY_PAGEDOWN"),
    (110, "KEY_INSERT"),
    (111, "KEY_DELETE"),
    (112, "KEY_MACRO"),
    (113, "KEY_MUTE"),
    (114, "KEY_VOLUMEDOWN"),
    (115, "KEY_VOLUMEUP"),
    (116, "KEY_POWER"),
    (117, "KEY_KPEQUAL"),
    (118, "KEY_KPPLUSMINUS"),
    (119, "KEY_PAUSE"),
    (125, "KEY_LEFTMETA"),
    (126, "KEY_RIGHTMETA"),
    (127, "KEY_COMPOSE"),
    (142, "KEY_SLEEP"),
    (143, "KEY_WAKEUP"),
    (163, "KEY_NEXTSONG"),
    (164, "KEY_PLAYPAUSE"),
    (165, "KEY_PREVIOUSSONG"),
    (166, "KEY_STOPCD"),
    (224, "KEY_BRIGHTNESSDOWN"),
    (225, "KEY_BRIGHTNESSUP"),
    (0x100, "BTN_0"),
    (0x101, "BTN_1"),
    (0x102, "BTN_2"),
    (0x103, "BTN_3"),
    (0x110, "BTN_LEFT"),
    (0x111, "BTN_RIGHT"),
    (0x112, "BTN_MIDDLE"),
    (0x113, "BTN_SIDE"),
    (0x114, "BTN_EXTRA"),
    (0x115, "BTN_FORWARD"),
    (0x116, "BTN_BACK"),
    (0x117, "BTN_TASK"),
    (0x120, "BTN_TRIGGER"),
    (0x121, "BTN_THUMB"),
    (0x130, "BTN_SOUTH"),
    (0x131, "BTN_EAST"),
    (0x133, "BTN_NORTH"),
    (0x134, "BTN_WEST"),
    (0x136, "BTN_TL"),
    (0x137, "BTN_TR"),
    (0x13a, "BTN_SELECT"),
    (0x13b, "BTN_START"),
    (0x13c, "BTN_MODE"),
    (0x140, "BTN_TOOL_PEN"),
    (0x145, "BTN_TOOL_FINGER"),
    (0x14a, "BTN_TOUCH"),
    (0x14b, "BTN_STYLUS"),
    (0x14d, "BTN_TOOL_DOUBLETAP"),
    (0x14e, "BTN_TOOL_TRIPLETAP"),
    (0x14f, "BTN_TOOL_QUADTAP"),
];

pub const REL_CODES: Xlat = &[
    (0x00, "REL_X"),
    (0x01, "REL_Y"),
    (0x02, "REL_Z"),
    (0x03, "REL_RX"),
    (0x04, "REL_RY"),
    (0x05, "REL_RZ"),
    (0x06, "REL_HWHEEL"),
    (0x07, "REL_DIAL"),
    (0x08, "REL_WHEEL"),
    (0x09, "REL_MISC"),
    (0x0a, "REL_RESERVED"),
    (0x0b, "REL_WHEEL_HI_RES"),
    (0x0c, "REL_HWHEEL_HI_RES"),
];

pub const ABS_CODES: Xlat = &[
    (0x00, "ABS_X"),
    (0x01, "ABS_Y"),
    (0x02, "ABS_Z"),
    (0x03, "ABS_RX"),
    (0x04, "ABS_RY"),
    (0x05, "ABS_RZ"),
    (0x06, "ABS_THROTTLE"),
    (0x07, "ABS_RUDDER"),
    (0x08, "ABS_WHEEL"),
    (0x09, "ABS_GAS"),
    (0x0a, "ABS_BRAKE"),
    (0x10, "ABS_HAT0X"),
    (0x11, "ABS_HAT0Y"),
    (0x12, "ABS_HAT1X"),
    (0x13, "ABS_HAT1Y"),
    (0x14, "ABS_HAT2X"),
    (0x15, "ABS_HAT2Y"),
    (0x16, "ABS_HAT3X"),
    (0x17, "ABS_HAT3Y"),
    (0x18, "ABS_PRESSURE"),
    (0x19, "ABS_DISTANCE"),
    (0x1a, "ABS_TILT_X"),
    (0x1b, "ABS_TILT_Y"),
    (0x1c, "ABS_TOOL_WIDTH"),
    (0x20, "ABS_VOLUME"),
    (0x21, "ABS_PROFILE"),
    (0x28, "ABS_MISC"),
    (0x2e, "ABS_RESERVED"),
    (0x2f, "ABS_MT_SLOT"),
    (0x30, "ABS_MT_TOUCH_MAJOR"),
    (0x31, "ABS_MT_TOUCH_MINOR"),
    (0x32, "ABS_MT_WIDTH_MAJOR"),
    (0x33, "ABS_MT_WIDTH_MINOR"),
    (0x34, "ABS_MT_ORIENTATION"),
    (0x35, "ABS_MT_POSITION_X"),
    (0x36, "ABS_MT_POSITION_Y"),
    (0x37, "ABS_MT_TOOL_TYPE"),
    (0x38, "ABS_MT_BLOB_ID"),
    (0x39, "ABS_MT_TRACKING_ID"),
    (0x3a, "ABS_MT_PRESSURE"),
    (0x3b, "ABS_MT_DISTANCE"),
    (0x3c, "ABS_MT_TOOL_X"),
    (0x3d, "ABS_MT_TOOL_Y"),
];

pub const MSC_CODES: Xlat = &[
    (0x00, "MSC_SERIAL"),
    (0x01, "MSC_PULSELED"),
    (0x02, "MSC_GESTURE"),
    (0x03, "MSC_RAW"),
    (0x04, "MSC_SCAN"),
    (0x05, "MSC_TIMESTAMP"),
];

pub const SW_CODES: Xlat = &[
    (0x00, "SW_LID"),
    (0x01, "SW_TABLET_MODE"),
    (0x02, "SW_HEADPHONE_INSERT"),
    (0x03, "SW_RFKILL_ALL"),
    (0x04, "SW_MICROPHONE_INSERT"),
    (0x05, "SW_DOCK"),
    (0x06, "SW_LINEOUT_INSERT"),
    (0x07, "SW_JACK_PHYSICAL_INSERT"),
    (0x08, "SW_VIDEOOUT_INSERT"),
    (0x09, "SW_CAMERA_LENS_COVER"),
    (0x0a, "SW_KEYPAD_SLIDE"),
    (0x0b, "SW_FRONT_PROXIMITY"),
    (0x0c, "SW_ROTATE_LOCK"),
    (0x0d, "SW_LINEIN_INSERT"),
    (0x0e, "SW_MUTE_DEVICE"),
    (0x0f, "SW_PEN_INSERTED"),
    (0x10, "SW_MACHINE_COVER"),
];

pub const LED_CODES: Xlat = &[
    (0x00, "LED_NUML"),
    (0x01, "LED_CAPSL"),
    (0x02, "LED_SCROLLL"),
    (0x03, "LED_COMPOSE"),
    (0x04, "LED_KANA"),
    (0x05, "LED_SLEEP"),
    (0x06, "LED_SUSPEND"),
    (0x07, "LED_MUTE"),
    (0x08, "LED_MISC"),
    (0x09, "LED_MAIL"),
    (0x0a, "LED_CHARGING"),
];

pub const SND_CODES: Xlat = &[(0x00, "SND_CLICK"), (0x01, "SND_BELL"), (0x02, "SND_TONE")];

pub const REP_CODES: Xlat = &[(0x00, "REP_DELAY"), (0x01, "REP_PERIOD")];

pub const FF_CODES: Xlat = &[
    (0x50, "FF_RUMBLE"),
    (0x51, "FF_PERIODIC"),
    (0x52, "FF_CONSTANT"),
    (0x53, "FF_SPRING"),
    (0x54, "FF_FRICTION"),
    (0x55, "FF_DAMPER"),
    (0x56, "FF_INERTIA"),
    (0x57, "FF_RAMP"),
    (0x58, "FF_SQUARE"),
    (0x59, "FF_TRIANGLE"),
    (0x5a, "FF_SINE"),
    (0x5b, "FF_SAW_UP"),
    (0x5c, "FF_SAW_DOWN"),
    (0x5d, "FF_CUSTOM"),
    (0x60, "FF_GAIN"),
    (0x61, "FF_AUTOCENTER"),
];

pub const INPUT_PROPS: Xlat = &[
    (0x00, "INPUT_PROP_POINTER"),
    (0x01, "INPUT_PROP_DIRECT"),
    (0x02, "INPUT_PROP_BUTTONPAD"),
    (0x03, "INPUT_PROP_SEMI_MT"),
    (0x04, "INPUT_PROP_TOPBUTTONPAD"),
    (0x05, "INPUT_PROP_POINTING_STICK"),
    (0x06, "INPUT_PROP_ACCELEROMETER"),
];

pub const BUS_TYPES: Xlat = &[
    (0x01, "BUS_PCI"),
    (0x02, "BUS_ISAPNP"),
    (0x03, "BUS_USB"),
    (0x04, "BUS_HIL"),
    (0x05, "BUS_BLUETOOTH"),
    (0x06, "BUS_VIRTUAL"),
    (0x10, "BUS_ISA"),
    (0x11, "BUS_I8042"),
    (0x12, "BUS_XTKBD"),
    (0x13, "BUS_RS232"),
    (0x14, "BUS_GAMEPORT"),
    (0x15, "BUS_PARPORT"),
    (0x16, "BUS_AMIGA"),
    (0x17, "BUS_ADB"),
    (0x18, "BUS_I2C"),
    (0x19, "BUS_HOST"),
    (0x1a, "BUS_GSC"),
    (0x1b, "BUS_ATARI"),
    (0x1c, "BUS_SPI"),
    (0x1d, "BUS_RMI"),
    (0x1e, "BUS_CEC"),
    (0x1f, "BUS_INTEL_ISHTP"),
    (0x20, "BUS_AMD_SFH"),
];

pub const KEYMAP_FLAGS: Xlat = &[(1 << 0, "INPUT_KEYMAP_BY_INDEX")];

pub const CLOCK_IDS: Xlat = &[
    (0, "CLOCK_REALTIME"),
    (1, "CLOCK_MONOTONIC"),
    (7, "CLOCK_BOOTTIME"),
];

/// The table naming the codes of event type `ev`, if there is one.
pub fn codes_for_event_type(ev: u64) -> Xlat {
    match ev {
        0x00 => EV_TYPES,
        0x01 => KEY_CODES,
        0x02 => REL_CODES,
        0x03 => ABS_CODES,
        0x04 => MSC_CODES,
        0x05 => SW_CODES,
        0x11 => LED_CODES,
        0x12 => SND_CODES,
        0x14 => REP_CODES,
        0x15 => FF_CODES,
        _ => &[],
    }
}
