// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::mem::size_of;

use anyhow::Result;
use argus_common::kernel_types::prctl::{
    KcmpEpollSlot, KCMP_EPOLL_TFD, KCMP_FILE, KCMP_FILES, KCMP_FS, KCMP_IO, KCMP_SIGHAND,
    KCMP_SYSVSEM, KCMP_VM,
};

use crate::{
    argf,
    dispatch::{command_enum, DecodeContext, DecodeStatus},
    field,
    formatting::SyscallFormatter,
    layout::{decode_struct_entry, FieldKind, Layout},
    state::Occurrence,
    xlat::format_named,
};

command_enum! {
    /// The resource kinds kcmp(2) can compare.
    pub enum KcmpType: u64 {
        File = KCMP_FILE => "KCMP_FILE",
        Vm = KCMP_VM => "KCMP_VM",
        Files = KCMP_FILES => "KCMP_FILES",
        Fs = KCMP_FS => "KCMP_FS",
        Sighand = KCMP_SIGHAND => "KCMP_SIGHAND",
        Io = KCMP_IO => "KCMP_IO",
        Sysvsem = KCMP_SYSVSEM => "KCMP_SYSVSEM",
        EpollTfd = KCMP_EPOLL_TFD => "KCMP_EPOLL_TFD",
    }
}

pub static EPOLL_SLOT: Layout = Layout {
    name: "kcmp_epoll_slot",
    size: size_of::<KcmpEpollSlot>(),
    fields: &[
        field!(KcmpEpollSlot, efd, In, FieldKind::U32),
        field!(KcmpEpollSlot, tfd, In, FieldKind::U32),
        field!(KcmpEpollSlot, toff, In, FieldKind::U32),
    ],
};

pub fn decode_entry(
    cx: &mut DecodeContext<'_>,
    occ: &mut Occurrence,
    sf: &mut SyscallFormatter<'_>,
) -> Result<DecodeStatus> {
    let kind = KcmpType::from_code(occ.arg(2));
    let idx1 = occ.arg(3);
    let idx2 = occ.arg(4);

    argf!(sf, "pid1: {}", occ.arg(0) as i32);
    argf!(sf, "pid2: {}", occ.arg(1) as i32);
    argf!(
        sf,
        "type: {}",
        format_named(kind.code(), kind.name(), cx.config.xlat_style)
    );

    match kind {
        KcmpType::File => {
            argf!(sf, "idx1: {}", idx1 as i32);
            argf!(sf, "idx2: {}", idx2 as i32);
        }
        KcmpType::EpollTfd => {
            argf!(sf, "idx1: {}", idx1 as i32);
            return decode_struct_entry(cx, occ, sf, "idx2", idx2, &EPOLL_SLOT);
        }
        KcmpType::Unknown(_) => {
            argf!(sf, "idx1: 0x{idx1:x}");
            argf!(sf, "idx2: 0x{idx2:x}");
        }
        // The indices are unused for whole-resource comparisons.
        _ => {
            argf!(sf, "idx1: {idx1}");
            argf!(sf, "idx2: {idx2}");
        }
    }

    Ok(DecodeStatus::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_types_are_known() {
        assert_eq!(KcmpType::KNOWN.len(), 8);
        assert_eq!(KcmpType::from_code(7), KcmpType::EpollTfd);
        assert_eq!(KcmpType::from_code(8), KcmpType::Unknown(8));
    }
}
