//! Control flow: relative and absolute jumps, calls, returns, restarts and
//! the CB prefix fetch.
//!
//! Conditional forms share one op sequence for the taken and untaken paths:
//! PC is advanced past the operands unconditionally, and the jump/push ops
//! fire only when the condition holds. The canonical tick table records the
//! taken-path count. Branching opcodes place `LoadIrPc` on the cycle that
//! overlaps with the branch-target fetch, so IR always holds the opcode at
//! the final PC when the sequence completes.

use dotmatrix_common::Byte;

use crate::cpu::RegisterName;

use super::decoder::{Prefix, RegistrySet};
use super::instruction::Instruction;
use super::ops::{Cond, MicroOp};

const CONDITIONS: [Cond; 4] = [Cond::NZ, Cond::Z, Cond::NC, Cond::C];

pub(super) fn register(set: &mut RegistrySet) {
    register_relative(set);
    register_absolute(set);
    register_calls(set);
    register_returns(set);
    register_restarts(set);

    // The prefix byte itself: fetch the CB sub-opcode into IR. The CPU then
    // dispatches it through the CB table; the prefixed instruction's tick
    // count covers both fetch cycles.
    set.register(
        Prefix::None,
        Instruction::new(
            "prefix cb",
            0xCB,
            4,
            1,
            vec![MicroOp::IncrementPc, MicroOp::LoadIrPc],
        ),
    );
}

fn jr_ops(cond: Cond) -> Vec<MicroOp> {
    vec![
        MicroOp::IncrementPc,
        MicroOp::LoadTempLoPc,
        MicroOp::IncrementPc,
        MicroOp::JumpRelativeIf(cond),
        MicroOp::LoadIrPc,
    ]
}

fn register_relative(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new("jr e8", 0x18, 12, 2, jr_ops(Cond::Always)),
    );
    for (position, cond) in CONDITIONS.iter().enumerate() {
        let opcode = 0x20 + ((position as u8) << 3);
        set.register(
            Prefix::None,
            Instruction::new(
                format!("jr {}, e8", cond.spelling()),
                opcode,
                12,
                2,
                jr_ops(*cond),
            ),
        );
    }
}

fn jp_ops(cond: Cond) -> Vec<MicroOp> {
    vec![
        MicroOp::IncrementPc,
        MicroOp::LoadTempLoPc,
        MicroOp::IncrementPc,
        MicroOp::LoadTempHiPc,
        MicroOp::IncrementPc,
        MicroOp::CopyTempToPcIf(cond),
        MicroOp::LoadIrPc,
    ]
}

fn register_absolute(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new("jp a16", 0xC3, 16, 3, jp_ops(Cond::Always)),
    );
    for (position, cond) in CONDITIONS.iter().enumerate() {
        let opcode = 0xC2 + ((position as u8) << 3);
        set.register(
            Prefix::None,
            Instruction::new(
                format!("jp {}, a16", cond.spelling()),
                opcode,
                16,
                3,
                jp_ops(*cond),
            ),
        );
    }

    set.register(
        Prefix::None,
        Instruction::new(
            "jp hl",
            0xE9,
            4,
            1,
            vec![
                MicroOp::CopyReg16 {
                    dst: RegisterName::PC,
                    src: RegisterName::HL,
                },
                MicroOp::LoadIrPc,
            ],
        ),
    );
}

fn call_ops(cond: Cond) -> Vec<MicroOp> {
    vec![
        MicroOp::IncrementPc,
        MicroOp::LoadTempLoPc,
        MicroOp::IncrementPc,
        MicroOp::LoadTempHiPc,
        MicroOp::IncrementPc,
        MicroOp::PushPcHighIf(cond),
        MicroOp::PushPcLowIf(cond),
        MicroOp::CopyTempToPcIf(cond),
        MicroOp::LoadIrPc,
    ]
}

fn register_calls(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new("call a16", 0xCD, 24, 3, call_ops(Cond::Always)),
    );
    for (position, cond) in CONDITIONS.iter().enumerate() {
        let opcode = 0xC4 + ((position as u8) << 3);
        set.register(
            Prefix::None,
            Instruction::new(
                format!("call {}, a16", cond.spelling()),
                opcode,
                24,
                3,
                call_ops(*cond),
            ),
        );
    }
}

fn ret_ops(cond: Cond) -> Vec<MicroOp> {
    vec![
        MicroOp::IncrementPc,
        MicroOp::PopTempLoIf(cond),
        MicroOp::PopTempHiIf(cond),
        MicroOp::CopyTempToPcIf(cond),
        MicroOp::LoadIrPc,
    ]
}

fn register_returns(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new("ret", 0xC9, 16, 1, ret_ops(Cond::Always)),
    );
    for (position, cond) in CONDITIONS.iter().enumerate() {
        let opcode = 0xC0 + ((position as u8) << 3);
        set.register(
            Prefix::None,
            Instruction::new(
                format!("ret {}", cond.spelling()),
                opcode,
                20,
                1,
                ret_ops(*cond),
            ),
        );
    }

    set.register(
        Prefix::None,
        Instruction::new(
            "reti",
            0xD9,
            16,
            1,
            vec![
                MicroOp::IncrementPc,
                MicroOp::PopTempLoIf(Cond::Always),
                MicroOp::PopTempHiIf(Cond::Always),
                MicroOp::CopyTempToPcIf(Cond::Always),
                MicroOp::EnableIme,
                MicroOp::LoadIrPc,
            ],
        ),
    );
}

fn register_restarts(set: &mut RegistrySet) {
    for vector in (0x00u8..=0x38).step_by(8) {
        let opcode = 0xC7 | vector;
        set.register(
            Prefix::None,
            Instruction::new(
                format!("rst ${vector:02x}"),
                opcode,
                16,
                1,
                vec![
                    MicroOp::IncrementPc,
                    MicroOp::PushPcHighIf(Cond::Always),
                    MicroOp::PushPcLowIf(Cond::Always),
                    MicroOp::SetTempHi(Byte::new(0x00)),
                    MicroOp::SetTempLo(Byte::new(vector)),
                    MicroOp::CopyTempToPcIf(Cond::Always),
                    MicroOp::LoadIrPc,
                ],
            ),
        );
    }
}
