//! The `ld` family: register moves, immediates, indirect forms through BC/
//! DE/HL (with the HL+/HL- post-step variants), the high-page `ldh` forms,
//! absolute forms, and the SP transfers.

use dotmatrix_common::Byte;

use crate::cpu::RegisterName;

use super::decoder::{Prefix, RegistrySet};
use super::instruction::Instruction;
use super::ops::{MicroOp, StepMode};
use super::reg8_by_index;

/// Identity loads (`ld b, b`, ...) are architecturally distinct opcodes with
/// NOP semantics and timing; they keep their own decoder entries for trace
/// fidelity.
const IDENTITY_LOADS: &[(u8, RegisterName)] = &[
    (0x40, RegisterName::B),
    (0x49, RegisterName::C),
    (0x52, RegisterName::D),
    (0x5B, RegisterName::E),
    (0x64, RegisterName::H),
    (0x6D, RegisterName::L),
    (0x7F, RegisterName::A),
];

pub(super) fn register(set: &mut RegistrySet) {
    register_matrix(set);
    register_immediates(set);
    register_indirect(set);
    register_high_page(set);
    register_absolute(set);
    register_sp(set);
}

/// The `0x40-0x7F` move matrix (0x76 is HALT and lives elsewhere).
fn register_matrix(set: &mut RegistrySet) {
    for (opcode, reg) in IDENTITY_LOADS {
        let spelling = reg.spelling();
        set.register(
            Prefix::None,
            Instruction::new(
                format!("ld {spelling}, {spelling}"),
                *opcode,
                4,
                1,
                vec![MicroOp::IncrementPc, MicroOp::LoadIrPc],
            ),
        );
    }

    for opcode in 0x40..=0x7Fu8 {
        if opcode == 0x76 || IDENTITY_LOADS.iter().any(|(identity, _)| *identity == opcode) {
            continue;
        }
        let dst = reg8_by_index((opcode >> 3) & 0x07);
        let src = reg8_by_index(opcode & 0x07);

        let (mnemonic, ticks, ops) = match (dst, src) {
            (Some(dst), Some(src)) => (
                format!("ld {}, {}", dst.spelling(), src.spelling()),
                4,
                vec![
                    MicroOp::CopyReg8 { dst, src },
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
            (None, Some(src)) => (
                format!("ld [hl], {}", src.spelling()),
                8,
                vec![
                    MicroOp::CopyRegToTempLo(src),
                    MicroOp::StoreTempLoIndirect(RegisterName::HL),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
            (Some(dst), None) => (
                format!("ld {}, [hl]", dst.spelling()),
                8,
                vec![
                    MicroOp::LoadTempLoIndirect(RegisterName::HL),
                    MicroOp::CopyTempLoToReg(dst),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
            (None, None) => unreachable!("0x76 is HALT"),
        };
        set.register(Prefix::None, Instruction::new(mnemonic, opcode, ticks, 1, ops));
    }
}

/// `ld r, d8` / `ld [hl], d8` and `ld rr, d16`.
fn register_immediates(set: &mut RegistrySet) {
    for index in 0..8u8 {
        let opcode = 0x06 | (index << 3);
        match reg8_by_index(index) {
            Some(reg) => set.register(
                Prefix::None,
                Instruction::new(
                    format!("ld {}, d8", reg.spelling()),
                    opcode,
                    8,
                    2,
                    vec![
                        MicroOp::IncrementPc,
                        MicroOp::LoadTempLoPc,
                        MicroOp::CopyTempLoToReg(reg),
                        MicroOp::IncrementPc,
                        MicroOp::LoadIrPc,
                    ],
                ),
            ),
            None => set.register(
                Prefix::None,
                Instruction::new(
                    "ld [hl], d8",
                    opcode,
                    12,
                    2,
                    vec![
                        MicroOp::IncrementPc,
                        MicroOp::LoadTempLoPc,
                        MicroOp::StoreTempLoIndirect(RegisterName::HL),
                        MicroOp::IncrementPc,
                        MicroOp::LoadIrPc,
                    ],
                ),
            ),
        }
    }

    // Fetch LSB, fetch MSB, transfer WZ into the pair, then advance PC and
    // overlap-fetch the next opcode.
    for (opcode, pair) in [
        (0x01, RegisterName::BC),
        (0x11, RegisterName::DE),
        (0x21, RegisterName::HL),
        (0x31, RegisterName::SP),
    ] {
        set.register(
            Prefix::None,
            Instruction::new(
                format!("ld {}, d16", pair.spelling()),
                opcode,
                12,
                3,
                vec![
                    MicroOp::IncrementPc,
                    MicroOp::LoadTempLoPc,
                    MicroOp::IncrementPc,
                    MicroOp::LoadTempHiPc,
                    MicroOp::CopyTempToReg16(pair),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
    }
}

/// Accumulator transfers through BC, DE and the auto-stepping HL forms.
fn register_indirect(set: &mut RegistrySet) {
    for (opcode, pair, mode, suffix) in [
        (0x02u8, RegisterName::BC, StepMode::None, ""),
        (0x12, RegisterName::DE, StepMode::None, ""),
        (0x22, RegisterName::HL, StepMode::Increment, "+"),
        (0x32, RegisterName::HL, StepMode::Decrement, "-"),
    ] {
        let mut ops = vec![
            MicroOp::CopyRegToTempLo(RegisterName::A),
            MicroOp::StoreTempLoIndirect(pair),
        ];
        if mode != StepMode::None {
            ops.push(MicroOp::StepRegister(pair, mode));
        }
        ops.push(MicroOp::IncrementPc);
        ops.push(MicroOp::LoadIrPc);
        set.register(
            Prefix::None,
            Instruction::new(
                format!("ld [{}{}], a", pair.spelling(), suffix),
                opcode,
                8,
                1,
                ops,
            ),
        );
    }

    for (opcode, pair, mode, suffix) in [
        (0x0Au8, RegisterName::BC, StepMode::None, ""),
        (0x1A, RegisterName::DE, StepMode::None, ""),
        (0x2A, RegisterName::HL, StepMode::Increment, "+"),
        (0x3A, RegisterName::HL, StepMode::Decrement, "-"),
    ] {
        let mut ops = vec![
            MicroOp::LoadTempLoIndirect(pair),
            MicroOp::CopyTempLoToReg(RegisterName::A),
        ];
        if mode != StepMode::None {
            ops.push(MicroOp::StepRegister(pair, mode));
        }
        ops.push(MicroOp::IncrementPc);
        ops.push(MicroOp::LoadIrPc);
        set.register(
            Prefix::None,
            Instruction::new(
                format!("ld a, [{}{}]", pair.spelling(), suffix),
                opcode,
                8,
                1,
                ops,
            ),
        );
    }
}

/// `ldh`: the `0xFF00` page addressed by an immediate or by C. The high
/// byte of the effective address is the constant `0xFF` staged into W.
fn register_high_page(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new(
            "ldh [a8], a",
            0xE0,
            12,
            2,
            vec![
                MicroOp::IncrementPc,
                MicroOp::LoadTempLoPc,
                MicroOp::SetTempHi(Byte::new(0xFF)),
                MicroOp::StoreTempIndirectByte(RegisterName::A),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
    set.register(
        Prefix::None,
        Instruction::new(
            "ldh a, [a8]",
            0xF0,
            12,
            2,
            vec![
                MicroOp::IncrementPc,
                MicroOp::LoadTempLoPc,
                MicroOp::SetTempHi(Byte::new(0xFF)),
                MicroOp::LoadTempLoTemp,
                MicroOp::CopyTempLoToReg(RegisterName::A),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
    set.register(
        Prefix::None,
        Instruction::new(
            "ldh [c], a",
            0xE2,
            8,
            1,
            vec![
                MicroOp::CopyRegToTempLo(RegisterName::C),
                MicroOp::SetTempHi(Byte::new(0xFF)),
                MicroOp::StoreTempIndirectByte(RegisterName::A),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
    set.register(
        Prefix::None,
        Instruction::new(
            "ldh a, [c]",
            0xF2,
            8,
            1,
            vec![
                MicroOp::CopyRegToTempLo(RegisterName::C),
                MicroOp::SetTempHi(Byte::new(0xFF)),
                MicroOp::LoadTempLoTemp,
                MicroOp::CopyTempLoToReg(RegisterName::A),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
}

/// Absolute 16-bit addressed forms.
fn register_absolute(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new(
            "ld [a16], a",
            0xEA,
            16,
            3,
            vec![
                MicroOp::IncrementPc,
                MicroOp::LoadTempLoPc,
                MicroOp::IncrementPc,
                MicroOp::LoadTempHiPc,
                MicroOp::StoreTempIndirectByte(RegisterName::A),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
    set.register(
        Prefix::None,
        Instruction::new(
            "ld a, [a16]",
            0xFA,
            16,
            3,
            vec![
                MicroOp::IncrementPc,
                MicroOp::LoadTempLoPc,
                MicroOp::IncrementPc,
                MicroOp::LoadTempHiPc,
                MicroOp::LoadTempLoTemp,
                MicroOp::CopyTempLoToReg(RegisterName::A),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
    // SP is written little-endian at the fetched address.
    set.register(
        Prefix::None,
        Instruction::new(
            "ld [a16], sp",
            0x08,
            20,
            3,
            vec![
                MicroOp::IncrementPc,
                MicroOp::LoadTempLoPc,
                MicroOp::IncrementPc,
                MicroOp::LoadTempHiPc,
                MicroOp::StoreTempIndirectWord(RegisterName::SP),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
}

fn register_sp(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new(
            "ld sp, hl",
            0xF9,
            8,
            1,
            vec![
                MicroOp::CopyReg16 {
                    dst: RegisterName::SP,
                    src: RegisterName::HL,
                },
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
    set.register(
        Prefix::None,
        Instruction::new(
            "ld hl, sp+e8",
            0xF8,
            12,
            2,
            vec![
                MicroOp::IncrementPc,
                MicroOp::LoadTempLoPc,
                MicroOp::AddSpSigned(RegisterName::HL),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
}
