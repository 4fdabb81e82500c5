//! The arithmetic/logic family: the `0x80-0xBF` matrix, the immediate
//! forms, the 16-bit adds, decimal adjust and friends, and the unprefixed
//! accumulator rotates.

use crate::cpu::RegisterName;

use super::decoder::{Prefix, RegistrySet};
use super::instruction::Instruction;
use super::ops::{AluOp, MicroOp, Operand8, RotateOp};
use super::reg8_by_index;

const ALU_ORDER: [AluOp; 8] = [
    AluOp::Add,
    AluOp::Adc,
    AluOp::Sub,
    AluOp::Sbc,
    AluOp::And,
    AluOp::Xor,
    AluOp::Or,
    AluOp::Cp,
];

pub(super) fn register(set: &mut RegistrySet) {
    register_matrix(set);
    register_immediates(set);
    register_wide(set);
    register_accumulator_misc(set);
}

fn register_matrix(set: &mut RegistrySet) {
    for opcode in 0x80..=0xBFu8 {
        let op = ALU_ORDER[((opcode - 0x80) >> 3) as usize];
        match reg8_by_index(opcode & 0x07) {
            Some(reg) => set.register(
                Prefix::None,
                Instruction::new(
                    format!("{} a, {}", op.spelling(), reg.spelling()),
                    opcode,
                    4,
                    1,
                    vec![
                        MicroOp::Alu8(op, Operand8::Reg(reg)),
                        MicroOp::IncrementPc,
                        MicroOp::LoadIrPc,
                    ],
                ),
            ),
            None => set.register(
                Prefix::None,
                Instruction::new(
                    format!("{} a, [hl]", op.spelling()),
                    opcode,
                    8,
                    1,
                    vec![
                        MicroOp::LoadTempLoIndirect(RegisterName::HL),
                        MicroOp::Alu8(op, Operand8::TempLo),
                        MicroOp::IncrementPc,
                        MicroOp::LoadIrPc,
                    ],
                ),
            ),
        }
    }
}

fn register_immediates(set: &mut RegistrySet) {
    for (position, op) in ALU_ORDER.iter().enumerate() {
        let opcode = 0xC6 + ((position as u8) << 3);
        set.register(
            Prefix::None,
            Instruction::new(
                format!("{} a, d8", op.spelling()),
                opcode,
                8,
                2,
                vec![
                    MicroOp::IncrementPc,
                    MicroOp::LoadTempLoPc,
                    MicroOp::Alu8(*op, Operand8::TempLo),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
    }
}

fn register_wide(set: &mut RegistrySet) {
    for (opcode, pair) in [
        (0x09u8, RegisterName::BC),
        (0x19, RegisterName::DE),
        (0x29, RegisterName::HL),
        (0x39, RegisterName::SP),
    ] {
        set.register(
            Prefix::None,
            Instruction::new(
                format!("add hl, {}", pair.spelling()),
                opcode,
                8,
                1,
                vec![
                    MicroOp::AddHl(pair),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
    }

    set.register(
        Prefix::None,
        Instruction::new(
            "add sp, e8",
            0xE8,
            16,
            2,
            vec![
                MicroOp::IncrementPc,
                MicroOp::LoadTempLoPc,
                MicroOp::AddSpSigned(RegisterName::SP),
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );
}

fn register_accumulator_misc(set: &mut RegistrySet) {
    for (mnemonic, opcode, op) in [
        ("daa", 0x27u8, MicroOp::Daa),
        ("cpl", 0x2F, MicroOp::Cpl),
        ("scf", 0x37, MicroOp::Scf),
        ("ccf", 0x3F, MicroOp::Ccf),
    ] {
        set.register(
            Prefix::None,
            Instruction::new(
                mnemonic,
                opcode,
                4,
                1,
                vec![op, MicroOp::IncrementPc, MicroOp::LoadIrPc],
            ),
        );
    }

    for (mnemonic, opcode, rotate) in [
        ("rlca", 0x07u8, RotateOp::Rlc),
        ("rrca", 0x0F, RotateOp::Rrc),
        ("rla", 0x17, RotateOp::Rl),
        ("rra", 0x1F, RotateOp::Rr),
    ] {
        set.register(
            Prefix::None,
            Instruction::new(
                mnemonic,
                opcode,
                4,
                1,
                vec![
                    MicroOp::RotateA(rotate),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
    }
}
