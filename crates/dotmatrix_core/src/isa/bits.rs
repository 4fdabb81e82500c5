//! The complete CB-prefixed table: rotates, shifts, swap, and the
//! bit-test/reset/set matrix, over B, C, D, E, H, L, [HL] and A.
//!
//! `[HL]` forms stage the operand through Z so each tick carries at most
//! one bus transaction. Tick counts include the prefix fetch cycle.

use crate::cpu::RegisterName;

use super::decoder::{Prefix, RegistrySet};
use super::instruction::Instruction;
use super::ops::{MicroOp, Operand8, RotateOp};
use super::reg8_by_index;

const ROTATE_ORDER: [RotateOp; 8] = [
    RotateOp::Rlc,
    RotateOp::Rrc,
    RotateOp::Rl,
    RotateOp::Rr,
    RotateOp::Sla,
    RotateOp::Sra,
    RotateOp::Swap,
    RotateOp::Srl,
];

pub(super) fn register(set: &mut RegistrySet) {
    for opcode in 0..=0xFFu8 {
        let group = opcode >> 6;
        let selector = (opcode >> 3) & 0x07;
        let target = reg8_by_index(opcode & 0x07);

        let instruction = match (group, target) {
            // Rotates, shifts, swap.
            (0, Some(reg)) => {
                let rotate = ROTATE_ORDER[selector as usize];
                Instruction::new(
                    format!("{} {}", rotate.spelling(), reg.spelling()),
                    opcode,
                    8,
                    2,
                    vec![
                        MicroOp::CbRotate(rotate, Operand8::Reg(reg)),
                        MicroOp::IncrementPc,
                        MicroOp::LoadIrPc,
                    ],
                )
            }
            (0, None) => {
                let rotate = ROTATE_ORDER[selector as usize];
                Instruction::new(
                    format!("{} [hl]", rotate.spelling()),
                    opcode,
                    16,
                    2,
                    vec![
                        MicroOp::LoadTempLoIndirect(RegisterName::HL),
                        MicroOp::CbRotate(rotate, Operand8::TempLo),
                        MicroOp::StoreTempLoIndirect(RegisterName::HL),
                        MicroOp::IncrementPc,
                        MicroOp::LoadIrPc,
                    ],
                )
            }
            // BIT: test only, no write-back.
            (1, Some(reg)) => Instruction::new(
                format!("bit {}, {}", selector, reg.spelling()),
                opcode,
                8,
                2,
                vec![
                    MicroOp::CbBit(selector, Operand8::Reg(reg)),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
            (1, None) => Instruction::new(
                format!("bit {selector}, [hl]"),
                opcode,
                12,
                2,
                vec![
                    MicroOp::LoadTempLoIndirect(RegisterName::HL),
                    MicroOp::CbBit(selector, Operand8::TempLo),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
            // RES / SET.
            (2 | 3, Some(reg)) => {
                let op = if group == 2 {
                    MicroOp::CbRes(selector, Operand8::Reg(reg))
                } else {
                    MicroOp::CbSet(selector, Operand8::Reg(reg))
                };
                Instruction::new(
                    format!(
                        "{} {}, {}",
                        if group == 2 { "res" } else { "set" },
                        selector,
                        reg.spelling()
                    ),
                    opcode,
                    8,
                    2,
                    vec![op, MicroOp::IncrementPc, MicroOp::LoadIrPc],
                )
            }
            (2 | 3, None) => {
                let op = if group == 2 {
                    MicroOp::CbRes(selector, Operand8::TempLo)
                } else {
                    MicroOp::CbSet(selector, Operand8::TempLo)
                };
                Instruction::new(
                    format!("{} {selector}, [hl]", if group == 2 { "res" } else { "set" }),
                    opcode,
                    16,
                    2,
                    vec![
                        MicroOp::LoadTempLoIndirect(RegisterName::HL),
                        op,
                        MicroOp::StoreTempLoIndirect(RegisterName::HL),
                        MicroOp::IncrementPc,
                        MicroOp::LoadIrPc,
                    ],
                )
            }
            _ => unreachable!("2-bit group"),
        };

        set.register(Prefix::Cb, instruction);
    }
}
