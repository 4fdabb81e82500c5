//! 8-bit and 16-bit increment/decrement.

use crate::cpu::RegisterName;

use super::decoder::{Prefix, RegistrySet};
use super::instruction::Instruction;
use super::ops::{MicroOp, StepMode};
use super::reg8_by_index;

pub(super) fn register(set: &mut RegistrySet) {
    for index in 0..8u8 {
        let inc_opcode = 0x04 | (index << 3);
        let dec_opcode = 0x05 | (index << 3);
        match reg8_by_index(index) {
            Some(reg) => {
                set.register(
                    Prefix::None,
                    Instruction::new(
                        format!("inc {}", reg.spelling()),
                        inc_opcode,
                        4,
                        1,
                        vec![
                            MicroOp::IncReg8(reg),
                            MicroOp::IncrementPc,
                            MicroOp::LoadIrPc,
                        ],
                    ),
                );
                set.register(
                    Prefix::None,
                    Instruction::new(
                        format!("dec {}", reg.spelling()),
                        dec_opcode,
                        4,
                        1,
                        vec![
                            MicroOp::DecReg8(reg),
                            MicroOp::IncrementPc,
                            MicroOp::LoadIrPc,
                        ],
                    ),
                );
            }
            None => {
                // Read-modify-write through Z, one bus access per tick.
                set.register(
                    Prefix::None,
                    Instruction::new(
                        "inc [hl]",
                        inc_opcode,
                        12,
                        1,
                        vec![
                            MicroOp::LoadTempLoIndirect(RegisterName::HL),
                            MicroOp::IncTempLo,
                            MicroOp::StoreTempLoIndirect(RegisterName::HL),
                            MicroOp::IncrementPc,
                            MicroOp::LoadIrPc,
                        ],
                    ),
                );
                set.register(
                    Prefix::None,
                    Instruction::new(
                        "dec [hl]",
                        dec_opcode,
                        12,
                        1,
                        vec![
                            MicroOp::LoadTempLoIndirect(RegisterName::HL),
                            MicroOp::DecTempLo,
                            MicroOp::StoreTempLoIndirect(RegisterName::HL),
                            MicroOp::IncrementPc,
                            MicroOp::LoadIrPc,
                        ],
                    ),
                );
            }
        }
    }

    for (inc_opcode, dec_opcode, pair) in [
        (0x03u8, 0x0Bu8, RegisterName::BC),
        (0x13, 0x1B, RegisterName::DE),
        (0x23, 0x2B, RegisterName::HL),
        (0x33, 0x3B, RegisterName::SP),
    ] {
        set.register(
            Prefix::None,
            Instruction::new(
                format!("inc {}", pair.spelling()),
                inc_opcode,
                8,
                1,
                vec![
                    MicroOp::StepRegister(pair, StepMode::Increment),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
        set.register(
            Prefix::None,
            Instruction::new(
                format!("dec {}", pair.spelling()),
                dec_opcode,
                8,
                1,
                vec![
                    MicroOp::StepRegister(pair, StepMode::Decrement),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
    }
}
