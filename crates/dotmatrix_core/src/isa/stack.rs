//! PUSH and POP. `pop af` goes through the AF write path and therefore
//! masks the low nibble of F to zero.

use crate::cpu::RegisterName;

use super::decoder::{Prefix, RegistrySet};
use super::instruction::Instruction;
use super::ops::{Cond, MicroOp};

const PAIRS: [(u8, u8, RegisterName); 4] = [
    (0xC5, 0xC1, RegisterName::BC),
    (0xD5, 0xD1, RegisterName::DE),
    (0xE5, 0xE1, RegisterName::HL),
    (0xF5, 0xF1, RegisterName::AF),
];

pub(super) fn register(set: &mut RegistrySet) {
    for (push_opcode, pop_opcode, pair) in PAIRS {
        set.register(
            Prefix::None,
            Instruction::new(
                format!("push {}", pair.spelling()),
                push_opcode,
                16,
                1,
                vec![
                    // Internal delay cycle before the first stack write.
                    MicroOp::Nop,
                    MicroOp::PushRegHigh(pair),
                    MicroOp::PushRegLow(pair),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
        set.register(
            Prefix::None,
            Instruction::new(
                format!("pop {}", pair.spelling()),
                pop_opcode,
                12,
                1,
                vec![
                    MicroOp::PopTempLoIf(Cond::Always),
                    MicroOp::PopTempHiIf(Cond::Always),
                    MicroOp::CopyTempToReg16(pair),
                    MicroOp::IncrementPc,
                    MicroOp::LoadIrPc,
                ],
            ),
        );
    }
}
