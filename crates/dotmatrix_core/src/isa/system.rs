//! NOP, HALT, STOP and the interrupt master enable toggles.

use super::decoder::{Prefix, RegistrySet};
use super::instruction::Instruction;
use super::ops::MicroOp;

pub(super) fn register(set: &mut RegistrySet) {
    set.register(
        Prefix::None,
        Instruction::new("nop", 0x00, 4, 1, vec![MicroOp::IncrementPc, MicroOp::LoadIrPc]),
    );

    // STOP is officially two bytes; the padding byte is fetched past and
    // ignored.
    set.register(
        Prefix::None,
        Instruction::new(
            "stop",
            0x10,
            4,
            2,
            vec![
                MicroOp::Stop,
                MicroOp::IncrementPc,
                MicroOp::IncrementPc,
                MicroOp::LoadIrPc,
            ],
        ),
    );

    // HALT latches the halted state; wake-up belongs to the interrupt
    // controller.
    set.register(
        Prefix::None,
        Instruction::new(
            "halt",
            0x76,
            4,
            1,
            vec![MicroOp::Halt, MicroOp::IncrementPc, MicroOp::LoadIrPc],
        ),
    );

    set.register(
        Prefix::None,
        Instruction::new(
            "di",
            0xF3,
            4,
            1,
            vec![MicroOp::DisableIme, MicroOp::IncrementPc, MicroOp::LoadIrPc],
        ),
    );
    set.register(
        Prefix::None,
        Instruction::new(
            "ei",
            0xFB,
            4,
            1,
            vec![MicroOp::EnableIme, MicroOp::IncrementPc, MicroOp::LoadIrPc],
        ),
    );
}
