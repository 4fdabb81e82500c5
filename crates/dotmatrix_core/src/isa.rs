//! The cycle-accurate instruction pipeline.
//!
//! Every opcode is decomposed into a fixed sequence of single-tick
//! micro-operations ([`ops::MicroOp`]); an [`Instruction`] couples that
//! sequence with its canonical T-state count and byte length, and the
//! [`decoder`] builds the 256-entry dispatch tables for the main and
//! `0xCB`-prefixed opcode spaces. One file per instruction family registers
//! its opcodes.

mod alu;
mod bits;
mod control;
mod decoder;
mod incdec;
mod instruction;
mod ld;
mod ops;
mod stack;
mod system;

pub use decoder::{decoder, Decoder, DispatchTable, Prefix};
pub use instruction::Instruction;
pub use ops::{AluOp, Cond, MicroOp, Operand8, RotateOp, StepKind, StepMode, StepOutcome};

use crate::cpu::RegisterName;

/// Register selected by a 3-bit field in the opcode matrices, in the
/// standard order 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=[HL], 7=A. `None` marks
/// the memory operand.
pub(crate) fn reg8_by_index(index: u8) -> Option<RegisterName> {
    match index {
        0 => Some(RegisterName::B),
        1 => Some(RegisterName::C),
        2 => Some(RegisterName::D),
        3 => Some(RegisterName::E),
        4 => Some(RegisterName::H),
        5 => Some(RegisterName::L),
        6 => None,
        7 => Some(RegisterName::A),
        _ => unreachable!("3-bit register index"),
    }
}

#[cfg(test)]
mod tests;
