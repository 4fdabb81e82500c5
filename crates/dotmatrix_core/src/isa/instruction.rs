use crate::memory::MemoryMap;

use super::ops::{MicroOp, StepOutcome};

/// One decoded opcode: a mnemonic, the canonical machine timing, the byte
/// length in memory, and the ordered micro-op sequence.
///
/// `ticks` is in T-states; the op count never exceeds it (padding toward
/// the hardware cycle count is implicit — an instruction is free to carry
/// fewer ops than machine cycles).
#[derive(Clone, Debug)]
pub struct Instruction {
    mnemonic: String,
    opcode: u8,
    ticks: u8,
    length: u8,
    ops: Vec<MicroOp>,
}

impl Instruction {
    pub fn new(
        mnemonic: impl Into<String>,
        opcode: u8,
        ticks: u8,
        length: u8,
        ops: Vec<MicroOp>,
    ) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            opcode,
            ticks,
            length,
            ops,
        }
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Canonical duration in T-states.
    pub fn ticks(&self) -> u8 {
        self.ticks
    }

    /// Instruction length in bytes, including the opcode (and the CB prefix
    /// for prefixed instructions).
    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn ops(&self) -> &[MicroOp] {
        &self.ops
    }

    /// Run every op in order, short-circuiting on the first failure.
    ///
    /// Returns the number of ops that succeeded, or the full canonical
    /// `ticks` count when all of them did. The host treats a return below
    /// `ticks` as a fatal emulation error.
    pub fn execute_all(&self, mmap: &mut MemoryMap) -> usize {
        for (index, op) in self.ops.iter().enumerate() {
            if op.execute(mmap).is_failure() {
                return index;
            }
        }
        self.ticks as usize
    }

    /// Run the op at `index` and return its typed outcome. Indices come
    /// from internal tables; an out-of-range index is a caller bug and
    /// panics.
    pub fn execute_cycle(&self, mmap: &mut MemoryMap, index: usize) -> StepOutcome {
        self.ops[index].execute(mmap)
    }
}
