//! The CPU driver: owns the fetch/decode/execute state machine on top of
//! the memory map and the decoder tables.
//!
//! The pipeline keeps the fetch-execute overlap invariant: between
//! instructions, IR already holds the opcode at the current PC, because the
//! final micro-op of every instruction is the overlapped `LoadIrPc` fetch.
//! The first `step` after construction (or reset) primes the pipeline by
//! fetching IR without advancing PC.

mod regs;

pub use regs::{Flag, RegisterFile, RegisterName};

use crate::isa::{decoder, Prefix};
use crate::memory::MemoryMap;

/// T-states consumed per idle step while the CPU is halted or stopped.
const IDLE_TICKS: usize = 4;

#[derive(Default)]
pub struct Cpu {
    primed: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the primed pipeline; the next `step` fetches IR afresh.
    pub fn reset(&mut self) {
        self.primed = false;
    }

    /// Execute one instruction and return the number of T-states consumed.
    ///
    /// Returns the instruction's canonical tick count on success, a smaller
    /// op count if a micro-op aborted the sequence (the host must treat
    /// that as a fatal emulation error), `IDLE_TICKS` while halted or
    /// stopped, and 0 from the halt-and-fault path.
    pub fn step(&mut self, mmap: &mut MemoryMap) -> usize {
        if !self.primed {
            let pc = mmap.regs().pc().get();
            let fetch = mmap.read_byte_at(pc);
            if fetch.is_failure() {
                log::warn!(
                    "initial opcode fetch at 0x{:04X} failed: {}",
                    pc,
                    fetch.status_description()
                );
                return 0;
            }
            let opcode = *fetch.value();
            mmap.regs_mut().set_ir(opcode);
            self.primed = true;
        }

        if mmap.regs().halted() || mmap.regs().stopped() {
            return IDLE_TICKS;
        }

        let opcode = mmap.regs().ir().get();
        let tables = decoder();

        if opcode == 0xCB {
            let prefix = tables
                .table(Prefix::None)
                .lookup(0xCB)
                .expect("prefix opcode is always registered");
            let executed = prefix.execute_all(mmap);
            if executed < prefix.ticks() as usize {
                return executed;
            }

            let sub_opcode = mmap.regs().ir().get();
            return match tables.table(Prefix::Cb).lookup(sub_opcode) {
                Some(instruction) => instruction.execute_all(mmap),
                None => self.halt_and_fault(mmap, sub_opcode, true),
            };
        }

        match tables.table(Prefix::None).lookup(opcode) {
            Some(instruction) => instruction.execute_all(mmap),
            None => self.halt_and_fault(mmap, opcode, false),
        }
    }

    /// Landing pad for unimplemented opcodes: never undefined behaviour,
    /// just a warning and a halted CPU.
    fn halt_and_fault(&mut self, mmap: &mut MemoryMap, opcode: u8, prefixed: bool) -> usize {
        log::warn!(
            "unimplemented opcode {}0x{:02X} at pc 0x{:04X}; halting",
            if prefixed { "0xCB " } else { "" },
            opcode,
            mmap.regs().pc().get()
        );
        mmap.regs_mut().set_halted(true);
        0
    }
}

#[cfg(test)]
mod tests;
