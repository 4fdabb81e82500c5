//! Core execution engine for a Game Boy / Game Boy Color emulator.
//!
//! Three interlocking pieces live here: the banked 16-bit memory map
//! ([`memory::MemoryMap`]), the LR35902 register file
//! ([`cpu::RegisterFile`]), and the cycle-accurate micro-op instruction
//! pipeline ([`isa`]) with its two-table opcode decoder. The PPU, APU,
//! timers, DMA, interrupt dispatch and host event loop are external
//! collaborators that consume the bus contract exposed by the memory map.

pub mod cpu;
pub mod isa;
pub mod memory;

pub use cpu::{Cpu, Flag, RegisterFile, RegisterName};
pub use memory::{BankLayout, MemoryAddress, MemoryMap};
