//! Opcode registries and the dispatch tables built from them.
//!
//! Each instruction family registers its opcodes into one of two
//! registries, `main` or `cb`. Registration enforces the registry
//! invariants — unique opcode, unique mnemonic, op count within the
//! canonical tick count — when the decoder is first built, so a bad table
//! is caught the first time anything decodes rather than mid-run.

use once_cell::sync::Lazy;

use super::instruction::Instruction;
use super::{alu, bits, control, incdec, ld, stack, system};

/// Which opcode space an instruction decodes in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Prefix {
    None,
    Cb,
}

/// Accumulates instructions for both registries during the build phase.
pub(crate) struct RegistrySet {
    main: Vec<Instruction>,
    cb: Vec<Instruction>,
}

impl RegistrySet {
    fn new() -> Self {
        Self {
            main: Vec::new(),
            cb: Vec::new(),
        }
    }

    pub(crate) fn register(&mut self, prefix: Prefix, instruction: Instruction) {
        let registry = match prefix {
            Prefix::None => &mut self.main,
            Prefix::Cb => &mut self.cb,
        };

        if let Some(previous) = registry
            .iter()
            .find(|existing| existing.opcode() == instruction.opcode())
        {
            panic!(
                "duplicate opcode 0x{:02X}: {:?} vs {:?}",
                instruction.opcode(),
                previous.mnemonic(),
                instruction.mnemonic()
            );
        }
        if registry
            .iter()
            .any(|existing| existing.mnemonic() == instruction.mnemonic())
        {
            panic!("duplicate mnemonic {:?}", instruction.mnemonic());
        }
        assert!(
            instruction.ops().len() <= instruction.ticks() as usize,
            "op count exceeds the canonical tick count for {:?}",
            instruction.mnemonic()
        );

        registry.push(instruction);
    }
}

/// 256-entry dispatch table synthesized from one registry: per-opcode
/// instruction lookup plus the canonical tick and byte-length tables.
pub struct DispatchTable {
    instructions: Vec<Instruction>,
    index: [Option<u16>; 256],
    ticks: [u8; 256],
    lengths: [u8; 256],
}

impl DispatchTable {
    fn build(instructions: Vec<Instruction>) -> Self {
        let mut index = [None; 256];
        let mut ticks = [0u8; 256];
        let mut lengths = [0u8; 256];

        for (position, instruction) in instructions.iter().enumerate() {
            let opcode = instruction.opcode() as usize;
            index[opcode] = Some(position as u16);
            ticks[opcode] = instruction.ticks();
            lengths[opcode] = instruction.length();
        }

        Self {
            instructions,
            index,
            ticks,
            lengths,
        }
    }

    /// The instruction registered for `opcode`, if any.
    pub fn lookup(&self, opcode: u8) -> Option<&Instruction> {
        self.index[opcode as usize].map(|position| &self.instructions[position as usize])
    }

    /// Canonical T-state count for `opcode` (0 for unregistered opcodes).
    pub fn ticks(&self, opcode: u8) -> u8 {
        self.ticks[opcode as usize]
    }

    /// Byte length for `opcode` (0 for unregistered opcodes).
    pub fn length(&self, opcode: u8) -> u8 {
        self.lengths[opcode as usize]
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

pub struct Decoder {
    main: DispatchTable,
    cb: DispatchTable,
}

impl Decoder {
    fn build() -> Self {
        let mut set = RegistrySet::new();

        system::register(&mut set);
        ld::register(&mut set);
        alu::register(&mut set);
        incdec::register(&mut set);
        control::register(&mut set);
        stack::register(&mut set);
        bits::register(&mut set);

        Self {
            main: DispatchTable::build(set.main),
            cb: DispatchTable::build(set.cb),
        }
    }

    pub fn table(&self, prefix: Prefix) -> &DispatchTable {
        match prefix {
            Prefix::None => &self.main,
            Prefix::Cb => &self.cb,
        }
    }
}

/// The process-wide decoder, built (and validated) on first use.
pub fn decoder() -> &'static Decoder {
    static DECODER: Lazy<Decoder> = Lazy::new(Decoder::build);
    &DECODER
}
