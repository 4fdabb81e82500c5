use std::collections::HashSet;

use dotmatrix_common::Word;

use super::*;
use crate::cpu::RegisterName;
use crate::memory::{BankLayout, MemoryMap, MAX_ERAM_BANKS, MAX_ROM_BANKS, MAX_VRAM_BANKS, MAX_WRAM_BANKS};

/// Opcodes the LR35902 leaves unassigned; dispatching one is a fault.
const MAIN_TABLE_HOLES: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];

fn full_map() -> MemoryMap {
    let mut mmap = MemoryMap::new();
    let up = mmap.initialize(
        BankLayout::builder()
            .rom_banks(MAX_ROM_BANKS)
            .vram_banks(MAX_VRAM_BANKS)
            .eram_banks(MAX_ERAM_BANKS)
            .wram_banks(MAX_WRAM_BANKS)
            .build(),
    );
    assert!(up.is_success());
    mmap
}

/// DMG cartridge without external RAM; ERAM accesses fail on it.
fn ramless_map() -> MemoryMap {
    let mut mmap = MemoryMap::new();
    assert!(mmap.initialize(BankLayout::dmg()).is_success());
    mmap
}

#[test]
fn main_table_covers_everything_but_the_holes() {
    let table = decoder().table(Prefix::None);

    for opcode in 0..=0xFFu8 {
        let entry = table.lookup(opcode);
        if MAIN_TABLE_HOLES.contains(&opcode) {
            assert!(entry.is_none(), "0x{opcode:02X} should be unassigned");
            assert_eq!(table.ticks(opcode), 0);
            assert_eq!(table.length(opcode), 0);
        } else {
            let instruction = entry.unwrap_or_else(|| panic!("0x{opcode:02X} missing"));
            assert_eq!(instruction.opcode(), opcode);
            assert!(instruction.ticks() >= 4);
            assert!(instruction.ticks() % 4 == 0);
            assert!((1..=3).contains(&instruction.length()));
            assert_eq!(table.ticks(opcode), instruction.ticks());
            assert_eq!(table.length(opcode), instruction.length());
        }
    }
}

#[test]
fn cb_table_is_complete() {
    let table = decoder().table(Prefix::Cb);

    for opcode in 0..=0xFFu8 {
        let instruction = table
            .lookup(opcode)
            .unwrap_or_else(|| panic!("cb 0x{opcode:02X} missing"));
        assert_eq!(instruction.opcode(), opcode);
        assert_eq!(instruction.length(), 2);
        assert!(matches!(instruction.ticks(), 8 | 12 | 16));
    }
}

#[test]
fn registries_have_unique_opcodes_and_mnemonics() {
    for prefix in [Prefix::None, Prefix::Cb] {
        let table = decoder().table(prefix);
        let mut opcodes = HashSet::new();
        let mut mnemonics = HashSet::new();

        for instruction in table.instructions() {
            assert!(opcodes.insert(instruction.opcode()));
            assert!(mnemonics.insert(instruction.mnemonic().to_string()));
        }
    }
}

#[test]
fn every_instruction_ends_with_the_overlap_fetch() {
    for prefix in [Prefix::None, Prefix::Cb] {
        for instruction in decoder().table(prefix).instructions() {
            assert_eq!(
                instruction.ops().last(),
                Some(&MicroOp::LoadIrPc),
                "{} must end with the IR fetch",
                instruction.mnemonic()
            );
            assert!(instruction.ops().len() <= instruction.ticks() as usize);
        }
    }
}

#[test]
fn canonical_timing_spot_checks() {
    let main = decoder().table(Prefix::None);
    let cb = decoder().table(Prefix::Cb);

    // (opcode, ticks, length)
    let expectations = [
        (0x00u8, 4u8, 1u8),  // nop
        (0x01, 12, 3),       // ld bc, d16
        (0x02, 8, 1),        // ld [bc], a
        (0x06, 8, 2),        // ld b, d8
        (0x08, 20, 3),       // ld [a16], sp
        (0x36, 12, 2),       // ld [hl], d8
        (0x46, 8, 1),        // ld b, [hl]
        (0x70, 8, 1),        // ld [hl], b
        (0x76, 4, 1),        // halt
        (0x80, 4, 1),        // add a, b
        (0x86, 8, 1),        // add a, [hl]
        (0xC6, 8, 2),        // add a, d8
        (0xC3, 16, 3),       // jp a16
        (0x18, 12, 2),       // jr e8
        (0xCD, 24, 3),       // call a16
        (0xC9, 16, 1),       // ret
        (0xC0, 20, 1),       // ret nz
        (0xC5, 16, 1),       // push bc
        (0xC1, 12, 1),       // pop bc
        (0xC7, 16, 1),       // rst $00
        (0xE0, 12, 2),       // ldh [a8], a
        (0xF0, 12, 2),       // ldh a, [a8]
        (0xEA, 16, 3),       // ld [a16], a
        (0xE8, 16, 2),       // add sp, e8
        (0xF8, 12, 2),       // ld hl, sp+e8
        (0xE9, 4, 1),        // jp hl
        (0x34, 12, 1),       // inc [hl]
    ];
    for (opcode, ticks, length) in expectations {
        assert_eq!(main.ticks(opcode), ticks, "ticks 0x{opcode:02X}");
        assert_eq!(main.length(opcode), length, "length 0x{opcode:02X}");
    }

    assert_eq!(cb.ticks(0x00), 8); // rlc b
    assert_eq!(cb.ticks(0x06), 16); // rlc [hl]
    assert_eq!(cb.ticks(0x46), 12); // bit 0, [hl]
    assert_eq!(cb.ticks(0xC6), 16); // set 0, [hl]
    assert_eq!(cb.ticks(0x7F), 8); // bit 7, a
}

#[test]
fn identity_loads_have_distinct_entries() {
    let table = decoder().table(Prefix::None);
    for (opcode, mnemonic) in [
        (0x40u8, "ld b, b"),
        (0x49, "ld c, c"),
        (0x52, "ld d, d"),
        (0x5B, "ld e, e"),
        (0x64, "ld h, h"),
        (0x6D, "ld l, l"),
        (0x7F, "ld a, a"),
    ] {
        let instruction = table.lookup(opcode).unwrap();
        assert_eq!(instruction.mnemonic(), mnemonic);
        assert_eq!(instruction.ticks(), 4);
        // NOP-equivalent sequence.
        assert_eq!(
            instruction.ops(),
            &[MicroOp::IncrementPc, MicroOp::LoadIrPc][..]
        );
    }
}

#[test]
fn execute_all_short_circuits_on_the_first_failure() {
    // BC points into ERAM on a cartridge without any; the indirect load is
    // the second op and fails.
    let mut mmap = ramless_map();
    mmap.regs_mut().set_bc(Word::new(0xA000));

    let instruction = Instruction::new(
        "test sequence",
        0x00,
        8,
        1,
        vec![
            MicroOp::Nop,
            MicroOp::LoadTempLoIndirect(RegisterName::BC),
            MicroOp::Nop,
        ],
    );

    assert_eq!(instruction.execute_all(&mut mmap), 1);

    // All ops succeeding reports the canonical tick count, not the op
    // count.
    let trivial = Instruction::new("trivial", 0x00, 8, 1, vec![MicroOp::Nop, MicroOp::Nop]);
    assert_eq!(trivial.execute_all(&mut mmap), 8);
}

#[test]
fn execute_cycle_returns_the_typed_outcome() {
    let mut mmap = ramless_map();
    mmap.regs_mut().set_bc(Word::new(0xA000));

    let instruction = Instruction::new(
        "test sequence",
        0x00,
        8,
        1,
        vec![MicroOp::Nop, MicroOp::LoadTempLoIndirect(RegisterName::BC)],
    );

    let first = instruction.execute_cycle(&mut mmap, 0);
    assert!(first.is_success());
    assert!(first.is_kind(StepKind::Success));

    let second = instruction.execute_cycle(&mut mmap, 1);
    assert!(second.is_failure());
    assert!(second.is_kind(StepKind::InvalidBank));
}

#[test]
fn bus_diagnostics_upcast_without_losing_identity() {
    // A fetch from Echo RAM succeeds with the prohibited-address warning;
    // the op carries the widened kind but still counts as a success.
    let mut mmap = full_map();
    mmap.regs_mut().set_pc(Word::new(0xE000));

    let outcome = MicroOp::LoadTempLoPc.execute(&mut mmap);
    assert!(outcome.is_success());
    assert!(outcome.is_kind(StepKind::ProhibitedAddress));

    // PC wrap surfaces the overflow diagnostic, still non-fatal.
    mmap.regs_mut().set_pc(Word::new(0xFFFF));
    let outcome = MicroOp::IncrementPc.execute(&mut mmap);
    assert!(outcome.is_success());
    assert!(outcome.is_kind(StepKind::RegisterOverflow));
    assert_eq!(mmap.regs().pc(), Word::new(0x0000));
}

#[test]
fn immediate_staging_goes_through_wz() {
    // LD BC, d16 must stage both operand bytes in WZ before the transfer.
    let mut mmap = full_map();
    mmap.regs_mut().set_pc(Word::new(0xC000));
    for (offset, byte) in [0x01u8, 0x34, 0x12, 0x00].iter().enumerate() {
        let write = mmap.write_byte_at(0xC000 + offset as u16, dotmatrix_common::Byte::new(*byte));
        assert!(write.is_success());
    }

    let instruction = decoder().table(Prefix::None).lookup(0x01).unwrap();
    assert_eq!(instruction.execute_all(&mut mmap), 12);

    assert_eq!(mmap.regs().wz(), Word::new(0x1234));
    assert_eq!(mmap.regs().bc(), Word::new(0x1234));
    assert_eq!(mmap.regs().pc(), Word::new(0xC003));
}
