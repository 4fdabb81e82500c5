use dotmatrix_common::{Byte, Nibble, Word};

use super::*;
use crate::memory::{
    BankLayout, MemoryMap, MAX_ERAM_BANKS, MAX_ROM_BANKS, MAX_VRAM_BANKS, MAX_WRAM_BANKS,
};

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

/// Place a program in WRAM and point PC at it.
fn boot_with(program: &[u8]) -> (Cpu, MemoryMap) {
    let mut mmap = full_map();
    for (offset, byte) in program.iter().enumerate() {
        let write = mmap.write_byte_at(0xC000 + offset as u16, Byte::new(*byte));
        assert!(write.is_success());
    }
    mmap.regs_mut().set_pc(Word::new(0xC000));
    (Cpu::new(), mmap)
}

fn flags(mmap: &MemoryMap) -> (bool, bool, bool, bool) {
    let regs = mmap.regs();
    (
        regs.flag(Flag::Z),
        regs.flag(Flag::N),
        regs.flag(Flag::H),
        regs.flag(Flag::C),
    )
}

#[test]
fn nop_smoke() {
    let (mut cpu, mut mmap) = boot_with(&[0x00, 0x00]);

    let ticks = cpu.step(&mut mmap);

    assert_eq!(ticks, 4);
    assert_eq!(mmap.regs().pc(), Word::new(0xC001));
    assert_eq!(mmap.regs().ir(), Byte::new(0x00));
}

#[test]
fn ld_bc_d16() {
    let (mut cpu, mut mmap) = boot_with(&[0x01, 0x34, 0x12, 0x00]);

    let ticks = cpu.step(&mut mmap);

    assert_eq!(ticks, 12);
    assert_eq!(mmap.regs().bc(), Word::new(0x1234));
    assert_eq!(mmap.regs().pc(), Word::new(0xC003));
    assert_eq!(mmap.regs().ir(), Byte::new(0x00));
    // Nothing else moved.
    assert_eq!(mmap.regs().a(), Byte::new(0x00));
    assert_eq!(mmap.regs().de(), Word::new(0x0000));
    assert_eq!(mmap.regs().hl(), Word::new(0x0000));
    assert_eq!(mmap.regs().sp(), Word::new(0x0000));
}

#[test]
fn ld_bc_indirect_a() {
    let (mut cpu, mut mmap) = boot_with(&[0x02, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x50));
    mmap.regs_mut().set_bc(Word::new(0x6000));

    let ticks = cpu.step(&mut mmap);

    assert_eq!(ticks, 8);
    assert_eq!(*mmap.read_byte_at(0x6000).value(), Byte::new(0x50));
    assert_eq!(mmap.regs().pc(), Word::new(0xC001));
    assert_eq!(mmap.regs().ir(), Byte::new(0x00));
}

#[test]
fn add_a_b_sets_all_the_flags() {
    let (mut cpu, mut mmap) = boot_with(&[0x80, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x3A));
    mmap.regs_mut().set_b(Byte::new(0xC6));

    let ticks = cpu.step(&mut mmap);

    assert_eq!(ticks, 4);
    assert_eq!(mmap.regs().a(), Byte::new(0x00));
    assert_eq!(flags(&mmap), (true, false, true, true));
}

#[test]
fn add_a_r_flag_matrix() {
    // (a, b, result, z, n, h, c)
    let cases = [
        (0x00u8, 0x00u8, 0x00u8, true, false, false, false),
        (0x0F, 0x01, 0x10, false, false, true, false),
        (0xF0, 0x20, 0x10, false, false, false, true),
        (0x80, 0x80, 0x00, true, false, false, true),
    ];
    for (a, b, result, z, n, h, c) in cases {
        let (mut cpu, mut mmap) = boot_with(&[0x80, 0x00]);
        mmap.regs_mut().set_a(Byte::new(a));
        mmap.regs_mut().set_b(Byte::new(b));

        cpu.step(&mut mmap);

        assert_eq!(mmap.regs().a(), Byte::new(result), "{a:02X}+{b:02X}");
        assert_eq!(flags(&mmap), (z, n, h, c), "{a:02X}+{b:02X}");
    }
}

#[test]
fn identity_load_behaves_like_nop() {
    let (mut cpu, mut mmap) = boot_with(&[0x40, 0x00]);
    mmap.regs_mut().set_b(Byte::new(0x99));

    let ticks = cpu.step(&mut mmap);

    assert_eq!(ticks, 4);
    assert_eq!(mmap.regs().b(), Byte::new(0x99));
    assert_eq!(mmap.regs().pc(), Word::new(0xC001));
}

#[test]
fn ld_matrix_and_hl_stepping_forms() {
    // LD HL, 0xC100; LD B, 0x12; LD [HL], B; LD A, [HL+]; LD [HL-], A;
    // LD C, A
    let (mut cpu, mut mmap) = boot_with(&[
        0x21, 0x00, 0xC1, // ld hl, 0xC100
        0x06, 0x12, // ld b, 0x12
        0x70, // ld [hl], b
        0x2A, // ld a, [hl+]
        0x32, // ld [hl-], a
        0x4F, // ld c, a
        0x00,
    ]);

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(mmap.regs().hl(), Word::new(0xC100));

    assert_eq!(cpu.step(&mut mmap), 8);
    assert_eq!(mmap.regs().b(), Byte::new(0x12));

    assert_eq!(cpu.step(&mut mmap), 8);
    assert_eq!(*mmap.read_byte_at(0xC100).value(), Byte::new(0x12));

    assert_eq!(cpu.step(&mut mmap), 8);
    assert_eq!(mmap.regs().a(), Byte::new(0x12));
    assert_eq!(mmap.regs().hl(), Word::new(0xC101));

    assert_eq!(cpu.step(&mut mmap), 8);
    assert_eq!(*mmap.read_byte_at(0xC101).value(), Byte::new(0x12));
    assert_eq!(mmap.regs().hl(), Word::new(0xC100));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().c(), Byte::new(0x12));
}

#[test]
fn ldh_addresses_the_high_page() {
    // LDH [0x80], A; LDH A, [0x81]
    let (mut cpu, mut mmap) = boot_with(&[0xE0, 0x80, 0xF0, 0x81, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x42));
    assert!(mmap.write_byte_at(0xFF81, Byte::new(0x24)).is_success());

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(*mmap.read_byte_at(0xFF80).value(), Byte::new(0x42));

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(mmap.regs().a(), Byte::new(0x24));
    assert_eq!(mmap.regs().pc(), Word::new(0xC004));
}

#[test]
fn ld_absolute_sp_writes_little_endian() {
    let (mut cpu, mut mmap) = boot_with(&[0x08, 0x00, 0xC2, 0x00]);
    mmap.regs_mut().set_sp(Word::new(0xBEEF));

    let ticks = cpu.step(&mut mmap);

    assert_eq!(ticks, 20);
    assert_eq!(*mmap.read_byte_at(0xC200).value(), Byte::new(0xEF));
    assert_eq!(*mmap.read_byte_at(0xC201).value(), Byte::new(0xBE));
    assert_eq!(mmap.regs().pc(), Word::new(0xC003));
}

#[test]
fn jr_taken_and_untaken() {
    // JR NZ, +2 skips the two NOPs when Z is clear.
    let (mut cpu, mut mmap) = boot_with(&[0x20, 0x02, 0x00, 0x00, 0x00]);

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(mmap.regs().pc(), Word::new(0xC004));

    // With Z set the branch falls through; the canonical tick count is
    // still reported.
    let (mut cpu, mut mmap) = boot_with(&[0x28, 0x10, 0x00, 0x00]);
    mmap.regs_mut().set_flag(Flag::Z, false);
    let (mut cpu2, mut mmap2) = boot_with(&[0x20, 0x10, 0x00, 0x00]);
    mmap2.regs_mut().set_flag(Flag::Z, true);

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(mmap.regs().pc(), Word::new(0xC002));
    assert_eq!(cpu2.step(&mut mmap2), 12);
    assert_eq!(mmap2.regs().pc(), Word::new(0xC002));
}

#[test]
fn jr_backwards() {
    // NOP; JR -3 loops back to the NOP.
    let (mut cpu, mut mmap) = boot_with(&[0x00, 0x18, 0xFD, 0x00]);

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(mmap.regs().pc(), Word::new(0xC000));
    assert_eq!(mmap.regs().ir(), Byte::new(0x00));
}

#[test]
fn jp_absolute_lands_with_ir_loaded() {
    let (mut cpu, mut mmap) = boot_with(&[0xC3, 0x00, 0xC2]);
    assert!(mmap.write_byte_at(0xC200, Byte::new(0x04)).is_success()); // inc b

    assert_eq!(cpu.step(&mut mmap), 16);
    assert_eq!(mmap.regs().pc(), Word::new(0xC200));
    assert_eq!(mmap.regs().ir(), Byte::new(0x04));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().b(), Byte::new(0x01));
}

#[test]
fn jp_hl() {
    let (mut cpu, mut mmap) = boot_with(&[0xE9]);
    mmap.regs_mut().set_hl(Word::new(0xC300));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().pc(), Word::new(0xC300));
}

#[test]
fn call_and_ret_round_trip() {
    let (mut cpu, mut mmap) = boot_with(&[0xCD, 0x00, 0xC1, 0x00]);
    assert!(mmap.write_byte_at(0xC100, Byte::new(0xC9)).is_success()); // ret
    mmap.regs_mut().set_sp(Word::new(0xD000));

    let ticks = cpu.step(&mut mmap);
    assert_eq!(ticks, 24);
    assert_eq!(mmap.regs().pc(), Word::new(0xC100));
    assert_eq!(mmap.regs().sp(), Word::new(0xCFFE));
    // Return address 0xC003, pushed high byte first.
    assert_eq!(*mmap.read_byte_at(0xCFFF).value(), Byte::new(0xC0));
    assert_eq!(*mmap.read_byte_at(0xCFFE).value(), Byte::new(0x03));

    let ticks = cpu.step(&mut mmap);
    assert_eq!(ticks, 16);
    assert_eq!(mmap.regs().pc(), Word::new(0xC003));
    assert_eq!(mmap.regs().sp(), Word::new(0xD000));
    assert_eq!(mmap.regs().ir(), Byte::new(0x00));
}

#[test]
fn conditional_call_untaken_skips_the_push() {
    let (mut cpu, mut mmap) = boot_with(&[0xC4, 0x00, 0xC1, 0x00]); // call nz
    mmap.regs_mut().set_flag(Flag::Z, true);
    mmap.regs_mut().set_sp(Word::new(0xD000));

    assert_eq!(cpu.step(&mut mmap), 24);
    assert_eq!(mmap.regs().pc(), Word::new(0xC003));
    assert_eq!(mmap.regs().sp(), Word::new(0xD000));
}

#[test]
fn reti_sets_ime() {
    let (mut cpu, mut mmap) = boot_with(&[0xF3, 0xD9, 0x00]); // di; reti
    mmap.regs_mut().set_sp(Word::new(0xCFFE));
    assert!(mmap.write_byte_at(0xCFFE, Byte::new(0x00)).is_success());
    assert!(mmap.write_byte_at(0xCFFF, Byte::new(0xC3)).is_success()); // -> 0xC300
    assert!(mmap.write_byte_at(0xC300, Byte::new(0x00)).is_success());

    assert_eq!(cpu.step(&mut mmap), 4);
    assert!(!mmap.regs().ime());

    assert_eq!(cpu.step(&mut mmap), 16);
    assert!(mmap.regs().ime());
    assert_eq!(mmap.regs().pc(), Word::new(0xC300));
}

#[test]
fn rst_jumps_to_its_vector() {
    let (mut cpu, mut mmap) = boot_with(&[0xCF, 0x00]); // rst $08
    mmap.regs_mut().set_sp(Word::new(0xD000));

    let ticks = cpu.step(&mut mmap);

    assert_eq!(ticks, 16);
    assert_eq!(mmap.regs().pc(), Word::new(0x0008));
    // Return address 0xC001 on the stack.
    assert_eq!(*mmap.read_byte_at(0xCFFF).value(), Byte::new(0xC0));
    assert_eq!(*mmap.read_byte_at(0xCFFE).value(), Byte::new(0x01));
}

#[test]
fn push_pop_round_trip_masks_af() {
    // PUSH BC; POP AF
    let (mut cpu, mut mmap) = boot_with(&[0xC5, 0xF1, 0x00]);
    mmap.regs_mut().set_bc(Word::new(0x12FF));
    mmap.regs_mut().set_sp(Word::new(0xD000));

    assert_eq!(cpu.step(&mut mmap), 16);
    assert_eq!(mmap.regs().sp(), Word::new(0xCFFE));

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(mmap.regs().sp(), Word::new(0xD000));
    // The flag low nibble is hardwired to zero.
    assert_eq!(mmap.regs().af(), Word::new(0x12F0));
    assert_eq!(mmap.regs().f(), Nibble::new(0xF));
}

#[test]
fn inc_dec_flag_behaviour() {
    // INC A across the half-carry boundary; DEC B down to zero.
    let (mut cpu, mut mmap) = boot_with(&[0x3C, 0x05, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x0F));
    mmap.regs_mut().set_b(Byte::new(0x01));
    mmap.regs_mut().set_flag(Flag::C, true);

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().a(), Byte::new(0x10));
    // C survives INC.
    assert_eq!(flags(&mmap), (false, false, true, true));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().b(), Byte::new(0x00));
    assert_eq!(flags(&mmap), (true, true, false, true));
}

#[test]
fn inc_hl_indirect_read_modify_write() {
    let (mut cpu, mut mmap) = boot_with(&[0x34, 0x00]);
    mmap.regs_mut().set_hl(Word::new(0xC200));
    assert!(mmap.write_byte_at(0xC200, Byte::new(0xFF)).is_success());

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(*mmap.read_byte_at(0xC200).value(), Byte::new(0x00));
    assert_eq!(mmap.regs().flag(Flag::Z), true);
    assert_eq!(mmap.regs().flag(Flag::H), true);
}

#[test]
fn add_hl_and_signed_sp_adds() {
    // ADD HL, BC; LD HL, SP+e8; ADD SP, e8
    let (mut cpu, mut mmap) = boot_with(&[0x09, 0xF8, 0x01, 0xE8, 0xFF, 0x00]);
    mmap.regs_mut().set_hl(Word::new(0x0FFF));
    mmap.regs_mut().set_bc(Word::new(0x0001));
    mmap.regs_mut().set_sp(Word::new(0xC0FF));

    assert_eq!(cpu.step(&mut mmap), 8);
    assert_eq!(mmap.regs().hl(), Word::new(0x1000));
    assert!(mmap.regs().flag(Flag::H));
    assert!(!mmap.regs().flag(Flag::C));

    assert_eq!(cpu.step(&mut mmap), 12);
    assert_eq!(mmap.regs().hl(), Word::new(0xC100));
    // H and C come from the low byte of the signed add.
    assert!(mmap.regs().flag(Flag::H));
    assert!(mmap.regs().flag(Flag::C));

    assert_eq!(cpu.step(&mut mmap), 16);
    assert_eq!(mmap.regs().sp(), Word::new(0xC0FE));
}

#[test]
fn alu_sub_and_compare() {
    // SUB A, B; CP A, d8
    let (mut cpu, mut mmap) = boot_with(&[0x90, 0xFE, 0x10, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x10));
    mmap.regs_mut().set_b(Byte::new(0x20));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().a(), Byte::new(0xF0));
    assert_eq!(flags(&mmap), (false, true, false, true));

    assert_eq!(cpu.step(&mut mmap), 8);
    // CP leaves A alone.
    assert_eq!(mmap.regs().a(), Byte::new(0xF0));
    assert_eq!(flags(&mmap), (false, true, false, false));
}

#[test]
fn daa_adjusts_bcd_addition() {
    // A = 0x45 + 0x38 = 0x7D; DAA corrects to 0x83.
    let (mut cpu, mut mmap) = boot_with(&[0x80, 0x27, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x45));
    mmap.regs_mut().set_b(Byte::new(0x38));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().a(), Byte::new(0x7D));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().a(), Byte::new(0x83));
    assert!(!mmap.regs().flag(Flag::C));
}

#[test]
fn rotates_on_the_accumulator() {
    // RLCA; RRA
    let (mut cpu, mut mmap) = boot_with(&[0x07, 0x1F, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x85));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().a(), Byte::new(0x0B));
    assert!(mmap.regs().flag(Flag::C));
    assert!(!mmap.regs().flag(Flag::Z));

    // RRA shifts the carry into bit 7.
    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().a(), Byte::new(0x85));
    assert!(mmap.regs().flag(Flag::C));
}

#[test]
fn cb_prefixed_operations() {
    // SWAP A; BIT 7, H; RES 0, [HL]
    let (mut cpu, mut mmap) = boot_with(&[0xCB, 0x37, 0xCB, 0x7C, 0xCB, 0x86, 0x00]);
    mmap.regs_mut().set_a(Byte::new(0x5A));
    mmap.regs_mut().set_h(Byte::new(0x80));

    assert_eq!(cpu.step(&mut mmap), 8);
    assert_eq!(mmap.regs().a(), Byte::new(0xA5));
    assert_eq!(mmap.regs().pc(), Word::new(0xC002));

    assert_eq!(cpu.step(&mut mmap), 8);
    assert!(!mmap.regs().flag(Flag::Z));
    assert!(mmap.regs().flag(Flag::H));

    // H=0x80 means HL points at VRAM; use WRAM instead for the memory
    // form.
    mmap.regs_mut().set_hl(Word::new(0xC200));
    assert!(mmap.write_byte_at(0xC200, Byte::new(0xFF)).is_success());

    assert_eq!(cpu.step(&mut mmap), 16);
    assert_eq!(*mmap.read_byte_at(0xC200).value(), Byte::new(0xFE));
    assert_eq!(mmap.regs().pc(), Word::new(0xC006));
}

#[test]
fn halt_latches_and_idles() {
    let (mut cpu, mut mmap) = boot_with(&[0x76, 0x00]);

    assert_eq!(cpu.step(&mut mmap), 4);
    assert!(mmap.regs().halted());
    assert_eq!(mmap.regs().pc(), Word::new(0xC001));

    // Halted CPU idles without touching state.
    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().pc(), Word::new(0xC001));
}

#[test]
fn di_ei_toggle_ime() {
    let (mut cpu, mut mmap) = boot_with(&[0xF3, 0xFB, 0x00]);
    assert!(mmap.regs().ime());

    assert_eq!(cpu.step(&mut mmap), 4);
    assert!(!mmap.regs().ime());

    assert_eq!(cpu.step(&mut mmap), 4);
    assert!(mmap.regs().ime());
}

#[test]
fn unimplemented_opcode_halts_and_faults() {
    let (mut cpu, mut mmap) = boot_with(&[0xD3, 0x00]);

    assert_eq!(cpu.step(&mut mmap), 0);
    assert!(mmap.regs().halted());
}

#[test]
fn fetch_execute_overlap_invariant() {
    // After every step, IR holds the opcode at the new PC.
    let (mut cpu, mut mmap) = boot_with(&[
        0x01, 0x00, 0xC1, // ld bc, 0xC100
        0x03, // inc bc
        0xAF, // xor a, a
        0x18, 0x00, // jr +0
        0x00,
    ]);

    for _ in 0..5 {
        let ticks = cpu.step(&mut mmap);
        assert!(ticks >= 4);
        let pc = mmap.regs().pc().get();
        assert_eq!(
            mmap.regs().ir(),
            *mmap.read_byte_at(pc).value(),
            "IR must mirror mem[PC] at 0x{pc:04X}"
        );
    }
}

#[test]
fn ld_a16_round_trip() {
    // LD [a16], A; XOR A, A; LD A, [a16]
    let (mut cpu, mut mmap) = boot_with(&[
        0xEA, 0x00, 0xC2, // ld [0xC200], a
        0xAF, // xor a, a
        0xFA, 0x00, 0xC2, // ld a, [0xC200]
        0x00,
    ]);
    mmap.regs_mut().set_a(Byte::new(0x77));

    assert_eq!(cpu.step(&mut mmap), 16);
    assert_eq!(*mmap.read_byte_at(0xC200).value(), Byte::new(0x77));

    assert_eq!(cpu.step(&mut mmap), 4);
    assert_eq!(mmap.regs().a(), Byte::new(0x00));

    assert_eq!(cpu.step(&mut mmap), 16);
    assert_eq!(mmap.regs().a(), Byte::new(0x77));
    assert_eq!(mmap.regs().pc(), Word::new(0xC008));
}
