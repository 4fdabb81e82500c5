//! Single-tick micro-operations.
//!
//! Each variant performs one machine cycle's worth of work against the bus:
//! at most one memory transaction plus register mutations that do not touch
//! the bus. Multi-byte operands stage through the internal WZ pair, one
//! transaction per tick, exactly as the hardware does. Bus diagnostics are
//! funnelled into the wider instruction-level kind set via the outcome
//! upcast; the first failing op aborts its instruction.

use dotmatrix_common::{Byte, Kind, Nibble, Outcome, Word};

use crate::cpu::{Flag, RegisterFile, RegisterName};
use crate::memory::{AccessKind, MemoryMap};

/// Instruction-level diagnostic kinds: every bus kind plus the decoder's
/// unimplemented-opcode fault.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum StepKind {
    #[error("success")]
    Success,
    #[error("bank not in valid range")]
    InvalidBank,
    #[error("address not in valid range")]
    InvalidAddress,
    #[error("accessing prohibited address")]
    ProhibitedAddress,
    #[error("accessing read-only prohibited address")]
    ReadOnlyProhibited,
    #[error("access crosses region boundary")]
    CrossesRegionBoundary,
    #[error("register width does not match access width")]
    RegisterInvalidWidth,
    #[error("register overflowed")]
    RegisterOverflow,
    #[error("opcode not implemented")]
    InvalidOpcode,
}

impl Kind for StepKind {
    const DEFAULT: Self = StepKind::Success;

    fn description(&self) -> &'static str {
        match self {
            StepKind::Success => "success",
            StepKind::InvalidBank => "bank not in valid range",
            StepKind::InvalidAddress => "address not in valid range",
            StepKind::ProhibitedAddress => "accessing prohibited address",
            StepKind::ReadOnlyProhibited => "accessing read-only prohibited address",
            StepKind::CrossesRegionBoundary => "access crosses region boundary",
            StepKind::RegisterInvalidWidth => "register width does not match access width",
            StepKind::RegisterOverflow => "register overflowed",
            StepKind::InvalidOpcode => "opcode not implemented",
        }
    }
}

impl From<AccessKind> for StepKind {
    fn from(kind: AccessKind) -> Self {
        match kind {
            AccessKind::Success => StepKind::Success,
            AccessKind::InvalidBank => StepKind::InvalidBank,
            AccessKind::InvalidAddress => StepKind::InvalidAddress,
            AccessKind::ProhibitedAddress => StepKind::ProhibitedAddress,
            AccessKind::ReadOnlyProhibited => StepKind::ReadOnlyProhibited,
            AccessKind::CrossesRegionBoundary => StepKind::CrossesRegionBoundary,
            AccessKind::RegisterInvalidWidth => StepKind::RegisterInvalidWidth,
            AccessKind::RegisterOverflow => StepKind::RegisterOverflow,
        }
    }
}

pub type StepOutcome = Outcome<(), StepKind>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepMode {
    None,
    Increment,
    Decrement,
}

/// Branch condition evaluated against the flag nibble.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cond {
    Always,
    NZ,
    Z,
    NC,
    C,
}

impl Cond {
    pub fn spelling(self) -> &'static str {
        match self {
            Cond::Always => "",
            Cond::NZ => "nz",
            Cond::Z => "z",
            Cond::NC => "nc",
            Cond::C => "c",
        }
    }

    fn met(self, regs: &RegisterFile) -> bool {
        match self {
            Cond::Always => true,
            Cond::NZ => !regs.flag(Flag::Z),
            Cond::Z => regs.flag(Flag::Z),
            Cond::NC => !regs.flag(Flag::C),
            Cond::C => regs.flag(Flag::C),
        }
    }
}

/// 8-bit ALU operation against the accumulator.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub fn spelling(self) -> &'static str {
        match self {
            AluOp::Add => "add",
            AluOp::Adc => "adc",
            AluOp::Sub => "sub",
            AluOp::Sbc => "sbc",
            AluOp::And => "and",
            AluOp::Xor => "xor",
            AluOp::Or => "or",
            AluOp::Cp => "cp",
        }
    }
}

/// Rotate / shift / swap kinds shared by the accumulator rotates and the
/// CB-prefixed operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RotateOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl RotateOp {
    pub fn spelling(self) -> &'static str {
        match self {
            RotateOp::Rlc => "rlc",
            RotateOp::Rrc => "rrc",
            RotateOp::Rl => "rl",
            RotateOp::Rr => "rr",
            RotateOp::Sla => "sla",
            RotateOp::Sra => "sra",
            RotateOp::Swap => "swap",
            RotateOp::Srl => "srl",
        }
    }
}

/// 8-bit operand: a named register, or the Z half of the scratch pair
/// (where `[HL]` and immediate operands are staged by an earlier tick).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operand8 {
    Reg(RegisterName),
    TempLo,
}

/// One machine cycle of work.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MicroOp {
    Nop,
    /// `PC <- PC + 1`, reporting `RegisterOverflow` on wrap.
    IncrementPc,
    /// `IR <- mem[PC]`: the overlapped fetch of the next opcode.
    LoadIrPc,
    /// `Z <- mem[PC]`
    LoadTempLoPc,
    /// `W <- mem[PC]`
    LoadTempHiPc,
    /// `Z <- mem[WZ]`
    LoadTempLoTemp,
    /// `Z <- mem[rr]`
    LoadTempLoIndirect(RegisterName),
    /// `mem[rr] <- Z`
    StoreTempLoIndirect(RegisterName),
    /// `mem[WZ] <- r`
    StoreTempIndirectByte(RegisterName),
    /// `mem[WZ] <- rr`, little-endian.
    StoreTempIndirectWord(RegisterName),
    /// `r <- Z`
    CopyTempLoToReg(RegisterName),
    /// `Z <- r`
    CopyRegToTempLo(RegisterName),
    /// `rr <- WZ`
    CopyTempToReg16(RegisterName),
    /// `r <- r'`
    CopyReg8 {
        dst: RegisterName,
        src: RegisterName,
    },
    /// `rr <- rr'`
    CopyReg16 {
        dst: RegisterName,
        src: RegisterName,
    },
    /// `Z <- imm`
    SetTempLo(Byte),
    /// `W <- imm`
    SetTempHi(Byte),
    /// `rr <- rr ± 1`
    StepRegister(RegisterName, StepMode),

    // Control flow. The conditional ops are no-ops when the condition does
    // not hold, so taken and untaken paths share one op sequence.
    /// `PC <- WZ` when the condition holds.
    CopyTempToPcIf(Cond),
    /// `PC <- PC + sext(Z)` when the condition holds.
    JumpRelativeIf(Cond),
    /// `SP <- SP - 1; mem[SP] <- PC.high` when the condition holds.
    PushPcHighIf(Cond),
    /// `SP <- SP - 1; mem[SP] <- PC.low` when the condition holds.
    PushPcLowIf(Cond),
    /// `Z <- mem[SP]; SP <- SP + 1` when the condition holds.
    PopTempLoIf(Cond),
    /// `W <- mem[SP]; SP <- SP + 1` when the condition holds.
    PopTempHiIf(Cond),
    /// `SP <- SP - 1; mem[SP] <- rr.high`
    PushRegHigh(RegisterName),
    /// `SP <- SP - 1; mem[SP] <- rr.low`
    PushRegLow(RegisterName),

    // ALU.
    Alu8(AluOp, Operand8),
    IncReg8(RegisterName),
    DecReg8(RegisterName),
    IncTempLo,
    DecTempLo,
    /// `HL <- HL + rr` (Z unaffected, N cleared, H/C from the 16-bit add).
    AddHl(RegisterName),
    /// `dst <- SP + sext(Z)` with the signed-offset flag rules; `dst` is SP
    /// or HL.
    AddSpSigned(RegisterName),
    /// Accumulator rotate (RLCA family): Z is always cleared.
    RotateA(RotateOp),
    Daa,
    Cpl,
    Scf,
    Ccf,

    EnableIme,
    DisableIme,
    Halt,
    Stop,

    // CB-prefixed bit operations.
    CbRotate(RotateOp, Operand8),
    CbBit(u8, Operand8),
    CbRes(u8, Operand8),
    CbSet(u8, Operand8),
}

#[inline]
fn done() -> StepOutcome {
    Outcome::success(())
}

/// Funnel a bus outcome into the instruction-level kind set, dropping the
/// payload but keeping kind and severity.
#[inline]
fn via<T>(outcome: Outcome<T, AccessKind>) -> StepOutcome {
    outcome.replace(()).widen()
}

impl MicroOp {
    pub fn execute(&self, mmap: &mut MemoryMap) -> StepOutcome {
        match *self {
            MicroOp::Nop => done(),
            MicroOp::IncrementPc => via(mmap.increment_pc()),
            MicroOp::LoadIrPc => {
                let pc = mmap.regs().pc().get();
                let read = mmap.read_byte_at(pc);
                if read.is_success() {
                    let value = *read.value();
                    mmap.regs_mut().set_ir(value);
                }
                via(read)
            }
            MicroOp::LoadTempLoPc => {
                let pc = mmap.regs().pc().get();
                let read = mmap.read_byte_at(pc);
                if read.is_success() {
                    let value = *read.value();
                    mmap.regs_mut().set_z(value);
                }
                via(read)
            }
            MicroOp::LoadTempHiPc => {
                let pc = mmap.regs().pc().get();
                let read = mmap.read_byte_at(pc);
                if read.is_success() {
                    let value = *read.value();
                    mmap.regs_mut().set_w(value);
                }
                via(read)
            }
            MicroOp::LoadTempLoTemp => {
                let wz = mmap.regs().wz().get();
                let read = mmap.read_byte_at(wz);
                if read.is_success() {
                    let value = *read.value();
                    mmap.regs_mut().set_z(value);
                }
                via(read)
            }
            MicroOp::LoadTempLoIndirect(reg) => {
                let addr = mmap.read_word_reg(reg);
                if addr.is_failure() {
                    return via(addr);
                }
                let read = mmap.read_byte_at(addr.value().get());
                if read.is_success() {
                    let value = *read.value();
                    mmap.regs_mut().set_z(value);
                }
                via(read)
            }
            MicroOp::StoreTempLoIndirect(reg) => {
                let addr = mmap.read_word_reg(reg);
                if addr.is_failure() {
                    return via(addr);
                }
                let value = mmap.regs().z();
                via(mmap.write_byte_at(addr.value().get(), value))
            }
            MicroOp::StoreTempIndirectByte(reg) => {
                let value = mmap.read_byte_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                let wz = mmap.regs().wz().get();
                via(mmap.write_byte_at(wz, *value.value()))
            }
            MicroOp::StoreTempIndirectWord(reg) => {
                let value = mmap.read_word_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                let wz = mmap.regs().wz().get();
                via(mmap.write_word_le_at(wz, *value.value()))
            }
            MicroOp::CopyTempLoToReg(reg) => {
                let value = mmap.regs().z();
                via(mmap.write_byte_reg(reg, value))
            }
            MicroOp::CopyRegToTempLo(reg) => {
                let value = mmap.read_byte_reg(reg);
                if value.is_success() {
                    let byte = *value.value();
                    mmap.regs_mut().set_z(byte);
                }
                via(value)
            }
            MicroOp::CopyTempToReg16(reg) => {
                let wz = mmap.regs().wz();
                via(mmap.write_word_reg(reg, wz))
            }
            MicroOp::CopyReg8 { dst, src } => {
                let value = mmap.read_byte_reg(src);
                if value.is_failure() {
                    return via(value);
                }
                via(mmap.write_byte_reg(dst, *value.value()))
            }
            MicroOp::CopyReg16 { dst, src } => {
                let value = mmap.read_word_reg(src);
                if value.is_failure() {
                    return via(value);
                }
                via(mmap.write_word_reg(dst, *value.value()))
            }
            MicroOp::SetTempLo(value) => {
                mmap.regs_mut().set_z(value);
                done()
            }
            MicroOp::SetTempHi(value) => {
                mmap.regs_mut().set_w(value);
                done()
            }
            MicroOp::StepRegister(reg, mode) => {
                if mode == StepMode::None {
                    return done();
                }
                let value = mmap.read_word_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                let stepped = match mode {
                    StepMode::Increment => value.value().wrapping_add(1),
                    StepMode::Decrement => value.value().wrapping_sub(1),
                    StepMode::None => unreachable!(),
                };
                via(mmap.write_word_reg(reg, stepped))
            }

            MicroOp::CopyTempToPcIf(cond) => {
                if cond.met(mmap.regs()) {
                    let wz = mmap.regs().wz();
                    mmap.regs_mut().set_pc(wz);
                }
                done()
            }
            MicroOp::JumpRelativeIf(cond) => {
                if cond.met(mmap.regs()) {
                    let offset = mmap.regs().z().get() as i8;
                    let pc = mmap.regs().pc().get();
                    let target = pc.wrapping_add(offset as i16 as u16);
                    mmap.regs_mut().set_pc(Word::new(target));
                }
                done()
            }
            MicroOp::PushPcHighIf(cond) => {
                if !cond.met(mmap.regs()) {
                    return done();
                }
                let value = mmap.regs().pc().high_byte();
                push_byte(mmap, value)
            }
            MicroOp::PushPcLowIf(cond) => {
                if !cond.met(mmap.regs()) {
                    return done();
                }
                let value = mmap.regs().pc().low_byte();
                push_byte(mmap, value)
            }
            MicroOp::PopTempLoIf(cond) => {
                if !cond.met(mmap.regs()) {
                    return done();
                }
                let sp = mmap.regs().sp();
                let read = mmap.read_byte_at(sp.get());
                if read.is_success() {
                    let value = *read.value();
                    let regs = mmap.regs_mut();
                    regs.set_z(value);
                    regs.set_sp(sp.wrapping_add(1));
                }
                via(read)
            }
            MicroOp::PopTempHiIf(cond) => {
                if !cond.met(mmap.regs()) {
                    return done();
                }
                let sp = mmap.regs().sp();
                let read = mmap.read_byte_at(sp.get());
                if read.is_success() {
                    let value = *read.value();
                    let regs = mmap.regs_mut();
                    regs.set_w(value);
                    regs.set_sp(sp.wrapping_add(1));
                }
                via(read)
            }
            MicroOp::PushRegHigh(reg) => {
                let value = mmap.read_word_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                let byte = value.value().high_byte();
                push_byte(mmap, byte)
            }
            MicroOp::PushRegLow(reg) => {
                let value = mmap.read_word_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                let byte = value.value().low_byte();
                push_byte(mmap, byte)
            }

            MicroOp::Alu8(op, operand) => {
                let value = match operand {
                    Operand8::Reg(reg) => {
                        let read = mmap.read_byte_reg(reg);
                        if read.is_failure() {
                            return via(read);
                        }
                        read.value().get()
                    }
                    Operand8::TempLo => mmap.regs().z().get(),
                };
                let regs = mmap.regs_mut();
                match op {
                    AluOp::Add => alu_add(regs, value, false),
                    AluOp::Adc => alu_add(regs, value, true),
                    AluOp::Sub => alu_sub(regs, value, false),
                    AluOp::Sbc => alu_sub(regs, value, true),
                    AluOp::And => alu_and(regs, value),
                    AluOp::Xor => alu_xor(regs, value),
                    AluOp::Or => alu_or(regs, value),
                    AluOp::Cp => alu_cp(regs, value),
                }
                done()
            }
            MicroOp::IncReg8(reg) => {
                let value = mmap.read_byte_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                let result = alu_inc8(mmap.regs_mut(), value.value().get());
                via(mmap.write_byte_reg(reg, Byte::new(result)))
            }
            MicroOp::DecReg8(reg) => {
                let value = mmap.read_byte_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                let result = alu_dec8(mmap.regs_mut(), value.value().get());
                via(mmap.write_byte_reg(reg, Byte::new(result)))
            }
            MicroOp::IncTempLo => {
                let value = mmap.regs().z().get();
                let result = alu_inc8(mmap.regs_mut(), value);
                mmap.regs_mut().set_z(Byte::new(result));
                done()
            }
            MicroOp::DecTempLo => {
                let value = mmap.regs().z().get();
                let result = alu_dec8(mmap.regs_mut(), value);
                mmap.regs_mut().set_z(Byte::new(result));
                done()
            }
            MicroOp::AddHl(reg) => {
                let value = mmap.read_word_reg(reg);
                if value.is_failure() {
                    return via(value);
                }
                alu_add16_hl(mmap.regs_mut(), value.value().get());
                done()
            }
            MicroOp::AddSpSigned(dst) => {
                let base = mmap.regs().sp().get();
                let imm = mmap.regs().z().get();
                let result = alu_add16_signed(mmap.regs_mut(), base, imm);
                via(mmap.write_word_reg(dst, Word::new(result)))
            }
            MicroOp::RotateA(op) => {
                rotate_a(mmap.regs_mut(), op);
                done()
            }
            MicroOp::Daa => {
                alu_daa(mmap.regs_mut());
                done()
            }
            MicroOp::Cpl => {
                let regs = mmap.regs_mut();
                let a = regs.a().get();
                regs.set_a(Byte::new(!a));
                regs.set_flag(Flag::N, true);
                regs.set_flag(Flag::H, true);
                done()
            }
            MicroOp::Scf => {
                let regs = mmap.regs_mut();
                regs.set_flag(Flag::N, false);
                regs.set_flag(Flag::H, false);
                regs.set_flag(Flag::C, true);
                done()
            }
            MicroOp::Ccf => {
                let regs = mmap.regs_mut();
                let carry = regs.flag(Flag::C);
                regs.set_flag(Flag::N, false);
                regs.set_flag(Flag::H, false);
                regs.set_flag(Flag::C, !carry);
                done()
            }

            MicroOp::EnableIme => {
                mmap.regs_mut().enable_ime();
                done()
            }
            MicroOp::DisableIme => {
                mmap.regs_mut().disable_ime();
                done()
            }
            MicroOp::Halt => {
                mmap.regs_mut().set_halted(true);
                done()
            }
            MicroOp::Stop => {
                let regs = mmap.regs_mut();
                regs.set_stopped(true);
                regs.set_halted(false);
                done()
            }

            MicroOp::CbRotate(op, operand) => {
                let value = match operand {
                    Operand8::Reg(reg) => {
                        let read = mmap.read_byte_reg(reg);
                        if read.is_failure() {
                            return via(read);
                        }
                        read.value().get()
                    }
                    Operand8::TempLo => mmap.regs().z().get(),
                };
                let result = cb_rotate(mmap.regs_mut(), op, value);
                match operand {
                    Operand8::Reg(reg) => via(mmap.write_byte_reg(reg, Byte::new(result))),
                    Operand8::TempLo => {
                        mmap.regs_mut().set_z(Byte::new(result));
                        done()
                    }
                }
            }
            MicroOp::CbBit(bit, operand) => {
                let value = match operand {
                    Operand8::Reg(reg) => {
                        let read = mmap.read_byte_reg(reg);
                        if read.is_failure() {
                            return via(read);
                        }
                        read.value().get()
                    }
                    Operand8::TempLo => mmap.regs().z().get(),
                };
                let regs = mmap.regs_mut();
                regs.set_flag(Flag::Z, value & (1 << bit) == 0);
                regs.set_flag(Flag::N, false);
                regs.set_flag(Flag::H, true);
                done()
            }
            MicroOp::CbRes(bit, operand) => cb_mask(mmap, operand, |value| value & !(1 << bit)),
            MicroOp::CbSet(bit, operand) => cb_mask(mmap, operand, |value| value | (1 << bit)),
        }
    }
}

/// `SP <- SP - 1; mem[SP] <- value`. Stack traffic goes through the
/// bus-active view like every other CPU access.
fn push_byte(mmap: &mut MemoryMap, value: Byte) -> StepOutcome {
    let sp = mmap.regs().sp().wrapping_sub(1);
    mmap.regs_mut().set_sp(sp);
    via(mmap.write_byte_at(sp.get(), value))
}

fn cb_mask(mmap: &mut MemoryMap, operand: Operand8, f: impl Fn(u8) -> u8) -> StepOutcome {
    match operand {
        Operand8::Reg(reg) => {
            let read = mmap.read_byte_reg(reg);
            if read.is_failure() {
                return via(read);
            }
            via(mmap.write_byte_reg(reg, Byte::new(f(read.value().get()))))
        }
        Operand8::TempLo => {
            let value = mmap.regs().z().get();
            mmap.regs_mut().set_z(Byte::new(f(value)));
            done()
        }
    }
}

fn clear_flags(regs: &mut RegisterFile) {
    regs.set_f(Nibble::new(0));
}

/// Core 8-bit ADD/ADC on A. `use_carry` selects ADC.
fn alu_add(regs: &mut RegisterFile, value: u8, use_carry: bool) {
    let a = regs.a().get();
    let carry_in = if use_carry && regs.flag(Flag::C) { 1u8 } else { 0 };

    let half = (a & 0x0F) + (value & 0x0F) + carry_in;
    let full = a as u16 + value as u16 + carry_in as u16;
    let result = full as u8;

    regs.set_a(Byte::new(result));
    clear_flags(regs);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::H, half & 0x10 != 0);
    regs.set_flag(Flag::C, full > 0xFF);
}

/// Core 8-bit SUB/SBC on A. `use_carry` selects SBC.
fn alu_sub(regs: &mut RegisterFile, value: u8, use_carry: bool) {
    let a = regs.a().get();
    let carry_in = if use_carry && regs.flag(Flag::C) { 1i16 } else { 0 };

    let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
    let full = a as i16 - value as i16 - carry_in;
    let result = full as u8;

    regs.set_a(Byte::new(result));
    clear_flags(regs);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::N, true);
    regs.set_flag(Flag::H, half < 0);
    regs.set_flag(Flag::C, full < 0);
}

fn alu_and(regs: &mut RegisterFile, value: u8) {
    let result = regs.a().get() & value;
    regs.set_a(Byte::new(result));
    clear_flags(regs);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::H, true);
}

fn alu_or(regs: &mut RegisterFile, value: u8) {
    let result = regs.a().get() | value;
    regs.set_a(Byte::new(result));
    clear_flags(regs);
    regs.set_flag(Flag::Z, result == 0);
}

fn alu_xor(regs: &mut RegisterFile, value: u8) {
    let result = regs.a().get() ^ value;
    regs.set_a(Byte::new(result));
    clear_flags(regs);
    regs.set_flag(Flag::Z, result == 0);
}

/// Compare A with `value`; flags as for SUB, A unchanged.
fn alu_cp(regs: &mut RegisterFile, value: u8) {
    let a = regs.a().get();
    let half = (a & 0x0F) as i16 - (value & 0x0F) as i16;
    let full = a as i16 - value as i16;

    clear_flags(regs);
    regs.set_flag(Flag::Z, full as u8 == 0);
    regs.set_flag(Flag::N, true);
    regs.set_flag(Flag::H, half < 0);
    regs.set_flag(Flag::C, full < 0);
}

/// 8-bit increment. Updates Z, N, H; C unchanged.
fn alu_inc8(regs: &mut RegisterFile, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, (value & 0x0F) + 1 > 0x0F);
    result
}

/// 8-bit decrement. Updates Z, N, H; C unchanged.
fn alu_dec8(regs: &mut RegisterFile, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::N, true);
    regs.set_flag(Flag::H, value & 0x0F == 0);
    result
}

/// `ADD HL, rr`. Z unaffected, N cleared, H/C from the 16-bit addition.
fn alu_add16_hl(regs: &mut RegisterFile, value: u16) {
    let hl = regs.hl().get();
    let result = hl.wrapping_add(value);

    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
    regs.set_flag(Flag::C, hl as u32 + value as u32 > 0xFFFF);
    regs.set_hl(Word::new(result));
}

/// Signed-immediate 16-bit add used by `ADD SP, e8` and `LD HL, SP+e8`.
/// Z and N cleared; H and C computed from the low byte.
fn alu_add16_signed(regs: &mut RegisterFile, base: u16, imm8: u8) -> u16 {
    let offset = imm8 as i8 as i16 as u16;
    regs.set_flag(Flag::Z, false);
    regs.set_flag(Flag::N, false);
    regs.set_flag(Flag::H, (base & 0x000F) + (offset & 0x000F) > 0x000F);
    regs.set_flag(Flag::C, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
    base.wrapping_add(offset)
}

/// Decimal adjust after BCD addition/subtraction. Updates A, Z, H, C; N
/// unchanged.
fn alu_daa(regs: &mut RegisterFile) {
    let mut a = regs.a().get();
    let mut adjust: u8 = if regs.flag(Flag::C) { 0x60 } else { 0x00 };
    if regs.flag(Flag::H) {
        adjust |= 0x06;
    }

    if !regs.flag(Flag::N) {
        if a & 0x0F > 0x09 {
            adjust |= 0x06;
        }
        if a > 0x99 {
            adjust |= 0x60;
        }
        a = a.wrapping_add(adjust);
    } else {
        a = a.wrapping_sub(adjust);
    }

    regs.set_flag(Flag::C, adjust >= 0x60);
    regs.set_flag(Flag::H, false);
    regs.set_flag(Flag::Z, a == 0);
    regs.set_a(Byte::new(a));
}

/// Unprefixed accumulator rotates. Unlike the CB forms, Z is always
/// cleared.
fn rotate_a(regs: &mut RegisterFile, op: RotateOp) {
    let a = regs.a().get();
    let carry_in = regs.flag(Flag::C);
    let (result, carry_out) = match op {
        RotateOp::Rlc => (a.rotate_left(1), a & 0x80 != 0),
        RotateOp::Rrc => (a.rotate_right(1), a & 0x01 != 0),
        RotateOp::Rl => ((a << 1) | carry_in as u8, a & 0x80 != 0),
        RotateOp::Rr => ((a >> 1) | ((carry_in as u8) << 7), a & 0x01 != 0),
        _ => unreachable!("only the four rotate kinds are registered on A"),
    };

    regs.set_a(Byte::new(result));
    clear_flags(regs);
    regs.set_flag(Flag::C, carry_out);
}

/// CB-prefixed rotate/shift/swap. Z reflects the result.
fn cb_rotate(regs: &mut RegisterFile, op: RotateOp, value: u8) -> u8 {
    let carry_in = regs.flag(Flag::C);
    let (result, carry_out) = match op {
        RotateOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        RotateOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        RotateOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
        RotateOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
        RotateOp::Sla => (value << 1, value & 0x80 != 0),
        RotateOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        RotateOp::Swap => (value.rotate_left(4), false),
        RotateOp::Srl => (value >> 1, value & 0x01 != 0),
    };

    clear_flags(regs);
    regs.set_flag(Flag::Z, result == 0);
    regs.set_flag(Flag::C, carry_out);
    result
}
