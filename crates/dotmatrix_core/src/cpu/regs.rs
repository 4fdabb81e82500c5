use dotmatrix_common::{Block, Byte, Nibble, Word};

/// Names the decoder and bus use to address architectural state.
///
/// The 8-bit set is {A, B, C, D, E, H, L, IR, IE, W, Z}; the 16-bit set is
/// {AF, BC, DE, HL, PC, SP, WZ}. F is the 4-bit flag nibble and is only
/// reachable through the dedicated flag accessors; byte-indexed access to it
/// reports an invalid width.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub enum RegisterName {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
    IR,
    IE,
    W,
    Z,
    AF,
    BC,
    DE,
    HL,
    PC,
    SP,
    WZ,
}

impl RegisterName {
    /// True for the 16-bit names (pairs and pointer registers).
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            RegisterName::AF
                | RegisterName::BC
                | RegisterName::DE
                | RegisterName::HL
                | RegisterName::PC
                | RegisterName::SP
                | RegisterName::WZ
        )
    }

    /// Lower-case assembler spelling, used to build mnemonics.
    pub fn spelling(self) -> &'static str {
        match self {
            RegisterName::A => "a",
            RegisterName::F => "f",
            RegisterName::B => "b",
            RegisterName::C => "c",
            RegisterName::D => "d",
            RegisterName::E => "e",
            RegisterName::H => "h",
            RegisterName::L => "l",
            RegisterName::IR => "ir",
            RegisterName::IE => "ie",
            RegisterName::W => "w",
            RegisterName::Z => "z",
            RegisterName::AF => "af",
            RegisterName::BC => "bc",
            RegisterName::DE => "de",
            RegisterName::HL => "hl",
            RegisterName::PC => "pc",
            RegisterName::SP => "sp",
            RegisterName::WZ => "wz",
        }
    }
}

/// Flag bits in the F nibble.
///
/// Layout (bit index in the nibble, from MSB to LSB):
/// - bit 3: Z (zero)
/// - bit 2: N (subtract)
/// - bit 1: H (half carry)
/// - bit 0: C (carry)
///
/// The architectural F byte is this nibble in bits 7-4 with bits 3-0
/// hardwired to zero.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 3,
    N = 2,
    H = 1,
    C = 0,
}

/// Architectural state of the LR35902.
///
/// Every register is `Block`-backed so the storage granularity matches the
/// hardware view: F is a bare nibble, the general-purpose pairs are two
/// bytes addressed big-endian, PC/SP are single words. WZ is the internal
/// scratch pair that stages multi-byte operands between machine cycles; it
/// is not architecturally visible but is addressable for the micro-ops.
#[derive(Clone, Default)]
pub struct RegisterFile {
    ir: Block<Byte, 1>,
    ie: Block<Byte, 1>,
    a: Block<Byte, 1>,
    f: Block<Nibble, 1>,
    bc: Block<Byte, 2>,
    de: Block<Byte, 2>,
    hl: Block<Byte, 2>,
    wz: Block<Byte, 2>,
    pc: Block<Word, 1>,
    sp: Block<Word, 1>,
    ime: bool,
    halted: bool,
    stopped: bool,
}

impl RegisterFile {
    pub fn new() -> Self {
        let mut regs = Self::default();
        regs.reset();
        regs
    }

    /// Return every register to zero and re-enable interrupts.
    ///
    /// Post-boot register values are applied by the boot-ROM collaborator,
    /// not here.
    pub fn reset(&mut self) {
        self.ir.reset();
        self.ie.reset();
        self.a.reset();
        self.f.reset();
        self.bc.reset();
        self.de.reset();
        self.hl.reset();
        self.wz.reset();
        self.pc.reset();
        self.sp.reset();
        self.ime = true;
        self.halted = false;
        self.stopped = false;
    }

    // 8-bit registers.

    #[inline]
    pub fn a(&self) -> Byte {
        self.a.byte(0)
    }

    #[inline]
    pub fn set_a(&mut self, value: Byte) {
        self.a.set_byte(0, value);
    }

    #[inline]
    pub fn b(&self) -> Byte {
        self.bc.byte(0)
    }

    #[inline]
    pub fn set_b(&mut self, value: Byte) {
        self.bc.set_byte(0, value);
    }

    #[inline]
    pub fn c(&self) -> Byte {
        self.bc.byte(1)
    }

    #[inline]
    pub fn set_c(&mut self, value: Byte) {
        self.bc.set_byte(1, value);
    }

    #[inline]
    pub fn d(&self) -> Byte {
        self.de.byte(0)
    }

    #[inline]
    pub fn set_d(&mut self, value: Byte) {
        self.de.set_byte(0, value);
    }

    #[inline]
    pub fn e(&self) -> Byte {
        self.de.byte(1)
    }

    #[inline]
    pub fn set_e(&mut self, value: Byte) {
        self.de.set_byte(1, value);
    }

    #[inline]
    pub fn h(&self) -> Byte {
        self.hl.byte(0)
    }

    #[inline]
    pub fn set_h(&mut self, value: Byte) {
        self.hl.set_byte(0, value);
    }

    #[inline]
    pub fn l(&self) -> Byte {
        self.hl.byte(1)
    }

    #[inline]
    pub fn set_l(&mut self, value: Byte) {
        self.hl.set_byte(1, value);
    }

    #[inline]
    pub fn ir(&self) -> Byte {
        self.ir.byte(0)
    }

    #[inline]
    pub fn set_ir(&mut self, value: Byte) {
        self.ir.set_byte(0, value);
    }

    #[inline]
    pub fn ie(&self) -> Byte {
        self.ie.byte(0)
    }

    #[inline]
    pub fn set_ie(&mut self, value: Byte) {
        self.ie.set_byte(0, value);
    }

    #[inline]
    pub fn w(&self) -> Byte {
        self.wz.byte(0)
    }

    #[inline]
    pub fn set_w(&mut self, value: Byte) {
        self.wz.set_byte(0, value);
    }

    #[inline]
    pub fn z(&self) -> Byte {
        self.wz.byte(1)
    }

    #[inline]
    pub fn set_z(&mut self, value: Byte) {
        self.wz.set_byte(1, value);
    }

    // Flag nibble.

    #[inline]
    pub fn f(&self) -> Nibble {
        self.f.nibble(0)
    }

    #[inline]
    pub fn set_f(&mut self, value: Nibble) {
        self.f.set_nibble(0, value);
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.f().bit(flag as u8)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let mut f = self.f();
        f.set_bit(flag as u8, value);
        self.set_f(f);
    }

    // 16-bit views.

    /// AF reads as `(A << 8) | (F << 4)`; the low four bits are always zero.
    #[inline]
    pub fn af(&self) -> Word {
        Word::from_bytes(self.a(), Byte::from_nibbles(self.f(), Nibble::new(0)))
    }

    /// Writing AF masks the low nibble of F to zero.
    #[inline]
    pub fn set_af(&mut self, value: Word) {
        self.set_a(value.high_byte());
        self.set_f(value.low_byte().high_nibble());
    }

    #[inline]
    pub fn bc(&self) -> Word {
        self.bc.word(0)
    }

    #[inline]
    pub fn set_bc(&mut self, value: Word) {
        self.bc.set_word(0, value);
    }

    #[inline]
    pub fn de(&self) -> Word {
        self.de.word(0)
    }

    #[inline]
    pub fn set_de(&mut self, value: Word) {
        self.de.set_word(0, value);
    }

    #[inline]
    pub fn hl(&self) -> Word {
        self.hl.word(0)
    }

    #[inline]
    pub fn set_hl(&mut self, value: Word) {
        self.hl.set_word(0, value);
    }

    #[inline]
    pub fn wz(&self) -> Word {
        self.wz.word(0)
    }

    #[inline]
    pub fn set_wz(&mut self, value: Word) {
        self.wz.set_word(0, value);
    }

    #[inline]
    pub fn pc(&self) -> Word {
        self.pc.word(0)
    }

    #[inline]
    pub fn set_pc(&mut self, value: Word) {
        self.pc.set_word(0, value);
    }

    #[inline]
    pub fn sp(&self) -> Word {
        self.sp.word(0)
    }

    #[inline]
    pub fn set_sp(&mut self, value: Word) {
        self.sp.set_word(0, value);
    }

    // Interrupt master enable and CPU control latches.

    #[inline]
    pub fn ime(&self) -> bool {
        self.ime
    }

    #[inline]
    pub fn enable_ime(&mut self) {
        self.ime = true;
    }

    #[inline]
    pub fn disable_ime(&mut self) {
        self.ime = false;
    }

    #[inline]
    pub fn halted(&self) -> bool {
        self.halted
    }

    #[inline]
    pub fn set_halted(&mut self, value: bool) {
        self.halted = value;
    }

    #[inline]
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn set_stopped(&mut self, value: bool) {
        self.stopped = value;
    }
}
