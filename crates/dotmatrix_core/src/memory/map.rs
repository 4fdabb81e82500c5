use dotmatrix_common::{Block, Byte, Nibble, Outcome, Word};
use typed_builder::TypedBuilder;

use crate::cpu::{RegisterFile, RegisterName};

use super::{
    AccessKind, MemoryAddress, SetupKind, ERAM_BANK_SIZE, HRAM_SIZE, IO_SIZE, IO_SVBK, IO_VBK,
    OAM_SIZE, REGION_SEAMS, ROM_BANK_SIZE, VALID_ERAM_BANK_COUNTS, VALID_ROM_BANK_COUNTS,
    VALID_VRAM_BANK_COUNTS, VALID_WRAM_BANK_COUNTS, VRAM_BANK_SIZE, WRAM_BANK_SIZE,
};

/// Bank configuration for one cartridge/machine combination.
///
/// Counts are validated against the closed sets the cartridge header can
/// declare when the layout is applied via [`MemoryMap::initialize`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, TypedBuilder)]
pub struct BankLayout {
    pub rom_banks: u16,
    pub vram_banks: u16,
    pub eram_banks: u16,
    pub wram_banks: u16,
}

impl BankLayout {
    /// Baseline DMG layout: 32 KiB ROM, single VRAM bank, no cartridge RAM.
    pub const fn dmg() -> Self {
        Self {
            rom_banks: 2,
            vram_banks: 1,
            eram_banks: 0,
            wram_banks: 2,
        }
    }

    /// Derive the layout from a cartridge image header.
    ///
    /// Consumes byte `0x0143` (CGB flag, governs VRAM/WRAM counts), `0x0148`
    /// (ROM size code) and `0x0149` (RAM size code). The payload is only
    /// meaningful when the outcome is successful.
    pub fn from_header(rom: &[u8]) -> Outcome<BankLayout, SetupKind> {
        if rom.len() < 0x150 {
            return Outcome::reject(SetupKind::HeaderTruncated, Self::dmg());
        }

        let rom_banks = match rom[0x148] {
            code @ 0x00..=0x08 => 2u16 << code,
            0x52 => 72,
            0x53 => 80,
            0x54 => 96,
            _ => return Outcome::reject(SetupKind::InvalidRomBankCount, Self::dmg()),
        };

        let eram_banks = match rom[0x149] {
            0x00 => 0,
            // A 2 KiB cartridge RAM still occupies one 8 KiB bank slot.
            0x01 | 0x02 => 1,
            0x03 => 4,
            0x04 => 16,
            0x05 => 8,
            _ => return Outcome::reject(SetupKind::InvalidEramBankCount, Self::dmg()),
        };

        let cgb = matches!(rom[0x143], 0x80 | 0xC0);
        let (vram_banks, wram_banks) = if cgb { (2, 8) } else { (1, 2) };

        Outcome::success(Self {
            rom_banks,
            vram_banks,
            eram_banks,
            wram_banks,
        })
    }
}

/// Where an address landed after region decode.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Rom { bank: usize, offset: usize },
    Vram { bank: usize, offset: usize },
    Eram { bank: usize, offset: usize },
    Wram { bank: usize, offset: usize },
    Oam(usize),
    Io(usize),
    Hram(usize),
    Ie,
}

/// Resolution payload; `Invalid` is the placeholder carried by failed
/// resolutions.
#[derive(Clone, Copy, Debug)]
enum Resolution {
    Slot(Slot),
    Synthetic(Byte),
    Invalid,
}

type ResolveOutcome = Outcome<Resolution, AccessKind>;

/// The memory-mapped 16-bit address space.
///
/// Construction leaves the map unbound; `initialize` (or
/// `initialize_with_rom`) validates a bank layout, allocates the banked
/// regions and marks the map initialized. The map owns the register file so
/// that `0xFFFF` and the register-name-indexed access can resolve through a
/// single mutable aggregate; the host reaches the registers through
/// [`MemoryMap::regs`] / [`MemoryMap::regs_mut`].
pub struct MemoryMap {
    regs: RegisterFile,
    rom: Vec<Block<Byte, ROM_BANK_SIZE>>,
    vram: Vec<Block<Byte, VRAM_BANK_SIZE>>,
    eram: Vec<Block<Byte, ERAM_BANK_SIZE>>,
    wram: Vec<Block<Byte, WRAM_BANK_SIZE>>,
    oam: Block<Byte, OAM_SIZE>,
    io: Block<Byte, IO_SIZE>,
    hram: Block<Byte, HRAM_SIZE>,
    rom_bank_select: u16,
    eram_bank_select: u16,
    layout: Option<BankLayout>,
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMap {
    pub fn new() -> Self {
        Self {
            regs: RegisterFile::new(),
            rom: Vec::new(),
            vram: Vec::new(),
            eram: Vec::new(),
            wram: Vec::new(),
            oam: Block::default(),
            io: Block::default(),
            hram: Block::default(),
            rom_bank_select: 0,
            eram_bank_select: 0,
            layout: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.layout.is_some()
    }

    pub fn layout(&self) -> Option<BankLayout> {
        self.layout
    }

    #[inline]
    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    #[inline]
    pub fn regs_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// Validate a bank layout and bring the map up.
    ///
    /// Double initialization without an intervening [`MemoryMap::reset`] is
    /// rejected.
    pub fn initialize(&mut self, layout: BankLayout) -> Outcome<(), SetupKind> {
        if self.layout.is_some() {
            return Outcome::reject(SetupKind::AlreadyInitialized, ());
        }
        if !VALID_ROM_BANK_COUNTS.contains(&layout.rom_banks) {
            return Outcome::reject(SetupKind::InvalidRomBankCount, ());
        }
        if !VALID_VRAM_BANK_COUNTS.contains(&layout.vram_banks) {
            return Outcome::reject(SetupKind::InvalidVramBankCount, ());
        }
        if !VALID_ERAM_BANK_COUNTS.contains(&layout.eram_banks) {
            return Outcome::reject(SetupKind::InvalidEramBankCount, ());
        }
        if !VALID_WRAM_BANK_COUNTS.contains(&layout.wram_banks) {
            return Outcome::reject(SetupKind::InvalidWramBankCount, ());
        }

        self.rom = vec![Block::default(); layout.rom_banks as usize];
        self.vram = vec![Block::default(); layout.vram_banks as usize];
        self.eram = vec![Block::default(); layout.eram_banks as usize];
        self.wram = vec![Block::default(); layout.wram_banks as usize];
        self.rom_bank_select = 1;
        self.eram_bank_select = 0;
        self.layout = Some(layout);

        log::debug!("memory map initialized: {:?}", layout);
        Outcome::success(())
    }

    /// Initialize from a cartridge image: derive the layout from the header,
    /// then copy bank-aligned 16 KiB chunks into the ROM banks.
    pub fn initialize_with_rom(&mut self, rom: &[u8]) -> Outcome<(), SetupKind> {
        let layout = BankLayout::from_header(rom);
        if layout.is_failure() {
            return layout.replace(());
        }
        let layout = layout.into_value();
        log::debug!("cartridge type 0x{:02X}", rom.get(0x147).copied().unwrap_or(0));

        let up = self.initialize(layout);
        if up.is_failure() {
            return up;
        }

        for (bank, chunk) in rom
            .chunks(ROM_BANK_SIZE)
            .take(layout.rom_banks as usize)
            .enumerate()
        {
            for (offset, &value) in chunk.iter().enumerate() {
                self.rom[bank].set_byte(offset, Byte::new(value));
            }
        }
        Outcome::success(())
    }

    /// Zero every region, reset the register file and clear the initialized
    /// flag so the map can be initialized again.
    pub fn reset(&mut self) {
        for bank in &mut self.rom {
            bank.reset();
        }
        for bank in &mut self.vram {
            bank.reset();
        }
        for bank in &mut self.eram {
            bank.reset();
        }
        for bank in &mut self.wram {
            bank.reset();
        }
        self.oam.reset();
        self.io.reset();
        self.hram.reset();
        self.regs.reset();
        self.rom_bank_select = 0;
        self.eram_bank_select = 0;
        self.layout = None;
    }

    fn bank_counts(&self) -> BankLayout {
        self.layout.unwrap_or(BankLayout {
            rom_banks: 0,
            vram_banks: 0,
            eram_banks: 0,
            wram_banks: 0,
        })
    }

    /// Decode an address into a region slot, applying the per-region access
    /// policy. Echo RAM recurses into the mirrored WRAM address and tags the
    /// result `ProhibitedAddress`; `0xFEA0-0xFEFF` resolves to a synthetic
    /// byte tagged `ReadOnlyProhibited`.
    fn resolve(&self, maddr: MemoryAddress) -> ResolveOutcome {
        let counts = self.bank_counts();
        let bank = maddr.bank as usize;
        let address = maddr.address;

        match address {
            0x0000..=0x3FFF => {
                if counts.rom_banks == 0 {
                    return Outcome::reject(AccessKind::InvalidBank, Resolution::Invalid);
                }
                Outcome::success(Resolution::Slot(Slot::Rom {
                    bank: 0,
                    offset: address as usize,
                }))
            }
            0x4000..=0x7FFF => {
                if maddr.bank >= counts.rom_banks {
                    return Outcome::reject(AccessKind::InvalidBank, Resolution::Invalid);
                }
                Outcome::success(Resolution::Slot(Slot::Rom {
                    bank,
                    offset: (address - 0x4000) as usize,
                }))
            }
            0x8000..=0x9FFF => {
                if maddr.bank >= counts.vram_banks {
                    return Outcome::reject(AccessKind::InvalidBank, Resolution::Invalid);
                }
                Outcome::success(Resolution::Slot(Slot::Vram {
                    bank,
                    offset: (address - 0x8000) as usize,
                }))
            }
            0xA000..=0xBFFF => {
                // A cartridge without RAM reports every ERAM access as an
                // invalid bank.
                if maddr.bank >= counts.eram_banks {
                    return Outcome::reject(AccessKind::InvalidBank, Resolution::Invalid);
                }
                Outcome::success(Resolution::Slot(Slot::Eram {
                    bank,
                    offset: (address - 0xA000) as usize,
                }))
            }
            0xC000..=0xCFFF => {
                if counts.wram_banks == 0 {
                    return Outcome::reject(AccessKind::InvalidBank, Resolution::Invalid);
                }
                Outcome::success(Resolution::Slot(Slot::Wram {
                    bank: 0,
                    offset: (address - 0xC000) as usize,
                }))
            }
            0xD000..=0xDFFF => {
                if maddr.bank >= counts.wram_banks {
                    return Outcome::reject(AccessKind::InvalidBank, Resolution::Invalid);
                }
                Outcome::success(Resolution::Slot(Slot::Wram {
                    bank,
                    offset: (address - 0xD000) as usize,
                }))
            }
            0xE000..=0xFDFF => {
                // Echo RAM: only the lower 13 address lines are connected,
                // so the access lands 0x2000 below. The mirrored payload is
                // carried with a ProhibitedAddress diagnostic, fatal only if
                // the underlying access failed.
                let mirrored = self.resolve(MemoryAddress::new(maddr.bank, address - 0x2000));
                if mirrored.is_success() {
                    Outcome::accept(AccessKind::ProhibitedAddress, mirrored.into_value())
                } else {
                    Outcome::reject(AccessKind::ProhibitedAddress, mirrored.into_value())
                }
            }
            0xFE00..=0xFE9F => Outcome::success(Resolution::Slot(Slot::Oam(
                (address - 0xFE00) as usize,
            ))),
            0xFEA0..=0xFEFF => {
                // Unusable region: reads return the high nibble of the low
                // address byte duplicated into both nibbles (0xFEAx -> 0xAA,
                // ... 0xFEFx -> 0xFF); writes are dropped.
                let nibble = Nibble::new((address >> 4) as u8);
                Outcome::accept(
                    AccessKind::ReadOnlyProhibited,
                    Resolution::Synthetic(Byte::from_nibbles(nibble, nibble)),
                )
            }
            0xFF00..=0xFF7F => Outcome::success(Resolution::Slot(Slot::Io(
                (address - 0xFF00) as usize,
            ))),
            0xFF80..=0xFFFE => Outcome::success(Resolution::Slot(Slot::Hram(
                (address - 0xFF80) as usize,
            ))),
            0xFFFF => Outcome::success(Resolution::Slot(Slot::Ie)),
        }
    }

    fn slot_read(&self, slot: Slot) -> Byte {
        match slot {
            Slot::Rom { bank, offset } => self.rom[bank].byte(offset),
            Slot::Vram { bank, offset } => self.vram[bank].byte(offset),
            Slot::Eram { bank, offset } => self.eram[bank].byte(offset),
            Slot::Wram { bank, offset } => self.wram[bank].byte(offset),
            Slot::Oam(offset) => self.oam.byte(offset),
            Slot::Io(offset) => self.io.byte(offset),
            Slot::Hram(offset) => self.hram.byte(offset),
            Slot::Ie => self.regs.ie(),
        }
    }

    fn slot_write(&mut self, slot: Slot, value: Byte) {
        match slot {
            Slot::Rom { bank, offset } => self.rom[bank].set_byte(offset, value),
            Slot::Vram { bank, offset } => self.vram[bank].set_byte(offset, value),
            Slot::Eram { bank, offset } => self.eram[bank].set_byte(offset, value),
            Slot::Wram { bank, offset } => self.wram[bank].set_byte(offset, value),
            Slot::Oam(offset) => self.oam.set_byte(offset, value),
            Slot::Io(offset) => self.io.set_byte(offset, value),
            Slot::Hram(offset) => self.hram.set_byte(offset, value),
            Slot::Ie => self.regs.set_ie(value),
        }
    }

    /// Read the byte at an explicitly banked address.
    pub fn read_byte(&self, maddr: impl Into<MemoryAddress>) -> Outcome<Byte, AccessKind> {
        let resolved = self.resolve(maddr.into());
        let value = match *resolved.value() {
            Resolution::Slot(slot) if resolved.is_success() => self.slot_read(slot),
            Resolution::Synthetic(byte) => byte,
            _ => Byte::new(0),
        };
        resolved.replace(value)
    }

    /// Write the byte at an explicitly banked address, returning the value
    /// previously stored there.
    ///
    /// Writes into the read-only-prohibited range are dropped and reported
    /// fatal while still carrying the synthetic read-back value; the guest
    /// continues.
    pub fn write_byte(
        &mut self,
        maddr: impl Into<MemoryAddress>,
        value: Byte,
    ) -> Outcome<Byte, AccessKind> {
        let resolved = self.resolve(maddr.into());
        match *resolved.value() {
            Resolution::Slot(slot) if resolved.is_success() => {
                let previous = self.slot_read(slot);
                self.slot_write(slot, value);
                resolved.replace(previous)
            }
            Resolution::Synthetic(byte) => Outcome::reject(AccessKind::ReadOnlyProhibited, byte),
            _ => resolved.replace(Byte::new(0)),
        }
    }

    /// Bank currently driven onto the bus for the region containing
    /// `address`: the ROM/ERAM selects, the VBK low bit, or SVBK (zero read
    /// as one). Unbanked regions report bank 0.
    fn active_bank(&self, address: u16) -> u16 {
        let counts = self.bank_counts();
        match address {
            0x4000..=0x7FFF => self.rom_bank_select,
            0x8000..=0x9FFF if counts.vram_banks > 1 => (self.io.byte(IO_VBK).get() & 0x01).into(),
            0xA000..=0xBFFF => self.eram_bank_select,
            0xD000..=0xDFFF => {
                let svbk = self.io.byte(IO_SVBK).get() & 0x07;
                if svbk == 0 {
                    1
                } else {
                    svbk.into()
                }
            }
            0xE000..=0xFDFF => self.active_bank(address - 0x2000),
            _ => 0,
        }
    }

    /// Read a byte with the bus-active bank substituted for the target
    /// region.
    pub fn read_byte_at(&self, address: u16) -> Outcome<Byte, AccessKind> {
        self.read_byte(MemoryAddress::new(self.active_bank(address), address))
    }

    /// Write a byte with the bus-active bank substituted for the target
    /// region.
    pub fn write_byte_at(&mut self, address: u16, value: Byte) -> Outcome<Byte, AccessKind> {
        self.write_byte(MemoryAddress::new(self.active_bank(address), address), value)
    }

    /// Read a little-endian word: low byte at `address`, high byte at
    /// `address + 1`.
    ///
    /// `0xFFFF` is rejected outright (the high byte would fall off the map).
    /// Crossing one of the region seams is a non-fatal
    /// `CrossesRegionBoundary`; otherwise a non-fatal diagnostic from either
    /// byte access (such as an Echo RAM mirror) is carried through.
    pub fn read_word_le(&self, maddr: impl Into<MemoryAddress>) -> Outcome<Word, AccessKind> {
        let maddr = maddr.into();
        if maddr.address == 0xFFFF {
            return Outcome::reject(AccessKind::InvalidAddress, Word::new(0));
        }

        let lo = self.read_byte(MemoryAddress::new(maddr.bank, maddr.address));
        if lo.is_failure() {
            return lo.replace(Word::new(0));
        }
        let hi = self.read_byte(MemoryAddress::new(maddr.bank, maddr.address + 1));
        if hi.is_failure() {
            return hi.replace(Word::new(0));
        }

        let word = Word::from_bytes(*hi.value(), *lo.value());
        self.word_diagnostic(maddr.address, lo.kind(), hi.kind(), word)
    }

    /// Write a little-endian word: low byte to `address`, high byte to
    /// `address + 1`. Returns the word previously stored.
    pub fn write_word_le(
        &mut self,
        maddr: impl Into<MemoryAddress>,
        value: Word,
    ) -> Outcome<Word, AccessKind> {
        let maddr = maddr.into();
        if maddr.address == 0xFFFF {
            return Outcome::reject(AccessKind::InvalidAddress, Word::new(0));
        }

        let lo = self.write_byte(
            MemoryAddress::new(maddr.bank, maddr.address),
            value.low_byte(),
        );
        if lo.is_failure() {
            return lo.replace(Word::new(0));
        }
        let hi = self.write_byte(
            MemoryAddress::new(maddr.bank, maddr.address + 1),
            value.high_byte(),
        );
        if hi.is_failure() {
            return hi.replace(Word::new(0));
        }

        let previous = Word::from_bytes(*hi.value(), *lo.value());
        self.word_diagnostic(maddr.address, lo.kind(), hi.kind(), previous)
    }

    fn word_diagnostic(
        &self,
        address: u16,
        lo: AccessKind,
        hi: AccessKind,
        word: Word,
    ) -> Outcome<Word, AccessKind> {
        if REGION_SEAMS.contains(&address) {
            Outcome::accept(AccessKind::CrossesRegionBoundary, word)
        } else if lo != AccessKind::Success {
            Outcome::accept(lo, word)
        } else if hi != AccessKind::Success {
            Outcome::accept(hi, word)
        } else {
            Outcome::success(word)
        }
    }

    /// Bus-active-bank variant of [`MemoryMap::read_word_le`].
    pub fn read_word_le_at(&self, address: u16) -> Outcome<Word, AccessKind> {
        self.read_word_le(MemoryAddress::new(self.active_bank(address), address))
    }

    /// Bus-active-bank variant of [`MemoryMap::write_word_le`].
    pub fn write_word_le_at(&mut self, address: u16, value: Word) -> Outcome<Word, AccessKind> {
        self.write_word_le(MemoryAddress::new(self.active_bank(address), address), value)
    }

    /// Read an 8-bit register by name. 16-bit names (and the 4-bit F) report
    /// `RegisterInvalidWidth`.
    pub fn read_byte_reg(&self, reg: RegisterName) -> Outcome<Byte, AccessKind> {
        let value = match reg {
            RegisterName::A => self.regs.a(),
            RegisterName::B => self.regs.b(),
            RegisterName::C => self.regs.c(),
            RegisterName::D => self.regs.d(),
            RegisterName::E => self.regs.e(),
            RegisterName::H => self.regs.h(),
            RegisterName::L => self.regs.l(),
            RegisterName::IR => self.regs.ir(),
            RegisterName::IE => self.regs.ie(),
            RegisterName::W => self.regs.w(),
            RegisterName::Z => self.regs.z(),
            _ => return Outcome::reject(AccessKind::RegisterInvalidWidth, Byte::new(0)),
        };
        Outcome::success(value)
    }

    /// Write an 8-bit register by name, returning the previous value.
    pub fn write_byte_reg(&mut self, reg: RegisterName, value: Byte) -> Outcome<Byte, AccessKind> {
        let previous = match reg {
            RegisterName::A => self.regs.a(),
            RegisterName::B => self.regs.b(),
            RegisterName::C => self.regs.c(),
            RegisterName::D => self.regs.d(),
            RegisterName::E => self.regs.e(),
            RegisterName::H => self.regs.h(),
            RegisterName::L => self.regs.l(),
            RegisterName::IR => self.regs.ir(),
            RegisterName::IE => self.regs.ie(),
            RegisterName::W => self.regs.w(),
            RegisterName::Z => self.regs.z(),
            _ => return Outcome::reject(AccessKind::RegisterInvalidWidth, Byte::new(0)),
        };
        match reg {
            RegisterName::A => self.regs.set_a(value),
            RegisterName::B => self.regs.set_b(value),
            RegisterName::C => self.regs.set_c(value),
            RegisterName::D => self.regs.set_d(value),
            RegisterName::E => self.regs.set_e(value),
            RegisterName::H => self.regs.set_h(value),
            RegisterName::L => self.regs.set_l(value),
            RegisterName::IR => self.regs.set_ir(value),
            RegisterName::IE => self.regs.set_ie(value),
            RegisterName::W => self.regs.set_w(value),
            RegisterName::Z => self.regs.set_z(value),
            _ => unreachable!("width checked above"),
        }
        Outcome::success(previous)
    }

    /// Read a 16-bit register or pair by name. 8-bit names report
    /// `RegisterInvalidWidth`.
    pub fn read_word_reg(&self, reg: RegisterName) -> Outcome<Word, AccessKind> {
        let value = match reg {
            RegisterName::AF => self.regs.af(),
            RegisterName::BC => self.regs.bc(),
            RegisterName::DE => self.regs.de(),
            RegisterName::HL => self.regs.hl(),
            RegisterName::PC => self.regs.pc(),
            RegisterName::SP => self.regs.sp(),
            RegisterName::WZ => self.regs.wz(),
            _ => return Outcome::reject(AccessKind::RegisterInvalidWidth, Word::new(0)),
        };
        Outcome::success(value)
    }

    /// Write a 16-bit register or pair by name, returning the previous
    /// value. An AF write forces the low nibble of F to zero.
    pub fn write_word_reg(&mut self, reg: RegisterName, value: Word) -> Outcome<Word, AccessKind> {
        let previous = match reg {
            RegisterName::AF => self.regs.af(),
            RegisterName::BC => self.regs.bc(),
            RegisterName::DE => self.regs.de(),
            RegisterName::HL => self.regs.hl(),
            RegisterName::PC => self.regs.pc(),
            RegisterName::SP => self.regs.sp(),
            RegisterName::WZ => self.regs.wz(),
            _ => return Outcome::reject(AccessKind::RegisterInvalidWidth, Word::new(0)),
        };
        match reg {
            RegisterName::AF => self.regs.set_af(value),
            RegisterName::BC => self.regs.set_bc(value),
            RegisterName::DE => self.regs.set_de(value),
            RegisterName::HL => self.regs.set_hl(value),
            RegisterName::PC => self.regs.set_pc(value),
            RegisterName::SP => self.regs.set_sp(value),
            RegisterName::WZ => self.regs.set_wz(value),
            _ => unreachable!("width checked above"),
        }
        Outcome::success(previous)
    }

    /// Raw read of the flag nibble (F bits 7-4).
    pub fn read_flag(&self) -> Nibble {
        self.regs.f()
    }

    /// Raw write of the flag nibble, returning the previous value.
    pub fn write_flag(&mut self, value: Nibble) -> Nibble {
        let previous = self.regs.f();
        self.regs.set_f(value);
        previous
    }

    /// Select the ROM bank mapped at `0x4000-0x7FFF`.
    pub fn set_rom_bank(&mut self, bank: u16) -> Outcome<(), AccessKind> {
        if bank >= self.bank_counts().rom_banks {
            return Outcome::reject(AccessKind::InvalidBank, ());
        }
        self.rom_bank_select = bank;
        Outcome::success(())
    }

    /// Select the ERAM bank mapped at `0xA000-0xBFFF`.
    pub fn set_eram_bank(&mut self, bank: u16) -> Outcome<(), AccessKind> {
        if bank >= self.bank_counts().eram_banks {
            return Outcome::reject(AccessKind::InvalidBank, ());
        }
        self.eram_bank_select = bank;
        Outcome::success(())
    }

    /// `PC <- PC + 1` with 16-bit wrap. Wrapping past `0xFFFF` is reported
    /// as a non-fatal `RegisterOverflow`.
    pub fn increment_pc(&mut self) -> Outcome<Word, AccessKind> {
        let next = self.regs.pc().wrapping_add(1);
        self.regs.set_pc(next);
        if next == Word::MIN {
            Outcome::accept(AccessKind::RegisterOverflow, next)
        } else {
            Outcome::success(next)
        }
    }

    /// `PC <- PC - 1` with 16-bit wrap, `RegisterOverflow` when crossing
    /// zero.
    pub fn decrement_pc(&mut self) -> Outcome<Word, AccessKind> {
        let wrapped = self.regs.pc() == Word::MIN;
        let next = self.regs.pc().wrapping_sub(1);
        self.regs.set_pc(next);
        if wrapped {
            Outcome::accept(AccessKind::RegisterOverflow, next)
        } else {
            Outcome::success(next)
        }
    }
}
