/// A fully qualified bus address: a bank number plus a 16-bit address.
///
/// The bank field is ignored for regions that have no bank (ROM bank 0,
/// WRAM bank 0, OAM, I/O, HRAM, IE). The bus-active convenience accessors on
/// the map substitute the currently selected bank for the target region
/// instead of taking one here.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MemoryAddress {
    pub bank: u16,
    pub address: u16,
}

impl MemoryAddress {
    pub const fn new(bank: u16, address: u16) -> Self {
        Self { bank, address }
    }
}

impl From<(u16, u16)> for MemoryAddress {
    fn from((bank, address): (u16, u16)) -> Self {
        Self::new(bank, address)
    }
}
