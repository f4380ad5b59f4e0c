//! Cartridge bank-switching logic.
//!
//! The supported boards form a closed set, so [`Mapper`] is an enum with one
//! dispatch method per operation rather than a trait object. Both the system
//! bus and the picture bus resolve cartridge addresses through the same
//! instance.

use std::fmt;

use crate::{
    cartridge::{Cartridge, header::Mirroring},
    error::Error,
};

mod chr_storage;
mod mapper0;
mod mapper1;
mod mapper2;
mod mapper3;

pub use chr_storage::ChrStorage;
pub use mapper0::Mapper0;
pub use mapper1::Mapper1;
pub use mapper2::Mapper2;
pub use mapper3::Mapper3;

/// Invoked with the new layout whenever a board rewires its nametables.
pub type MirroringCallback = Box<dyn FnMut(Mirroring)>;

/// Optional mirroring-changed observer held by boards with runtime control.
#[derive(Default)]
pub struct MirroringObserver(Option<MirroringCallback>);

impl MirroringObserver {
    pub fn set(&mut self, callback: MirroringCallback) {
        self.0 = Some(callback);
    }

    pub fn notify(&mut self, mirroring: Mirroring) {
        if let Some(callback) = self.0.as_mut() {
            callback(mirroring);
        }
    }
}

impl fmt::Debug for MirroringObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MirroringObserver")
            .field(&self.0.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub enum Mapper {
    /// Mapper 0: fixed PRG and CHR.
    Nrom(Mapper0),
    /// Mapper 1: serial shift-register bank select.
    SxRom(Mapper1),
    /// Mapper 2: switchable 16 KiB PRG, fixed CHR.
    UxRom(Mapper2),
    /// Mapper 3: switchable 8 KiB CHR, fixed PRG.
    CnRom(Mapper3),
}

impl Mapper {
    /// Selects the board implementation declared by the cartridge.
    pub fn new(cartridge: Cartridge) -> Result<Self, Error> {
        let mapper = match cartridge.mapper_id() {
            0 => Mapper::Nrom(Mapper0::new(cartridge)),
            1 => Mapper::SxRom(Mapper1::new(cartridge)),
            2 => Mapper::UxRom(Mapper2::new(cartridge)),
            3 => Mapper::CnRom(Mapper3::new(cartridge)),
            id => return Err(Error::UnsupportedMapper(id)),
        };
        tracing::debug!(mapper = mapper.id(), "mapper selected");
        Ok(mapper)
    }

    /// iNES mapper number of the active board.
    pub fn id(&self) -> u8 {
        match self {
            Mapper::Nrom(_) => 0,
            Mapper::SxRom(_) => 1,
            Mapper::UxRom(_) => 2,
            Mapper::CnRom(_) => 3,
        }
    }

    /// CPU read in `$8000-$FFFF`.
    pub fn read_prg(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(m) => m.read_prg(addr),
            Mapper::SxRom(m) => m.read_prg(addr),
            Mapper::UxRom(m) => m.read_prg(addr),
            Mapper::CnRom(m) => m.read_prg(addr),
        }
    }

    /// CPU write in `$8000-$FFFF`.
    pub fn write_prg(&mut self, addr: u16, value: u8) {
        match self {
            Mapper::Nrom(m) => m.write_prg(addr, value),
            Mapper::SxRom(m) => m.write_prg(addr, value),
            Mapper::UxRom(m) => m.write_prg(addr, value),
            Mapper::CnRom(m) => m.write_prg(addr, value),
        }
    }

    /// PPU read in `$0000-$1FFF`.
    pub fn read_chr(&self, addr: u16) -> u8 {
        match self {
            Mapper::Nrom(m) => m.read_chr(addr),
            Mapper::SxRom(m) => m.read_chr(addr),
            Mapper::UxRom(m) => m.read_chr(addr),
            Mapper::CnRom(m) => m.read_chr(addr),
        }
    }

    /// PPU write in `$0000-$1FFF`; only CHR RAM keeps the value.
    pub fn write_chr(&mut self, addr: u16, value: u8) {
        match self {
            Mapper::Nrom(m) => m.write_chr(addr, value),
            Mapper::SxRom(m) => m.write_chr(addr, value),
            Mapper::UxRom(m) => m.write_chr(addr, value),
            Mapper::CnRom(m) => m.write_chr(addr, value),
        }
    }

    /// Bytes of the currently mapped PRG bank from `addr` up to the end of
    /// its 256-byte page.
    pub fn page(&self, addr: u16) -> Option<&[u8]> {
        let (rom, offset) = match self {
            Mapper::Nrom(m) => (m.prg_rom(), m.prg_offset(addr)),
            Mapper::SxRom(m) => (m.prg_rom(), m.prg_offset(addr)),
            Mapper::UxRom(m) => (m.prg_rom(), m.prg_offset(addr)),
            Mapper::CnRom(m) => (m.prg_rom(), m.prg_offset(addr)),
        };
        let page_end = (offset | 0xFF) + 1;
        rom.get(offset..page_end.min(rom.len()))
    }

    pub fn name_table_mirroring(&self) -> Mirroring {
        match self {
            Mapper::Nrom(m) => m.mirroring(),
            Mapper::SxRom(m) => m.mirroring(),
            Mapper::UxRom(m) => m.mirroring(),
            Mapper::CnRom(m) => m.mirroring(),
        }
    }

    /// Whether the board backs `$6000-$7FFF` with SRAM.
    pub fn has_extended_ram(&self) -> bool {
        match self {
            Mapper::Nrom(m) => m.has_extended_ram(),
            Mapper::SxRom(m) => m.has_extended_ram(),
            Mapper::UxRom(m) => m.has_extended_ram(),
            Mapper::CnRom(m) => m.has_extended_ram(),
        }
    }

    /// Installs the observer for runtime mirroring changes. Boards with
    /// hard-wired mirroring never call it.
    pub fn set_mirroring_callback(&mut self, callback: MirroringCallback) {
        match self {
            Mapper::SxRom(m) => m.set_mirroring_callback(callback),
            Mapper::Nrom(_) | Mapper::UxRom(_) | Mapper::CnRom(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cartridge(mapper_id: u8, prg_banks: usize) -> Cartridge {
        let mut prg = vec![0u8; prg_banks * 0x4000];
        for (i, byte) in prg.iter_mut().enumerate() {
            *byte = (i >> 8) as u8;
        }
        Cartridge::new(prg, vec![0u8; 0x2000], Mirroring::Vertical, mapper_id, false)
    }

    #[test]
    fn selects_variant_from_mapper_id() {
        for id in 0..=3 {
            let mapper = Mapper::new(cartridge(id, 2)).expect("supported mapper");
            assert_eq!(mapper.id(), id);
        }
    }

    #[test]
    fn unsupported_mapper_is_an_error() {
        let err = Mapper::new(cartridge(4, 2)).expect_err("mapper 4 is not implemented");
        assert!(matches!(err, Error::UnsupportedMapper(4)));
    }

    #[test]
    fn page_returns_rest_of_mapped_page() {
        let mapper = Mapper::new(cartridge(0, 2)).expect("nrom");
        let page = mapper.page(0x8310).expect("page inside PRG");
        assert_eq!(page.len(), 0xF0);
        assert_eq!(page[0], 0x03);

        let last = mapper.page(0xFF00).expect("last page");
        assert_eq!(last.len(), 0x100);
        assert_eq!(last[0], 0x7F);
    }
}
